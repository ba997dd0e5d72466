//! Redutor de filtros sobre a base canônica.
//!
//! Função pura: devolve o subconjunto de linhas que atende à seleção,
//! sem alterar conteúdo nem ordem relativa. Lista vazia = sem restrição.

use crate::models::{RegistroVenda, SelecaoFiltros};

fn passa(registro: &RegistroVenda, sel: &SelecaoFiltros) -> bool {
    if registro.mes < sel.mes_ini || registro.mes > sel.mes_fim {
        return false;
    }
    if !sel.anos.is_empty() && !sel.anos.contains(&registro.ano) {
        return false;
    }
    if !sel.emissoras.is_empty() && !sel.emissoras.contains(&registro.emissora) {
        return false;
    }
    if !sel.executivos.is_empty() && !sel.executivos.contains(&registro.executivo) {
        return false;
    }
    if !sel.clientes.is_empty() && !sel.clientes.contains(&registro.cliente) {
        return false;
    }
    true
}

/// Aplica a seleção de filtros e devolve as linhas remanescentes.
pub fn aplicar_filtros(base: &[RegistroVenda], sel: &SelecaoFiltros) -> Vec<RegistroVenda> {
    base.iter().filter(|r| passa(r, sel)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn registro(emissora: &str, cliente: &str, ano: i32, mes: u32, fat: f64) -> RegistroVenda {
        RegistroVenda {
            emissora: emissora.to_string(),
            cliente: cliente.to_string(),
            executivo: "Exec".to_string(),
            faturamento: fat,
            data_ref: NaiveDate::from_ymd_opt(ano, mes, 1).unwrap(),
            ano,
            mes,
            mes_label: crate::formato::rotulo_mes(ano, mes),
        }
    }

    fn base_exemplo() -> Vec<RegistroVenda> {
        vec![
            registro("A", "X", 2023, 1, 100.0),
            registro("A", "X", 2024, 1, 50.0),
            registro("B", "Y", 2024, 2, 200.0),
            registro("B", "Z", 2024, 11, 10.0),
        ]
    }

    #[test]
    fn test_sem_restricao_devolve_tudo() {
        let base = base_exemplo();
        let sel = SelecaoFiltros::default();
        assert_eq!(aplicar_filtros(&base, &sel).len(), base.len());
    }

    #[test]
    fn test_resultado_e_subconjunto_sem_alterar_linhas() {
        let base = base_exemplo();
        let sel = SelecaoFiltros {
            emissoras: vec!["A".to_string()],
            ..Default::default()
        };
        let saida = aplicar_filtros(&base, &sel);
        assert_eq!(saida.len(), 2);
        for r in &saida {
            assert!(base.iter().any(|o| {
                o.emissora == r.emissora
                    && o.cliente == r.cliente
                    && o.ano == r.ano
                    && o.faturamento == r.faturamento
            }));
        }
    }

    #[test]
    fn test_composicao_equivale_a_intersecao() {
        let base = base_exemplo();
        let s1 = SelecaoFiltros {
            anos: vec![2024],
            ..Default::default()
        };
        let s2 = SelecaoFiltros {
            emissoras: vec!["B".to_string()],
            ..Default::default()
        };
        let s12 = SelecaoFiltros {
            anos: vec![2024],
            emissoras: vec!["B".to_string()],
            ..Default::default()
        };

        let encadeado = aplicar_filtros(&aplicar_filtros(&base, &s1), &s2);
        let direto = aplicar_filtros(&base, &s12);
        assert_eq!(encadeado.len(), direto.len());
        for (a, b) in encadeado.iter().zip(direto.iter()) {
            assert_eq!(a.cliente, b.cliente);
            assert_eq!(a.faturamento, b.faturamento);
        }
    }

    #[test]
    fn test_intervalo_de_meses() {
        let base = base_exemplo();
        let sel = SelecaoFiltros {
            mes_ini: 1,
            mes_fim: 2,
            ..Default::default()
        };
        let saida = aplicar_filtros(&base, &sel);
        assert_eq!(saida.len(), 3);
        assert!(saida.iter().all(|r| r.mes <= 2));
    }
}
