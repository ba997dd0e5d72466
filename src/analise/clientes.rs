//! Página "Clientes & Faturamento": comparativos anuais por emissora e
//! executivo, média de investimento por cliente e comparativo mês a mês.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::{Comparativo, Metrica, TOTALIZADOR, anos_comparacao, comparativo_anual};
use crate::formato::MESES_ABREV;
use crate::models::{RegistroVenda, Tabela, Valor};

/// Linha da tabela 1.4: faturamento, clientes distintos e média por cliente.
#[derive(Debug, Clone, Serialize)]
pub struct MediaPorCliente {
    pub emissora: String,
    pub faturamento: f64,
    pub clientes: usize,
    pub media: Option<f64>,
}

/// Tabela 1.6: pivot mês × ano do faturamento, meses em ordem calendário.
#[derive(Debug, Clone, Serialize)]
pub struct ComparativoMensal {
    pub anos: Vec<i32>,
    pub linhas: Vec<LinhaMensal>,
    /// Soma de cada coluna de ano.
    pub totais: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinhaMensal {
    pub mes: u32,
    pub nome: String,
    pub valores: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientesFaturamento {
    pub ano_base: i32,
    pub ano_comp: i32,
    /// 1.1 Número de clientes por emissora (comparativo).
    pub clientes_por_emissora: Comparativo,
    /// 1.2 Faturamento por emissora (comparativo).
    pub faturamento_por_emissora: Comparativo,
    /// 1.3 Faturamento por executivo (comparativo).
    pub faturamento_por_executivo: Comparativo,
    /// 1.4 Média de investimento por cliente, por emissora.
    pub media_por_cliente: Vec<MediaPorCliente>,
    pub media_total: MediaPorCliente,
    /// 1.5 Faturamento total por emissora, decrescente.
    pub total_por_emissora: Vec<(String, f64)>,
    /// 1.6 Comparativo mês a mês.
    pub mensal: ComparativoMensal,
}

fn media(faturamento: f64, clientes: usize) -> Option<f64> {
    if clientes == 0 {
        None
    } else {
        Some(faturamento / clientes as f64)
    }
}

fn montar_media_por_cliente(base: &[RegistroVenda]) -> (Vec<MediaPorCliente>, MediaPorCliente) {
    let mut acc: BTreeMap<String, (f64, HashSet<String>)> = BTreeMap::new();
    for r in base {
        let entrada = acc.entry(r.emissora.clone()).or_default();
        entrada.0 += r.faturamento;
        entrada.1.insert(r.cliente.clone());
    }

    let linhas: Vec<MediaPorCliente> = acc
        .into_iter()
        .map(|(emissora, (faturamento, clientes))| MediaPorCliente {
            emissora,
            faturamento,
            clientes: clientes.len(),
            media: media(faturamento, clientes.len()),
        })
        .collect();

    let total_fat: f64 = linhas.iter().map(|l| l.faturamento).sum();
    let total_cli: usize = linhas.iter().map(|l| l.clientes).sum();
    let total = MediaPorCliente {
        emissora: TOTALIZADOR.to_string(),
        faturamento: total_fat,
        clientes: total_cli,
        media: media(total_fat, total_cli),
    };

    (linhas, total)
}

fn montar_mensal(base: &[RegistroVenda]) -> ComparativoMensal {
    let anos: Vec<i32> = {
        let s: BTreeSet<i32> = base.iter().map(|r| r.ano).collect();
        s.into_iter().collect()
    };

    let mut acc: BTreeMap<u32, BTreeMap<i32, f64>> = BTreeMap::new();
    for r in base {
        *acc.entry(r.mes).or_default().entry(r.ano).or_insert(0.0) += r.faturamento;
    }

    let linhas: Vec<LinhaMensal> = acc
        .into_iter()
        .map(|(mes, por_ano)| LinhaMensal {
            mes,
            nome: MESES_ABREV
                .get(mes.saturating_sub(1) as usize)
                .copied()
                .unwrap_or("?")
                .to_string(),
            valores: anos
                .iter()
                .map(|a| por_ano.get(a).copied().unwrap_or(0.0))
                .collect(),
        })
        .collect();

    let totais: Vec<f64> = (0..anos.len())
        .map(|i| linhas.iter().map(|l| l.valores[i]).sum())
        .collect();

    ComparativoMensal {
        anos,
        linhas,
        totais,
    }
}

/// Monta a página a partir da base filtrada. `None` quando não há anos.
pub fn montar(base: &[RegistroVenda]) -> Option<ClientesFaturamento> {
    let (ano_base, ano_comp) = anos_comparacao(base)?;

    let mut total_por_emissora: Vec<(String, f64)> = {
        let mut acc: BTreeMap<String, f64> = BTreeMap::new();
        for r in base {
            *acc.entry(r.emissora.clone()).or_insert(0.0) += r.faturamento;
        }
        acc.into_iter().collect()
    };
    total_por_emissora
        .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let (media_por_cliente, media_total) = montar_media_por_cliente(base);

    Some(ClientesFaturamento {
        ano_base,
        ano_comp,
        clientes_por_emissora: comparativo_anual(
            base,
            ano_base,
            ano_comp,
            |r| &r.emissora,
            Metrica::ClientesUnicos,
        ),
        faturamento_por_emissora: comparativo_anual(
            base,
            ano_base,
            ano_comp,
            |r| &r.emissora,
            Metrica::SomaFaturamento,
        ),
        faturamento_por_executivo: comparativo_anual(
            base,
            ano_base,
            ano_comp,
            |r| &r.executivo,
            Metrica::SomaFaturamento,
        ),
        media_por_cliente,
        media_total,
        total_por_emissora,
        mensal: montar_mensal(base),
    })
}

impl ClientesFaturamento {
    pub fn tabela_media(&self) -> Tabela {
        let mut t = Tabela::nova(vec![
            "Emissora".to_string(),
            "Faturamento".to_string(),
            "Clientes".to_string(),
            "Média por cliente".to_string(),
        ]);
        if self.media_por_cliente.is_empty() {
            return t;
        }
        for l in self
            .media_por_cliente
            .iter()
            .chain(std::iter::once(&self.media_total))
        {
            t.push(vec![
                Valor::texto(l.emissora.clone()),
                Valor::Numero(l.faturamento),
                Valor::Inteiro(l.clientes as i64),
                Valor::opcional(l.media),
            ]);
        }
        t
    }

    pub fn tabela_total_por_emissora(&self) -> Tabela {
        super::visao_geral::tabela_soma("Emissora", &self.total_por_emissora)
    }

    pub fn tabela_mensal(&self) -> Tabela {
        let mut colunas = vec!["Mês".to_string()];
        colunas.extend(self.mensal.anos.iter().map(|a| a.to_string()));
        let mut t = Tabela::nova(colunas);
        if self.mensal.linhas.is_empty() {
            return t;
        }
        for l in &self.mensal.linhas {
            let mut linha = vec![Valor::texto(l.nome.clone())];
            linha.extend(l.valores.iter().map(|v| Valor::Numero(*v)));
            t.push(linha);
        }
        let mut total = vec![Valor::texto(TOTALIZADOR)];
        total.extend(self.mensal.totais.iter().map(|v| Valor::Numero(*v)));
        t.push(total);
        t
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::registro;
    use super::*;

    fn base() -> Vec<RegistroVenda> {
        vec![
            registro("A", "X", "E1", 2023, 1, 100.0),
            registro("A", "X", "E1", 2024, 1, 50.0),
            registro("A", "Z", "E1", 2024, 2, 30.0),
            registro("B", "Y", "E2", 2024, 2, 200.0),
        ]
    }

    #[test]
    fn test_clientes_por_emissora_conta_distintos() {
        let p = montar(&base()).expect("base não vazia");
        let a = &p.clientes_por_emissora.linhas[0];
        assert_eq!(a.chave, "A");
        assert_eq!(a.valor_base, 1.0); // 2023: {X}
        assert_eq!(a.valor_comp, 2.0); // 2024: {X, Z}
    }

    #[test]
    fn test_media_por_cliente() {
        let p = montar(&base()).expect("base não vazia");
        let a = &p.media_por_cliente[0];
        assert_eq!(a.emissora, "A");
        assert_eq!(a.faturamento, 180.0);
        assert_eq!(a.clientes, 2);
        assert_eq!(a.media, Some(90.0));

        // Totalizador recalculado das somas, não média das médias
        assert_eq!(p.media_total.faturamento, 380.0);
        assert_eq!(p.media_total.clientes, 3);
        assert_eq!(p.media_total.media, Some(380.0 / 3.0));
    }

    #[test]
    fn test_total_por_emissora_decrescente() {
        let p = montar(&base()).expect("base não vazia");
        assert_eq!(p.total_por_emissora[0].0, "B");
        assert_eq!(p.total_por_emissora[1].0, "A");
    }

    #[test]
    fn test_mensal_pivot_e_totais() {
        let p = montar(&base()).expect("base não vazia");
        assert_eq!(p.mensal.anos, vec![2023, 2024]);
        assert_eq!(p.mensal.linhas.len(), 2); // Jan e Fev

        let jan = &p.mensal.linhas[0];
        assert_eq!(jan.nome, "Jan");
        assert_eq!(jan.valores, vec![100.0, 50.0]);

        let fev = &p.mensal.linhas[1];
        assert_eq!(fev.valores, vec![0.0, 230.0]);

        assert_eq!(p.mensal.totais, vec![100.0, 280.0]);

        let t = p.tabela_mensal();
        assert_eq!(t.linhas.last().unwrap()[0], Valor::texto("Totalizador"));
    }
}
