//! Página "Visão Geral": KPIs do par de anos, evolução mensal e
//! faturamento por emissora/executivo.

use serde::Serialize;
use std::collections::BTreeMap;

use super::{TOTALIZADOR, anos_comparacao, delta_pct};
use crate::models::{RegistroVenda, Tabela, Valor};

/// Ponto da série mensal: um (ano, mês) com o faturamento somado.
#[derive(Debug, Clone, Serialize)]
pub struct PontoMensal {
    pub ano: i32,
    pub mes: u32,
    pub mes_label: String,
    pub faturamento: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisaoGeral {
    pub ano_base: i32,
    pub ano_comp: i32,
    pub total_base: f64,
    pub total_comp: f64,
    pub delta_abs: f64,
    pub delta_pct: Option<f64>,
    /// Evolução mensal ordenada por (ano, mês).
    pub evolucao: Vec<PontoMensal>,
    /// Faturamento por emissora, decrescente.
    pub por_emissora: Vec<(String, f64)>,
    /// Faturamento por executivo, decrescente.
    pub por_executivo: Vec<(String, f64)>,
}

fn soma_por_chave(
    base: &[RegistroVenda],
    chave_de: impl for<'a> Fn(&'a RegistroVenda) -> &'a str,
) -> Vec<(String, f64)> {
    let mut acc: BTreeMap<String, f64> = BTreeMap::new();
    for r in base {
        *acc.entry(chave_de(r).to_string()).or_insert(0.0) += r.faturamento;
    }
    let mut pares: Vec<(String, f64)> = acc.into_iter().collect();
    pares.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    pares
}

/// Monta a visão geral da base já filtrada. `None` quando não há anos
/// válidos (base vazia).
pub fn montar(base: &[RegistroVenda]) -> Option<VisaoGeral> {
    let (ano_base, ano_comp) = anos_comparacao(base)?;

    let total_base: f64 = base
        .iter()
        .filter(|r| r.ano == ano_base)
        .map(|r| r.faturamento)
        .sum();
    let total_comp: f64 = base
        .iter()
        .filter(|r| r.ano == ano_comp)
        .map(|r| r.faturamento)
        .sum();
    let delta_abs = total_comp - total_base;

    let mut mensal: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for r in base {
        *mensal.entry((r.ano, r.mes)).or_insert(0.0) += r.faturamento;
    }
    let evolucao: Vec<PontoMensal> = mensal
        .into_iter()
        .map(|((ano, mes), faturamento)| PontoMensal {
            ano,
            mes,
            mes_label: crate::formato::rotulo_mes(ano, mes),
            faturamento,
        })
        .collect();

    Some(VisaoGeral {
        ano_base,
        ano_comp,
        total_base,
        total_comp,
        delta_abs,
        delta_pct: delta_pct(total_base, delta_abs),
        evolucao,
        por_emissora: soma_por_chave(base, |r| &r.emissora),
        por_executivo: soma_por_chave(base, |r| &r.executivo),
    })
}

impl VisaoGeral {
    pub fn tabela_evolucao(&self) -> Tabela {
        let mut t = Tabela::nova(vec![
            "Ano".to_string(),
            "Mês".to_string(),
            "Faturamento".to_string(),
        ]);
        for p in &self.evolucao {
            t.push(vec![
                Valor::Inteiro(p.ano as i64),
                Valor::texto(p.mes_label.clone()),
                Valor::Numero(p.faturamento),
            ]);
        }
        t
    }

    pub fn tabela_por_emissora(&self) -> Tabela {
        tabela_soma("Emissora", &self.por_emissora)
    }

    pub fn tabela_por_executivo(&self) -> Tabela {
        tabela_soma("Executivo", &self.por_executivo)
    }
}

/// Tabela simples dimensão × faturamento com Totalizador.
pub(crate) fn tabela_soma(rotulo: &str, pares: &[(String, f64)]) -> Tabela {
    let mut t = Tabela::nova(vec![rotulo.to_string(), "Faturamento".to_string()]);
    if pares.is_empty() {
        return t;
    }
    for (chave, v) in pares {
        t.push(vec![Valor::texto(chave.clone()), Valor::Numero(*v)]);
    }
    let total: f64 = pares.iter().map(|(_, v)| v).sum();
    t.push(vec![Valor::texto(TOTALIZADOR), Valor::Numero(total)]);
    t
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::registro;
    use super::*;

    fn base() -> Vec<RegistroVenda> {
        vec![
            registro("A", "X", "E1", 2023, 1, 100.0),
            registro("A", "X", "E1", 2024, 1, 50.0),
            registro("B", "Y", "E2", 2024, 2, 200.0),
        ]
    }

    #[test]
    fn test_kpis_do_par_de_anos() {
        let v = montar(&base()).expect("base não vazia");
        assert_eq!((v.ano_base, v.ano_comp), (2023, 2024));
        assert_eq!(v.total_base, 100.0);
        assert_eq!(v.total_comp, 250.0);
        assert_eq!(v.delta_abs, 150.0);
        assert_eq!(v.delta_pct, Some(150.0));
    }

    #[test]
    fn test_evolucao_ordenada_por_ano_mes() {
        let v = montar(&base()).expect("base não vazia");
        let chaves: Vec<(i32, u32)> = v.evolucao.iter().map(|p| (p.ano, p.mes)).collect();
        assert_eq!(chaves, vec![(2023, 1), (2024, 1), (2024, 2)]);
        assert_eq!(v.evolucao[0].mes_label, "Jan/23");
    }

    #[test]
    fn test_por_emissora_decrescente_com_totalizador() {
        let v = montar(&base()).expect("base não vazia");
        assert_eq!(v.por_emissora[0].0, "B");
        assert_eq!(v.por_emissora[0].1, 200.0);

        let t = v.tabela_por_emissora();
        let ultima = t.linhas.last().unwrap();
        assert_eq!(ultima[0], Valor::texto("Totalizador"));
        assert_eq!(ultima[1], Valor::Numero(350.0));
    }

    #[test]
    fn test_base_vazia_degrada_para_none() {
        assert!(montar(&[]).is_none());
    }
}
