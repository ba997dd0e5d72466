//! Página "Top 10": maiores anunciantes de uma emissora em um ano.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::TOTALIZADOR;
use crate::models::{RegistroVenda, Tabela, Valor};

#[derive(Debug, Clone, Serialize)]
pub struct Top10 {
    /// Opções disponíveis para os seletores, em ordem crescente.
    pub emissoras: Vec<String>,
    pub anos: Vec<i32>,
    pub emissora: String,
    pub ano: i32,
    /// Até 10 clientes por faturamento somado, decrescente.
    pub clientes: Vec<(String, f64)>,
    /// Soma apenas dos clientes listados, não do ano inteiro.
    pub total: f64,
}

/// Monta o ranking da emissora/ano pedidos. Seleção ausente ou inexistente
/// cai no padrão: primeira emissora em ordem alfabética e o ano mais
/// recente. `None` quando a base é vazia.
pub fn montar(
    base: &[RegistroVenda],
    emissora: Option<&str>,
    ano: Option<i32>,
) -> Option<Top10> {
    let emissoras: Vec<String> = {
        let s: BTreeSet<&str> = base.iter().map(|r| r.emissora.as_str()).collect();
        s.into_iter().map(str::to_string).collect()
    };
    let anos: Vec<i32> = {
        let s: BTreeSet<i32> = base.iter().map(|r| r.ano).collect();
        s.into_iter().collect()
    };
    if emissoras.is_empty() || anos.is_empty() {
        return None;
    }

    let emissora = emissora
        .filter(|e| emissoras.iter().any(|x| x == e))
        .unwrap_or(&emissoras[0])
        .to_string();
    let ano = ano
        .filter(|a| anos.contains(a))
        .unwrap_or(anos[anos.len() - 1]);

    let mut acc: BTreeMap<&str, f64> = BTreeMap::new();
    for r in base {
        if r.ano == ano && r.emissora == emissora {
            *acc.entry(r.cliente.as_str()).or_insert(0.0) += r.faturamento;
        }
    }
    let mut clientes: Vec<(String, f64)> =
        acc.into_iter().map(|(c, v)| (c.to_string(), v)).collect();
    clientes.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    clientes.truncate(10);

    let total = clientes.iter().map(|(_, v)| v).sum();

    Some(Top10 {
        emissoras,
        anos,
        emissora,
        ano,
        clientes,
        total,
    })
}

impl Top10 {
    pub fn tabela(&self) -> Tabela {
        let mut t = Tabela::nova(vec!["Cliente".to_string(), "Faturamento".to_string()]);
        if self.clientes.is_empty() {
            return t;
        }
        for (cliente, v) in &self.clientes {
            t.push(vec![Valor::texto(cliente.clone()), Valor::Numero(*v)]);
        }
        t.push(vec![Valor::texto(TOTALIZADOR), Valor::Numero(self.total)]);
        t
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::registro;
    use super::*;

    fn base() -> Vec<RegistroVenda> {
        vec![
            registro("A", "X", "E", 2023, 1, 500.0),
            registro("A", "X", "E", 2024, 1, 100.0),
            registro("A", "Y", "E", 2024, 2, 300.0),
            registro("B", "Z", "E", 2024, 2, 900.0),
        ]
    }

    #[test]
    fn test_padrao_primeira_emissora_ano_mais_recente() {
        let t = montar(&base(), None, None).expect("base não vazia");
        assert_eq!(t.emissora, "A");
        assert_eq!(t.ano, 2024);
        assert_eq!(
            t.clientes,
            vec![("Y".to_string(), 300.0), ("X".to_string(), 100.0)]
        );
        assert_eq!(t.total, 400.0);
    }

    #[test]
    fn test_selecao_explicita() {
        let t = montar(&base(), Some("B"), Some(2024)).expect("base não vazia");
        assert_eq!(t.clientes, vec![("Z".to_string(), 900.0)]);

        let t = montar(&base(), Some("A"), Some(2023)).expect("base não vazia");
        assert_eq!(t.clientes, vec![("X".to_string(), 500.0)]);
    }

    #[test]
    fn test_selecao_invalida_cai_no_padrao() {
        let t = montar(&base(), Some("Inexistente"), Some(1999)).expect("base não vazia");
        assert_eq!(t.emissora, "A");
        assert_eq!(t.ano, 2024);
    }

    #[test]
    fn test_trunca_em_dez_e_totaliza_o_subconjunto() {
        let mut b = Vec::new();
        for i in 0..15 {
            let nome = format!("C{i:02}");
            b.push(registro("A", &nome, "E", 2024, 1, (i + 1) as f64));
        }
        let t = montar(&b, None, None).expect("base não vazia");
        assert_eq!(t.clientes.len(), 10);
        assert_eq!(t.clientes[0].1, 15.0);
        // Total do subconjunto: 15 + 14 + ... + 6
        assert_eq!(t.total, (6..=15).sum::<i32>() as f64);

        let tab = t.tabela();
        assert_eq!(tab.linhas.len(), 11);
        assert_eq!(tab.linhas.last().unwrap()[0], Valor::texto("Totalizador"));
    }

    #[test]
    fn test_base_vazia() {
        assert!(montar(&[], None, None).is_none());
    }
}
