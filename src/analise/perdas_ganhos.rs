//! Página "Perdas & Ganhos": diferença de conjuntos de clientes entre o ano
//! base e o ano de comparação, mais os comparativos de variação.
//!
//! Presença = ter qualquer linha no ano, mesmo com faturamento zero.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::{Comparativo, Metrica, TOTALIZADOR, anos_comparacao, comparativo_anual};
use crate::models::{RegistroVenda, Tabela, Valor};

#[derive(Debug, Clone, Serialize)]
pub struct PerdasGanhos {
    pub ano_base: i32,
    pub ano_comp: i32,
    /// Clientes do ano base ausentes no ano de comparação, com o
    /// faturamento somado no ano base, decrescente.
    pub perdas: Vec<(String, f64)>,
    /// Clientes novos no ano de comparação, com o faturamento somado
    /// nesse ano, decrescente.
    pub ganhos: Vec<(String, f64)>,
    pub perdas_valor: f64,
    pub ganhos_valor: f64,
    /// Percentual do total do ano base/comparação; zero quando o total
    /// do ano não é positivo.
    pub perdas_pct: f64,
    pub ganhos_pct: f64,
    pub variacao_por_cliente: Comparativo,
    pub variacao_por_emissora: Comparativo,
}

fn pct_do_total(total: f64, valor: f64) -> f64 {
    if total > 0.0 { valor / total * 100.0 } else { 0.0 }
}

fn soma_clientes_do_ano(
    base: &[RegistroVenda],
    ano: i32,
    clientes: &BTreeSet<String>,
) -> Vec<(String, f64)> {
    let mut acc: BTreeMap<String, f64> = clientes.iter().map(|c| (c.clone(), 0.0)).collect();
    for r in base.iter().filter(|r| r.ano == ano) {
        if let Some(v) = acc.get_mut(&r.cliente) {
            *v += r.faturamento;
        }
    }
    let mut pares: Vec<(String, f64)> = acc.into_iter().collect();
    pares.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    pares
}

/// Monta a página a partir da base filtrada. `None` quando não há anos.
pub fn montar(base: &[RegistroVenda]) -> Option<PerdasGanhos> {
    let (ano_base, ano_comp) = anos_comparacao(base)?;

    let clientes_base: BTreeSet<String> = base
        .iter()
        .filter(|r| r.ano == ano_base)
        .map(|r| r.cliente.clone())
        .collect();
    let clientes_comp: BTreeSet<String> = base
        .iter()
        .filter(|r| r.ano == ano_comp)
        .map(|r| r.cliente.clone())
        .collect();

    let perdidos: BTreeSet<String> = clientes_base.difference(&clientes_comp).cloned().collect();
    let ganhados: BTreeSet<String> = clientes_comp.difference(&clientes_base).cloned().collect();

    let perdas = soma_clientes_do_ano(base, ano_base, &perdidos);
    let ganhos = soma_clientes_do_ano(base, ano_comp, &ganhados);

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

    let perdas_valor: f64 = perdas.iter().map(|(_, v)| v).sum();
    let ganhos_valor: f64 = ganhos.iter().map(|(_, v)| v).sum();

    Some(PerdasGanhos {
        ano_base,
        ano_comp,
        perdas,
        ganhos,
        perdas_valor,
        ganhos_valor,
        perdas_pct: pct_do_total(total_base, perdas_valor),
        ganhos_pct: pct_do_total(total_comp, ganhos_valor),
        variacao_por_cliente: comparativo_anual(
            base,
            ano_base,
            ano_comp,
            |r| &r.cliente,
            Metrica::SomaFaturamento,
        ),
        variacao_por_emissora: comparativo_anual(
            base,
            ano_base,
            ano_comp,
            |r| &r.emissora,
            Metrica::SomaFaturamento,
        ),
    })
}

fn tabela_clientes(pares: &[(String, f64)]) -> Tabela {
    let mut t = Tabela::nova(vec!["Cliente".to_string(), "Faturamento".to_string()]);
    if pares.is_empty() {
        return t;
    }
    for (cliente, v) in pares {
        t.push(vec![Valor::texto(cliente.clone()), Valor::Numero(*v)]);
    }
    let total: f64 = pares.iter().map(|(_, v)| v).sum();
    t.push(vec![Valor::texto(TOTALIZADOR), Valor::Numero(total)]);
    t
}

impl PerdasGanhos {
    pub fn tabela_perdas(&self) -> Tabela {
        tabela_clientes(&self.perdas)
    }

    pub fn tabela_ganhos(&self) -> Tabela {
        tabela_clientes(&self.ganhos)
    }
}
