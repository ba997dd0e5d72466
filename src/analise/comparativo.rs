//! Template comum de comparação anual: agrupa por uma dimensão, pivota os
//! dois anos de comparação em colunas, deriva Δ e Δ% e anexa o Totalizador.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use super::{TOTALIZADOR, delta_pct};
use crate::models::{RegistroVenda, Tabela, Valor};

/// Métrica agregada por (dimensão, ano).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metrica {
    /// Soma de faturamento.
    SomaFaturamento,
    /// Contagem de clientes distintos.
    ClientesUnicos,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinhaComparativo {
    pub chave: String,
    pub valor_base: f64,
    pub valor_comp: f64,
    pub delta: f64,
    pub delta_pct: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Comparativo {
    pub ano_base: i32,
    pub ano_comp: i32,
    pub linhas: Vec<LinhaComparativo>,
    /// Totais recomputados das somas das colunas, nunca soma dos Δ% por linha.
    pub total: LinhaComparativo,
    #[serde(skip)]
    metrica: Metrica,
}

fn linha(chave: String, valor_base: f64, valor_comp: f64) -> LinhaComparativo {
    let delta = valor_comp - valor_base;
    LinhaComparativo {
        chave,
        valor_base,
        valor_comp,
        delta,
        delta_pct: delta_pct(valor_base, delta),
    }
}

/// Agrupa `base` pela dimensão extraída por `chave_de`, somando a métrica
/// por ano; anos ausentes em uma chave valem zero. Linhas em ordem
/// alfabética da chave; o Totalizador é sempre a última linha.
pub fn comparativo_anual(
    base: &[RegistroVenda],
    ano_base: i32,
    ano_comp: i32,
    chave_de: impl for<'a> Fn(&'a RegistroVenda) -> &'a str,
    metrica: Metrica,
) -> Comparativo {
    // No colapso ano_base == ano_comp os dois ramos acumulam o mesmo valor,
    // então as colunas saem idênticas e Δ = 0 sem caso especial.
    let linhas: Vec<LinhaComparativo> = match metrica {
        Metrica::SomaFaturamento => {
            let mut acc: BTreeMap<String, (f64, f64)> = BTreeMap::new();
            for r in base {
                let entrada = acc.entry(chave_de(r).to_string()).or_insert((0.0, 0.0));
                if r.ano == ano_base {
                    entrada.0 += r.faturamento;
                }
                if r.ano == ano_comp {
                    entrada.1 += r.faturamento;
                }
            }
            acc.into_iter()
                .map(|(chave, (a, b))| linha(chave, a, b))
                .collect()
        }
        Metrica::ClientesUnicos => {
            let mut acc: BTreeMap<String, (HashSet<String>, HashSet<String>)> = BTreeMap::new();
            for r in base {
                let entrada = acc.entry(chave_de(r).to_string()).or_default();
                if r.ano == ano_base {
                    entrada.0.insert(r.cliente.clone());
                }
                if r.ano == ano_comp {
                    entrada.1.insert(r.cliente.clone());
                }
            }
            acc.into_iter()
                .map(|(chave, (a, b))| linha(chave, a.len() as f64, b.len() as f64))
                .collect()
        }
    };

    let total_base: f64 = linhas.iter().map(|l| l.valor_base).sum();
    let total_comp: f64 = linhas.iter().map(|l| l.valor_comp).sum();
    let total = linha(TOTALIZADOR.to_string(), total_base, total_comp);

    Comparativo {
        ano_base,
        ano_comp,
        linhas,
        total,
        metrica,
    }
}

impl Comparativo {
    pub fn is_empty(&self) -> bool {
        self.linhas.is_empty()
    }

    /// Converte para a tabela de exibição/exportação. O Totalizador entra
    /// como última linha, depois de qualquer ordenação. Com um ano só na
    /// base, o ano aparece uma única vez, sem Δ nem Δ%.
    pub fn tabela(&self, rotulo_dimensao: &str) -> Tabela {
        if self.ano_base == self.ano_comp {
            let mut t = Tabela::nova(vec![
                rotulo_dimensao.to_string(),
                self.ano_base.to_string(),
            ]);
            if self.linhas.is_empty() {
                return t;
            }
            for l in self.linhas.iter().chain(std::iter::once(&self.total)) {
                let v = match self.metrica {
                    Metrica::ClientesUnicos => Valor::Inteiro(l.valor_comp as i64),
                    Metrica::SomaFaturamento => Valor::Numero(l.valor_comp),
                };
                t.push(vec![Valor::texto(l.chave.clone()), v]);
            }
            return t;
        }

        let mut t = Tabela::nova(vec![
            rotulo_dimensao.to_string(),
            self.ano_base.to_string(),
            self.ano_comp.to_string(),
            "Δ".to_string(),
            "Δ%".to_string(),
        ]);
        if self.linhas.is_empty() {
            return t;
        }
        for l in self.linhas.iter().chain(std::iter::once(&self.total)) {
            let (a, b, d) = match self.metrica {
                Metrica::ClientesUnicos => (
                    Valor::Inteiro(l.valor_base as i64),
                    Valor::Inteiro(l.valor_comp as i64),
                    Valor::Inteiro(l.delta as i64),
                ),
                Metrica::SomaFaturamento => (
                    Valor::Numero(l.valor_base),
                    Valor::Numero(l.valor_comp),
                    Valor::Numero(l.delta),
                ),
            };
            t.push(vec![
                Valor::texto(l.chave.clone()),
                a,
                b,
                d,
                Valor::opcional(l.delta_pct),
            ]);
        }
        t
    }
}
