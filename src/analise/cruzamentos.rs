//! Página "Cruzamentos & Interseções": clientes exclusivos vs.
//! compartilhados entre emissoras e matrizes de interseção.
//!
//! Aqui presença significa faturamento somado > 0 no par (cliente,
//! emissora), diferente da regra de Perdas & Ganhos.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{RegistroVenda, Tabela, Valor};

use super::TOTALIZADOR;

/// Linha das tabelas 3.1/3.2: uma emissora com a contagem de clientes e o
/// faturamento da categoria (exclusivo ou compartilhado).
#[derive(Debug, Clone, Serialize)]
pub struct LinhaEmissora {
    pub emissora: String,
    pub clientes: usize,
    pub faturamento: f64,
    /// Percentual sobre o faturamento total da própria emissora
    /// (zero quando o total não é positivo).
    pub pct: f64,
}

/// Matrizes simétricas de interseção entre emissoras, na mesma ordem de
/// `emissoras`. Diagonal = a própria emissora (contagem de clientes
/// presentes / faturamento total).
#[derive(Debug, Clone, Serialize)]
pub struct MatrizIntersecao {
    pub emissoras: Vec<String>,
    pub clientes: Vec<Vec<i64>>,
    pub faturamento: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Cruzamentos {
    pub exclusivos: Vec<LinhaEmissora>,
    pub exclusivos_total: LinhaEmissora,
    pub compartilhados: Vec<LinhaEmissora>,
    pub compartilhados_total: LinhaEmissora,
    /// Percentual dos totalizadores sobre o faturamento geral do período,
    /// indefinido quando esse total não é positivo.
    pub exclusivos_total_pct: Option<f64>,
    pub compartilhados_total_pct: Option<f64>,
    /// 3.3 Até 20 clientes presentes em 2+ emissoras, por faturamento
    /// somado no período inteiro, decrescente.
    pub top_compartilhados: Vec<(String, f64)>,
    /// 3.4 Presente apenas com 2+ emissoras na base.
    pub matriz: Option<MatrizIntersecao>,
}

fn pct_de(valor: f64, total: f64) -> f64 {
    if total > 0.0 { valor / total * 100.0 } else { 0.0 }
}

/// Monta a página a partir da base filtrada. `None` quando a base é vazia.
pub fn montar(base: &[RegistroVenda]) -> Option<Cruzamentos> {
    if base.is_empty() {
        return None;
    }

    // Agregado (cliente, emissora) -> faturamento somado
    let mut agg: BTreeMap<(String, String), f64> = BTreeMap::new();
    for r in base {
        *agg.entry((r.cliente.clone(), r.emissora.clone()))
            .or_insert(0.0) += r.faturamento;
    }

    let emissoras: Vec<String> = {
        let s: BTreeSet<&str> = agg.keys().map(|(_, e)| e.as_str()).collect();
        s.into_iter().map(str::to_string).collect()
    };

    // Emissoras onde o cliente está presente (faturamento > 0)
    let mut presenca: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for ((cliente, emissora), fat) in &agg {
        let entrada = presenca.entry(cliente.as_str()).or_default();
        if *fat > 0.0 {
            entrada.insert(emissora.as_str());
        }
    }

    let mut exclusivos = Vec::with_capacity(emissoras.len());
    let mut compartilhados = Vec::with_capacity(emissoras.len());
    let mut fat_total_geral = 0.0;

    for emissora in &emissoras {
        let mut cli_excl = 0usize;
        let mut fat_excl = 0.0;
        let mut cli_comp = 0usize;
        let mut fat_comp = 0.0;
        let mut fat_total = 0.0;

        for ((cliente, e), fat) in &agg {
            if e != emissora {
                continue;
            }
            fat_total += *fat;
            let emissoras_do_cliente = &presenca[cliente.as_str()];
            if !emissoras_do_cliente.contains(emissora.as_str()) {
                continue;
            }
            if emissoras_do_cliente.len() == 1 {
                cli_excl += 1;
                fat_excl += *fat;
            } else {
                cli_comp += 1;
                fat_comp += *fat;
            }
        }
        fat_total_geral += fat_total;

        exclusivos.push(LinhaEmissora {
            emissora: emissora.clone(),
            clientes: cli_excl,
            faturamento: fat_excl,
            pct: pct_de(fat_excl, fat_total),
        });
        compartilhados.push(LinhaEmissora {
            emissora: emissora.clone(),
            clientes: cli_comp,
            faturamento: fat_comp,
            pct: pct_de(fat_comp, fat_total),
        });
    }

    let ordena = |linhas: &mut Vec<LinhaEmissora>| {
        linhas.sort_by(|a, b| {
            b.faturamento
                .partial_cmp(&a.faturamento)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    };
    ordena(&mut exclusivos);
    ordena(&mut compartilhados);

    let totaliza = |linhas: &[LinhaEmissora]| {
        let fat: f64 = linhas.iter().map(|l| l.faturamento).sum();
        LinhaEmissora {
            emissora: TOTALIZADOR.to_string(),
            clientes: linhas.iter().map(|l| l.clientes).sum(),
            faturamento: fat,
            pct: pct_de(fat, fat_total_geral),
        }
    };
    let exclusivos_total = totaliza(&exclusivos);
    let compartilhados_total = totaliza(&compartilhados);

    let pct_total = |valor: f64| {
        if fat_total_geral > 0.0 {
            Some(valor / fat_total_geral * 100.0)
        } else {
            None
        }
    };
    let exclusivos_total_pct = pct_total(exclusivos_total.faturamento);
    let compartilhados_total_pct = pct_total(compartilhados_total.faturamento);

    // 3.3: faturamento do período inteiro dos clientes compartilhados
    let clientes_compartilhados: BTreeSet<&str> = presenca
        .iter()
        .filter(|(_, es)| es.len() >= 2)
        .map(|(c, _)| *c)
        .collect();
    let mut top_compartilhados: Vec<(String, f64)> = {
        let mut acc: BTreeMap<&str, f64> = BTreeMap::new();
        for r in base {
            if clientes_compartilhados.contains(r.cliente.as_str()) {
                *acc.entry(r.cliente.as_str()).or_insert(0.0) += r.faturamento;
            }
        }
        acc.into_iter().map(|(c, v)| (c.to_string(), v)).collect()
    };
    top_compartilhados.sort_by(|a, b| {
        b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal)
    });
    top_compartilhados.truncate(20);

    let matriz = if emissoras.len() >= 2 {
        Some(montar_matriz(&emissoras, &agg, &presenca))
    } else {
        None
    };

    Some(Cruzamentos {
        exclusivos,
        exclusivos_total,
        compartilhados,
        compartilhados_total,
        exclusivos_total_pct,
        compartilhados_total_pct,
        top_compartilhados,
        matriz,
    })
}

fn montar_matriz(
    emissoras: &[String],
    agg: &BTreeMap<(String, String), f64>,
    presenca: &BTreeMap<&str, BTreeSet<&str>>,
) -> MatrizIntersecao {
    let n = emissoras.len();
    let mut clientes = vec![vec![0i64; n]; n];
    let mut faturamento = vec![vec![0.0f64; n]; n];

    // Faturamento por emissora de cada cliente, com zero para ausências
    let valor_de = |cliente: &str, emissora: &str| {
        agg.get(&(cliente.to_string(), emissora.to_string()))
            .copied()
            .unwrap_or(0.0)
    };

    for i in 0..n {
        for j in (i + 1)..n {
            let (a, b) = (emissoras[i].as_str(), emissoras[j].as_str());
            let mut comuns = 0i64;
            let mut valor = 0.0;
            for (cliente, es) in presenca {
                if es.contains(a) && es.contains(b) {
                    comuns += 1;
                }
                // Valor em comum: o menor dos dois faturamentos, se positivo
                let menor = valor_de(cliente, a).min(valor_de(cliente, b));
                if menor > 0.0 {
                    valor += menor;
                }
            }
            clientes[i][j] = comuns;
            clientes[j][i] = comuns;
            faturamento[i][j] = valor;
            faturamento[j][i] = valor;
        }
        // Diagonal: a emissora consigo mesma
        let e = emissoras[i].as_str();
        clientes[i][i] = presenca.values().filter(|es| es.contains(e)).count() as i64;
        faturamento[i][i] = agg
            .iter()
            .filter(|((_, em), _)| em == e)
            .map(|(_, v)| *v)
            .sum();
    }

    MatrizIntersecao {
        emissoras: emissoras.to_vec(),
        clientes,
        faturamento,
    }
}

fn tabela_categoria(
    rotulo_clientes: &str,
    rotulo_fat: &str,
    linhas: &[LinhaEmissora],
    total: &LinhaEmissora,
    total_pct: Option<f64>,
) -> Tabela {
    let mut t = Tabela::nova(vec![
        "Emissora".to_string(),
        rotulo_clientes.to_string(),
        rotulo_fat.to_string(),
        "% Faturamento".to_string(),
    ]);
    if linhas.is_empty() {
        return t;
    }
    for l in linhas {
        t.push(vec![
            Valor::texto(l.emissora.clone()),
            Valor::Inteiro(l.clientes as i64),
            Valor::Numero(l.faturamento),
            Valor::Numero(l.pct),
        ]);
    }
    t.push(vec![
        Valor::texto(total.emissora.clone()),
        Valor::Inteiro(total.clientes as i64),
        Valor::Numero(total.faturamento),
        Valor::opcional(total_pct),
    ]);
    t
}

impl Cruzamentos {
    pub fn tabela_exclusivos(&self) -> Tabela {
        tabela_categoria(
            "Clientes Exclusivos",
            "Faturamento Exclusivo",
            &self.exclusivos,
            &self.exclusivos_total,
            self.exclusivos_total_pct,
        )
    }

    pub fn tabela_compartilhados(&self) -> Tabela {
        tabela_categoria(
            "Clientes Compartilhados",
            "Faturamento Compartilhado",
            &self.compartilhados,
            &self.compartilhados_total,
            self.compartilhados_total_pct,
        )
    }

    pub fn tabela_top_compartilhados(&self) -> Tabela {
        let mut t = Tabela::nova(vec!["Cliente".to_string(), "Faturamento".to_string()]);
        if self.top_compartilhados.is_empty() {
            return t;
        }
        for (cliente, v) in &self.top_compartilhados {
            t.push(vec![Valor::texto(cliente.clone()), Valor::Numero(*v)]);
        }
        let total: f64 = self.top_compartilhados.iter().map(|(_, v)| v).sum();
        t.push(vec![Valor::texto(TOTALIZADOR), Valor::Numero(total)]);
        t
    }

    /// Matriz de contagem de clientes em comum como tabela.
    pub fn tabela_matriz_clientes(&self) -> Tabela {
        match &self.matriz {
            None => Tabela::vazia(),
            Some(m) => {
                let mut t = tabela_matriz_cabecalho(&m.emissoras);
                for (emissora, linha) in m.emissoras.iter().zip(&m.clientes) {
                    let mut celulas = vec![Valor::texto(emissora.clone())];
                    celulas.extend(linha.iter().map(|v| Valor::Inteiro(*v)));
                    t.push(celulas);
                }
                t
            }
        }
    }

    /// Matriz de faturamento em comum como tabela.
    pub fn tabela_matriz_faturamento(&self) -> Tabela {
        match &self.matriz {
            None => Tabela::vazia(),
            Some(m) => {
                let mut t = tabela_matriz_cabecalho(&m.emissoras);
                for (emissora, linha) in m.emissoras.iter().zip(&m.faturamento) {
                    let mut celulas = vec![Valor::texto(emissora.clone())];
                    celulas.extend(linha.iter().map(|v| Valor::Numero(*v)));
                    t.push(celulas);
                }
                t
            }
        }
    }
}

fn tabela_matriz_cabecalho(emissoras: &[String]) -> Tabela {
    let mut colunas = vec!["Emissora".to_string()];
    colunas.extend(emissoras.iter().cloned());
    Tabela::nova(colunas)
}
