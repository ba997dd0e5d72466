// Estruturas de dados principais

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Uma linha da base canônica de vendas, já normalizada.
/// `faturamento` pode ser negativo (estornos/ajustes são permitidos).
#[derive(Debug, Clone, Serialize)]
pub struct RegistroVenda {
    pub emissora: String,
    pub cliente: String,
    pub executivo: String,
    pub faturamento: f64,
    pub data_ref: NaiveDate,
    pub ano: i32,
    pub mes: u32,
    /// Rótulo curto "Jan/24" derivado de `data_ref`.
    pub mes_label: String,
}

/// Seleção de filtros vinda da barra lateral (e persistida em cookie).
///
/// Listas vazias significam "sem restrição" naquela dimensão.
/// `mes_ini`/`mes_fim` delimitam o intervalo de meses (1..=12), inclusivo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelecaoFiltros {
    #[serde(default)]
    pub anos: Vec<i32>,
    #[serde(default)]
    pub emissoras: Vec<String>,
    #[serde(default)]
    pub executivos: Vec<String>,
    #[serde(default)]
    pub clientes: Vec<String>,
    #[serde(default = "mes_ini_padrao")]
    pub mes_ini: u32,
    #[serde(default = "mes_fim_padrao")]
    pub mes_fim: u32,
}

fn mes_ini_padrao() -> u32 {
    1
}

fn mes_fim_padrao() -> u32 {
    12
}

impl Default for SelecaoFiltros {
    fn default() -> Self {
        SelecaoFiltros {
            anos: Vec::new(),
            emissoras: Vec::new(),
            executivos: Vec::new(),
            clientes: Vec::new(),
            mes_ini: 1,
            mes_fim: 12,
        }
    }
}

/// Valor de uma célula nas tabelas de visualização/exportação.
/// `Vazio` serializa como `null` e é exibido como "—" no front.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Valor {
    Texto(String),
    Inteiro(i64),
    Numero(f64),
    Vazio,
}

impl Valor {
    pub fn texto<S: Into<String>>(s: S) -> Valor {
        Valor::Texto(s.into())
    }

    /// Número opcional: `None` vira `Vazio` (exibido "—").
    pub fn opcional(v: Option<f64>) -> Valor {
        match v {
            Some(p) => Valor::Numero(p),
            None => Valor::Vazio,
        }
    }
}

/// Tabela genérica de saída de uma agregação: cabeçalho + linhas.
/// É o que vira uma aba do Excel exportado e o corpo das tabelas do front.
#[derive(Debug, Clone, Serialize)]
pub struct Tabela {
    pub colunas: Vec<String>,
    pub linhas: Vec<Vec<Valor>>,
}

impl Tabela {
    pub fn nova(colunas: Vec<String>) -> Tabela {
        Tabela {
            colunas,
            linhas: Vec::new(),
        }
    }

    pub fn vazia() -> Tabela {
        Tabela {
            colunas: Vec::new(),
            linhas: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.linhas.is_empty()
    }

    pub fn push(&mut self, linha: Vec<Valor>) {
        self.linhas.push(linha);
    }
}
