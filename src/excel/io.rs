//! Helpers de leitura de Excel via calamine.

use calamine::{Data, Reader, open_workbook_auto};
use std::path::Path;

/// Tabela crua lida da planilha: primeira linha como cabeçalho,
/// células convertidas para String sem interpretação.
#[derive(Debug, Clone)]
pub struct TabelaBruta {
    pub colunas: Vec<String>,
    pub linhas: Vec<Vec<String>>,
}

/// Converte um `Data` de calamine para String. Floats "inteiros" perdem o
/// `.0` para que seriais de data ("44197") e códigos fiquem legíveis.
pub fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if (f.floor() - f).abs() < f64::EPSILON {
                format!("{}", *f as i64)
            } else {
                format!("{}", f)
            }
        }
        Data::Int(i) => format!("{}", i),
        Data::Bool(b) => format!("{}", b),
        Data::Empty => String::new(),
        Data::Error(_) => String::new(),
        Data::DateTime(s) => s.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Normaliza um cabeçalho para comparação: minúsculas, sem espaços nem acentos
/// comuns de planilhas legadas ("DESCRIÇÃO" ~ "descricao").
pub fn normalizar_cabecalho(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' | 'õ' => 'o',
            'ú' => 'u',
            'ç' => 'c',
            outro => outro,
        })
        .collect()
}

/// Lê a primeira planilha (ou a de nome indicado) como `TabelaBruta`.
/// A primeira linha não vazia é tratada como cabeçalho.
pub fn ler_tabela_bruta<P: AsRef<Path>>(
    caminho: P,
    nome_aba: Option<&str>,
) -> Result<TabelaBruta, Box<dyn std::error::Error>> {
    let mut workbook = open_workbook_auto(&caminho)?;

    let nomes = workbook.sheet_names().to_owned();
    let aba = match nome_aba {
        Some(n) => nomes
            .iter()
            .find(|s| s.as_str() == n)
            .cloned()
            .unwrap_or_else(|| nomes.first().cloned().unwrap_or_default()),
        None => nomes.first().cloned().unwrap_or_default(),
    };
    if aba.is_empty() {
        return Err("planilha sem abas".into());
    }

    let range = workbook.worksheet_range(&aba)?;

    let mut iter = range.rows();
    let colunas = loop {
        match iter.next() {
            Some(r) if r.iter().any(|c| !cell_to_string(c).is_empty()) => {
                break r.iter().map(cell_to_string).collect::<Vec<String>>();
            }
            Some(_) => continue,
            None => return Err(format!("aba '{}' vazia", aba).into()),
        }
    };

    let mut linhas: Vec<Vec<String>> = Vec::new();
    for r in iter {
        let linha: Vec<String> = r.iter().map(cell_to_string).collect();
        if linha.iter().all(|c| c.is_empty()) {
            continue;
        }
        linhas.push(linha);
    }

    Ok(TabelaBruta { colunas, linhas })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizar_cabecalho() {
        assert_eq!(normalizar_cabecalho("DESCRIÇÃO"), "descricao");
        assert_eq!(normalizar_cabecalho("CONTATO COML."), "contatocoml.");
        assert_eq!(normalizar_cabecalho("  Mês "), "mes");
        assert_eq!(normalizar_cabecalho("REF."), "ref.");
    }

    #[test]
    fn test_cell_to_string_float_inteiro() {
        assert_eq!(cell_to_string(&Data::Float(44197.0)), "44197");
        assert_eq!(cell_to_string(&Data::Float(12.5)), "12.5");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }
}
