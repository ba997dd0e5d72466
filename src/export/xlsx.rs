//! Geração da planilha de dados exportada (uma aba por tabela).

use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::{Tabela, Valor};

/// Nome fixo da planilha dentro do pacote ZIP.
pub const NOME_WORKBOOK: &str = "Dados_Tabelas.xlsx";

/// Nome de aba aceito pelo Excel: sem `:` nem `/`, no máximo 31 caracteres.
pub fn nome_seguro(nome: &str) -> String {
    nome.chars()
        .filter(|c| *c != ':' && *c != '/')
        .take(31)
        .collect()
}

static SEQ: AtomicU64 = AtomicU64::new(0);

fn escrever_aba(sheet: &mut umya_spreadsheet::Worksheet, tabela: &Tabela) {
    for (col, titulo) in tabela.colunas.iter().enumerate() {
        sheet
            .get_cell_mut((col as u32 + 1, 1))
            .set_value(titulo.clone());
    }
    for (lin, linha) in tabela.linhas.iter().enumerate() {
        for (col, valor) in linha.iter().enumerate() {
            let cell = sheet.get_cell_mut((col as u32 + 1, lin as u32 + 2));
            match valor {
                Valor::Texto(s) => {
                    cell.set_value(s.clone());
                }
                Valor::Inteiro(v) => {
                    cell.set_value_number(*v as f64);
                }
                Valor::Numero(v) => {
                    cell.set_value_number(*v);
                }
                Valor::Vazio => {}
            }
        }
    }
}

/// Gera o workbook com uma aba por tabela, na ordem recebida. Os nomes já
/// devem vir saneados por `nome_seguro`.
pub fn gerar_workbook(
    tabelas: &[(String, Tabela)],
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut book = umya_spreadsheet::new_file();

    for (i, (nome, tabela)) in tabelas.iter().enumerate() {
        if i == 0 {
            // Reaproveita a aba criada por new_file
            let sheet = book
                .get_sheet_mut(&0)
                .ok_or("Workbook sem aba inicial")?;
            sheet.set_name(nome.clone());
            escrever_aba(sheet, tabela);
        } else {
            let sheet = book.new_sheet(nome)?;
            escrever_aba(sheet, tabela);
        }
    }

    // umya grava em caminho; usa um arquivo temporário e lê os bytes
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    let caminho = std::env::temp_dir().join(format!(
        "painel_export_{}_{}.xlsx",
        std::process::id(),
        seq
    ));
    umya_spreadsheet::writer::xlsx::write(&book, &caminho)
        .map_err(|e| format!("Falha ao gravar a planilha exportada: {e}"))?;
    let bytes = std::fs::read(&caminho)?;
    let _ = std::fs::remove_file(&caminho);
    Ok(bytes)
}
