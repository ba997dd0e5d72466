//! Módulo `excel`: leitura da base de vendas e cache em memória.
//!
//! Submódulos:
//! - `io`: helpers de leitura/parseo de Excel (calamine)
//! - `cache`: cache da base normalizada, invalidado por mtime

mod io;

pub mod cache;

pub use cache::carregar_base_principal;
pub use io::{TabelaBruta, cell_to_string, ler_tabela_bruta, normalizar_cabecalho};

use std::path::PathBuf;

/// Nome do arquivo gravado pelo endpoint de upload.
pub const ARQUIVO_UPLOAD: &str = "temp_data_uploaded.xlsx";

/// Resolve o diretório de dados. Ordem: variável de ambiente
/// `PAINEL_DATA_DIR`, depois `data/` relativo ao diretório de trabalho.
pub fn diretorio_dados() -> PathBuf {
    if let Ok(path) = std::env::var("PAINEL_DATA_DIR") {
        let p = PathBuf::from(path);
        if p.exists() {
            return p;
        }
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    cwd.join("data")
}

/// Localiza a planilha de vendas dentro do diretório de dados.
/// Prefere o arquivo enviado por upload; senão, o primeiro `.xlsx`
/// em ordem alfabética.
pub fn localizar_base() -> Option<PathBuf> {
    let dir = diretorio_dados();
    let upload = dir.join(ARQUIVO_UPLOAD);
    if upload.exists() {
        return Some(upload);
    }

    let mut candidatos: Vec<PathBuf> = std::fs::read_dir(&dir)
        .ok()?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("xlsx"))
                .unwrap_or(false)
        })
        .collect();
    candidatos.sort();
    candidatos.into_iter().next()
}
