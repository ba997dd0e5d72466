//! Pacote ZIP de exportação: a planilha de dados mais um SVG por gráfico.

use std::io::{Cursor, Write};

use zip::write::FileOptions;

use super::xlsx::{NOME_WORKBOOK, gerar_workbook, nome_seguro};
use crate::models::Tabela;

/// Um item exportável de uma página: tabela, gráfico ou ambos.
#[derive(Debug, Clone)]
pub struct ItemExport {
    pub nome: String,
    pub tabela: Option<Tabela>,
    pub grafico: Option<String>,
}

impl ItemExport {
    pub fn tabela(nome: &str, tabela: Tabela) -> ItemExport {
        ItemExport {
            nome: nome.to_string(),
            tabela: Some(tabela),
            grafico: None,
        }
    }

    pub fn grafico(nome: &str, svg: String) -> ItemExport {
        ItemExport {
            nome: nome.to_string(),
            tabela: None,
            grafico: Some(svg),
        }
    }
}

/// Monta o pacote em memória. Tabelas vazias são puladas; se nenhuma
/// tabela tiver dados a planilha não entra no pacote.
pub fn criar_pacote_zip(itens: &[ItemExport]) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let tabelas: Vec<(String, Tabela)> = itens
        .iter()
        .filter_map(|item| {
            item.tabela
                .as_ref()
                .filter(|t| !t.is_empty())
                .map(|t| (nome_seguro(&item.nome), t.clone()))
        })
        .collect();

    if !tabelas.is_empty() {
        let workbook = gerar_workbook(&tabelas)?;
        zip.start_file(NOME_WORKBOOK, options)?;
        zip.write_all(&workbook)?;
    }

    for item in itens {
        if let Some(svg) = item.grafico.as_ref().filter(|s| !s.is_empty()) {
            zip.start_file(format!("{}_Grafico.svg", nome_seguro(&item.nome)), options)?;
            zip.write_all(svg.as_bytes())?;
        }
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Valor;
    use std::io::Read;

    fn nomes_no_zip(bytes: &[u8]) -> Vec<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    fn tabela_exemplo() -> Tabela {
        let mut t = Tabela::nova(vec!["Cliente".to_string(), "Faturamento".to_string()]);
        t.push(vec![Valor::texto("X"), Valor::Numero(10.0)]);
        t
    }

    #[test]
    fn test_pacote_com_tabela_e_grafico() {
        let itens = vec![
            ItemExport::tabela("3.1 Exclusivos", tabela_exemplo()),
            ItemExport::grafico("3.4 Matriz", "<svg></svg>".to_string()),
        ];
        let bytes = criar_pacote_zip(&itens).expect("pacote gerado");
        let nomes = nomes_no_zip(&bytes);
        assert!(nomes.contains(&"Dados_Tabelas.xlsx".to_string()));
        assert!(nomes.contains(&"3.4 Matriz_Grafico.svg".to_string()));
    }

    #[test]
    fn test_tabelas_vazias_omitem_a_planilha() {
        let itens = vec![
            ItemExport::tabela("Sem dados", Tabela::vazia()),
            ItemExport::grafico("Grafico", "<svg></svg>".to_string()),
        ];
        let bytes = criar_pacote_zip(&itens).expect("pacote gerado");
        let nomes = nomes_no_zip(&bytes);
        assert_eq!(nomes, vec!["Grafico_Grafico.svg".to_string()]);
    }

    #[test]
    fn test_conteudo_do_svg_preservado() {
        let itens = vec![ItemExport::grafico("G", "<svg>abc</svg>".to_string())];
        let bytes = criar_pacote_zip(&itens).expect("pacote gerado");

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut arquivo = archive.by_name("G_Grafico.svg").unwrap();
        let mut conteudo = String::new();
        arquivo.read_to_string(&mut conteudo).unwrap();
        assert_eq!(conteudo, "<svg>abc</svg>");
    }
}
