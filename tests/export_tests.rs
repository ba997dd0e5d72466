// Exportação: workbook, gráficos SVG e pacote ZIP

use std::io::{Cursor, Read};

use calamine::{Reader, open_workbook_auto};

use painel_vendas::export::{
    ItemExport, criar_pacote_zip, gerar_workbook, grafico_barras, nome_seguro,
};
use painel_vendas::models::{Tabela, Valor};

fn tabela_exemplo() -> Tabela {
    let mut t = Tabela::nova(vec!["Cliente".to_string(), "Faturamento".to_string()]);
    t.push(vec![Valor::texto("X"), Valor::Numero(100.0)]);
    t.push(vec![Valor::texto("Totalizador"), Valor::Numero(100.0)]);
    t
}

fn nomes_no_zip(bytes: &[u8]) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

#[test]
fn test_workbook_roundtrip_via_calamine() {
    let bytes = gerar_workbook(&[("Top 10".to_string(), tabela_exemplo())])
        .expect("workbook gerado");

    // Grava num temporário e relê com calamine
    let caminho = std::env::temp_dir().join(format!(
        "painel_teste_roundtrip_{}.xlsx",
        std::process::id()
    ));
    std::fs::write(&caminho, &bytes).expect("grava temporário");

    let mut workbook = open_workbook_auto(&caminho).expect("abre workbook");
    assert_eq!(workbook.sheet_names().to_owned(), vec!["Top 10".to_string()]);

    let range = workbook
        .worksheet_range("Top 10")
        .expect("aba existe");
    let cabecalho: Vec<String> = range
        .rows()
        .next()
        .unwrap()
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(cabecalho, vec!["Cliente", "Faturamento"]);

    let _ = std::fs::remove_file(&caminho);
}

#[test]
fn test_pacote_completo_com_grafico() {
    let svg = grafico_barras("Top clientes", &[("X".to_string(), 100.0)]).expect("svg gerado");
    let itens = vec![
        ItemExport::tabela("Top 10 (Dados)", tabela_exemplo()),
        ItemExport::grafico("Top 10", svg),
    ];

    let bytes = criar_pacote_zip(&itens).expect("pacote gerado");
    let nomes = nomes_no_zip(&bytes);
    assert!(nomes.contains(&"Dados_Tabelas.xlsx".to_string()));
    assert!(nomes.contains(&"Top 10_Grafico.svg".to_string()));

    // O SVG dentro do pacote continua sendo um SVG
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut arquivo = archive.by_name("Top 10_Grafico.svg").unwrap();
    let mut conteudo = String::new();
    arquivo.read_to_string(&mut conteudo).unwrap();
    assert!(conteudo.contains("<svg"));
}

#[test]
fn test_pacote_sem_tabelas_omite_a_planilha() {
    let itens = vec![
        ItemExport::tabela("Vazia", Tabela::vazia()),
        ItemExport::grafico("So Grafico", "<svg></svg>".to_string()),
    ];
    let bytes = criar_pacote_zip(&itens).expect("pacote gerado");
    assert_eq!(nomes_no_zip(&bytes), vec!["So Grafico_Grafico.svg".to_string()]);
}

#[test]
fn test_nomes_de_aba_saneados() {
    assert_eq!(nome_seguro("3.4 Matriz: A/B"), "3.4 Matriz AB");
    assert!(nome_seguro(&"Nome muito comprido para caber numa aba".to_string()).len() <= 31);
}
