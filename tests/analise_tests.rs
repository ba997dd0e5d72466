// Pipeline completo: planilha crua -> base normalizada -> filtros -> páginas

use chrono::Datelike;

use painel_vendas::analise;
use painel_vendas::excel::TabelaBruta;
use painel_vendas::filtros::aplicar_filtros;
use painel_vendas::models::SelecaoFiltros;
use painel_vendas::normalizar::normalizar_base;

fn tabela_exemplo() -> TabelaBruta {
    TabelaBruta {
        colunas: vec![
            "Empresa".to_string(),
            "DESCRIÇÃO".to_string(),
            "CONTATO COML.".to_string(),
            "VALOR".to_string(),
            "REF.".to_string(),
        ],
        linhas: vec![
            // três formatos de data: DD/MM/YYYY, ISO e serial de planilha
            vec![
                "TV Azul".to_string(),
                "X".to_string(),
                "Ana".to_string(),
                "R$ 100,00".to_string(),
                "15/01/2023".to_string(),
            ],
            vec![
                "TV Azul".to_string(),
                "X".to_string(),
                "Ana".to_string(),
                "R$ 50,00".to_string(),
                "2024-01-10".to_string(),
            ],
            vec![
                "TV Verde".to_string(),
                "Y".to_string(),
                "Beto".to_string(),
                "R$ 200,00".to_string(),
                "45323".to_string(), // 01/02/2024
            ],
        ],
    }
}

#[test]
fn test_normalizacao_com_aliases_e_formatos_de_data() {
    let base = normalizar_base(&tabela_exemplo()).expect("base válida");
    assert_eq!(base.len(), 3);

    // Texto é capitalizado palavra a palavra na normalização
    assert_eq!(base[0].emissora, "Tv Azul");
    assert_eq!(base[0].cliente, "X");
    assert_eq!(base[0].executivo, "Ana");
    assert_eq!(base[0].faturamento, 100.0);
    assert_eq!((base[0].ano, base[0].mes), (2023, 1));

    assert_eq!((base[1].ano, base[1].mes), (2024, 1));

    // Serial 45323 resolve para 01/02/2024
    assert_eq!(base[2].data_ref.year(), 2024);
    assert_eq!(base[2].data_ref.month(), 2);
    assert_eq!(base[2].mes_label, "Fev/24");
}

#[test]
fn test_filtros_compoem_por_intersecao() {
    let base = normalizar_base(&tabela_exemplo()).expect("base válida");

    let mut filtros = SelecaoFiltros::default();
    filtros.anos = vec![2024];
    filtros.emissoras = vec!["Tv Azul".to_string()];

    let filtrada = aplicar_filtros(&base, &filtros);
    assert_eq!(filtrada.len(), 1);
    assert_eq!(filtrada[0].faturamento, 50.0);

    // Intervalo de meses corta o registro de fevereiro
    let mut so_janeiro = SelecaoFiltros::default();
    so_janeiro.mes_fim = 1;
    let filtrada = aplicar_filtros(&base, &so_janeiro);
    assert_eq!(filtrada.len(), 2);
}

#[test]
fn test_visao_geral_do_pipeline() {
    let base = normalizar_base(&tabela_exemplo()).expect("base válida");
    let v = analise::visao_geral::montar(&base).expect("base não vazia");

    assert_eq!((v.ano_base, v.ano_comp), (2023, 2024));
    assert_eq!(v.total_base, 100.0);
    assert_eq!(v.total_comp, 250.0);
    assert_eq!(v.delta_pct, Some(150.0));
}

#[test]
fn test_perdas_ganhos_do_pipeline() {
    let base = normalizar_base(&tabela_exemplo()).expect("base válida");
    let p = analise::perdas_ganhos::montar(&base).expect("base não vazia");

    // X permanece nos dois anos; Y entra em 2024 com 200
    assert!(p.perdas.is_empty());
    assert_eq!(p.ganhos, vec![("Y".to_string(), 200.0)]);

    let azul = p
        .variacao_por_emissora
        .linhas
        .iter()
        .find(|l| l.chave == "Tv Azul")
        .expect("emissora presente");
    assert_eq!(azul.delta, -50.0);
    assert_eq!(azul.delta_pct, Some(-50.0));
}

#[test]
fn test_top10_do_pipeline() {
    let base = normalizar_base(&tabela_exemplo()).expect("base válida");
    let t = analise::top10::montar(&base, None, None).expect("base não vazia");

    // Padrão: primeira emissora em ordem alfabética, ano mais recente
    assert_eq!(t.emissora, "Tv Azul");
    assert_eq!(t.ano, 2024);
    assert_eq!(t.clientes, vec![("X".to_string(), 50.0)]);
}

#[test]
fn test_linhas_sem_data_sao_descartadas_em_silencio() {
    let mut tabela = tabela_exemplo();
    tabela.linhas.push(vec![
        "TV Azul".to_string(),
        "Z".to_string(),
        "Ana".to_string(),
        "R$ 10,00".to_string(),
        "sem data".to_string(),
    ]);

    let base = normalizar_base(&tabela).expect("base válida");
    assert_eq!(base.len(), 3);
    assert!(base.iter().all(|r| r.cliente != "Z"));
}

#[test]
fn test_valor_ilegivel_vira_zero() {
    let mut tabela = tabela_exemplo();
    tabela.linhas.push(vec![
        "TV Azul".to_string(),
        "W".to_string(),
        "Ana".to_string(),
        "não é número".to_string(),
        "05/03/2024".to_string(),
    ]);

    let base = normalizar_base(&tabela).expect("base válida");
    let w = base.iter().find(|r| r.cliente == "W").expect("linha mantida");
    assert_eq!(w.faturamento, 0.0);
}
