//! Handler de exportação: recomputa a página pedida e devolve o pacote ZIP
//! (planilha de dados + gráficos SVG).

use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde_json::json;

use crate::analise;
use crate::export::{ItemExport, criar_pacote_zip, grafico_barras, grafico_evolucao, grafico_matriz};
use crate::models::RegistroVenda;

use super::paginas::{base_filtrada, filtros_da_query};
use super::sessao::{autenticado, resposta_nao_autenticado};

const NOME_PACOTE: &str = "Dashboard_Vendas_Export.zip";

fn itens_da_pagina(
    pagina: &str,
    base: &[RegistroVenda],
    qm: &HashMap<String, String>,
) -> Result<Option<Vec<ItemExport>>, Box<dyn std::error::Error>> {
    let itens = match pagina {
        "visao-geral" => match analise::visao_geral::montar(base) {
            None => None,
            Some(v) => Some(vec![
                ItemExport::tabela("Evolução Mensal", v.tabela_evolucao()),
                ItemExport::tabela("Faturamento por Emissora", v.tabela_por_emissora()),
                ItemExport::tabela("Faturamento por Executivo", v.tabela_por_executivo()),
                ItemExport::grafico("Evolução Mensal", grafico_evolucao(&v.evolucao)?),
                ItemExport::grafico(
                    "Faturamento por Emissora",
                    grafico_barras("Faturamento por emissora", &v.por_emissora)?,
                ),
                ItemExport::grafico(
                    "Faturamento por Executivo",
                    grafico_barras("Faturamento por executivo", &v.por_executivo)?,
                ),
            ]),
        },
        "clientes-faturamento" => analise::clientes::montar(base).map(|c| {
            vec![
                ItemExport::tabela(
                    "1.1 Clientes por Emissora",
                    c.clientes_por_emissora.tabela("Emissora"),
                ),
                ItemExport::tabela(
                    "1.2 Faturamento por Emissora",
                    c.faturamento_por_emissora.tabela("Emissora"),
                ),
                ItemExport::tabela(
                    "1.3 Faturamento por Executivo",
                    c.faturamento_por_executivo.tabela("Executivo"),
                ),
                ItemExport::tabela("1.4 Média por Cliente", c.tabela_media()),
                ItemExport::tabela("1.5 Total por Emissora", c.tabela_total_por_emissora()),
                ItemExport::tabela("1.6 Comparativo Mensal", c.tabela_mensal()),
            ]
        }),
        "perdas-ganhos" => analise::perdas_ganhos::montar(base).map(|p| {
            vec![
                ItemExport::tabela("2.1 Perdas", p.tabela_perdas()),
                ItemExport::tabela("2.2 Ganhos", p.tabela_ganhos()),
                ItemExport::tabela(
                    "2.3 Variação por Cliente",
                    p.variacao_por_cliente.tabela("Cliente"),
                ),
                ItemExport::tabela(
                    "2.4 Variação por Emissora",
                    p.variacao_por_emissora.tabela("Emissora"),
                ),
            ]
        }),
        "cruzamentos" => match analise::cruzamentos::montar(base) {
            None => None,
            Some(c) => {
                let mut itens = vec![
                    ItemExport::tabela("3.1 Exclusivos", c.tabela_exclusivos()),
                    ItemExport::tabela("3.2 Compartilhados", c.tabela_compartilhados()),
                    ItemExport::tabela("3.3 Top Compartilhados", c.tabela_top_compartilhados()),
                    ItemExport::tabela("3.4 Matriz Clientes", c.tabela_matriz_clientes()),
                    ItemExport::tabela("3.4 Matriz Faturamento", c.tabela_matriz_faturamento()),
                ];
                if let Some(m) = &c.matriz {
                    itens.push(ItemExport::grafico("3.4 Matriz", grafico_matriz(m)?));
                }
                Some(itens)
            }
        },
        "top10" => {
            let emissora = qm.get("emissora").map(|s| s.trim()).filter(|s| !s.is_empty());
            let ano = qm.get("ano").and_then(|s| s.trim().parse::<i32>().ok());
            match analise::top10::montar(base, emissora, ano) {
                None => None,
                Some(t) => {
                    let titulo = format!("Top 10 {} {}", t.emissora, t.ano);
                    let mut itens = vec![ItemExport::tabela("Top 10 Dados", t.tabela())];
                    if !t.clientes.is_empty() {
                        itens.push(ItemExport::grafico(
                            "Top 10",
                            grafico_barras(&titulo, &t.clientes)?,
                        ));
                    }
                    Some(itens)
                }
            }
        }
        _ => return Err(format!("Página desconhecida: '{}'", pagina).into()),
    };
    Ok(itens)
}

/// POST /exportar?pagina=...
/// Aceita os mesmos parâmetros de filtro das rotas de página.
pub async fn exportar_handler(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    if !autenticado(&req) {
        return resposta_nao_autenticado();
    }
    let qm = query.into_inner();
    let pagina = match qm.get("pagina") {
        Some(p) if !p.trim().is_empty() => p.trim().to_string(),
        _ => {
            return HttpResponse::BadRequest()
                .json(json!({"error": "Parâmetro 'pagina' é obrigatório."}));
        }
    };

    let filtros = filtros_da_query(&qm);
    let (base, _atualizado_em) = match base_filtrada(&filtros) {
        Ok(v) => v,
        Err(e) => return HttpResponse::NotFound().json(json!({"error": format!("{}", e)})),
    };

    let mut itens = match itens_da_pagina(&pagina, &base, &qm) {
        Ok(Some(itens)) => itens,
        Ok(None) => {
            return HttpResponse::Ok()
                .json(json!({"aviso": "Nenhuma tabela com dados foi gerada nesta página."}));
        }
        Err(e) => {
            return HttpResponse::BadRequest().json(json!({"error": format!("{}", e)}));
        }
    };

    // Seleção opcional de itens por rótulo (lista separada por vírgula)
    if let Some(selecionados) = qm.get("itens").filter(|s| !s.trim().is_empty()) {
        let nomes: Vec<String> = selecionados
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        itens.retain(|item| nomes.iter().any(|n| n == &item.nome));
        if itens.is_empty() {
            return HttpResponse::BadRequest()
                .json(json!({"error": "Selecione pelo menos um item."}));
        }
    }

    match criar_pacote_zip(&itens) {
        Ok(bytes) => HttpResponse::Ok()
            .content_type("application/zip")
            .append_header((
                actix_web::http::header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", NOME_PACOTE),
            ))
            .body(bytes),
        Err(e) => HttpResponse::InternalServerError()
            .json(json!({"error": format!("Erro ao gerar o pacote ZIP: {}", e)})),
    }
}
