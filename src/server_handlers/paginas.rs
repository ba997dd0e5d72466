//! Handlers das páginas do painel: cada rota devolve os dados agregados e
//! as tabelas prontas da página correspondente.

use std::collections::{BTreeSet, HashMap};

use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde_json::json;

use crate::analise;
use crate::excel::cache::carregar_base_principal;
use crate::filtros::aplicar_filtros;
use crate::models::{RegistroVenda, SelecaoFiltros};

use super::sessao::{autenticado, resposta_nao_autenticado};

/// Converte 'a,b,c' -> Vec<String>, ignorando entradas vazias.
fn split_list(s_opt: Option<&String>) -> Vec<String> {
    match s_opt {
        Some(s) if !s.trim().is_empty() => s
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// Monta a seleção de filtros a partir da query string. Listas ausentes
/// significam "sem restrição"; meses fora de 1..=12 caem no padrão.
pub fn filtros_da_query(qm: &HashMap<String, String>) -> SelecaoFiltros {
    let mes = |chave: &str, padrao: u32| {
        qm.get(chave)
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|m| (1..=12).contains(m))
            .unwrap_or(padrao)
    };
    SelecaoFiltros {
        anos: split_list(qm.get("anos"))
            .iter()
            .filter_map(|s| s.parse::<i32>().ok())
            .collect(),
        emissoras: split_list(qm.get("emissoras")),
        executivos: split_list(qm.get("executivos")),
        clientes: split_list(qm.get("clientes")),
        mes_ini: mes("mes_ini", 1),
        mes_fim: mes("mes_fim", 12),
    }
}

/// Carrega a base e aplica a seleção; devolve também o carimbo da base.
pub fn base_filtrada(
    filtros: &SelecaoFiltros,
) -> Result<(Vec<RegistroVenda>, String), Box<dyn std::error::Error>> {
    let (registros, atualizado_em) = carregar_base_principal()?;
    Ok((aplicar_filtros(&registros, filtros), atualizado_em))
}

fn erro_base(e: Box<dyn std::error::Error>) -> HttpResponse {
    HttpResponse::NotFound().json(json!({"error": format!("{}", e)}))
}

fn aviso_sem_dados(atualizado_em: &str) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "aviso": "Sem dados para os filtros selecionados.",
        "atualizado_em": atualizado_em,
    }))
}

/// GET /paginas/visao-geral
pub async fn visao_geral_handler(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    if !autenticado(&req) {
        return resposta_nao_autenticado();
    }
    let filtros = filtros_da_query(&query.into_inner());
    let (base, atualizado_em) = match base_filtrada(&filtros) {
        Ok(v) => v,
        Err(e) => return erro_base(e),
    };
    match analise::visao_geral::montar(&base) {
        None => aviso_sem_dados(&atualizado_em),
        Some(v) => HttpResponse::Ok().json(json!({
            "atualizado_em": atualizado_em,
            "dados": v,
            "tabelas": {
                "evolucao": v.tabela_evolucao(),
                "por_emissora": v.tabela_por_emissora(),
                "por_executivo": v.tabela_por_executivo(),
            },
        })),
    }
}

/// GET /paginas/clientes-faturamento
pub async fn clientes_handler(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    if !autenticado(&req) {
        return resposta_nao_autenticado();
    }
    let filtros = filtros_da_query(&query.into_inner());
    let (base, atualizado_em) = match base_filtrada(&filtros) {
        Ok(v) => v,
        Err(e) => return erro_base(e),
    };
    match analise::clientes::montar(&base) {
        None => aviso_sem_dados(&atualizado_em),
        Some(c) => HttpResponse::Ok().json(json!({
            "atualizado_em": atualizado_em,
            "dados": c,
            "tabelas": {
                "clientes_por_emissora": c.clientes_por_emissora.tabela("Emissora"),
                "faturamento_por_emissora": c.faturamento_por_emissora.tabela("Emissora"),
                "faturamento_por_executivo": c.faturamento_por_executivo.tabela("Executivo"),
                "media_por_cliente": c.tabela_media(),
                "total_por_emissora": c.tabela_total_por_emissora(),
                "mensal": c.tabela_mensal(),
            },
        })),
    }
}

/// GET /paginas/perdas-ganhos
pub async fn perdas_ganhos_handler(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    if !autenticado(&req) {
        return resposta_nao_autenticado();
    }
    let filtros = filtros_da_query(&query.into_inner());
    let (base, atualizado_em) = match base_filtrada(&filtros) {
        Ok(v) => v,
        Err(e) => return erro_base(e),
    };
    match analise::perdas_ganhos::montar(&base) {
        None => aviso_sem_dados(&atualizado_em),
        Some(p) => HttpResponse::Ok().json(json!({
            "atualizado_em": atualizado_em,
            "dados": p,
            "tabelas": {
                "perdas": p.tabela_perdas(),
                "ganhos": p.tabela_ganhos(),
                "variacao_por_cliente": p.variacao_por_cliente.tabela("Cliente"),
                "variacao_por_emissora": p.variacao_por_emissora.tabela("Emissora"),
            },
        })),
    }
}

/// GET /paginas/cruzamentos
pub async fn cruzamentos_handler(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    if !autenticado(&req) {
        return resposta_nao_autenticado();
    }
    let filtros = filtros_da_query(&query.into_inner());
    let (base, atualizado_em) = match base_filtrada(&filtros) {
        Ok(v) => v,
        Err(e) => return erro_base(e),
    };
    match analise::cruzamentos::montar(&base) {
        None => aviso_sem_dados(&atualizado_em),
        Some(c) => {
            let aviso_matriz = c
                .matriz
                .is_none()
                .then(|| "A matriz de interseção requer pelo menos 2 emissoras com dados.");
            HttpResponse::Ok().json(json!({
                "atualizado_em": atualizado_em,
                "dados": c,
                "aviso_matriz": aviso_matriz,
                "tabelas": {
                    "exclusivos": c.tabela_exclusivos(),
                    "compartilhados": c.tabela_compartilhados(),
                    "top_compartilhados": c.tabela_top_compartilhados(),
                    "matriz_clientes": c.tabela_matriz_clientes(),
                    "matriz_faturamento": c.tabela_matriz_faturamento(),
                },
            }))
        }
    }
}

/// GET /paginas/top10?emissora=...&ano=...
pub async fn top10_handler(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    if !autenticado(&req) {
        return resposta_nao_autenticado();
    }
    let qm = query.into_inner();
    let filtros = filtros_da_query(&qm);
    let (base, atualizado_em) = match base_filtrada(&filtros) {
        Ok(v) => v,
        Err(e) => return erro_base(e),
    };

    let emissora = qm.get("emissora").map(|s| s.trim()).filter(|s| !s.is_empty());
    let ano = qm.get("ano").and_then(|s| s.trim().parse::<i32>().ok());

    match analise::top10::montar(&base, emissora, ano) {
        None => aviso_sem_dados(&atualizado_em),
        Some(t) => HttpResponse::Ok().json(json!({
            "atualizado_em": atualizado_em,
            "dados": t,
            "tabela": t.tabela(),
        })),
    }
}

/// GET /filtros/opcoes
/// Opções distintas da base inteira (sem filtros), para popular a sidebar.
pub async fn filtros_opcoes_handler(req: HttpRequest) -> impl Responder {
    if !autenticado(&req) {
        return resposta_nao_autenticado();
    }
    let (registros, atualizado_em) = match carregar_base_principal() {
        Ok(v) => v,
        Err(e) => return erro_base(e),
    };

    let anos: BTreeSet<i32> = registros.iter().map(|r| r.ano).collect();
    let emissoras: BTreeSet<&str> = registros.iter().map(|r| r.emissora.as_str()).collect();
    let executivos: BTreeSet<&str> = registros.iter().map(|r| r.executivo.as_str()).collect();
    let clientes: BTreeSet<&str> = registros.iter().map(|r| r.cliente.as_str()).collect();

    HttpResponse::Ok().json(json!({
        "atualizado_em": atualizado_em,
        "anos": anos,
        "emissoras": emissoras,
        "executivos": executivos,
        "clientes": clientes,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filtros_da_query_listas_e_meses() {
        let mut qm = HashMap::new();
        qm.insert("anos".to_string(), "2023, 2024".to_string());
        qm.insert("emissoras".to_string(), "A,B,".to_string());
        qm.insert("mes_ini".to_string(), "3".to_string());
        qm.insert("mes_fim".to_string(), "9".to_string());

        let f = filtros_da_query(&qm);
        assert_eq!(f.anos, vec![2023, 2024]);
        assert_eq!(f.emissoras, vec!["A", "B"]);
        assert!(f.executivos.is_empty());
        assert_eq!((f.mes_ini, f.mes_fim), (3, 9));
    }

    #[test]
    fn test_filtros_da_query_mes_invalido_cai_no_padrao() {
        let mut qm = HashMap::new();
        qm.insert("mes_ini".to_string(), "0".to_string());
        qm.insert("mes_fim".to_string(), "13".to_string());

        let f = filtros_da_query(&qm);
        assert_eq!((f.mes_ini, f.mes_fim), (1, 12));
    }

    #[test]
    fn test_filtros_da_query_vazia_sem_restricao() {
        let f = filtros_da_query(&HashMap::new());
        assert!(f.anos.is_empty());
        assert!(f.clientes.is_empty());
        assert_eq!((f.mes_ini, f.mes_fim), (1, 12));
    }
}
