//! Login por senha única, cookies de sessão e o aviso de boas-vindas.

use actix_web::cookie::Cookie;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use crate::models::SelecaoFiltros;

pub const COOKIE_AUTH: &str = "auth_token";
pub const TOKEN_LOGADO: &str = "user_is_logged_in";
pub const COOKIE_FILTROS: &str = "app_filters";
pub const COOKIE_POPUP: &str = "last_popup_view";

/// Intervalo mínimo entre exibições do aviso de boas-vindas.
const POPUP_INTERVALO_HORAS: i64 = 24;

fn senha_configurada() -> String {
    std::env::var("PAINEL_SENHA").unwrap_or_else(|_| "omelete".to_string())
}

/// O cookie de autenticação vale pelo token fixo, não por conteúdo do usuário.
pub fn autenticado(req: &HttpRequest) -> bool {
    req.cookie(COOKIE_AUTH)
        .map(|c| c.value() == TOKEN_LOGADO)
        .unwrap_or(false)
}

pub fn resposta_nao_autenticado() -> HttpResponse {
    HttpResponse::Unauthorized().json(json!({"error": "Não autenticado. Faça login."}))
}

/// POST /login  body: {"senha": "..."}
/// Comparação tolerante: espaços nas pontas e caixa são ignorados.
pub async fn login_handler(body: web::Json<serde_json::Value>) -> impl Responder {
    let senha = body
        .get("senha")
        .and_then(|v| v.as_str())
        .unwrap_or_default();

    if senha.trim().to_lowercase() == senha_configurada().trim().to_lowercase() {
        let cookie = Cookie::build(COOKIE_AUTH, TOKEN_LOGADO).path("/").finish();
        HttpResponse::Ok()
            .cookie(cookie)
            .json(json!({"status": "ok"}))
    } else {
        HttpResponse::Unauthorized().json(json!({"error": "Senha incorreta. Tente novamente."}))
    }
}

/// POST /logout
pub async fn logout_handler() -> impl Responder {
    let mut cookie = Cookie::build(COOKIE_AUTH, "").path("/").finish();
    cookie.make_removal();
    HttpResponse::Ok()
        .cookie(cookie)
        .json(json!({"status": "ok"}))
}

/// GET /sessao/filtros
/// Cookie ausente ou ilegível degrada para os filtros padrão.
pub async fn filtros_get_handler(req: HttpRequest) -> impl Responder {
    if !autenticado(&req) {
        return resposta_nao_autenticado();
    }
    let filtros = req
        .cookie(COOKIE_FILTROS)
        .and_then(|c| serde_json::from_str::<SelecaoFiltros>(c.value()).ok())
        .unwrap_or_default();
    HttpResponse::Ok().json(filtros)
}

/// POST /sessao/filtros
pub async fn filtros_post_handler(
    req: HttpRequest,
    body: web::Json<SelecaoFiltros>,
) -> impl Responder {
    if !autenticado(&req) {
        return resposta_nao_autenticado();
    }
    let filtros = body.into_inner();
    if filtros.mes_ini < 1
        || filtros.mes_fim > 12
        || filtros.mes_ini > filtros.mes_fim
    {
        return HttpResponse::BadRequest()
            .json(json!({"error": "Intervalo de meses inválido (esperado 1..=12)."}));
    }

    let serializado = match serde_json::to_string(&filtros) {
        Ok(s) => s,
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(json!({"error": format!("Falha ao serializar os filtros: {}", e)}));
        }
    };
    let cookie = Cookie::build(COOKIE_FILTROS, serializado).path("/").finish();
    HttpResponse::Ok().cookie(cookie).json(filtros)
}

/// POST /sessao/boas-vindas
/// Registra explicitamente a exibição do aviso, sem consultar.
pub async fn boas_vindas_registrar_handler(req: HttpRequest) -> impl Responder {
    if !autenticado(&req) {
        return resposta_nao_autenticado();
    }
    let cookie = Cookie::build(COOKIE_POPUP, Utc::now().to_rfc3339())
        .path("/")
        .finish();
    HttpResponse::Ok()
        .cookie(cookie)
        .json(json!({"status": "ok"}))
}

/// GET /sessao/boas-vindas
/// Decide se o aviso de boas-vindas deve aparecer: só uma vez a cada 24h.
/// Quando exibe, registra o momento no cookie.
pub async fn boas_vindas_handler(req: HttpRequest) -> impl Responder {
    if !autenticado(&req) {
        return resposta_nao_autenticado();
    }

    let agora = Utc::now();
    let ultima = req
        .cookie(COOKIE_POPUP)
        .and_then(|c| DateTime::parse_from_rfc3339(c.value()).ok())
        .map(|d| d.with_timezone(&Utc));

    let exibir = match ultima {
        Some(quando) => agora - quando >= Duration::hours(POPUP_INTERVALO_HORAS),
        None => true,
    };

    if exibir {
        let cookie = Cookie::build(COOKIE_POPUP, agora.to_rfc3339())
            .path("/")
            .finish();
        HttpResponse::Ok()
            .cookie(cookie)
            .json(json!({"exibir": true}))
    } else {
        HttpResponse::Ok().json(json!({"exibir": false}))
    }
}
