//! Servidor HTTP do painel: tabela de rotas e CORS.

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use serde_json::json;

use crate::server_handlers::{
    boas_vindas_handler, boas_vindas_registrar_handler, clientes_handler, cruzamentos_handler,
    exportar_handler, filtros_get_handler, filtros_opcoes_handler, filtros_post_handler,
    login_handler, logout_handler, perdas_ganhos_handler, status_handler, top10_handler,
    upload_handler, visao_geral_handler,
};

async fn help_handler() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "description": "API do painel de vendas. Autentique com POST /login {\"senha\": \"...\"}; as rotas de página aceitam filtros na query (listas separadas por vírgula: anos, emissoras, executivos, clientes; e mes_ini/mes_fim).",
        "rotas": [
            "POST /login",
            "POST /logout",
            "GET  /status",
            "POST /upload",
            "GET  /filtros/opcoes",
            "GET  /sessao/filtros",
            "POST /sessao/filtros",
            "GET  /sessao/boas-vindas",
            "POST /sessao/boas-vindas",
            "GET  /paginas/visao-geral",
            "GET  /paginas/clientes-faturamento",
            "GET  /paginas/perdas-ganhos",
            "GET  /paginas/cruzamentos",
            "GET  /paginas/top10",
            "POST /exportar?pagina=...",
        ],
        "exemplo_query": "/paginas/visao-geral?anos=2023,2024&emissoras=TV%20Azul&mes_ini=1&mes_fim=6",
    }))
}

pub async fn run_server(bind_addr: &str) -> std::io::Result<()> {
    HttpServer::new(|| {
        App::new()
            .wrap(Cors::permissive())
            .route("/login", web::post().to(login_handler))
            .route("/logout", web::post().to(logout_handler))
            .route("/status", web::get().to(status_handler))
            .route("/upload", web::post().to(upload_handler))
            .route("/filtros/opcoes", web::get().to(filtros_opcoes_handler))
            .route("/sessao/filtros", web::get().to(filtros_get_handler))
            .route("/sessao/filtros", web::post().to(filtros_post_handler))
            .route("/sessao/boas-vindas", web::get().to(boas_vindas_handler))
            .route(
                "/sessao/boas-vindas",
                web::post().to(boas_vindas_registrar_handler),
            )
            .route("/paginas/visao-geral", web::get().to(visao_geral_handler))
            .route(
                "/paginas/clientes-faturamento",
                web::get().to(clientes_handler),
            )
            .route(
                "/paginas/perdas-ganhos",
                web::get().to(perdas_ganhos_handler),
            )
            .route("/paginas/cruzamentos", web::get().to(cruzamentos_handler))
            .route("/paginas/top10", web::get().to(top10_handler))
            .route("/exportar", web::post().to(exportar_handler))
            .route("/help", web::get().to(help_handler))
    })
    .bind(bind_addr)?
    .run()
    .await
}
