// --- Painel de Vendas (API) - Arquivo principal ---

use painel_vendas::run_server;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    println!("=== Painel de Vendas (API) ===");
    let bind = std::env::var("PAINEL_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    println!("Iniciando servidor em http://{}", bind);
    run_server(&bind).await
}
