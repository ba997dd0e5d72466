// Biblioteca raiz do crate `painel-vendas`.
// Reexporta os módulos principais e o servidor HTTP.
pub mod analise;
pub mod excel;
pub mod export;
pub mod filtros;
pub mod formato;
pub mod models;
pub mod normalizar;
pub mod server;
pub mod server_handlers;

/// Sobe o servidor HTTP (reexport para facilitar o uso a partir do `main`)
pub use server::run_server;
