// Handlers HTTP do painel

pub mod datafiles;
pub mod exportar;
pub mod paginas;
pub mod sessao;

pub use datafiles::{status_handler, upload_handler};
pub use exportar::exportar_handler;
pub use paginas::{
    clientes_handler, cruzamentos_handler, filtros_opcoes_handler, perdas_ganhos_handler,
    top10_handler, visao_geral_handler,
};
pub use sessao::{
    boas_vindas_handler, boas_vindas_registrar_handler, filtros_get_handler, filtros_post_handler,
    login_handler, logout_handler,
};
