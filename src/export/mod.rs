// Exportação: planilha de dados, gráficos SVG e o pacote ZIP

mod graficos;
mod pacote;
mod xlsx;

pub use graficos::{grafico_barras, grafico_evolucao, grafico_matriz};
pub use pacote::{ItemExport, criar_pacote_zip};
pub use xlsx::{NOME_WORKBOOK, gerar_workbook, nome_seguro};
