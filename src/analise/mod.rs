//! Agregações por página do painel.
//!
//! Todas as páginas partem da mesma base filtrada e do mesmo par de anos
//! de comparação; cada submódulo monta as tabelas/séries de uma página.
//!
//! Submódulos:
//! - `comparativo`: template comum de group-by/pivot anual com Totalizador
//! - `visao_geral`: KPIs, evolução mensal e faturamento por dimensão
//! - `clientes`: tabelas 1.1 a 1.6 de clientes & faturamento
//! - `perdas_ganhos`: churn (perdas) e novos negócios (ganhos)
//! - `cruzamentos`: exclusivos/compartilhados e matriz de interseção
//! - `top10`: ranking de anunciantes para uma (emissora, ano)

pub mod clientes;
pub mod comparativo;
pub mod cruzamentos;
pub mod perdas_ganhos;
pub mod top10;
pub mod visao_geral;

pub use clientes::ClientesFaturamento;
pub use comparativo::{Comparativo, LinhaComparativo, Metrica, comparativo_anual};
pub use cruzamentos::{Cruzamentos, MatrizIntersecao};
pub use perdas_ganhos::PerdasGanhos;
pub use top10::Top10;
pub use visao_geral::{PontoMensal, VisaoGeral};

use crate::models::RegistroVenda;

/// Rótulo da linha sintética de totais, sempre a última das tabelas.
pub const TOTALIZADOR: &str = "Totalizador";

/// Determina o par (ano base, ano de comparação) da base filtrada:
/// os dois últimos anos em ordem crescente, ou o mesmo ano duas vezes
/// quando só existe um. `None` quando a base está vazia.
pub fn anos_comparacao(base: &[RegistroVenda]) -> Option<(i32, i32)> {
    let mut anos: Vec<i32> = base.iter().map(|r| r.ano).collect();
    anos.sort_unstable();
    anos.dedup();
    match anos.len() {
        0 => None,
        1 => Some((anos[0], anos[0])),
        n => Some((anos[n - 2], anos[n - 1])),
    }
}

/// Variação percentual sobre o valor base. Indefinida (None) quando a
/// base não é positiva — exibida como "—".
pub fn delta_pct(valor_base: f64, delta: f64) -> Option<f64> {
    if valor_base > 0.0 {
        Some(delta / valor_base * 100.0)
    } else {
        None
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::registro;
    use super::*;

    #[test]
    fn test_anos_comparacao() {
        assert_eq!(anos_comparacao(&[]), None);

        let um_ano = vec![registro("A", "X", "E", 2024, 1, 10.0)];
        assert_eq!(anos_comparacao(&um_ano), Some((2024, 2024)));

        let tres_anos = vec![
            registro("A", "X", "E", 2022, 1, 10.0),
            registro("A", "X", "E", 2024, 1, 10.0),
            registro("A", "X", "E", 2023, 1, 10.0),
        ];
        assert_eq!(anos_comparacao(&tres_anos), Some((2023, 2024)));
    }

    #[test]
    fn test_delta_pct_indefinido_com_base_zero() {
        assert_eq!(delta_pct(0.0, 50.0), None);
        assert_eq!(delta_pct(-10.0, 5.0), None);
        assert_eq!(delta_pct(100.0, -50.0), Some(-50.0));
    }
}
