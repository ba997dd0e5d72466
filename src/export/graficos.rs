//! Gráficos SVG das páginas, desenhados com plotters.

use plotters::prelude::*;

use crate::analise::{MatrizIntersecao, PontoMensal};
use crate::formato::abreviar_brl;

/// Paleta institucional do painel.
pub const PALETA: [RGBColor; 5] = [
    RGBColor(0x00, 0x7d, 0xc3),
    RGBColor(0x00, 0xa8, 0xe0),
    RGBColor(0x7a, 0xd1, 0xe6),
    RGBColor(0x00, 0x4b, 0x8d),
    RGBColor(0x00, 0x95, 0xd9),
];

const TAMANHO: (u32, u32) = (900, 420);

fn maximo(valores: impl Iterator<Item = f64>) -> f64 {
    valores.fold(0.0f64, f64::max)
}

/// Linha da evolução mensal do faturamento, um ponto por (ano, mês).
pub fn grafico_evolucao(pontos: &[PontoMensal]) -> Result<String, Box<dyn std::error::Error>> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, TAMANHO).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| format!("Falha ao desenhar o gráfico: {e}"))?;

        let max_y = maximo(pontos.iter().map(|p| p.faturamento)) * 1.05;
        let max_y = if max_y > 0.0 { max_y } else { 1.0 };

        let mut chart = ChartBuilder::on(&root)
            .caption("Evolução mensal do faturamento", ("sans-serif", 22))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d(0f64..pontos.len().max(1) as f64, 0f64..max_y)
            .map_err(|e| format!("Falha ao desenhar o gráfico: {e}"))?;

        chart
            .configure_mesh()
            .x_labels(pontos.len().min(12))
            .x_label_formatter(&|x| {
                pontos
                    .get(*x as usize)
                    .map(|p| p.mes_label.clone())
                    .unwrap_or_default()
            })
            .y_label_formatter(&|y| abreviar_brl(*y))
            .y_desc("Faturamento")
            .draw()
            .map_err(|e| format!("Falha ao desenhar o gráfico: {e}"))?;

        chart
            .draw_series(LineSeries::new(
                pontos
                    .iter()
                    .enumerate()
                    .map(|(i, p)| (i as f64 + 0.5, p.faturamento)),
                PALETA[0].stroke_width(2),
            ))
            .map_err(|e| format!("Falha ao desenhar o gráfico: {e}"))?;

        root.present()
            .map_err(|e| format!("Falha ao desenhar o gráfico: {e}"))?;
    }
    Ok(svg)
}

/// Barras verticais de uma série rotulada (cliente × faturamento etc.).
pub fn grafico_barras(
    titulo: &str,
    pares: &[(String, f64)],
) -> Result<String, Box<dyn std::error::Error>> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, TAMANHO).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| format!("Falha ao desenhar o gráfico: {e}"))?;

        let max_y = maximo(pares.iter().map(|(_, v)| *v)) * 1.05;
        let max_y = if max_y > 0.0 { max_y } else { 1.0 };

        let mut chart = ChartBuilder::on(&root)
            .caption(titulo, ("sans-serif", 22))
            .margin(10)
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d(0f64..pares.len().max(1) as f64, 0f64..max_y)
            .map_err(|e| format!("Falha ao desenhar o gráfico: {e}"))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(pares.len())
            .x_label_formatter(&|x| {
                pares
                    .get(*x as usize)
                    .map(|(nome, _)| nome.clone())
                    .unwrap_or_default()
            })
            .y_label_formatter(&|y| abreviar_brl(*y))
            .y_desc("Faturamento")
            .draw()
            .map_err(|e| format!("Falha ao desenhar o gráfico: {e}"))?;

        chart
            .draw_series(pares.iter().enumerate().map(|(i, (_, v))| {
                Rectangle::new(
                    [(i as f64 + 0.15, 0.0), (i as f64 + 0.85, *v)],
                    PALETA[0].filled(),
                )
            }))
            .map_err(|e| format!("Falha ao desenhar o gráfico: {e}"))?;

        root.present()
            .map_err(|e| format!("Falha ao desenhar o gráfico: {e}"))?;
    }
    Ok(svg)
}

/// Mapa de calor da matriz de interseção (faturamento em comum).
pub fn grafico_matriz(m: &MatrizIntersecao) -> Result<String, Box<dyn std::error::Error>> {
    let n = m.emissoras.len();
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, TAMANHO).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| format!("Falha ao desenhar o gráfico: {e}"))?;

        let max_v = maximo(m.faturamento.iter().flatten().copied());

        let mut chart = ChartBuilder::on(&root)
            .caption("Interseções entre emissoras", ("sans-serif", 22))
            .margin(10)
            .x_label_area_size(60)
            .y_label_area_size(100)
            .build_cartesian_2d(0f64..n as f64, 0f64..n as f64)
            .map_err(|e| format!("Falha ao desenhar o gráfico: {e}"))?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n)
            .y_labels(n)
            .x_label_formatter(&|x| rotulo(&m.emissoras, *x))
            .y_label_formatter(&|y| rotulo(&m.emissoras, *y))
            .draw()
            .map_err(|e| format!("Falha ao desenhar o gráfico: {e}"))?;

        chart
            .draw_series((0..n).flat_map(|i| {
                let faturamento = &m.faturamento;
                (0..n).map(move |j| {
                    let v = faturamento[i][j];
                    let fator = if max_v > 0.0 { v / max_v } else { 0.0 };
                    Rectangle::new(
                        [(j as f64, i as f64), (j as f64 + 1.0, i as f64 + 1.0)],
                        escala_azul(fator).filled(),
                    )
                })
            }))
            .map_err(|e| format!("Falha ao desenhar o gráfico: {e}"))?;

        root.present()
            .map_err(|e| format!("Falha ao desenhar o gráfico: {e}"))?;
    }
    Ok(svg)
}

fn rotulo(nomes: &[String], v: f64) -> String {
    nomes.get(v as usize).cloned().unwrap_or_default()
}

// Interpola do branco ao azul escuro da paleta
fn escala_azul(fator: f64) -> RGBColor {
    let f = fator.clamp(0.0, 1.0);
    let alvo = PALETA[3];
    let canal = |de: u8, ate: u8| (de as f64 + (ate as f64 - de as f64) * f) as u8;
    RGBColor(canal(255, alvo.0), canal(255, alvo.1), canal(255, alvo.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grafico_barras_gera_svg() {
        let pares = vec![("X".to_string(), 100.0), ("Y".to_string(), 50.0)];
        let svg = grafico_barras("Top clientes", &pares).expect("svg gerado");
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
    }

    #[test]
    fn test_grafico_evolucao_vazio_nao_falha() {
        let svg = grafico_evolucao(&[]).expect("svg gerado");
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_escala_azul_extremos() {
        assert_eq!(escala_azul(0.0), RGBColor(255, 255, 255));
        assert_eq!(escala_azul(1.0), PALETA[3]);
    }
}
