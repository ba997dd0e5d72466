//! Normalização da planilha de vendas para o esquema canônico.
//!
//! Mapeia cabeçalhos legados (Empresa, DESCRIÇÃO, CONTATO COML., VALOR,
//! REF.) para as colunas canônicas, interpreta moeda BR e datas em vários
//! formatos e deriva Ano/Mes/MesLabel. Linhas cuja data não pode ser
//! resolvida são descartadas em silêncio; célula de valor ilegível vira 0,0.

use chrono::{Datelike, Duration, NaiveDate};
use std::error::Error;

use crate::excel::{TabelaBruta, normalizar_cabecalho};
use crate::formato::{normalizar_texto, parse_moeda_br, rotulo_mes};
use crate::models::RegistroVenda;

/// Epoch de data serial de planilha (uma unidade = um dia).
const EPOCH_SERIAL: (i32, u32, u32) = (1899, 12, 30);

fn indice_coluna(colunas: &[String], aliases: &[&str]) -> Option<usize> {
    for alias in aliases {
        let alvo = normalizar_cabecalho(alias);
        if let Some(i) = colunas
            .iter()
            .position(|c| normalizar_cabecalho(c) == alvo)
        {
            return Some(i);
        }
    }
    None
}

/// Tenta converter uma string de data nos formatos aceitos, em ordem:
/// ISO, brasileiro, serial de planilha, variantes day-first.
pub fn parse_data(valor: &str) -> Option<NaiveDate> {
    let s = valor.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%d/%m/%Y") {
        return Some(d);
    }

    // Serial de planilha: só dígitos (com eventual parte decimal), >= 5 dígitos
    let sem_ponto: String = s.chars().filter(|c| *c != '.').collect();
    if !sem_ponto.is_empty() && sem_ponto.chars().all(|c| c.is_ascii_digit()) && sem_ponto.len() >= 5
    {
        if let Ok(serial) = s.parse::<f64>() {
            let epoch = NaiveDate::from_ymd_opt(EPOCH_SERIAL.0, EPOCH_SERIAL.1, EPOCH_SERIAL.2)?;
            return epoch.checked_add_signed(Duration::days(serial.trunc() as i64));
        }
    }

    // Fallback genérico com preferência dia-antes-do-mês
    for formato in ["%d/%m/%y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, formato) {
            return Some(d);
        }
    }
    None
}

/// Normaliza a tabela crua para a base canônica de `RegistroVenda`.
///
/// Falha apenas quando a planilha não tem nem coluna de data nem o par
/// Ano+Mês, ou quando nenhuma linha sobrevive com data válida.
pub fn normalizar_base(bruta: &TabelaBruta) -> Result<Vec<RegistroVenda>, Box<dyn Error>> {
    let colunas = &bruta.colunas;

    let idx_emissora = indice_coluna(colunas, &["Empresa", "Emissora"]);
    let idx_cliente = indice_coluna(colunas, &["DESCRIÇÃO", "Cliente"]);
    let idx_executivo = indice_coluna(colunas, &["CONTATO COML.", "Executivo"]);
    let idx_faturamento = indice_coluna(colunas, &["VALOR", "Faturamento"]);
    let idx_data = indice_coluna(colunas, &["REF.", "REF", "data_ref", "Data"]);
    let idx_ano = indice_coluna(colunas, &["Ano"]);
    let idx_mes = indice_coluna(colunas, &["Mês", "Mes"]);

    if idx_data.is_none() && (idx_ano.is_none() || idx_mes.is_none()) {
        return Err("A planilha precisa conter 'REF.' ou colunas 'Ano' e 'Mês'.".into());
    }

    let celula = |linha: &[String], idx: Option<usize>| -> String {
        idx.and_then(|i| linha.get(i).cloned()).unwrap_or_default()
    };

    let mut registros: Vec<RegistroVenda> = Vec::with_capacity(bruta.linhas.len());
    let mut descartadas = 0usize;

    for linha in &bruta.linhas {
        let data_ref = match idx_data {
            Some(_) => parse_data(&celula(linha, idx_data)),
            None => {
                // Sintetiza a data de (Ano, Mês, dia=1)
                let ano = celula(linha, idx_ano).trim().parse::<i32>().ok();
                let mes = celula(linha, idx_mes).trim().parse::<u32>().ok();
                match (ano, mes) {
                    (Some(a), Some(m)) => NaiveDate::from_ymd_opt(a, m, 1),
                    _ => None,
                }
            }
        };

        let data_ref = match data_ref {
            Some(d) => d,
            None => {
                descartadas += 1;
                continue;
            }
        };

        let ano = data_ref.year();
        let mes = data_ref.month();

        registros.push(RegistroVenda {
            emissora: normalizar_texto(&celula(linha, idx_emissora)),
            cliente: normalizar_texto(&celula(linha, idx_cliente)),
            executivo: normalizar_texto(&celula(linha, idx_executivo)),
            faturamento: parse_moeda_br(&celula(linha, idx_faturamento)),
            data_ref,
            ano,
            mes,
            mes_label: rotulo_mes(ano, mes),
        });
    }

    if descartadas > 0 {
        eprintln!(
            "Aviso: {} linha(s) descartada(s) por data inválida",
            descartadas
        );
    }

    if registros.is_empty() {
        return Err("Nenhuma data válida foi identificada na base.".into());
    }

    Ok(registros)
}
