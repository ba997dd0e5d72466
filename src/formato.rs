//! Formatação e parsing de valores no padrão PT-BR.
//!
//! Convenção monetária: "R$ 1.234,56" (ponto = milhar, vírgula = decimal).
//! Valores entre parênteses ou com "-" na frente são negativos.

/// Abreviações de meses em português (índice 0 = Janeiro).
pub const MESES_ABREV: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Formata um número como Real: `1234.56` -> `"R$ 1.234,56"`.
pub fn brl(valor: f64) -> String {
    if valor.is_nan() {
        return "—".to_string();
    }
    let negativo = valor < 0.0;
    let abs = valor.abs();
    let inteiro = abs.trunc() as i64;
    let centavos = ((abs - abs.trunc()) * 100.0).round() as i64;
    // round pode estourar para 100 centavos (ex.: 0.999)
    let (inteiro, centavos) = if centavos >= 100 {
        (inteiro + 1, 0)
    } else {
        (inteiro, centavos)
    };

    let digitos = inteiro.to_string();
    let mut agrupado = String::new();
    for (i, c) in digitos.chars().enumerate() {
        if i > 0 && (digitos.len() - i) % 3 == 0 {
            agrupado.push('.');
        }
        agrupado.push(c);
    }

    let sinal = if negativo { "-" } else { "" };
    format!("{}R$ {},{:02}", sinal, agrupado, centavos)
}

/// Formato abreviado para rótulos de gráfico: "R$ 1,2 Mi", "R$ 12 mil".
pub fn abreviar_brl(valor: f64) -> String {
    if valor.is_nan() {
        return "R$ 0".to_string();
    }
    let sinal = if valor < 0.0 { "-" } else { "" };
    let abs = valor.abs();
    if abs == 0.0 {
        return "R$ 0".to_string();
    }
    if abs >= 1_000_000.0 {
        let mi = abs / 1_000_000.0;
        return format!("{}R$ {} Mi", sinal, format!("{:.1}", mi).replace('.', ","));
    }
    if abs >= 1_000.0 {
        return format!("{}R$ {} mil", sinal, (abs / 1_000.0).round() as i64);
    }
    brl(valor)
}

/// Converte string monetária BR para f64. Nunca falha: valores
/// irreconhecíveis viram 0.0 (política da camada de normalização).
pub fn parse_moeda_br(valor: &str) -> f64 {
    let s = valor.trim();
    if s.is_empty() {
        return 0.0;
    }

    // Valores já numéricos (célula numérica convertida para texto)
    if let Ok(v) = s.parse::<f64>() {
        return v;
    }

    let negativo = s.starts_with('-') || s.starts_with('(');
    let limpo: String = s
        .chars()
        .filter(|c| !matches!(c, 'R' | '$' | ' ' | '(' | ')' | '-'))
        .collect();
    let normalizado = limpo.replace('.', "").replace(',', ".");

    match normalizado.parse::<f64>() {
        Ok(v) if negativo && v > 0.0 => -v,
        Ok(v) => v,
        Err(_) => 0.0,
    }
}

/// Normaliza nomes: trim + capitalização simples palavra a palavra.
/// "RÁDIO  NOVA" -> "Rádio Nova".
pub fn normalizar_texto(texto: &str) -> String {
    texto
        .split_whitespace()
        .map(|palavra| {
            let mut chars = palavra.chars();
            match chars.next() {
                Some(primeira) => {
                    let resto: String = chars.collect::<String>().to_lowercase();
                    primeira.to_uppercase().collect::<String>() + &resto
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rótulo "Jan/24" a partir de (ano, mes). `mes` fora de 1..=12 vira "?".
pub fn rotulo_mes(ano: i32, mes: u32) -> String {
    let nome = MESES_ABREV
        .get(mes.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("?");
    format!("{}/{:02}", nome, ano.rem_euclid(100))
}
