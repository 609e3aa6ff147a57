use minijinja::Value;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Currency symbols for the codes the form offers. Codes outside the table
/// render as a "CODE 12.34" prefix instead of a symbol.
static CURRENCY_SYMBOLS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("INR", "₹"),
        ("USD", "$"),
        ("EUR", "€"),
        ("GBP", "£"),
        ("JPY", "¥"),
        ("AUD", "A$"),
        ("CAD", "C$"),
        ("DOP", "RD$"),
    ])
});

/// Formats a number as money for the given currency code: symbol prefix,
/// thousands separators, always two decimals.
pub fn format_money(currency: &str, amount: f64) -> String {
    let formatted = format_number_with_separators(amount.abs(), 2);
    let code = currency.trim().to_uppercase();

    match CURRENCY_SYMBOLS.get(code.as_str()) {
        Some(symbol) if amount < 0.0 => format!("-{}{}", symbol, formatted),
        Some(symbol) => format!("{}{}", symbol, formatted),
        None if amount < 0.0 => format!("-{} {}", code, formatted),
        None => format!("{} {}", code, formatted),
    }
}

pub fn format_number_with_separators(num: f64, decimals: usize) -> String {
    let formatted = format!("{:.decimals$}", num, decimals = decimals);
    let parts: Vec<&str> = formatted.split('.').collect();
    let integer = parts[0];
    let decimal = parts.get(1).unwrap_or(&"00");

    let mut result = String::new();
    let chars: Vec<char> = integer.chars().collect();
    let mut count = 0;

    for c in chars.iter().rev() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(*c);
        count += 1;
    }

    let integer_formatted: String = result.chars().rev().collect();

    if decimals > 0 {
        format!("{}.{}", integer_formatted, decimal)
    } else {
        integer_formatted
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// Filters

/// `{{ amount|money(currency) }}`
pub fn money_filter(value: Value, currency: Option<Value>) -> Result<Value, minijinja::Error> {
    let amount = f64::try_from(value).ok().ok_or_else(|| {
        minijinja::Error::new(
            minijinja::ErrorKind::InvalidOperation,
            "Value must be a number",
        )
    })?;

    let currency = currency
        .as_ref()
        .and_then(|c| c.as_str())
        .unwrap_or("INR")
        .to_string();

    Ok(Value::from(format_money(&currency, amount)))
}

/// `{{ address|multiline }}` — the form uses `/` as a line separator.
/// Segments are escaped individually so the inserted breaks survive
/// auto-escaping without opening an injection hole.
pub fn multiline_filter(value: Value) -> Result<Value, minijinja::Error> {
    if let Some(s) = value.as_str() {
        let html = s
            .split('/')
            .map(escape_html)
            .collect::<Vec<_>>()
            .join("<br/>");
        Ok(Value::from_safe_string(html))
    } else {
        Ok(value)
    }
}
