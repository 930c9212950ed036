//! Formatting utilities used for CLI and export outputs.

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Round a monetary amount to cents.
pub fn round_cents(v: f64) -> f64 {
    let r = (v * 100.0).round() / 100.0;
    // avoid "-0.00"
    if r == 0.0 { 0.0 } else { r }
}

/// `1234.5` → `"1.234,50 €"` with the given currency symbol.
pub fn money(v: f64, currency: &str) -> String {
    let cents = (round_cents(v) * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    let units = (abs / 100).to_string();
    let frac = abs % 100;

    let mut grouped = String::new();
    for (i, ch) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if currency.is_empty() {
        format!("{sign}{grouped},{frac:02}")
    } else {
        format!("{sign}{grouped},{frac:02} {currency}")
    }
}

/// Day/hour quantities: integers without decimals, anything else with two.
pub fn quantity(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}
