use serde_json::Value;

/// Parse an ETA into minutes.
///
/// - numbers are minutes
/// - strings take a leading decimal and an optional `m`/`h`/`d` suffix
/// - anything absent, falsy or unparseable is `0`
/// - an overflowing magnitude stays infinite so it caps like any long ETA
pub fn eta_minutes(eta: Option<&Value>) -> f64 {
    match eta {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Some(Value::String(s)) => parse_eta_str(s),
        _ => 0.0,
    }
}

fn parse_eta_str(raw: &str) -> f64 {
    let s = raw.trim().to_lowercase();
    let scale = match s.chars().last() {
        Some('h') => 60.0,
        Some('d') => 1440.0,
        _ => 1.0,
    };
    leading_decimal(&s).map_or(0.0, |v| v * scale)
}

/// Longest prefix of `s` that reads as a decimal number (`-1.5e2xyz` -> -150).
fn leading_decimal(s: &str) -> Option<f64> {
    let b = s.as_bytes();
    let mut i = 0usize;
    if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
        i += 1;
    }
    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < b.len() && b[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        digits += j - frac_start;
        i = j;
    }
    if digits == 0 {
        return None;
    }
    // exponent only counts when followed by at least one digit
    if i < b.len() && b[i] == b'e' {
        let mut j = i + 1;
        if j < b.len() && (b[j] == b'+' || b[j] == b'-') {
            j += 1;
        }
        let exp_digits = j;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_digits {
            i = j;
        }
    }
    s[..i].parse::<f64>().ok()
}
