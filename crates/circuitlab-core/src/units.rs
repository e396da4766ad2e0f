//! Engineering units and SI prefix handling.

/// Parse a value with an optional SI suffix, e.g. `10k`, `4.7M`, `100m`.
///
/// Breadboard values are human-entered, so suffixes follow everyday
/// engineering notation rather than SPICE: `M` is mega and `m` is milli.
/// A trailing unit symbol (`V`, `A`, `Ω`, `ohm`) is ignored.
pub fn parse_value(s: &str) -> Option<f64> {
    let mut s = s.trim();
    for unit in ["ohm", "Ω", "V", "A"] {
        if let Some(stripped) = s.strip_suffix(unit) {
            s = stripped.trim_end();
            break;
        }
    }

    if let Ok(v) = s.parse::<f64>() {
        return Some(v);
    }

    let num_end = s
        .find(|c: char| !c.is_ascii_digit() && c != '.' && c != '-' && c != '+' && c != 'e' && c != 'E')
        .unwrap_or(s.len());

    if num_end == 0 {
        return None;
    }

    let (num_str, suffix) = s.split_at(num_end);
    let value: f64 = num_str.parse().ok()?;

    let multiplier = match suffix {
        "G" => 1e9,
        "M" | "meg" | "MEG" => 1e6,
        "k" | "K" => 1e3,
        "m" => 1e-3,
        "u" | "µ" => 1e-6,
        "n" => 1e-9,
        _ => return None,
    };

    Some(value * multiplier)
}

/// SI prefixes from largest to smallest, with their scale.
const PREFIXES: [(f64, &str); 7] = [
    (1e9, "G"),
    (1e6, "M"),
    (1e3, "k"),
    (1.0, ""),
    (1e-3, "m"),
    (1e-6, "µ"),
    (1e-9, "n"),
];

/// Format a value with an appropriate SI prefix and one decimal place.
///
/// The prefix is chosen after rounding, so `0.00099999` prints as `1m`
/// rather than `1000µ`.
pub fn format_value(value: f64) -> String {
    let abs_value = value.abs();

    let mut index = if abs_value == 0.0 {
        3
    } else {
        PREFIXES
            .iter()
            .position(|&(scale, _)| abs_value >= scale)
            .unwrap_or(PREFIXES.len() - 1)
    };
    if index > 0 && (abs_value / PREFIXES[index].0 * 10.0).round() >= 10_000.0 {
        index -= 1;
    }
    let (scale, prefix) = PREFIXES[index];

    let mut text = format!("{:.1}", value / scale);
    if text.ends_with(".0") {
        text.truncate(text.len() - 2);
    }
    format!("{text}{prefix}")
}

/// Format a value followed by its unit symbol, e.g. `5kΩ`, `1mA`.
pub fn format_quantity(value: f64, unit: &str) -> String {
    format!("{}{}", format_value(value), unit)
}
