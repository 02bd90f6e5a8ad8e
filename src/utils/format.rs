use unicode_width::UnicodeWidthChar;

/// "42.5%" style, without trailing zeros.
pub fn format_percent(pct: f64) -> String {
    let s = format!("{:.2}", pct);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    format!("{}%", s)
}

/// Slides per day, one decimal unless whole.
pub fn format_pace(pace: f64) -> String {
    if pace == pace.floor() {
        format!("{}", pace as i64)
    } else {
        format!("{:.1}", pace)
    }
}

pub fn format_days(days: u32) -> String {
    match days {
        0 => "exam day passed".to_string(),
        1 => "1 day left".to_string(),
        n => format!("{} days left", n),
    }
}

/// Create a simple ASCII progress bar
pub fn progress_bar(filled: u32, total: u32, width: usize) -> String {
    if total == 0 {
        return "░".repeat(width);
    }
    let ratio = (filled as f64 / total as f64).min(1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}

/// Pad or cut `name` to exactly `width` terminal columns.
pub fn fit_width(name: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in name.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(&" ".repeat(width - used));
    out
}

/// Parse "#rrggbb" or "#rgb".
pub fn parse_hex_color(s: &str) -> Option<(u8, u8, u8)> {
    let hex = s.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some((r, g, b))
        }
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                rgb[i] = v * 17;
            }
            Some((rgb[0], rgb[1], rgb[2]))
        }
        _ => None,
    }
}
