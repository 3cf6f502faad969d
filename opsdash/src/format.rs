//! Readout formatting helpers.

const MB: f64 = 1024.0 * 1024.0;
const GB: f64 = MB * 1024.0;

pub fn percent(v: f64) -> String {
    format!("{v:.1}%")
}

pub fn gigabytes(v: f64) -> String {
    format!("{v:.2} GB")
}

/// Byte counter as MB below 1 GiB, GB from there on.
pub fn format_bytes(b: u64) -> String {
    let fb = b as f64;
    if fb >= GB {
        format!("{:.2} GB", fb / GB)
    } else {
        format!("{:.1} MB", fb / MB)
    }
}

/// Uptime as the two largest units among days/hours/minutes.
pub fn format_uptime(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

pub fn count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
