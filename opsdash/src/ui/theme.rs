//! Shared UI theme constants.

use ratatui::style::Color;

use crate::cards::Status;

pub const CPU: Color = Color::Cyan;
pub const MEMORY: Color = Color::Magenta;
pub const DISK: Color = Color::Yellow;
pub const AVAILABLE: Color = Color::DarkGray;
pub const APP_MEMORY: Color = Color::LightGreen;
pub const APP_CPU: Color = Color::LightBlue;
pub const CONNECTIONS: Color = Color::LightRed;
pub const NET_SENT: Color = Color::Blue;
pub const NET_RECV: Color = Color::Green;
pub const MUTED: Color = Color::Gray;
pub const DISABLED: Color = Color::DarkGray;

pub fn status_color(s: Status) -> Color {
    match s {
        Status::Connecting => Color::Yellow,
        Status::Live => Color::Green,
        Status::ConnectionError => Color::Red,
    }
}

pub fn usage_color(pct: f64) -> Color {
    if pct < 60.0 {
        Color::Green
    } else if pct < 85.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}
