//! Top header with hostname, status badge, time range, active error simulations
//! and load average.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::cards::Slot;
use crate::state::DashboardState;
use crate::ui::theme::{status_color, MUTED};

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, state: &DashboardState) {
    let host = state
        .readouts
        .get(Slot::Hostname)
        .filter(|h| !h.is_empty())
        .unwrap_or("-");
    let badge = state
        .readouts
        .get(Slot::StatusBadge)
        .unwrap_or(state.status.label());

    let mut spans = vec![
        Span::styled("opsdash", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(" | host: {host} | ")),
        Span::styled(
            format!("● {badge}"),
            Style::default()
                .fg(status_color(state.status))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" | range: {}", state.time_range)),
    ];

    if let Some(sims) = state
        .readouts
        .get(Slot::ErrorSimulations)
        .filter(|s| !s.is_empty())
    {
        let color = if sims == "none" { MUTED } else { Color::Red };
        spans.push(Span::raw(" | sims: "));
        spans.push(Span::styled(sims.to_string(), Style::default().fg(color)));
    }

    let load = state
        .last_snapshot
        .as_ref()
        .and_then(|s| s.performance.as_ref())
        .map(|p| &p.load_average)
        .filter(|l| !l.is_empty());
    if let Some(l) = load {
        let txt: Vec<String> = l.iter().map(|v| format!("{v:.2}")).collect();
        spans.push(Span::raw(format!(" | load: {}", txt.join(" "))));
    }
    spans.push(Span::styled(
        "  (press 'q' to quit)",
        Style::default().fg(MUTED),
    ));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
