//! Bottom bar listing the demo controls with their keys; busy controls are greyed out.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::actions::{Control, Controls};
use crate::ui::theme::{DISABLED, MUTED};

pub fn draw_controls(f: &mut ratatui::Frame<'_>, area: Rect, controls: &Controls) {
    let mut spans = Vec::with_capacity(Control::ALL.len() * 3 + 2);
    for c in Control::ALL {
        let busy = controls.is_busy(c);
        let key_style = if busy {
            Style::default().fg(DISABLED)
        } else {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        };
        let label_style = if busy {
            Style::default()
                .fg(DISABLED)
                .add_modifier(Modifier::ITALIC)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!("[{}] ", c.key()), key_style));
        spans.push(Span::styled(controls.label(c), label_style));
        spans.push(Span::raw("  "));
    }
    spans.push(Span::styled(
        "[1/2/3] range  [x] dismiss",
        Style::default().fg(MUTED),
    ));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
