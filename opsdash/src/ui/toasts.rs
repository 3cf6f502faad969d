//! Notification toasts stacked in the top-right corner.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::notify::Toast;

const TOAST_WIDTH: u16 = 48;
const TOAST_HEIGHT: u16 = 3;

pub fn draw_toasts(f: &mut ratatui::Frame<'_>, area: Rect, toasts: &[Toast]) {
    let width = TOAST_WIDTH.min(area.width);
    if width < 4 || area.height < TOAST_HEIGHT {
        return;
    }
    let x = area.x + area.width - width;
    let mut y = area.y + 1;

    // newest on top
    for t in toasts.iter().rev() {
        if y + TOAST_HEIGHT > area.y + area.height {
            break;
        }
        let rect = Rect {
            x,
            y,
            width,
            height: TOAST_HEIGHT,
        };
        let color = t.severity.color();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(t.severity.class());
        f.render_widget(Clear, rect);
        f.render_widget(
            Paragraph::new(t.message.as_str())
                .style(Style::default().fg(Color::White))
                .wrap(Wrap { trim: true })
                .block(block),
            rect,
        );
        y += TOAST_HEIGHT;
    }
}
