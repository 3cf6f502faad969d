//! Metric cards. A card shows whichever of its slots the view registered and is
//! skipped entirely when it has none.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::cards::{Readouts, Slot};
use crate::ui::theme::{CPU, DISK, MEMORY, MUTED, NET_RECV};

struct Card {
    title: &'static str,
    headline: Slot,
    details: &'static [Slot],
    color: Color,
}

const CARDS: [Card; 8] = [
    Card {
        title: "CPU",
        headline: Slot::CpuUsage,
        details: &[Slot::CpuDetails],
        color: CPU,
    },
    Card {
        title: "Memory",
        headline: Slot::MemoryUsage,
        details: &[Slot::MemoryDetails],
        color: MEMORY,
    },
    Card {
        title: "Disk",
        headline: Slot::DiskUsage,
        details: &[Slot::DiskDetails],
        color: DISK,
    },
    Card {
        title: "Network",
        headline: Slot::NetworkUsage,
        details: &[Slot::NetworkDetails],
        color: NET_RECV,
    },
    Card {
        title: "Users",
        headline: Slot::TotalUsers,
        details: &[],
        color: Color::White,
    },
    Card {
        title: "Requests",
        headline: Slot::TotalRequests,
        details: &[Slot::RequestsDetails],
        color: Color::White,
    },
    Card {
        title: "System",
        headline: Slot::Hostname,
        details: &[Slot::Platform, Slot::PythonVersion, Slot::SystemUptime],
        color: Color::White,
    },
    Card {
        title: "App uptime",
        headline: Slot::AppUptime,
        details: &[],
        color: Color::White,
    },
];

const DETAIL_LABELS: [(Slot, &str); 3] = [
    (Slot::Platform, "os "),
    (Slot::PythonVersion, "runtime "),
    (Slot::SystemUptime, "up "),
];

fn card_lines(card: &Card, r: &Readouts) -> Option<Vec<Line<'static>>> {
    let mut lines = Vec::new();
    if let Some(v) = r.get(card.headline) {
        lines.push(Line::from(Span::styled(
            v.to_string(),
            Style::default().fg(card.color).add_modifier(Modifier::BOLD),
        )));
    }
    let mut details = Vec::new();
    for slot in card.details {
        if let Some(v) = r.get(*slot) {
            let prefix = DETAIL_LABELS
                .iter()
                .find(|(s, _)| s == slot)
                .map(|(_, p)| *p)
                .unwrap_or("");
            details.push(format!("{prefix}{v}"));
        }
    }
    if !details.is_empty() {
        lines.push(Line::from(Span::styled(
            details.join("  "),
            Style::default().fg(MUTED),
        )));
    }
    if lines.is_empty() {
        None
    } else {
        Some(lines)
    }
}

pub fn draw_cards(f: &mut ratatui::Frame<'_>, area: Rect, readouts: &Readouts) {
    let visible: Vec<(&Card, Vec<Line<'static>>)> = CARDS
        .iter()
        .filter_map(|c| card_lines(c, readouts).map(|l| (c, l)))
        .collect();
    if visible.is_empty() || area.height < 3 {
        return;
    }

    // Up to four cards per row; two rows when the area is tall enough
    let per_row = if area.height >= 8 { 4 } else { visible.len().max(1) };
    let rows_needed = visible.len().div_ceil(per_row);
    let row_h = area.height / rows_needed.max(1) as u16;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(row_h); rows_needed])
        .split(area);

    for (ri, chunk) in visible.chunks(per_row).enumerate() {
        let Some(row) = rows.get(ri) else { break };
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, per_row as u32); per_row])
            .split(*row);
        for (ci, (card, lines)) in chunk.iter().enumerate() {
            let block = Block::default().borders(Borders::ALL).title(card.title);
            f.render_widget(Paragraph::new(lines.clone()).block(block), cols[ci]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_without_any_slot_is_skipped() {
        let r = Readouts::with_slots(&[Slot::CpuUsage]);
        assert!(card_lines(&CARDS[0], &r).is_some());
        assert!(card_lines(&CARDS[1], &r).is_none());
    }

    #[test]
    fn system_card_labels_details() {
        let mut r = Readouts::full();
        r.set(Slot::Hostname, "web-1");
        r.set(Slot::Platform, "Linux");
        r.set(Slot::PythonVersion, "3.12");
        r.set(Slot::SystemUptime, "1d 1h");
        let lines = card_lines(&CARDS[6], &r).unwrap();
        assert_eq!(lines.len(), 2);
        let detail: String = lines[1].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(detail, "os Linux  runtime 3.12  up 1d 1h");
    }
}
