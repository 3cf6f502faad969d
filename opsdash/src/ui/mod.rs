//! UI module root: lays out the panels and draws them from the dashboard state.

pub mod cards;
pub mod charts;
pub mod controls;
pub mod header;
pub mod theme;
pub mod toasts;

use ratatui::layout::{Constraint, Direction, Layout};

use crate::state::{DashboardState, View};

pub fn draw(f: &mut ratatui::Frame<'_>, state: &DashboardState) {
    let area = f.area();

    match state.view {
        View::Full => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1),      // header
                    Constraint::Length(8),      // metric cards (two rows)
                    Constraint::Percentage(50), // performance + resource
                    Constraint::Min(6),         // app performance + network
                    Constraint::Length(1),      // controls
                ])
                .split(area);

            header::draw_header(f, rows[0], state);
            cards::draw_cards(f, rows[1], &state.readouts);

            let top = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(66), Constraint::Percentage(34)])
                .split(rows[2]);
            charts::draw_performance(f, top[0], &state.charts.performance);
            charts::draw_resource(f, top[1], &state.charts.resource, &state.readouts);

            let bottom = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(rows[3]);
            charts::draw_app_performance(f, bottom[0], &state.charts.app);
            charts::draw_network(f, bottom[1], &state.charts.network);

            controls::draw_controls(f, rows[4], &state.controls);
        }
        View::Compact => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1),
                    Constraint::Length(4),
                    Constraint::Min(6),
                    Constraint::Length(1),
                ])
                .split(area);
            header::draw_header(f, rows[0], state);
            cards::draw_cards(f, rows[1], &state.readouts);
            charts::draw_performance(f, rows[2], &state.charts.performance);
            controls::draw_controls(f, rows[3], &state.controls);
        }
    }

    toasts::draw_toasts(f, area, state.notifications.toasts());
}
