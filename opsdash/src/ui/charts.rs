//! Time-series charts (performance, app performance, network) and the resource budget bar.
//!
//! Terminal charts have a single y axis. Series that belong on a secondary axis are
//! rescaled onto the primary one against their window peak, and the peak is printed
//! in the legend so the real magnitude stays readable.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

use crate::cards::{Readouts, Slot};
use crate::charts::{
    AppPerformanceChart, NetworkChart, PerformanceChart, ResourceChart, RESOURCE_BUDGET,
};
use crate::format::format_bytes;
use crate::ui::theme::{
    usage_color, APP_CPU, APP_MEMORY, AVAILABLE, CONNECTIONS, CPU, DISK, MEMORY, MUTED, NET_RECV,
    NET_SENT,
};

fn points(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, *v))
        .collect()
}

fn peak(values: &[f64]) -> f64 {
    values.iter().copied().fold(0.0_f64, f64::max)
}

/// Map `values` onto `0..=top` relative to their own peak.
fn rescaled(values: &[f64], top: f64) -> Vec<(f64, f64)> {
    let p = peak(values);
    if p <= 0.0 {
        return points(values);
    }
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, v / p * top))
        .collect()
}

fn x_axis(labels: &[String]) -> Axis<'static> {
    let upper = labels.len().saturating_sub(1).max(1) as f64;
    let edge = |l: Option<&String>| l.cloned().unwrap_or_default();
    Axis::default()
        .style(Style::default().fg(MUTED))
        .bounds([0.0, upper])
        .labels(vec![
            Span::raw(edge(labels.first())),
            Span::raw(edge(labels.last())),
        ])
}

fn line<'a>(name: String, data: &'a [(f64, f64)], color: Color) -> Dataset<'a> {
    Dataset::default()
        .name(name)
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(data)
}

fn percent_axis() -> Axis<'static> {
    Axis::default()
        .style(Style::default().fg(MUTED))
        .bounds([0.0, 100.0])
        .labels(vec![Span::raw("0"), Span::raw("50"), Span::raw("100")])
}

pub fn draw_performance(f: &mut ratatui::Frame<'_>, area: Rect, c: &PerformanceChart) {
    let cpu = points(&c.cpu);
    let mem = points(&c.memory);
    let disk = points(&c.disk);
    let app_mem = rescaled(&c.app_memory, 100.0);
    let app_peak = peak(&c.app_memory);

    let datasets = vec![
        line("CPU %".into(), &cpu, CPU),
        line("Memory %".into(), &mem, MEMORY),
        line("Disk %".into(), &disk, DISK),
        line(format!("App MB (peak {app_peak:.1})"), &app_mem, APP_MEMORY),
    ];
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("System Performance"),
        )
        .x_axis(x_axis(&c.labels))
        .y_axis(percent_axis());
    f.render_widget(chart, area);
}

pub fn draw_app_performance(f: &mut ratatui::Frame<'_>, area: Rect, c: &AppPerformanceChart) {
    let cpu_peak = peak(&c.app_cpu);
    let top = cpu_peak.max(1.0);
    let cpu = points(&c.app_cpu);
    let conns = rescaled(&c.connections, top);
    let conn_peak = peak(&c.connections);

    let datasets = vec![
        line("App CPU %".into(), &cpu, APP_CPU),
        line(
            format!("Connections (peak {conn_peak:.0})"),
            &conns,
            CONNECTIONS,
        ),
    ];
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("App Performance"),
        )
        .x_axis(x_axis(&c.labels))
        .y_axis(
            Axis::default()
                .style(Style::default().fg(MUTED))
                .bounds([0.0, top])
                .labels(vec![Span::raw("0"), Span::raw(format!("{top:.1}"))]),
        );
    f.render_widget(chart, area);
}

pub fn draw_network(f: &mut ratatui::Frame<'_>, area: Rect, c: &NetworkChart) {
    let sent = points(&c.sent);
    let recv = points(&c.recv);
    let top = peak(&c.sent).max(peak(&c.recv)).max(1.0);
    let bottom = c
        .sent
        .iter()
        .chain(c.recv.iter())
        .copied()
        .fold(f64::INFINITY, f64::min);
    let bottom = if bottom.is_finite() { bottom.min(top - 1.0) } else { 0.0 };

    let datasets = vec![
        line("Bytes sent".into(), &sent, NET_SENT),
        line("Bytes received".into(), &recv, NET_RECV),
    ];
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Network (cumulative)"),
        )
        .x_axis(x_axis(&c.labels))
        .y_axis(
            Axis::default()
                .style(Style::default().fg(MUTED))
                .bounds([bottom, top])
                .labels(vec![
                    Span::raw(format_bytes(bottom as u64)),
                    Span::raw(format_bytes(top as u64)),
                ]),
        );
    f.render_widget(chart, area);
}

/// Segment widths for a bar of `width` cells over the 300-point budget.
fn segment_widths(data: &[f64], width: u16) -> Vec<u16> {
    let mut out = Vec::with_capacity(data.len());
    let mut used = 0u16;
    for (i, v) in data.iter().enumerate() {
        let w = if i + 1 == data.len() {
            width.saturating_sub(used)
        } else {
            ((v.max(0.0) / RESOURCE_BUDGET) * width as f64).round() as u16
        };
        let w = w.min(width.saturating_sub(used));
        used += w;
        out.push(w);
    }
    out
}

/// Readout slots backing the first three resource segments.
const RESOURCE_SLOTS: [Slot; 3] = [Slot::ResourceCpu, Slot::ResourceMemory, Slot::ResourceDisk];

/// Legend text per segment: the matching readout when the view has one, else the raw value.
fn resource_legend(c: &ResourceChart, readouts: &Readouts) -> Vec<String> {
    c.data
        .iter()
        .enumerate()
        .map(|(i, v)| {
            RESOURCE_SLOTS
                .get(i)
                .and_then(|s| readouts.get(*s))
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("{v:.1}"))
        })
        .collect()
}

pub fn draw_resource(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    c: &ResourceChart,
    readouts: &Readouts,
) {
    let block = Block::default().borders(Borders::ALL).title("Resources");
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }
    if c.data.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("no data", Style::default().fg(MUTED))),
            inner,
        );
        return;
    }

    let colors = [CPU, MEMORY, DISK, AVAILABLE];
    let widths = segment_widths(&c.data, inner.width);
    let bar: Vec<Span> = widths
        .iter()
        .zip(colors.iter())
        .map(|(w, col)| Span::styled(" ".repeat(*w as usize), Style::default().bg(*col)))
        .collect();

    let legend = resource_legend(c, readouts);
    let mut lines = vec![Line::from(bar), Line::from("")];
    for (((label, v), text), col) in c
        .labels
        .iter()
        .zip(c.data.iter())
        .zip(legend.iter())
        .zip(colors.iter())
    {
        let value_style = if *label == "Available" {
            Style::default().fg(MUTED)
        } else {
            Style::default().fg(usage_color(*v))
        };
        lines.push(Line::from(vec![
            Span::styled("■ ", Style::default().fg(*col)),
            Span::raw(format!("{label:<10}")),
            Span::styled(format!("{text:>6}"), value_style),
        ]));
    }
    f.render_widget(Paragraph::new(lines), inner);
}
