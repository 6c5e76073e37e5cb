//! Rendering for the dashboard TUI.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Sparkline};

use tirta_core::ChartSeries;
use tirta_types::{Severity, SensorKind};

use super::app::App;

/// Smallest terminal the dashboard will try to render in.
const MIN_WIDTH: u16 = 40;
const MIN_HEIGHT: u16 = 12;

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Good => Color::Green,
        Severity::Warning => Color::Yellow,
        Severity::Danger => Color::Red,
    }
}

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let message = Paragraph::new("Terminal too small\n\nPress 'q' to quit")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(message, area);
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),  // Status cards
            Constraint::Length(1),  // Banner
            Constraint::Min(6),     // Trend sparklines
            Constraint::Length(1),  // Help line
        ])
        .split(area);

    draw_status_cards(frame, app, layout[0]);
    draw_banner(frame, app, layout[1]);
    draw_trends(frame, app, layout[2]);

    let help = Paragraph::new(" q quit | r refresh | c clear history")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, layout[3]);
}

/// One bordered card per sensor dimension, colored by severity.
fn draw_status_cards(frame: &mut Frame, app: &App, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    for (i, kind) in SensorKind::ALL.into_iter().enumerate() {
        let (value_line, status_line, color) = match app.latest() {
            Some(item) => {
                let status =
                    app.classifier
                        .classify(kind, item.value(kind), item.server_status(kind));
                let value = match kind {
                    SensorKind::Temperature => format!("{:.1} {}", item.temperature, kind.unit()),
                    SensorKind::WaterLevel => format!("{:.0}{}", item.level_percent, kind.unit()),
                    SensorKind::Turbidity => format!("{:.0} {}", item.ntu, kind.unit()),
                };
                (value, status.label, severity_color(status.severity))
            }
            None => ("--".to_string(), "Menunggu data".to_string(), Color::DarkGray),
        };

        let card = Paragraph::new(vec![
            Line::from(Span::styled(
                value_line,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(status_line, Style::default().fg(color))),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(format!(" {} ", kind))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
        frame.render_widget(card, cards[i]);
    }
}

/// One line: the latest fetch error, else the newest alert, else the last
/// update time.
fn draw_banner(frame: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(error) = app.fetch_error() {
        Line::from(Span::styled(
            format!(" Fetch failed: {}", error),
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(alert) = app.alerts().last() {
        Line::from(Span::styled(
            format!(" !! {}", alert),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    } else if let Some(item) = app.latest() {
        Line::from(Span::styled(
            format!(" Terakhir diperbarui {}", app.feed.format_label(item.timestamp_ms)),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(Span::styled(
            " Menunggu data sensor...",
            Style::default().fg(Color::DarkGray),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Stacked sparklines, one per dimension, spanning the stored window.
fn draw_trends(frame: &mut Frame, app: &App, area: Rect) {
    let series = app.feed.project(app.items());
    let range = match (app.items().first(), app.items().last()) {
        (Some(first), Some(last)) => format!(
            " {} - {} ",
            app.feed.format_label(first.timestamp_ms),
            app.feed.format_label(last.timestamp_ms)
        ),
        _ => String::new(),
    };

    let block = Block::default()
        .title(" Trend ")
        .title_bottom(Line::from(range).right_aligned())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(inner);

    for (i, kind) in SensorKind::ALL.into_iter().enumerate() {
        let data = sparkline_data(&series, kind);
        let color = match kind {
            SensorKind::Temperature => Color::Magenta,
            SensorKind::WaterLevel => Color::Blue,
            SensorKind::Turbidity => Color::Cyan,
        };
        let sparkline = Sparkline::default()
            .data(&data)
            .style(Style::default().fg(color));
        frame.render_widget(sparkline, rows[i]);
    }
}

/// Scale one series to the `u64` samples a sparkline renders. Temperature
/// is scaled by 10 to keep a decimal of resolution.
fn sparkline_data(series: &ChartSeries, kind: SensorKind) -> Vec<u64> {
    let values = match kind {
        SensorKind::Temperature => &series.temperature,
        SensorKind::WaterLevel => &series.level,
        SensorKind::Turbidity => &series.ntu,
    };
    let scale = match kind {
        SensorKind::Temperature => 10.0,
        _ => 1.0,
    };
    values
        .iter()
        .map(|v| (v.max(0.0) * scale).round() as u64)
        .collect()
}
