use chrono::{DateTime, Local, Utc};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Widget, Wrap},
};

use snapdeck_core::worker::TaskReport;

use crate::app::{App, Mode, SectionKind};
use crate::theme::Theme;

use super::canvas::PixelCanvas;
use super::fps::FpsWidget;

/// Draw one full-height section into `buf`
pub fn render(kind: SectionKind, index: usize, hidden: bool, area: Rect, buf: &mut Buffer, app: &App) {
    let theme = &app.theme;
    let border = if hidden { theme.grey0 } else { theme.accent };
    let block = Block::default()
        .title(Span::styled(
            format!(" {}. {} ", index + 1, kind.title()),
            Style::default().fg(theme.fg0).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(theme.bg0));
    let inner = block.inner(area);
    block.render(area, buf);

    match kind {
        SectionKind::Intro => render_intro(inner, buf, app),
        SectionKind::Clock => render_clock(inner, buf, app),
        SectionKind::Stress => render_stress(inner, buf, app),
        SectionKind::Canvas => render_canvas(inner, buf, app),
        SectionKind::About => render_about(inner, buf, app),
    }
}

fn key<'a>(k: &'a str, theme: &Theme) -> Span<'a> {
    Span::styled(k, Style::default().fg(theme.yellow).add_modifier(Modifier::BOLD))
}

fn text<'a>(t: impl Into<std::borrow::Cow<'a, str>>, theme: &Theme) -> Span<'a> {
    Span::styled(t, Style::default().fg(theme.fg0))
}

fn render_intro(area: Rect, buf: &mut Buffer, app: &App) {
    let theme = &app.theme;
    let mut lines = vec![
        Line::from(Span::styled(
            "Main thread vs background worker",
            Style::default().fg(theme.aqua).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(text(
            "Heavy work on the UI thread freezes input and animation. The same work in a worker thread does not.",
            theme,
        )),
        Line::default(),
        Line::from(vec![
            text("Move between sections: ", theme),
            key("wheel", theme),
            text(", drag, ", theme),
            key("↓ ↑ PgDn PgUp Space Home End", theme),
        ]),
        Line::from(vec![
            key("j/k", theme),
            text(" next / previous   ", theme),
            key("1-9", theme),
            text(" jump   ", theme),
            key("?", theme),
            text(" help   ", theme),
            key("q", theme),
            text(" quit", theme),
        ]),
        Line::default(),
    ];
    for (index, kind) in app.sections.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", index + 1), Style::default().fg(theme.grey1)),
            text(kind.title(), theme),
            Span::styled(
                format!("  #{}", app.deck.fragment_for(index)),
                Style::default().fg(theme.blue),
            ),
        ]));
    }

    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

fn render_clock(area: Rect, buf: &mut Buffer, app: &App) {
    let theme = &app.theme;
    let clock_face = |t: DateTime<Utc>| t.with_timezone(&Local).format("%H:%M:%S").to_string();
    let task_time = app
        .clock_time
        .map(clock_face)
        .unwrap_or_else(|| "--:--:--".to_string());
    let loop_time = clock_face(app.loop_clock.time());
    let logging = if app.clock_logging { "on" } else { "off" };

    let top = area.height.saturating_sub(7) / 2;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(top),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    for (column, label, time) in [
        (columns[0], "UI loop", loop_time),
        (columns[1], "Background task", task_time),
    ] {
        let lines = vec![
            Line::from(Span::styled(label, Style::default().fg(theme.grey1))),
            Line::from(Span::styled(
                time,
                Style::default().fg(theme.yellow).add_modifier(Modifier::BOLD),
            )),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(column, buf);
    }

    let lines = vec![
        Line::from(text(
            "Both keep their own copy of the time. Block the UI loop (m, b) and only the left one stops.",
            theme,
        )),
        Line::from(vec![
            text("Tick logging: ", theme),
            Span::styled(logging, Style::default().fg(theme.blue)),
            text("  (", theme),
            key("l", theme),
            text(" to toggle)", theme),
        ]),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(rows[2], buf);
}

fn render_stress(area: Rect, buf: &mut Buffer, app: &App) {
    let theme = &app.theme;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Keys
            Constraint::Length(1), // Progress
            Constraint::Length(6), // FPS
            Constraint::Length(3), // Input box
            Constraint::Min(0),    // Log
        ])
        .split(area);

    Paragraph::new(vec![
        Line::from(vec![
            key("b", theme),
            text(" block 3 s (cannot be interrupted)   ", theme),
            key("c", theme),
            text(" cpu chunks   ", theme),
            key("J", theme),
            text(" json chunks   ", theme),
            key("x", theme),
            text(" abort", theme),
        ]),
        Line::from(vec![
            key("i", theme),
            text(" type in the box to feel the input latency", theme),
        ]),
    ])
    .render(chunks[0], buf);

    let label = match &app.stress {
        Some(_) => format!("{:.0}%", app.stress_progress * 100.0),
        None => "idle".to_string(),
    };
    Gauge::default()
        .gauge_style(Style::default().fg(theme.orange).bg(theme.bg1))
        .ratio(app.stress_progress.clamp(0.0, 1.0))
        .label(label)
        .render(chunks[1], buf);

    FpsWidget::render(chunks[2], buf, &app.fps, theme);

    render_input_box(chunks[3], buf, app);
    render_log(chunks[4], buf, app);
}

fn render_input_box(area: Rect, buf: &mut Buffer, app: &App) {
    let theme = &app.theme;
    let editing = app.mode == Mode::Input;
    let title = Line::from(vec![
        Span::raw(" Input latency: "),
        Span::styled(
            format!("{}ms ", app.latency.last_ms()),
            Style::default()
                .fg(theme.health(app.latency.is_degraded()))
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    let border = if editing { theme.accent } else { theme.grey0 };
    let cursor = if editing { "▏" } else { "" };

    Paragraph::new(Line::from(vec![
        text(app.input.as_str(), theme),
        Span::styled(cursor, Style::default().fg(theme.accent)),
    ]))
    .block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    )
    .render(area, buf);
}

fn render_log(area: Rect, buf: &mut Buffer, app: &App) {
    let theme = &app.theme;
    let items: Vec<ListItem> = app
        .log
        .iter()
        .map(|line| ListItem::new(Span::styled(line.as_str(), Style::default().fg(theme.grey1))))
        .collect();
    List::new(items)
        .block(
            Block::default()
                .title(" Log ")
                .borders(Borders::TOP)
                .border_style(Style::default().fg(theme.grey0)),
        )
        .render(area, buf);
}

fn report_line(report: Option<TaskReport>) -> String {
    match report {
        Some(r) if r.cancelled => format!("cancelled after {} passes", r.passes),
        Some(r) => format!("{} passes in {} ms", r.passes, r.elapsed.as_millis()),
        None => "not run yet".to_string(),
    }
}

fn render_canvas(area: Rect, buf: &mut Buffer, app: &App) {
    let theme = &app.theme;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keys
            Constraint::Min(3),    // Canvases
            Constraint::Length(3), // Reports
        ])
        .split(area);

    Paragraph::new(Line::from(vec![
        key("m", theme),
        text(" run on the main thread (UI freezes)   ", theme),
        key("Enter/w", theme),
        text(" run in the worker", theme),
    ]))
    .render(chunks[0], buf);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(chunks[1]);

    let main_block = Block::default()
        .title(" Main thread ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.red));
    let main_inner = main_block.inner(columns[0]);
    main_block.render(columns[0], buf);
    PixelCanvas::new(app.main_canvas.pixels()).render(main_inner, buf);

    let worker_title = if app.bridge.is_offscreen() {
        " Worker · offscreen "
    } else {
        " Worker · fallback "
    };
    let worker_block = Block::default()
        .title(worker_title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.green));
    let worker_inner = worker_block.inner(columns[1]);
    worker_block.render(columns[1], buf);
    app.bridge
        .with_pixels(|pixels| PixelCanvas::new(pixels).render(worker_inner, buf));

    let worker_state = if app.bridge.is_busy() {
        Span::styled("busy", Style::default().fg(theme.orange))
    } else {
        Span::styled("idle", Style::default().fg(theme.green))
    };
    Paragraph::new(vec![
        Line::from(vec![
            text("Main: ", theme),
            text(report_line(app.main_report), theme),
        ]),
        Line::from(vec![
            text("Worker (", theme),
            worker_state,
            text("): ", theme),
            text(report_line(app.bridge.last_report()), theme),
        ]),
        Line::from(vec![
            text("Input latency: ", theme),
            Span::styled(
                format!("{}ms", app.latency.last_ms()),
                Style::default().fg(theme.health(app.latency.is_degraded())),
            ),
        ]),
    ])
    .render(chunks[2], buf);
}

fn render_about(area: Rect, buf: &mut Buffer, app: &App) {
    let theme = &app.theme;
    let fullpage = &app.config.fullpage;
    let option = |name: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("  {:<16}", name), Style::default().fg(theme.grey1)),
            text(value, theme),
        ])
    };

    let lines = vec![
        Line::from(Span::styled(
            "Full-page deck",
            Style::default().fg(theme.aqua).add_modifier(Modifier::BOLD),
        )),
        Line::from(text(
            "One section fills the screen. Each gesture moves exactly one section with an eased transition; gestures during a transition are dropped.",
            theme,
        )),
        Line::default(),
        option("duration", format!("{} ms", fullpage.duration_ms)),
        option("easing", format!("{:?}", fullpage.easing)),
        option("loop", fullpage.looping.to_string()),
        option("wheel cooldown", format!("{} ms", fullpage.wheel_cooldown_ms)),
        option("swipe threshold", format!("{} px", fullpage.touch_threshold)),
        option("reduced motion", fullpage.reduced_motion.to_string()),
        option("location", app.deck.location().current().to_string()),
        Line::default(),
        Line::from(vec![
            text("Config file: ", theme),
            Span::styled(
                snapdeck_core::AppConfig::config_path().display().to_string(),
                Style::default().fg(theme.blue),
            ),
        ]),
    ];

    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .filter_map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()))
            .collect()
    }

    #[test]
    fn test_clock_section_shows_both_clocks() {
        let app = App::for_tests();
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        render_clock(area, &mut buf, &app);

        let screen: Vec<String> = (0..area.height).map(|y| row_text(&buf, y)).collect();
        let labels = screen
            .iter()
            .find(|row| row.contains("UI loop"))
            .expect("labels row");
        assert!(labels.contains("Background task"));
        // the task clock has not ticked yet
        assert!(screen.iter().any(|row| row.contains("--:--:--")));
    }
}
