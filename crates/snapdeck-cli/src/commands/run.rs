use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use snapdeck_core::AppConfig;
use snapdeck_tui::{
    app::{App, Mode},
    event::{AppEvent, EventHandler},
    input::{handle_key_event, handle_mouse_event, Action},
    widgets::{AppLayout, DeckWidget, IndicatorWidget, PopupWidget, StatusBarWidget},
    Theme,
};

use crate::RunArgs;

pub async fn run(mut config: AppConfig, args: RunArgs) -> Result<()> {
    if args.fallback {
        config.worker.offscreen = false;
    }
    let config = Arc::new(config);

    // Create app state before touching the terminal so setup errors print normally
    let mut app = App::new(config.clone(), Theme::default(), args.section.as_deref())?;
    app.attach_clock();
    info!(section = app.deck.current_index(), "starting tui");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("Snapdeck"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    app.deck.dispose();
    app.bridge.terminate();
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let mut event_handler =
        EventHandler::with_animation_fps(app.config.ui.tick_rate_ms, app.config.ui.animation_fps);

    // Track if we need high frame rate for transitions and running jobs
    // This is checked at the END of each iteration to determine NEXT iteration's tick rate
    let mut needs_fast_update = false;
    let mut layout = AppLayout::new(terminal.get_frame().area());

    // Main loop
    loop {
        app.on_refresh(Instant::now());

        // Draw UI
        terminal.draw(|frame| {
            layout = AppLayout::new(frame.area());
            app.resize(layout.deck.height);

            DeckWidget::render(frame, layout.deck, app);
            IndicatorWidget::render(frame, layout.indicator, app);
            StatusBarWidget::render(frame, layout.status, app);

            if app.mode == Mode::Help {
                PopupWidget::render_help(frame, &app.theme);
            }
        })?;
        app.fps.record(Instant::now());

        // Handle events (use faster tick rate during animations)
        let event = if needs_fast_update {
            event_handler.next_animation().await?
        } else {
            event_handler.next().await?
        };

        // Drain whatever queued up behind it, e.g. while the UI thread was blocked
        let mut pending = vec![event];
        while let Some(event) = event_handler.try_next() {
            pending.push(event);
        }
        for event in pending {
            handle_event(app, event, layout);
        }

        // Update fast update flag for next iteration
        needs_fast_update = app.needs_fast_update();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_event(app: &mut App, event: AppEvent, layout: AppLayout) {
    let now = Instant::now();
    if let Some(read_at) = event.read_at() {
        app.record_latency(read_at, now);
    }

    let action = match event {
        AppEvent::Key(key, _) => handle_key_event(key, app),
        AppEvent::Mouse(mouse, _) => handle_mouse_event(mouse, app, layout.indicator),
        AppEvent::Resize(_, _) | AppEvent::Tick => Action::None,
    };

    match action {
        // These hold the UI thread on purpose; let the runtime move other tasks off it
        Action::RunMainThread | Action::BlockingLoop => {
            tokio::task::block_in_place(|| app.handle_action(action, now));
        }
        action => app.handle_action(action, now),
    }
}
