use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use snapdeck_core::fullpage::NavKey;

use crate::app::{App, Mode};
use crate::widgets::IndicatorWidget;

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    /// Deck navigation key, run through the gesture normalizer
    Nav(NavKey),
    // Imperative deck API
    NextSection,
    PrevSection,
    GoTo(usize),
    // Pointer gestures, y in pixels
    Wheel(f64),
    TouchStart(f64),
    TouchMove(f64),
    TouchEnd,
    // Demos
    StartWorker,
    RunMainThread,
    BlockingLoop,
    StartCpuChunks,
    StartJsonChunks,
    AbortStress,
    ToggleClockLog,
    // Modes
    StartInput,
    ToggleHelp,
    ExitMode,
    Confirm,
    InputChar(char),
    Backspace,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App) -> Action {
    match app.mode {
        Mode::Input => return handle_input_mode(key),
        Mode::Help => {
            // Any key exits help
            return Action::ExitMode;
        }
        Mode::Normal => {}
    }

    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        // Deck keys
        (KeyCode::Down, _) => Action::Nav(NavKey::ArrowDown),
        (KeyCode::Up, _) => Action::Nav(NavKey::ArrowUp),
        (KeyCode::PageDown, _) => Action::Nav(NavKey::PageDown),
        (KeyCode::PageUp, _) => Action::Nav(NavKey::PageUp),
        (KeyCode::Char(' '), KeyModifiers::NONE) => Action::Nav(NavKey::Space),
        (KeyCode::Home, _) => Action::Nav(NavKey::Home),
        (KeyCode::End, _) => Action::Nav(NavKey::End),

        // Direct API calls
        (KeyCode::Char('j'), KeyModifiers::NONE) => Action::NextSection,
        (KeyCode::Char('k'), KeyModifiers::NONE) => Action::PrevSection,
        (KeyCode::Char(c @ '1'..='9'), KeyModifiers::NONE) => {
            Action::GoTo(c as usize - '1' as usize)
        }

        // Demos
        (KeyCode::Enter, KeyModifiers::NONE) | (KeyCode::Char('w'), KeyModifiers::NONE) => {
            Action::StartWorker
        }
        (KeyCode::Char('m'), KeyModifiers::NONE) => Action::RunMainThread,
        (KeyCode::Char('b'), KeyModifiers::NONE) => Action::BlockingLoop,
        (KeyCode::Char('c'), KeyModifiers::NONE) => Action::StartCpuChunks,
        (KeyCode::Char('J'), KeyModifiers::SHIFT) | (KeyCode::Char('J'), KeyModifiers::NONE) => {
            Action::StartJsonChunks
        }
        (KeyCode::Char('x'), KeyModifiers::NONE) => Action::AbortStress,
        (KeyCode::Char('l'), KeyModifiers::NONE) => Action::ToggleClockLog,

        // Modes
        (KeyCode::Char('i'), KeyModifiers::NONE) => Action::StartInput,
        (KeyCode::Char('?'), _) => Action::ToggleHelp,
        (KeyCode::Esc, _) => Action::ExitMode,

        _ => Action::None,
    }
}

/// Handle key events in input mode (typing box)
fn handle_input_mode(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::Confirm,
        KeyCode::Esc => Action::ExitMode,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Char(c) => Action::InputChar(c),
        _ => Action::None,
    }
}

/// Map a mouse event to a deck action
///
/// Wheel ticks become wheel deltas, a left-button drag becomes a swipe and a
/// click on an indicator dot jumps to that section. Rows are scaled by
/// `cell_pixels` so swipe thresholds keep their pixel meaning.
pub fn handle_mouse_event(mouse: MouseEvent, app: &App, indicator: Rect) -> Action {
    if app.mode != Mode::Normal {
        return Action::None;
    }
    let cell_pixels = app.config.ui.cell_pixels;
    let y = mouse.row as f64 * cell_pixels;

    match mouse.kind {
        MouseEventKind::ScrollDown => Action::Wheel(cell_pixels),
        MouseEventKind::ScrollUp => Action::Wheel(-cell_pixels),
        MouseEventKind::Down(MouseButton::Left) => {
            match IndicatorWidget::hit_test(indicator, app.deck.section_count(), mouse.column, mouse.row)
            {
                Some(index) => Action::GoTo(index),
                None => Action::TouchStart(y),
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => Action::TouchMove(y),
        MouseEventKind::Up(MouseButton::Left) => Action::TouchEnd,
        _ => Action::None,
    }
}
