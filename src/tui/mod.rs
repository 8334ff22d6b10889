pub mod form;
pub mod render;
pub mod state;

use crate::engine::ListingInput;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use form::FormState;
use ratatui::prelude::*;
use state::AppState;
use std::io::stdout;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// Commands the TUI sends to the engine task.
#[derive(Debug, Clone)]
pub enum TuiCommand {
    Submit(ListingInput),
    Quit,
}

/// Outcome of a single key press on the form.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    None,
    Submit(ListingInput),
    Quit,
}

/// Apply one key press to the form.
pub fn handle_key(form: &mut FormState, code: KeyCode) -> KeyAction {
    if form.editing {
        match code {
            KeyCode::Enter => {
                // rejection is recorded in form.notice
                let _ = form.commit_edit();
            }
            KeyCode::Esc => form.cancel_edit(),
            KeyCode::Backspace => form.pop_char(),
            KeyCode::Char(c) => form.push_char(c),
            _ => {}
        }
        return KeyAction::None;
    }

    match code {
        KeyCode::Char('q') => return KeyAction::Quit,
        KeyCode::Char('s') => match form.to_listing_input() {
            Ok(input) => return KeyAction::Submit(input),
            Err(e) => form.notice = Some(format!("{:#}", e)),
        },
        KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => form.select_prev(),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => form.select_next(),
        KeyCode::Left | KeyCode::Char('h') => form.step_selected(false),
        KeyCode::Right | KeyCode::Char('l') => form.step_selected(true),
        KeyCode::Enter => form.begin_edit(),
        _ => {}
    }
    KeyAction::None
}

/// Run the TUI. Reads state from `state_rx`, sends commands on `cmd_tx`.
pub async fn run_tui(
    form: FormState,
    state_rx: watch::Receiver<AppState>,
    cmd_tx: mpsc::Sender<TuiCommand>,
) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = tui_loop(&mut terminal, form, state_rx, cmd_tx).await;

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn tui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mut form: FormState,
    state_rx: watch::Receiver<AppState>,
    cmd_tx: mpsc::Sender<TuiCommand>,
) -> Result<()> {
    loop {
        let state = state_rx.borrow().clone();
        terminal.draw(|f| render::draw(f, &state, &form))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key(&mut form, key.code) {
                    KeyAction::None => {}
                    KeyAction::Submit(input) => {
                        let _ = cmd_tx.send(TuiCommand::Submit(input)).await;
                    }
                    KeyAction::Quit => {
                        let _ = cmd_tx.send(TuiCommand::Quit).await;
                        return Ok(());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConstantsConfig, FormConfig};
    use crate::engine::RoomType;

    fn form() -> FormState {
        FormState::new(&FormConfig::default(), &ConstantsConfig::default())
    }

    fn type_text(form: &mut FormState, text: &str) {
        for c in text.chars() {
            handle_key(form, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_submit_defaults() {
        let mut f = form();
        match handle_key(&mut f, KeyCode::Char('s')) {
            KeyAction::Submit(input) => assert_eq!(input.city, "London"),
            other => panic!("expected submit, got {other:?}"),
        }
    }

    #[test]
    fn test_quit() {
        assert_eq!(handle_key(&mut form(), KeyCode::Char('q')), KeyAction::Quit);
    }

    #[test]
    fn test_keys_are_text_while_editing() {
        let mut f = form();
        handle_key(&mut f, KeyCode::Enter);
        assert!(f.editing);
        for _ in 0..6 {
            handle_key(&mut f, KeyCode::Backspace);
        }
        type_text(&mut f, "Lisbon");
        // 's' went into the buffer instead of submitting
        assert_eq!(f.edit_buffer, "Lisbon");
        handle_key(&mut f, KeyCode::Enter);
        assert!(!f.editing);
        assert_eq!(f.selected().value, "Lisbon");
    }

    #[test]
    fn test_arrow_navigation_and_choice() {
        let mut f = form();
        handle_key(&mut f, KeyCode::Down);
        handle_key(&mut f, KeyCode::Right);
        match handle_key(&mut f, KeyCode::Char('s')) {
            KeyAction::Submit(input) => assert_eq!(input.room_type, RoomType::PrivateRoom),
            other => panic!("expected submit, got {other:?}"),
        }
    }

    #[test]
    fn test_esc_cancels_edit() {
        let mut f = form();
        handle_key(&mut f, KeyCode::Enter);
        type_text(&mut f, "zzz");
        handle_key(&mut f, KeyCode::Esc);
        assert_eq!(f.selected().value, "London");
    }
}
