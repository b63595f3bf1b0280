pub mod render;
pub mod state;

use crate::config::UiConfig;
use crate::controller::UserFeedController;
use crate::feed::UserDataSource;
use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use futures_util::StreamExt;
use ratatui::prelude::*;
use state::{IntentOutcome, ViewState};
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Refresh,
    Add,
    Up,
    Down,
    Top,
    Bottom,
}

pub fn key_action(key: KeyEvent) -> Option<KeyAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(KeyAction::Quit);
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(KeyAction::Quit),
        KeyCode::Char('r') | KeyCode::F(5) => Some(KeyAction::Refresh),
        KeyCode::Char('a') | KeyCode::Char('+') => Some(KeyAction::Add),
        KeyCode::Up | KeyCode::Char('k') => Some(KeyAction::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(KeyAction::Down),
        KeyCode::Home | KeyCode::Char('g') => Some(KeyAction::Top),
        KeyCode::End | KeyCode::Char('G') => Some(KeyAction::Bottom),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy)]
enum Intent {
    Mount,
    Refresh,
    Add,
}

/// Run each intent on its own task so a slow fetch never blocks input and
/// overlapping intents resolve in completion order.
fn spawn_intent<S>(
    controller: &Arc<UserFeedController<S>>,
    intent: Intent,
    outcome_tx: mpsc::Sender<IntentOutcome>,
) where
    S: UserDataSource + 'static,
{
    let controller = controller.clone();
    tokio::spawn(async move {
        let outcome = match intent {
            Intent::Mount => match controller.on_mount().await {
                Some(count) => IntentOutcome::Loaded(count),
                None => return,
            },
            Intent::Refresh => IntentOutcome::Refreshed(controller.refresh().await),
            Intent::Add => IntentOutcome::Added(controller.add_one().await),
        };
        let _ = outcome_tx.send(outcome).await;
    });
}

/// Run the TUI until the user quits. Mounting triggers the initial load.
pub async fn run_tui<S>(controller: Arc<UserFeedController<S>>, ui: &UiConfig) -> Result<()>
where
    S: UserDataSource + 'static,
{
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = tui_loop(&mut terminal, controller, ViewState::new(ui)).await;

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn tui_loop<S>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    controller: Arc<UserFeedController<S>>,
    mut view: ViewState,
) -> Result<()>
where
    S: UserDataSource + 'static,
{
    let mut events = EventStream::new();
    let mut state_rx = controller.subscribe();
    let (outcome_tx, mut outcome_rx) = mpsc::channel::<IntentOutcome>(16);
    let mut tick = tokio::time::interval(Duration::from_millis(100));

    spawn_intent(&controller, Intent::Mount, outcome_tx.clone());

    loop {
        let feed = state_rx.borrow_and_update().clone();
        view.clamp_selection(feed.len());
        terminal.draw(|f| render::draw(f, &feed, &view))?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    match key_action(key) {
                        Some(KeyAction::Quit) => return Ok(()),
                        Some(KeyAction::Refresh) => {
                            tracing::debug!("refresh requested");
                            spawn_intent(&controller, Intent::Refresh, outcome_tx.clone());
                        }
                        Some(KeyAction::Add) => {
                            view.pending_adds += 1;
                            spawn_intent(&controller, Intent::Add, outcome_tx.clone());
                        }
                        Some(KeyAction::Up) => view.select_prev(),
                        Some(KeyAction::Down) => view.select_next(feed.len()),
                        Some(KeyAction::Top) => view.select_first(),
                        Some(KeyAction::Bottom) => view.select_last(feed.len()),
                        None => {}
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
            _ = state_rx.changed() => {}
            Some(outcome) = outcome_rx.recv() => view.record_outcome(outcome),
            _ = tick.tick() => view.spinner_frame = view.spinner_frame.wrapping_add(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_actions() {
        assert_eq!(key_action(press(KeyCode::Char('r'))), Some(KeyAction::Refresh));
        assert_eq!(key_action(press(KeyCode::Char('a'))), Some(KeyAction::Add));
        assert_eq!(key_action(press(KeyCode::Char('+'))), Some(KeyAction::Add));
        assert_eq!(key_action(press(KeyCode::Char('j'))), Some(KeyAction::Down));
        assert_eq!(key_action(press(KeyCode::Up)), Some(KeyAction::Up));
        assert_eq!(key_action(press(KeyCode::Char('G'))), Some(KeyAction::Bottom));
        assert_eq!(key_action(press(KeyCode::Esc)), Some(KeyAction::Quit));
        assert_eq!(key_action(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_action(key), Some(KeyAction::Quit));
        assert_eq!(key_action(press(KeyCode::Char('c'))), None);
    }
}
