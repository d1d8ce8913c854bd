use crossterm::event::{Event, KeyCode, KeyEventKind};
use tokio::sync::mpsc;

use crate::app::App;
use crate::async_task::{Task, TaskResult};

pub fn handle_event(
    event: Event,
    app: &mut App,
    async_sender: &mpsc::Sender<Task>,
) -> crate::error::Result<()> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key.code, async_sender),
        _ => Ok(()),
    }
}

pub fn handle_key(
    app: &mut App,
    key: KeyCode,
    async_sender: &mpsc::Sender<Task>,
) -> crate::error::Result<()> {
    let keys = app.config.keybindings.clone();

    match key {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Char(c) if c == keys.quit => app.should_quit = true,
        KeyCode::Char(c) if c == keys.reload => request_reload(app, async_sender)?,
        _ if app.dashboard().is_none() => {}
        KeyCode::Up => {
            app.navigate_up();
        }
        KeyCode::Down => {
            app.navigate_down();
        }
        KeyCode::Left => {
            if app.collapse_selected() {
                app.status_message = "Collapsed directory".to_string();
            }
        }
        KeyCode::Right => {
            if app.expand_selected() {
                app.status_message = "Expanded directory".to_string();
            }
        }
        KeyCode::Enter => {
            if app.toggle_selected() {
                app.status_message = "Toggled directory".to_string();
            } else if let Some(row) = app.selected_row() {
                app.status_message = format!("Selected: {}", row.name);
            }
        }
        KeyCode::Home => {
            app.navigate_to_first();
        }
        KeyCode::End => {
            app.navigate_to_last();
        }
        KeyCode::Char(c) if c == keys.goto_top => {
            app.navigate_to_first();
        }
        KeyCode::Char(c) if c == keys.goto_bottom => {
            app.navigate_to_last();
        }
        _ => {}
    }

    Ok(())
}

fn request_reload(app: &mut App, async_sender: &mpsc::Sender<Task>) -> crate::error::Result<()> {
    let task = Task::Reload {
        source: app.source.clone(),
    };
    async_sender
        .try_send(task)
        .map_err(|e| crate::error::DashboardError::from(format!("Failed to request reload: {}", e)))?;
    app.begin_reload();
    log::info!("📤 event: reload requested for {:?}", app.source);
    Ok(())
}

/// Apply a worker result to the application state
pub fn handle_task_result(app: &mut App, result: TaskResult) {
    match result {
        TaskResult::SummaryLoaded { summary } => app.apply_summary(summary),
        TaskResult::Error { message } => app.fail(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::summary::CodeIntelSummary;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use std::path::PathBuf;

    fn loaded_app() -> App {
        App::from_summary("repo", CodeIntelSummary::default(), Config::default())
    }

    #[test]
    fn test_quit_keys() {
        let (sender, _receiver) = mpsc::channel(1);
        let mut app = loaded_app();
        handle_event(
            Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)),
            &mut app,
            &sender,
        )
        .unwrap();
        assert!(app.should_quit);

        let mut app = loaded_app();
        handle_key(&mut app, KeyCode::Esc, &sender).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_reload_sends_task() {
        let (sender, mut receiver) = mpsc::channel(1);
        let mut app = App::new("repo", PathBuf::from("summary.json"), Config::default());
        app.fail("gone".to_string());

        handle_key(&mut app, KeyCode::Char('r'), &sender).unwrap();
        assert!(app.is_loading());

        // Capacity one: a second press before the worker drains the queue fails
        assert!(handle_key(&mut app, KeyCode::Char('r'), &sender).is_err());

        match receiver.try_recv() {
            Ok(Task::Reload { source }) => assert_eq!(source, PathBuf::from("summary.json")),
            other => panic!("unexpected task: {:?}", other),
        }

        // Drained, so the next press queues another reload
        handle_key(&mut app, KeyCode::Char('r'), &sender).unwrap();
        assert!(matches!(receiver.try_recv(), Ok(Task::Reload { .. })));
    }

    #[test]
    fn test_task_results_update_state() {
        let mut app = App::new("repo", PathBuf::from("-"), Config::default());
        handle_task_result(&mut app, TaskResult::Error { message: "bad".to_string() });
        assert!(app.dashboard().is_none());
        assert!(!app.is_loading());

        handle_task_result(&mut app, TaskResult::SummaryLoaded { summary: CodeIntelSummary::default() });
        assert!(app.dashboard().is_some());
    }
}
