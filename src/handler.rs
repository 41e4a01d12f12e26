use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::warn;

use crate::app::App;
use crate::config::Config;
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize => app.scroll_to_bottom(),
        AppEvent::Tick => app.tick_animation(),
        AppEvent::ModelsDiscovered(result) => app.session.finish_discovery(result),
        AppEvent::Generated(result) => {
            app.session.finish_generation(result);
            app.scroll_to_bottom();
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.show_mood_picker {
        handle_mood_picker(app, key);
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab | KeyCode::F(2) => app.open_mood_picker(),
        KeyCode::PageUp => app.scroll_up(app.chat_height.max(1) / 2),
        KeyCode::PageDown => app.scroll_down(app.chat_height.max(1) / 2),
        _ => handle_input_key(app, key),
    }
}

fn handle_mood_picker(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.show_mood_picker = false,
        KeyCode::Char('j') | KeyCode::Down => app.mood_picker_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.mood_picker_nav_up(),
        KeyCode::Enter => {
            if let Some(mood) = app.select_mood() {
                if let Err(err) = Config::save_default_mood(mood) {
                    warn!(error = %err, "could not save default mood");
                }
            }
        }
        _ => {}
    }
}

/// Editing keys for the message box. Ignored while the box is disabled.
fn handle_input_key(app: &mut App, key: KeyEvent) {
    if !app.session.can_submit() {
        return;
    }

    // Shift+Enter (or Alt+Enter where the terminal can't report Shift) breaks the line
    let newline = key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT);
    if key.code == KeyCode::Enter && !newline {
        app.submit();
        return;
    }

    let input = &mut app.session.pending_input;
    match key.code {
        KeyCode::Enter => {
            let byte_pos = char_to_byte_index(input, app.input_cursor);
            input.insert(byte_pos, '\n');
            app.input_cursor += 1;
        }
        KeyCode::Backspace => {
            if app.input_cursor > 0 {
                app.input_cursor -= 1;
                let byte_pos = char_to_byte_index(input, app.input_cursor);
                input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            if app.input_cursor < input.chars().count() {
                let byte_pos = char_to_byte_index(input, app.input_cursor);
                input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.input_cursor = app.input_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            app.input_cursor = (app.input_cursor + 1).min(input.chars().count());
        }
        KeyCode::Home => {
            app.input_cursor = 0;
        }
        KeyCode::End => {
            app.input_cursor = input.chars().count();
        }
        // Ctrl/Alt chords are commands, not text
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            let byte_pos = char_to_byte_index(input, app.input_cursor);
            input.insert(byte_pos, c);
            app.input_cursor += 1;
        }
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let in_chat = app
        .chat_area
        .map(|r| point_in_rect(mouse.column, mouse.row, r))
        .unwrap_or(false);
    if !in_chat {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_down(3),
        MouseEventKind::ScrollUp => app.scroll_up(3),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::Mood;
    use crate::ollama::OllamaClient;
    use crate::session::ChatSession;
    use tokio::sync::mpsc;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, modifiers))
    }

    fn typed(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_key_sync(app, key(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    fn handle_key_sync(app: &mut App, event: AppEvent) {
        if let AppEvent::Key(k) = event {
            handle_key(app, k);
        }
    }

    fn ready_app(model: Option<&str>) -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        App::new(
            ChatSession::new(Mood::Funny, model.map(str::to_string)),
            OllamaClient::new("http://localhost:11434"),
            tx,
        )
    }

    #[test]
    fn test_char_to_byte_index() {
        assert_eq!(char_to_byte_index("mrow", 2), 2);
        assert_eq!(char_to_byte_index("🐾ab", 1), 4);
        assert_eq!(char_to_byte_index("ab", 10), 2);
    }

    #[test]
    fn test_cursor_editing_is_utf8_safe() {
        let mut app = ready_app(Some("m"));
        typed(&mut app, "mrw🐾");
        handle_key_sync(&mut app, key(KeyCode::Left, KeyModifiers::NONE));
        handle_key_sync(&mut app, key(KeyCode::Left, KeyModifiers::NONE));
        typed(&mut app, "o");
        assert_eq!(app.session.pending_input, "mrow🐾");

        handle_key_sync(&mut app, key(KeyCode::End, KeyModifiers::NONE));
        handle_key_sync(&mut app, key(KeyCode::Backspace, KeyModifiers::NONE));
        assert_eq!(app.session.pending_input, "mrow");

        handle_key_sync(&mut app, key(KeyCode::Home, KeyModifiers::NONE));
        handle_key_sync(&mut app, key(KeyCode::Delete, KeyModifiers::NONE));
        assert_eq!(app.session.pending_input, "row");
    }

    #[test]
    fn test_shift_enter_inserts_newline() {
        let mut app = ready_app(Some("m"));
        typed(&mut app, "line one");
        handle_key_sync(&mut app, key(KeyCode::Enter, KeyModifiers::SHIFT));
        typed(&mut app, "line two");
        assert_eq!(app.session.pending_input, "line one\nline two");
        assert!(app.session.transcript().is_empty());
    }

    #[test]
    fn test_modified_chars_are_not_typed() {
        let mut app = ready_app(Some("m"));
        typed(&mut app, "purr");
        handle_key_sync(&mut app, key(KeyCode::Char('w'), KeyModifiers::CONTROL));
        handle_key_sync(&mut app, key(KeyCode::Char('b'), KeyModifiers::ALT));
        handle_key_sync(&mut app, key(KeyCode::Char('u'), KeyModifiers::CONTROL | KeyModifiers::SHIFT));
        assert_eq!(app.session.pending_input, "purr");
        assert_eq!(app.input_cursor, 4);

        handle_key_sync(&mut app, key(KeyCode::Char('S'), KeyModifiers::SHIFT));
        assert_eq!(app.session.pending_input, "purrS");
        assert_eq!(app.input_cursor, 5);
    }

    #[tokio::test]
    async fn test_enter_submits_canned_reply() {
        let mut app = ready_app(Some("m"));
        typed(&mut app, "good kitty");
        handle_event(&mut app, key(KeyCode::Enter, KeyModifiers::NONE))
            .await
            .unwrap();

        assert!(app.session.pending_input.is_empty());
        assert_eq!(app.input_cursor, 0);
        assert_eq!(app.session.transcript().len(), 2);
    }

    #[test]
    fn test_input_disabled_without_model() {
        let mut app = ready_app(None);
        typed(&mut app, "meow");
        assert!(app.session.pending_input.is_empty());
    }

    #[test]
    fn test_ctrl_c_and_esc_quit() {
        let mut app = ready_app(Some("m"));
        handle_key_sync(&mut app, key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);

        let mut app = ready_app(Some("m"));
        handle_key_sync(&mut app, key(KeyCode::Esc, KeyModifiers::NONE));
        assert!(app.should_quit);
    }

    #[test]
    fn test_esc_closes_picker_without_quitting() {
        let mut app = ready_app(Some("m"));
        handle_key_sync(&mut app, key(KeyCode::Tab, KeyModifiers::NONE));
        assert!(app.show_mood_picker);

        handle_key_sync(&mut app, key(KeyCode::Down, KeyModifiers::NONE));
        handle_key_sync(&mut app, key(KeyCode::Esc, KeyModifiers::NONE));
        assert!(!app.show_mood_picker);
        assert!(!app.should_quit);
        assert_eq!(app.session.mood(), Mood::Funny);
    }
}
