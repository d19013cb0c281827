use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};

use crate::app::{App, PromptKind, View};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    // An open prompt takes every key
    if let Some(prompt) = app.prompt.as_mut() {
        match key.code {
            KeyCode::Enter => app.submit_prompt(),
            KeyCode::Esc => app.cancel_prompt(),
            KeyCode::Backspace => {
                prompt.buffer.pop();
            }
            KeyCode::Char(c) => prompt.buffer.push(c),
            _ => {}
        }
        return;
    }

    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    app.notice = None;

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Tab | KeyCode::BackTab => app.next_view(),
        KeyCode::Char('?') => app.toggle_help(),

        // Field selection
        KeyCode::Char('a') => app.add_selected(false),
        KeyCode::Char('c') => app.add_selected(true),
        KeyCode::Char('x') => app.clear_selection(),

        // Draft edits
        KeyCode::Char('o') => app.add_output(),
        KeyCode::Char('e') => app.edit_output_address(),
        KeyCode::Char('m') => app.edit_output_amount(),
        KeyCode::Char('l') => app.start_prompt(PromptKind::MetadataLabel),
        KeyCode::Char('v') => app.edit_metadata_json(),
        KeyCode::Char('g') => app.start_prompt(PromptKind::RequiredSigner),
        KeyCode::Char('s') => app.start_prompt(PromptKind::ValidityStart),
        KeyCode::Char('t') => app.start_prompt(PromptKind::ValidityEnd),
        KeyCode::Char('R') => app.reset_draft(),
        KeyCode::Char('E') => app.export_with_notice(),

        // Navigation (Builder view)
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Char('d') | KeyCode::Delete => {
            if app.current_view == View::Builder {
                app.delete_focused();
            }
        }

        _ => {}
    }
}

/// Handle a mouse event; only the field view reacts
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if app.current_view != View::Field || app.prompt.is_some() {
        return;
    }
    match mouse.kind {
        MouseEventKind::Moved => app.hover_at(mouse.column, mouse.row),
        MouseEventKind::Down(MouseButton::Left) => app.click_at(mouse.column, mouse.row),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{init_app, utxo, ADDRESS};
    use crate::app::Prompt;
    use crossterm::event::{KeyModifiers, MouseEvent};
    use ratatui::layout::Rect;
    use test_case::test_case;

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test_case(KeyCode::Char('l') => PromptKind::MetadataLabel)]
    #[test_case(KeyCode::Char('g') => PromptKind::RequiredSigner)]
    #[test_case(KeyCode::Char('s') => PromptKind::ValidityStart)]
    #[test_case(KeyCode::Char('t') => PromptKind::ValidityEnd)]
    fn keys_open_prompts(code: KeyCode) -> PromptKind {
        let dir = tempfile::tempdir().unwrap();
        let mut app = init_app(&dir);
        press(&mut app, code);
        app.prompt.unwrap().kind
    }

    #[test]
    fn prompt_captures_keys_until_enter() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = init_app(&dir);
        press(&mut app, KeyCode::Char('g'));
        type_text(&mut app, "qx");
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "key");
        assert!(app.running);
        assert_eq!(
            app.prompt,
            Some(Prompt {
                kind: PromptKind::RequiredSigner,
                buffer: "qkey".to_string()
            })
        );

        press(&mut app, KeyCode::Enter);
        assert!(app.prompt.is_none());
        assert_eq!(app.builder.draft().required_signers[0].value, "qkey");
    }

    #[test]
    fn escape_cancels_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = init_app(&dir);
        press(&mut app, KeyCode::Char('l'));
        type_text(&mut app, "721");
        press(&mut app, KeyCode::Esc);
        assert!(app.prompt.is_none());
        assert!(app.builder.draft().metadata.is_empty());
    }

    #[test]
    fn keyboard_payment_flow() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = init_app(&dir);
        app.load(vec![utxo(0, 10_000_000)]);
        crate::app::tests::select_bubble(&mut app, 0);

        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char('o'));
        type_text(&mut app, ADDRESS);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('m'));
        type_text(&mut app, "5.0");
        press(&mut app, KeyCode::Enter);

        assert!(app.builder.is_valid());
        press(&mut app, KeyCode::Char('E'));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

        press(&mut app, KeyCode::Char('R'));
        assert!(app.builder.draft().is_empty());
    }

    #[test]
    fn delete_only_in_builder_view() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = init_app(&dir);
        press(&mut app, KeyCode::Char('o'));
        press(&mut app, KeyCode::Esc);

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.builder.draft().outputs.len(), 1);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_view, View::Builder);
        press(&mut app, KeyCode::Char('d'));
        assert!(app.builder.draft().outputs.is_empty());
    }

    #[test]
    fn j_and_k_move_focus() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = init_app(&dir);
        press(&mut app, KeyCode::Char('o'));
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('o'));
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('k'));
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.focused_row, 0);

        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.focused_row, 1);
        assert!(app.prompt.is_none());
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.focused_row, 0);
    }

    #[test]
    fn v_edits_metadata_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = init_app(&dir);
        press(&mut app, KeyCode::Char('l'));
        type_text(&mut app, "674");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('v'));
        assert_eq!(app.prompt.as_ref().map(|p| p.kind), Some(PromptKind::MetadataJson(674)));
    }

    #[test]
    fn help_swallows_next_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = init_app(&dir);
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(app.running);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn mouse_hovers_and_toggles_bubbles() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = init_app(&dir);
        app.load(vec![utxo(0, 10_000_000)]);
        app.sync_canvas(Rect::new(0, 0, 100, 30));

        let bubble = &app.field.bubbles()[0];
        let column = (bubble.x / crate::app::CELL_WIDTH_PX) as u16;
        let row = (bubble.y / crate::app::CELL_HEIGHT_PX) as u16;

        handle_mouse_event(&mut app, mouse(MouseEventKind::Moved, column, row));
        assert!(app.field.hovered().is_some());
        handle_mouse_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), column, row));
        assert_eq!(app.field.selected_count(), 1);

        handle_mouse_event(&mut app, mouse(MouseEventKind::Moved, 200, 200));
        assert!(app.field.hovered().is_none());

        app.next_view();
        handle_mouse_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), column, row));
        assert_eq!(app.field.selected_count(), 1);
    }
}
