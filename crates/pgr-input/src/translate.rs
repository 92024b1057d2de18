//! `crossterm::event::Event` -> `pgr_events::Event` translation.
//!
//! Only the shapes this pager actually consumes are mapped; focus/paste
//! events are dropped here rather than surfaced as `InputEvent` variants,
//! since nothing downstream currently acts on them.

use crossterm::event::{
    Event as CEvent, KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind, KeyModifiers as CMods,
    MouseButton as CMouseButton, MouseEvent as CMouseEvent, MouseEventKind as CMouseEventKind,
};
use pgr_events::{
    Event, InputEvent, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

pub fn translate(event: CEvent) -> Option<Event> {
    match event {
        CEvent::Key(key) => translate_key(key).map(|k| Event::Input(InputEvent::Key(k))),
        CEvent::Mouse(mouse) => translate_mouse(mouse).map(|m| Event::Input(InputEvent::Mouse(m))),
        CEvent::Resize(cols, rows) => Some(Event::Resize(cols, rows)),
        CEvent::FocusGained | CEvent::FocusLost | CEvent::Paste(_) => None,
    }
}

fn translate_key(key: CKeyEvent) -> Option<KeyEvent> {
    // Auto-repeat/release reports are terminal-capability dependent; only
    // act on presses to keep behavior uniform across terminals.
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let code = match key.code {
        CKeyCode::Char(c) => KeyCode::Char(c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Tab => KeyCode::Tab,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        CKeyCode::PageUp => KeyCode::PageUp,
        CKeyCode::PageDown => KeyCode::PageDown,
        CKeyCode::F(n) => KeyCode::F(n),
        _ => return None,
    };
    Some(KeyEvent { code, mods: translate_mods(key.modifiers) })
}

fn translate_mods(mods: CMods) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if mods.contains(CMods::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if mods.contains(CMods::ALT) {
        out |= KeyModifiers::ALT;
    }
    if mods.contains(CMods::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}

fn translate_mouse(mouse: CMouseEvent) -> Option<MouseEvent> {
    let kind = match mouse.kind {
        CMouseEventKind::Down(b) => MouseEventKind::Down(translate_button(b)),
        CMouseEventKind::Up(b) => MouseEventKind::Up(translate_button(b)),
        CMouseEventKind::Drag(b) => MouseEventKind::Drag(translate_button(b)),
        CMouseEventKind::ScrollUp => MouseEventKind::ScrollUp,
        CMouseEventKind::ScrollDown => MouseEventKind::ScrollDown,
        CMouseEventKind::Moved | CMouseEventKind::ScrollLeft | CMouseEventKind::ScrollRight => {
            return None
        }
    };
    Some(MouseEvent { kind, column: mouse.column, row: mouse.row })
}

fn translate_button(b: CMouseButton) -> MouseButton {
    match b {
        CMouseButton::Left => MouseButton::Left,
        CMouseButton::Right => MouseButton::Right,
        CMouseButton::Middle => MouseButton::Middle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    #[test]
    fn release_events_are_dropped() {
        let key = CKeyEvent {
            code: CKeyCode::Char('a'),
            modifiers: CMods::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(translate_key(key).is_none());
    }

    #[test]
    fn resize_maps_directly() {
        let ev = translate(CEvent::Resize(120, 40));
        assert!(matches!(ev, Some(Event::Resize(120, 40))));
    }

    #[test]
    fn ctrl_shift_modifiers_are_preserved() {
        let key = CKeyEvent {
            code: CKeyCode::Left,
            modifiers: CMods::CONTROL | CMods::SHIFT,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        };
        let translated = translate_key(key).unwrap();
        assert_eq!(translated.code, KeyCode::Left);
        assert!(translated.mods.contains(KeyModifiers::CTRL));
        assert!(translated.mods.contains(KeyModifiers::SHIFT));
    }
}
