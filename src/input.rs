use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde::{Deserialize, Serialize};

/// Source of pending turn requests for a human player.
///
/// Requests may be raised at any time by the host; they are only read and
/// cleared from inside a tick.
pub trait TurnInput {
    fn has_pending_left_turn(&self) -> bool;
    fn has_pending_right_turn(&self) -> bool;
    fn clear_left_turn(&self);
    fn clear_right_turn(&self);
}

/// Shared left/right request flags.
///
/// Clones share the same flags, so the keyboard side and the player side can
/// each hold one.
#[derive(Debug, Clone, Default)]
pub struct TurnFlags {
    left: Arc<AtomicBool>,
    right: Arc<AtomicBool>,
}

impl TurnFlags {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_left(&self) {
        self.left.store(true, Ordering::Release);
    }

    pub fn request_right(&self) {
        self.right.store(true, Ordering::Release);
    }
}

impl TurnInput for TurnFlags {
    fn has_pending_left_turn(&self) -> bool {
        self.left.load(Ordering::Acquire)
    }

    fn has_pending_right_turn(&self) -> bool {
        self.right.load(Ordering::Acquire)
    }

    fn clear_left_turn(&self) {
        self.left.store(false, Ordering::Release);
    }

    fn clear_right_turn(&self) {
        self.right.store(false, Ordering::Release);
    }
}

/// Key pair a human player steers with.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyScheme {
    /// Left/Right arrow keys.
    #[default]
    Arrows,
    /// `A`/`D` keys.
    Letters,
}

impl KeyScheme {
    fn turn_for(self, code: KeyCode) -> Option<Turn> {
        match (self, code) {
            (Self::Arrows, KeyCode::Left) => Some(Turn::Left),
            (Self::Arrows, KeyCode::Right) => Some(Turn::Right),
            (Self::Letters, KeyCode::Char('a' | 'A')) => Some(Turn::Left),
            (Self::Letters, KeyCode::Char('d' | 'D')) => Some(Turn::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Turn {
    Left,
    Right,
}

/// Outcome of routing one key event.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum KeyAction {
    /// A turn request was recorded for some player.
    Turn,
    Quit,
    None,
}

/// Maps key presses to the flags of the player bound to each key scheme.
#[derive(Debug, Default)]
pub struct KeyboardRouter {
    bindings: Vec<(KeyScheme, TurnFlags)>,
}

impl KeyboardRouter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `scheme` to `flags`, replacing an earlier binding of that scheme.
    pub fn bind(&mut self, scheme: KeyScheme, flags: TurnFlags) {
        self.bindings.retain(|(bound, _)| *bound != scheme);
        self.bindings.push((scheme, flags));
    }

    pub fn handle_key(&self, key: KeyEvent) -> KeyAction {
        if key.kind == KeyEventKind::Release {
            return KeyAction::None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q' | 'Q')) {
            return KeyAction::Quit;
        }

        for (scheme, flags) in &self.bindings {
            match scheme.turn_for(key.code) {
                Some(Turn::Left) => {
                    flags.request_left();
                    return KeyAction::Turn;
                }
                Some(Turn::Right) => {
                    flags.request_right();
                    return KeyAction::Turn;
                }
                None => {}
            }
        }

        KeyAction::None
    }
}
