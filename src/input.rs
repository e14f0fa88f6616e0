/// Held-key tracking.
///
/// Instead of acting on each key event individually, the game records the
/// frame of the last press/repeat event for every key.  A key counts as
/// "held" while that record is fresh, so Space and the direction keys can
/// all be held at once.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (kitty protocol): proper
///   `Press` / `Repeat` / `Release` events, keys are dropped on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows up as
///   repeated presses).  Keys expire after `HOLD_WINDOW` frames of silence,
///   which is shorter than the OS repeat interval.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEventKind};

/// A key is considered held if its last press/repeat arrived within this
/// many frames.
pub const HOLD_WINDOW: u64 = 4;

const LEFT_KEYS: [KeyCode; 3] = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT_KEYS: [KeyCode; 3] = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const UP_KEYS: [KeyCode; 3] = [KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const DOWN_KEYS: [KeyCode; 3] = [KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const SHOOT_KEYS: [KeyCode; 1] = [KeyCode::Char(' ')];

#[derive(Debug, Default)]
pub struct KeyTracker {
    key_frame: HashMap<KeyCode, u64>,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key event seen during `frame`.
    pub fn record(&mut self, code: KeyCode, kind: KeyEventKind, frame: u64) {
        match kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.key_frame.insert(code, frame);
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&code);
            }
        }
    }

    pub fn is_held(&self, key: &KeyCode, frame: u64) -> bool {
        self.key_frame
            .get(key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    fn any_held(&self, keys: &[KeyCode], frame: u64) -> bool {
        keys.iter().any(|k| self.is_held(k, frame))
    }

    /// Snapshot of the game controls for `frame`.
    pub fn controls(&self, frame: u64) -> Controls {
        Controls {
            left: self.any_held(&LEFT_KEYS, frame),
            right: self.any_held(&RIGHT_KEYS, frame),
            up: self.any_held(&UP_KEYS, frame),
            down: self.any_held(&DOWN_KEYS, frame),
            shoot: self.any_held(&SHOOT_KEYS, frame),
        }
    }
}

/// Which actions the player is asking for this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub shoot: bool,
}

impl Controls {
    pub fn moving(&self) -> bool {
        self.left || self.right || self.up || self.down
    }

    /// The same controls with movement suppressed (shooting kept).
    pub fn without_movement(self) -> Self {
        Controls {
            shoot: self.shoot,
            ..Controls::default()
        }
    }
}
