use std::cell::Cell;
use std::rc::Rc;

use super::SceneCommand;
use crate::animation::AnimateState;
use crate::view::ShowOption;

/// Modal interaction state threaded through the controller.
///
/// While the keyboard is locked (text entry in a label or caption box) key
/// shortcuts are ignored; direct commands still run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionState {
    keyboard_locked: bool,
    pending_distance: Option<usize>,
}

impl InteractionState {
    /// Whether key shortcuts are suspended.
    #[must_use]
    pub fn is_keyboard_locked(&self) -> bool {
        self.keyboard_locked
    }

    /// Suspend key shortcuts.
    pub fn lock_keyboard(&mut self) {
        self.keyboard_locked = true;
    }

    /// Resume key shortcuts.
    pub fn unlock_keyboard(&mut self) {
        self.keyboard_locked = false;
    }

    /// First atom of a distance measurement in progress.
    #[must_use]
    pub fn pending_distance(&self) -> Option<usize> {
        self.pending_distance
    }

    /// Record a picked atom. Returns the completed pair on the second pick;
    /// picking the same atom twice cancels.
    pub fn pick_distance_atom(
        &mut self,
        i_atom: usize,
    ) -> Option<(usize, usize)> {
        match self.pending_distance.take() {
            Some(first) if first != i_atom => Some((first, i_atom)),
            Some(_) => None,
            None => {
                self.pending_distance = Some(i_atom);
                None
            }
        }
    }

    /// Abandon a measurement in progress.
    pub fn cancel_distance(&mut self) {
        self.pending_distance = None;
    }
}

/// Default key shortcuts, named by `KeyboardEvent.key` values.
#[must_use]
pub fn key_command(key: &str) -> Option<SceneCommand> {
    let command = match key {
        "ArrowRight" | "j" => SceneCommand::NextView,
        "ArrowLeft" | "k" => SceneCommand::PreviousView,
        "Escape" => SceneCommand::ClearSelection,
        "z" => SceneCommand::ZoomToSelection,
        "a" => SceneCommand::ZoomToAll,
        "s" => SceneCommand::ShowSelectedSidechains,
        "x" => SceneCommand::ClearSidechains,
        "w" => SceneCommand::ToggleShow(ShowOption::Water),
        "l" => SceneCommand::ToggleShow(ShowOption::Ligands),
        "h" => SceneCommand::ToggleShow(ShowOption::Hydrogen),
        "b" => SceneCommand::ToggleShow(ShowOption::Backbone),
        "r" => SceneCommand::ToggleShow(ShowOption::Ribbon),
        "p" => SceneCommand::ToggleShow(ShowOption::Sphere),
        "v" => SceneCommand::SaveView,
        "o" => SceneCommand::SetAnimateState(AnimateState::Rotate),
        "c" => SceneCommand::SetAnimateState(AnimateState::Rock),
        "n" => SceneCommand::SetAnimateState(AnimateState::None),
        _ => return None,
    };
    Some(command)
}

/// Shared flag serializing structure loads. Cloned handles observe the
/// same flag, so controllers built with
/// [`SceneController::with_load_gate`](super::SceneController::with_load_gate)
/// over one gate never load concurrently into a shared host.
#[derive(Debug, Clone, Default)]
pub struct LoadGate {
    busy: Rc<Cell<bool>>,
}

impl LoadGate {
    /// Whether a load holds the gate.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// Take the gate, or `None` if another load holds it. The gate is
    /// released when the guard drops.
    #[must_use]
    pub fn try_acquire(&self) -> Option<LoadGuard> {
        if self.busy.replace(true) {
            return None;
        }
        Some(LoadGuard {
            busy: Rc::clone(&self.busy),
        })
    }
}

/// Holds a [`LoadGate`] until dropped.
#[derive(Debug)]
pub struct LoadGuard {
    busy: Rc<Cell<bool>>,
}

impl Drop for LoadGuard {
    fn drop(&mut self) {
        self.busy.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_needs_two_distinct_picks() {
        let mut state = InteractionState::default();
        assert_eq!(state.pick_distance_atom(4), None);
        assert_eq!(state.pending_distance(), Some(4));
        assert_eq!(state.pick_distance_atom(4), None);
        assert_eq!(state.pending_distance(), None);
        assert_eq!(state.pick_distance_atom(4), None);
        assert_eq!(state.pick_distance_atom(9), Some((4, 9)));
    }

    #[test]
    fn gate_is_released_on_drop() {
        let gate = LoadGate::default();
        let observer = gate.clone();
        let guard = gate.try_acquire();
        assert!(guard.is_some());
        assert!(observer.is_busy());
        assert!(observer.try_acquire().is_none());
        drop(guard);
        assert!(!gate.is_busy());
    }

    #[test]
    fn unknown_keys_map_to_nothing() {
        assert_eq!(key_command("j"), Some(SceneCommand::NextView));
        assert_eq!(key_command("F13"), None);
    }
}
