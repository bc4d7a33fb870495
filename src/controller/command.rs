//! The controller's complete interactive vocabulary.
//!
//! Every operation a host can trigger (key press, click, panel button or
//! script) is a [`SceneCommand`] passed to
//! [`SceneController::execute`](super::SceneController::execute).

use super::SceneController;
use crate::animation::AnimateState;
use crate::error::MolviewError;
use crate::view::ShowOption;

/// A discrete operation on the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    // ── Selection ───────────────────────────────────────────────────
    /// Deselect every residue.
    ClearSelection,

    /// Select one residue.
    SelectResidue {
        /// Residue index.
        i_res: usize,
        /// Add to the existing selection instead of replacing it.
        additive: bool,
    },

    /// Flip one residue's selection.
    ToggleResidue {
        /// Residue index.
        i_res: usize,
    },

    /// Add an inclusive residue-index range to the selection.
    SelectRange {
        /// One end of the range.
        from: usize,
        /// The other end.
        to: usize,
    },

    /// Add every residue near `i_res` to the selection.
    SelectNeighbours {
        /// Center residue.
        i_res: usize,
        /// Search radius in Å.
        radius: f32,
    },

    /// Restrict display to the given traces (empty shows all).
    SelectTraces {
        /// Trace indices.
        traces: Vec<usize>,
    },

    // ── Sidechains and representations ──────────────────────────────
    /// Show sidechains of the selected residues.
    ShowSelectedSidechains,

    /// Hide every sidechain.
    ClearSidechains,

    /// Flip one representation flag of the current view.
    ToggleShow(ShowOption),

    /// Set one representation flag of the current view.
    SetShow {
        /// Flag to set.
        option: ShowOption,
        /// New value.
        value: bool,
    },

    // ── Annotations ─────────────────────────────────────────────────
    /// Attach a label to an atom.
    AddLabel {
        /// Atom index.
        i_atom: usize,
        /// Label text.
        text: String,
    },

    /// Remove a label by position.
    DeleteLabel {
        /// Position in the current view's label list.
        index: usize,
    },

    /// Measure between two atoms.
    AddDistance {
        /// First atom.
        i_atom1: usize,
        /// Second atom.
        i_atom2: usize,
    },

    /// Remove a distance by position.
    DeleteDistance {
        /// Position in the current view's distance list.
        index: usize,
    },

    /// Pick one end of a distance; the second pick adds it.
    PickDistanceAtom {
        /// Atom index.
        i_atom: usize,
    },

    // ── Camera ──────────────────────────────────────────────────────
    /// Fit the camera to the selected residues.
    ZoomToSelection,

    /// Fit the camera to the chain containing `i_res`.
    ZoomToChain {
        /// Any residue of the chain.
        i_res: usize,
    },

    /// Fit the camera to every atom.
    ZoomToAll,

    /// Center the camera on an atom.
    GoToAtom {
        /// Atom index.
        i_atom: usize,
    },

    /// Set the autonomous camera motion.
    SetAnimateState(AnimateState),

    // ── Views ───────────────────────────────────────────────────────
    /// Save the current view.
    SaveView,

    /// Delete a saved view.
    DeleteView {
        /// View id.
        id: String,
    },

    /// Fly to a saved view.
    GoToView {
        /// View id.
        id: String,
    },

    /// Fly to the next saved view.
    NextView,

    /// Fly to the previous saved view.
    PreviousView,

    // ── Structures ──────────────────────────────────────────────────
    /// Remove a loaded structure.
    DeleteStructure {
        /// Structure index.
        index: usize,
    },
}

impl SceneCommand {
    /// Apply this command to `controller`.
    ///
    /// # Errors
    ///
    /// Propagates the failure of the underlying controller operation.
    pub fn execute(
        self,
        controller: &mut SceneController,
    ) -> Result<(), MolviewError> {
        match self {
            Self::ClearSelection => controller.clear_selection(),
            Self::SelectResidue { i_res, additive } => {
                controller.select_residue(i_res, additive)?;
            }
            Self::ToggleResidue { i_res } => controller.toggle_residue(i_res)?,
            Self::SelectRange { from, to } => controller.select_range(from, to),
            Self::SelectNeighbours { i_res, radius } => {
                controller.select_neighbours(i_res, radius)?;
            }
            Self::SelectTraces { traces } => controller.select_traces(traces),
            Self::ShowSelectedSidechains => {
                controller.show_selected_sidechains();
            }
            Self::ClearSidechains => controller.clear_sidechains(),
            Self::ToggleShow(option) => {
                let _ = controller.toggle_show(option);
            }
            Self::SetShow { option, value } => {
                controller.set_show(option, value);
            }
            Self::AddLabel { i_atom, text } => {
                controller.add_label(i_atom, text)?;
            }
            Self::DeleteLabel { index } => {
                let _ = controller.delete_label(index)?;
            }
            Self::AddDistance { i_atom1, i_atom2 } => {
                controller.add_distance(i_atom1, i_atom2)?;
            }
            Self::DeleteDistance { index } => {
                let _ = controller.delete_distance(index)?;
            }
            Self::PickDistanceAtom { i_atom } => {
                controller.pick_distance_atom(i_atom)?;
            }
            Self::ZoomToSelection => controller.zoom_to_selection(),
            Self::ZoomToChain { i_res } => controller.zoom_to_chain(i_res)?,
            Self::ZoomToAll => controller.zoom_to_all(),
            Self::GoToAtom { i_atom } => controller.go_to_atom(i_atom)?,
            Self::SetAnimateState(state) => {
                controller.set_animate_state(state);
            }
            Self::SaveView => {
                let _ = controller.save_current_view();
            }
            Self::DeleteView { id } => controller.delete_view(&id)?,
            Self::GoToView { id } => controller.go_to_view(&id)?,
            Self::NextView => controller.next_view(),
            Self::PreviousView => controller.previous_view(),
            Self::DeleteStructure { index } => {
                let _ = controller.delete_structure(index)?;
            }
        }
        Ok(())
    }
}
