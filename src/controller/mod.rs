//! [`SceneController`]: the only surface through which the scene changes.
//!
//! The controller owns the [`Soup`] and the [`ViewModel`]. Selection,
//! annotations, representation toggles, camera targets and structure
//! deletion all go through it so that residue flags in the store and the
//! current view never disagree. Methods only mark [`DirtyFlags`]; hosts
//! redraw once per frame via the [`Tickable`] implementation.
//!
//! [`DirtyFlags`]: crate::view::DirtyFlags

mod command;
mod interaction;
mod load;

use glam::Vec3;

pub use command::SceneCommand;
pub use interaction::{key_command, InteractionState, LoadGate, LoadGuard};
pub use load::{LoadPhase, LoadProgress};

use crate::animation::AnimateState;
use crate::error::MolviewError;
use crate::options::Options;
use crate::parser::StructureParser;
use crate::scheduler::Tickable;
use crate::soup::{Removal, Soup};
use crate::view::{Distance, Label, ShowOption, ViewModel};

/// The scene and every operation on it.
#[derive(Debug)]
pub struct SceneController {
    soup: Soup,
    view_model: ViewModel,
    options: Options,
    parser: StructureParser,
    interaction: InteractionState,
    gate: LoadGate,
}

impl Default for SceneController {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl SceneController {
    /// Empty scene configured by `options`.
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self {
            soup: Soup::new(&options),
            view_model: ViewModel::new(&options),
            options,
            parser: StructureParser::new(),
            interaction: InteractionState::default(),
            gate: LoadGate::default(),
        }
    }

    /// The molecular scene.
    #[must_use]
    pub fn soup(&self) -> &Soup {
        &self.soup
    }

    /// Views and dirty flags.
    #[must_use]
    pub fn view_model(&self) -> &ViewModel {
        &self.view_model
    }

    /// Options the scene was built with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Modal interaction state.
    #[must_use]
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Mutable modal interaction state (keyboard lock).
    pub fn interaction_mut(&mut self) -> &mut InteractionState {
        &mut self.interaction
    }

    /// Handle to the load gate, shareable with other hosts.
    #[must_use]
    pub fn load_gate(&self) -> LoadGate {
        self.gate.clone()
    }

    /// Serialize this controller's loads with every other holder of `gate`.
    #[must_use]
    pub fn with_load_gate(mut self, gate: LoadGate) -> Self {
        self.gate = gate;
        self
    }

    /// Run a command.
    ///
    /// # Errors
    ///
    /// See [`SceneCommand::execute`].
    pub fn execute(
        &mut self,
        command: SceneCommand,
    ) -> Result<(), MolviewError> {
        command.execute(self)
    }

    /// Run the command bound to `key`, unless the keyboard is locked or the
    /// key is unbound. Returns whether a command ran.
    ///
    /// # Errors
    ///
    /// See [`SceneCommand::execute`].
    pub fn handle_key(&mut self, key: &str) -> Result<bool, MolviewError> {
        if self.interaction.is_keyboard_locked() {
            return Ok(false);
        }
        match key_command(key) {
            Some(command) => {
                self.execute(command)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ── Selection ───────────────────────────────────────────────────

    fn check_residue(&self, i_res: usize) -> Result<(), MolviewError> {
        if i_res < self.soup.residue_count() {
            Ok(())
        } else {
            Err(MolviewError::IndexOutOfRange {
                kind: "residue",
                index: i_res,
            })
        }
    }

    fn check_atom(&self, i_atom: usize) -> Result<(), MolviewError> {
        if i_atom < self.soup.atom_count() {
            Ok(())
        } else {
            Err(MolviewError::IndexOutOfRange {
                kind: "atom",
                index: i_atom,
            })
        }
    }

    /// Store the selection in both the residue flags and the current view.
    fn commit_selection(&mut self, mut residues: Vec<usize>) {
        let n = self.soup.residue_count();
        residues.retain(|&i| i < n);
        residues.sort_unstable();
        residues.dedup();
        self.soup.set_selected_residues(&residues);
        self.view_model.current_view_mut().selected_residues = residues;
        self.view_model.flags_mut().is_update_selection = true;
    }

    fn selection(&self) -> Vec<usize> {
        self.view_model.current_view().selected_residues.clone()
    }

    /// Deselect every residue.
    pub fn clear_selection(&mut self) {
        self.commit_selection(Vec::new());
        self.interaction.cancel_distance();
    }

    /// Select `i_res`, alone or added to the current selection.
    ///
    /// # Errors
    ///
    /// Returns [`MolviewError::IndexOutOfRange`] for an unknown residue.
    pub fn select_residue(
        &mut self,
        i_res: usize,
        additive: bool,
    ) -> Result<(), MolviewError> {
        self.check_residue(i_res)?;
        let mut residues = if additive {
            self.selection()
        } else {
            Vec::new()
        };
        residues.push(i_res);
        self.commit_selection(residues);
        Ok(())
    }

    /// Flip the selection of `i_res`.
    ///
    /// # Errors
    ///
    /// Returns [`MolviewError::IndexOutOfRange`] for an unknown residue.
    pub fn toggle_residue(
        &mut self,
        i_res: usize,
    ) -> Result<(), MolviewError> {
        self.check_residue(i_res)?;
        let mut residues = self.selection();
        match residues.iter().position(|&i| i == i_res) {
            Some(at) => {
                let _ = residues.remove(at);
            }
            None => residues.push(i_res),
        }
        self.commit_selection(residues);
        Ok(())
    }

    /// Add residues `from..=to` (either order) to the selection. Indices
    /// past the end are ignored.
    pub fn select_range(&mut self, from: usize, to: usize) {
        let n = self.soup.residue_count();
        let mut residues = self.selection();
        residues.extend((from.min(to)..=from.max(to)).take_while(|&i| i < n));
        self.commit_selection(residues);
    }

    /// Add every residue within `radius` Å of `i_res` to the selection.
    ///
    /// # Errors
    ///
    /// Returns [`MolviewError::IndexOutOfRange`] for an unknown residue.
    pub fn select_neighbours(
        &mut self,
        i_res: usize,
        radius: f32,
    ) -> Result<(), MolviewError> {
        self.check_residue(i_res)?;
        let mut residues = self.selection();
        residues.extend(self.soup.neighbours(i_res, radius));
        self.commit_selection(residues);
        Ok(())
    }

    /// Restrict display to `traces` (empty shows all).
    pub fn select_traces(&mut self, traces: Vec<usize>) {
        self.soup.set_selected_traces(traces);
        let traces = self.soup.selected_traces().to_vec();
        self.view_model.current_view_mut().selected_traces = traces;
        self.view_model.flags_mut().is_update_selection = true;
    }

    // ── Sidechains and representations ──────────────────────────────

    /// Show sidechains of the selected residues.
    pub fn show_selected_sidechains(&mut self) {
        let residues = self.selection();
        self.soup.set_sidechains(&residues, true);
        self.view_model.flags_mut().is_update_sidechain = true;
        self.view_model.flags_mut().is_changed = true;
    }

    /// Hide every sidechain.
    pub fn clear_sidechains(&mut self) {
        self.soup.clear_sidechains();
        self.view_model.flags_mut().is_update_sidechain = true;
        self.view_model.flags_mut().is_changed = true;
    }

    /// Flip a representation flag of the current view. Returns its new
    /// value.
    pub fn toggle_show(&mut self, option: ShowOption) -> bool {
        let value = !self.view_model.current_view().show.get(option);
        self.set_show(option, value);
        value
    }

    /// Set a representation flag of the current view.
    pub fn set_show(&mut self, option: ShowOption, value: bool) {
        self.view_model.current_view_mut().show.set(option, value);
        if option == ShowOption::Sidechain {
            self.view_model.flags_mut().is_update_sidechain = true;
        }
    }

    // ── Annotations ─────────────────────────────────────────────────

    /// Attach `text` to atom `i_atom` in the current view.
    ///
    /// # Errors
    ///
    /// Returns [`MolviewError::IndexOutOfRange`] for an unknown atom.
    pub fn add_label(
        &mut self,
        i_atom: usize,
        text: impl Into<String>,
    ) -> Result<(), MolviewError> {
        self.check_atom(i_atom)?;
        self.view_model.current_view_mut().labels.push(Label {
            i_atom,
            text: text.into(),
        });
        Ok(())
    }

    /// Replace the text of label `index`.
    ///
    /// # Errors
    ///
    /// Returns [`MolviewError::IndexOutOfRange`] for an unknown label.
    pub fn set_label_text(
        &mut self,
        index: usize,
        text: impl Into<String>,
    ) -> Result<(), MolviewError> {
        let label = self
            .view_model
            .current_view_mut()
            .labels
            .get_mut(index)
            .ok_or(MolviewError::IndexOutOfRange {
                kind: "label",
                index,
            })?;
        label.text = text.into();
        Ok(())
    }

    /// Remove label `index`, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`MolviewError::IndexOutOfRange`] for an unknown label.
    pub fn delete_label(
        &mut self,
        index: usize,
    ) -> Result<Label, MolviewError> {
        let labels = &mut self.view_model.current_view_mut().labels;
        if index >= labels.len() {
            return Err(MolviewError::IndexOutOfRange {
                kind: "label",
                index,
            });
        }
        Ok(labels.remove(index))
    }

    /// Measure between two atoms in the current view. Duplicate pairs are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`MolviewError::IndexOutOfRange`] for an unknown atom.
    pub fn add_distance(
        &mut self,
        i_atom1: usize,
        i_atom2: usize,
    ) -> Result<(), MolviewError> {
        self.check_atom(i_atom1)?;
        self.check_atom(i_atom2)?;
        let distance = Distance::new(i_atom1, i_atom2);
        let distances = &mut self.view_model.current_view_mut().distances;
        if !distances.contains(&distance) {
            distances.push(distance);
        }
        Ok(())
    }

    /// Remove distance `index`, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`MolviewError::IndexOutOfRange`] for an unknown distance.
    pub fn delete_distance(
        &mut self,
        index: usize,
    ) -> Result<Distance, MolviewError> {
        let distances = &mut self.view_model.current_view_mut().distances;
        if index >= distances.len() {
            return Err(MolviewError::IndexOutOfRange {
                kind: "distance",
                index,
            });
        }
        Ok(distances.remove(index))
    }

    /// Pick one end of a distance; the second distinct pick adds it.
    ///
    /// # Errors
    ///
    /// Returns [`MolviewError::IndexOutOfRange`] for an unknown atom.
    pub fn pick_distance_atom(
        &mut self,
        i_atom: usize,
    ) -> Result<(), MolviewError> {
        self.check_atom(i_atom)?;
        match self.interaction.pick_distance_atom(i_atom) {
            Some((a, b)) => self.add_distance(a, b),
            None => Ok(()),
        }
    }

    // ── Camera ──────────────────────────────────────────────────────

    /// Fly to a camera fitted to `points` along the current direction.
    fn zoom_to_points(&mut self, points: &[Vec3]) {
        if points.is_empty() {
            return;
        }
        let camera = self.view_model.camera().fit_to_points(
            points,
            self.options.camera.zoom_padding,
            self.options.camera.min_zoom,
        );
        let mut view = self.view_model.current_view().clone();
        view.camera = camera;
        self.view_model.set_target_view(view);
    }

    /// Fit the camera to the selection, or to everything if nothing is
    /// selected.
    pub fn zoom_to_selection(&mut self) {
        let selection = self.selection();
        if selection.is_empty() {
            self.zoom_to_all();
            return;
        }
        let points = self.soup.residue_atom_positions(&selection);
        self.zoom_to_points(&points);
    }

    /// Fit the camera to the chain containing `i_res`.
    ///
    /// # Errors
    ///
    /// Returns [`MolviewError::IndexOutOfRange`] for an unknown residue.
    pub fn zoom_to_chain(&mut self, i_res: usize) -> Result<(), MolviewError> {
        self.check_residue(i_res)?;
        let chain = self.soup.chain_residues(i_res);
        let points = self.soup.residue_atom_positions(&chain);
        self.zoom_to_points(&points);
        Ok(())
    }

    /// Fit the camera to every atom.
    pub fn zoom_to_all(&mut self) {
        let points = self.soup.store().positions().to_vec();
        self.zoom_to_points(&points);
    }

    /// Center the camera on atom `i_atom`.
    ///
    /// # Errors
    ///
    /// Returns [`MolviewError::IndexOutOfRange`] for an unknown atom.
    pub fn go_to_atom(&mut self, i_atom: usize) -> Result<(), MolviewError> {
        self.view_model.set_target_view_by_atom(&self.soup, i_atom)
    }

    /// Set the autonomous camera motion.
    pub fn set_animate_state(&mut self, state: AnimateState) {
        self.view_model.set_animate_state(state);
    }

    // ── Views ───────────────────────────────────────────────────────

    /// Save the current view, returning its new id.
    pub fn save_current_view(&mut self) -> String {
        self.view_model.save_current_view()
    }

    /// Delete a saved view.
    ///
    /// # Errors
    ///
    /// See [`ViewModel::delete_view`].
    pub fn delete_view(&mut self, id: &str) -> Result<(), MolviewError> {
        self.view_model.delete_view(id)
    }

    /// Fly to saved view `id`.
    ///
    /// # Errors
    ///
    /// Returns [`MolviewError::UnknownView`] for an unsaved id.
    pub fn go_to_view(&mut self, id: &str) -> Result<(), MolviewError> {
        self.view_model.set_target_view_by_view_id(id)
    }

    /// Fly to the next saved view.
    pub fn next_view(&mut self) {
        self.view_model.set_target_to_next_view();
    }

    /// Fly to the previous saved view.
    pub fn previous_view(&mut self) {
        self.view_model.set_target_to_previous_view();
    }

    /// Set the current view's caption.
    pub fn set_view_text(&mut self, text: impl Into<String>) {
        self.view_model.current_view_mut().text = text.into();
    }

    // ── Structures ──────────────────────────────────────────────────

    /// Remove structure `index` and patch every view's indices. Removing
    /// the last structure discards all views and installs a fresh default.
    ///
    /// # Errors
    ///
    /// Returns [`MolviewError::IndexOutOfRange`] for an unknown structure.
    pub fn delete_structure(
        &mut self,
        index: usize,
    ) -> Result<Removal, MolviewError> {
        let removal = self.soup.delete_structure(index)?;
        self.interaction.cancel_distance();
        if self.soup.is_empty() {
            self.view_model.build(&self.soup);
        } else {
            self.view_model.reindex(&removal);
        }
        Ok(removal)
    }

    /// Advance camera animation `steps` ticks.
    pub fn animate(&mut self, steps: u32) -> bool {
        self.view_model.animate(steps, &mut self.soup)
    }
}

impl Tickable for SceneController {
    fn animate(&mut self, steps: u32) {
        let _ = Self::animate(self, steps);
    }

    fn needs_draw(&self) -> bool {
        self.view_model.flags().any()
    }

    fn draw_frame(&mut self) {
        let flags = self.view_model.take_flags();
        log::trace!("frame: {flags:?}");
    }
}
