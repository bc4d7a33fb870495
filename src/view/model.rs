use rand::distr::Alphanumeric;
use rand::Rng;
use rustc_hash::FxHashMap;

use super::{ShowOptions, View, ViewDict};
use crate::animation::{AnimateState, AnimationEvent, ViewAnimator};
use crate::camera::CameraParams;
use crate::error::MolviewError;
use crate::options::Options;
use crate::soup::{Removal, Soup};

/// Id of the view installed by [`ViewModel::build`]. It can be replaced by
/// an imported view of the same id but never deleted.
pub const DEFAULT_VIEW_ID: &str = "view:000000";

/// Change markers polled by renderers once per frame.
///
/// Mutations only set flags; whoever draws calls [`DirtyFlags::take`] and
/// redraws once for however many mutations happened in the tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct DirtyFlags {
    /// Anything visible changed; redraw.
    pub is_changed: bool,
    /// View list or current view content changed; refresh observers.
    pub is_update_observers: bool,
    /// Sidechain visibility changed.
    pub is_update_sidechain: bool,
    /// Residue or trace selection changed.
    pub is_update_selection: bool,
}

impl DirtyFlags {
    /// Every flag set.
    #[must_use]
    pub fn all() -> Self {
        Self {
            is_changed: true,
            is_update_observers: true,
            is_update_sidechain: true,
            is_update_selection: true,
        }
    }

    /// Whether any flag is set.
    #[must_use]
    pub fn any(&self) -> bool {
        self.is_changed
            || self.is_update_observers
            || self.is_update_sidechain
            || self.is_update_selection
    }

    /// Return the flags and clear them.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

/// Owner of the current view, the saved views and the camera animator.
#[derive(Debug, Clone)]
pub struct ViewModel {
    current: View,
    saved: FxHashMap<String, View>,
    order: Vec<String>,
    i_last_view: usize,
    animator: ViewAnimator,
    pending: Option<View>,
    default_show: ShowOptions,
    flags: DirtyFlags,
}

impl Default for ViewModel {
    fn default() -> Self {
        Self::new(&Options::default())
    }
}

impl ViewModel {
    /// Model holding only the default view.
    #[must_use]
    pub fn new(options: &Options) -> Self {
        let mut model = Self {
            current: View::default(),
            saved: FxHashMap::default(),
            order: Vec::new(),
            i_last_view: 0,
            animator: ViewAnimator::new(options.camera.clone()),
            pending: None,
            default_show: options.display.default_show,
            flags: DirtyFlags::default(),
        };
        model.install_default(CameraParams::default(), String::new());
        model
    }

    /// The live view.
    #[must_use]
    pub fn current_view(&self) -> &View {
        &self.current
    }

    /// Mutable access to the live view. Marks the model changed.
    pub fn current_view_mut(&mut self) -> &mut View {
        self.flags.is_changed = true;
        self.flags.is_update_observers = true;
        &mut self.current
    }

    /// Live camera.
    #[must_use]
    pub fn camera(&self) -> &CameraParams {
        &self.current.camera
    }

    /// Jump the camera without animating, cancelling any transition.
    pub fn set_camera(&mut self, camera: CameraParams) {
        self.animator.cancel();
        self.pending = None;
        self.current.camera = camera;
        self.flags.is_changed = true;
    }

    /// Camera animator.
    #[must_use]
    pub fn animator(&self) -> &ViewAnimator {
        &self.animator
    }

    /// Autonomous motion mode.
    #[must_use]
    pub fn animate_state(&self) -> AnimateState {
        self.animator.state()
    }

    /// Switch autonomous motion mode.
    pub fn set_animate_state(&mut self, state: AnimateState) {
        self.animator.set_state(state);
    }

    /// Pending change markers.
    #[must_use]
    pub fn flags(&self) -> &DirtyFlags {
        &self.flags
    }

    /// Mutable change markers.
    pub fn flags_mut(&mut self) -> &mut DirtyFlags {
        &mut self.flags
    }

    /// Return and clear the change markers.
    pub fn take_flags(&mut self) -> DirtyFlags {
        self.flags.take()
    }

    /// Number of saved views, the default included.
    #[must_use]
    pub fn view_count(&self) -> usize {
        self.order.len()
    }

    /// Saved view ids in order.
    #[must_use]
    pub fn view_ids(&self) -> &[String] {
        &self.order
    }

    /// Saved view by id.
    #[must_use]
    pub fn saved_view(&self, id: &str) -> Option<&View> {
        self.saved.get(id)
    }

    /// Saved views in order.
    pub fn saved_views(&self) -> impl Iterator<Item = &View> {
        self.order.iter().filter_map(|id| self.saved.get(id))
    }

    /// Position of the most recently targeted or saved view.
    #[must_use]
    pub fn i_last_view(&self) -> usize {
        self.i_last_view
    }

    /// Rebuild for the current contents of `soup`: every saved view is
    /// discarded and a default view fitted to all atoms is installed.
    pub fn build(&mut self, soup: &Soup) {
        let options = self.animator.options();
        let camera = CameraParams::default().fit_to_points(
            soup.store().positions(),
            options.zoom_padding,
            options.min_zoom,
        );
        let structure_id = soup
            .structures()
            .first()
            .map(|s| s.id.clone())
            .unwrap_or_default();
        self.install_default(camera, structure_id);
        log::debug!(
            "built default view (zoom {:.1}, focus {:?})",
            camera.zoom,
            camera.focus
        );
    }

    fn install_default(&mut self, camera: CameraParams, structure_id: String) {
        let view = View {
            structure_id,
            show: self.default_show,
            camera,
            ..View::default()
        };
        self.animator.cancel();
        self.pending = None;
        self.saved.clear();
        self.order.clear();
        self.order.push(view.id.clone());
        let _ = self.saved.insert(view.id.clone(), view.clone());
        self.current = view;
        self.i_last_view = 0;
        self.flags = DirtyFlags::all();
    }

    /// Save a copy of the current view under a fresh random id, placed
    /// right after the last targeted view. Returns the new id.
    pub fn save_current_view(&mut self) -> String {
        let id = self.fresh_id();
        let position = (self.i_last_view + 1).min(self.order.len());
        self.current.id.clone_from(&id);
        let view = self.current.clone();
        let _ = self.saved.insert(id.clone(), view);
        self.order.insert(position, id.clone());
        self.i_last_view = position;
        self.renumber();
        self.current.order = position;
        self.flags.is_update_observers = true;
        log::debug!("saved view {id} at position {position}");
        id
    }

    fn fresh_id(&self) -> String {
        let mut rng = rand::rng();
        loop {
            let suffix: String = (&mut rng)
                .sample_iter(Alphanumeric)
                .take(6)
                .map(char::from)
                .collect();
            let id = format!("view:{suffix}");
            if !self.saved.contains_key(&id) {
                return id;
            }
        }
    }

    fn renumber(&mut self) {
        for (position, id) in self.order.iter().enumerate() {
            if let Some(view) = self.saved.get_mut(id) {
                view.order = position;
            }
        }
    }

    /// Add or replace a saved view, keeping the sequence sorted by each
    /// view's `order` field.
    pub fn insert_view(&mut self, view: View) {
        if !self.saved.contains_key(&view.id) {
            self.order.push(view.id.clone());
        }
        let _ = self.saved.insert(view.id.clone(), view);
        let saved = &self.saved;
        self.order.sort_by_key(|id| {
            (
                saved.get(id).map_or(usize::MAX, |v| v.order),
                id != DEFAULT_VIEW_ID,
            )
        });
        self.renumber();
        self.flags.is_update_observers = true;
    }

    /// Import persisted views, then target `default_view_id` if given.
    ///
    /// # Errors
    ///
    /// Returns [`MolviewError::UnknownView`] if `default_view_id` names no
    /// imported or existing view. The views are imported regardless.
    pub fn import_views(
        &mut self,
        dicts: &[ViewDict],
        default_view_id: Option<&str>,
    ) -> Result<(), MolviewError> {
        for dict in dicts {
            self.insert_view(View::from(dict));
        }
        log::debug!("imported {} views", dicts.len());
        match default_view_id {
            Some(id) => self.set_target_view_by_view_id(id),
            None => Ok(()),
        }
    }

    /// Persisted form of every saved view, in order.
    #[must_use]
    pub fn view_dicts(&self) -> Vec<ViewDict> {
        self.saved_views().map(ViewDict::from).collect()
    }

    /// Remove a saved view.
    ///
    /// # Errors
    ///
    /// The default view cannot be deleted, and unknown ids are reported.
    pub fn delete_view(&mut self, id: &str) -> Result<(), MolviewError> {
        if id == DEFAULT_VIEW_ID {
            return Err(MolviewError::DefaultViewUndeletable);
        }
        let Some(position) = self.order.iter().position(|v| v == id) else {
            return Err(MolviewError::UnknownView(id.to_owned()));
        };
        let _ = self.order.remove(position);
        let _ = self.saved.remove(id);
        if self.i_last_view >= position {
            self.i_last_view = self.i_last_view.saturating_sub(1);
        }
        self.renumber();
        self.flags.is_update_observers = true;
        log::debug!("deleted view {id}");
        Ok(())
    }

    /// Id of the view after the last targeted one, wrapping around.
    #[must_use]
    pub fn next_view_id(&self) -> &str {
        let n = self.order.len().max(1);
        self.order
            .get((self.i_last_view + 1) % n)
            .map_or(DEFAULT_VIEW_ID, String::as_str)
    }

    /// Id of the view before the last targeted one, wrapping around.
    #[must_use]
    pub fn previous_view_id(&self) -> &str {
        let n = self.order.len().max(1);
        self.order
            .get((self.i_last_view + n - 1) % n)
            .map_or(DEFAULT_VIEW_ID, String::as_str)
    }

    /// Fly to `view`; its non-camera content is applied on arrival.
    pub fn set_target_view(&mut self, view: View) {
        self.animator.set_target(view.camera);
        self.pending = Some(view);
        self.flags.is_changed = true;
    }

    /// Fly to the saved view `id`.
    ///
    /// # Errors
    ///
    /// Returns [`MolviewError::UnknownView`] for an unsaved id.
    pub fn set_target_view_by_view_id(
        &mut self,
        id: &str,
    ) -> Result<(), MolviewError> {
        let position = self
            .order
            .iter()
            .position(|v| v == id)
            .ok_or_else(|| MolviewError::UnknownView(id.to_owned()))?;
        let view = self
            .saved
            .get(id)
            .cloned()
            .ok_or_else(|| MolviewError::UnknownView(id.to_owned()))?;
        self.i_last_view = position;
        self.set_target_view(view);
        Ok(())
    }

    /// Fly to the next saved view.
    pub fn set_target_to_next_view(&mut self) {
        let id = self.next_view_id().to_owned();
        if let Err(e) = self.set_target_view_by_view_id(&id) {
            log::warn!("next view: {e}");
        }
    }

    /// Fly to the previous saved view.
    pub fn set_target_to_previous_view(&mut self) {
        let id = self.previous_view_id().to_owned();
        if let Err(e) = self.set_target_view_by_view_id(&id) {
            log::warn!("previous view: {e}");
        }
    }

    /// Fly to center atom `i_atom`, keeping the current direction, zoom and
    /// view content.
    ///
    /// # Errors
    ///
    /// Returns [`MolviewError::IndexOutOfRange`] for an unknown atom.
    pub fn set_target_view_by_atom(
        &mut self,
        soup: &Soup,
        i_atom: usize,
    ) -> Result<(), MolviewError> {
        let Some(&focus) = soup.store().positions().get(i_atom) else {
            return Err(MolviewError::IndexOutOfRange {
                kind: "atom",
                index: i_atom,
            });
        };
        let mut view = self.current.clone();
        let camera = self.current.camera;
        view.camera = CameraParams {
            focus,
            position: focus - camera.direction() * camera.zoom,
            ..camera
        };
        view.i_atom = Some(i_atom);
        self.set_target_view(view);
        Ok(())
    }

    /// Advance the animator `steps` ticks. On arrival the target view's
    /// content (selection, labels, distances, show flags) becomes current
    /// and the residue selection in `soup` is replaced. Returns whether the
    /// camera moved.
    pub fn animate(&mut self, steps: u32, soup: &mut Soup) -> bool {
        let mut moved = false;
        for _ in 0..steps {
            match self.animator.step(&mut self.current.camera) {
                AnimationEvent::Idle => {}
                AnimationEvent::Moved => moved = true,
                AnimationEvent::Arrived => {
                    moved = true;
                    self.apply_pending(soup);
                }
                AnimationEvent::AdvanceLoop => self.set_target_to_next_view(),
            }
        }
        if moved {
            self.flags.is_changed = true;
        }
        moved
    }

    fn apply_pending(&mut self, soup: &mut Soup) {
        let Some(view) = self.pending.take() else {
            return;
        };
        let camera = self.current.camera;
        self.current = View { camera, ..view };
        soup.set_selected_residues(&self.current.selected_residues);
        soup.set_selected_traces(self.current.selected_traces.clone());
        self.flags = DirtyFlags::all();
        log::debug!("arrived at view {}", self.current.id);
    }

    /// Patch every view after a structure removal.
    pub fn reindex(&mut self, removal: &Removal) {
        self.current.reindex(removal);
        if let Some(view) = &mut self.pending {
            view.reindex(removal);
        }
        for view in self.saved.values_mut() {
            view.reindex(removal);
        }
        self.flags = DirtyFlags::all();
    }
}
