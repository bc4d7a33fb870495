//! Views: named bundles of camera, selection and annotation state, their
//! persisted dictionary form, and the [`ViewModel`] that owns them.

mod dict;
mod model;
mod show;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::camera::CameraParams;
use crate::soup::{reindex, reindex_all, Removal};

pub use dict::{CameraDict, DistanceDict, LabelDict, SlabDict, ViewDict};
pub use model::{DirtyFlags, ViewModel, DEFAULT_VIEW_ID};
pub use show::{ShowDict, ShowOption, ShowOptions};

/// Text attached to an atom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// Annotated atom.
    pub i_atom: usize,
    /// Label text.
    pub text: String,
}

/// A measured distance between two atoms. The pair is unordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Distance {
    /// First atom.
    pub i_atom1: usize,
    /// Second atom.
    pub i_atom2: usize,
}

impl Distance {
    /// Distance between `a` and `b`, stored in ascending order.
    #[must_use]
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            i_atom1: a.min(b),
            i_atom2: a.max(b),
        }
    }
}

/// Display parameters for grid-point pseudo-atoms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridParams {
    /// Only grid points with a B-factor above this value are shown.
    pub b_cutoff: f32,
    /// Per-element visibility.
    pub is_elem: BTreeMap<String, bool>,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            b_cutoff: 0.5,
            is_elem: BTreeMap::new(),
        }
    }
}

/// A view: camera plus everything shown and selected from it.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    /// Unique id, `view:` followed by six characters.
    pub id: String,
    /// Position in the saved-view sequence.
    pub order: usize,
    /// Author of the view.
    pub user_id: String,
    /// Structure the view was made against.
    pub structure_id: String,
    /// Free-text caption.
    pub text: String,
    /// Representation flags.
    pub show: ShowOptions,
    /// Atom the view is centered on, if any.
    pub i_atom: Option<usize>,
    /// Atom labels.
    pub labels: Vec<Label>,
    /// Selected residue indices.
    pub selected_residues: Vec<usize>,
    /// Selected trace indices.
    pub selected_traces: Vec<usize>,
    /// Measured atom pairs.
    pub distances: Vec<Distance>,
    /// Viewpoint.
    pub camera: CameraParams,
    /// Grid-point display.
    pub grid: GridParams,
}

impl Default for View {
    fn default() -> Self {
        Self {
            id: DEFAULT_VIEW_ID.to_owned(),
            order: 0,
            user_id: String::new(),
            structure_id: String::new(),
            text: String::new(),
            show: ShowOptions::default(),
            i_atom: None,
            labels: Vec::new(),
            selected_residues: Vec::new(),
            selected_traces: Vec::new(),
            distances: Vec::new(),
            camera: CameraParams::default(),
            grid: GridParams::default(),
        }
    }
}

impl View {
    /// Whether this is the undeletable default view.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_VIEW_ID
    }

    /// Patch every index after a structure removal. References into the
    /// removed ranges are dropped; later ones shift down.
    pub fn reindex(&mut self, removal: &Removal) {
        reindex_all(&mut self.selected_residues, &removal.residues);
        reindex_all(&mut self.selected_traces, &removal.traces);
        self.i_atom = self.i_atom.and_then(|i| reindex(i, &removal.atoms));
        self.labels.retain_mut(|label| {
            match reindex(label.i_atom, &removal.atoms) {
                Some(i) => {
                    label.i_atom = i;
                    true
                }
                None => false,
            }
        });
        self.distances.retain_mut(|distance| {
            match (
                reindex(distance.i_atom1, &removal.atoms),
                reindex(distance.i_atom2, &removal.atoms),
            ) {
                (Some(a), Some(b)) => {
                    *distance = Distance::new(a, b);
                    true
                }
                _ => false,
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reindex_drops_and_shifts() {
        let mut view = View {
            i_atom: Some(30),
            labels: vec![
                Label {
                    i_atom: 2,
                    text: "keep".into(),
                },
                Label {
                    i_atom: 15,
                    text: "gone".into(),
                },
                Label {
                    i_atom: 25,
                    text: "shift".into(),
                },
            ],
            selected_residues: vec![0, 4, 8],
            selected_traces: vec![0, 1, 2],
            distances: vec![Distance::new(25, 1), Distance::new(12, 22)],
            ..View::default()
        };
        view.reindex(&Removal {
            atoms: 10..20,
            residues: 3..6,
            traces: 1..2,
        });

        assert_eq!(view.i_atom, Some(20));
        let texts: Vec<_> =
            view.labels.iter().map(|l| (l.i_atom, l.text.as_str())).collect();
        assert_eq!(texts, [(2, "keep"), (15, "shift")]);
        assert_eq!(view.selected_residues, [0, 5]);
        assert_eq!(view.selected_traces, [0, 1]);
        assert_eq!(view.distances, [Distance::new(1, 15)]);
    }

    #[test]
    fn centered_atom_inside_removal_is_cleared() {
        let mut view = View {
            i_atom: Some(5),
            ..View::default()
        };
        view.reindex(&Removal {
            atoms: 0..10,
            residues: 0..2,
            traces: 0..0,
        });
        assert_eq!(view.i_atom, None);
    }
}
