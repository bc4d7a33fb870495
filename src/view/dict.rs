use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{Distance, GridParams, Label, ShowDict, View};
use crate::camera::CameraParams;
use crate::error::MolviewError;

const VIEW_DICT_VERSION: u32 = 2;

fn default_version() -> u32 {
    VIEW_DICT_VERSION
}

/// Clip planes and zoom of a persisted camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlabDict {
    /// Near clip offset.
    pub z_front: f32,
    /// Far clip offset.
    pub z_back: f32,
    /// Focus-to-eye distance.
    pub zoom: f32,
}

/// Persisted camera. All three vectors are world-space points: `pos` is the
/// focus, `up` is one unit along the up vector from it and `in` is one unit
/// along the view direction from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraDict {
    /// Clip planes and zoom.
    pub slab: SlabDict,
    /// Focus point.
    pub pos: [f32; 3],
    /// Focus plus up vector.
    pub up: [f32; 3],
    /// Focus plus view direction.
    #[serde(rename = "in")]
    pub in_: [f32; 3],
}

/// Persisted label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDict {
    /// Annotated atom.
    pub atom_index: usize,
    /// Label text.
    pub text: String,
}

/// Persisted distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceDict {
    /// First atom.
    pub atom_index1: usize,
    /// Second atom.
    pub atom_index2: usize,
}

/// The exchanged form of a [`View`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewDict {
    /// Format version.
    #[serde(default = "default_version")]
    pub version: u32,
    /// View id.
    pub view_id: String,
    /// Author.
    #[serde(default)]
    pub user_id: String,
    /// Structure the view belongs to.
    #[serde(default)]
    pub structure_id: String,
    /// Position in the saved sequence.
    #[serde(default)]
    pub order: usize,
    /// Representation flags.
    #[serde(default)]
    pub show: ShowDict,
    /// Caption.
    #[serde(default)]
    pub text: String,
    /// Centered atom, `-1` for none.
    #[serde(default = "no_atom")]
    pub atom_index: i64,
    /// Atom labels.
    #[serde(default)]
    pub labels: Vec<LabelDict>,
    /// Selected residues.
    #[serde(default)]
    pub selected_residues: Vec<usize>,
    /// Selected traces.
    #[serde(default)]
    pub selected_traces: Vec<usize>,
    /// Measured atom pairs.
    #[serde(default)]
    pub distances: Vec<DistanceDict>,
    /// Viewpoint.
    pub camera: CameraDict,
    /// Grid display.
    #[serde(default)]
    pub grid: GridParams,
}

fn no_atom() -> i64 {
    -1
}

impl From<&CameraParams> for CameraDict {
    fn from(camera: &CameraParams) -> Self {
        let target = camera.to_target();
        Self {
            slab: SlabDict {
                z_front: camera.z_front,
                z_back: camera.z_back,
                zoom: camera.zoom,
            },
            pos: target.focus.to_array(),
            up: target.eye_up.to_array(),
            in_: (target.focus + camera.direction()).to_array(),
        }
    }
}

impl From<&CameraDict> for CameraParams {
    fn from(dict: &CameraDict) -> Self {
        let focus = Vec3::from_array(dict.pos);
        let direction = (Vec3::from_array(dict.in_) - focus)
            .try_normalize()
            .unwrap_or(Vec3::NEG_Z);
        let zoom = if dict.slab.zoom > 0.0 {
            dict.slab.zoom
        } else {
            Self::default().zoom
        };
        Self::new(
            focus,
            focus - direction * zoom,
            Vec3::from_array(dict.up) - focus,
            dict.slab.z_front,
            dict.slab.z_back,
        )
    }
}

impl From<&View> for ViewDict {
    fn from(view: &View) -> Self {
        Self {
            version: VIEW_DICT_VERSION,
            view_id: view.id.clone(),
            user_id: view.user_id.clone(),
            structure_id: view.structure_id.clone(),
            order: view.order,
            show: view.show.into(),
            text: view.text.clone(),
            atom_index: view
                .i_atom
                .and_then(|i| i64::try_from(i).ok())
                .unwrap_or(-1),
            labels: view
                .labels
                .iter()
                .map(|label| LabelDict {
                    atom_index: label.i_atom,
                    text: label.text.clone(),
                })
                .collect(),
            selected_residues: view.selected_residues.clone(),
            selected_traces: view.selected_traces.clone(),
            distances: view
                .distances
                .iter()
                .map(|d| DistanceDict {
                    atom_index1: d.i_atom1,
                    atom_index2: d.i_atom2,
                })
                .collect(),
            camera: (&view.camera).into(),
            grid: view.grid.clone(),
        }
    }
}

impl From<&ViewDict> for View {
    fn from(dict: &ViewDict) -> Self {
        Self {
            id: dict.view_id.clone(),
            order: dict.order,
            user_id: dict.user_id.clone(),
            structure_id: dict.structure_id.clone(),
            text: dict.text.clone(),
            show: dict.show.into(),
            i_atom: usize::try_from(dict.atom_index).ok(),
            labels: dict
                .labels
                .iter()
                .map(|label| Label {
                    i_atom: label.atom_index,
                    text: label.text.clone(),
                })
                .collect(),
            selected_residues: dict.selected_residues.clone(),
            selected_traces: dict.selected_traces.clone(),
            distances: dict
                .distances
                .iter()
                .map(|d| Distance::new(d.atom_index1, d.atom_index2))
                .collect(),
            camera: (&dict.camera).into(),
            grid: dict.grid.clone(),
        }
    }
}

impl ViewDict {
    /// Parse a JSON array of view dictionaries.
    ///
    /// # Errors
    ///
    /// Returns [`MolviewError::ViewDict`] for malformed JSON.
    pub fn list_from_json(text: &str) -> Result<Vec<Self>, MolviewError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize a list of view dictionaries as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`MolviewError::ViewDict`] if serialization fails.
    pub fn list_to_json(dicts: &[Self]) -> Result<String, MolviewError> {
        Ok(serde_json::to_string_pretty(dicts)?)
    }
}
