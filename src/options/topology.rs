use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Topology", inline)]
#[serde(default)]
/// Distance cutoffs used when inferring bonds and chain connectivity.
pub struct TopologyOptions {
    /// Maximum carbonyl C to amide N distance for a peptide link (Å).
    #[schemars(title = "Peptide Cutoff", range(min = 1.0, max = 4.0), extend("step" = 0.05))]
    pub peptide_cutoff: f32,
    /// Maximum O3' to P distance for a phosphodiester link (Å).
    #[schemars(title = "Phosphodiester Cutoff", range(min = 1.0, max = 4.0), extend("step" = 0.05))]
    pub phosphodiester_cutoff: f32,
    /// Generic heavy-atom bond cutoff for unlisted atom pairs (Å).
    #[schemars(title = "Bond Cutoff", range(min = 1.0, max = 3.0), extend("step" = 0.05))]
    pub bond_cutoff: f32,
    /// Bond cutoff when either atom is a hydrogen (Å).
    #[schemars(skip)]
    pub hydrogen_bond_cutoff: f32,
}

impl Default for TopologyOptions {
    fn default() -> Self {
        Self {
            peptide_cutoff: 2.0,
            phosphodiester_cutoff: 2.5,
            bond_cutoff: 1.9,
            hydrogen_bond_cutoff: 1.3,
        }
    }
}
