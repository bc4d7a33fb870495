//! Centralized scene options with TOML preset support.
//!
//! Camera animation pacing, default representations, topology cutoffs and
//! the color palette are consolidated here. Options serialize to/from TOML
//! so hosts can ship presets next to their structure files.

mod camera;
mod colors;
mod display;
mod topology;

use std::path::Path;

pub use camera::CameraOptions;
pub use colors::ColorOptions;
pub use display::DisplayOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use topology::TopologyOptions;

use crate::error::MolviewError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[camera]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Camera transition and autonomous-motion parameters.
    pub camera: CameraOptions,
    /// Default representation toggles.
    pub display: DisplayOptions,
    /// Bond and connectivity cutoffs.
    pub topology: TopologyOptions,
    /// Color palette options.
    #[schemars(skip)]
    pub colors: ColorOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, MolviewError> {
        let content = std::fs::read_to_string(path).map_err(MolviewError::Io)?;
        toml::from_str(&content)
            .map_err(|e| MolviewError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Fails if serialization or any filesystem write fails.
    pub fn save(&self, path: &Path) -> Result<(), MolviewError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MolviewError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(MolviewError::Io)?;
        }
        std::fs::write(path, content).map_err(MolviewError::Io)
    }

    /// Preset names (TOML file stems) found in `dir`, sorted. An unreadable
    /// directory has no presets.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .filter_map(|path| {
                path.file_stem().and_then(|s| s.to_str()).map(str::to_owned)
            })
            .collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SecondaryStructure;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[camera]
transition_steps = 5
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.camera.transition_steps, 5);
        assert_eq!(opts.camera.loop_wait_steps, 30);
        assert_eq!(opts.topology.peptide_cutoff, 2.0);
        assert!(opts.display.default_show.ribbon);
    }

    #[test]
    fn carbon_color_follows_secondary_structure() {
        let colors = ColorOptions::default();
        assert_eq!(
            colors.atom_color("C", SecondaryStructure::Helix, true),
            colors.helix
        );
        assert_eq!(
            colors.atom_color("C", SecondaryStructure::Ligand, false),
            colors.element_color("C")
        );
        assert_eq!(colors.element_color("Xx"), colors.unknown_element);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("camera"));
        assert!(props.contains_key("display"));
        assert!(props.contains_key("topology"));
        assert!(!props.contains_key("colors"));

        let camera = &props["camera"]["properties"];
        assert!(camera.get("transition_steps").is_some());
        assert!(camera.get("min_zoom").is_none());
    }

    #[test]
    fn presets_are_listed_sorted() {
        let dir = std::env::temp_dir().join("molview-preset-test");
        let _ = std::fs::remove_dir_all(&dir);
        let opts = Options::default();
        opts.save(&dir.join("zeta.toml")).unwrap();
        opts.save(&dir.join("alpha.toml")).unwrap();
        assert_eq!(Options::list_presets(&dir), vec!["alpha", "zeta"]);
        let loaded = Options::load(&dir.join("alpha.toml")).unwrap();
        assert_eq!(loaded, opts);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
