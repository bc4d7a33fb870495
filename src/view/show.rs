use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One representation toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowOption {
    /// Sidechains of selected residues.
    Sidechain,
    /// Peptide-plane detail.
    Peptide,
    /// Hydrogen atoms.
    Hydrogen,
    /// Solvent molecules.
    Water,
    /// Non-polymer residues.
    Ligands,
    /// Backbone trace (formerly "all atom").
    Backbone,
    /// Secondary-structure ribbon.
    Ribbon,
    /// Space-filling spheres.
    Sphere,
}

impl ShowOption {
    /// Every option, in display order.
    pub const ALL: [Self; 8] = [
        Self::Sidechain,
        Self::Peptide,
        Self::Hydrogen,
        Self::Water,
        Self::Ligands,
        Self::Backbone,
        Self::Ribbon,
        Self::Sphere,
    ];
}

/// The fixed set of representation flags carried by a view.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
#[schemars(inline)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ShowOptions {
    /// Sidechains of selected residues.
    #[schemars(title = "Sidechains")]
    pub sidechain: bool,
    /// Peptide-plane detail.
    #[schemars(title = "Peptides")]
    pub peptide: bool,
    /// Hydrogen atoms.
    #[schemars(title = "Hydrogens")]
    pub hydrogen: bool,
    /// Solvent molecules.
    #[schemars(title = "Water")]
    pub water: bool,
    /// Non-polymer residues.
    #[schemars(title = "Ligands")]
    pub ligands: bool,
    /// Backbone trace.
    #[schemars(title = "Backbone")]
    pub backbone: bool,
    /// Secondary-structure ribbon.
    #[schemars(title = "Ribbon")]
    pub ribbon: bool,
    /// Space-filling spheres.
    #[schemars(title = "Spheres")]
    pub sphere: bool,
}

impl Default for ShowOptions {
    fn default() -> Self {
        Self {
            sidechain: false,
            peptide: true,
            hydrogen: false,
            water: false,
            ligands: true,
            backbone: false,
            ribbon: true,
            sphere: false,
        }
    }
}

impl ShowOptions {
    /// Value of one flag.
    #[must_use]
    pub fn get(&self, option: ShowOption) -> bool {
        match option {
            ShowOption::Sidechain => self.sidechain,
            ShowOption::Peptide => self.peptide,
            ShowOption::Hydrogen => self.hydrogen,
            ShowOption::Water => self.water,
            ShowOption::Ligands => self.ligands,
            ShowOption::Backbone => self.backbone,
            ShowOption::Ribbon => self.ribbon,
            ShowOption::Sphere => self.sphere,
        }
    }

    /// Set one flag.
    pub fn set(&mut self, option: ShowOption, value: bool) {
        let flag = match option {
            ShowOption::Sidechain => &mut self.sidechain,
            ShowOption::Peptide => &mut self.peptide,
            ShowOption::Hydrogen => &mut self.hydrogen,
            ShowOption::Water => &mut self.water,
            ShowOption::Ligands => &mut self.ligands,
            ShowOption::Backbone => &mut self.backbone,
            ShowOption::Ribbon => &mut self.ribbon,
            ShowOption::Sphere => &mut self.sphere,
        };
        *flag = value;
    }

    /// Flip one flag, returning its new value.
    pub fn toggle(&mut self, option: ShowOption) -> bool {
        let value = !self.get(option);
        self.set(option, value);
        value
    }
}

/// Wire form of [`ShowOptions`]. Older dictionaries call the backbone flag
/// `all_atom`; both keys are read and written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ShowDict {
    /// See [`ShowOptions::sidechain`].
    pub sidechain: bool,
    /// See [`ShowOptions::peptide`].
    pub peptide: bool,
    /// See [`ShowOptions::hydrogen`].
    pub hydrogen: bool,
    /// See [`ShowOptions::water`].
    pub water: bool,
    /// See [`ShowOptions::ligands`].
    pub ligands: bool,
    /// See [`ShowOptions::backbone`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backbone: Option<bool>,
    /// Legacy name of `backbone`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_atom: Option<bool>,
    /// See [`ShowOptions::ribbon`].
    pub ribbon: bool,
    /// See [`ShowOptions::sphere`].
    pub sphere: bool,
}

impl From<ShowOptions> for ShowDict {
    fn from(show: ShowOptions) -> Self {
        Self {
            sidechain: show.sidechain,
            peptide: show.peptide,
            hydrogen: show.hydrogen,
            water: show.water,
            ligands: show.ligands,
            backbone: Some(show.backbone),
            all_atom: Some(show.backbone),
            ribbon: show.ribbon,
            sphere: show.sphere,
        }
    }
}

impl From<ShowDict> for ShowOptions {
    fn from(dict: ShowDict) -> Self {
        Self {
            sidechain: dict.sidechain,
            peptide: dict.peptide,
            hydrogen: dict.hydrogen,
            water: dict.water,
            ligands: dict.ligands,
            backbone: dict.backbone.or(dict.all_atom).unwrap_or(false),
            ribbon: dict.ribbon,
            sphere: dict.sphere,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_every_option() {
        let mut show = ShowOptions::default();
        for option in ShowOption::ALL {
            let before = show.get(option);
            assert_eq!(show.toggle(option), !before);
            assert_eq!(show.get(option), !before);
        }
    }

    #[test]
    fn legacy_all_atom_reads_as_backbone() {
        let dict: ShowDict =
            serde_json::from_str(r#"{"all_atom": true, "ribbon": true}"#)
                .unwrap();
        let show = ShowOptions::from(dict);
        assert!(show.backbone);
        assert!(show.ribbon);
        assert!(!show.ligands);
    }

    #[test]
    fn backbone_wins_over_legacy_key() {
        let dict: ShowDict =
            serde_json::from_str(r#"{"backbone": false, "all_atom": true}"#)
                .unwrap();
        assert!(!ShowOptions::from(dict).backbone);
    }

    #[test]
    fn written_dicts_carry_both_keys() {
        let show = ShowOptions {
            backbone: true,
            ..ShowOptions::default()
        };
        let value = serde_json::to_value(ShowDict::from(show)).unwrap();
        assert_eq!(value["backbone"], true);
        assert_eq!(value["all_atom"], true);
        let back: ShowDict = serde_json::from_value(value).unwrap();
        assert_eq!(ShowOptions::from(back), show);
    }
}
