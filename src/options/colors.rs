use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::store::SecondaryStructure;

/// Color palette used to derive per-atom display colors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColorOptions {
    /// RGB color per element symbol.
    pub element_colors: HashMap<String, [f32; 3]>,
    /// RGB color for elements missing from `element_colors`.
    pub unknown_element: [f32; 3],
    /// RGB color for helix carbons.
    pub helix: [f32; 3],
    /// RGB color for sheet carbons.
    pub sheet: [f32; 3],
    /// RGB color for coil carbons.
    pub coil: [f32; 3],
    /// RGB color for nucleic-acid carbons.
    pub duplex: [f32; 3],
}

impl Default for ColorOptions {
    fn default() -> Self {
        let mut element_colors = HashMap::new();
        let _ = element_colors.insert("C".to_owned(), [0.5, 0.5, 0.5]);
        let _ = element_colors.insert("N".to_owned(), [0.2, 0.3, 0.9]);
        let _ = element_colors.insert("O".to_owned(), [0.9, 0.15, 0.15]);
        let _ = element_colors.insert("S".to_owned(), [0.95, 0.85, 0.2]);
        let _ = element_colors.insert("P".to_owned(), [1.0, 0.5, 0.0]);
        let _ = element_colors.insert("H".to_owned(), [0.9, 0.9, 0.9]);
        let _ = element_colors.insert("FE".to_owned(), [0.85, 0.45, 0.2]);
        let _ = element_colors.insert("MG".to_owned(), [0.55, 0.9, 0.4]);
        let _ = element_colors.insert("ZN".to_owned(), [0.5, 0.5, 0.7]);
        let _ = element_colors.insert("CA".to_owned(), [0.6, 0.6, 0.6]);

        Self {
            element_colors,
            unknown_element: [0.9, 0.4, 0.9],
            helix: [0.9, 0.3, 0.5],
            sheet: [0.95, 0.85, 0.3],
            coil: [0.6, 0.85, 0.6],
            duplex: [0.45, 0.55, 0.85],
        }
    }
}

impl ColorOptions {
    /// Look up an element color. Falls back to `unknown_element`.
    #[must_use]
    pub fn element_color(&self, element: &str) -> [f32; 3] {
        self.element_colors
            .get(&element.trim().to_ascii_uppercase())
            .copied()
            .unwrap_or(self.unknown_element)
    }

    /// Display color for an atom: polymer carbons take their residue's
    /// secondary-structure color, everything else its element color.
    #[must_use]
    pub fn atom_color(
        &self,
        element: &str,
        ss: SecondaryStructure,
        is_polymer: bool,
    ) -> [f32; 3] {
        if is_polymer && element.eq_ignore_ascii_case("C") {
            match ss {
                SecondaryStructure::Helix => return self.helix,
                SecondaryStructure::Sheet => return self.sheet,
                SecondaryStructure::Coil => return self.coil,
                SecondaryStructure::Duplex => return self.duplex,
                _ => {}
            }
        }
        self.element_color(element)
    }
}
