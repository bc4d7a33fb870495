//! The in-memory molecular scene: every loaded structure's atoms and
//! residues in one columnar store, plus the derived bonds and traces.
//!
//! Structures occupy contiguous atom and residue ranges in load order.
//! Bonds and traces are rebuilt wholesale after every add or delete, and
//! deletions report the removed ranges so index holders elsewhere (saved
//! views) can be patched with [`reindex`].

use std::ops::Range;

use glam::Vec3;

use crate::error::MolviewError;
use crate::options::{ColorOptions, Options};
use crate::parser::ParsedStructure;
use crate::store::MolecularStore;
use crate::topology::{Bond, Topology, TopologyBuilder, Trace};

/// One loaded structure and its slice of the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Structure {
    /// Caller-supplied identifier.
    pub id: String,
    /// Title from the structure file (may be empty).
    pub title: String,
    /// Whether the file carried helix/sheet records.
    pub has_secondary_structure: bool,
    /// Atom-index range in the store.
    pub atoms: Range<usize>,
    /// Residue-index range in the store.
    pub residues: Range<usize>,
}

/// Index ranges freed by [`Soup::delete_structure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    /// Removed atom indices (pre-deletion numbering).
    pub atoms: Range<usize>,
    /// Removed residue indices (pre-deletion numbering).
    pub residues: Range<usize>,
    /// Removed trace indices (pre-deletion numbering).
    pub traces: Range<usize>,
}

/// Map an index across the removal of `removed`.
///
/// Indices inside the range vanish; indices above it shift down by its
/// length.
#[must_use]
pub fn reindex(index: usize, removed: &Range<usize>) -> Option<usize> {
    if index < removed.start {
        Some(index)
    } else if index < removed.end {
        None
    } else {
        Some(index - removed.len())
    }
}

/// Apply [`reindex`] to a list in place, dropping removed entries.
pub fn reindex_all(indices: &mut Vec<usize>, removed: &Range<usize>) {
    indices.retain_mut(|i| match reindex(*i, removed) {
        Some(shifted) => {
            *i = shifted;
            true
        }
        None => false,
    });
}

/// The aggregate molecular scene.
#[derive(Debug, Clone, Default)]
pub struct Soup {
    store: MolecularStore,
    structures: Vec<Structure>,
    topology: Topology,
    selected_traces: Vec<usize>,
    builder: TopologyBuilder,
    colors: ColorOptions,
}

impl Soup {
    /// Empty scene using the topology cutoffs and palette from `options`.
    #[must_use]
    pub fn new(options: &Options) -> Self {
        Self {
            builder: TopologyBuilder::new(options.topology.clone()),
            colors: options.colors.clone(),
            ..Self::default()
        }
    }

    /// Read access to the columnar store.
    #[must_use]
    pub fn store(&self) -> &MolecularStore {
        &self.store
    }

    /// Topology builder configured for this scene.
    #[must_use]
    pub fn topology_builder(&self) -> &TopologyBuilder {
        &self.builder
    }

    /// Number of atoms across all structures.
    #[must_use]
    pub fn atom_count(&self) -> usize {
        self.store.atom_count()
    }

    /// Number of residues across all structures.
    #[must_use]
    pub fn residue_count(&self) -> usize {
        self.store.residue_count()
    }

    /// Whether no atoms are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Loaded structures in load order.
    #[must_use]
    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }

    /// Derived bonds and traces.
    #[must_use]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Derived bonds.
    #[must_use]
    pub fn bonds(&self) -> &[Bond] {
        &self.topology.bonds
    }

    /// Derived traces.
    #[must_use]
    pub fn traces(&self) -> &[Trace] {
        &self.topology.traces
    }

    /// Traces that scope rendering and selection (empty means all).
    #[must_use]
    pub fn selected_traces(&self) -> &[usize] {
        &self.selected_traces
    }

    /// Replace the selected-trace set, dropping out-of-range indices.
    pub fn set_selected_traces(&mut self, traces: Vec<usize>) {
        let n = self.topology.traces.len();
        self.selected_traces = traces;
        self.selected_traces.retain(|&i| i < n);
        self.selected_traces.sort_unstable();
        self.selected_traces.dedup();
    }

    /// Indices of residues whose selected flag is set.
    #[must_use]
    pub fn selected_residues(&self) -> Vec<usize> {
        let mut residue = self.store.residue_proxy(0);
        (0..self.store.residue_count())
            .filter(|&i| {
                residue.load(i);
                residue.selected()
            })
            .collect()
    }

    /// Make `residues` the exact selection. Out-of-range indices are
    /// ignored.
    pub fn set_selected_residues(&mut self, residues: &[usize]) {
        let n = self.store.residue_count();
        let mut residue = self.store.residue_proxy_mut(0);
        for i in 0..n {
            residue.load(i);
            residue.set_selected(false);
        }
        for &i in residues.iter().filter(|&&i| i < n) {
            residue.load(i);
            residue.set_selected(true);
        }
    }

    /// Set the sidechain flag of `residues`.
    pub fn set_sidechains(&mut self, residues: &[usize], shown: bool) {
        let n = self.store.residue_count();
        let mut residue = self.store.residue_proxy_mut(0);
        for &i in residues.iter().filter(|&&i| i < n) {
            residue.load(i);
            residue.set_sidechain(shown);
        }
    }

    /// Clear every residue's sidechain flag.
    pub fn clear_sidechains(&mut self) {
        let all: Vec<usize> = (0..self.store.residue_count()).collect();
        self.set_sidechains(&all, false);
    }

    /// Classify and assign secondary structure on a staging structure
    /// before it is installed.
    pub fn prepare(&self, parsed: &mut ParsedStructure) {
        let residues = 0..parsed.store.residue_count();
        self.builder.classify(&mut parsed.store, residues.clone());
        self.builder.assign_secondary_structure(
            &mut parsed.store,
            residues,
            parsed.has_secondary_structure,
        );
    }

    /// Install a prepared structure, rebuilding bonds, traces and colors.
    /// Returns the new structure's index.
    pub fn add_structure(&mut self, parsed: ParsedStructure) -> usize {
        let index = self.structures.len();
        let ParsedStructure {
            id,
            title,
            store,
            has_secondary_structure,
            ..
        } = parsed;
        let (atoms, residues) = self.store.append(store, index as u32);
        log::info!(
            "installed structure {id} ({} atoms, {} residues)",
            atoms.len(),
            residues.len()
        );
        self.structures.push(Structure {
            id,
            title,
            has_secondary_structure,
            atoms,
            residues,
        });
        self.rebuild();
        index
    }

    /// Remove structure `index`, splicing its atoms and residues out of the
    /// store and rebuilding derived data. Selected traces are re-indexed
    /// here; other index holders must apply the returned [`Removal`].
    ///
    /// # Errors
    ///
    /// Returns [`MolviewError::IndexOutOfRange`] for an unknown structure.
    pub fn delete_structure(
        &mut self,
        index: usize,
    ) -> Result<Removal, MolviewError> {
        let Some(structure) = self.structures.get(index).cloned() else {
            return Err(MolviewError::IndexOutOfRange {
                kind: "structure",
                index,
            });
        };

        let first_trace = self
            .topology
            .traces
            .iter()
            .position(|t| t.structure == index)
            .unwrap_or(self.topology.traces.len());
        let n_traces = self.topology.traces[first_trace..]
            .iter()
            .take_while(|t| t.structure == index)
            .count();
        let removal = Removal {
            atoms: structure.atoms.clone(),
            residues: structure.residues.clone(),
            traces: first_trace..first_trace + n_traces,
        };

        self.store.remove_structure(
            index as u32,
            structure.atoms.clone(),
            structure.residues.clone(),
        );
        let _ = self.structures.remove(index);
        for later in &mut self.structures[index..] {
            later.atoms = shift_range(&later.atoms, removal.atoms.len());
            later.residues =
                shift_range(&later.residues, removal.residues.len());
        }

        reindex_all(&mut self.selected_traces, &removal.traces);
        self.rebuild();
        log::info!(
            "deleted structure {} ({} atoms, {} residues, {} traces)",
            structure.id,
            removal.atoms.len(),
            removal.residues.len(),
            removal.traces.len()
        );
        Ok(removal)
    }

    /// Rebuild bonds, traces and atom colors from the store.
    pub fn rebuild(&mut self) {
        self.topology = self.builder.build(&self.store);
        self.assign_colors();
        let n = self.topology.traces.len();
        self.selected_traces.retain(|&i| i < n);
    }

    fn assign_colors(&mut self) {
        let colors: Vec<[f32; 3]> = (0..self.store.atom_count())
            .map(|i| {
                let atom = self.store.atom_proxy(i);
                let residue = atom.residue();
                self.colors.atom_color(
                    atom.element(),
                    residue.ss(),
                    residue.is_polymer(),
                )
            })
            .collect();
        let mut atom = self.store.atom_proxy_mut(0);
        for (i, color) in colors.into_iter().enumerate() {
            atom.load(i);
            atom.set_color(color);
        }
    }

    /// Residue matching chain, number and insertion code.
    #[must_use]
    pub fn find_residue(
        &self,
        chain: char,
        res_num: i32,
        ins_code: char,
    ) -> Option<usize> {
        let mut residue = self.store.residue_proxy(0);
        (0..self.store.residue_count()).find(|&i| {
            residue.load(i);
            residue.chain() == chain
                && residue.res_num() == res_num
                && residue.ins_code() == ins_code
        })
    }

    /// Atom of residue `i_res` with the given name.
    #[must_use]
    pub fn find_atom_in_residue(
        &self,
        i_res: usize,
        atom_name: &str,
    ) -> Option<usize> {
        (i_res < self.store.residue_count())
            .then(|| self.store.residue_proxy(i_res).atom_index(atom_name))
            .flatten()
    }

    /// Display label of residue `i_res`, e.g. `A:42-ALA`.
    #[must_use]
    pub fn residue_label(&self, i_res: usize) -> Option<String> {
        (i_res < self.store.residue_count())
            .then(|| self.store.residue_proxy(i_res).label())
    }

    /// Display label of atom `i_atom`, e.g. `A:42-ALA CA`.
    #[must_use]
    pub fn atom_label(&self, i_atom: usize) -> Option<String> {
        (i_atom < self.store.atom_count())
            .then(|| self.store.atom_proxy(i_atom).label())
    }

    /// Residues sharing structure and chain with `i_res`.
    #[must_use]
    pub fn chain_residues(&self, i_res: usize) -> Vec<usize> {
        if i_res >= self.store.residue_count() {
            return Vec::new();
        }
        let anchor = self.store.residue_proxy(i_res);
        let (chain, structure) = (anchor.chain(), anchor.structure());
        let mut residue = anchor;
        (0..self.store.residue_count())
            .filter(|&i| {
                residue.load(i);
                residue.chain() == chain && residue.structure() == structure
            })
            .collect()
    }

    /// Residues with any atom within `radius` of any atom of `i_res`,
    /// including `i_res` itself.
    #[must_use]
    pub fn neighbours(&self, i_res: usize, radius: f32) -> Vec<usize> {
        if i_res >= self.store.residue_count() {
            return Vec::new();
        }
        let positions = self.store.positions();
        let centre: Vec<Vec3> = self
            .store
            .residue_proxy(i_res)
            .atom_range()
            .map(|i| positions[i])
            .collect();
        let radius_sq = radius * radius;
        let mut residue = self.store.residue_proxy(0);
        (0..self.store.residue_count())
            .filter(|&i| {
                residue.load(i);
                residue.atom_range().any(|a| {
                    centre
                        .iter()
                        .any(|c| c.distance_squared(positions[a]) <= radius_sq)
                })
            })
            .collect()
    }

    /// Positions of every atom of the given residues.
    #[must_use]
    pub fn residue_atom_positions(&self, residues: &[usize]) -> Vec<Vec3> {
        let positions = self.store.positions();
        residues
            .iter()
            .filter(|&&i| i < self.store.residue_count())
            .flat_map(|&i| self.store.residue_proxy(i).atom_range())
            .map(|a| positions[a])
            .collect()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.store = MolecularStore::new();
        self.structures.clear();
        self.topology = Topology::default();
        self.selected_traces.clear();
    }
}

fn shift_range(range: &Range<usize>, by: usize) -> Range<usize> {
    range.start - by..range.end - by
}
