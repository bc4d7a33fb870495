//! Derived topology: residue classification, secondary structure, bonds,
//! and backbone traces with per-point frames.
//!
//! Everything here is derived from atom positions and names and is rebuilt
//! wholesale whenever structures are added or removed.

mod bond_table;
mod bonds;
mod frames;
mod secondary_structure;
mod trace;

use std::ops::Range;

pub use bonds::{Bond, Linkage};
pub use frames::Frames;
pub use trace::{Piece, Trace};

use crate::options::TopologyOptions;
use crate::store::MolecularStore;

/// Bonds and traces derived from a store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    /// Every inferred bond, sorted.
    pub bonds: Vec<Bond>,
    /// Backbone traces in residue order.
    pub traces: Vec<Trace>,
}

impl Topology {
    /// Total number of secondary-structure pieces across all traces.
    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.traces.iter().map(|t| t.pieces.len()).sum()
    }

    /// Index of the trace containing residue `i_res`.
    #[must_use]
    pub fn trace_of_residue(&self, i_res: usize) -> Option<usize> {
        self.traces.iter().position(|t| t.contains_residue(i_res))
    }
}

/// Derives classification, secondary structure, bonds and traces.
#[derive(Debug, Clone, Default)]
pub struct TopologyBuilder {
    options: TopologyOptions,
}

impl TopologyBuilder {
    /// Builder using the given cutoffs.
    #[must_use]
    pub fn new(options: TopologyOptions) -> Self {
        Self { options }
    }

    /// Cutoffs in use.
    #[must_use]
    pub fn options(&self) -> &TopologyOptions {
        &self.options
    }

    /// Classify residues as polymer, ligand or water and pick each
    /// residue's representative atom.
    pub fn classify(&self, store: &mut MolecularStore, residues: Range<usize>) {
        secondary_structure::classify_residues(store, residues);
    }

    /// Assign secondary structure to classified residues. Geometry-based
    /// detection runs only when `has_records` is false.
    pub fn assign_secondary_structure(
        &self,
        store: &mut MolecularStore,
        residues: Range<usize>,
        has_records: bool,
    ) {
        secondary_structure::assign_secondary_structure(
            store,
            residues,
            has_records,
        );
    }

    /// Backbone linkage from residue `i` to residue `j`, if any.
    #[must_use]
    pub fn linkage(
        &self,
        store: &MolecularStore,
        i: usize,
        j: usize,
    ) -> Option<Linkage> {
        bonds::linkage(store, i, j, &self.options)
    }

    /// Infer every bond in the store.
    #[must_use]
    pub fn infer_bonds(&self, store: &MolecularStore) -> Vec<Bond> {
        bonds::infer_bonds(store, 0..store.residue_count(), &self.options)
    }

    /// Segment the whole store into traces.
    #[must_use]
    pub fn segment_traces(&self, store: &MolecularStore) -> Vec<Trace> {
        trace::segment_traces(store, 0..store.residue_count(), &self.options)
    }

    /// Bonds and traces for the whole store.
    #[must_use]
    pub fn build(&self, store: &MolecularStore) -> Topology {
        let topology = Topology {
            bonds: self.infer_bonds(store),
            traces: self.segment_traces(store),
        };
        log::debug!(
            "topology: {} bonds, {} traces, {} pieces",
            topology.bonds.len(),
            topology.traces.len(),
            topology.piece_count()
        );
        topology
    }
}
