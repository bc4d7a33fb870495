//! Columnar atom/residue storage with reusable cursors.
//!
//! Every atom and residue field lives in its own `Vec`; an entity is just
//! an index. [`AtomProxy`] and [`ResidueProxy`] are cheap cursors that read
//! (and, for the `Mut` variants, write) those columns in place, so walking
//! a structure never allocates per entity.
//!
//! A proxy borrows the store, so it cannot outlive a structural mutation
//! (append or removal) without being re-created.

mod atom;
mod name;
mod residue;

use std::ops::Range;

pub use atom::{AtomFields, AtomProxy, AtomProxyMut};
use glam::Vec3;
pub use name::Name4;
pub use residue::{
    ResidueFields, ResidueProxy, ResidueProxyMut, SecondaryStructure,
};

use crate::error::MolviewError;

/// Struct-of-arrays store for atoms and residues.
#[derive(Debug, Clone, Default)]
pub struct MolecularStore {
    // -- atom columns --
    positions: Vec<Vec3>,
    elements: Vec<Name4>,
    atom_names: Vec<Name4>,
    alts: Vec<u8>,
    bfactors: Vec<f32>,
    occupancies: Vec<f32>,
    is_hetatm: Vec<bool>,
    colors: Vec<[f32; 3]>,
    atom_residues: Vec<u32>,

    // -- residue columns --
    chains: Vec<u8>,
    res_nums: Vec<i32>,
    ins_codes: Vec<u8>,
    res_types: Vec<Name4>,
    ss: Vec<SecondaryStructure>,
    is_polymer: Vec<bool>,
    selected: Vec<bool>,
    sidechain: Vec<bool>,
    central_atoms: Vec<u32>,
    atom_offsets: Vec<u32>,
    atom_counts: Vec<u32>,
    structures: Vec<u32>,
    residue_normals: Vec<Option<Vec3>>,
}

/// Default display color before topology assigns one.
const NEUTRAL_GRAY: [f32; 3] = [0.6, 0.6, 0.6];

impl MolecularStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of atoms.
    #[must_use]
    pub fn atom_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of residues.
    #[must_use]
    pub fn residue_count(&self) -> usize {
        self.chains.len()
    }

    /// Whether the store holds no atoms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Atom position column.
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Append a residue with no atoms yet. Returns its index.
    pub fn add_residue(&mut self, fields: &ResidueFields) -> usize {
        let index = self.residue_count();
        self.chains.push(fields.chain);
        self.res_nums.push(fields.res_num);
        self.ins_codes.push(fields.ins_code);
        self.res_types.push(fields.res_type);
        self.ss.push(SecondaryStructure::Unassigned);
        self.is_polymer.push(false);
        self.selected.push(false);
        self.sidechain.push(false);
        self.central_atoms.push(self.atom_count() as u32);
        self.atom_offsets.push(self.atom_count() as u32);
        self.atom_counts.push(0);
        self.structures.push(fields.structure);
        self.residue_normals.push(None);
        index
    }

    /// Append an atom to residue `fields.i_res`. Returns its index.
    ///
    /// Atoms of one residue must be added contiguously; the residue's atom
    /// range is extended to cover the new atom.
    ///
    /// # Errors
    ///
    /// Returns [`MolviewError::IndexOutOfRange`] for an unknown residue.
    pub fn add_atom(
        &mut self,
        fields: &AtomFields,
    ) -> Result<usize, MolviewError> {
        if fields.i_res >= self.residue_count() {
            return Err(MolviewError::IndexOutOfRange {
                kind: "residue",
                index: fields.i_res,
            });
        }
        let index = self.atom_count();
        self.positions.push(fields.pos);
        self.elements.push(fields.element);
        self.atom_names.push(fields.atom_name);
        self.alts.push(fields.alt);
        self.bfactors.push(fields.bfactor);
        self.occupancies.push(fields.occupancy);
        self.is_hetatm.push(fields.is_hetatm);
        self.colors.push(NEUTRAL_GRAY);
        self.atom_residues.push(fields.i_res as u32);

        let r = fields.i_res;
        if self.atom_counts[r] == 0 {
            self.atom_offsets[r] = index as u32;
            self.central_atoms[r] = index as u32;
        }
        self.atom_counts[r] += 1;
        Ok(index)
    }

    /// Read cursor over atom `index`.
    #[must_use]
    pub fn atom_proxy(&self, index: usize) -> AtomProxy<'_> {
        AtomProxy::new(self, index)
    }

    /// Write cursor over atom `index`.
    pub fn atom_proxy_mut(&mut self, index: usize) -> AtomProxyMut<'_> {
        AtomProxyMut::new(self, index)
    }

    /// Read cursor over residue `index`.
    #[must_use]
    pub fn residue_proxy(&self, index: usize) -> ResidueProxy<'_> {
        ResidueProxy::new(self, index)
    }

    /// Write cursor over residue `index`.
    pub fn residue_proxy_mut(
        &mut self,
        index: usize,
    ) -> ResidueProxyMut<'_> {
        ResidueProxyMut::new(self, index)
    }

    /// Move every entity of `other` to the end of this store, tagging its
    /// residues with `structure`. Returns the new atom and residue ranges.
    pub fn append(
        &mut self,
        other: Self,
        structure: u32,
    ) -> (Range<usize>, Range<usize>) {
        let atom_shift = self.atom_count() as u32;
        let res_shift = self.residue_count() as u32;
        let atoms = self.atom_count()..self.atom_count() + other.atom_count();
        let residues =
            self.residue_count()..self.residue_count() + other.residue_count();

        self.positions.extend(other.positions);
        self.elements.extend(other.elements);
        self.atom_names.extend(other.atom_names);
        self.alts.extend(other.alts);
        self.bfactors.extend(other.bfactors);
        self.occupancies.extend(other.occupancies);
        self.is_hetatm.extend(other.is_hetatm);
        self.colors.extend(other.colors);
        self.atom_residues
            .extend(other.atom_residues.iter().map(|&r| r + res_shift));

        self.chains.extend(other.chains);
        self.res_nums.extend(other.res_nums);
        self.ins_codes.extend(other.ins_codes);
        self.res_types.extend(other.res_types);
        self.ss.extend(other.ss);
        self.is_polymer.extend(other.is_polymer);
        self.selected.extend(other.selected);
        self.sidechain.extend(other.sidechain);
        self.central_atoms
            .extend(other.central_atoms.iter().map(|&a| a + atom_shift));
        self.atom_offsets
            .extend(other.atom_offsets.iter().map(|&a| a + atom_shift));
        self.atom_counts.extend(other.atom_counts);
        self.structures
            .extend(std::iter::repeat_n(structure, residues.len()));
        self.residue_normals.extend(other.residue_normals);

        (atoms, residues)
    }

    /// Splice out the atoms and residues of structure `structure`, shifting
    /// every stored index above the removed ranges downward. Residues of
    /// later structures are renumbered to close the gap.
    pub fn remove_structure(
        &mut self,
        structure: u32,
        atoms: Range<usize>,
        residues: Range<usize>,
    ) {
        let n_atoms = atoms.len() as u32;
        let n_res = residues.len() as u32;

        let atom_columns: [&mut dyn Drainable; 9] = [
            &mut self.positions,
            &mut self.elements,
            &mut self.atom_names,
            &mut self.alts,
            &mut self.bfactors,
            &mut self.occupancies,
            &mut self.is_hetatm,
            &mut self.colors,
            &mut self.atom_residues,
        ];
        drain_all(&atoms, atom_columns);
        let residue_columns: [&mut dyn Drainable; 13] = [
            &mut self.chains,
            &mut self.res_nums,
            &mut self.ins_codes,
            &mut self.res_types,
            &mut self.ss,
            &mut self.is_polymer,
            &mut self.selected,
            &mut self.sidechain,
            &mut self.central_atoms,
            &mut self.atom_offsets,
            &mut self.atom_counts,
            &mut self.structures,
            &mut self.residue_normals,
        ];
        drain_all(&residues, residue_columns);

        let atom_end = atoms.start as u32;
        let res_end = residues.start as u32;
        for r in &mut self.atom_residues {
            if *r >= res_end {
                *r -= n_res;
            }
        }
        for a in self
            .central_atoms
            .iter_mut()
            .chain(self.atom_offsets.iter_mut())
        {
            if *a >= atom_end {
                *a -= n_atoms;
            }
        }
        for s in &mut self.structures {
            if *s > structure {
                *s -= 1;
            }
        }
    }
}

/// Type-erased range removal so every column can be drained in one loop.
trait Drainable {
    fn drain_range(&mut self, range: Range<usize>);
}

impl<T> Drainable for Vec<T> {
    fn drain_range(&mut self, range: Range<usize>) {
        let _ = self.drain(range);
    }
}

fn drain_all<const N: usize>(
    range: &Range<usize>,
    columns: [&mut dyn Drainable; N],
) {
    for column in columns {
        column.drain_range(range.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn residue(chain: u8, res_num: i32, structure: u32) -> ResidueFields {
        ResidueFields {
            chain,
            res_num,
            ins_code: b' ',
            res_type: Name4::new("GLY"),
            structure,
        }
    }

    fn atom(name: &str, x: f32, i_res: usize) -> AtomFields {
        AtomFields {
            pos: Vec3::new(x, 0.0, 0.0),
            element: Name4::new(&name[..1]),
            atom_name: Name4::new(name),
            alt: b' ',
            bfactor: 10.0,
            occupancy: 1.0,
            is_hetatm: false,
            i_res,
        }
    }

    fn two_residue_store() -> MolecularStore {
        let mut store = MolecularStore::new();
        let r0 = store.add_residue(&residue(b'A', 1, 0));
        let _ = store.add_atom(&atom("N", 0.0, r0)).unwrap();
        let _ = store.add_atom(&atom("CA", 1.0, r0)).unwrap();
        let r1 = store.add_residue(&residue(b'A', 2, 0));
        let _ = store.add_atom(&atom("N", 2.0, r1)).unwrap();
        let _ = store.add_atom(&atom("CA", 3.0, r1)).unwrap();
        let _ = store.add_atom(&atom("C", 4.0, r1)).unwrap();
        store
    }

    #[test]
    fn counts_and_ranges() {
        let store = two_residue_store();
        assert_eq!(store.atom_count(), 5);
        assert_eq!(store.residue_count(), 2);
        assert_eq!(store.residue_proxy(1).atom_range(), 2..5);
        assert_eq!(store.residue_proxy(1).atom_index("CA"), Some(3));
        assert_eq!(store.atom_proxy(4).i_res(), 1);
    }

    #[test]
    fn add_atom_rejects_missing_residue() {
        let mut store = MolecularStore::new();
        assert!(store.add_atom(&atom("CA", 0.0, 0)).is_err());
    }

    #[test]
    fn proxy_reload_repoints_without_copy() {
        let store = two_residue_store();
        let mut proxy = store.atom_proxy(0);
        assert_eq!(proxy.atom_name(), "N");
        proxy.load(3);
        assert_eq!(proxy.atom_name(), "CA");
        assert_eq!(proxy.pos().x, 3.0);
    }

    #[test]
    fn writes_are_visible_through_other_proxies() {
        let mut store = two_residue_store();
        store.residue_proxy_mut(1).set_selected(true);
        assert!(store.residue_proxy(1).selected());
        assert!(!store.residue_proxy(0).selected());
    }

    #[test]
    fn append_shifts_indices() {
        let mut store = two_residue_store();
        let (atoms, residues) = store.append(two_residue_store(), 1);
        assert_eq!(atoms, 5..10);
        assert_eq!(residues, 2..4);
        assert_eq!(store.residue_proxy(3).atom_range(), 7..10);
        assert_eq!(store.atom_proxy(9).i_res(), 3);
        assert_eq!(store.residue_proxy(3).structure(), 1);
    }

    #[test]
    fn remove_structure_closes_gap() {
        let mut store = two_residue_store();
        let _ = store.append(two_residue_store(), 1);
        store.remove_structure(0, 0..5, 0..2);
        assert_eq!(store.atom_count(), 5);
        assert_eq!(store.residue_count(), 2);
        assert_eq!(store.residue_proxy(1).atom_range(), 2..5);
        assert_eq!(store.residue_proxy(1).structure(), 0);
        assert_eq!(store.atom_proxy(4).i_res(), 1);
        assert_eq!(store.residue_proxy(0).i_atom_central(), 0);
    }
}
