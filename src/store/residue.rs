use std::ops::Range;

use glam::Vec3;

use super::{AtomProxy, MolecularStore, Name4};

/// Per-residue secondary-structure code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SecondaryStructure {
    /// Alpha helix.
    Helix,
    /// Beta strand/sheet.
    Sheet,
    /// Nucleic-acid backbone (duplex or single strand).
    Duplex,
    /// Polymer residue in no regular structure.
    Coil,
    /// Non-polymer, non-solvent residue.
    Ligand,
    /// Solvent.
    Water,
    /// Not yet classified.
    #[default]
    Unassigned,
}

/// Column values for a new residue.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidueFields {
    /// Chain identifier.
    pub chain: u8,
    /// Residue sequence number.
    pub res_num: i32,
    /// Insertion code (`b' '` when absent).
    pub ins_code: u8,
    /// Residue type code, e.g. `ALA`, `DG`, `HOH`.
    pub res_type: Name4,
    /// Owning structure index.
    pub structure: u32,
}

/// Read-only cursor over one residue of a [`MolecularStore`].
#[derive(Clone, Copy)]
pub struct ResidueProxy<'a> {
    store: &'a MolecularStore,
    index: usize,
}

impl<'a> ResidueProxy<'a> {
    pub(super) fn new(store: &'a MolecularStore, index: usize) -> Self {
        Self { store, index }
    }

    /// Repoint the cursor at residue `index`.
    pub fn load(&mut self, index: usize) {
        self.index = index;
    }

    /// Residue index the cursor points at.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Chain identifier.
    #[must_use]
    pub fn chain(&self) -> char {
        char::from(self.store.chains[self.index])
    }

    /// Residue sequence number.
    #[must_use]
    pub fn res_num(&self) -> i32 {
        self.store.res_nums[self.index]
    }

    /// Insertion code, `' '` when absent.
    #[must_use]
    pub fn ins_code(&self) -> char {
        char::from(self.store.ins_codes[self.index])
    }

    /// Residue type code.
    #[must_use]
    pub fn res_type(&self) -> &'a str {
        self.store.res_types[self.index].as_str()
    }

    /// Secondary-structure code.
    #[must_use]
    pub fn ss(&self) -> SecondaryStructure {
        self.store.ss[self.index]
    }

    /// Whether the residue is part of a polymer backbone.
    #[must_use]
    pub fn is_polymer(&self) -> bool {
        self.store.is_polymer[self.index]
    }

    /// Whether the residue is selected.
    #[must_use]
    pub fn selected(&self) -> bool {
        self.store.selected[self.index]
    }

    /// Whether the sidechain is shown.
    #[must_use]
    pub fn sidechain(&self) -> bool {
        self.store.sidechain[self.index]
    }

    /// Owning structure index.
    #[must_use]
    pub fn structure(&self) -> usize {
        self.store.structures[self.index] as usize
    }

    /// Index of the representative atom.
    #[must_use]
    pub fn i_atom_central(&self) -> usize {
        self.store.central_atoms[self.index] as usize
    }

    /// Explicit frame normal (nucleotide base direction), if any.
    #[must_use]
    pub fn normal(&self) -> Option<Vec3> {
        self.store.residue_normals[self.index]
    }

    /// Contiguous atom-index range of this residue.
    #[must_use]
    pub fn atom_range(&self) -> Range<usize> {
        let start = self.store.atom_offsets[self.index] as usize;
        start..start + self.store.atom_counts[self.index] as usize
    }

    /// Find an atom of this residue by name.
    #[must_use]
    pub fn atom_index(&self, atom_name: &str) -> Option<usize> {
        self.atom_range()
            .find(|&i| self.store.atom_names[i] == atom_name)
    }

    /// Position of the named atom, if present.
    #[must_use]
    pub fn atom_pos(&self, atom_name: &str) -> Option<Vec3> {
        self.atom_index(atom_name).map(|i| self.store.positions[i])
    }

    /// Position of the representative atom.
    #[must_use]
    pub fn central_pos(&self) -> Vec3 {
        self.store.positions[self.i_atom_central()]
    }

    /// Cursor over the representative atom.
    #[must_use]
    pub fn central_atom(&self) -> AtomProxy<'a> {
        AtomProxy::new(self.store, self.i_atom_central())
    }

    /// Short display label, e.g. `A:42-ALA`.
    #[must_use]
    pub fn label(&self) -> String {
        let ins = self.ins_code();
        if ins == ' ' {
            format!("{}:{}-{}", self.chain(), self.res_num(), self.res_type())
        } else {
            format!(
                "{}:{}{}-{}",
                self.chain(),
                self.res_num(),
                ins,
                self.res_type()
            )
        }
    }
}

/// Writable cursor over one residue of a [`MolecularStore`].
pub struct ResidueProxyMut<'a> {
    store: &'a mut MolecularStore,
    index: usize,
}

impl<'a> ResidueProxyMut<'a> {
    pub(super) fn new(store: &'a mut MolecularStore, index: usize) -> Self {
        Self { store, index }
    }

    /// Repoint the cursor at residue `index`.
    pub fn load(&mut self, index: usize) {
        self.index = index;
    }

    /// Read-only view of the same residue.
    #[must_use]
    pub fn get(&self) -> ResidueProxy<'_> {
        ResidueProxy::new(self.store, self.index)
    }

    /// Set the secondary-structure code.
    pub fn set_ss(&mut self, ss: SecondaryStructure) {
        self.store.ss[self.index] = ss;
    }

    /// Set the polymer flag.
    pub fn set_polymer(&mut self, is_polymer: bool) {
        self.store.is_polymer[self.index] = is_polymer;
    }

    /// Set the selection flag.
    pub fn set_selected(&mut self, selected: bool) {
        self.store.selected[self.index] = selected;
    }

    /// Set the sidechain-visible flag.
    pub fn set_sidechain(&mut self, sidechain: bool) {
        self.store.sidechain[self.index] = sidechain;
    }

    /// Set the representative atom.
    pub fn set_i_atom_central(&mut self, i_atom: usize) {
        self.store.central_atoms[self.index] = i_atom as u32;
    }

    /// Set the explicit frame normal.
    pub fn set_normal(&mut self, normal: Option<Vec3>) {
        self.store.residue_normals[self.index] = normal;
    }
}
