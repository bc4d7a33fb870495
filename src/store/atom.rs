use glam::Vec3;

use super::{MolecularStore, Name4, ResidueProxy};

/// Column values for a new atom.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomFields {
    /// Position in angstroms.
    pub pos: Vec3,
    /// Element symbol.
    pub element: Name4,
    /// Atom name, e.g. `CA`.
    pub atom_name: Name4,
    /// Alternate-location flag (`b' '` when absent).
    pub alt: u8,
    /// Temperature factor.
    pub bfactor: f32,
    /// Occupancy.
    pub occupancy: f32,
    /// Whether the atom came from a hetero-atom record.
    pub is_hetatm: bool,
    /// Owning residue index.
    pub i_res: usize,
}

/// Read-only cursor over one atom of a [`MolecularStore`].
#[derive(Clone, Copy)]
pub struct AtomProxy<'a> {
    store: &'a MolecularStore,
    index: usize,
}

impl<'a> AtomProxy<'a> {
    pub(super) fn new(store: &'a MolecularStore, index: usize) -> Self {
        Self { store, index }
    }

    /// Repoint the cursor at atom `index`.
    pub fn load(&mut self, index: usize) {
        self.index = index;
    }

    /// Atom index the cursor points at.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Position in angstroms.
    #[must_use]
    pub fn pos(&self) -> Vec3 {
        self.store.positions[self.index]
    }

    /// Element symbol.
    #[must_use]
    pub fn element(&self) -> &'a str {
        self.store.elements[self.index].as_str()
    }

    /// Atom name.
    #[must_use]
    pub fn atom_name(&self) -> &'a str {
        self.store.atom_names[self.index].as_str()
    }

    /// Alternate-location flag, `' '` when absent.
    #[must_use]
    pub fn alt(&self) -> char {
        char::from(self.store.alts[self.index])
    }

    /// Temperature factor.
    #[must_use]
    pub fn bfactor(&self) -> f32 {
        self.store.bfactors[self.index]
    }

    /// Occupancy.
    #[must_use]
    pub fn occupancy(&self) -> f32 {
        self.store.occupancies[self.index]
    }

    /// Whether the atom came from a hetero-atom record.
    #[must_use]
    pub fn is_hetatm(&self) -> bool {
        self.store.is_hetatm[self.index]
    }

    /// Derived display color.
    #[must_use]
    pub fn color(&self) -> [f32; 3] {
        self.store.colors[self.index]
    }

    /// Owning residue index.
    #[must_use]
    pub fn i_res(&self) -> usize {
        self.store.atom_residues[self.index] as usize
    }

    /// Cursor over the owning residue.
    #[must_use]
    pub fn residue(&self) -> ResidueProxy<'a> {
        ResidueProxy::new(self.store, self.i_res())
    }

    /// Display label, e.g. `A:42-ALA CA`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.residue().label(), self.atom_name())
    }
}

/// Writable cursor over one atom. Only the derived display color may
/// change after parsing.
pub struct AtomProxyMut<'a> {
    store: &'a mut MolecularStore,
    index: usize,
}

impl<'a> AtomProxyMut<'a> {
    pub(super) fn new(store: &'a mut MolecularStore, index: usize) -> Self {
        Self { store, index }
    }

    /// Repoint the cursor at atom `index`.
    pub fn load(&mut self, index: usize) {
        self.index = index;
    }

    /// Read-only view of the same atom.
    #[must_use]
    pub fn get(&self) -> AtomProxy<'_> {
        AtomProxy::new(self.store, self.index)
    }

    /// Set the derived display color.
    pub fn set_color(&mut self, color: [f32; 3]) {
        self.store.colors[self.index] = color;
    }
}
