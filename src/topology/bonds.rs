//! Covalent bond inference.

use std::ops::Range;

use rustc_hash::FxHashSet;

use super::bond_table::residue_bonds;
use crate::options::TopologyOptions;
use crate::store::MolecularStore;

/// An undirected bond between two atoms. `a < b` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bond {
    /// Lower atom index.
    pub a: usize,
    /// Higher atom index.
    pub b: usize,
}

impl Bond {
    /// Bond between two atoms in either order.
    #[must_use]
    pub fn new(i: usize, j: usize) -> Self {
        Self {
            a: i.min(j),
            b: i.max(j),
        }
    }

    /// Whether the bond touches atom `i`.
    #[must_use]
    pub fn contains(&self, i: usize) -> bool {
        self.a == i || self.b == i
    }
}

/// How two adjacent residues are joined, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
    /// Carbonyl C of the first to amide N of the second.
    Peptide {
        /// Carbonyl carbon.
        c: usize,
        /// Amide nitrogen.
        n: usize,
    },
    /// O3' of the first to P of the second.
    Phosphodiester {
        /// Sugar O3'.
        o3: usize,
        /// Phosphorus.
        p: usize,
    },
}

impl Linkage {
    /// The bond this linkage contributes.
    #[must_use]
    pub fn bond(self) -> Bond {
        match self {
            Self::Peptide { c, n } => Bond::new(c, n),
            Self::Phosphodiester { o3, p } => Bond::new(o3, p),
        }
    }
}

/// Backbone linkage from residue `i` to residue `j`.
///
/// Residues in different structures or chains are never linked, and a
/// residue missing the atoms a rule needs simply fails that rule.
pub(crate) fn linkage(
    store: &MolecularStore,
    i: usize,
    j: usize,
    options: &TopologyOptions,
) -> Option<Linkage> {
    if i >= store.residue_count() || j >= store.residue_count() {
        return None;
    }
    let (first, second) = (store.residue_proxy(i), store.residue_proxy(j));
    if first.structure() != second.structure()
        || first.chain() != second.chain()
    {
        return None;
    }

    let within = |a: usize, b: usize, cutoff: f32| {
        let positions = store.positions();
        positions[a].distance(positions[b]) < cutoff
    };

    if let (Some(c), Some(n)) = (first.atom_index("C"), second.atom_index("N"))
    {
        if within(c, n, options.peptide_cutoff) {
            return Some(Linkage::Peptide { c, n });
        }
    }
    if let (Some(o3), Some(p)) =
        (first.atom_index("O3'"), second.atom_index("P"))
    {
        if within(o3, p, options.phosphodiester_cutoff) {
            return Some(Linkage::Phosphodiester { o3, p });
        }
    }
    None
}

/// Infer every bond among `residues`: table bonds inside each residue,
/// distance bonds for atoms the tables do not name, and backbone links
/// between adjacent residues.
pub(crate) fn infer_bonds(
    store: &MolecularStore,
    residues: Range<usize>,
    options: &TopologyOptions,
) -> Vec<Bond> {
    let mut bonds = Vec::new();
    for i_res in residues.clone() {
        residue_internal_bonds(store, i_res, options, &mut bonds);
        if i_res + 1 < residues.end {
            if let Some(link) = linkage(store, i_res, i_res + 1, options) {
                bonds.push(link.bond());
            }
        }
    }
    bonds.sort_unstable();
    bonds.dedup();
    bonds
}

fn residue_internal_bonds(
    store: &MolecularStore,
    i_res: usize,
    options: &TopologyOptions,
    bonds: &mut Vec<Bond>,
) {
    let residue = store.residue_proxy(i_res);
    let atoms = residue.atom_range();

    // Atoms named by the table get exactly the table's bonds.
    let mut tabled: FxHashSet<usize> = FxHashSet::default();
    if let Some(table) = residue_bonds(residue.res_type()) {
        for (name_a, name_b) in table {
            let a = residue.atom_index(name_a);
            let b = residue.atom_index(name_b);
            if let (Some(a), Some(b)) = (a, b) {
                bonds.push(Bond::new(a, b));
                let _ = tabled.insert(a);
                let _ = tabled.insert(b);
            }
        }
    }

    let positions = store.positions();
    let is_hydrogen =
        |k: usize| matches!(store.atom_proxy(k).element(), "H" | "D");
    for i in atoms.clone() {
        for j in i + 1..atoms.end {
            if tabled.contains(&i) && tabled.contains(&j) {
                continue;
            }
            let cutoff = if is_hydrogen(i) || is_hydrogen(j) {
                options.hydrogen_bond_cutoff
            } else {
                options.bond_cutoff
            };
            if positions[i].distance(positions[j]) < cutoff {
                bonds.push(Bond::new(i, j));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::store::{AtomFields, Name4, ResidueFields};

    fn add_residue(
        store: &mut MolecularStore,
        res_type: &str,
        chain: u8,
        atoms: &[(&str, Vec3)],
    ) -> usize {
        let i_res = store.add_residue(&ResidueFields {
            chain,
            res_num: store.residue_count() as i32 + 1,
            ins_code: b' ',
            res_type: Name4::new(res_type),
            structure: 0,
        });
        for &(name, pos) in atoms {
            let _ = store
                .add_atom(&AtomFields {
                    pos,
                    element: Name4::new(&name[..1]),
                    atom_name: Name4::new(name),
                    alt: b' ',
                    bfactor: 0.0,
                    occupancy: 1.0,
                    is_hetatm: false,
                    i_res,
                })
                .unwrap();
        }
        i_res
    }

    fn glycine(store: &mut MolecularStore, chain: u8, x: f32) -> usize {
        add_residue(
            store,
            "GLY",
            chain,
            &[
                ("N", Vec3::new(x, 0.0, 0.0)),
                ("CA", Vec3::new(x + 1.45, 0.0, 0.0)),
                ("C", Vec3::new(x + 2.0, 1.4, 0.0)),
                ("O", Vec3::new(x + 1.5, 2.5, 0.0)),
            ],
        )
    }

    #[test]
    fn bond_is_unordered() {
        assert_eq!(Bond::new(5, 2), Bond::new(2, 5));
        assert!(Bond::new(5, 2).contains(5));
    }

    #[test]
    fn peptide_link_within_cutoff() {
        let mut store = MolecularStore::new();
        let _ = glycine(&mut store, b'A', 0.0);
        // C of the first residue sits at (2.0, 1.4); N of the next at
        // (3.3, 1.4) is 1.3Å away.
        let _ = add_residue(
            &mut store,
            "GLY",
            b'A',
            &[
                ("N", Vec3::new(3.3, 1.4, 0.0)),
                ("CA", Vec3::new(4.7, 1.4, 0.0)),
            ],
        );
        let opts = TopologyOptions::default();
        assert!(matches!(
            linkage(&store, 0, 1, &opts),
            Some(Linkage::Peptide { c: 2, n: 4 })
        ));
    }

    #[test]
    fn distant_or_cross_chain_residues_are_not_linked() {
        let mut store = MolecularStore::new();
        let _ = glycine(&mut store, b'A', 0.0);
        let _ = glycine(&mut store, b'A', 20.0);
        let _ = glycine(&mut store, b'B', 2.0);
        let opts = TopologyOptions::default();
        assert_eq!(linkage(&store, 0, 1, &opts), None);
        assert_eq!(linkage(&store, 1, 2, &opts), None);
        assert_eq!(linkage(&store, 2, 3, &opts), None);
    }

    #[test]
    fn missing_atoms_mean_no_link() {
        let mut store = MolecularStore::new();
        let _ = add_residue(&mut store, "GLY", b'A', &[("CA", Vec3::ZERO)]);
        let _ = add_residue(&mut store, "GLY", b'A', &[("CA", Vec3::X)]);
        assert_eq!(linkage(&store, 0, 1, &TopologyOptions::default()), None);
    }

    #[test]
    fn table_and_distance_bonds() {
        let mut store = MolecularStore::new();
        let _ = glycine(&mut store, b'A', 0.0);
        let _ = add_residue(
            &mut store,
            "LIG",
            b'A',
            &[
                ("C1", Vec3::new(50.0, 0.0, 0.0)),
                ("C2", Vec3::new(51.5, 0.0, 0.0)),
                ("H1", Vec3::new(52.5, 0.0, 0.0)),
                ("C3", Vec3::new(55.0, 0.0, 0.0)),
            ],
        );
        let bonds = infer_bonds(&store, 0..2, &TopologyOptions::default());
        // GLY: N-CA, CA-C, C-O. LIG: C1-C2, C2-H1.
        assert_eq!(
            bonds,
            vec![
                Bond::new(0, 1),
                Bond::new(1, 2),
                Bond::new(2, 3),
                Bond::new(4, 5),
                Bond::new(5, 6),
            ]
        );
    }
}
