//! Residue classification and secondary-structure assignment.
//!
//! Classification decides polymer/ligand/water, the representative atom and
//! (for nucleotides) the base-plane normal. When a structure carries no
//! helix/sheet records, protein runs are assigned from Cα geometry:
//! - Helix: Cα(i)-Cα(i+3) ≈ 5.0-5.5Å, Cα(i)-Cα(i+4) ≈ 5.5-6.5Å
//! - Sheet: extended, Cα(i)-Cα(i+1) ≈ 3.8Å and Cα(i)-Cα(i+2) ≈ 6.5-7.5Å

use std::ops::Range;

use glam::Vec3;

use super::bond_table::{residue_family, ResidueFamily};
use crate::store::{MolecularStore, SecondaryStructure};

const MIN_HELIX_LENGTH: usize = 4;
const MIN_SHEET_LENGTH: usize = 3;

/// Whether a residue type names a solvent molecule.
pub(crate) fn is_water(res_type: &str) -> bool {
    matches!(res_type, "HOH" | "WAT" | "DOD" | "H2O")
}

/// Classify every residue in `residues`: polymer flag, representative atom,
/// nucleotide normal, and the ligand/water/duplex codes.
pub(crate) fn classify_residues(
    store: &mut MolecularStore,
    residues: Range<usize>,
) {
    for i_res in residues {
        let residue = store.residue_proxy(i_res);
        let atoms = residue.atom_range();
        if atoms.is_empty() {
            continue;
        }
        let res_type = residue.res_type();
        let family = residue_family(res_type);

        let is_protein = family == Some(ResidueFamily::AminoAcid)
            || ["N", "CA", "C"]
                .iter()
                .all(|name| residue.atom_index(name).is_some());
        let is_nucleic = matches!(
            family,
            Some(ResidueFamily::Purine | ResidueFamily::Pyrimidine)
        ) || (residue.atom_index("C3'").is_some()
            && residue.atom_index("P").is_some());

        let central = if is_protein {
            residue.atom_index("CA")
        } else if is_nucleic {
            residue.atom_index("C3'").or_else(|| residue.atom_index("P"))
        } else {
            None
        }
        .unwrap_or_else(|| closest_to_centroid(store.positions(), atoms));

        let normal = if is_nucleic {
            base_normal(store, i_res, family)
        } else {
            None
        };

        let ss = if is_water(res_type) {
            SecondaryStructure::Water
        } else if is_nucleic {
            SecondaryStructure::Duplex
        } else if is_protein {
            residue.ss()
        } else {
            SecondaryStructure::Ligand
        };
        let is_polymer =
            (is_protein || is_nucleic) && ss != SecondaryStructure::Water;

        let mut residue = store.residue_proxy_mut(i_res);
        residue.set_polymer(is_polymer);
        residue.set_i_atom_central(central);
        residue.set_normal(normal);
        residue.set_ss(ss);
    }
}

/// Assign secondary structure to the protein residues in `residues`.
///
/// Without helix/sheet records, each run of consecutive protein residues in
/// one chain is assigned from Cα geometry. Protein residues still
/// unassigned afterwards become coil.
pub(crate) fn assign_secondary_structure(
    store: &mut MolecularStore,
    residues: Range<usize>,
    has_records: bool,
) {
    if !has_records {
        for run in protein_runs(store, residues.clone()) {
            let ca_positions: Vec<Vec3> = run
                .clone()
                .map(|i| store.residue_proxy(i).central_pos())
                .collect();
            let assigned = detect_secondary_structure(&ca_positions);
            let mut residue = store.residue_proxy_mut(run.start);
            for (i_res, ss) in run.zip(assigned) {
                residue.load(i_res);
                residue.set_ss(ss);
            }
        }
    }

    let mut residue = store.residue_proxy_mut(residues.start);
    for i_res in residues {
        residue.load(i_res);
        let current = residue.get();
        if current.is_polymer()
            && current.ss() == SecondaryStructure::Unassigned
        {
            residue.set_ss(SecondaryStructure::Coil);
        }
    }
}

/// Detect secondary structure from Cα positions, one code per residue.
pub(crate) fn detect_secondary_structure(
    ca_positions: &[Vec3],
) -> Vec<SecondaryStructure> {
    let n = ca_positions.len();
    if n < 4 {
        return vec![SecondaryStructure::Coil; n];
    }

    let mut raw = vec![SecondaryStructure::Coil; n];
    for i in 0..n {
        if i + 4 < n {
            let d_i3 = ca_positions[i].distance(ca_positions[i + 3]);
            let d_i4 = ca_positions[i].distance(ca_positions[i + 4]);
            if (4.5..=6.0).contains(&d_i3) && (5.0..=7.0).contains(&d_i4) {
                raw[i] = SecondaryStructure::Helix;
            }
        }

        if i + 2 < n && raw[i] != SecondaryStructure::Helix {
            let d_i1 = ca_positions[i].distance(ca_positions[i + 1]);
            let d_i2 = ca_positions[i].distance(ca_positions[i + 2]);
            if (3.5..=4.1).contains(&d_i1) && (6.0..=8.0).contains(&d_i2) {
                raw[i] = SecondaryStructure::Sheet;
            }
        }
    }

    let mut smoothed = vec![SecondaryStructure::Coil; n];

    // Helix runs extend three residues to cover the final turn.
    for run in runs_of(&raw, SecondaryStructure::Helix) {
        if run.len() >= MIN_HELIX_LENGTH {
            let end = (run.end + 3).min(n);
            smoothed[run.start..end].fill(SecondaryStructure::Helix);
        }
    }

    let sheet_candidates: Vec<SecondaryStructure> = raw
        .iter()
        .zip(&smoothed)
        .map(|(&r, &s)| {
            if s == SecondaryStructure::Helix {
                SecondaryStructure::Coil
            } else {
                r
            }
        })
        .collect();
    for run in runs_of(&sheet_candidates, SecondaryStructure::Sheet) {
        if run.len() >= MIN_SHEET_LENGTH {
            smoothed[run].fill(SecondaryStructure::Sheet);
        }
    }

    smoothed
}

/// Maximal index ranges where `codes` equals `target`.
fn runs_of(
    codes: &[SecondaryStructure],
    target: SecondaryStructure,
) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut i = 0;
    while i < codes.len() {
        if codes[i] == target {
            let start = i;
            while i < codes.len() && codes[i] == target {
                i += 1;
            }
            runs.push(start..i);
        } else {
            i += 1;
        }
    }
    runs
}

/// Runs of consecutive protein residues sharing a chain and structure.
fn protein_runs(
    store: &MolecularStore,
    residues: Range<usize>,
) -> Vec<Range<usize>> {
    let is_protein = |i: usize| {
        let residue = store.residue_proxy(i);
        residue.is_polymer()
            && residue.ss() != SecondaryStructure::Duplex
            && residue.atom_index("CA").is_some()
    };
    let same_chain = |a: usize, b: usize| {
        let (ra, rb) = (store.residue_proxy(a), store.residue_proxy(b));
        ra.chain() == rb.chain() && ra.structure() == rb.structure()
    };

    let mut runs = Vec::new();
    let mut start: Option<usize> = None;
    for i in residues.clone() {
        let continues =
            start.is_some() && is_protein(i) && same_chain(i - 1, i);
        if !continues {
            if let Some(s) = start.take() {
                runs.push(s..i);
            }
            start = is_protein(i).then_some(i);
        }
    }
    if let Some(s) = start {
        runs.push(s..residues.end);
    }
    runs
}

/// Atom in `atoms` closest to their centroid.
fn closest_to_centroid(positions: &[Vec3], atoms: Range<usize>) -> usize {
    let slice = &positions[atoms.clone()];
    let centroid = slice.iter().copied().sum::<Vec3>() / slice.len() as f32;
    atoms
        .min_by(|&a, &b| {
            positions[a]
                .distance_squared(centroid)
                .total_cmp(&positions[b].distance_squared(centroid))
        })
        .unwrap_or(0)
}

/// Base-plane direction of a nucleotide: from C3' toward N1 for purines or
/// N3 for pyrimidines.
fn base_normal(
    store: &MolecularStore,
    i_res: usize,
    family: Option<ResidueFamily>,
) -> Option<Vec3> {
    let residue = store.residue_proxy(i_res);
    let c3 = residue.atom_pos("C3'")?;
    let base = match family {
        Some(ResidueFamily::Pyrimidine) => residue.atom_pos("N3"),
        Some(ResidueFamily::Purine) => residue.atom_pos("N1"),
        _ => residue.atom_pos("N1").or_else(|| residue.atom_pos("N3")),
    }?;
    (base - c3).try_normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ideal α-helix Cα trace: radius 2.3Å, rise 1.5Å, 100° per residue.
    fn helix_trace(n: usize) -> Vec<Vec3> {
        (0..n)
            .map(|i| {
                let angle = (i as f32 * 100.0).to_radians();
                Vec3::new(2.3 * angle.cos(), 2.3 * angle.sin(), 1.5 * i as f32)
            })
            .collect()
    }

    #[test]
    fn empty_chain() {
        assert!(detect_secondary_structure(&[]).is_empty());
    }

    #[test]
    fn short_chain_is_coil() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 0.0)];
        let result = detect_secondary_structure(&positions);
        assert_eq!(result, vec![SecondaryStructure::Coil; 3]);
    }

    #[test]
    fn ideal_helix_is_detected() {
        let result = detect_secondary_structure(&helix_trace(12));
        // The last residue has no i+4 partner and sits past the extension.
        assert!(result[..11].iter().all(|&s| s == SecondaryStructure::Helix));
        assert_eq!(result[11], SecondaryStructure::Coil);
    }

    #[test]
    fn extended_strand_is_sheet() {
        // Zig-zag with 3.8Å steps and ~6.8Å i..i+2 spacing.
        let positions: Vec<Vec3> = (0..8)
            .map(|i| {
                let y = if i % 2 == 0 { 0.0 } else { 1.0 };
                Vec3::new(3.4 * i as f32, y, 0.0)
            })
            .collect();
        let result = detect_secondary_structure(&positions);
        assert_eq!(result[0], SecondaryStructure::Sheet);
        assert_eq!(result[5], SecondaryStructure::Sheet);
    }

    #[test]
    fn runs_are_maximal() {
        use SecondaryStructure::{Coil, Helix};
        let codes = [Helix, Helix, Coil, Helix];
        assert_eq!(runs_of(&codes, Helix), vec![0..2, 3..4]);
    }

    #[test]
    fn water_names() {
        assert!(is_water("HOH"));
        assert!(!is_water("HEM"));
    }
}
