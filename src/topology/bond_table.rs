//! Expected intra-residue bonds by residue type.
//!
//! Bonds are pairs of atom names. Amino acids share [`PEPTIDE_BACKBONE`];
//! nucleotides share [`NUCLEOTIDE_BACKBONE`]. Atoms not named in a table
//! (hydrogens, bases, modified groups) fall back to distance cutoffs.

/// Backbone bonds common to every amino acid.
pub(crate) const PEPTIDE_BACKBONE: &[(&str, &str)] = &[
    ("N", "CA"),
    ("CA", "C"),
    ("C", "O"),
    ("C", "OXT"),
    ("CA", "CB"),
];

/// Sugar-phosphate bonds common to every nucleotide.
pub(crate) const NUCLEOTIDE_BACKBONE: &[(&str, &str)] = &[
    ("P", "OP1"),
    ("P", "OP2"),
    ("P", "O5'"),
    ("O5'", "C5'"),
    ("C5'", "C4'"),
    ("C4'", "O4'"),
    ("C4'", "C3'"),
    ("C3'", "O3'"),
    ("C3'", "C2'"),
    ("C2'", "O2'"),
    ("C2'", "C1'"),
    ("C1'", "O4'"),
];

const NO_BONDS: &[(&str, &str)] = &[];

/// Residue-type families with a bond table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResidueFamily {
    AminoAcid,
    Purine,
    Pyrimidine,
}

/// Family of a residue type, `None` for anything without a table.
pub(crate) fn residue_family(res_type: &str) -> Option<ResidueFamily> {
    match res_type {
        "A" | "G" | "DA" | "DG" | "ADE" | "GUA" => Some(ResidueFamily::Purine),
        "C" | "U" | "T" | "DC" | "DT" | "DU" | "CYT" | "URA" | "THY" => {
            Some(ResidueFamily::Pyrimidine)
        }
        _ => sidechain_bonds(res_type).map(|_| ResidueFamily::AminoAcid),
    }
}

/// Every expected bond for a residue type: backbone plus sidechain.
pub(crate) fn residue_bonds(
    res_type: &str,
) -> Option<impl Iterator<Item = &'static (&'static str, &'static str)>> {
    match residue_family(res_type)? {
        ResidueFamily::AminoAcid => {
            let sidechain = sidechain_bonds(res_type).unwrap_or(NO_BONDS);
            Some(PEPTIDE_BACKBONE.iter().chain(sidechain))
        }
        ResidueFamily::Purine | ResidueFamily::Pyrimidine => {
            Some(NUCLEOTIDE_BACKBONE.iter().chain(NO_BONDS))
        }
    }
}

/// Sidechain-internal bond pairs for the standard amino acids plus
/// selenomethionine.
fn sidechain_bonds(
    res_type: &str,
) -> Option<&'static [(&'static str, &'static str)]> {
    match res_type {
        "ALA" | "GLY" => Some(NO_BONDS),
        "ARG" => Some(ARGININE),
        "ASN" => Some(ASPARAGINE),
        "ASP" => Some(ASPARTATE),
        "CYS" => Some(CYSTEINE),
        "GLN" => Some(GLUTAMINE),
        "GLU" => Some(GLUTAMATE),
        "HIS" => Some(HISTIDINE),
        "ILE" => Some(ISOLEUCINE),
        "LEU" => Some(LEUCINE),
        "LYS" => Some(LYSINE),
        "MET" => Some(METHIONINE),
        "MSE" => Some(SELENOMETHIONINE),
        "PHE" => Some(PHENYLALANINE),
        "PRO" => Some(PROLINE),
        "SER" => Some(SERINE),
        "THR" => Some(THREONINE),
        "TRP" => Some(TRYPTOPHAN),
        "TYR" => Some(TYROSINE),
        "VAL" => Some(VALINE),
        _ => None,
    }
}

const VALINE: &[(&str, &str)] = &[("CB", "CG1"), ("CB", "CG2")];

const LEUCINE: &[(&str, &str)] =
    &[("CB", "CG"), ("CG", "CD1"), ("CG", "CD2")];

const ISOLEUCINE: &[(&str, &str)] =
    &[("CB", "CG1"), ("CG1", "CD1"), ("CB", "CG2")];

// Ring closes back onto the backbone nitrogen.
const PROLINE: &[(&str, &str)] = &[("CB", "CG"), ("CG", "CD"), ("CD", "N")];

const SERINE: &[(&str, &str)] = &[("CB", "OG")];

const THREONINE: &[(&str, &str)] = &[("CB", "OG1"), ("CB", "CG2")];

const CYSTEINE: &[(&str, &str)] = &[("CB", "SG")];

const METHIONINE: &[(&str, &str)] =
    &[("CB", "CG"), ("CG", "SD"), ("SD", "CE")];

const SELENOMETHIONINE: &[(&str, &str)] =
    &[("CB", "CG"), ("CG", "SE"), ("SE", "CE")];

const ASPARAGINE: &[(&str, &str)] =
    &[("CB", "CG"), ("CG", "OD1"), ("CG", "ND2")];

const ASPARTATE: &[(&str, &str)] =
    &[("CB", "CG"), ("CG", "OD1"), ("CG", "OD2")];

const GLUTAMINE: &[(&str, &str)] =
    &[("CB", "CG"), ("CG", "CD"), ("CD", "OE1"), ("CD", "NE2")];

const GLUTAMATE: &[(&str, &str)] =
    &[("CB", "CG"), ("CG", "CD"), ("CD", "OE1"), ("CD", "OE2")];

const LYSINE: &[(&str, &str)] =
    &[("CB", "CG"), ("CG", "CD"), ("CD", "CE"), ("CE", "NZ")];

const ARGININE: &[(&str, &str)] = &[
    ("CB", "CG"),
    ("CG", "CD"),
    ("CD", "NE"),
    ("NE", "CZ"),
    ("CZ", "NH1"),
    ("CZ", "NH2"),
];

// Imidazole ring.
const HISTIDINE: &[(&str, &str)] = &[
    ("CB", "CG"),
    ("CG", "ND1"),
    ("ND1", "CE1"),
    ("CE1", "NE2"),
    ("NE2", "CD2"),
    ("CD2", "CG"),
];

const PHENYLALANINE: &[(&str, &str)] = &[
    ("CB", "CG"),
    ("CG", "CD1"),
    ("CD1", "CE1"),
    ("CE1", "CZ"),
    ("CZ", "CE2"),
    ("CE2", "CD2"),
    ("CD2", "CG"),
];

const TYROSINE: &[(&str, &str)] = &[
    ("CB", "CG"),
    ("CG", "CD1"),
    ("CD1", "CE1"),
    ("CE1", "CZ"),
    ("CZ", "OH"),
    ("CZ", "CE2"),
    ("CE2", "CD2"),
    ("CD2", "CG"),
];

// Indole: five-membered ring, then the fused benzene ring.
const TRYPTOPHAN: &[(&str, &str)] = &[
    ("CB", "CG"),
    ("CG", "CD1"),
    ("CD1", "NE1"),
    ("NE1", "CE2"),
    ("CE2", "CD2"),
    ("CD2", "CG"),
    ("CE2", "CZ2"),
    ("CZ2", "CH2"),
    ("CH2", "CZ3"),
    ("CZ3", "CE3"),
    ("CE3", "CD2"),
];
