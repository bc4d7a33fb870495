//! Fixed-column structure-file parsing.
//!
//! [`StructureParser`] turns structure text into a staging
//! [`MolecularStore`] wrapped in a [`ParsedStructure`]. Nothing is installed
//! into the scene here, so a failed load never leaves partial state behind.
//!
//! Malformed atom records are skipped and collected as [`ParseError`]s; the
//! first one is kept for display. Input ends at the first `END`/`ENDMDL`
//! record, so only the first model is read.

pub(crate) mod records;

use glam::Vec3;

use crate::error::{LoadError, ParseError};
use crate::store::{
    AtomFields, MolecularStore, Name4, ResidueFields, SecondaryStructure,
};

/// A secondary-structure range record (helix or sheet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsRange {
    /// Chain the range applies to.
    pub chain: u8,
    /// First residue number (inclusive).
    pub start: i32,
    /// Last residue number (inclusive).
    pub end: i32,
    /// Code applied over the range.
    pub ss: SecondaryStructure,
}

/// Result of parsing one structure file.
#[derive(Debug, Clone)]
pub struct ParsedStructure {
    /// Caller-supplied structure identifier.
    pub id: String,
    /// Title assembled from title records (may be empty).
    pub title: String,
    /// Staging store holding the parsed atoms and residues.
    pub store: MolecularStore,
    /// Whether helix/sheet records were present.
    pub has_secondary_structure: bool,
    /// Records that were skipped, in input order.
    pub errors: Vec<ParseError>,
}

impl ParsedStructure {
    /// The first recorded parse error, for display.
    #[must_use]
    pub fn first_error(&self) -> Option<&ParseError> {
        self.errors.first()
    }

    /// Whether no atoms were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

/// Key identifying the residue an atom record belongs to.
#[derive(Clone, Copy, PartialEq, Eq)]
struct ResidueKey {
    chain: u8,
    res_num: i32,
    ins_code: u8,
    res_type: Name4,
}

/// Parser for fixed-column structure text.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructureParser;

impl StructureParser {
    /// Parser with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text` into a staging structure tagged `structure_id`.
    ///
    /// # Errors
    ///
    /// Fails only on empty input; malformed records are skipped and listed
    /// in [`ParsedStructure::errors`].
    pub fn parse(
        &self,
        text: &str,
        structure_id: &str,
    ) -> Result<ParsedStructure, LoadError> {
        if text.trim().is_empty() {
            return Err(LoadError::EmptyInput);
        }

        let lines: Vec<&str> = text
            .lines()
            .take_while(|line| {
                !matches!(records::record_name(line), "END" | "ENDMDL")
            })
            .collect();

        let mut parsed = ParsedStructure {
            id: structure_id.to_owned(),
            title: extract_title(&lines),
            store: MolecularStore::new(),
            has_secondary_structure: false,
            errors: Vec::new(),
        };

        let mut ss_ranges = Vec::new();
        let mut current: Option<(ResidueKey, usize)> = None;

        for (i_line, line) in lines.iter().enumerate() {
            match records::record_name(line) {
                "ATOM" | "HETATM" => {
                    if let Err(e) =
                        Self::parse_atom(line, i_line, &mut parsed, &mut current)
                    {
                        parsed.errors.push(e);
                    }
                }
                "HELIX" => {
                    if let Some(range) = parse_helix(line) {
                        ss_ranges.push(range);
                    }
                }
                "SHEET" => {
                    if let Some(range) = parse_sheet(line) {
                        ss_ranges.push(range);
                    }
                }
                _ => {}
            }
        }

        parsed.has_secondary_structure = !ss_ranges.is_empty();
        for range in &ss_ranges {
            apply_ss_range(&mut parsed.store, range);
        }

        if let Some(e) = parsed.first_error() {
            log::warn!(
                "{structure_id}: skipped {} malformed record(s), first at {e}",
                parsed.errors.len()
            );
        }
        log::debug!(
            "{structure_id}: parsed {} atoms in {} residues, {} ss ranges",
            parsed.store.atom_count(),
            parsed.store.residue_count(),
            ss_ranges.len()
        );

        Ok(parsed)
    }

    fn parse_atom(
        line: &str,
        i_line: usize,
        parsed: &mut ParsedStructure,
        current: &mut Option<(ResidueKey, usize)>,
    ) -> Result<(), ParseError> {
        let alt = records::column(line, records::ALT_LOC);
        if !matches!(alt, b' ' | b'A') {
            return Ok(());
        }

        let x = records::float(line, records::X);
        let y = records::float(line, records::Y);
        let z = records::float(line, records::Z);
        let (Some(x), Some(y), Some(z)) = (x, y, z) else {
            return Err(ParseError::new(i_line, "unreadable coordinates"));
        };
        let res_num = records::int(line, records::RES_SEQ).ok_or_else(|| {
            ParseError::new(i_line, "unreadable residue number")
        })?;
        let occupancy = records::float_or(line, records::OCCUPANCY, 1.0)
            .ok_or_else(|| ParseError::new(i_line, "unreadable occupancy"))?;
        let bfactor = records::float_or(line, records::TEMP_FACTOR, 0.0)
            .ok_or_else(|| {
                ParseError::new(i_line, "unreadable temperature factor")
            })?;
        let atom_name = records::field(line, records::ATOM_NAME);
        if atom_name.is_empty() {
            return Err(ParseError::new(i_line, "missing atom name"));
        }

        let is_hetatm = records::record_name(line) == "HETATM";
        let key = ResidueKey {
            chain: records::column(line, records::CHAIN_ID),
            res_num,
            ins_code: records::column(line, records::INS_CODE),
            res_type: Name4::new(records::field(line, records::RES_NAME)),
        };

        let i_res = match *current {
            Some((prev, i_res)) if prev == key => i_res,
            _ => {
                let i_res = parsed.store.add_residue(&ResidueFields {
                    chain: key.chain,
                    res_num: key.res_num,
                    ins_code: key.ins_code,
                    res_type: key.res_type,
                    structure: 0,
                });
                *current = Some((key, i_res));
                i_res
            }
        };

        let fields = AtomFields {
            pos: Vec3::new(x, y, z),
            element: Name4::new(&records::element(line, is_hetatm)),
            atom_name: Name4::new(atom_name),
            alt,
            bfactor,
            occupancy,
            is_hetatm,
            i_res,
        };
        parsed
            .store
            .add_atom(&fields)
            .map(|_| ())
            .map_err(|e| ParseError::new(i_line, e.to_string()))
    }
}

/// Join the text of all title records, collapsing continuation whitespace.
fn extract_title(lines: &[&str]) -> String {
    lines
        .iter()
        .filter(|line| records::record_name(line) == "TITLE")
        .map(|line| records::field(line, records::TITLE_TEXT))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_helix(line: &str) -> Option<SsRange> {
    Some(SsRange {
        chain: records::column(line, records::HELIX_CHAIN),
        start: records::int(line, records::HELIX_START)?,
        end: records::int(line, records::HELIX_END)?,
        ss: SecondaryStructure::Helix,
    })
}

fn parse_sheet(line: &str) -> Option<SsRange> {
    Some(SsRange {
        chain: records::column(line, records::SHEET_CHAIN),
        start: records::int(line, records::SHEET_START)?,
        end: records::int(line, records::SHEET_END)?,
        ss: SecondaryStructure::Sheet,
    })
}

/// Mark `range.ss` on residues of `range.chain`, starting at the residue
/// numbered `range.start` and walking forward in store order while the
/// residue numbers stay within `range.start..=range.end`.
fn apply_ss_range(store: &mut MolecularStore, range: &SsRange) {
    let chain = char::from(range.chain);
    let n_res = store.residue_count();
    let Some(start) = (0..n_res).find(|&i| {
        let res = store.residue_proxy(i);
        res.chain() == chain && res.res_num() == range.start
    }) else {
        return;
    };

    let mut residue = store.residue_proxy_mut(start);
    for i in start..n_res {
        residue.load(i);
        let res = residue.get();
        if res.chain() != chain
            || res.res_num() < range.start
            || res.res_num() > range.end
        {
            break;
        }
        residue.set_ss(range.ss);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build one fixed-column atom record.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn atom_line(
        record: &str,
        serial: usize,
        name: &str,
        res_name: &str,
        chain: char,
        res_num: i32,
        pos: [f32; 3],
        element: &str,
    ) -> String {
        let name = if name.len() < 4 {
            format!(" {name:<3}")
        } else {
            name.to_owned()
        };
        format!(
            "{record:<6}{serial:>5} {name:<4} {res_name:>3} {chain}{res_num:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {element:>2}",
            pos[0], pos[1], pos[2], 1.0, 20.0
        )
    }

    fn two_residues() -> String {
        [
            "TITLE     SMALL TEST PEPTIDE".to_owned(),
            "TITLE    2 WITH TWO RESIDUES".to_owned(),
            "HELIX    1   1 GLY A    1  ALA A    2  1                   2".to_owned(),
            atom_line("ATOM", 1, "N", "GLY", 'A', 1, [0.0, 0.0, 0.0], "N"),
            atom_line("ATOM", 2, "CA", "GLY", 'A', 1, [1.4, 0.0, 0.0], "C"),
            atom_line("ATOM", 3, "C", "GLY", 'A', 1, [2.0, 1.2, 0.0], "C"),
            atom_line("ATOM", 4, "N", "ALA", 'A', 2, [3.3, 1.3, 0.0], "N"),
            atom_line("ATOM", 5, "CA", "ALA", 'A', 2, [4.0, 2.5, 0.0], "C"),
            "END".to_owned(),
            atom_line("ATOM", 6, "CA", "ALA", 'A', 3, [9.0, 9.0, 9.0], "C"),
        ]
        .join("\n")
    }

    #[test]
    fn parses_atoms_until_terminator() {
        let parsed = StructureParser::new().parse(&two_residues(), "t").unwrap();
        assert_eq!(parsed.store.atom_count(), 5);
        assert_eq!(parsed.store.residue_count(), 2);
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.title, "SMALL TEST PEPTIDE 2 WITH TWO RESIDUES");
        let atom = parsed.store.atom_proxy(4);
        assert_eq!(atom.atom_name(), "CA");
        assert_eq!(atom.element(), "C");
        assert_eq!(atom.residue().res_type(), "ALA");
        assert_eq!(atom.bfactor(), 20.0);
    }

    #[test]
    fn helix_records_mark_range() {
        let parsed = StructureParser::new().parse(&two_residues(), "t").unwrap();
        assert!(parsed.has_secondary_structure);
        assert_eq!(
            parsed.store.residue_proxy(0).ss(),
            SecondaryStructure::Helix
        );
        assert_eq!(
            parsed.store.residue_proxy(1).ss(),
            SecondaryStructure::Helix
        );
    }

    #[test]
    fn empty_input_fails() {
        assert_eq!(
            StructureParser::new().parse("  \n", "t").unwrap_err(),
            LoadError::EmptyInput
        );
    }

    #[test]
    fn malformed_records_are_skipped_and_recorded() {
        let mut bad =
            atom_line("ATOM", 2, "CA", "GLY", 'A', 1, [0.0, 0.0, 0.0], "C");
        bad.replace_range(30..38, "  abc.de");
        let text = [
            atom_line("ATOM", 1, "N", "GLY", 'A', 1, [0.0, 0.0, 0.0], "N"),
            bad,
            atom_line("ATOM", 3, "C", "GLY", 'A', 1, [1.0, 0.0, 0.0], "C"),
        ]
        .join("\n");
        let parsed = StructureParser::new().parse(&text, "t").unwrap();
        assert_eq!(parsed.store.atom_count(), 2);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.first_error().unwrap().line, 1);
    }

    #[test]
    fn alternate_locations_keep_first_conformer() {
        let mut a =
            atom_line("ATOM", 1, "CA", "SER", 'A', 1, [0.0, 0.0, 0.0], "C");
        let mut b =
            atom_line("ATOM", 2, "CA", "SER", 'A', 1, [0.5, 0.0, 0.0], "C");
        a.replace_range(16..17, "A");
        b.replace_range(16..17, "B");
        let parsed = StructureParser::new()
            .parse(&[a, b].join("\n"), "t")
            .unwrap();
        assert_eq!(parsed.store.atom_count(), 1);
        assert_eq!(parsed.store.atom_proxy(0).alt(), 'A');
    }

    #[test]
    fn ss_range_stops_at_renumbered_residues() {
        let residue = |serial: usize, res_num: i32, x: f32| {
            let pos = [x, 0.0, 0.0];
            atom_line("ATOM", serial, "CA", "ALA", 'A', res_num, pos, "C")
        };
        let text = [
            "HELIX    1   1 ALA A    5  ALA A    7  1                   3"
                .to_owned(),
            residue(1, 5, 0.0),
            residue(2, 6, 3.8),
            residue(3, 7, 7.6),
            residue(4, 2, 11.4),
            residue(5, 3, 15.2),
        ]
        .join("\n");
        let parsed = StructureParser::new().parse(&text, "t").unwrap();
        let codes: Vec<SecondaryStructure> = (0..5)
            .map(|i| parsed.store.residue_proxy(i).ss())
            .collect();
        assert_eq!(
            codes,
            [
                SecondaryStructure::Helix,
                SecondaryStructure::Helix,
                SecondaryStructure::Helix,
                SecondaryStructure::Unassigned,
                SecondaryStructure::Unassigned,
            ]
        );
    }

    #[test]
    fn reparsing_gives_identical_coordinates() {
        let parser = StructureParser::new();
        let a = parser.parse(&two_residues(), "a").unwrap();
        let b = parser.parse(&two_residues(), "b").unwrap();
        assert_eq!(a.store.positions(), b.store.positions());
    }

    #[test]
    fn missing_element_column_is_inferred() {
        let mut line =
            atom_line("HETATM", 1, "FE", "HEM", 'A', 1, [0.0, 0.0, 0.0], "");
        line.replace_range(12..16, "FE  ");
        line.truncate(66);
        let parsed = StructureParser::new().parse(&line, "t").unwrap();
        assert_eq!(parsed.store.atom_proxy(0).element(), "FE");
    }
}
