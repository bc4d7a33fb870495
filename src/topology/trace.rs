//! Chain and piece segmentation of the polymer backbone.

use std::ops::Range;

use glam::Vec3;

use super::bonds::linkage;
use super::frames::{compute_frames, Frames};
use crate::options::TopologyOptions;
use crate::store::{MolecularStore, SecondaryStructure};

/// A maximal run of one secondary-structure code within a [`Trace`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// Secondary-structure code shared by the run.
    pub ss: SecondaryStructure,
    /// Point range within the owning trace.
    pub points: Range<usize>,
}

/// A contiguous backbone path through linked polymer residues of one chain.
///
/// All per-point arrays are parallel and hold at least two entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    /// Chain identifier.
    pub chain: char,
    /// Owning structure index.
    pub structure: usize,
    /// Backbone point (representative atom) per residue.
    pub points: Vec<Vec3>,
    /// Residue index per point.
    pub residues: Vec<usize>,
    /// Secondary-structure code per point.
    pub ss: Vec<SecondaryStructure>,
    /// Unit tangents.
    pub tangents: Vec<Vec3>,
    /// Unit normals.
    pub normals: Vec<Vec3>,
    /// Unit binormals.
    pub binormals: Vec<Vec3>,
    /// Secondary-structure pieces, covering every point in order.
    pub pieces: Vec<Piece>,
}

impl Trace {
    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the trace has no points (never true for built traces).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether residue `i_res` lies on this trace.
    #[must_use]
    pub fn contains_residue(&self, i_res: usize) -> bool {
        self.residues.binary_search(&i_res).is_ok()
    }

    fn build(store: &MolecularStore, residues: Vec<usize>) -> Self {
        let first = store.residue_proxy(residues[0]);
        let (chain, structure) = (first.chain(), first.structure());

        let mut points = Vec::with_capacity(residues.len());
        let mut ss = Vec::with_capacity(residues.len());
        let mut explicit_normals = Vec::with_capacity(residues.len());
        let mut residue = first;
        for &i_res in &residues {
            residue.load(i_res);
            points.push(residue.central_pos());
            ss.push(residue.ss());
            explicit_normals.push(residue.normal());
        }

        let is_duplex: Vec<bool> = ss
            .iter()
            .map(|&code| code == SecondaryStructure::Duplex)
            .collect();
        let Frames {
            tangents,
            normals,
            binormals,
        } = compute_frames(&points, &explicit_normals, &is_duplex);
        let pieces = split_pieces(&ss);

        Self {
            chain,
            structure,
            points,
            residues,
            ss,
            tangents,
            normals,
            binormals,
            pieces,
        }
    }
}

/// Segment `residues` into traces.
///
/// A residue joins a trace if it is polymer or linked to an immediate
/// neighbour. Consecutive included residues stay in one trace while the
/// pair is linked; a break closes the trace, and runs shorter than two
/// points are dropped.
pub(crate) fn segment_traces(
    store: &MolecularStore,
    residues: Range<usize>,
    options: &TopologyOptions,
) -> Vec<Trace> {
    let links: Vec<bool> = residues
        .clone()
        .map(|i| {
            i + 1 < residues.end && linkage(store, i, i + 1, options).is_some()
        })
        .collect();
    let offset = residues.start;
    let linked_to_next = |i: usize| links[i - offset];
    let is_included = |i: usize| {
        store.residue_proxy(i).is_polymer()
            || linked_to_next(i)
            || (i > offset && linked_to_next(i - 1))
    };

    let mut traces = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    for i in residues.clone() {
        if !is_included(i) {
            continue;
        }
        current.push(i);
        let is_break = i + 1 >= residues.end
            || !is_included(i + 1)
            || !linked_to_next(i);
        if is_break {
            let chain = std::mem::take(&mut current);
            if chain.len() >= 2 {
                traces.push(Trace::build(store, chain));
            }
        }
    }
    traces
}

/// Split per-point codes into maximal equal-code pieces.
fn split_pieces(ss: &[SecondaryStructure]) -> Vec<Piece> {
    let mut pieces: Vec<Piece> = Vec::new();
    for (i, &code) in ss.iter().enumerate() {
        match pieces.last_mut() {
            Some(piece) if piece.ss == code => piece.points.end = i + 1,
            _ => pieces.push(Piece {
                ss: code,
                points: i..i + 1,
            }),
        }
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pieces_split_on_code_change() {
        use SecondaryStructure::{Coil, Helix, Sheet};
        let pieces = split_pieces(&[Coil, Helix, Helix, Helix, Sheet, Sheet]);
        let spans: Vec<_> =
            pieces.iter().map(|p| (p.ss, p.points.clone())).collect();
        assert_eq!(
            spans,
            vec![(Coil, 0..1), (Helix, 1..4), (Sheet, 4..6)]
        );
    }

    #[test]
    fn empty_codes_give_no_pieces() {
        assert!(split_pieces(&[]).is_empty());
    }
}
