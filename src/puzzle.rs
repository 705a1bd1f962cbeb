//! Puzzle state: the six shapes, the pieces currently placed, and the
//! union of voxels those pieces occupy.

use rustc_hash::FxHashSet;

use crate::error::ParseError;
use crate::shape::Shape;
use crate::voxel::{place, Direction, Orientation, Position, Voxel};

/// One occupied slot instance: which shape, at what position, in what
/// orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Piece {
    pub shape: usize,
    pub position: Position,
    pub orientation: Orientation,
}

impl Piece {
    pub fn new(shape: usize, position: Position, orientation: Orientation) -> Self {
        Piece {
            shape,
            position,
            orientation,
        }
    }

    /// Returns this piece translated by `steps` along `d`.
    pub fn translated(self, d: Direction, steps: i32) -> Self {
        Piece {
            position: self.position.translate(d, steps),
            ..self
        }
    }

    /// Renders this piece using the `SIO` assembly-token convention
    /// (`A1a`, `B2c`, ...) when it sits at one of the six named slots, or
    /// `(x,y,z,axis)SO` otherwise (a piece mid-disassembly).
    pub fn to_token(self) -> String {
        let letter = (b'a' + self.orientation) as char;
        for (label, pos) in crate::voxel::PLACES {
            if pos == self.position {
                return format!("{label}{}{letter}", self.shape + 1);
            }
        }
        format!(
            "({},{},{},{:?}){}{letter}",
            self.position.x,
            self.position.y,
            self.position.z,
            self.position.axis,
            self.shape + 1
        )
    }
}

/// A translation applied to a subset of pieces: move `pieces` by `steps`
/// units along `direction`. `steps > 1` marks a "removal" move -- the
/// subset leaves the frame entirely in one hop.
#[derive(Debug, Clone)]
pub struct Move {
    pub pieces: Vec<Piece>,
    pub direction: Direction,
    pub steps: i32,
}

/// The state of the puzzle: an ordered list of placed pieces, plus the
/// union of voxels they occupy. Equality and hashing for search purposes
/// use [`canonical_key`], not this struct's own derived traits, because
/// identity must be insertion-order independent (spec §9).
#[derive(Debug, Clone)]
pub struct PuzzleState {
    pub pieces: Vec<Piece>,
    pub voxels: FxHashSet<Voxel>,
}

impl PuzzleState {
    pub fn empty() -> Self {
        PuzzleState {
            pieces: Vec::new(),
            voxels: FxHashSet::default(),
        }
    }

    pub fn with_piece(piece: Piece, voxels: FxHashSet<Voxel>) -> Self {
        PuzzleState {
            pieces: vec![piece],
            voxels,
        }
    }

    /// Returns a new state with `piece` added, its voxels unioned in.
    pub fn add(&self, piece: Piece, voxels: &FxHashSet<Voxel>) -> Self {
        let mut pieces = self.pieces.clone();
        pieces.push(piece);
        let mut all_voxels = self.voxels.clone();
        all_voxels.extend(voxels.iter().copied());
        PuzzleState {
            pieces,
            voxels: all_voxels,
        }
    }

    /// A canonical, insertion-order-independent identity for this state:
    /// pieces sorted by `(shape, position, orientation)`. Used as the key
    /// for `came_from`/`g_score` maps in A* and for assembly-search
    /// deduplication.
    pub fn canonical_key(&self) -> Vec<Piece> {
        let mut sorted = self.pieces.clone();
        sorted.sort();
        sorted
    }

    pub fn to_assembly_text(&self) -> String {
        let mut sorted = self.pieces.clone();
        sorted.sort();
        sorted
            .into_iter()
            .map(Piece::to_token)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A six-piece burr puzzle: its shapes, plus the currently placed pieces.
#[derive(Debug, Clone)]
pub struct Puzzle {
    pub shapes: Vec<Shape>,
    pub state: PuzzleState,
}

impl Puzzle {
    /// Parses six shape texts into a `Puzzle` with an empty state.
    pub fn from_text(lines: &[impl AsRef<str>]) -> Result<Self, ParseError> {
        let shapes = lines
            .iter()
            .map(|l| Shape::from_text(l.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Puzzle {
            shapes,
            state: PuzzleState::empty(),
        })
    }

    /// Returns a puzzle sharing this one's shapes but with `state` as its
    /// current state.
    pub fn with_state(&self, state: PuzzleState) -> Self {
        Puzzle {
            shapes: self.shapes.clone(),
            state,
        }
    }

    /// Every valid `(Piece, voxel set)` pair for shape `s` at slot `label`.
    pub fn pieces_at(&self, s: usize, label: &str) -> Vec<(Piece, FxHashSet<Voxel>)> {
        let position = place(label);
        self.shapes[s]
            .orientations_at(label)
            .iter()
            .map(|vs| {
                (
                    Piece::new(s, position, vs.orientation),
                    vs.voxels.clone(),
                )
            })
            .collect()
    }

    /// The aligned voxel set a piece occupies, computed from its shape's
    /// canonical voxels at the piece's own position and orientation. Used
    /// for pieces that are not sitting at one of the six named slots
    /// (mid-disassembly).
    pub fn voxels_for(&self, piece: Piece) -> FxHashSet<Voxel> {
        self.shapes[piece.shape]
            .voxels
            .iter()
            .map(|v| v.move_to(piece.position, piece.orientation))
            .collect()
    }

    /// True iff `piece`'s voxels don't overlap anything already placed.
    pub fn can_place(&self, piece: Piece) -> bool {
        self.state.voxels.is_disjoint(&self.voxels_for(piece))
    }

    /// Number of voxels in the current state that lie inside the frame.
    /// The A* admissible-ish heuristic (spec §4.3): it strictly decreases
    /// to 0 as pieces leave the puzzle.
    pub fn score(&self) -> usize {
        self.state.voxels.iter().filter(|v| v.is_inside()).count()
    }

    /// `105 - (total voxels across all six shapes)`.
    pub fn level(&self) -> i64 {
        let total: usize = self.shapes.iter().map(Shape::voxel_count).sum();
        105 - total as i64
    }

    /// Parses an assembly text (`"A1a B2c C3b D4a E5c F6a"`) into a
    /// `PuzzleState` for this puzzle's shapes.
    pub fn load_assembly(&self, text: &str) -> Result<PuzzleState, ParseError> {
        let mut pieces = Vec::new();
        let mut voxels = FxHashSet::default();

        for token in text.split_whitespace() {
            let chars: Vec<char> = token.chars().collect();
            if chars.len() < 3 {
                return Err(ParseError::InvalidAssemblyText(token.to_string()));
            }
            let label = chars[0].to_string();
            let position = crate::voxel::PLACES
                .iter()
                .find(|(l, _)| *l == label)
                .map(|(_, p)| *p)
                .ok_or_else(|| ParseError::InvalidAssemblyText(token.to_string()))?;

            let shape_digit = chars[1];
            if !shape_digit.is_ascii_digit() {
                return Err(ParseError::InvalidAssemblyText(token.to_string()));
            }
            let shape_index = shape_digit.to_digit(10).unwrap() as usize;
            if shape_index == 0 || shape_index > 6 {
                return Err(ParseError::InvalidAssemblyText(token.to_string()));
            }
            let shape_index = shape_index - 1;

            let orientation_char = chars[2];
            if !('a'..='h').contains(&orientation_char) {
                return Err(ParseError::InvalidAssemblyText(token.to_string()));
            }
            let orientation = orientation_char as u8 - b'a';

            let piece = Piece::new(shape_index, position, orientation);
            voxels.extend(self.voxels_for(piece));
            pieces.push(piece);
        }

        Ok(PuzzleState { pieces, voxels })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 12 voxels (two full rows, two empty): the maximal unnotched burr
    // piece. A fully-solid 2x2x6 block (24 voxels) is too big to occupy a
    // slot without overlapping its cross-axis neighbors.
    const SOLID: &str = "xxxxxx/xxxxxx/....../......";

    fn solid_puzzle() -> Puzzle {
        let lines = vec![SOLID; 6];
        Puzzle::from_text(&lines).unwrap()
    }

    #[test]
    fn level_of_solid_burr_matches_voxel_count_formula() {
        let puzzle = solid_puzzle();
        // 105 - Sigma|shape.voxels| (spec I3); six 12-voxel shapes give 33,
        // not the "level 1" of a fully-packed frame -- level 1 would need
        // the six shapes' voxel counts to sum to 104, which no combination
        // of uniform 12-voxel shapes can reach.
        assert_eq!(puzzle.level(), 33);
    }

    #[test]
    fn can_place_rejects_overlap() {
        let puzzle = solid_puzzle();
        let (piece_a, voxels_a) = puzzle.pieces_at(0, "A").into_iter().next().unwrap();
        let state = PuzzleState::with_piece(piece_a, voxels_a);
        let puzzle = puzzle.with_state(state);

        // Placing shape 0 at slot A again should always collide with itself.
        let (piece_a_again, _) = puzzle.pieces_at(0, "A").into_iter().next().unwrap();
        assert!(!puzzle.can_place(piece_a_again));
    }

    #[test]
    fn can_place_allows_every_cross_axis_slot_for_solid_burr() {
        let puzzle = solid_puzzle();
        let (piece_a, voxels_a) = puzzle.pieces_at(0, "A").into_iter().next().unwrap();
        let state = PuzzleState::with_piece(piece_a, voxels_a);
        let puzzle = puzzle.with_state(state);

        for &slot in &["B", "C", "D", "E", "F"] {
            let (piece, _) = puzzle.pieces_at(1, slot).into_iter().next().unwrap();
            assert!(
                puzzle.can_place(piece),
                "slot {slot} unexpectedly overlaps slot A for the solid burr piece"
            );
        }
    }

    #[test]
    fn canonical_key_is_insertion_order_independent() {
        let puzzle = solid_puzzle();
        let (piece_a, voxels_a) = puzzle.pieces_at(0, "A").into_iter().next().unwrap();
        let (piece_b, voxels_b) = puzzle.pieces_at(1, "B").into_iter().next().unwrap();

        let forward = PuzzleState::with_piece(piece_a, voxels_a.clone()).add(piece_b, &voxels_b);
        let backward = PuzzleState::with_piece(piece_b, voxels_b).add(piece_a, &voxels_a);

        assert_eq!(forward.canonical_key(), backward.canonical_key());
    }

    #[test]
    fn load_assembly_round_trips_through_to_assembly_text() {
        let puzzle = solid_puzzle();
        let text = "A1a B2a C3a D4a E5a F6a";
        let state = puzzle.load_assembly(text).unwrap();
        assert_eq!(state.to_assembly_text(), text);
    }

    #[test]
    fn load_assembly_rejects_bad_slot() {
        let puzzle = solid_puzzle();
        assert!(puzzle.load_assembly("Z1a").is_err());
    }

    #[test]
    fn load_assembly_rejects_bad_orientation() {
        let puzzle = solid_puzzle();
        assert!(puzzle.load_assembly("A1z").is_err());
    }
}
