//! Six-piece burr puzzle solver core.
//!
//! Given six polycube shapes (each a subset of a 2x2x6 bounding box), this
//! crate finds an assembly of the shapes into the canonical cross-shaped
//! frame, and a shortest (by move count, not travel distance) sequence of
//! axis-aligned translations that disassembles it.
//!
//! The pipeline: shape text parses into a [`shape::Shape`] with a
//! precomputed per-slot orientation table; six shapes make a
//! [`puzzle::Puzzle`]; [`solver::solve`] searches slot assignments and,
//! for each complete assembly, runs an A* search over
//! [`puzzle::PuzzleState`]s via the [`moves`] generator until it finds one
//! that fully disassembles.
//!
//! JSON puzzle-catalog loading and STL/3D-scene rendering are explicitly
//! out of scope -- this crate consumes shape text and returns a move
//! sequence; see `src/main.rs` for a minimal text-based demonstration
//! harness.

pub mod error;
pub mod moves;
pub mod puzzle;
pub mod shape;
pub mod solver;
pub mod voxel;

pub use error::{ParseError, SolveError};
pub use puzzle::{Move, Piece, Puzzle, PuzzleState};
pub use shape::Shape;
pub use solver::{
    disassemble_known, solve, solve_parallel, AtomicCancel, Cancellation, NeverCancel,
    SolveOptions,
};
