//! Typed errors for the burr puzzle core.
//!
//! Parsing and solving fail in genuinely different ways, so they get two
//! narrow enums rather than one catch-all: a caller handing `Shape::from_text`
//! malformed text should never have to match on `NoAssembly`, and a caller
//! of `solve` should never have to match on `InvalidShape`.

use thiserror::Error;

/// Failures from parsing shape text or assembly text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("shape text must have exactly 4 rows of 6 characters, got {0:?}")]
    InvalidShape(String),

    #[error("orientation value {0} is outside the valid range 0..=7")]
    InvalidOrientation(u8),

    #[error("axis character {0:?} is not one of 'X', 'Y', 'Z'")]
    InvalidAxis(char),

    #[error("assembly token {0:?} is malformed")]
    InvalidAssemblyText(String),
}

/// Terminal, non-success outcomes from [`crate::solver::solve`].
///
/// `NoDisassembly` (spec §7) never appears here: it is the internal signal
/// that one assembly candidate has no disassembly, and the assembly search
/// swallows it and keeps looking for a different candidate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolveError {
    #[error("no disassemblable assembly found after exhausting the search")]
    NoAssembly,

    #[error("solve was cancelled before completing")]
    Cancelled,
}
