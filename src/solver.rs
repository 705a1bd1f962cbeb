//! Assembly branch-and-bound search, A* disassembly planning, and path
//! reconstruction -- the two halves of "solve a burr puzzle".
//!
//! `solve` searches the space of slot assignments (§4.5.1); for every
//! candidate assembly it finds, it runs [`disassemble`] (§4.5.2), an A*
//! search over [`PuzzleState`]s, and returns the first candidate that has a
//! disassembly. `h = score()` is not strictly admissible (spec §9), so the
//! returned disassembly is low-cost but not guaranteed optimal.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use rustc_hash::FxHashMap;

use crate::error::SolveError;
use crate::moves::valid_moves;
use crate::puzzle::{Move, Piece, Puzzle, PuzzleState};
use crate::shape::{order_by_orientations, order_by_size, SLOTS};

/// A cooperative cancellation signal, checked between search expansions.
pub trait Cancellation: Send + Sync {
    fn is_cancelled(&self) -> bool;
}

/// The default "never cancel" token.
pub struct NeverCancel;

impl Cancellation for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// A token a watchdog thread (or a `--timeout` CLI flag) can flip to abort
/// an in-progress solve.
#[derive(Clone, Default)]
pub struct AtomicCancel(pub Arc<AtomicBool>);

impl AtomicCancel {
    pub fn new() -> Self {
        AtomicCancel(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

impl Cancellation for AtomicCancel {
    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One step of a reconstructed disassembly: the state at that point, and
/// the move that produced it (`None` for the starting, fully-assembled
/// state).
pub type DisassemblyStep = (PuzzleState, Option<Move>);

fn reconstruct_path(
    came_from: &FxHashMap<Vec<Piece>, (PuzzleState, Move)>,
    goal: PuzzleState,
) -> Vec<DisassemblyStep> {
    let mut path = vec![(goal.clone(), None)];
    let mut current_key = goal.canonical_key();

    while let Some((predecessor, mv)) = came_from.get(&current_key) {
        current_key = predecessor.canonical_key();
        path.push((predecessor.clone(), Some(mv.clone())));
    }

    path.reverse();
    path
}

/// A* search for a sequence of moves that empties `puzzle`'s current
/// state. Returns `None` if the open set empties without reaching the
/// empty state, or if `cancel` fires first.
pub(crate) fn disassemble(
    puzzle: &Puzzle,
    cancel: &dyn Cancellation,
) -> Option<Vec<DisassemblyStep>> {
    let start = puzzle.state.clone();
    let start_key = start.canonical_key();

    let mut came_from: FxHashMap<Vec<Piece>, (PuzzleState, Move)> = FxHashMap::default();
    let mut g_score: FxHashMap<Vec<Piece>, u32> = FxHashMap::default();
    g_score.insert(start_key.clone(), 0);

    let mut counter: u64 = 0;
    let mut open_set: BinaryHeap<Reverse<(usize, u64, Vec<Piece>)>> = BinaryHeap::new();
    open_set.push(Reverse((puzzle.score(), counter, start_key.clone())));

    let mut states: FxHashMap<Vec<Piece>, PuzzleState> = FxHashMap::default();
    states.insert(start_key, start);

    while let Some(Reverse((_, _, current_key))) = open_set.pop() {
        if cancel.is_cancelled() {
            return None;
        }

        let Some(current_state) = states.get(&current_key).cloned() else {
            continue;
        };

        if current_state.pieces.is_empty() {
            return Some(reconstruct_path(&came_from, current_state));
        }

        let current_g = *g_score.get(&current_key).unwrap_or(&u32::MAX);
        let candidate = puzzle.with_state(current_state.clone());
        for (mv, neighbor) in valid_moves(&candidate) {
            let neighbor_key = neighbor.canonical_key();
            let tentative_g = current_g + 1;
            let best_known = *g_score.get(&neighbor_key).unwrap_or(&u32::MAX);
            if tentative_g < best_known {
                came_from.insert(neighbor_key.clone(), (current_state.clone(), mv));
                g_score.insert(neighbor_key.clone(), tentative_g);
                let neighbor_puzzle = puzzle.with_state(neighbor.clone());
                let f = tentative_g as usize + neighbor_puzzle.score();
                counter += 1;
                states.insert(neighbor_key.clone(), neighbor);
                open_set.push(Reverse((f, counter, neighbor_key)));
            }
        }
    }

    None
}

/// One entry in the assembly search frontier: fewer remaining shapes sorts
/// first (closer to a complete assembly).
struct FrontierEntry {
    remaining_count: usize,
    state: PuzzleState,
    remaining_shapes: Vec<usize>,
    remaining_slots: Vec<&'static str>,
    counter: u64,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.remaining_count == other.remaining_count && self.counter == other.counter
    }
}
impl Eq for FrontierEntry {}
impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.remaining_count, self.counter).cmp(&(other.remaining_count, other.counter))
    }
}

/// Every non-flipped `VoxelState` of the largest shape at slot A: the
/// independent root tasks the assembly search (and the optional parallel
/// search) fans out from.
fn root_tasks(
    puzzle: &Puzzle,
) -> (usize, Vec<(Piece, rustc_hash::FxHashSet<crate::voxel::Voxel>)>) {
    let first = order_by_size(&puzzle.shapes)[0];
    let roots: Vec<_> = puzzle
        .pieces_at(first, "A")
        .into_iter()
        .filter(|(piece, _)| piece.orientation < 4)
        .collect();
    (first, roots)
}

/// Runs the assembly search starting from a single root task (one
/// non-flipped placement of the largest shape at slot A), returning the
/// first disassemblable assembly found, if any.
fn solve_from_root(
    puzzle: &Puzzle,
    first: usize,
    root_piece: Piece,
    root_voxels: rustc_hash::FxHashSet<crate::voxel::Voxel>,
    cancel: &dyn Cancellation,
) -> Option<Vec<DisassemblyStep>> {
    let remaining_shapes: Vec<usize> = order_by_orientations(&puzzle.shapes)
        .into_iter()
        .filter(|&s| s != first)
        .collect();
    let remaining_slots: Vec<&'static str> =
        SLOTS.iter().filter(|&&s| s != "A").copied().collect();

    let mut counter: u64 = 0;
    let mut frontier: BinaryHeap<Reverse<FrontierEntry>> = BinaryHeap::new();
    frontier.push(Reverse(FrontierEntry {
        remaining_count: remaining_shapes.len(),
        state: PuzzleState::with_piece(root_piece, root_voxels),
        remaining_shapes,
        remaining_slots,
        counter,
    }));

    while let Some(Reverse(entry)) = frontier.pop() {
        if cancel.is_cancelled() {
            return None;
        }

        if entry.remaining_shapes.is_empty() {
            let candidate = puzzle.with_state(entry.state);
            if let Some(path) = disassemble(&candidate, cancel) {
                return Some(path);
            }
            continue;
        }

        for &s in &entry.remaining_shapes {
            for &label in &entry.remaining_slots {
                for (new_piece, new_voxels) in puzzle.pieces_at(s, label) {
                    if entry.state.voxels.is_disjoint(&new_voxels) {
                        let new_state = entry.state.add(new_piece, &new_voxels);
                        let new_shapes: Vec<usize> = entry
                            .remaining_shapes
                            .iter()
                            .copied()
                            .filter(|&x| x != s)
                            .collect();
                        let new_slots: Vec<&'static str> = entry
                            .remaining_slots
                            .iter()
                            .copied()
                            .filter(|&x| x != label)
                            .collect();
                        counter += 1;
                        frontier.push(Reverse(FrontierEntry {
                            remaining_count: new_shapes.len(),
                            state: new_state,
                            remaining_shapes: new_shapes,
                            remaining_slots: new_slots,
                            counter,
                        }));
                    }
                }
            }
        }
    }

    None
}

/// Disassembles a specific, already-known assembly (spec §6 "known
/// assembly" input), skipping the assembly search entirely. Useful for
/// verifying a hand-authored or catalog-sourced assembly string.
pub fn disassemble_known(
    puzzle: &Puzzle,
    cancel: &dyn Cancellation,
) -> Result<Vec<DisassemblyStep>, SolveError> {
    disassemble(puzzle, cancel).ok_or_else(|| {
        if cancel.is_cancelled() {
            SolveError::Cancelled
        } else {
            SolveError::NoAssembly
        }
    })
}

/// Searches for an assembly of the six shapes that also has a
/// disassembly, and returns the disassembly sequence. Single-threaded;
/// see [`solve_parallel`] for the multi-root variant.
pub fn solve(
    puzzle: &Puzzle,
    cancel: &dyn Cancellation,
) -> Result<Vec<DisassemblyStep>, SolveError> {
    let (first, roots) = root_tasks(puzzle);

    for (root_piece, root_voxels) in roots {
        if cancel.is_cancelled() {
            return Err(SolveError::Cancelled);
        }
        if let Some(path) = solve_from_root(puzzle, first, root_piece, root_voxels, cancel) {
            return Ok(path);
        }
    }

    if cancel.is_cancelled() {
        Err(SolveError::Cancelled)
    } else {
        Err(SolveError::NoAssembly)
    }
}

/// Options for the parallel assembly search.
pub struct SolveOptions {
    pub workers: usize,
}

impl Default for SolveOptions {
    fn default() -> Self {
        SolveOptions {
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

/// Runs the assembly search with one thread per worker, each taking a
/// disjoint slice of root tasks (spec §5). The first worker to find a
/// disassemblable assembly publishes it to a write-once slot; the other
/// workers observe it on their next root and stop.
pub fn solve_parallel(
    puzzle: &Puzzle,
    options: &SolveOptions,
    cancel: &AtomicCancel,
) -> Result<Vec<DisassemblyStep>, SolveError> {
    let (first, roots) = root_tasks(puzzle);
    if roots.is_empty() {
        return Err(SolveError::NoAssembly);
    }

    let solution: OnceLock<Vec<DisassemblyStep>> = OnceLock::new();
    let num_workers = options.workers.max(1).min(roots.len());

    std::thread::scope(|scope| {
        for worker in 0..num_workers {
            let puzzle = &*puzzle;
            let roots = &roots;
            let solution = &solution;
            let cancel = cancel.clone();
            scope.spawn(move || {
                let mut i = worker;
                while i < roots.len() {
                    if solution.get().is_some() || cancel.is_cancelled() {
                        return;
                    }
                    let (piece, voxels) = roots[i].clone();
                    if let Some(path) = solve_from_root(puzzle, first, piece, voxels, &cancel) {
                        let _ = solution.set(path);
                        return;
                    }
                    i += num_workers;
                }
            });
        }
    });

    match solution.into_inner() {
        Some(path) => Ok(path),
        None if cancel.is_cancelled() => Err(SolveError::Cancelled),
        None => Err(SolveError::NoAssembly),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOLID: &str = "xxxxxx/xxxxxx/....../......";

    fn solid_puzzle() -> Puzzle {
        let lines = vec![SOLID; 6];
        Puzzle::from_text(&lines).unwrap()
    }

    #[test]
    fn solid_burr_solves_and_fully_disassembles() {
        let puzzle = solid_puzzle();
        assert_eq!(puzzle.level(), 33);

        let path = solve(&puzzle, &NeverCancel).expect("solid burr must be solvable");
        assert!(path.last().unwrap().0.pieces.is_empty());
        assert!(path.first().unwrap().0.pieces.len() == 6);
    }

    #[test]
    fn disassembly_g_score_increases_by_one_each_step() {
        let puzzle = solid_puzzle();
        let path = solve(&puzzle, &NeverCancel).unwrap();
        for (i, (_, mv)) in path.iter().enumerate() {
            if i == 0 {
                assert!(mv.is_none());
            } else {
                assert!(mv.is_some());
            }
        }
    }

    #[test]
    fn symmetry_culling_never_seeds_flipped_root() {
        let puzzle = solid_puzzle();
        let (_, roots) = root_tasks(&puzzle);
        assert!(roots.iter().all(|(p, _)| p.orientation < 4));
    }

    #[test]
    fn repeated_solves_are_deterministic() {
        let puzzle = solid_puzzle();
        let first = solve(&puzzle, &NeverCancel).unwrap();
        let second = solve(&puzzle, &NeverCancel).unwrap();
        let first_text: Vec<String> = first.iter().map(|(s, _)| s.to_assembly_text()).collect();
        let second_text: Vec<String> = second.iter().map(|(s, _)| s.to_assembly_text()).collect();
        assert_eq!(first_text, second_text);
    }

    #[test]
    fn cancellation_before_start_aborts_immediately() {
        let puzzle = solid_puzzle();
        let cancel = AtomicCancel::new();
        cancel.cancel();
        let result = solve(&puzzle, &cancel);
        assert_eq!(result.unwrap_err(), SolveError::Cancelled);
    }

    #[test]
    fn unsolvable_puzzle_reports_no_assembly() {
        // A shape with a single voxel can never cover any slot's 8
        // required voxels, so no orientation is ever legal for it.
        let tiny = "x...../....../....../......";
        let lines = vec![tiny; 6];
        let puzzle = Puzzle::from_text(&lines).unwrap();
        let result = solve(&puzzle, &NeverCancel);
        assert_eq!(result.unwrap_err(), SolveError::NoAssembly);
    }

    #[test]
    fn round_trip_known_assembly_through_disassemble() {
        let puzzle = solid_puzzle();
        let solved = solve(&puzzle, &NeverCancel).unwrap();
        let assembly_text = solved.first().unwrap().0.to_assembly_text();

        let state = puzzle.load_assembly(&assembly_text).unwrap();
        let candidate = puzzle.with_state(state);
        let path =
            disassemble(&candidate, &NeverCancel).expect("known assembly must disassemble");
        assert_eq!(path.first().unwrap().0.to_assembly_text(), assembly_text);
    }

    #[test]
    fn parallel_solve_matches_sequential_solve_length() {
        let puzzle = solid_puzzle();
        let sequential = solve(&puzzle, &NeverCancel).unwrap();
        let cancel = AtomicCancel::new();
        let parallel = solve_parallel(&puzzle, &SolveOptions { workers: 2 }, &cancel).unwrap();
        assert_eq!(sequential.len(), parallel.len());
    }
}
