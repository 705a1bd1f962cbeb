//! Move generator: enumerates subsets of pieces that may translate
//! together in a given direction, including detection of moves that carry
//! the subset entirely out of the frame ("removal" moves).

use rustc_hash::FxHashSet;

use crate::puzzle::{Move, Piece, Puzzle, PuzzleState};
use crate::voxel::{Direction, Voxel};

/// Every combination of `size` indices from `0..n`, in lexicographic order.
fn combinations(n: usize, size: usize) -> Vec<Vec<usize>> {
    if size == 0 || size > n {
        return Vec::new();
    }

    let mut result = Vec::new();
    let mut indices: Vec<usize> = (0..size).collect();
    loop {
        result.push(indices.clone());

        // find the rightmost index that can still be advanced
        let mut i = size;
        let advance = loop {
            if i == 0 {
                break None;
            }
            i -= 1;
            if indices[i] != i + n - size {
                break Some(i);
            }
        };

        match advance {
            None => break,
            Some(i) => {
                indices[i] += 1;
                for j in (i + 1)..size {
                    indices[j] = indices[j - 1] + 1;
                }
            }
        }
    }
    result
}

/// Every subset of `pieces` with between 1 and `max_size` members,
/// inclusive, in a fixed deterministic order (ascending by the indices of
/// the pieces it contains).
fn subsets(pieces: &[Piece], max_size: usize) -> Vec<Vec<Piece>> {
    let n = pieces.len();
    let mut result = Vec::new();
    for size in 1..=max_size.min(n) {
        for combo in combinations(n, size) {
            result.push(combo.into_iter().map(|i| pieces[i]).collect());
        }
    }
    result
}

/// Returns the subset sizes considered for a state with `placed` pieces
/// out of `total` shapes in the puzzle (spec §4.4 step 1).
fn allowed_sizes(placed: usize, total: usize) -> usize {
    if placed > total / 2 {
        placed / 2
    } else {
        1
    }
}

/// Enumerates every `(Move, resulting PuzzleState)` pair reachable from
/// `puzzle`'s current state in one step.
pub fn valid_moves(puzzle: &Puzzle) -> Vec<(Move, PuzzleState)> {
    let state = &puzzle.state;
    let max_size = allowed_sizes(state.pieces.len(), puzzle.shapes.len());

    let mut results = Vec::new();
    for subset in subsets(&state.pieces, max_size) {
        let subset_voxels: FxHashSet<Voxel> = subset
            .iter()
            .flat_map(|&p| puzzle.voxels_for(p))
            .collect();

        let other_voxels: FxHashSet<Voxel> = state
            .pieces
            .iter()
            .filter(|p| !subset.contains(p))
            .flat_map(|&p| puzzle.voxels_for(p))
            .collect();

        for d in Direction::ALL {
            let mut steps = 0i32;
            let mut is_outside = false;
            loop {
                let moved: FxHashSet<Voxel> =
                    subset_voxels.iter().map(|v| v.shift(d, steps + 1)).collect();
                if !moved.is_disjoint(&other_voxels) {
                    break;
                }

                steps += 1;
                if !moved.iter().any(|v| v.is_inside()) {
                    is_outside = true;
                    break;
                }
            }

            if steps > 0 {
                let final_steps = if is_outside { steps } else { 1 };
                let result_state = apply_move(puzzle, &subset, d, final_steps);
                let mv = Move {
                    pieces: subset.clone(),
                    direction: d,
                    steps: final_steps,
                };
                results.push((mv, result_state));
            }
        }
    }

    results
}

/// Translates every piece in `subset` by `steps` along `d`; any piece whose
/// translated voxel set has no voxel left inside the frame is dropped from
/// the resulting state (it has been removed from the puzzle).
pub fn apply_move(puzzle: &Puzzle, subset: &[Piece], d: Direction, steps: i32) -> PuzzleState {
    let mut pieces = Vec::with_capacity(puzzle.state.pieces.len());
    let mut voxels = FxHashSet::default();

    for &piece in &puzzle.state.pieces {
        if subset.contains(&piece) {
            let moved_piece = piece.translated(d, steps);
            let moved_voxels = puzzle.voxels_for(moved_piece);
            if moved_voxels.iter().any(|v| v.is_inside()) {
                pieces.push(moved_piece);
                voxels.extend(moved_voxels);
            }
        } else {
            pieces.push(piece);
            voxels.extend(puzzle.voxels_for(piece));
        }
    }

    PuzzleState { pieces, voxels }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::PuzzleState;

    const SOLID: &str = "xxxxxx/xxxxxx/....../......";

    fn solid_puzzle() -> Puzzle {
        let lines = vec![SOLID; 6];
        Puzzle::from_text(&lines).unwrap()
    }

    #[test]
    fn subsets_of_size_one_equal_piece_count() {
        let pieces = vec![
            Piece::new(0, crate::voxel::place("A"), 0),
            Piece::new(1, crate::voxel::place("B"), 0),
            Piece::new(2, crate::voxel::place("C"), 0),
        ];
        let result = subsets(&pieces, 1);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn subsets_include_all_sizes_up_to_max() {
        let pieces = vec![
            Piece::new(0, crate::voxel::place("A"), 0),
            Piece::new(1, crate::voxel::place("B"), 0),
            Piece::new(2, crate::voxel::place("C"), 0),
        ];
        let result = subsets(&pieces, 2);
        // C(3,1) + C(3,2) = 3 + 3 = 6
        assert_eq!(result.len(), 6);
    }

    #[test]
    fn allowed_sizes_single_when_few_pieces_placed() {
        assert_eq!(allowed_sizes(3, 6), 1);
        assert_eq!(allowed_sizes(4, 6), 2);
    }

    #[test]
    fn moves_from_fully_assembled_solid_burr_are_disjoint_after_one_step() {
        let puzzle = solid_puzzle();
        let mut state = PuzzleState::empty();
        for (i, &slot) in crate::shape::SLOTS.iter().enumerate() {
            let (piece, voxels) = puzzle.pieces_at(i, slot).into_iter().next().unwrap();
            state = state.add(piece, &voxels);
        }
        let puzzle = puzzle.with_state(state);

        for (mv, result) in valid_moves(&puzzle) {
            if mv.steps == 1 {
                let mut seen = FxHashSet::default();
                for &p in &result.pieces {
                    for v in puzzle.voxels_for(p) {
                        assert!(seen.insert(v), "voxel {v:?} occupied by two pieces after move");
                    }
                }
            }
        }
    }
}
