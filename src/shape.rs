//! Shape parsing and precomputed per-slot orientation tables.
//!
//! A shape is four slash-separated rows of `x`/`.` describing a 2x2x6 bar.
//! At construction time every `(slot, orientation)` pair is tried; the ones
//! that cover all 8 "required" voxels for that slot (the outer rings of the
//! arm) are kept, deduplicated by their resulting voxel set.

use std::collections::HashSet;

use rustc_hash::FxHashSet;

use crate::error::ParseError;
use crate::voxel::{place, CanonicalVoxel, Orientation, Voxel};

/// The 8 outer-ring voxels each slot's occupant must cover to be a
/// structurally valid piece for that slot. Embedded verbatim from the
/// domain data; see spec §6.
pub fn required_voxels(slot: &str) -> &'static [Voxel] {
    match slot {
        "A" => &REQUIRED_A,
        "B" => &REQUIRED_B,
        "C" => &REQUIRED_C,
        "D" => &REQUIRED_D,
        "E" => &REQUIRED_E,
        "F" => &REQUIRED_F,
        other => panic!("unknown slot label {other:?}"),
    }
}

const REQUIRED_A: [Voxel; 8] = [
    Voxel::new(-1, -2, -3),
    Voxel::new(-1, -2, -2),
    Voxel::new(0, -2, -3),
    Voxel::new(0, -2, -2),
    Voxel::new(-1, -2, 2),
    Voxel::new(-1, -2, 1),
    Voxel::new(0, -2, 2),
    Voxel::new(0, -2, 1),
];

const REQUIRED_B: [Voxel; 8] = [
    Voxel::new(-3, -1, -2),
    Voxel::new(-2, -1, -2),
    Voxel::new(-3, 0, -2),
    Voxel::new(-2, 0, -2),
    Voxel::new(2, -1, -2),
    Voxel::new(1, -1, -2),
    Voxel::new(2, 0, -2),
    Voxel::new(1, 0, -2),
];

const REQUIRED_C: [Voxel; 8] = [
    Voxel::new(-2, -3, -1),
    Voxel::new(-2, -2, -1),
    Voxel::new(-2, -3, 0),
    Voxel::new(-2, -2, 0),
    Voxel::new(-2, 2, -1),
    Voxel::new(-2, 1, -1),
    Voxel::new(-2, 2, 0),
    Voxel::new(-2, 1, 0),
];

const REQUIRED_D: [Voxel; 8] = [
    Voxel::new(-3, -1, 1),
    Voxel::new(-2, -1, 1),
    Voxel::new(-3, 0, 1),
    Voxel::new(-2, 0, 1),
    Voxel::new(2, -1, 1),
    Voxel::new(1, -1, 1),
    Voxel::new(2, 0, 1),
    Voxel::new(1, 0, 1),
];

const REQUIRED_E: [Voxel; 8] = [
    Voxel::new(1, -3, -1),
    Voxel::new(1, -2, -1),
    Voxel::new(1, -3, 0),
    Voxel::new(1, -2, 0),
    Voxel::new(1, 2, -1),
    Voxel::new(1, 1, -1),
    Voxel::new(1, 2, 0),
    Voxel::new(1, 1, 0),
];

const REQUIRED_F: [Voxel; 8] = [
    Voxel::new(-1, 1, -3),
    Voxel::new(-1, 1, -2),
    Voxel::new(0, 1, -3),
    Voxel::new(0, 1, -2),
    Voxel::new(-1, 1, 2),
    Voxel::new(-1, 1, 1),
    Voxel::new(0, 1, 2),
    Voxel::new(0, 1, 1),
];

/// The slot labels, in the fixed order used for iteration everywhere.
pub const SLOTS: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

/// One legal way to place a shape at a given slot: the orientation used,
/// and the resulting (aligned, slot-frame) voxel set.
#[derive(Debug, Clone)]
pub struct VoxelState {
    pub orientation: Orientation,
    pub voxels: FxHashSet<Voxel>,
}

/// A parsed piece: its canonical voxels plus, for each of the six slots,
/// every orientation at which it validly occupies that slot.
#[derive(Debug, Clone)]
pub struct Shape {
    /// Canonical voxels centered at the origin, long axis along Z.
    pub voxels: Vec<CanonicalVoxel>,
    /// For each slot label, every `VoxelState` that covers the slot's
    /// required voxels, deduplicated by voxel set.
    orientations: [Vec<VoxelState>; 6],
}

impl Shape {
    /// Parses `row0/row1/row2/row3` (each row six `x`/`.` characters) into
    /// a `Shape`, then precomputes the per-slot orientation tables.
    pub fn from_text(text: &str) -> Result<Self, ParseError> {
        let rows: Vec<&str> = text.split('/').collect();
        if rows.len() != 4 || rows.iter().any(|r| r.chars().count() != 6) {
            return Err(ParseError::InvalidShape(text.to_string()));
        }

        let mut voxels = Vec::new();
        for (i, row) in rows.iter().enumerate() {
            let x = (i % 2) as f64;
            let y = (i / 2) as f64;
            for (z, ch) in row.chars().enumerate() {
                match ch {
                    'x' => voxels.push(CanonicalVoxel::new(x - 0.5, y - 0.5, 2.5 - z as f64)),
                    '.' => {}
                    _ => return Err(ParseError::InvalidShape(text.to_string())),
                }
            }
        }

        Ok(Self::from_canonical_voxels(voxels))
    }

    fn from_canonical_voxels(voxels: Vec<CanonicalVoxel>) -> Self {
        let mut orientations: [Vec<VoxelState>; 6] = Default::default();

        for (slot_index, &slot) in SLOTS.iter().enumerate() {
            let position = place(slot);
            let required: HashSet<Voxel> = required_voxels(slot).iter().copied().collect();

            let mut seen: HashSet<Vec<Voxel>> = HashSet::new();
            for orientation in 0..8u8 {
                let mut aligned: Vec<Voxel> = voxels
                    .iter()
                    .map(|v| v.move_to(position, orientation))
                    .collect();
                aligned.sort();

                if seen.contains(&aligned) {
                    continue;
                }
                seen.insert(aligned.clone());

                let covers_required = required.iter().all(|r| aligned.contains(r));
                if covers_required {
                    let voxel_set: FxHashSet<Voxel> = aligned.into_iter().collect();
                    orientations[slot_index].push(VoxelState {
                        orientation,
                        voxels: voxel_set,
                    });
                }
            }
        }

        Shape { voxels, orientations }
    }

    /// Returns every legal `VoxelState` for this shape at the named slot.
    pub fn orientations_at(&self, slot: &str) -> &[VoxelState] {
        let index = SLOTS.iter().position(|&s| s == slot).unwrap_or_else(|| {
            panic!("unknown slot label {slot:?}");
        });
        &self.orientations[index]
    }

    /// Total voxel count of this piece.
    pub fn voxel_count(&self) -> usize {
        self.voxels.len()
    }
}

/// Orders shape indices ascending by `|orientations["A"]|`, minimizing
/// branching in the assembly search.
pub fn order_by_orientations(shapes: &[Shape]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..shapes.len()).collect();
    order.sort_by_key(|&i| shapes[i].orientations_at("A").len());
    order
}

/// Orders shape indices descending by voxel count.
pub fn order_by_size(shapes: &[Shape]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..shapes.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(shapes[i].voxel_count()));
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    // Two full rows + two empty rows: 12 voxels, one full "half" of the
    // 2x2 cross-section for the whole length of the bar. This is the
    // maximal (level-one, unnotched) burr piece -- a fully-solid 2x2x6
    // block (24 voxels) is too big to fit in any slot without overlapping
    // its cross-axis neighbors.
    const SOLID_ROW: &str = "xxxxxx/xxxxxx/....../......";

    #[test]
    fn rejects_wrong_row_count() {
        let err = Shape::from_text("xxxxxx/xxxxxx/xxxxxx").unwrap_err();
        assert_eq!(err, ParseError::InvalidShape("xxxxxx/xxxxxx/xxxxxx".into()));
    }

    #[test]
    fn rejects_wrong_column_count() {
        let err = Shape::from_text("xxxxx/xxxxxx/xxxxxx/xxxxxx").unwrap_err();
        assert!(matches!(err, ParseError::InvalidShape(_)));
    }

    #[test]
    fn rejects_bad_characters() {
        let err = Shape::from_text("xxxxxo/xxxxxx/xxxxxx/xxxxxx").unwrap_err();
        assert!(matches!(err, ParseError::InvalidShape(_)));
    }

    #[test]
    fn solid_shape_has_twelve_voxels() {
        let shape = Shape::from_text(SOLID_ROW).unwrap();
        assert_eq!(shape.voxel_count(), 12);
    }

    #[test]
    fn every_orientation_covers_all_required_voxels() {
        let shape = Shape::from_text(SOLID_ROW).unwrap();
        for &slot in &SLOTS {
            let required: HashSet<Voxel> = required_voxels(slot).iter().copied().collect();
            for state in shape.orientations_at(slot) {
                for r in &required {
                    assert!(
                        state.voxels.contains(r),
                        "slot {slot} orientation {} missing required voxel {r:?}",
                        state.orientation
                    );
                }
            }
        }
    }

    #[test]
    fn every_slot_has_at_least_one_orientation() {
        let shape = Shape::from_text(SOLID_ROW).unwrap();
        for &slot in &SLOTS {
            assert!(
                !shape.orientations_at(slot).is_empty(),
                "slot {slot} has no orientation covering its required voxels"
            );
        }
    }

    #[test]
    fn no_duplicate_voxel_sets_within_a_slot() {
        let shape = Shape::from_text(SOLID_ROW).unwrap();
        for &slot in &SLOTS {
            let states = shape.orientations_at(slot);
            for i in 0..states.len() {
                for j in (i + 1)..states.len() {
                    assert_ne!(states[i].voxels, states[j].voxels);
                }
            }
        }
    }

    #[test]
    fn order_by_size_is_descending() {
        let big = Shape::from_text(SOLID_ROW).unwrap();
        let small = Shape::from_text("x...../....../....../......").unwrap();
        let shapes = vec![small, big];
        assert_eq!(order_by_size(&shapes), vec![1, 0]);
    }
}
