//! Brush stamping: which lattice cells a stroke at a fractional position touches.

use serde::{Deserialize, Serialize};

use crate::cell::Position;

/// Upper bound on stamp radius, so a bogus request cannot enumerate millions of cells.
pub const MAX_STAMP_RADIUS: f64 = 256.0;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushMode {
    Alive,
    Dead,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushShape {
    #[default]
    Circle,
    Square,
}

/// Cells covered by a brush of `radius` cells centred on a fractional lattice point.
///
/// A circular stamp keeps every cell whose centre (`position + 0.5`) lies strictly
/// inside the radius. A square stamp covers `floor(diameter / 2)` cells on each side
/// of the cell under the centre. Never empty: when nothing qualifies, the cell
/// containing the centre is returned.
#[must_use]
pub fn stamp_brush(
    center_row: f64,
    center_col: f64,
    radius: f64,
    shape: BrushShape,
) -> Vec<Position> {
    let radius = if radius.is_finite() {
        radius.clamp(0.0, MAX_STAMP_RADIUS)
    } else {
        0.0
    };
    let nearest = Position::new(center_row.floor() as i32, center_col.floor() as i32);

    let stamped = match shape {
        BrushShape::Circle => circle(center_row, center_col, radius),
        BrushShape::Square => square(nearest, radius),
    };
    if stamped.is_empty() {
        vec![nearest]
    } else {
        stamped
    }
}

fn circle(center_row: f64, center_col: f64, radius: f64) -> Vec<Position> {
    let row_lo = (center_row - radius).floor() as i32;
    let row_hi = (center_row + radius).ceil() as i32;
    let col_lo = (center_col - radius).floor() as i32;
    let col_hi = (center_col + radius).ceil() as i32;
    let r2 = radius * radius;

    let mut cells = Vec::new();
    for row in row_lo..=row_hi {
        let dy = f64::from(row) + 0.5 - center_row;
        for col in col_lo..=col_hi {
            let dx = f64::from(col) + 0.5 - center_col;
            if dx * dx + dy * dy < r2 {
                cells.push(Position::new(row, col));
            }
        }
    }
    cells
}

fn square(center: Position, radius: f64) -> Vec<Position> {
    let half = ((radius * 2.0).round() as i32) / 2;
    let mut cells = Vec::with_capacity(((2 * half + 1) * (2 * half + 1)) as usize);
    for d_row in -half..=half {
        for d_col in -half..=half {
            cells.push(center.offset(d_row, d_col));
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn size_one_brush_hits_the_cell_under_the_pointer() {
        assert_eq!(stamp_brush(2.5, 3.5, 0.5, BrushShape::Circle), vec![Position::new(2, 3)]);
        assert_eq!(stamp_brush(-0.2, -0.9, 0.5, BrushShape::Circle), vec![Position::new(-1, -1)]);
    }

    #[test]
    fn corner_centre_falls_back_to_nearest() {
        // All four candidate centres are ~0.707 away.
        assert_eq!(stamp_brush(4.0, 4.0, 0.5, BrushShape::Circle), vec![Position::new(4, 4)]);
    }

    #[test]
    fn zero_and_nonsense_radius_still_paint() {
        assert_eq!(stamp_brush(1.5, 1.5, 0.0, BrushShape::Circle).len(), 1);
        assert_eq!(stamp_brush(1.5, 1.5, -3.0, BrushShape::Circle).len(), 1);
        assert_eq!(stamp_brush(1.5, 1.5, f64::NAN, BrushShape::Circle).len(), 1);
    }

    #[test]
    fn circle_radius_controls_coverage() {
        let mut cells = stamp_brush(0.5, 0.5, 1.5, BrushShape::Circle);
        cells.sort();
        // Diagonals are sqrt(2) ~ 1.414 < 1.5 away, so the full 3x3 is covered.
        assert_eq!(cells.len(), 9);
        let mut cells = stamp_brush(0.5, 0.5, 1.2, BrushShape::Circle);
        cells.sort();
        assert_eq!(
            cells,
            vec![
                Position::new(-1, 0),
                Position::new(0, -1),
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(1, 0),
            ]
        );
    }

    #[test]
    fn square_brush_matches_odd_sizes() {
        for (size, expected) in [(1.0, 1), (3.0, 9), (5.0, 25), (7.0, 49)] {
            let cells = stamp_brush(10.2, -4.7, size / 2.0, BrushShape::Square);
            assert_eq!(cells.len(), expected);
            assert!(cells.contains(&Position::new(10, -5)));
        }
    }

    proptest! {
        #[test]
        fn prop_unit_brush_hits_exactly_one_cell(row in -1e6f64..1e6, col in -1e6f64..1e6) {
            let cells = stamp_brush(row, col, 0.5, BrushShape::Circle);
            prop_assert_eq!(cells.len(), 1);
            prop_assert_eq!(cells[0], Position::new(row.floor() as i32, col.floor() as i32));
        }

        #[test]
        fn prop_stamp_is_never_empty(
            row in -1e4f64..1e4,
            col in -1e4f64..1e4,
            radius in 0.0f64..6.0,
            square in any::<bool>(),
        ) {
            let shape = if square { BrushShape::Square } else { BrushShape::Circle };
            prop_assert!(!stamp_brush(row, col, radius, shape).is_empty());
        }

        #[test]
        fn prop_circle_cells_are_within_radius(
            row in -100f64..100.0,
            col in -100f64..100.0,
            radius in 0.75f64..6.0,
        ) {
            for p in stamp_brush(row, col, radius, BrushShape::Circle) {
                let dy = f64::from(p.row) + 0.5 - row;
                let dx = f64::from(p.col) + 0.5 - col;
                prop_assert!(dx * dx + dy * dy < radius * radius);
            }
        }
    }
}
