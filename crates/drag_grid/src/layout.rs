//! Pure slot layout: maps a linear index to a fixed-column grid coordinate.

use bevy::prelude::*;

/// Top-left corner of every slot in content space (y grows downward).
pub fn compute_slots(count: usize, columns: usize, cell_size: f32) -> Vec<Vec2> {
    let columns = columns.max(1);
    (0..count)
        .map(|i| {
            Vec2::new(
                ((i % columns) as f32) * cell_size,
                ((i / columns) as f32) * cell_size,
            )
        })
        .collect()
}

pub fn row_count(count: usize, columns: usize) -> usize {
    count.div_ceil(columns.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_fill_rows_left_to_right() {
        let slots = compute_slots(5, 3, 100.0);
        assert_eq!(slots.len(), 5, "one slot per element");
        assert_eq!(slots.first(), Some(&Vec2::new(0.0, 0.0)));
        assert_eq!(slots.get(1), Some(&Vec2::new(100.0, 0.0)));
        assert_eq!(slots.get(2), Some(&Vec2::new(200.0, 0.0)));
        assert_eq!(slots.get(3), Some(&Vec2::new(0.0, 100.0)));
        assert_eq!(slots.get(4), Some(&Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn x_cycles_and_y_is_monotonic() {
        let columns = 4;
        let cell = 50.0;
        let slots = compute_slots(11, columns, cell);
        for (i, slot) in slots.iter().enumerate() {
            assert!(slot.x >= 0.0 && slot.x <= cell * (columns - 1) as f32, "x in range");
            assert!((slot.x - ((i % columns) as f32) * cell).abs() < f32::EPSILON, "x cycles");
        }
        for pair in slots.windows(2) {
            if let [a, b] = pair {
                assert!(b.y >= a.y, "y never decreases along the sequence");
            }
        }
    }

    #[test]
    fn row_count_rounds_up() {
        assert_eq!(row_count(0, 3), 0, "empty grid has no rows");
        assert_eq!(row_count(3, 3), 1, "exact fit");
        assert_eq!(row_count(4, 3), 2, "partial last row");
        assert_eq!(row_count(5, 1), 5, "single column");
    }

    #[test]
    fn zero_columns_treated_as_one() {
        let slots = compute_slots(2, 0, 10.0);
        assert_eq!(slots.get(1), Some(&Vec2::new(0.0, 10.0)), "degenerate column count");
        assert_eq!(row_count(2, 0), 2, "degenerate row count");
    }
}
