//! Outward ring-by-ring grid search.
//!
//! Starting from an origin cell, each radius `d` visits the diamond of cells
//! at Manhattan distance `d` in a fixed order:
//!
//! 1. corners pass, `i` in `0..=d`: `(x-d+i, y-i)` then `(x+d-i, y+i)`
//! 2. edge pass, `i` in `1..d`: `(x-i, y+d-i)` then `(x+i, y-d+i)`
//!
//! The first cell accepted by the predicate wins. This is deterministic for
//! a given grid state but is not "nearest by true distance": within a ring,
//! whichever cell comes first in the order above is returned. Downstream
//! behaviour (which block an agent picks) depends on this exact order.
//!
//! Radii run over `1..max_distance`, so a `max_distance` of 3 examines rings
//! 1 and 2 only and a `max_distance` of 1 examines nothing.

use versus_types::{GridBounds, GridCoord};

/// A successful ring search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingMatch {
    /// The matching cell.
    pub coord: GridCoord,
    /// The ring it was found on.
    pub radius: i32,
}

/// Search outward from `origin` for the first cell accepted by `matches`.
///
/// The origin itself and cells outside `bounds` are never offered to the
/// predicate.
pub fn ring_search<F>(
    origin: GridCoord,
    bounds: GridBounds,
    max_distance: i32,
    mut matches: F,
) -> Option<RingMatch>
where
    F: FnMut(GridCoord) -> bool,
{
    let mut accept = |coord: GridCoord| coord != origin && bounds.contains(coord) && matches(coord);

    for d in 1..max_distance {
        for i in 0..=d {
            let lower_left = GridCoord::new(
                origin.x.saturating_sub(d).saturating_add(i),
                origin.y.saturating_sub(i),
            );
            if accept(lower_left) {
                return Some(RingMatch {
                    coord: lower_left,
                    radius: d,
                });
            }
            let upper_right = GridCoord::new(
                origin.x.saturating_add(d).saturating_sub(i),
                origin.y.saturating_add(i),
            );
            if accept(upper_right) {
                return Some(RingMatch {
                    coord: upper_right,
                    radius: d,
                });
            }
        }

        for i in 1..d {
            let upper_left = GridCoord::new(
                origin.x.saturating_sub(i),
                origin.y.saturating_add(d).saturating_sub(i),
            );
            if accept(upper_left) {
                return Some(RingMatch {
                    coord: upper_left,
                    radius: d,
                });
            }
            let lower_right = GridCoord::new(
                origin.x.saturating_add(i),
                origin.y.saturating_sub(d).saturating_add(i),
            );
            if accept(lower_right) {
                return Some(RingMatch {
                    coord: lower_right,
                    radius: d,
                });
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: GridBounds = GridBounds::new(5, 5);
    const CENTRE: GridCoord = GridCoord::new(2, 2);

    fn visit_order(origin: GridCoord, bounds: GridBounds, max_distance: i32) -> Vec<GridCoord> {
        let mut seen = Vec::new();
        let _ = ring_search(origin, bounds, max_distance, |c| {
            seen.push(c);
            false
        });
        seen
    }

    #[test]
    fn finds_cell_on_second_ring() {
        let target = GridCoord::new(2, 0);
        let found = ring_search(CENTRE, GRID, 3, |c| c == target);
        assert_eq!(
            found,
            Some(RingMatch {
                coord: target,
                radius: 2
            })
        );
    }

    #[test]
    fn upper_bound_is_exclusive() {
        let target = GridCoord::new(2, 0);
        assert_eq!(ring_search(CENTRE, GRID, 2, |c| c == target), None);

        // Even a match on the very first ring is skipped when max_distance is 1.
        let adjacent = GridCoord::new(1, 2);
        assert_eq!(ring_search(CENTRE, GRID, 1, |c| c == adjacent), None);
        assert!(visit_order(CENTRE, GRID, 1).is_empty());
    }

    #[test]
    fn first_ring_order_is_fixed() {
        let order = visit_order(CENTRE, GRID, 2);
        assert_eq!(
            order,
            vec![
                GridCoord::new(1, 2),
                GridCoord::new(3, 2),
                GridCoord::new(2, 1),
                GridCoord::new(2, 3),
            ]
        );
    }

    #[test]
    fn second_ring_covers_the_whole_diamond() {
        let order = visit_order(CENTRE, GRID, 3);
        let ring_two: Vec<GridCoord> = order.into_iter().skip(4).collect();
        assert_eq!(
            ring_two,
            vec![
                // corners pass
                GridCoord::new(0, 2),
                GridCoord::new(4, 2),
                GridCoord::new(1, 1),
                GridCoord::new(3, 3),
                GridCoord::new(2, 0),
                GridCoord::new(2, 4),
                // edge pass
                GridCoord::new(1, 3),
                GridCoord::new(3, 1),
            ]
        );
    }

    #[test]
    fn ties_favour_iteration_order_not_distance() {
        // Both (0, 2) and (1, 1) sit on ring 2; (0, 2) is examined first.
        let found = ring_search(CENTRE, GRID, 3, |c| {
            c == GridCoord::new(1, 1) || c == GridCoord::new(0, 2)
        });
        assert_eq!(found.map(|m| m.coord), Some(GridCoord::new(0, 2)));
    }

    #[test]
    fn corners_pass_short_circuits_edge_pass() {
        let found = ring_search(CENTRE, GRID, 3, |c| {
            c == GridCoord::new(1, 3) || c == GridCoord::new(2, 4)
        });
        assert_eq!(found.map(|m| m.coord), Some(GridCoord::new(2, 4)));
    }

    #[test]
    fn skips_origin_and_out_of_bounds_cells() {
        let corner = GridCoord::new(0, 0);
        let order = visit_order(corner, GRID, 3);
        assert!(order.iter().all(|c| GRID.contains(*c)));
        assert!(!order.contains(&corner));
        assert_eq!(
            order,
            vec![
                GridCoord::new(1, 0),
                GridCoord::new(0, 1),
                GridCoord::new(2, 0),
                GridCoord::new(1, 1),
                GridCoord::new(0, 2),
            ]
        );
    }

    #[test]
    fn stops_at_first_matching_radius() {
        let mut radii = Vec::new();
        let found = ring_search(CENTRE, GridBounds::new(9, 9), 6, |c| {
            radii.push((c.x - 2).abs() + (c.y - 2).abs());
            c == GridCoord::new(3, 2)
        });
        assert_eq!(found.map(|m| m.radius), Some(1));
        assert!(radii.iter().all(|r| *r == 1));
    }
}
