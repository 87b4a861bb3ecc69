//! Conway's Life rule, B3/S23
//!
//! | neighbors | next state            |
//! |-----------|-----------------------|
//! | 3         | alive                 |
//! | 2         | alive iff alive now   |
//! | other     | dead                  |

use super::grid::{EdgePolicy, Generation};

/// Moore neighborhood offsets, center excluded
pub const MOORE_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Applies the rule to one cell
pub fn next_state(alive: bool, live_neighbors: u32) -> bool {
    match live_neighbors {
        3 => true,
        2 => alive,
        _ => false,
    }
}

/// Live cells among the 8 neighbors of `(x, y)` in `generation`
pub fn live_neighbors(generation: &Generation, x: u32, y: u32, policy: EdgePolicy) -> u32 {
    MOORE_OFFSETS
        .iter()
        .filter(|&&(dx, dy)| generation.neighbor(x, y, dx, dy, policy))
        .count() as u32
}

/// Next state of `(x, y)` as a pure function of the current generation
pub fn evolve_cell(current: &Generation, x: u32, y: u32, policy: EdgePolicy) -> bool {
    next_state(current.get(x, y), live_neighbors(current, x, y, policy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::grid::GridSize;

    #[test]
    fn test_rule_table_complete() {
        for n in 0..=8u32 {
            let expected_dead = n == 3;
            let expected_alive = n == 2 || n == 3;
            assert_eq!(next_state(false, n), expected_dead, "dead cell, {n} neighbors");
            assert_eq!(next_state(true, n), expected_alive, "live cell, {n} neighbors");
        }
    }

    #[test]
    fn test_impossible_counts_are_dead() {
        for n in [9, 10, 27, u32::MAX] {
            assert!(!next_state(true, n));
            assert!(!next_state(false, n));
        }
    }

    #[test]
    fn test_counts_full_neighborhood() {
        let size = GridSize::new(3, 3).unwrap();
        let mut generation = Generation::new(size);
        for y in 0..3 {
            for x in 0..3 {
                generation.set(x, y, true);
            }
        }
        assert_eq!(live_neighbors(&generation, 1, 1, EdgePolicy::Clamp), 8);
        assert!(!evolve_cell(&generation, 1, 1, EdgePolicy::Clamp));
    }

    #[test]
    fn test_wrap_counts_across_edges() {
        let size = GridSize::new(5, 5).unwrap();
        let generation = Generation::with_alive(size, &[(4, 4), (4, 0), (0, 4)]);
        assert_eq!(live_neighbors(&generation, 0, 0, EdgePolicy::Wrap), 3);
        assert!(evolve_cell(&generation, 0, 0, EdgePolicy::Wrap));
        assert_eq!(live_neighbors(&generation, 0, 0, EdgePolicy::Clamp), 0);
    }

    #[test]
    fn test_clamp_corner_reads_itself() {
        let size = GridSize::new(4, 4).unwrap();
        let generation = Generation::with_alive(size, &[(0, 0)]);
        assert_eq!(live_neighbors(&generation, 0, 0, EdgePolicy::Clamp), 3);
        assert_eq!(live_neighbors(&generation, 0, 0, EdgePolicy::Wrap), 0);
    }
}
