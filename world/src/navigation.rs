//! A* path search over the lane grid.

use neon_arcade_core::CellCoord;

use crate::grid::Grid;

/// Finds the shortest orthogonal route from `start` to `goal`.
///
/// The returned route lists cells from `start` to `goal` inclusive and is
/// empty when the goal cannot be reached. Obstacles and emplacements block the
/// search unless `ignore_obstacles` is set; the start cell itself is never
/// tested, so actors standing on a freshly built cell can still walk off it.
///
/// Every step costs one and the heuristic is the Manhattan distance to the
/// goal. The open list is scanned linearly and the first entry holding the
/// lowest total wins, so equal-cost routes resolve the same way on every call.
pub fn find_path(
    grid: &mut Grid,
    start: CellCoord,
    goal: CellCoord,
    ignore_obstacles: bool,
) -> Vec<CellCoord> {
    if !grid.contains(start) || !grid.contains(goal) {
        return Vec::new();
    }

    grid.reset_scratch();
    if let Some(scratch) = grid.scratch_mut(start) {
        scratch.heuristic = start.manhattan_distance(goal);
        scratch.total = scratch.heuristic;
        scratch.open = true;
    }
    let mut open = vec![start];

    while !open.is_empty() {
        let mut lowest = 0;
        let mut lowest_total = u32::MAX;
        for (index, cell) in open.iter().enumerate() {
            let total = grid.scratch(*cell).map_or(u32::MAX, |scratch| scratch.total);
            if total < lowest_total {
                lowest = index;
                lowest_total = total;
            }
        }

        let current = open.remove(lowest);
        if current == goal {
            return reconstruct(grid, goal);
        }

        let current_cost = match grid.scratch_mut(current) {
            Some(scratch) => {
                scratch.open = false;
                scratch.closed = true;
                scratch.cost
            }
            None => continue,
        };

        let neighbors: Vec<CellCoord> = grid.neighbors(current).collect();
        for neighbor in neighbors {
            let blocked = grid
                .kind(neighbor)
                .map_or(true, |kind| kind.blocks_ground());
            if blocked && !ignore_obstacles {
                continue;
            }
            let Some(scratch) = grid.scratch_mut(neighbor) else {
                continue;
            };
            if scratch.closed {
                continue;
            }

            let cost = current_cost + 1;
            if scratch.open && cost >= scratch.cost {
                continue;
            }
            if !scratch.open {
                scratch.open = true;
                open.push(neighbor);
            }
            scratch.cost = cost;
            scratch.heuristic = neighbor.manhattan_distance(goal);
            scratch.total = scratch.cost + scratch.heuristic;
            scratch.parent = Some(current);
        }
    }

    Vec::new()
}

fn reconstruct(grid: &Grid, goal: CellCoord) -> Vec<CellCoord> {
    let mut path = vec![goal];
    let mut cursor = goal;
    while let Some(parent) = grid.scratch(cursor).and_then(|scratch| scratch.parent) {
        path.push(parent);
        cursor = parent;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use neon_arcade_core::{CellKind, EmplacementKind};

    fn lane() -> Grid {
        Grid::new(20, 15, CellCoord::new(0, 7), CellCoord::new(19, 7)).expect("valid grid")
    }

    fn assert_orthogonal(path: &[CellCoord]) {
        for pair in path.windows(2) {
            assert_eq!(
                pair[0].manhattan_distance(pair[1]),
                1,
                "path steps must be orthogonally adjacent: {pair:?}"
            );
        }
    }

    #[test]
    fn start_equal_to_goal_yields_single_cell() {
        let mut grid = lane();
        let cell = CellCoord::new(4, 4);
        assert_eq!(find_path(&mut grid, cell, cell, false), vec![cell]);
    }

    #[test]
    fn open_grid_path_matches_manhattan_distance() {
        let mut grid = lane();
        let start = CellCoord::new(2, 1);
        let goal = CellCoord::new(15, 12);
        let path = find_path(&mut grid, start, goal, false);
        assert_eq!(path.len() as u32, start.manhattan_distance(goal) + 1);
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        assert_orthogonal(&path);
    }

    #[test]
    fn emplacements_block_ground_routes() {
        let mut grid = lane();
        for row in 0..15 {
            if row != 14 {
                let _ = grid.set_kind(
                    CellCoord::new(10, row),
                    CellKind::Emplacement(EmplacementKind::Blaster),
                );
            }
        }
        let (source, target) = (grid.source(), grid.target());
        let path = find_path(&mut grid, source, target, false);
        assert!(path.contains(&CellCoord::new(10, 14)));
        assert!(path
            .iter()
            .all(|cell| !grid.kind(*cell).is_some_and(CellKind::blocks_ground)));
        assert_orthogonal(&path);
    }

    #[test]
    fn sealed_target_is_unreachable_unless_ignoring_obstacles() {
        let mut grid = lane();
        for cell in [
            CellCoord::new(19, 6),
            CellCoord::new(19, 8),
            CellCoord::new(18, 7),
        ] {
            let _ = grid.set_kind(cell, CellKind::Obstacle);
        }
        let (source, target) = (grid.source(), grid.target());
        assert!(find_path(&mut grid, source, target, false).is_empty());

        let flight = find_path(&mut grid, source, target, true);
        assert_eq!(flight.len(), 20);
    }

    #[test]
    fn repeated_queries_return_identical_routes() {
        let mut grid = lane();
        let _ = grid.set_kind(CellCoord::new(6, 7), CellKind::Obstacle);
        let (source, target) = (grid.source(), grid.target());
        let first = find_path(&mut grid, source, target, false);
        let second = find_path(&mut grid, source, target, false);
        assert_eq!(first, second);
        assert_eq!(first.len(), 22);
    }

    #[test]
    fn out_of_bounds_endpoints_yield_nothing() {
        let mut grid = lane();
        let target = grid.target();
        assert!(find_path(&mut grid, CellCoord::new(40, 0), target, false).is_empty());
    }
}
