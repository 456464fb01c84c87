use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::index;

use crate::*;

/// Picks `mines` distinct positions uniformly at random among every cell except `safe`.
///
/// `mines` is clamped to the number of free cells. A `safe` outside the grid excludes nothing.
pub fn place_mines<R: Rng + ?Sized>(
    rng: &mut R,
    size: Coord2,
    mines: CellCount,
    safe: Coord2,
) -> BTreeSet<Coord2> {
    let (rows, cols) = (usize::from(size.0), usize::from(size.1));
    let total_cells = rows * cols;
    // an out of bounds safe cell must not alias an in-bounds index
    let safe_index = in_bounds(safe, size)
        .then(|| usize::from(safe.0) * cols + usize::from(safe.1))
        .unwrap_or(total_cells);

    let free_cells = if safe_index < total_cells {
        total_cells - 1
    } else {
        total_cells
    };
    let mut requested = usize::from(mines);
    if requested > free_cells {
        log::warn!(
            "Minefield already full, requested {} but only {} cells are free",
            requested,
            free_cells
        );
        requested = free_cells;
    }

    let positions: BTreeSet<Coord2> = index::sample(rng, free_cells, requested)
        .into_iter()
        // sampled indices skip over the safe cell
        .map(|i| if i >= safe_index { i + 1 } else { i })
        .filter_map(|i| {
            let row = Coord::try_from(i / cols).ok()?;
            let col = Coord::try_from(i % cols).ok()?;
            Some((row, col))
        })
        .collect();

    // double check mine count
    if positions.len() != requested || positions.contains(&safe) {
        log::warn!(
            "Generated minefield mismatch, actual: {}, requested: {}",
            positions.len(),
            requested
        );
    }
    log::debug!("Placed {} mines avoiding {:?}", positions.len(), safe);
    positions
}
