use std::collections::BTreeSet;
use std::ops::Index;

use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Whether the mine layout has been decided yet.
///
/// Valid transitions:
/// - Unplaced -> Placed, on the first reveal
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinePhase {
    #[default]
    Unplaced,
    Placed(BTreeSet<Coord2>),
}

impl MinePhase {
    pub const fn is_placed(&self) -> bool {
        matches!(self, Self::Placed(_))
    }
}

/// The grid of cells for a single game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: GameConfig,
    grid: Array2<Cell>,
    phase: MinePhase,
    flags_placed: CellCount,
}

impl Board {
    /// Allocates a fully hidden grid, mines are placed on the first reveal.
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let grid = Array2::from_shape_fn(config.size.to_nd_index(), |(row, col)| {
            Cell::new((row as Coord, col as Coord))
        });
        Ok(Self {
            config,
            grid,
            phase: MinePhase::Unplaced,
            flags_placed: 0,
        })
    }

    /// Builds a board with a fixed layout, skipping the first-click placement.
    pub fn with_mines(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut positions = BTreeSet::new();
        for &coords in mine_coords {
            if !in_bounds(coords, size) {
                return Err(GameError::InvalidCoords);
            }
            positions.insert(coords);
        }

        let mines = CellCount::try_from(positions.len()).unwrap_or(CellCount::MAX);
        let mut board = Self::new(GameConfig::new(size, mines)?)?;
        board.settle_mines(positions);
        Ok(board)
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn rows(&self) -> Coord {
        self.config.rows()
    }

    pub fn cols(&self) -> Coord {
        self.config.cols()
    }

    pub fn num_mines(&self) -> CellCount {
        self.config.mines
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.config.safe_cells()
    }

    pub fn flags_placed(&self) -> CellCount {
        self.flags_placed
    }

    /// How many mines have not been flagged yet, negative when over-flagged.
    pub fn mines_left(&self) -> isize {
        (self.config.mines as isize) - (self.flags_placed as isize)
    }

    /// True until the first reveal places the mines.
    pub fn is_first_click(&self) -> bool {
        !self.phase.is_placed()
    }

    pub fn phase(&self) -> &MinePhase {
        &self.phase
    }

    pub fn mine_positions(&self) -> Option<&BTreeSet<Coord2>> {
        match &self.phase {
            MinePhase::Unplaced => None,
            MinePhase::Placed(positions) => Some(positions),
        }
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.config.size)
    }

    pub fn cell(&self, coords: Coord2) -> Option<&Cell> {
        if self.contains(coords) {
            Some(&self.grid[coords.to_nd_index()])
        } else {
            None
        }
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> Option<&mut Cell> {
        if self.contains(coords) {
            Some(&mut self.grid[coords.to_nd_index()])
        } else {
            None
        }
    }

    pub fn grid(&self) -> &Array2<Cell> {
        &self.grid
    }

    /// Cells in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = &Cell> {
        self.grid.iter()
    }

    pub fn revealed_count(&self) -> CellCount {
        let count = self.grid.iter().filter(|cell| cell.is_revealed()).count();
        CellCount::try_from(count).unwrap_or(CellCount::MAX)
    }

    /// Places the mines, keeping `safe` clear. Returns `false` if they were already placed.
    ///
    /// An out of bounds `safe` keeps no cell clear.
    pub fn place_mines<R: Rng + ?Sized>(&mut self, safe: Coord2, rng: &mut R) -> bool {
        if self.phase.is_placed() {
            return false;
        }
        let positions = place_mines(rng, self.config.size, self.config.mines, safe);
        self.settle_mines(positions);
        true
    }

    /// Marks mines and computes every safe cell's count, once, for the whole grid.
    fn settle_mines(&mut self, positions: BTreeSet<Coord2>) {
        let size = self.config.size;
        for row in 0..size.0 {
            for col in 0..size.1 {
                let coords = (row, col);
                let content = if positions.contains(&coords) {
                    CellContent::Mine
                } else {
                    let count = neighbors(coords, size)
                        .filter(|pos| positions.contains(pos))
                        .count();
                    CellContent::Safe(count as u8)
                };
                self.grid[coords.to_nd_index()].set_content(content);
            }
        }
        self.phase = MinePhase::Placed(positions);
    }

    /// Reveals a cell, flood-filling through zero-count regions.
    ///
    /// The first successful call places the mines using `rng`. Out of bounds, revealed and
    /// flagged cells are left alone.
    pub fn reveal_cell<R: Rng + ?Sized>(&mut self, coords: Coord2, rng: &mut R) -> RevealOutcome {
        match self.cell(coords) {
            Some(cell) if cell.is_hidden() => {}
            _ => return RevealOutcome::NoChange,
        }

        if !self.phase.is_placed() {
            self.place_mines(coords, rng);
        }

        let cell = &mut self.grid[coords.to_nd_index()];
        if cell.reveal() {
            log::debug!("Hit mine at {:?}", coords);
            return RevealOutcome::HitMine;
        }
        let count = cell.adjacent_mines();
        log::debug!("Revealed cell at {:?}, mine count: {:?}", coords, count);

        if count == Some(0) {
            self.flood_fill(coords);
        }
        RevealOutcome::Revealed
    }

    fn flood_fill(&mut self, origin: Coord2) {
        let mut to_visit: Vec<Coord2> = self.hidden_neighbors(origin).collect();
        log::trace!(
            "Starting flood-fill from {:?}, initial neighbors: {:?}",
            origin,
            to_visit
        );

        while let Some(visit_coords) = to_visit.pop() {
            let cell = &mut self.grid[visit_coords.to_nd_index()];
            // queued more than once, or flagged
            if !cell.is_hidden() {
                continue;
            }

            cell.reveal();
            let count = cell.adjacent_mines();
            log::trace!("Flood revealed cell at {:?}, mine count: {:?}", visit_coords, count);

            if count == Some(0) {
                to_visit.extend(self.hidden_neighbors(visit_coords));
            }
        }
    }

    fn hidden_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> {
        neighbors(coords, self.config.size)
            .filter(|&pos| self.grid[pos.to_nd_index()].is_hidden())
    }

    /// Toggles a flag, returns whether the cell is now flagged.
    pub fn toggle_flag(&mut self, coords: Coord2) -> bool {
        let Some(cell) = self.cell_mut(coords) else {
            return false;
        };
        let was_flagged = cell.is_flagged();
        let flagged = cell.toggle_flag();

        match (was_flagged, flagged) {
            (false, true) => self.flags_placed += 1,
            (true, false) => self.flags_placed -= 1,
            _ => {}
        }
        flagged
    }

    /// Won when every safe cell is revealed, or when every mine is flagged and no safe
    /// cell is.
    ///
    /// Never won before the mines are placed.
    pub fn check_win(&self) -> bool {
        if !self.phase.is_placed() {
            return false;
        }

        let mut all_safe_revealed = true;
        let mut all_mines_flagged = true;
        let mut no_incorrect_flags = true;

        for cell in self.grid.iter() {
            match (cell.is_mine(), cell.state()) {
                (true, CellState::Flagged) => {}
                (true, _) => all_mines_flagged = false,
                (false, CellState::Revealed) => {}
                (false, CellState::Flagged) => {
                    all_safe_revealed = false;
                    no_incorrect_flags = false;
                }
                (false, CellState::Hidden) => all_safe_revealed = false,
            }
        }

        all_safe_revealed || (all_mines_flagged && no_incorrect_flags)
    }

    /// Every cell a hint may reveal: not a mine, not revealed, not flagged.
    pub fn safe_unrevealed_cells(&self) -> Vec<Coord2> {
        self.grid
            .iter()
            .filter(|cell| !cell.is_mine() && cell.is_hidden())
            .map(Cell::coords)
            .collect()
    }

    /// Exposes every mine, flagged or not. The flag counter keeps its value.
    pub fn reveal_all_mines(&mut self) {
        for cell in self.grid.iter_mut().filter(|cell| cell.is_mine()) {
            cell.force_reveal();
        }
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.grid[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(0x5eed)
    }

    fn board(size: Coord2, mines: &[Coord2]) -> Board {
        Board::with_mines(size, mines).unwrap()
    }

    fn flagged_count(board: &Board) -> usize {
        board.iter_cells().filter(|cell| cell.is_flagged()).count()
    }

    #[test]
    fn new_board_is_hidden_and_unplaced() {
        let board = Board::new(GameConfig::new((9, 9), 10).unwrap()).unwrap();

        assert_eq!(board.rows(), 9);
        assert_eq!(board.cols(), 9);
        assert_eq!(board.num_mines(), 10);
        assert!(board.is_first_click());
        assert!(board.mine_positions().is_none());
        assert!(board.iter_cells().all(|cell| cell.is_hidden() && !cell.is_mine()));
        assert_eq!(board[(4, 7)].coords(), (4, 7));
    }

    #[test]
    fn with_mines_rejects_out_of_bounds() {
        assert_eq!(
            Board::with_mines((3, 3), &[(3, 0)]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn first_reveal_places_exact_mine_count_away_from_click() {
        let mut rng = rng();
        for _ in 0..50 {
            let mut board = Board::new(GameConfig::new((9, 9), 10).unwrap()).unwrap();

            let outcome = board.reveal_cell((4, 4), &mut rng);

            assert_ne!(outcome, RevealOutcome::HitMine);
            assert!(!board.is_first_click());
            assert!(!board[(4, 4)].is_mine());
            assert_eq!(board.iter_cells().filter(|cell| cell.is_mine()).count(), 10);

            let positions = board.mine_positions().unwrap();
            assert_eq!(positions.len(), 10);
            assert!(positions.iter().all(|&pos| board[pos].is_mine()));
        }
    }

    #[test]
    fn place_mines_only_once() {
        let mut rng = rng();
        let mut board = Board::new(GameConfig::new((5, 5), 5).unwrap()).unwrap();

        assert!(board.place_mines((0, 0), &mut rng));
        let layout = board.mine_positions().cloned();
        assert!(!board.place_mines((0, 0), &mut rng));
        assert_eq!(board.mine_positions().cloned(), layout);
    }

    #[test]
    fn adjacency_matches_neighbor_mines() {
        let mut rng = rng();
        for _ in 0..20 {
            let mut board = Board::new(GameConfig::new((16, 16), 40).unwrap()).unwrap();
            board.place_mines((0, 0), &mut rng);

            for cell in board.iter_cells() {
                let expected = neighbors(cell.coords(), board.size())
                    .filter(|&pos| board[pos].is_mine())
                    .count() as u8;
                if cell.is_mine() {
                    assert_eq!(cell.adjacent_mines(), None);
                } else {
                    assert_eq!(cell.adjacent_mines(), Some(expected));
                }
            }
        }
    }

    #[test]
    fn adjacency_clips_at_corners() {
        let board = board((3, 3), &[(0, 0), (2, 2)]);

        assert_eq!(board[(0, 1)].adjacent_mines(), Some(1));
        assert_eq!(board[(1, 1)].adjacent_mines(), Some(2));
        assert_eq!(board[(2, 0)].adjacent_mines(), Some(0));
        assert_eq!(board[(0, 2)].adjacent_mines(), Some(0));
    }

    #[test]
    fn reveal_out_of_bounds_is_noop() {
        let mut board = Board::new(GameConfig::new((3, 3), 1).unwrap()).unwrap();

        assert_eq!(board.reveal_cell((3, 0), &mut rng()), RevealOutcome::NoChange);
        assert_eq!(board.reveal_cell((0, 9), &mut rng()), RevealOutcome::NoChange);
        assert!(board.is_first_click());
    }

    #[test]
    fn reveal_mine_does_not_cascade() {
        let mut board = board((3, 3), &[(1, 1)]);

        assert_eq!(board.reveal_cell((1, 1), &mut rng()), RevealOutcome::HitMine);
        assert_eq!(board.revealed_count(), 1);
    }

    #[test]
    fn reveal_numbered_cell_does_not_cascade() {
        let mut board = board((3, 3), &[(2, 2)]);

        assert_eq!(board.reveal_cell((1, 1), &mut rng()), RevealOutcome::Revealed);
        assert_eq!(board.revealed_count(), 1);
    }

    #[test]
    fn reveal_again_is_noop() {
        let mut board = board((3, 3), &[(2, 2)]);
        board.reveal_cell((1, 1), &mut rng());

        assert_eq!(board.reveal_cell((1, 1), &mut rng()), RevealOutcome::NoChange);
    }

    #[test]
    fn flagged_cell_is_not_revealed() {
        let mut board = board((3, 3), &[(2, 2)]);
        board.toggle_flag((2, 2));

        assert_eq!(board.reveal_cell((2, 2), &mut rng()), RevealOutcome::NoChange);
        assert!(board[(2, 2)].is_flagged());
    }

    #[test]
    fn flood_fill_opens_zero_region_and_border() {
        let mut board = board((5, 5), &[(0, 0)]);

        assert_eq!(board.reveal_cell((4, 4), &mut rng()), RevealOutcome::Revealed);

        assert_eq!(board.revealed_count(), 24);
        assert!(board[(0, 0)].is_hidden());
        assert_eq!(board[(1, 1)].adjacent_mines(), Some(1));
        assert!(board[(1, 1)].is_revealed());
        assert!(board.check_win());
    }

    #[test]
    fn flood_fill_stops_at_numbered_border() {
        // mines split the board, leaving the right column behind a numbered wall
        let mut board = board((4, 4), &[(0, 2), (1, 2), (2, 2), (3, 2)]);

        board.reveal_cell((0, 0), &mut rng());

        for row in 0..4 {
            assert!(board[(row, 0)].is_revealed());
            assert!(board[(row, 1)].is_revealed());
            assert!(board[(row, 3)].is_hidden());
        }
        assert_eq!(board.revealed_count(), 8);
    }

    #[test]
    fn flood_fill_skips_flags() {
        let mut board = board((5, 5), &[(0, 0)]);
        board.toggle_flag((2, 2));

        board.reveal_cell((4, 4), &mut rng());

        assert!(board[(2, 2)].is_flagged());
        assert_eq!(board.revealed_count(), 23);
        assert!(!board.check_win());

        board.toggle_flag((2, 2));
        board.reveal_cell((2, 2), &mut rng());
        assert!(board.check_win());
    }

    #[test]
    fn flood_fill_terminates_on_largest_board() {
        let mut board = Board::new(GameConfig::new((255, 255), 0).unwrap()).unwrap();

        board.reveal_cell((127, 127), &mut rng());

        assert_eq!(board.revealed_count(), board.safe_cell_count());
        assert!(board.check_win());
    }

    #[test]
    fn toggle_flag_tracks_count() {
        let mut board = Board::new(GameConfig::new((9, 9), 10).unwrap()).unwrap();

        assert!(board.toggle_flag((0, 0)));
        assert!(board.toggle_flag((0, 1)));
        assert_eq!(board.flags_placed(), 2);
        assert_eq!(board.mines_left(), 8);

        assert!(!board.toggle_flag((0, 0)));
        assert_eq!(board.flags_placed(), 1);
        assert_eq!(flagged_count(&board), 1);
    }

    #[test]
    fn toggle_twice_has_no_net_effect() {
        let mut board = Board::new(GameConfig::new((9, 9), 10).unwrap()).unwrap();

        board.toggle_flag((3, 3));
        board.toggle_flag((3, 3));

        assert!(board[(3, 3)].is_hidden());
        assert_eq!(board.flags_placed(), 0);
    }

    #[test]
    fn toggle_flag_ignores_revealed_and_out_of_bounds() {
        let mut board = board((3, 3), &[(2, 2)]);
        board.reveal_cell((1, 1), &mut rng());

        assert!(!board.toggle_flag((1, 1)));
        assert!(!board.toggle_flag((5, 5)));
        assert_eq!(board.flags_placed(), 0);
        assert_eq!(flagged_count(&board), 0);
    }

    #[test]
    fn win_by_revealing_every_safe_cell() {
        let mut board = board((3, 3), &[(2, 2)]);
        let safe: Vec<_> = board.safe_unrevealed_cells();
        assert_eq!(safe.len(), 8);

        for (i, &coords) in safe.iter().enumerate() {
            assert!(!board.check_win(), "won before revealing cell {i}");
            board.cell_mut(coords).unwrap().reveal();
        }

        assert!(board.check_win());
    }

    #[test]
    fn unplaced_board_is_never_won() {
        let mut board = Board::new(GameConfig::new((9, 9), 10).unwrap()).unwrap();
        assert!(!board.check_win());

        board.toggle_flag((0, 0));
        assert!(!board.check_win());
    }

    #[test]
    fn win_by_flagging_every_mine() {
        let mut board = board((3, 3), &[(0, 0), (2, 2)]);

        board.toggle_flag((0, 0));
        assert!(!board.check_win());
        board.toggle_flag((2, 2));
        assert!(board.check_win());
    }

    #[test]
    fn misflag_blocks_flag_win() {
        let mut board = board((3, 3), &[(0, 0), (2, 2)]);

        board.toggle_flag((0, 0));
        board.toggle_flag((2, 2));
        board.toggle_flag((1, 1));

        assert!(!board.check_win());
    }

    #[test]
    fn misflag_does_not_block_reveal_win() {
        let mut board = board((3, 3), &[(2, 2)]);
        board.toggle_flag((2, 2));
        board.toggle_flag((0, 0));
        assert!(!board.check_win());

        for coords in board.safe_unrevealed_cells() {
            board.reveal_cell(coords, &mut rng());
        }
        assert!(!board.check_win());

        board.toggle_flag((0, 0));
        board.reveal_cell((0, 0), &mut rng());
        assert!(board.check_win());
    }

    #[test]
    fn hint_candidates_exclude_mines_revealed_and_flagged() {
        let mut board = board((3, 3), &[(2, 2)]);
        board.reveal_cell((1, 1), &mut rng());
        board.toggle_flag((0, 0));

        let candidates = board.safe_unrevealed_cells();

        assert_eq!(candidates.len(), 6);
        assert!(!candidates.contains(&(2, 2)));
        assert!(!candidates.contains(&(1, 1)));
        assert!(!candidates.contains(&(0, 0)));
    }

    #[test]
    fn hint_candidates_empty_when_cleared() {
        let mut board = board((3, 3), &[(2, 2)]);
        board.reveal_cell((0, 0), &mut rng());

        assert!(board.safe_unrevealed_cells().is_empty());
    }

    #[test]
    fn reveal_all_mines_keeps_flag_count_and_safe_cells() {
        let mut board = board((3, 3), &[(0, 0), (2, 2)]);
        board.toggle_flag((0, 0));
        board.toggle_flag((1, 1));

        board.reveal_all_mines();

        assert!(board[(0, 0)].is_revealed());
        assert!(board[(2, 2)].is_revealed());
        assert!(board[(1, 1)].is_flagged());
        assert!(board[(0, 1)].is_hidden());
        assert_eq!(board.flags_placed(), 2);
    }

    #[test]
    fn board_snapshot_serializes() {
        let board = board((2, 2), &[(1, 1)]);

        let json = serde_json::to_string(&board).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();

        assert_eq!(back, board);
    }
}
