//! Minesweeper board engine: mine placement, adjacency counts, cascading
//! reveals, flag bookkeeping and win/loss detection. Rendering, menus and
//! input-mode handling belong to the embedding application, which drives the
//! engine one synchronous call at a time and reads back cell views.

use core::ops::{BitOr, Index};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod types;

/// Board shape plus mine budget for a square `size × size` game.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Validated constructor: the board needs at least one row and, since a
    /// fully mined board can never be won, at least one safe cell.
    pub fn new(size: Coord, mines: CellCount) -> Result<Self> {
        if size == 0 || mines >= mult(size, size) {
            return Err(GameError::InvalidConfiguration);
        }
        Ok(Self::new_unchecked(size, mines))
    }

    /// 10×10 board with 10 mines.
    pub const fn beginner() -> Self {
        Self::new_unchecked(10, 10)
    }

    /// 15×15 board with 20 mines.
    pub const fn intermediate() -> Self {
        Self::new_unchecked(15, 20)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size, self.size)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

/// Immutable mine placement for one game.
///
/// The adjacency plane is computed once, after every mine is down, and holds
/// for each cell the number of mines among its up-to-8 in-bounds neighbors.
/// Entries under mines are never consulted: revealing a mine is terminal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mines: Array2<bool>,
    adjacency: Array2<u8>,
    count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mines: Array2<bool>) -> Self {
        let size = dim_to_coords(&mines);
        let count = mines
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap();

        let mut adjacency: Array2<u8> = Array2::zeros(mines.dim());
        for ((row, col), &is_mine) in mines.indexed_iter() {
            if is_mine {
                for pos in neighbors((row as Coord, col as Coord), size) {
                    adjacency[pos.to_nd_index()] += 1;
                }
            }
        }

        Self {
            mines,
            adjacency,
            count,
        }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mines: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoordinate);
            }
            mines[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(mines))
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoordinate)
        }
    }

    pub fn size(&self) -> Coord2 {
        dim_to_coords(&self.mines)
    }

    pub fn safe_count(&self) -> CellCount {
        self.total_cells() - self.count
    }

    pub fn total_cells(&self) -> CellCount {
        self.mines.len().try_into().unwrap()
    }

    pub fn mine_count(&self) -> CellCount {
        self.count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Stored adjacency count for `coords`.
    pub fn adjacent_count(&self, coords: Coord2) -> u8 {
        self.adjacency[coords.to_nd_index()]
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + use<> {
        neighbors(coords, self.size())
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mines[coords.to_nd_index()]
    }
}

/// Outcome of a flag operation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FlagOutcome {
    NoChange,
    Changed,
}

impl FlagOutcome {
    /// Whether this outcome could have caused an update to the board view.
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Outcome of a reveal operation, possibly merged across a whole cascade or
/// chord.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the board view.
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// Merges per-cell outcomes when several cells open in one call: a hit mine
/// dominates, then a win, then a plain reveal.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Won, _) => Won,
            (_, Won) => Won,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_empty_board() {
        assert_eq!(GameConfig::new(0, 0), Err(GameError::InvalidConfiguration));
    }

    #[test]
    fn config_requires_one_safe_cell() {
        assert_eq!(GameConfig::new(3, 9), Err(GameError::InvalidConfiguration));
        assert!(GameConfig::new(3, 8).is_ok());
        assert!(GameConfig::new(1, 0).is_ok());
    }

    #[test]
    fn presets_are_valid_configs() {
        for preset in [GameConfig::beginner(), GameConfig::intermediate()] {
            assert!(GameConfig::new(preset.size, preset.mines).is_ok());
        }
        assert_eq!(GameConfig::beginner().total_cells(), 100);
        assert_eq!(GameConfig::intermediate().safe_cells(), 205);
    }

    #[test]
    fn layout_rejects_out_of_bounds_mines() {
        assert_eq!(
            MineLayout::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GameError::InvalidCoordinate)
        );
    }

    #[test]
    fn adjacency_matches_brute_force() {
        let mines = &[(0, 0), (1, 2), (2, 1)];
        let layout = MineLayout::from_mine_coords((3, 3), mines).unwrap();

        for row in 0..3 {
            for col in 0..3 {
                let expected = neighbors((row, col), (3, 3))
                    .filter(|pos| mines.contains(pos))
                    .count() as u8;
                assert_eq!(
                    layout.adjacent_count((row, col)),
                    expected,
                    "mismatch at ({row}, {col})"
                );
            }
        }
    }

    #[test]
    fn corner_adjacency_sees_reduced_neighborhood() {
        // all three neighbors of the (0, 0) corner hold mines
        let layout = MineLayout::from_mine_coords((3, 3), &[(0, 1), (1, 0), (1, 1)]).unwrap();
        assert_eq!(layout.adjacent_count((0, 0)), 3);
    }

    #[test]
    fn lone_safe_cell_sees_all_eight_mines() {
        let mines: Vec<Coord2> = (0..3)
            .flat_map(|row| (0..3).map(move |col| (row, col)))
            .filter(|&pos| pos != (1, 1))
            .collect();
        let layout = MineLayout::from_mine_coords((3, 3), &mines).unwrap();

        assert_eq!(layout.mine_count(), 8);
        assert_eq!(layout.safe_count(), 1);
        assert_eq!(layout.adjacent_count((1, 1)), 8);
    }

    #[test]
    fn reveal_outcome_merge_prefers_worst_news() {
        use RevealOutcome::*;
        assert_eq!(Revealed | HitMine, HitMine);
        assert_eq!(Won | NoChange, Won);
        assert_eq!(NoChange | NoChange, NoChange);
        assert_eq!(HitMine | Won, HitMine);

        assert!(!NoChange.has_update());
        assert!(Won.has_update());
        assert!(!FlagOutcome::NoChange.has_update());
        assert!(FlagOutcome::Changed.has_update());
    }
}
