use chrono::prelude::*;
use hashbrown::HashSet;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress
/// - InProgress -> Won
/// - InProgress -> Lost
///
/// `Won` and `Lost` are mutually exclusive terminal states; a first reveal
/// that ends the game still passes through `InProgress` on the way.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameState {
    /// Initial state
    NotStarted,
    /// Game started
    InProgress,
    /// Game ended and player won
    Won,
    /// Game ended and player lost
    Lost,
}

impl GameState {
    /// Indicates the game has not started yet
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// One game from deal to win or loss.
///
/// The engine owns every grid; callers receive `Copy` cell views, never
/// references into engine storage. All calls are synchronous and run to
/// completion, cascades included, so a concurrent host must serialize access
/// per game value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    layout: MineLayout,
    grid: Array2<Cell>,
    open_count: CellCount,
    flag_count: CellCount,
    state: GameState,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl Game {
    /// Deal a fresh board for `config`, mines drawn from entropy. The
    /// previous game value, if any, is simply dropped by the caller.
    pub fn new_game(config: GameConfig) -> Result<Game> {
        Self::with_seed(config, rand::random())
    }

    /// Deal a fresh board with a fixed seed, for deterministic replays.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Game> {
        let config = GameConfig::new(config.size, config.mines)?;
        Ok(Self::new(
            RandomMineLayoutGenerator::new(seed).generate(config),
        ))
    }

    /// Wrap a prebuilt layout.
    pub fn new(layout: MineLayout) -> Game {
        let size = layout.size();
        Self {
            layout,
            grid: Array2::default(size.to_nd_index()),
            open_count: 0,
            flag_count: 0,
            state: Default::default(),
            started_at: None,
            ended_at: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_final()
    }

    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.layout.mine_count()
    }

    /// How many mines have not been flagged yet; negative when over-flagged.
    pub fn mines_left(&self) -> isize {
        (self.layout.mine_count() as isize) - (self.flag_count as isize)
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    /// Safe cells still to open; reaching zero wins the game.
    pub fn safe_cells_left(&self) -> CellCount {
        self.layout.safe_count() - self.open_count
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.grid[coords.to_nd_index()]
    }

    /// Timer-start edge for the embedding application.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Timer-stop edge for the embedding application.
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// How many seconds have passed since game started, 0 if it hasn't
    /// started, frozen once it ends.
    pub fn elapsed_secs(&self) -> u32 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or_else(Utc::now) - started_at)
                .num_seconds()
                .max(0) as u32
        } else {
            0
        }
    }

    /// Reveal the cell at `coords`, cascading through zero-count regions.
    ///
    /// Flagged and already-open cells are left alone. After the game has
    /// ended every call is a no-op so the embedding application can keep
    /// dispatching gestures without special-casing.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.layout.validate_coords(coords)?;

        if self.state.is_final() {
            return Ok(RevealOutcome::NoChange);
        }

        // the first reveal gesture starts the clock, even on a flagged cell
        self.mark_started();

        if matches!(self.grid[coords.to_nd_index()], Cell::Hidden) {
            Ok(self.reveal_single_cell(coords))
        } else {
            Ok(RevealOutcome::NoChange)
        }
    }

    /// Whether `coords` is an opened number whose flagged neighbors satisfy
    /// it, making a chord reveal meaningful.
    pub fn is_chordable(&self, coords: Coord2) -> bool {
        if self.state.is_final() {
            return false;
        }

        if let Cell::Open(count) = self.grid[coords.to_nd_index()] {
            count > 0 && count == self.count_flagged_neighbors(coords)
        } else {
            false
        }
    }

    /// Open every non-flagged neighbor of a satisfied number at once. On any
    /// other cell this behaves like a plain single-cell reveal. Wrongly
    /// placed flags make this lose the game, as usual.
    pub fn chord_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.layout.validate_coords(coords)?;

        if self.state.is_final() {
            return Ok(RevealOutcome::NoChange);
        }

        self.mark_started();

        Ok(match self.grid[coords.to_nd_index()] {
            Cell::Open(count) if count == self.count_flagged_neighbors(coords) => self
                .layout
                .iter_neighbors(coords)
                .map(|neighbor_coords| self.reveal_single_cell(neighbor_coords))
                .reduce(core::ops::BitOr::bitor)
                .unwrap_or(RevealOutcome::NoChange),
            _ => self.reveal_single_cell(coords),
        })
    }

    /// Flag every unrevealed neighbor of a number whose covered neighbor
    /// count matches it exactly.
    pub fn chord_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.layout.validate_coords(coords)?;

        if self.state.is_final() {
            return Ok(FlagOutcome::NoChange);
        }

        let Cell::Open(count) = self.grid[coords.to_nd_index()] else {
            return Ok(FlagOutcome::NoChange);
        };

        if count != self.count_unrevealed_neighbors(coords) {
            return Ok(FlagOutcome::NoChange);
        }

        let mut updated = false;
        for pos in self.layout.iter_neighbors(coords) {
            if matches!(self.grid[pos.to_nd_index()], Cell::Hidden) {
                self.grid[pos.to_nd_index()] = Cell::Flagged;
                self.flag_count += 1;
                updated = true;
            }
        }

        Ok(if updated {
            FlagOutcome::Changed
        } else {
            FlagOutcome::NoChange
        })
    }

    /// Toggle the flag on a covered cell; open cells are left untouched.
    ///
    /// Returns the remaining-mine estimate (`total mines − flags`) for the
    /// mine counter display. Never touches the open count, the game state or
    /// the clock.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<isize> {
        let coords = self.layout.validate_coords(coords)?;

        if self.state.is_final() {
            return Ok(self.mines_left());
        }

        match self.grid[coords.to_nd_index()] {
            Cell::Hidden => {
                self.grid[coords.to_nd_index()] = Cell::Flagged;
                self.flag_count += 1;
            }
            Cell::Flagged => {
                self.grid[coords.to_nd_index()] = Cell::Hidden;
                self.flag_count -= 1;
            }
            _ => {}
        }

        Ok(self.mines_left())
    }

    fn reveal_single_cell(&mut self, coords: Coord2) -> RevealOutcome {
        let cell = self.grid[coords.to_nd_index()];
        let has_mine = self.layout[coords];

        match (cell, has_mine) {
            (Cell::Hidden, true) => {
                self.grid[coords.to_nd_index()] = Cell::Exploded;
                self.mark_ended(false);
                RevealOutcome::HitMine
            }
            (Cell::Hidden, false) => {
                let count = self.layout.adjacent_count(coords);
                self.grid[coords.to_nd_index()] = Cell::Open(count);
                self.open_count += 1;
                log::debug!("opened {:?}, adjacent mines: {}", coords, count);

                if count == 0 {
                    self.flood_open(coords);
                }

                if self.open_count == self.layout.safe_count() {
                    self.mark_ended(true);
                    RevealOutcome::Won
                } else {
                    RevealOutcome::Revealed
                }
            }
            _ => RevealOutcome::NoChange,
        }
    }

    /// Work-list cascade from a zero-count cell. The visited set plus the
    /// covered-cell filter means each cell opens at most once, so the loop
    /// terminates even on a board that is zero everywhere.
    fn flood_open(&mut self, start: Coord2) {
        let mut visited: HashSet<Coord2> = HashSet::from_iter([start]);
        let mut to_visit: VecDeque<Coord2> = self
            .layout
            .iter_neighbors(start)
            .filter(|&pos| matches!(self.grid[pos.to_nd_index()], Cell::Hidden))
            .collect();

        while let Some(visit_coords) = to_visit.pop_front() {
            if !visited.insert(visit_coords) {
                continue;
            }

            // flagged cells stay covered, opened cells are not re-entered
            if !matches!(self.grid[visit_coords.to_nd_index()], Cell::Hidden) {
                continue;
            }

            let visit_count = self.layout.adjacent_count(visit_coords);
            self.grid[visit_coords.to_nd_index()] = Cell::Open(visit_count);
            self.open_count += 1;
            log::trace!(
                "cascade opened {:?}, adjacent mines: {}",
                visit_coords,
                visit_count
            );

            if visit_count == 0 {
                to_visit.extend(
                    self.layout
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| matches!(self.grid[pos.to_nd_index()], Cell::Hidden))
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.layout
            .iter_neighbors(coords)
            .filter(|&pos| self.grid[pos.to_nd_index()] == Cell::Flagged)
            .count()
            .try_into()
            .unwrap()
    }

    fn count_unrevealed_neighbors(&self, coords: Coord2) -> u8 {
        self.layout
            .iter_neighbors(coords)
            .filter(|&pos| self.grid[pos.to_nd_index()].is_unrevealed())
            .count()
            .try_into()
            .unwrap()
    }

    fn mark_started(&mut self) {
        if self.state.is_initial() {
            let now = Utc::now();
            log::debug!("game started at {}", now);
            self.started_at = Some(now);
            self.state = GameState::InProgress;
        }
    }

    fn mark_ended(&mut self, won: bool) {
        if self.state.is_final() {
            return;
        }

        let now = Utc::now();
        log::debug!("game {} at {}", if won { "won" } else { "lost" }, now);
        self.ended_at = Some(now);
        self.state = if won { GameState::Won } else { GameState::Lost };
        self.disclose_mines(won);
    }

    /// Terminal disclosure pass. After a loss every unflagged mine becomes
    /// visible and flags on safe cells are called out; after a win the
    /// leftover mines are flagged on the player's behalf. Flags that sat on
    /// mines stay as they were.
    fn disclose_mines(&mut self, won: bool) {
        let (rows, cols) = self.layout.size();
        for row in 0..rows {
            for col in 0..cols {
                let coords = (row, col);
                let cell = self.grid[coords.to_nd_index()];
                if self.layout[coords] {
                    if cell == Cell::Hidden {
                        self.grid[coords.to_nd_index()] = if won {
                            self.flag_count += 1;
                            Cell::AutoFlag
                        } else {
                            Cell::Mine
                        };
                    }
                } else if cell == Cell::Flagged {
                    self.grid[coords.to_nd_index()] = Cell::IncorrectFlag;
                }
            }
        }
    }
}
