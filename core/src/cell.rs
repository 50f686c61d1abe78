use serde::{Deserialize, Serialize};

/// Player-visible state of a single board cell.
///
/// While play is running a cell is `Hidden`, `Flagged` or `Open`. The other
/// variants are produced by the terminal disclosure pass, so mine positions
/// only become observable once the game is won or lost: `Exploded` marks the
/// revealed mine, `Mine` an unflagged mine after a loss, `AutoFlag` a mine
/// flagged on the player's behalf after a win, and `IncorrectFlag` a flag
/// that turned out to sit on a safe cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Hidden,
    Open(u8),
    Flagged,
    Exploded,
    Mine,
    AutoFlag,
    IncorrectFlag,
}

impl Cell {
    /// Whether the cell has not been opened during play.
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }

    // whether the cell still renders as covered
    pub const fn is_covered(self) -> bool {
        use Cell::*;
        match self {
            Hidden => true,
            Open(_) => false,
            Flagged => true,
            Exploded => false,
            Mine => false,
            AutoFlag => true,
            IncorrectFlag => true,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Hidden
    }
}
