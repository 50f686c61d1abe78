use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board size and mine count do not form a playable board")]
    InvalidConfiguration,
    #[error("Coordinates outside the board")]
    InvalidCoordinate,
}

pub type Result<T> = core::result::Result<T, GameError>;
