//! Engine error types
//!
//! Every error here is recoverable: the caller re-prompts and nothing has been
//! mutated. Data loading has its own error so the engine never sees I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used by engine operations
pub type Result<T> = std::result::Result<T, GameError>;

/// Any error an engine operation can return
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    IllegalAction(#[from] IllegalActionError),
}

/// Input that is well-formed but not acceptable right now
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("hero name cannot be empty")]
    EmptyName,

    #[error("a hero named '{0}' already exists")]
    DuplicateName(String),

    #[error("cannot allocate {requested} points, only {available} available")]
    AllocationExceedsPool { requested: u32, available: u32 },

    #[error("{0} attribute points must be allocated first")]
    UnallocatedPoints(u32),

    #[error("not enough chaos for {ability}: costs {cost:.1}, have {available:.1}")]
    InsufficientResource {
        ability: String,
        cost: f32,
        available: f32,
    },

    #[error("no ability in slot {0}")]
    NoSuchAbility(usize),

    #[error("no potion in slot {0}")]
    NoSuchPotion(usize),

    #[error("no reward in slot {0}")]
    NoSuchReward(usize),

    #[error("potion belt is full ({capacity} potions)")]
    InventoryFull { capacity: usize },
}

/// An operation attempted in a state that does not allow it
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IllegalActionError {
    #[error("the encounter is already over")]
    EncounterResolved,

    #[error("the encounter is not waiting for a hero action")]
    NotAwaitingAction,

    #[error("the encounter has not been resolved yet")]
    EncounterUnresolved,

    #[error("that encounter was not issued by this run")]
    ForeignEncounter,

    #[error("{0} is dead and cannot act")]
    CharacterDead(String),

    #[error("{0} has no lives remaining")]
    NoLivesRemaining(String),

    #[error("the run is already over")]
    RunOver,

    #[error("the run is still in progress")]
    RunInProgress,

    #[error("this run belongs to {expected}, not {actual}")]
    WrongHero { expected: String, actual: String },

    #[error("the reward offer is closed")]
    OfferClosed,

    #[error("no hero named '{0}'")]
    UnknownHero(String),
}

/// Errors raised while loading data files
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("{0} table is empty")]
    EmptyTable(&'static str),

    #[error("rule {0} must lie between 0 and 1")]
    InvalidRule(&'static str),
}
