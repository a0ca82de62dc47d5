//! Game module - hero roster, dungeon runs and event narration

pub mod events;
pub mod roster;
pub mod run;

pub use events::{EventSink, FnSink, GameEvent, JsonLinesSink, LogSink, NullSink};
pub use roster::Roster;
pub use run::{Campaign, EncounterResolution, Run, RunOutcome, RunStatus, RunSummary};
