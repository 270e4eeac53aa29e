//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Commands mutate a draw through the session store; queries read snapshots.

mod app;
pub mod handlers;
mod sweeper;

pub use app::DrawApp;
pub use handlers::{
    CardChoice, CompleteDrawCommand, CompleteDrawHandler, CompleteDrawResult, DrawView,
    GetDrawHandler, GetDrawQuery, GetReadingHandler, GetReadingQuery, RevealCardCommand,
    RevealCardHandler, RevealCardResult, ShuffleDeckCommand, ShuffleDeckHandler,
    ShuffleDeckResult, StartDrawCommand, StartDrawHandler, StartDrawResult, ToggleCardCommand,
    ToggleCardHandler, ToggleCardResult,
};
pub use sweeper::{spawn_session_sweeper, SessionSweeper};
