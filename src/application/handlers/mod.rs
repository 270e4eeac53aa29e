//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod draw;

pub use draw::{
    // Commands and results
    CardChoice, CompleteDrawCommand, CompleteDrawResult, RevealCardCommand, RevealCardResult,
    ShuffleDeckCommand, ShuffleDeckResult, StartDrawCommand, StartDrawResult,
    ToggleCardCommand, ToggleCardResult,
    // Queries and views
    DrawView, GetDrawQuery, GetReadingQuery,
    // Handlers
    CompleteDrawHandler, GetDrawHandler, GetReadingHandler, RevealCardHandler,
    ShuffleDeckHandler, StartDrawHandler, ToggleCardHandler,
};
