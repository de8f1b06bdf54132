//! Application layer: view state, orchestration and intent dispatch.
//!
//! ```text
//! View → Intent → dispatch → BriefOrchestrator → BriefState → FeedViewModel → View
//!                                  │        ↑
//!                          BriefProvider   CacheStore
//! ```
//!
//! # Modules
//!
//! - [`handler`]: Maps user intents onto orchestrator operations
//! - [`modes`]: Browsing and search view modes
//! - [`orchestrator`]: Cache-first loading, search and fetch lifecycle
//! - [`state`]: View state container and view model computation

pub mod handler;
pub mod modes;
pub mod orchestrator;
pub mod state;

pub use handler::{dispatch, Intent};
pub use modes::ViewMode;
pub use orchestrator::BriefOrchestrator;
pub use state::{BriefState, ViewError, ViewErrorKind};
