//! View layer contract and plain-text rendering.
//!
//! ```text
//! BriefState → compute_viewmodel → FeedViewModel → render → text
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable feed state
//! - [`renderer`]: Plain-text renderer used by the binary

pub mod renderer;
pub mod viewmodel;

pub use renderer::render;
pub use viewmodel::{CalendarInfo, FeedViewModel, HeaderInfo, Panel};
