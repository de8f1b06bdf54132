//! Infrastructure layer for filesystem locations and time.

pub mod clock;
pub mod paths;

pub use clock::{Clock, FixedClock, SystemClock};
pub use paths::{expand_tilde, get_data_dir};
