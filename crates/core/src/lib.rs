#![forbid(unsafe_code)]

pub mod autofill;
pub mod model;
pub mod progress;
pub mod snapshot;
pub mod store;
pub mod time;

pub use autofill::auto_fill;
pub use progress::{SystemProgress, is_complete, overview, progress_percent};
pub use store::ProgressStore;
pub use time::Clock;
