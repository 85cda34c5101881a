//! Core data models for the crawl engine.

mod crawl;
mod ids;
mod progress;
mod status;
mod time_point;

pub use crawl::*;
pub use ids::*;
pub use progress::*;
pub use status::*;
pub use time_point::*;
