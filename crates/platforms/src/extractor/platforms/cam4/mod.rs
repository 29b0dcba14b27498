mod builder;
pub mod flaresolverr;
pub mod models;

pub use builder::{Cam4, LiveStream, URL_REGEX};
pub use flaresolverr::FlareSolverr;
pub use models::{PerformerAvailability, PerformerReport, PerformerStatus, StreamMetadata};
