pub mod default;
pub mod error;
pub mod factory;
pub mod hls_extractor;
pub mod platform_extractor;
pub mod platforms;
pub mod utils;

pub use default::{ClientOptions, build_client, default_client};
pub use factory::ExtractorFactory;
