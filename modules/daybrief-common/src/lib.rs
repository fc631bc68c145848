pub mod config;
pub mod error;
pub mod report;
pub mod types;

pub use config::Config;
pub use error::{BriefError, ProviderError};
pub use report::*;
pub use types::*;
