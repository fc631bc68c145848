pub mod context;
pub mod flows;
pub mod generate;
pub mod pipeline;
pub mod search;
pub mod sinks;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
pub mod validate;
