mod client;
mod error;
pub mod query;
mod retry;

pub use client::*;
pub use error::*;
pub use query::{ParamValue, QueryParams};
pub use retry::RetryPolicy;
