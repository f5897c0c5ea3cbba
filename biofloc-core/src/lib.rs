pub mod analysis;
pub mod error;
pub mod metrics;
pub mod population;
pub mod store;

pub use error::{BioflocError, ErrorKind, Result};
