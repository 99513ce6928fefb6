//! Application layer: document handling and use cases
//!
//! This layer maps JSON documents onto the domain and back, driven by settings.

pub mod error;
pub mod error_ext;
pub mod service;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::ResultExt;
pub use service::TreeService;
