//! Setting handlers for different configuration patterns.

pub mod endpoint;
pub mod simple;
pub mod user_env;

pub use endpoint::*;
pub use simple::*;
pub use user_env::*;
