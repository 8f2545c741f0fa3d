pub mod completion;
pub mod config;
pub mod playground;
pub mod session;
pub mod store;
pub mod theme;
pub mod token;
