//! Palaver is a command-line client for a conversational chat backend.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`api`] holds the wire types and the HTTP client: endpoint building,
//!   bearer authentication, error normalization and the typed backend
//!   operations (login, completions, feedback, conversation listing).
//! - [`core`] owns client-side state: the streaming completion reader,
//!   observable stores, realtime session parameters, the prompt playground,
//!   palettes, token storage and the on-disk configuration.
//! - [`cli`] parses arguments and drives the other layers from the terminal.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod logging;
pub mod utils;
