//! Domain model (config, state, errors).

pub mod config;
pub mod errors;
pub mod state;

pub use self::config::BackoffConfig;
pub use self::errors::BackoffError;
pub use self::state::BackoffState;
