pub mod error;

pub use self::error::{AccessError, ConfigError};
