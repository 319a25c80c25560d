pub mod engine;
pub mod loader;

pub use self::engine::{Event, EventQueue};
