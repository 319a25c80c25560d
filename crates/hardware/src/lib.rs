//! Cycle-level DRAM memory subsystem simulator.
//!
//! Models controllers, channels, ranks and banks of a DRAM subsystem and
//! the JEDEC-style timing constraints between protocol commands, to study
//! how command scheduling shapes read/write completion latency. The model
//! is single threaded and event driven: one virtual timeline, FIFO event
//! dispatch within a cycle, and self-re-arming loops instead of recursion.
//!
//! Typical use:
//!
//! ```
//! use dramsim::config::Config;
//! use dramsim::mem::system::System;
//!
//! let mut system = System::new(&Config::default()).unwrap();
//! let request = system.read(0x240).unwrap();
//! system.run_to_idle();
//! assert!(request.is_complete());
//! ```

pub mod common;
pub mod config;
pub mod mem;
pub mod sim;
pub mod stats;

pub use common::error::{AccessError, ConfigError};
pub use config::Config;
pub use mem::system::System;
