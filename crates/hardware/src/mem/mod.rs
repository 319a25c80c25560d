//! The simulated DRAM memory subsystem.
//!
//! Ownership is strictly hierarchical:
//! [`System`](system::System) owns controllers, a
//! [`Controller`](controller::Controller) owns channels, a
//! [`Channel`](channel::Channel) owns ranks, a [`Rank`](rank::Rank) owns
//! banks. Requests are the one shared handle, referenced by the caller and
//! by every command they decompose into.

pub mod address;
pub mod bank;
pub mod channel;
pub mod command;
pub mod controller;
pub mod rank;
pub mod request;
pub mod scheduler;
pub mod system;
pub mod timing;
