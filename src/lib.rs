//! Social key recovery
//!
//! A secret is split among guardians with Shamir secret sharing over a
//! 257-bit prime field. Any `threshold` of them can reconstruct it through a
//! [`session::RecoverySession`]; fewer learn nothing.
//!
//! Layers, leaves first: [`field`], [`codec`], [`split`], [`reconstruct`],
//! [`registry`], [`session`], with [`commands`] as the byte-level entry points.

pub mod codec;
pub mod commands;
pub mod domain;
pub mod error;
pub mod events;
pub mod field;
pub mod reconstruct;
pub mod registry;
pub mod session;
pub mod settings;
pub mod split;

pub use error::{RecoveryError, Result};
pub use registry::{AccountId, AccountRegistry};
pub use session::{RecoveredSecret, RecoverySession, SessionState};
