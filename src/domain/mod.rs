//! Domain types for guardian-based key recovery
//!
//! Validated newtypes used across splitting, registration and recovery:
//! - [`Threshold`] - Minimum shares required for reconstruction (1..=255)
//! - [`ShareIndex`] - 1-based x-coordinate of a share (1..=255)
//! - [`ShareCount`] - Number of guardians receiving a share (1..=255)
//! - [`SplitConfig`] - Validated threshold and share count pair
//! - [`GuardianId`], [`Secret`], [`Share`], [`Label`]

mod config;
mod guardian;
mod label;
mod secret;
mod share;
mod share_count;
mod share_index;
mod threshold;

pub use config::SplitConfig;
pub use guardian::{GUARDIAN_ID_BYTES, GuardianId};
pub use label::Label;
pub use secret::{SECRET_BYTES, Secret};
pub use share::Share;
pub use share_count::ShareCount;
pub use share_index::ShareIndex;
pub use threshold::Threshold;
