//! Field resolution and value orchestration for fieldcraft.
//!
//! # Architecture
//!
//! - [`rules`]: assignment rule evaluation (AND within a rule group, OR across groups)
//! - [`resolve`]: the flat field map for a context, last applying group wins
//! - [`prime`]: one batched attachment lookup per read
//! - [`FieldService`]: the read and write paths over the collaborator stores
//!
//! Field groups are passed in explicitly; the engine holds no global registry.

mod config;
mod error;
mod media;
mod resolve;
pub mod rules;
mod service;

pub use config::{CollisionPolicy, EngineConfig};
pub use error::{EngineError, EngineResult};
pub use media::prime;
pub use resolve::{applicable_groups, resolve};
pub use rules::{field_group_applies, group_matches, matches};
pub use service::{Collaborators, FieldService, WriteSummary};
