//! Hoplink's core orchestration: short-code generation, the cache-aside
//! resolver, and the expired-link reaper.
//!
//! The [`Resolver`] implements creation (generate, collision check,
//! persist, prime cache) and lookup (cache-aside read with authoritative
//! expiration checks). The [`Reaper`] drains expired records from both
//! the store and the cache on a dual-cadence schedule.

pub mod config;
pub mod error;
pub mod generator;
pub mod reaper;
pub mod resolver;
pub mod schedule;

pub use config::{LinkConfig, ReaperConfig};
pub use error::LinkError;
pub use generator::{CodeGenerator, HashCodeGenerator, RandomCodeGenerator};
pub use reaper::{LinkStats, Reaper, SweepReport};
pub use resolver::Resolver;
pub use schedule::ReaperSchedule;
