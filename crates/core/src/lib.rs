//! Domain core for SkillStack learning progress tracking.
//!
//! Holds the entity types, the skill/subtopic status state machines, the
//! hours-allocation rule, the category oracle, aggregation math, the
//! repository traits the storage layer implements, and the progress engine
//! that orchestrates them.

pub mod aggregation;
pub mod allocation;
pub mod certificate;
pub mod engine;
pub mod error;
pub mod memory;
pub mod oracle;
pub mod session;
pub mod skill;
pub mod status;
pub mod store;
pub mod subtopic;
pub mod types;
pub mod user;
