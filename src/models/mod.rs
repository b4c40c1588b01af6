//! Domain models for buildcost.
//!
//! # Core Concepts
//!
//! - [`CostBreakdown`]: Derived decomposition of an estimate into base
//!   structural cost and amenity cost. Never stored on its own.
//! - [`Project`]: A persisted snapshot of one estimation request plus its
//!   computed breakdown. Created once, never updated or deleted.
//! - [`MaterialGrade`] and [`Amenity`]: The fixed enumerations priced by the
//!   rate card.

mod estimate;
mod project;

pub use estimate::*;
pub use project::*;
