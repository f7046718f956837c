//! Data models for the Equipe member and activity tracker.
//!
//! Serialized in camelCase so both backends and the REST surface share one wire shape.

mod activity;
mod member;

pub use activity::*;
pub use member::*;
