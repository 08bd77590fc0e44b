//! Parts and Selections
//!
//! Value types describing the parts a user picked. Everything here is plain data;
//! evaluation lives in `analyzer` and `power`.

pub mod schema;
pub mod specs;

pub use schema::*;
pub use specs::{SpecValue, Specifications};
