//! Project module
//!
//! A Project groups tasks. Tasks reference their project by id.

mod model;

pub use model::*;
