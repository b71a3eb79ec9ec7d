//! Task module
//!
//! This module contains task-related types.

mod model;

pub use model::*;
