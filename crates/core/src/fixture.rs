//! Bundled seed data used when the local cache is empty

use serde::Deserialize;

use crate::project::Project;
use crate::task::Task;
use crate::Result;

const SEED_JSON: &str = include_str!("../fixtures/seed.json");

/// Initial collections shipped with the application
#[derive(Debug, Clone, Deserialize)]
pub struct SeedData {
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
}

/// Parse the bundled fixture
pub fn seed() -> Result<SeedData> {
    Ok(serde_json::from_str(SEED_JSON)?)
}
