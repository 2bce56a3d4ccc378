use serde::Serialize;

use super::{check_id, ModelError};

/// A project as stored in the `project` table.
///
/// The id is `0` until the persistence layer assigns one on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Project {
    id: i32,
    /// The name of the project. Unique across all projects.
    pub name: String,
    /// A one-line summary shown in project lists.
    pub brief_description: String,
    /// The full description of the project.
    pub description: String,
}

impl Project {
    /// Creates an unsaved project.
    pub fn new(
        name: impl Into<String>,
        brief_description: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            brief_description: brief_description.into(),
            description: description.into(),
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    /// Sets the id. Negative ids are rejected.
    pub fn set_id(&mut self, id: i32) -> Result<(), ModelError> {
        self.id = check_id("id", id)?;
        Ok(())
    }

    /// Returns `true` when the project has not been persisted yet.
    pub fn is_new(&self) -> bool {
        self.id == 0
    }
}
