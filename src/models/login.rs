use serde::Serialize;

use super::{check_id, ModelError};

/// A stored username/password pair.
///
/// The password is hashed by whoever creates the row; this type only ever
/// compares it for equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Login {
    id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl Login {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: 0,
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn set_id(&mut self, id: i32) -> Result<(), ModelError> {
        self.id = check_id("id", id)?;
        Ok(())
    }

    /// Checks the supplied credentials against this login.
    ///
    /// A blank username or password never matches.
    pub fn check_login(&self, username: &str, password: &str) -> bool {
        if username.is_empty() || password.is_empty() {
            return false;
        }
        self.username == username && self.password == password
    }
}
