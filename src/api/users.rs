//! Example REST resource: users kept in process memory
//!
//! Ids come from a counter that only moves forward, so an id is never handed
//! out twice, even after the user it belonged to is deleted.

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub id: String,
}

/// In-memory user collection
#[derive(Debug, Default)]
pub struct UserStore {
    // Keyed by counter value; ascending order is insertion order
    users: BTreeMap<u64, String>,
    id_counter: u64,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All known ids in insertion order
    pub fn list(&self) -> Vec<String> {
        self.users.keys().map(u64::to_string).collect()
    }

    pub fn get(&self, id: &str) -> ApiResult<User> {
        let key = self.existing_key(id)?;
        Ok(User {
            name: self.users[&key].clone(),
            id: id.to_string(),
        })
    }

    /// Stores a new user and returns its id
    pub fn create(&mut self, name: Option<&str>) -> ApiResult<String> {
        let name = required_name(name)?;

        self.id_counter += 1;
        self.users.insert(self.id_counter, name.to_string());

        tracing::debug!(id = self.id_counter, "User created");
        Ok(self.id_counter.to_string())
    }

    /// Renames a user; the id is unchanged
    pub fn update(&mut self, id: &str, name: Option<&str>) -> ApiResult<()> {
        let key = self.existing_key(id)?;
        let name = required_name(name)?;

        if let Some(stored) = self.users.get_mut(&key) {
            *stored = name.to_string();
        }
        Ok(())
    }

    pub fn delete(&mut self, id: &str) -> ApiResult<()> {
        let key = self.existing_key(id)?;
        self.users.remove(&key);

        tracing::debug!(id, "User deleted");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Maps an id string to its key. Only the exact string an id was issued
    /// as matches: "01" is not "1".
    fn existing_key(&self, id: &str) -> ApiResult<u64> {
        id.parse::<u64>()
            .ok()
            .filter(|key| key.to_string() == id && self.users.contains_key(key))
            .ok_or_else(|| ApiError::NotFound { id: id.to_string() })
    }
}

fn required_name(name: Option<&str>) -> ApiResult<&str> {
    match name {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(ApiError::InputMissing {
            field: "name".to_string(),
        }),
    }
}
