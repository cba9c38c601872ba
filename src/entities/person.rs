// 👤 Person Entity - owners of product categories

use serde::{Deserialize, Serialize};

// ============================================================================
// SEX
// ============================================================================

/// Serialized as `m` / `f`, the shape the fixture tables use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "m")]
    Male,

    #[serde(rename = "f")]
    Female,
}

// ============================================================================
// PERSON ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Stable identity, used for the user filter
    pub id: i64,

    pub name: String,

    pub sex: Sex,
}

impl Person {
    pub fn new(id: i64, name: impl Into<String>, sex: Sex) -> Self {
        Person {
            id,
            name: name.into(),
            sex,
        }
    }

    pub fn is_male(&self) -> bool {
        self.sex == Sex::Male
    }
}
