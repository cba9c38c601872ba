// 📦 Product Entity - the rows of the catalog before joining

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,

    pub name: String,

    /// Must resolve to an existing Category
    pub category_id: i64,
}

impl Product {
    pub fn new(id: i64, name: impl Into<String>, category_id: i64) -> Self {
        Product {
            id,
            name: name.into(),
            category_id,
        }
    }
}
