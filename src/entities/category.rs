// 🏷️ Category Entity - product groupings, each owned by one person

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Stable identity
    pub id: i64,

    /// Display title (e.g., "Grocery", "Drinks")
    pub title: String,

    /// Icon shown next to the title (e.g., "🍞", "🍺")
    pub icon: String,

    /// Owner person id - must resolve to an existing Person
    pub owner_id: i64,
}

impl Category {
    pub fn new(id: i64, title: impl Into<String>, icon: impl Into<String>, owner_id: i64) -> Self {
        Category {
            id,
            title: title.into(),
            icon: icon.into(),
            owner_id,
        }
    }

    /// Table cell text: "🍞 - Grocery"
    pub fn label(&self) -> String {
        format!("{} - {}", self.icon, self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_label() {
        let category = Category::new(1, "Grocery", "🍞", 2);
        assert_eq!(category.label(), "🍞 - Grocery");
    }

    #[test]
    fn test_category_camel_case_fields() {
        let category: Category =
            serde_json::from_str(r#"{"id":3,"title":"Fruits","icon":"🍏","ownerId":2}"#).unwrap();

        assert_eq!(category.owner_id, 2);
        assert_eq!(category.title, "Fruits");
    }
}
