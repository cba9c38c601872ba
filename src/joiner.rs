// 🔗 Data Joiner - product + category + owner, denormalized once at start-up

use crate::dataset::Dataset;
use crate::entities::{Category, Person, Product};
use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

// ============================================================================
// GOOD
// ============================================================================

/// A product enriched with its category and the category's owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Good {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub category: Category,
    pub person: Person,
}

impl Good {
    pub fn owner_id(&self) -> i64 {
        self.person.id
    }
}

// ============================================================================
// JOIN
// ============================================================================

/// Join the three tables. Output order follows `products`.
///
/// Any unresolved reference fails the whole join: the tables are fixtures,
/// so a dangling id is a broken build input rather than something to skip.
pub fn join_goods(
    products: &[Product],
    categories: &[Category],
    people: &[Person],
) -> Result<Vec<Good>> {
    let categories_by_id: HashMap<i64, &Category> =
        categories.iter().map(|c| (c.id, c)).collect();
    let people_by_id: HashMap<i64, &Person> = people.iter().map(|p| (p.id, p)).collect();

    products
        .iter()
        .map(|product| {
            let category = categories_by_id.get(&product.category_id).ok_or(
                CatalogError::UnresolvedCategory {
                    product_id: product.id,
                    category_id: product.category_id,
                },
            )?;

            let person = people_by_id.get(&category.owner_id).ok_or(
                CatalogError::UnresolvedOwner {
                    category_id: category.id,
                    owner_id: category.owner_id,
                },
            )?;

            Ok(Good {
                id: product.id,
                name: product.name.clone(),
                category_id: product.category_id,
                category: (*category).clone(),
                person: (*person).clone(),
            })
        })
        .collect()
}

impl Dataset {
    /// Join this dataset's tables into the goods list
    pub fn join(&self) -> Result<Vec<Good>> {
        let goods = join_goods(&self.products, &self.categories, &self.people)?;
        info!(goods = goods.len(), "joined catalog");
        Ok(goods)
    }
}
