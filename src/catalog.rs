// 📚 Catalog - the loaded dataset together with its joined goods
//
// Built once at start-up and shared read-only by every front end.

use crate::dataset::Dataset;
use crate::error::Result;
use crate::joiner::Good;
use crate::selection::SelectionState;
use crate::view::derive_view;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Catalog {
    pub dataset: Dataset,
    pub goods: Vec<Good>,
}

impl Catalog {
    pub fn from_dataset(dataset: Dataset) -> Result<Self> {
        let goods = dataset.join()?;
        Ok(Catalog { dataset, goods })
    }

    /// Load from `dir`, or the built-in dataset when `None`
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        Self::from_dataset(Dataset::load_or_builtin(dir)?)
    }

    pub fn view(&self, state: &SelectionState) -> Vec<Good> {
        derive_view(&self.goods, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Category, Person, Product, Sex};
    use crate::error::CatalogError;

    #[test]
    fn test_load_builtin_catalog() {
        let catalog = Catalog::load(None).unwrap();

        assert_eq!(catalog.goods.len(), 9);
        assert_eq!(catalog.view(&SelectionState::new().select_user(Some(1))).len(), 3);
    }

    #[test]
    fn test_broken_dataset_fails_to_load() {
        let dataset = Dataset::new(
            vec![Person::new(1, "Roma", Sex::Male)],
            vec![Category::new(1, "Grocery", "🍞", 7)],
            vec![Product::new(1, "Bread", 1)],
        );

        let err = Catalog::from_dataset(dataset).unwrap_err();
        assert!(matches!(err, CatalogError::UnresolvedOwner { owner_id: 7, .. }));
    }
}
