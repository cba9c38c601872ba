// ⚠️ Catalog Errors - integrity and contract failures
//
// None of these are recoverable inside the engine: dataset errors abort
// start-up, the rest reject a bad request or flag before it reaches a reducer.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("product {product_id} references unknown category {category_id}")]
    UnresolvedCategory { product_id: i64, category_id: i64 },

    #[error("category {category_id} references unknown owner {owner_id}")]
    UnresolvedOwner { category_id: i64, owner_id: i64 },

    #[error("unknown sort column: {0:?} (expected id, product, category or user)")]
    UnknownSortColumn(String),

    #[error("unknown sort direction: {0:?} (expected asc or desc)")]
    UnknownSortDirection(String),

    #[error("unknown reset scope: {0:?} (expected filters or all)")]
    UnknownResetScope(String),

    #[error("no person with id {0}")]
    UnknownPerson(i64),

    #[error("no category with id {0}")]
    UnknownCategory(i64),

    #[error("dataset table {table:?} not found in {}", dir.display())]
    MissingTable { table: &'static str, dir: PathBuf },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl CatalogError {
    /// Errors caused by caller input rather than the loaded dataset
    pub fn is_bad_input(&self) -> bool {
        matches!(
            self,
            CatalogError::UnknownSortColumn(_)
                | CatalogError::UnknownSortDirection(_)
                | CatalogError::UnknownResetScope(_)
                | CatalogError::UnknownPerson(_)
                | CatalogError::UnknownCategory(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
