// 🗂️ Dataset - the three reference tables, loaded once at start-up
//
// Sources:
// - Built-in fixtures (embedded JSON, the default)
// - A directory holding users / categories / products as .json or .csv

use crate::entities::{Category, Person, Product};
use crate::error::{CatalogError, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const BUILTIN_USERS: &str = include_str!("../data/users.json");
const BUILTIN_CATEGORIES: &str = include_str!("../data/categories.json");
const BUILTIN_PRODUCTS: &str = include_str!("../data/products.json");

pub const USERS_TABLE: &str = "users";
pub const CATEGORIES_TABLE: &str = "categories";
pub const PRODUCTS_TABLE: &str = "products";

/// Read-only reference tables, in source order
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub people: Vec<Person>,
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
}

impl Dataset {
    pub fn new(people: Vec<Person>, categories: Vec<Category>, products: Vec<Product>) -> Self {
        Dataset {
            people,
            categories,
            products,
        }
    }

    /// The fixture tables compiled into the binary
    pub fn builtin() -> Result<Self> {
        let dataset = Dataset {
            people: parse_builtin(USERS_TABLE, BUILTIN_USERS)?,
            categories: parse_builtin(CATEGORIES_TABLE, BUILTIN_CATEGORIES)?,
            products: parse_builtin(PRODUCTS_TABLE, BUILTIN_PRODUCTS)?,
        };

        debug!(
            people = dataset.people.len(),
            categories = dataset.categories.len(),
            products = dataset.products.len(),
            "loaded built-in dataset"
        );

        Ok(dataset)
    }

    /// Load every table from `dir`, preferring `<table>.json` over `<table>.csv`
    pub fn load(dir: &Path) -> Result<Self> {
        let dataset = Dataset {
            people: read_table(dir, USERS_TABLE)?,
            categories: read_table(dir, CATEGORIES_TABLE)?,
            products: read_table(dir, PRODUCTS_TABLE)?,
        };

        info!(
            dir = %dir.display(),
            people = dataset.people.len(),
            categories = dataset.categories.len(),
            products = dataset.products.len(),
            "loaded dataset"
        );

        Ok(dataset)
    }

    /// `Some(dir)` loads from disk, `None` falls back to the fixtures
    pub fn load_or_builtin(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Self::load(dir),
            None => Self::builtin(),
        }
    }

    pub fn find_person(&self, id: i64) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    pub fn find_category(&self, id: i64) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Case-insensitive lookup by display name (CLI convenience)
    pub fn find_person_by_name(&self, name: &str) -> Option<&Person> {
        let lower = name.to_lowercase();
        self.people.iter().find(|p| p.name.to_lowercase() == lower)
    }

    /// Case-insensitive lookup by title (CLI convenience)
    pub fn find_category_by_title(&self, title: &str) -> Option<&Category> {
        let lower = title.to_lowercase();
        self.categories.iter().find(|c| c.title.to_lowercase() == lower)
    }
}

fn parse_builtin<T: DeserializeOwned>(table: &str, raw: &str) -> Result<Vec<T>> {
    serde_json::from_str(raw).map_err(|source| CatalogError::Json {
        path: PathBuf::from(format!("<builtin>/{}.json", table)),
        source,
    })
}

fn read_table<T: DeserializeOwned>(dir: &Path, table: &'static str) -> Result<Vec<T>> {
    let json_path = dir.join(format!("{}.json", table));
    if json_path.is_file() {
        return read_json(&json_path);
    }

    let csv_path = dir.join(format!("{}.csv", table));
    if csv_path.is_file() {
        return read_csv(&csv_path);
    }

    Err(CatalogError::MissingTable {
        table,
        dir: dir.to_path_buf(),
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let csv_err = |source| CatalogError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut rdr = csv::Reader::from_path(path).map_err(csv_err)?;

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        rows.push(result.map_err(csv_err)?);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Sex;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(label: &str) -> PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("goods_catalog_{}_{}", label, suffix));
        fs::create_dir_all(&dir).expect("temp dir");
        dir
    }

    #[test]
    fn test_builtin_dataset() {
        let dataset = Dataset::builtin().unwrap();

        assert_eq!(dataset.people.len(), 4);
        assert_eq!(dataset.categories.len(), 5);
        assert_eq!(dataset.products.len(), 9);

        let anna = dataset.find_person(2).unwrap();
        assert_eq!(anna.name, "Anna");
        assert_eq!(anna.sex, Sex::Female);

        assert_eq!(dataset.find_category(2).unwrap().title, "Drinks");
        assert!(dataset.find_category(99).is_none());
    }

    #[test]
    fn test_find_by_name_is_case_insensitive() {
        let dataset = Dataset::builtin().unwrap();

        assert_eq!(dataset.find_person_by_name("roma").unwrap().id, 1);
        assert_eq!(dataset.find_category_by_title("FRUITS").unwrap().id, 3);
        assert!(dataset.find_person_by_name("Nobody").is_none());
    }

    #[test]
    fn test_load_mixed_json_and_csv() {
        let dir = temp_dir("mixed");

        fs::write(
            dir.join("users.csv"),
            "id,name,sex\n100,Alice,f\n101,Bob,m\n",
        )
        .unwrap();
        fs::write(
            dir.join("categories.json"),
            r#"[{"id":10,"title":"Dairy","icon":"🥛","ownerId":100}]"#,
        )
        .unwrap();
        fs::write(dir.join("products.csv"), "id,name,categoryId\n1,Milk,10\n").unwrap();

        let dataset = Dataset::load(&dir).unwrap();

        assert_eq!(dataset.people.len(), 2);
        assert_eq!(dataset.people[1].sex, Sex::Male);
        assert_eq!(dataset.categories[0].owner_id, 100);
        assert_eq!(dataset.products[0].category_id, 10);

        fs::remove_dir_all(dir).expect("cleanup");
    }

    #[test]
    fn test_load_missing_table() {
        let dir = temp_dir("missing");
        fs::write(dir.join("users.json"), "[]").unwrap();

        let err = Dataset::load(&dir).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MissingTable { table: CATEGORIES_TABLE, .. }
        ));

        fs::remove_dir_all(dir).expect("cleanup");
    }

    #[test]
    fn test_load_malformed_json() {
        let dir = temp_dir("malformed");
        fs::write(dir.join("users.json"), "[{\"id\": \"one\"}]").unwrap();

        let err = Dataset::load(&dir).unwrap_err();
        assert!(matches!(err, CatalogError::Json { .. }));

        fs::remove_dir_all(dir).expect("cleanup");
    }
}
