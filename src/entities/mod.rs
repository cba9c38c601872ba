// Entity Models - the three reference tables behind the catalog
//
// Each entity has:
// - A stable integer identity used for every lookup and comparison
// - Immutable values supplied once at start-up

pub mod person;
pub mod category;
pub mod product;

pub use person::{Person, Sex};
pub use category::Category;
pub use product::Product;
