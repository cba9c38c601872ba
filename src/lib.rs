// Goods Catalog - Core Library
// Exposes the joiner, selection reducers and filter/sort engine for the
// TUI, the listing CLI, the API server and tests

pub mod entities;
pub mod error;
pub mod dataset;
pub mod joiner;
pub mod selection;
pub mod view;
pub mod catalog;
pub mod config;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use entities::{Category, Person, Product, Sex};
pub use error::CatalogError;
pub use dataset::Dataset;
pub use joiner::{join_goods, Good};
pub use selection::{
    ResetScope, SelectionEvent, SelectionState, SortColumn, SortDirection, SortIndicator,
};
pub use view::{derive_view, locale_compare, NO_RESULTS_MESSAGE};
pub use catalog::Catalog;
pub use config::{init_tracing, load_settings, LogTarget, Settings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
