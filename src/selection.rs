// 🎛️ Selection State - user-adjustable filter/sort parameters
//
// The state is a plain serializable value. Every UI event maps to one small
// reducer that takes the state by value and returns the next state, so each
// transition can be tested without a renderer.

use crate::dataset::Dataset;
use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

// ============================================================================
// SORT COLUMN
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    Id,
    Product,
    Category,
    User,
}

impl SortColumn {
    /// Table order, left to right
    pub const ALL: [SortColumn; 4] = [
        SortColumn::Id,
        SortColumn::Product,
        SortColumn::Category,
        SortColumn::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Id => "id",
            SortColumn::Product => "product",
            SortColumn::Category => "category",
            SortColumn::User => "user",
        }
    }

    /// Header text
    pub fn title(&self) -> &'static str {
        match self {
            SortColumn::Id => "ID",
            SortColumn::Product => "Product",
            SortColumn::Category => "Category",
            SortColumn::User => "User",
        }
    }
}

impl FromStr for SortColumn {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "id" => Ok(SortColumn::Id),
            "product" | "name" => Ok(SortColumn::Product),
            "category" => Ok(SortColumn::Category),
            "user" | "owner" => Ok(SortColumn::User),
            _ => Err(CatalogError::UnknownSortColumn(s.to_string())),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SORT DIRECTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc")]
    Ascending,

    #[serde(rename = "desc")]
    Descending,
}

impl FromStr for SortDirection {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(CatalogError::UnknownSortDirection(s.to_string())),
        }
    }
}

// ============================================================================
// SORT INDICATOR
// ============================================================================

/// Tri-state header glyph for one column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortIndicator {
    Unsorted,
    Ascending,
    Descending,
}

impl SortIndicator {
    pub fn glyph(&self) -> &'static str {
        match self {
            SortIndicator::Unsorted => "⇅",
            SortIndicator::Ascending => "▲",
            SortIndicator::Descending => "▼",
        }
    }
}

// ============================================================================
// RESET SCOPE
// ============================================================================

/// What "reset all filters" clears
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetScope {
    /// Selected user and search query only
    #[default]
    Filters,

    /// Also category selection and sort state
    All,
}

impl FromStr for ResetScope {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "filters" => Ok(ResetScope::Filters),
            "all" => Ok(ResetScope::All),
            _ => Err(CatalogError::UnknownResetScope(s.to_string())),
        }
    }
}

// ============================================================================
// SELECTION STATE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectionState {
    /// Person id; None = all users
    pub selected_user: Option<i64>,

    pub search_query: String,

    /// Category ids; empty = all categories
    pub selected_categories: BTreeSet<i64>,

    pub sort_column: Option<SortColumn>,

    pub sort_direction: SortDirection,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_user(mut self, user: Option<i64>) -> Self {
        self.selected_user = user;
        self
    }

    /// Leading whitespace is dropped as it is typed
    pub fn set_query(mut self, query: &str) -> Self {
        self.search_query = query.trim_start().to_string();
        self
    }

    pub fn clear_query(mut self) -> Self {
        self.search_query.clear();
        self
    }

    pub fn toggle_category(mut self, category: i64) -> Self {
        if !self.selected_categories.remove(&category) {
            self.selected_categories.insert(category);
        }
        self
    }

    pub fn clear_categories(mut self) -> Self {
        self.selected_categories.clear();
        self
    }

    pub fn reset_all(mut self, scope: ResetScope) -> Self {
        self.selected_user = None;
        self.search_query.clear();

        if scope == ResetScope::All {
            self.selected_categories.clear();
            self.sort_column = None;
            self.sort_direction = SortDirection::Ascending;
        }

        self
    }

    /// unsorted → ascending → descending → unsorted, per column
    pub fn click_column(mut self, column: SortColumn) -> Self {
        if self.sort_column != Some(column) {
            self.sort_column = Some(column);
            self.sort_direction = SortDirection::Ascending;
        } else if self.sort_direction == SortDirection::Ascending {
            self.sort_direction = SortDirection::Descending;
        } else {
            self.sort_column = None;
            self.sort_direction = SortDirection::Ascending;
        }
        self
    }

    /// Apply one event through its reducer
    pub fn apply(self, event: &SelectionEvent, reset_scope: ResetScope) -> Self {
        debug!(?event, "applying selection event");

        match event {
            SelectionEvent::SelectUser { user } => self.select_user(*user),
            SelectionEvent::SetQuery { query } => self.set_query(query),
            SelectionEvent::ClearQuery => self.clear_query(),
            SelectionEvent::ToggleCategory { category } => self.toggle_category(*category),
            SelectionEvent::ClearCategories => self.clear_categories(),
            SelectionEvent::ResetAll => self.reset_all(reset_scope),
            SelectionEvent::ClickColumn { column } => self.click_column(*column),
        }
    }

    pub fn sort_indicator(&self, column: SortColumn) -> SortIndicator {
        match (self.sort_column, self.sort_direction) {
            (Some(c), SortDirection::Ascending) if c == column => SortIndicator::Ascending,
            (Some(c), SortDirection::Descending) if c == column => SortIndicator::Descending,
            _ => SortIndicator::Unsorted,
        }
    }

    pub fn is_category_selected(&self, category: i64) -> bool {
        self.selected_categories.contains(&category)
    }

    /// Query as the text filter sees it: trimmed and lowercased
    pub fn normalized_query(&self) -> String {
        self.search_query.trim().to_lowercase()
    }

    /// Any user/query/category narrowing in effect
    pub fn has_filters(&self) -> bool {
        self.selected_user.is_some()
            || !self.normalized_query().is_empty()
            || !self.selected_categories.is_empty()
    }
}

// ============================================================================
// EVENTS
// ============================================================================

/// Events emitted by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SelectionEvent {
    SelectUser { user: Option<i64> },
    SetQuery { query: String },
    ClearQuery,
    ToggleCategory { category: i64 },
    ClearCategories,
    ResetAll,
    ClickColumn { column: SortColumn },
}

impl SelectionEvent {
    /// Reject ids that don't exist in the loaded dataset
    pub fn validate(&self, dataset: &Dataset) -> Result<()> {
        match self {
            SelectionEvent::SelectUser { user: Some(id) } if dataset.find_person(*id).is_none() => {
                Err(CatalogError::UnknownPerson(*id))
            }
            SelectionEvent::ToggleCategory { category }
                if dataset.find_category(*category).is_none() =>
            {
                Err(CatalogError::UnknownCategory(*category))
            }
            _ => Ok(()),
        }
    }
}
