// 🔍 Filter/Sort Engine - derives the display list from goods + selection
//
// Pure function of its arguments: the input slice is never touched, a fresh
// Vec comes back on every call.

use crate::joiner::Good;
use crate::selection::{SelectionState, SortColumn, SortDirection};
use icu_collator::{Collator, CollatorOptions};
use std::cmp::Ordering;

/// Shown by front ends when the derived view is empty
pub const NO_RESULTS_MESSAGE: &str = "No products matching selected criteria";

/// Apply user, text and category filters, then the optional sort
pub fn derive_view(goods: &[Good], state: &SelectionState) -> Vec<Good> {
    let query = state.normalized_query();

    let mut view: Vec<Good> = goods
        .iter()
        .filter(|good| matches_user(good, state.selected_user))
        .filter(|good| matches_query(good, &query))
        .filter(|good| {
            state.selected_categories.is_empty()
                || state.selected_categories.contains(&good.category_id)
        })
        .cloned()
        .collect();

    if let Some(column) = state.sort_column {
        view.sort_by(comparator(column));

        // Reversal of the stable ascending order, not a descending re-sort:
        // equal keys come out inverted too.
        if state.sort_direction == SortDirection::Descending {
            view.reverse();
        }
    }

    view
}

fn matches_user(good: &Good, user: Option<i64>) -> bool {
    match user {
        Some(id) => good.owner_id() == id,
        None => true,
    }
}

/// `query` must already be trimmed and lowercased
fn matches_query(good: &Good, query: &str) -> bool {
    query.is_empty() || good.name.to_lowercase().contains(query)
}

/// Ascending comparator for a column
pub fn comparator(column: SortColumn) -> fn(&Good, &Good) -> Ordering {
    match column {
        SortColumn::Id => by_id,
        SortColumn::Product => by_product,
        SortColumn::Category => by_category,
        SortColumn::User => by_user,
    }
}

fn by_id(a: &Good, b: &Good) -> Ordering {
    a.id.cmp(&b.id)
}

fn by_product(a: &Good, b: &Good) -> Ordering {
    locale_compare(&a.name, &b.name)
}

fn by_category(a: &Good, b: &Good) -> Ordering {
    locale_compare(&a.category.title, &b.category.title)
}

fn by_user(a: &Good, b: &Good) -> Ordering {
    locale_compare(&a.person.name, &b.person.name)
}

thread_local! {
    // Root locale, tertiary strength: accents and case only break ties
    static COLLATOR: Option<Collator> =
        Collator::try_new(&Default::default(), CollatorOptions::new()).ok();
}

/// Locale-aware string order, the way a browser's `localeCompare` sorts
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    COLLATOR
        .with(|collator| match collator {
            Some(collator) => collator.compare(a, b),
            None => a.cmp(b),
        })
        .then_with(|| a.cmp(b))
}
