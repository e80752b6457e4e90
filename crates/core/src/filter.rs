//! Pure menu filtering.
//!
//! The public menu grid is the composition `catalog -> filter -> render`,
//! recomputed on every category or query change. The filter is a stable
//! selection: input order is preserved and no caching is involved, the
//! catalog is tens of items at most.

use crate::types::{CategoryFilter, MenuItem};

/// Select the items matching a category selection and a free-text query.
///
/// An item is kept when all three hold:
/// - it is available;
/// - the category selection matches (or is [`CategoryFilter::All`]);
/// - the query is blank, or is a case-insensitive substring of the name or
///   of the description.
#[must_use]
pub fn filter_menu<'a>(
    items: &'a [MenuItem],
    category: CategoryFilter,
    query: &str,
) -> Vec<&'a MenuItem> {
    let query = query.trim().to_lowercase();
    items
        .iter()
        .filter(|item| matches(item, category, &query))
        .collect()
}

/// The selection predicate. `query` must already be trimmed and lowercased.
fn matches(item: &MenuItem, category: CategoryFilter, query: &str) -> bool {
    if !item.available {
        return false;
    }
    if !category.matches(item.category) {
        return false;
    }
    query.is_empty()
        || item.name.to_lowercase().contains(query)
        || item.description.to_lowercase().contains(query)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::{Category, MenuItemId};

    fn item(id: &str, name: &str, description: &str, category: Category) -> MenuItem {
        MenuItem {
            id: MenuItemId::new(id),
            name: name.to_owned(),
            description: description.to_owned(),
            price: Decimal::new(1000, 2),
            category,
            image: None,
            available: true,
        }
    }

    fn catalog() -> Vec<MenuItem> {
        vec![
            item("1", "Coca-Cola", "Refrigerante gelado", Category::Bebidas),
            item(
                "2",
                "Caldo de Caranguejo",
                "Acompanha torradinhas",
                Category::Comidas,
            ),
            item(
                "3",
                "Isca de Peixe",
                "Peixe empanado com molho tartaro",
                Category::Petiscos,
            ),
        ]
    }

    #[test]
    fn test_category_only() {
        let catalog = catalog();
        let result = filter_menu(&catalog, CategoryFilter::Only(Category::Bebidas), "");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Coca-Cola");
    }

    #[test]
    fn test_query_matches_name_case_insensitive() {
        let catalog = catalog();
        let result = filter_menu(&catalog, CategoryFilter::All, "caldo");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Caldo de Caranguejo");
    }

    #[test]
    fn test_query_matches_description() {
        let catalog = catalog();
        let result = filter_menu(&catalog, CategoryFilter::All, "empanado");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Isca de Peixe");
    }

    #[test]
    fn test_no_match_returns_empty() {
        let catalog = catalog();
        let result = filter_menu(&catalog, CategoryFilter::All, "sushi");
        assert!(result.is_empty());
    }

    #[test]
    fn test_unavailable_items_excluded() {
        let mut catalog = catalog();
        catalog[0].available = false;
        let result = filter_menu(&catalog, CategoryFilter::All, "");
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|i| i.name != "Coca-Cola"));
    }

    #[test]
    fn test_category_and_query_combine() {
        let catalog = catalog();
        let result = filter_menu(&catalog, CategoryFilter::Only(Category::Comidas), "coca");
        assert!(result.is_empty());
    }

    #[test]
    fn test_order_is_preserved() {
        let catalog = catalog();
        let result = filter_menu(&catalog, CategoryFilter::All, "");
        let ids: Vec<&str> = result.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn test_query_is_trimmed() {
        let catalog = catalog();
        let result = filter_menu(&catalog, CategoryFilter::All, "  CALDO  ");
        assert_eq!(result.len(), 1);
    }

    /// The filter is exactly the predicate's selection: nothing matching is
    /// dropped and nothing non-matching slips through.
    #[test]
    fn test_selection_is_exact() {
        let mut catalog = catalog();
        catalog[2].available = false;
        let selected = filter_menu(&catalog, CategoryFilter::Only(Category::Comidas), "caldo");
        for item in &catalog {
            let expected = item.available
                && item.category == Category::Comidas
                && (item.name.to_lowercase().contains("caldo")
                    || item.description.to_lowercase().contains("caldo"));
            let present = selected.iter().any(|s| s.id == item.id);
            assert_eq!(expected, present, "item {}", item.id);
        }
    }
}
