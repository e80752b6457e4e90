//! Menu categories and the category filter sentinel.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error parsing a [`Category`] or [`CategoryFilter`] from its slug.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct CategoryParseError(pub String);

/// A menu category.
///
/// One explicit enumeration covering everything the menu serves. Slugs
/// (`bebidas`, `comidas`, `petiscos`, `pratos-regionais`) are the wire and
/// URL representation; [`Category::label`] is the human-facing form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Bebidas,
    Comidas,
    Petiscos,
    PratosRegionais,
}

impl Category {
    /// All categories, in menu display order.
    pub const ALL: [Self; 4] = [
        Self::Bebidas,
        Self::Comidas,
        Self::Petiscos,
        Self::PratosRegionais,
    ];

    /// URL/storage slug for this category.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Bebidas => "bebidas",
            Self::Comidas => "comidas",
            Self::Petiscos => "petiscos",
            Self::PratosRegionais => "pratos-regionais",
        }
    }

    /// Human-facing label for this category.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bebidas => "Bebidas",
            Self::Comidas => "Comidas",
            Self::Petiscos => "Petiscos",
            Self::PratosRegionais => "Pratos Regionais",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bebidas" => Ok(Self::Bebidas),
            "comidas" => Ok(Self::Comidas),
            "petiscos" => Ok(Self::Petiscos),
            "pratos-regionais" => Ok(Self::PratosRegionais),
            other => Err(CategoryParseError(other.to_owned())),
        }
    }
}

/// Category selection for menu filtering: everything, or one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// The `todos` sentinel - no category restriction.
    #[default]
    All,
    /// Only items of this category.
    Only(Category),
}

impl CategoryFilter {
    /// URL slug for this selection (`todos` for [`Self::All`]).
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::All => "todos",
            Self::Only(category) => category.slug(),
        }
    }

    /// Whether an item of `category` passes this selection.
    #[must_use]
    pub fn matches(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "todos" {
            Ok(Self::All)
        } else {
            s.parse::<Category>().map(Self::Only)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_round_trip() {
        for category in Category::ALL {
            let parsed: Category = category.slug().parse().expect("parse slug");
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_serde_uses_slug() {
        let json = serde_json::to_string(&Category::PratosRegionais).expect("serialize");
        assert_eq!(json, "\"pratos-regionais\"");
    }

    #[test]
    fn test_filter_all_matches_everything() {
        for category in Category::ALL {
            assert!(CategoryFilter::All.matches(category));
        }
    }

    #[test]
    fn test_filter_only_matches_itself() {
        let filter = CategoryFilter::Only(Category::Bebidas);
        assert!(filter.matches(Category::Bebidas));
        assert!(!filter.matches(Category::Comidas));
    }

    #[test]
    fn test_parse_todos_sentinel() {
        let filter: CategoryFilter = "todos".parse().expect("parse todos");
        assert_eq!(filter, CategoryFilter::All);
    }

    #[test]
    fn test_parse_unknown_rejected() {
        assert!("sobremesas".parse::<Category>().is_err());
        assert!("".parse::<CategoryFilter>().is_err());
    }
}
