//! Static beverage catalog and category list.
//!
//! Immutable reference data. Every live event starts from this list with all
//! beverages unavailable and at a zero count.

use serde::Serialize;
use utoipa::ToSchema;

use super::beverage::Beverage;

/// Category id assigned to beverages that are not part of the catalog.
pub const CUSTOM_CATEGORY: &str = "custom";

/// A beverage category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Category {
    /// Category identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Display color as a hex string.
    pub color: &'static str,
    /// Display icon (emoji).
    pub icon: &'static str,
}

/// A catalog beverage definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct BeverageDefinition {
    /// Beverage identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Display icon (emoji).
    pub icon: &'static str,
    /// Display color as a hex string.
    pub color: &'static str,
    /// Category id.
    pub category: &'static str,
}

/// All known categories, in display order.
pub const CATEGORIES: &[Category] = &[
    Category { id: "sprizz", name: "Sprizz", color: "#ff6b35", icon: "🥂" },
    Category { id: "cocktails", name: "Cocktails", color: "#ff1744", icon: "🍸" },
    Category { id: "longdrinks", name: "Longdrinks", color: "#3f51b5", icon: "🥃" },
    Category { id: "schnaps", name: "Schnaps", color: "#795548", icon: "🥃" },
    Category { id: "alcohol-free", name: "Alcohol Free", color: "#4caf50", icon: "🧃" },
];

const SPRIZZ: (&str, &str) = ("🥂", "#ff6b35");
const LONGDRINK: (&str, &str) = ("🥃", "#3f51b5");
const COCKTAIL: (&str, &str) = ("🍸", "#ff1744");
const ALCOHOL_FREE: (&str, &str) = ("🧃", "#4caf50");

const fn def(
    id: &'static str,
    name: &'static str,
    style: (&'static str, &'static str),
    category: &'static str,
) -> BeverageDefinition {
    BeverageDefinition {
        id,
        name,
        icon: style.0,
        color: style.1,
        category,
    }
}

/// All catalog beverages, in display order.
pub const BEVERAGES: &[BeverageDefinition] = &[
    def("aperol-sprizz", "Aperol Sprizz", SPRIZZ, "sprizz"),
    def("rosato-sprizz", "Rosato Sprizz", SPRIZZ, "sprizz"),
    def("hugo", "Hugo", SPRIZZ, "sprizz"),
    def("limoncello-sprizz", "Limoncello Sprizz", SPRIZZ, "sprizz"),
    def("lillet-wild-berry", "Lillet Wild Berry", SPRIZZ, "sprizz"),
    def("lillet-wild-berry-ice", "Lillet Wild Berry Ice", SPRIZZ, "sprizz"),
    def("cuba-libre", "Cuba Libre", LONGDRINK, "longdrinks"),
    def("gin-tonic", "Gin Tonic", LONGDRINK, "longdrinks"),
    def("campari-orange", "Campari Orange", LONGDRINK, "longdrinks"),
    def("campari-soda", "Campari Soda", LONGDRINK, "longdrinks"),
    def("caipirinha", "Caipirinha", COCKTAIL, "cocktails"),
    def("mojito", "Mojito", COCKTAIL, "cocktails"),
    def("tequila-sunrise", "Tequila Sunrise", COCKTAIL, "cocktails"),
    def("franken-mule", "Franken Mule", COCKTAIL, "cocktails"),
    def("munich-mule", "Munich Mule", COCKTAIL, "cocktails"),
    def("vodka-mule", "Vodka Mule", COCKTAIL, "cocktails"),
    def("gin-basil-smash", "Gin Basil Smash", COCKTAIL, "cocktails"),
    def("espresso-martini", "Espresso Martini", COCKTAIL, "cocktails"),
    def("gin-basil-sprizz", "Gin Basil Sprizz", COCKTAIL, "cocktails"),
    def("floreale-wild-berry", "Floreale Wild Berry", ALCOHOL_FREE, "alcohol-free"),
    def("summer-garden", "Summer Garden", ALCOHOL_FREE, "alcohol-free"),
    def("hugo-alc-free", "Hugo Alc Free", ALCOHOL_FREE, "alcohol-free"),
    def("caipirinha-alc-free", "Caipirinha Alc Free", ALCOHOL_FREE, "alcohol-free"),
    def("vibrante-tonic", "Vibrante Tonic", ALCOHOL_FREE, "alcohol-free"),
    def("rosa-grapefruit", "Rosa Grapefruit", ALCOHOL_FREE, "alcohol-free"),
    def("mojito-alc-free", "Mojito Alc Free", ALCOHOL_FREE, "alcohol-free"),
];

/// Looks up a catalog beverage by id.
#[must_use]
pub fn find(id: &str) -> Option<&'static BeverageDefinition> {
    BEVERAGES.iter().find(|b| b.id == id)
}

/// Looks up a category by id.
#[must_use]
pub fn category(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}

/// Builds the fresh live beverage list: every catalog entry unavailable at
/// a zero count.
#[must_use]
pub fn fresh_beverages() -> Vec<Beverage> {
    BEVERAGES.iter().map(Beverage::from_definition).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = BEVERAGES.iter().map(|b| b.id).collect();
        assert_eq!(ids.len(), BEVERAGES.len());
    }

    #[test]
    fn every_beverage_has_a_known_category() {
        for bev in BEVERAGES {
            assert!(category(bev.category).is_some(), "{} has no category", bev.id);
        }
    }

    #[test]
    fn fresh_beverages_are_unavailable_and_zero() {
        let fresh = fresh_beverages();
        assert_eq!(fresh.len(), BEVERAGES.len());
        assert!(fresh.iter().all(|b| !b.available && b.count == 0));
    }

    #[test]
    fn find_unknown_returns_none() {
        assert!(find("beer").is_none());
        assert!(find("gin-tonic").is_some());
    }
}
