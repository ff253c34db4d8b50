//! Catalog browsing logic: free-text search and sorting.
//!
//! Category filtering happens in SQL; search and sort run over the loaded
//! product set. The catalog has no pagination or ranking, so pure
//! filter-plus-sort over a `Vec` keeps the semantics easy to verify.

use std::cmp::Ordering;

use crate::models::Product;

/// Recognized sort keys for the product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
}

impl SortKey {
    /// Parse a sort key from its query-string form.
    ///
    /// Unrecognized values yield `None`, which leaves the product order
    /// unchanged.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "name_asc" => Some(Self::NameAsc),
            "name_desc" => Some(Self::NameDesc),
            "price_asc" => Some(Self::PriceAsc),
            "price_desc" => Some(Self::PriceDesc),
            _ => None,
        }
    }
}

/// Keep only products whose name or description contains the query,
/// case-insensitively. An empty query keeps everything.
pub fn search_products(products: &mut Vec<Product>, query: &str) {
    if query.is_empty() {
        return;
    }

    let needle = query.to_lowercase();
    products.retain(|p| {
        p.name.to_lowercase().contains(&needle)
            || p.description.to_lowercase().contains(&needle)
    });
}

/// Sort products by the given key; `None` leaves the order unchanged.
///
/// Name comparisons are case-sensitive lexicographic, matching what the
/// database collation would do for an ORDER BY on the name column.
pub fn sort_products(products: &mut [Product], key: Option<SortKey>) {
    let Some(key) = key else {
        return;
    };

    let compare: fn(&Product, &Product) -> Ordering = match key {
        SortKey::NameAsc => |a, b| a.name.cmp(&b.name),
        SortKey::NameDesc => |a, b| b.name.cmp(&a.name),
        SortKey::PriceAsc => |a, b| a.price.cmp(&b.price),
        SortKey::PriceDesc => |a, b| b.price.cmp(&a.price),
    };

    products.sort_by(compare);
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchard_core::{CategoryId, ProductId};
    use rust_decimal::{Decimal, dec};

    fn product(id: i32, name: &str, description: &str, price: Decimal) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            description: description.to_owned(),
            price,
            image: None,
            category_id: CategoryId::new(1),
        }
    }

    fn sample() -> Vec<Product> {
        vec![
            product(1, "Red Shoe", "Comfortable running shoe", dec!(100)),
            product(2, "Blue Hat", "A hat, but blue", dec!(25)),
            product(3, "Green Scarf", "Wool scarf with red stripes", dec!(50)),
        ]
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::parse("name_asc"), Some(SortKey::NameAsc));
        assert_eq!(SortKey::parse("name_desc"), Some(SortKey::NameDesc));
        assert_eq!(SortKey::parse("price_asc"), Some(SortKey::PriceAsc));
        assert_eq!(SortKey::parse("price_desc"), Some(SortKey::PriceDesc));
        assert_eq!(SortKey::parse("newest"), None);
        assert_eq!(SortKey::parse(""), None);
    }

    #[test]
    fn test_search_is_case_insensitive_over_name() {
        let mut products = sample();
        search_products(&mut products, "red");
        let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
        // "Red Shoe" matches by name, "Green Scarf" by description.
        assert_eq!(names, vec!["Red Shoe", "Green Scarf"]);
    }

    #[test]
    fn test_search_matches_description() {
        let mut products = sample();
        search_products(&mut products, "WOOL");
        assert_eq!(products.len(), 1);
        assert_eq!(products.first().map(|p| p.id), Some(ProductId::new(3)));
    }

    #[test]
    fn test_search_empty_query_keeps_all() {
        let mut products = sample();
        search_products(&mut products, "");
        assert_eq!(products.len(), 3);
    }

    #[test]
    fn test_search_no_match() {
        let mut products = sample();
        search_products(&mut products, "umbrella");
        assert!(products.is_empty());
    }

    #[test]
    fn test_sort_price_asc_is_non_decreasing() {
        let mut products = sample();
        sort_products(&mut products, Some(SortKey::PriceAsc));
        let prices: Vec<_> = products.iter().map(|p| p.price).collect();
        assert!(prices.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_sort_price_desc_is_non_increasing() {
        let mut products = sample();
        sort_products(&mut products, Some(SortKey::PriceDesc));
        let prices: Vec<_> = products.iter().map(|p| p.price).collect();
        assert!(prices.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_sort_name_asc() {
        let mut products = sample();
        sort_products(&mut products, Some(SortKey::NameAsc));
        let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Blue Hat", "Green Scarf", "Red Shoe"]);
    }

    #[test]
    fn test_sort_none_preserves_order() {
        let mut products = sample();
        sort_products(&mut products, None);
        let ids: Vec<_> = products.iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
