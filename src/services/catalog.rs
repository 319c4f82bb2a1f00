use once_cell::sync::Lazy;

use crate::models::product::Product;

const MAX_RECOMMENDATIONS: usize = 3;

/// Static demo catalog. Real inventory would live behind a service; this
/// mirrors the seed data the storefront ships with.
static PRODUCTS: Lazy<Vec<Product>> = Lazy::new(|| {
    vec![
        Product {
            id: "1".to_string(),
            name: "Classic White Shirt".to_string(),
            category: "shirts".to_string(),
            description: "Minimalist white button-down shirt".to_string(),
            price: 89.99,
            image: "/api/placeholder/400/500".to_string(),
            tags: vec!["formal", "white", "classic", "shirt"]
                .into_iter()
                .map(String::from)
                .collect(),
        },
        Product {
            id: "2".to_string(),
            name: "Black Slim-Fit Suit".to_string(),
            category: "suits".to_string(),
            description: "Modern slim-fit black suit".to_string(),
            price: 299.99,
            image: "/api/placeholder/400/500".to_string(),
            tags: vec!["formal", "black", "suit", "slim-fit"]
                .into_iter()
                .map(String::from)
                .collect(),
        },
        Product {
            id: "3".to_string(),
            name: "Relaxed Denim Jacket".to_string(),
            category: "jackets".to_string(),
            description: "Washed denim jacket for casual layering".to_string(),
            price: 129.99,
            image: "/api/placeholder/400/500".to_string(),
            tags: vec!["casual", "denim", "jacket", "blue"]
                .into_iter()
                .map(String::from)
                .collect(),
        },
    ]
});

/// Products whose tags intersect the given tags, capped at three.
pub fn find_products_by_tags(tags: &[String]) -> Vec<Product> {
    PRODUCTS
        .iter()
        .filter(|product| {
            tags.iter()
                .any(|tag| product.tags.contains(&tag.to_lowercase()))
        })
        .take(MAX_RECOMMENDATIONS)
        .cloned()
        .collect()
}

/// Extract catalog tags mentioned in free-text advice. Tag matching is
/// case-insensitive whole-substring containment over the tag vocabulary.
pub fn tags_in_text(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut found: Vec<String> = Vec::new();
    for product in PRODUCTS.iter() {
        for tag in &product.tags {
            if lowered.contains(tag.as_str()) && !found.contains(tag) {
                found.push(tag.clone());
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_products_matching_any_tag() {
        let products = find_products_by_tags(&["formal".to_string()]);
        assert_eq!(products.len(), 2);
    }

    #[test]
    fn tag_match_is_case_insensitive() {
        let products = find_products_by_tags(&["FORMAL".to_string()]);
        assert_eq!(products.len(), 2);
    }

    #[test]
    fn unknown_tags_match_nothing() {
        assert!(find_products_by_tags(&["spacesuit".to_string()]).is_empty());
    }

    #[test]
    fn extracts_known_tags_from_advice_text() {
        let tags = tags_in_text("A classic white shirt would pair well with the suit.");
        assert!(tags.contains(&"white".to_string()));
        assert!(tags.contains(&"shirt".to_string()));
        assert!(tags.contains(&"suit".to_string()));
    }
}
