use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::shared::response::{extract_list, lenient_f64};

// ============================================================================
// Catalog tree
// ============================================================================

/// Top level of the catalog returned by `/api/menus`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Menu {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "subCategories", default)]
    pub sub_categories: Vec<SubCategory>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubCategory {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "menuItemList", default)]
    pub menu_item_list: Vec<MenuItem>,
}

/// A dish on the menu. Fields the client does not know about are kept in
/// `extra` and travel with the item into the cart and the placed order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MenuItem {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            ..Default::default()
        }
    }
}

// ============================================================================
// Response normalization
// ============================================================================

/// Normalize the `/api/menus` body into the catalog. Entries that do not
/// decode as a menu are skipped with a warning.
pub fn normalize_menus(body: &Value) -> Vec<Menu> {
    extract_list(body, "menus")
        .into_iter()
        .filter_map(|raw| match serde_json::from_value::<Menu>(raw) {
            Ok(menu) => Some(menu),
            Err(e) => {
                log::warn!("Skipping malformed menu entry: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog_json() -> Value {
        json!([{
            "categories": [{
                "name": "Mains",
                "subCategories": [{
                    "name": "Swallow",
                    "menuItemList": [
                        { "name": "Eba", "description": "Garri", "price": 300, "id": 7 },
                        { "name": "Rice", "price": 700.0 }
                    ]
                }]
            }]
        }])
    }

    #[test]
    fn test_normalize_wrapped_and_bare() {
        let bare = normalize_menus(&catalog_json());
        let wrapped = normalize_menus(&json!({ "menus": catalog_json() }));
        assert_eq!(bare, wrapped);
        assert_eq!(bare.len(), 1);

        let items = &bare[0].categories[0].sub_categories[0].menu_item_list;
        assert_eq!(items[0].name, "Eba");
        assert_eq!(items[0].price, 300.0);
        assert_eq!(items[0].extra.get("id"), Some(&json!(7)));
        assert_eq!(items[1].description, "");
    }

    #[test]
    fn test_normalize_unexpected_shape() {
        assert!(normalize_menus(&json!({ "detail": "oops" })).is_empty());
        assert!(normalize_menus(&Value::Null).is_empty());
        assert!(normalize_menus(&json!({ "menus": "nope" })).is_empty());
    }

    #[test]
    fn test_normalize_skips_bad_entries() {
        let menus = normalize_menus(&json!([{ "categories": 5 }, { "categories": [] }]));
        assert_eq!(menus.len(), 1);
    }
}
