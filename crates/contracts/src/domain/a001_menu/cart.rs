use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::aggregate::MenuItem;
use crate::shared::response::lenient_f64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("No items in cart to submit!")]
    Empty,
}

/// One line of the cart: a menu item plus how many of it were picked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(default)]
    pub name: String,

    /// Same as `name`; the staff order pane reads this field
    #[serde(rename = "itemName", default)]
    pub item_name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,

    #[serde(default)]
    pub quantity: u32,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CartItem {
    /// Keys the line sets itself; menu copies of them are dropped from `extra`
    const OWN_KEYS: [&'static str; 5] = ["name", "itemName", "description", "price", "quantity"];

    pub fn from_menu_item(item: &MenuItem) -> Self {
        let mut extra = item.extra.clone();
        for key in Self::OWN_KEYS {
            extra.remove(key);
        }
        Self {
            name: item.name.clone(),
            item_name: item.name.clone(),
            description: item.description.clone(),
            price: item.price,
            quantity: 1,
            extra,
        }
    }

    /// Name to show in the order pane; older orders only carry one of the two
    pub fn display_name(&self) -> &str {
        if self.item_name.is_empty() {
            &self.name
        } else {
            &self.item_name
        }
    }

    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Pre-submission list of picked items.
///
/// Holds at most one line per item name. Every operation returns a new cart
/// and leaves `self` untouched, so a signal holding the old value never sees
/// a half-applied change.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartItem] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Add one unit of `item`, merging into an existing line with the same name
    pub fn with_item(&self, item: &MenuItem) -> Self {
        let mut lines = self.lines.clone();
        match lines.iter_mut().find(|line| line.name == item.name) {
            Some(line) => line.quantity += 1,
            None => lines.push(CartItem::from_menu_item(item)),
        }
        Self { lines }
    }

    /// Drop the line at `index`. Out-of-range indexes leave the cart as is.
    pub fn without_line(&self, index: usize) -> Self {
        let mut lines = self.lines.clone();
        if index < lines.len() {
            lines.remove(index);
        }
        Self { lines }
    }

    /// Σ price × quantity
    pub fn total_price(&self) -> f64 {
        self.lines.iter().map(CartItem::line_total).sum()
    }

    /// Σ quantity
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    pub fn into_lines(self) -> Vec<CartItem> {
        self.lines
    }
}

impl FromIterator<CartItem> for Cart {
    fn from_iter<I: IntoIterator<Item = CartItem>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Cart::new(), |cart, line| {
                let mut lines = cart.lines;
                match lines.iter_mut().find(|l| l.name == line.name) {
                    Some(existing) => existing.quantity += line.quantity,
                    None => lines.push(line),
                }
                Cart { lines }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_merges_by_name() {
        let rice = MenuItem::new("Rice", 700.0);
        let beans = MenuItem::new("Beans", 1200.0);

        let cart = Cart::new()
            .with_item(&rice)
            .with_item(&beans)
            .with_item(&rice)
            .with_item(&rice);

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.lines()[0].name, "Rice");
        assert_eq!(cart.lines()[0].quantity, 3);
        assert_eq!(cart.lines()[1].quantity, 1);
    }

    #[test]
    fn test_add_counts_match_for_any_sequence() {
        let names = ["Eba", "Rice", "Eba", "Beans", "Rice", "Eba", "Dodo"];
        let cart = names
            .iter()
            .fold(Cart::new(), |cart, name| cart.with_item(&MenuItem::new(*name, 100.0)));

        let mut distinct: Vec<&str> = names.to_vec();
        distinct.sort();
        distinct.dedup();
        assert_eq!(cart.len(), distinct.len());

        for name in distinct {
            let expected = names.iter().filter(|n| **n == name).count() as u32;
            let line = cart.lines().iter().find(|l| l.name == name).unwrap();
            assert_eq!(line.quantity, expected, "quantity for {}", name);
        }
    }

    #[test]
    fn test_add_does_not_touch_previous_cart() {
        let rice = MenuItem::new("Rice", 700.0);
        let before = Cart::new().with_item(&rice);
        let after = before.with_item(&rice);

        assert_eq!(before.lines()[0].quantity, 1);
        assert_eq!(after.lines()[0].quantity, 2);
    }

    #[test]
    fn test_remove_line() {
        let cart = Cart::new()
            .with_item(&MenuItem::new("Rice", 700.0))
            .with_item(&MenuItem::new("Beans", 1200.0));

        let removed = cart.without_line(0);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed.lines()[0].name, "Beans");

        assert_eq!(cart.without_line(9), cart);
    }

    #[test]
    fn test_totals() {
        let rice = MenuItem::new("Rice", 700.0);
        let beans = MenuItem::new("Beans", 1200.0);
        let cart = Cart::new().with_item(&rice).with_item(&rice).with_item(&beans);

        assert_eq!(cart.total_price(), 2600.0);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(Cart::new().total_price(), 0.0);
    }

    #[test]
    fn test_item_name_mirrors_name() {
        let cart = Cart::new().with_item(&MenuItem::new("Eba", 300.0));
        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json[0]["itemName"], "Eba");
        assert_eq!(json[0]["quantity"], 1);
    }

    #[test]
    fn test_menu_fields_do_not_shadow_line_fields() {
        let item: MenuItem = serde_json::from_value(serde_json::json!({
            "name": "Rice",
            "price": 700,
            "quantity": 50,
            "itemName": "old",
            "spicy": true
        }))
        .unwrap();
        let cart = Cart::new().with_item(&item).with_item(&item);

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json[0]["quantity"], 2);
        assert_eq!(json[0]["itemName"], "Rice");
        assert_eq!(json[0]["spicy"], true);
        assert_eq!(cart.total_price(), 1400.0);
    }

    #[test]
    fn test_collect_merges_lines() {
        let line = CartItem::from_menu_item(&MenuItem::new("Rice", 700.0));
        let cart: Cart = vec![line.clone(), line].into_iter().collect();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
    }
}
