pub mod aggregate;
pub mod cart;

pub use aggregate::{normalize_menus, Category, Menu, MenuItem, SubCategory};
pub use cart::{Cart, CartError, CartItem};
