pub mod cart;
pub mod menu_page;
