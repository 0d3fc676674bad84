//! Customer menu page
//!
//! - view_model.rs: catalog and cart state, fetch/add/remove/submit commands
//! - view.rs: catalog tree and the cart panel

mod view;
mod view_model;

pub use view::MenuPage;
pub use view_model::MenuViewModel;
