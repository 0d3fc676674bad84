//! Staff order list with the detail pane

mod view;
mod view_model;

pub use view::OrderList;
pub use view_model::OrderListViewModel;
