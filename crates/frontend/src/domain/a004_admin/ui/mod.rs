pub mod inbox;
pub mod page;
