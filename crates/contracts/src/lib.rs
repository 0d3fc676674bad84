pub mod domain;
pub mod push;
pub mod shared;
