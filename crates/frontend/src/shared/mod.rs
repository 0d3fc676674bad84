pub mod api_client;
pub mod api_utils;
pub mod components;
pub mod dialog;
pub mod export;
pub mod icons;
pub mod query;
