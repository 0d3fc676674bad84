//! Table QR codes: list, generate, show and download

mod view;
mod view_model;

pub use view::QrCodeList;
pub use view_model::QrCodeListViewModel;
