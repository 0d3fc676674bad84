pub mod a001_menu;
pub mod a002_order;
pub mod a003_qr_code;
pub mod a004_admin;
