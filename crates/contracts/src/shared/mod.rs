pub mod date_utils;
pub mod number_format;
pub mod paging;
pub mod response;
