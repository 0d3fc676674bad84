pub mod aggregate;

pub use aggregate::{
    normalize_qr_codes, sort_newest_first, GenerateQrCodeRequest, QrCode, QrCodeError,
};
