use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::date_utils::parse_timestamp;
use crate::shared::response::{extract_list, string_or_number};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QrCodeError {
    #[error("Enter table number to proceed")]
    MissingTableNumber,
}

/// Generated table QR code. The image itself is rendered by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QrCode {
    #[serde(rename = "tableNumber", default, deserialize_with = "string_or_number")]
    pub table_number: Option<String>,

    #[serde(rename = "qrCodeBase64", default)]
    pub qr_code_base64: String,

    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

impl QrCode {
    pub const PREVIEW_LEN: usize = 9;

    /// First characters of the payload, shown in the list instead of the image
    pub fn preview(&self) -> String {
        self.qr_code_base64.chars().take(Self::PREVIEW_LEN).collect()
    }

    pub fn file_name(&self) -> String {
        format!("{}-image.png", self.table_number.as_deref().unwrap_or("table"))
    }

    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", self.qr_code_base64)
    }

    /// PNG bytes of the code. `None` when the payload is not valid base64.
    pub fn png_bytes(&self) -> Option<Vec<u8>> {
        STANDARD.decode(self.qr_code_base64.trim()).ok()
    }
}

/// Body of `POST /api/qrcode`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateQrCodeRequest {
    #[serde(rename = "tableNumber")]
    pub table_number: String,

    /// Page origin the code points at; the backend appends `?tableNumber=`
    #[serde(rename = "menuUrl")]
    pub menu_url: String,
}

impl GenerateQrCodeRequest {
    /// Validate the typed table number. Blank input is refused before any
    /// request is made.
    pub fn new(table_number: &str, menu_url: impl Into<String>) -> Result<Self, QrCodeError> {
        let table_number = table_number.trim();
        if table_number.is_empty() {
            return Err(QrCodeError::MissingTableNumber);
        }
        Ok(Self {
            table_number: table_number.to_string(),
            menu_url: menu_url.into(),
        })
    }
}

/// Decode the `/api/get-all-qr-codes` body (`{ "qrCodes": [...] }` or a bare
/// array)
pub fn normalize_qr_codes(body: &serde_json::Value) -> Vec<QrCode> {
    extract_list(body, "qrCodes")
        .into_iter()
        .filter_map(|raw| match serde_json::from_value::<QrCode>(raw) {
            Ok(code) => Some(code),
            Err(e) => {
                log::warn!("Skipping malformed QR code entry: {}", e);
                None
            }
        })
        .collect()
}

/// Newest first by `createdAt`; undated codes go last
pub fn sort_newest_first(codes: &mut [QrCode]) {
    codes.sort_by_key(|code| {
        std::cmp::Reverse(code.created_at.as_deref().and_then(parse_timestamp))
    });
}
