use contracts::domain::a003_qr_code::{
    normalize_qr_codes, sort_newest_first, GenerateQrCodeRequest, QrCode,
};
use contracts::shared::paging::PageRequest;
use leptos::prelude::*;

use crate::shared::api_client::ApiClient;
use crate::shared::api_utils::page_origin;
use crate::shared::dialog::alert;
use crate::shared::export::display_and_download_image;

#[derive(Clone, Copy)]
pub struct QrCodeListViewModel {
    pub codes: RwSignal<Vec<QrCode>>,
    pub table_input: RwSignal<String>,
    pub loading: RwSignal<bool>,
    pub generating: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
    api: StoredValue<ApiClient>,
}

impl QrCodeListViewModel {
    pub fn new(api: ApiClient) -> Self {
        Self {
            codes: RwSignal::new(Vec::new()),
            table_input: RwSignal::new(String::new()),
            loading: RwSignal::new(false),
            generating: RwSignal::new(false),
            error: RwSignal::new(None),
            api: StoredValue::new(api),
        }
    }

    pub fn fetch_qr_codes(&self) {
        let vm = *self;
        // Also runs after generating a code, when the page may be gone
        let Some(api) = vm.api.try_get_value() else {
            return;
        };
        vm.loading.try_set(true);
        wasm_bindgen_futures::spawn_local(async move {
            match api.list_qr_codes(&PageRequest::first_page()).await {
                Ok(body) => {
                    let mut codes = normalize_qr_codes(&body);
                    sort_newest_first(&mut codes);
                    vm.codes.try_set(codes);
                }
                Err(_) => {
                    vm.error.try_set(Some("Failed to fetch QR codes".to_string()));
                }
            }
            vm.loading.try_set(false);
        });
    }

    pub fn generate_qr_code(&self) {
        if self.generating.get_untracked() {
            return;
        }
        let request =
            match GenerateQrCodeRequest::new(&self.table_input.get_untracked(), page_origin()) {
                Ok(request) => request,
                Err(e) => {
                    alert(&e.to_string());
                    return;
                }
            };

        let vm = *self;
        let api = vm.api.get_value();
        vm.generating.set(true);
        wasm_bindgen_futures::spawn_local(async move {
            match api.generate_qr_code(&request).await {
                Ok(_) => {
                    log::info!("QR code generated for table {}", request.table_number);
                    vm.table_input.try_set(String::new());
                    vm.error.try_set(None);
                    vm.fetch_qr_codes();
                }
                Err(_) => {
                    vm.error.try_set(Some("Failed to generate QR code".to_string()));
                }
            }
            vm.generating.try_set(false);
        });
    }

    pub fn display_and_download(&self, qr: &QrCode) {
        if let Err(e) = display_and_download_image(qr, &qr.file_name()) {
            log::error!("QR image download failed: {}", e);
            self.error.set(Some(e));
        }
    }
}
