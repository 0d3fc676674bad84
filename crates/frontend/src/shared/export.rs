//! Browser downloads and inline image display
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, HtmlImageElement, Url};

use contracts::domain::a003_qr_code::QrCode;

pub const QR_IMAGE_CONTAINER_ID: &str = "qr-code-image";

/// Show the QR image on the page and save it as `file_name`.
///
/// A payload that is not valid base64 falls back to a `data:` URL; the
/// browser then shows a broken image and saves nothing useful.
pub fn display_and_download_image(qr: &QrCode, file_name: &str) -> Result<(), String> {
    let table_number = qr.table_number.as_deref().unwrap_or("-");
    show_image(&qr.data_url(), table_number)?;

    match qr.png_bytes() {
        Some(bytes) => {
            let blob = create_png_blob(&bytes)?;
            let url = Url::create_object_url_with_blob(&blob)
                .map_err(|e| format!("Failed to create object URL: {:?}", e))?;
            download_url(&url, file_name)?;
            Url::revoke_object_url(&url).map_err(|e| format!("Failed to revoke URL: {:?}", e))?;
        }
        None => {
            log::warn!("QR code for table {} is not valid base64", table_number);
            download_url(&qr.data_url(), file_name)?;
        }
    }
    Ok(())
}

fn create_png_blob(bytes: &[u8]) -> Result<Blob, String> {
    let array = js_sys::Array::new();
    array.push(&js_sys::Uint8Array::from(bytes));

    let properties = BlobPropertyBag::new();
    properties.set_type("image/png");

    Blob::new_with_u8_array_sequence_and_options(&array, &properties)
        .map_err(|e| format!("Failed to create blob: {:?}", e))
}

fn show_image(src: &str, table_number: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window object")?;
    let document = window.document().ok_or("No document object")?;

    let image = document
        .create_element("img")
        .map_err(|e| format!("Failed to create image: {:?}", e))?
        .dyn_into::<HtmlImageElement>()
        .map_err(|e| format!("Failed to cast to image: {:?}", e))?;
    image.set_src(src);
    image.set_alt(&format!("QR code for table {}", table_number));
    image.set_class_name("qr-image");

    let container = match document.get_element_by_id(QR_IMAGE_CONTAINER_ID) {
        Some(el) => el,
        None => document.body().ok_or("No body element")?.into(),
    };
    container.set_inner_html("");
    container
        .append_child(&image)
        .map_err(|e| format!("Failed to append image: {:?}", e))?;
    Ok(())
}

fn download_url(href: &str, file_name: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window object")?;
    let document = window.document().ok_or("No document object")?;

    let anchor = document
        .create_element("a")
        .map_err(|e| format!("Failed to create anchor: {:?}", e))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|e| format!("Failed to cast to anchor: {:?}", e))?;

    anchor.set_href(href);
    anchor.set_download(file_name);
    anchor
        .style()
        .set_property("display", "none")
        .map_err(|e| format!("Failed to set style: {:?}", e))?;

    let body = document.body().ok_or("No body element")?;
    body.append_child(&anchor)
        .map_err(|e| format!("Failed to append anchor: {:?}", e))?;
    anchor.click();
    body.remove_child(&anchor)
        .map_err(|e| format!("Failed to remove anchor: {:?}", e))?;

    Ok(())
}
