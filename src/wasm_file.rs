//! Browser file plumbing.
//!
//! Object URLs back the displayable resource of each upload, and box files are
//! handed to the user through a temporary download link.

use std::sync::Arc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::format::{BOX_MEDIA_TYPE, BoxFile};
use crate::resource::{ResourceHandle, ResourceHost};

fn blob_from_bytes(bytes: &[u8], media_type: &str) -> Result<Blob, JsValue> {
    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type(media_type);
    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
}

/// Resource host that turns uploads into object URLs.
#[derive(Debug, Default)]
pub struct ObjectUrlHost {
    next_id: u64,
}

impl ResourceHost for ObjectUrlHost {
    fn allocate(&mut self, name: &str, media_type: &str, bytes: &Arc<[u8]>) -> ResourceHandle {
        self.next_id += 1;
        let url = blob_from_bytes(bytes, media_type)
            .and_then(|blob| Url::create_object_url_with_blob(&blob))
            .unwrap_or_else(|e| {
                log::warn!("Could not create object URL for {}: {:?}", name, e);
                String::new()
            });
        ResourceHandle::new(self.next_id, url)
    }

    fn release(&mut self, handle: ResourceHandle) {
        if handle.url().is_empty() {
            return;
        }
        if let Err(e) = Url::revoke_object_url(handle.url()) {
            log::warn!("Failed to revoke {}: {:?}", handle.url(), e);
        }
    }
}

/// Offer a box file as a download.
pub fn download_box_file(file: &BoxFile) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no document body"))?;

    let blob = blob_from_bytes(file.content.as_bytes(), BOX_MEDIA_TYPE)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(&file.filename);
    body.append_child(&anchor)?;
    anchor.click();
    body.remove_child(&anchor)?;
    Url::revoke_object_url(&url)?;

    log::info!("Downloaded {}", file.filename);
    Ok(())
}
