//! Page-supplied configuration.

use crate::dom;
use ms_storefront_core::{ConfigError, StorefrontConfig};

pub const CONFIG_ELEMENT_ID: &str = "storefront-config";

/// Read the inline `<script id="storefront-config" type="application/json">`
/// block. `Ok(None)` when the page does not provide one.
pub fn read() -> Result<Option<StorefrontConfig>, ConfigError> {
    let raw = dom::by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
        .filter(|text| !text.trim().is_empty());
    match raw {
        Some(raw) => StorefrontConfig::from_json(&raw).map(Some),
        None => Ok(None),
    }
}
