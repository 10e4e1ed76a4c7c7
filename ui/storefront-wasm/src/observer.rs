//! Keeps the host back control in step with the DOM overlay classes.

use crate::host::TelegramHost;
use ms_storefront_core::Host;
use wasm_bindgen::prelude::*;
use web_sys::{MutationObserver, MutationObserverInit};

/// Watch `class` changes anywhere under `<body>` and show the back control
/// while any `.modal.open` exists.
pub fn watch_overlays(host: TelegramHost) -> Result<MutationObserver, JsValue> {
    let cb = Closure::wrap(Box::new(move |_: js_sys::Array, _: MutationObserver| {
        let open = crate::dom::query(".modal.open").is_some();
        host.set_back_button_visible(open);
    }) as Box<dyn FnMut(js_sys::Array, MutationObserver)>);
    let observer = MutationObserver::new(cb.as_ref().unchecked_ref())?;
    cb.forget();

    let init = MutationObserverInit::new();
    init.set_attributes(true);
    init.set_subtree(true);
    init.set_attribute_filter(&js_sys::Array::of1(&JsValue::from_str("class")));

    let body = gloo_utils::body();
    observer.observe_with_options(&body, &init)?;
    Ok(observer)
}
