//! Event binding.
//!
//! One delegated click listener on the document resolves `data-action`
//! elements into storefront actions. Async work runs via
//! `wasm_bindgen_futures::spawn_local`.

use crate::Shop;
use crate::dom::Elements;
use crate::scheduler::TimeoutScheduler;
use ms_api_types::SortKey;
use ms_storefront_core::{
    Action, DELEGATION_SELECTOR, Debouncer, FALLBACK_MARKER, StorefrontConfig, image_fallback,
};
use std::rc::Rc;
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, EventTarget, HtmlImageElement};

fn listen(
    target: &EventTarget,
    event: &str,
    capture: bool,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<(), JsValue> {
    let cb = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
    target.add_event_listener_with_callback_and_bool(event, cb.as_ref().unchecked_ref(), capture)?;
    cb.forget();
    Ok(())
}

/// Resolve the nearest `[data-action]` ancestor of the click target. Clicks
/// whose nearest match is an action boundary resolve to nothing.
fn action_for(event: &web_sys::Event) -> Option<Result<Action, ms_storefront_core::ActionError>> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let el = target.closest(DELEGATION_SELECTOR).ok()??;
    let name = el.get_attribute("data-action")?;
    Some(Action::from_attributes(&name, |attr| {
        el.get_attribute(&format!("data-{attr}"))
    }))
}

/// Bind all UI event listeners. Call once after init.
pub fn bind_events(els: &Elements, shop: &Rc<Shop>, config: &StorefrontConfig) -> Result<(), JsValue> {
    let document: EventTarget = gloo_utils::document().into();

    // ── Delegated clicks ──
    {
        let shop = shop.clone();
        listen(&document, "click", false, move |event| {
            match action_for(&event) {
                Some(Ok(action)) => {
                    let shop = shop.clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        shop.dispatch(action).await;
                    });
                }
                Some(Err(err)) => warn!("ignoring click: {}", err),
                None => {}
            }
        })?;
    }

    // ── Search ──
    {
        let shop = shop.clone();
        let input = els.search_input.clone();
        let debouncer = Debouncer::new(TimeoutScheduler, config.search_debounce());
        listen(&els.search_input, "input", false, move |_| {
            let shop = shop.clone();
            let value = input.value();
            debouncer.trigger(move || {
                wasm_bindgen_futures::spawn_local(async move {
                    shop.search(&value).await;
                });
            });
        })?;
    }

    // ── Sort ──
    {
        let shop = shop.clone();
        let select = els.sort_select.clone();
        listen(&els.sort_select, "change", false, move |_| {
            match select.value().parse::<SortKey>() {
                Ok(sort) => {
                    let shop = shop.clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        shop.set_sort(sort).await;
                    });
                }
                Err(err) => warn!("{}", err),
            }
        })?;
    }

    // ── Host back control ──
    {
        let host = shop.host().clone();
        let shop = shop.clone();
        host.on_back_button(move || shop.back());
    }

    // ── Broken images ──
    // `error` does not bubble, so listen in the capture phase.
    {
        let placeholder = config.placeholder_image.clone();
        listen(&document, "error", true, move |event| {
            let Some(img) = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlImageElement>().ok())
            else {
                return;
            };
            let swapped = img.has_attribute(FALLBACK_MARKER);
            let Some(fallback) = image_fallback(&placeholder, &img.class_name(), swapped) else {
                return;
            };
            if let Err(err) = img.set_attribute(FALLBACK_MARKER, "") {
                warn!("cannot mark image fallback: {:?}", err);
                return;
            }
            img.set_src(&fallback);
        })?;
    }

    Ok(())
}
