//! DOM element bindings.
//!
//! All containers the storefront renders into are resolved once at startup.
//! Static controls (header buttons, overlay close buttons, bottom nav) carry
//! `data-action` attributes and need no binding.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlInputElement, HtmlSelectElement};

fn doc() -> Document {
    gloo_utils::document()
}

pub fn by_id(id: &str) -> Option<Element> {
    doc().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn query(selector: &str) -> Option<Element> {
    doc().query_selector(selector).ok()?
}

pub fn query_all(selector: &str) -> Vec<Element> {
    let Ok(nl) = doc().query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nl.length())
        .filter_map(|i| nl.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

/// Element references used by the storefront view.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    // Catalog
    pub categories_container: Element,
    pub products_grid: Element,
    pub loading_indicator: Element,
    pub sort_select: HtmlSelectElement,
    pub nav_items: Vec<Element>,

    // Header
    pub cart_badge: Element,

    // Overlays
    pub product_modal: Element,
    pub product_detail: Element,
    pub cart_modal: Element,
    pub cart_content: Element,
    pub search_modal: Element,
    pub search_input: HtmlInputElement,
    pub search_results: Element,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_input {
    ($id:expr) => {
        by_id_typed::<HtmlInputElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing input #{}", $id)))?
    };
}

macro_rules! get_select {
    ($id:expr) => {
        by_id_typed::<HtmlSelectElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing select #{}", $id)))?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after the document is parsed.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            categories_container: get_el!("categoriesContainer"),
            products_grid: get_el!("productsGrid"),
            loading_indicator: get_el!("loadingIndicator"),
            sort_select: get_select!("sortSelect"),
            nav_items: query_all(".nav-item[data-action]"),

            cart_badge: get_el!("cartBadge"),

            product_modal: get_el!("productModal"),
            product_detail: get_el!("productDetail"),
            cart_modal: get_el!("cartModal"),
            cart_content: get_el!("cartContent"),
            search_modal: get_el!("searchModal"),
            search_input: get_input!("searchInput"),
            search_results: get_el!("searchResults"),
        })
    }
}
