//! `View` over the bound DOM elements.

use crate::dom::{self, Elements};
use ms_api_types::ProductId;
use ms_storefront_core::{NavTab, Overlay, Region, View};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

pub struct DomView {
    els: Elements,
}

impl DomView {
    pub fn new(els: Elements) -> Self {
        Self { els }
    }

    fn region(&self, region: Region) -> &Element {
        match region {
            Region::Categories => &self.els.categories_container,
            Region::Products => &self.els.products_grid,
            Region::ProductDetail => &self.els.product_detail,
            Region::Cart => &self.els.cart_content,
            Region::SearchResults => &self.els.search_results,
        }
    }

    fn overlay(&self, overlay: Overlay) -> &Element {
        match overlay {
            Overlay::ProductDetail => &self.els.product_modal,
            Overlay::Cart => &self.els.cart_modal,
            Overlay::Search => &self.els.search_modal,
        }
    }
}

fn nav_action(tab: NavTab) -> &'static str {
    match tab {
        NavTab::Catalog => "show-catalog",
        NavTab::Favorites => "show-favorites",
    }
}

impl View for DomView {
    fn replace(&self, region: Region, html: &str) {
        self.region(region).set_inner_html(html);
    }

    fn set_loading(&self, loading: bool) {
        dom::toggle_class(&self.els.loading_indicator, "active", loading);
    }

    fn set_cart_badge(&self, count: u32) {
        let badge = &self.els.cart_badge;
        badge.set_text_content(Some(&count.to_string()));
        let _ = badge.set_attribute("data-count", &count.to_string());
    }

    fn set_favorite_marker(&self, id: ProductId, active: bool) {
        let selector = format!(r#".btn-fav[data-product-id="{id}"]"#);
        for button in dom::query_all(&selector) {
            dom::toggle_class(&button, "active", active);
        }
    }

    fn set_overlay(&self, overlay: Overlay, open: bool) {
        dom::toggle_class(self.overlay(overlay), "open", open);
    }

    fn focus_search(&self) {
        let _ = self.els.search_input.focus();
    }

    fn set_nav(&self, tab: NavTab) {
        let active = nav_action(tab);
        for item in &self.els.nav_items {
            let is_active = item.get_attribute("data-action").as_deref() == Some(active);
            dom::toggle_class(item, "active", is_active);
        }
    }

    fn apply_theme(&self, vars: &[(&'static str, String)]) {
        let Some(root) = gloo_utils::document()
            .document_element()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        let style = root.style();
        for (name, value) in vars {
            let _ = style.set_property(name, value);
        }
    }
}
