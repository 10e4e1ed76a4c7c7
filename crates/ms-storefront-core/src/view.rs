//! Render target seam. The browser implements it over the DOM.

use crate::overlay::Overlay;
use crate::state::NavTab;
use ms_api_types::ProductId;

/// Containers whose contents are replaced wholesale on each render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Categories,
    Products,
    ProductDetail,
    Cart,
    SearchResults,
}

pub trait View {
    fn replace(&self, region: Region, html: &str);
    fn set_loading(&self, loading: bool);
    fn set_cart_badge(&self, count: u32);
    /// Mark every heart control bound to `id`.
    fn set_favorite_marker(&self, id: ProductId, active: bool);
    fn set_overlay(&self, overlay: Overlay, open: bool);
    fn focus_search(&self);
    fn set_nav(&self, tab: NavTab);
    fn apply_theme(&self, vars: &[(&'static str, String)]);
}
