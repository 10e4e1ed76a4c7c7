//! Storefront controller: catalog, cart, favorites, search and overlay
//! navigation over the `Backend`, `Host` and `View` seams.
//!
//! Failures never escape an operation. Read paths log and render an error
//! placeholder; mutations log and raise a host alert.

use crate::actions::Action;
use crate::config::StorefrontConfig;
use crate::host::{Host, HostError, ImpactStyle, Popup};
use crate::overlay::Overlay;
use crate::render::{Renderer, cart_badge_count};
use crate::state::{AppState, CategoryFilter, FavoriteSet, NavTab};
use crate::theme::css_variables;
use crate::view::{Region, View};
use ms_api_types::{CartMutation, CheckoutPayload, ProductId, ProductQuery, SortKey};
use ms_client::Backend;
use std::cell::RefCell;
use tracing::{debug, error, info, warn};

const ADD_TO_CART_FAILED: &str = "Ошибка добавления в корзину";
const UPDATE_CART_FAILED: &str = "Ошибка обновления корзины";
const FAVORITE_FAILED: &str = "Ошибка обновления избранного";
const CHECKOUT_FAILED: &str = "Ошибка оформления заказа";

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("failed to encode checkout payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Host(#[from] HostError),
}

pub struct Storefront<B, H, V> {
    backend: B,
    host: H,
    view: V,
    renderer: Renderer,
    min_search_len: usize,
    state: RefCell<AppState>,
}

impl<B: Backend, H: Host, V: View> Storefront<B, H, V> {
    pub fn new(backend: B, host: H, view: V, config: &StorefrontConfig) -> Self {
        Self {
            backend,
            host,
            view,
            renderer: Renderer::new(config),
            min_search_len: config.min_search_len,
            state: RefCell::new(AppState::default()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Signal readiness, take the full viewport and adopt the host colours.
    pub fn bootstrap_host(&self) {
        self.host.ready();
        self.host.expand();
        self.view
            .apply_theme(&css_variables(&self.host.theme_params()));
        self.sync_back_button();
    }

    /// Initial data load, strictly in sequence.
    pub async fn start(&self) {
        self.load_categories().await;
        self.load_products().await;
        self.load_cart().await;
        self.load_favorites().await;
    }

    pub async fn dispatch(&self, action: Action) {
        debug!("dispatch {:?}", action);
        match action {
            Action::SelectCategory(filter) => self.select_category(filter).await,
            Action::OpenProduct(id) => self.open_product(id).await,
            Action::CloseProduct => self.close_product(),
            Action::AddToCart(id) => self.add_to_cart(id).await,
            Action::Buy(id) => self.buy(id).await,
            Action::ToggleFavorite(id) => self.toggle_favorite(id).await,
            Action::SetQuantity {
                product_id,
                quantity,
            } => self.update_cart_item(product_id, quantity).await,
            Action::OpenCart => self.open_cart().await,
            Action::CloseCart => self.close_cart(),
            Action::Checkout => self.checkout(),
            Action::OpenSearch => self.open_search(),
            Action::CloseSearch => self.close_search(),
            Action::OpenSearchResult(id) => self.open_search_result(id).await,
            Action::ShowCatalog => self.show_catalog().await,
            Action::ShowFavorites => self.show_favorites().await,
        }
    }

    // Catalog

    pub async fn load_categories(&self) {
        match self.backend.categories().await {
            Ok(categories) => {
                let html = {
                    let mut state = self.state.borrow_mut();
                    state.categories = categories;
                    self.renderer.categories(&state.categories, state.category)
                };
                self.view.replace(Region::Categories, &html);
            }
            Err(err) => error!("failed to load categories: {}", err),
        }
    }

    fn render_categories(&self) {
        let html = {
            let state = self.state.borrow();
            self.renderer.categories(&state.categories, state.category)
        };
        self.view.replace(Region::Categories, &html);
    }

    fn switch_tab(&self, tab: NavTab) {
        self.state.borrow_mut().tab = tab;
        self.view.set_nav(tab);
    }

    pub async fn select_category(&self, filter: CategoryFilter) {
        self.state.borrow_mut().category = filter;
        self.render_categories();
        self.switch_tab(NavTab::Catalog);
        self.load_products().await;
    }

    pub async fn set_sort(&self, sort: SortKey) {
        self.state.borrow_mut().sort = sort;
        self.switch_tab(NavTab::Catalog);
        self.load_products().await;
    }

    /// Fetch the grid for the current category and sort. Only the response
    /// to the latest grid request is rendered.
    pub async fn load_products(&self) {
        let (ticket, query) = {
            let mut state = self.state.borrow_mut();
            let query = ProductQuery {
                sort: state.sort,
                category_id: state.category.category_id(),
                search: None,
            };
            (state.grid_requests.issue(), query)
        };
        self.view.set_loading(true);

        let result = self.backend.products(query).await;

        let html = {
            let mut state = self.state.borrow_mut();
            if !state.grid_requests.is_current(ticket) {
                debug!("discarding stale product list response");
                return;
            }
            match result {
                Ok(products) => {
                    state.products = products;
                    self.renderer.product_grid(&state.products, &state.favorites)
                }
                Err(err) => {
                    error!("failed to load products: {}", err);
                    self.renderer.products_error()
                }
            }
        };
        self.view.replace(Region::Products, &html);
        self.view.set_loading(false);
    }

    pub async fn show_catalog(&self) {
        self.switch_tab(NavTab::Catalog);
        self.load_products().await;
    }

    pub async fn show_favorites(&self) {
        self.switch_tab(NavTab::Favorites);
        let ticket = self.state.borrow_mut().grid_requests.issue();
        self.view.set_loading(true);

        let result = self.backend.favorites().await;

        let html = {
            let mut state = self.state.borrow_mut();
            if !state.grid_requests.is_current(ticket) {
                debug!("discarding stale favorites response");
                return;
            }
            match result {
                Ok(products) => {
                    state.favorites = FavoriteSet::from_products(&products);
                    state.favorite_products = products;
                    if state.favorite_products.is_empty() {
                        self.renderer.favorites_empty()
                    } else {
                        self.renderer
                            .product_grid(&state.favorite_products, &state.favorites)
                    }
                }
                Err(err) => {
                    error!("failed to load favorites: {}", err);
                    self.renderer.products_error()
                }
            }
        };
        self.view.replace(Region::Products, &html);
        self.view.set_loading(false);
    }

    // Product detail

    pub async fn open_product(&self, id: ProductId) {
        self.open_overlay(Overlay::ProductDetail);
        self.view
            .replace(Region::ProductDetail, &self.renderer.loading());
        let ticket = self.state.borrow_mut().detail_requests.issue();

        let result = self.backend.product(id).await;

        let html = {
            let state = self.state.borrow();
            if !state.detail_requests.is_current(ticket) {
                debug!("discarding stale detail response for {}", id);
                return;
            }
            match result {
                Ok(product) => self.renderer.product_detail(&product, &state.favorites),
                Err(err) => {
                    error!("failed to load product {}: {}", id, err);
                    self.renderer.detail_error()
                }
            }
        };
        self.view.replace(Region::ProductDetail, &html);
    }

    pub fn close_product(&self) {
        self.close_overlay(Overlay::ProductDetail);
    }

    pub async fn buy(&self, id: ProductId) {
        self.add_to_cart(id).await;
        self.close_product();
    }

    // Cart

    pub async fn load_cart(&self) {
        match self.backend.cart().await {
            Ok(cart) => {
                let (html, count) = {
                    let mut state = self.state.borrow_mut();
                    state.cart = cart.items;
                    (
                        self.renderer.cart(&state.cart),
                        cart_badge_count(&state.cart),
                    )
                };
                self.view.set_cart_badge(count);
                self.view.replace(Region::Cart, &html);
            }
            Err(err) => error!("failed to load cart: {}", err),
        }
    }

    pub async fn add_to_cart(&self, id: ProductId) {
        let item = CartMutation {
            product_id: id,
            quantity: 1,
        };
        match self.backend.add_to_cart(item).await {
            Ok(ack) if ack.success => {
                self.host.impact(ImpactStyle::Light);
                if let Err(err) = self.host.show_popup(&Popup::added_to_cart()) {
                    warn!("cart popup not shown: {}", err);
                }
                self.load_cart().await;
            }
            Ok(_) => {
                warn!("backend rejected adding {} to cart", id);
                self.alert(ADD_TO_CART_FAILED);
            }
            Err(err) => {
                error!("failed to add {} to cart: {}", id, err);
                self.alert(ADD_TO_CART_FAILED);
            }
        }
    }

    /// Set a line's quantity; zero or below removes the line.
    pub async fn update_cart_item(&self, id: ProductId, quantity: i64) {
        let result = if quantity <= 0 {
            self.backend.remove_from_cart(id).await
        } else {
            let item = CartMutation {
                product_id: id,
                quantity: u32::try_from(quantity).unwrap_or(u32::MAX),
            };
            self.backend.update_cart(item).await
        };

        match result {
            Ok(ack) if ack.success => self.load_cart().await,
            Ok(_) => {
                warn!("backend rejected cart update for {}", id);
                self.alert(UPDATE_CART_FAILED);
            }
            Err(err) => {
                error!("failed to update cart line {}: {}", id, err);
                self.alert(UPDATE_CART_FAILED);
            }
        }
    }

    pub async fn open_cart(&self) {
        self.open_overlay(Overlay::Cart);
        let html = self.renderer.cart(&self.state.borrow().cart);
        self.view.replace(Region::Cart, &html);
        self.load_cart().await;
    }

    pub fn close_cart(&self) {
        self.close_overlay(Overlay::Cart);
    }

    /// Hand the cart to the host and end the session.
    pub fn checkout(&self) {
        self.host.set_main_button_progress(true);
        match self.send_checkout() {
            Ok(()) => {
                info!("checkout sent");
                self.close_cart();
                self.host.close();
            }
            Err(err) => {
                error!("checkout failed: {}", err);
                self.alert(CHECKOUT_FAILED);
            }
        }
        self.host.set_main_button_progress(false);
    }

    fn send_checkout(&self) -> Result<(), CheckoutError> {
        let payload = CheckoutPayload::new(self.state.borrow().cart.clone());
        let data = serde_json::to_string(&payload)?;
        self.host.send_data(&data)?;
        Ok(())
    }

    // Favorites

    pub async fn load_favorites(&self) {
        match self.backend.favorites().await {
            Ok(products) => {
                let markers: Vec<(ProductId, bool)> = {
                    let mut state = self.state.borrow_mut();
                    state.favorites = FavoriteSet::from_products(&products);
                    state.favorite_products = products;
                    state
                        .products
                        .iter()
                        .map(|p| (p.id, state.favorites.contains(p.id)))
                        .collect()
                };
                for (id, active) in markers {
                    self.view.set_favorite_marker(id, active);
                }
            }
            Err(err) => error!("failed to load favorites: {}", err),
        }
    }

    /// The backend decides the new membership; local state follows it.
    pub async fn toggle_favorite(&self, id: ProductId) {
        match self.backend.toggle_favorite(id).await {
            Ok(reply) => {
                let tab = {
                    let mut state = self.state.borrow_mut();
                    state.favorites.set(id, reply.is_favorite);
                    state.tab
                };
                if reply.is_favorite {
                    self.host.impact(ImpactStyle::Light);
                }
                self.view.set_favorite_marker(id, reply.is_favorite);
                if tab == NavTab::Favorites {
                    self.show_favorites().await;
                }
            }
            Err(err) => {
                error!("failed to toggle favorite {}: {}", id, err);
                self.alert(FAVORITE_FAILED);
            }
        }
    }

    // Search

    pub fn open_search(&self) {
        self.open_overlay(Overlay::Search);
        self.view.focus_search();
    }

    pub fn close_search(&self) {
        self.state.borrow_mut().search_requests.issue();
        self.close_overlay(Overlay::Search);
    }

    /// Run a search for the input value once the debounce window elapsed.
    pub async fn search(&self, raw: &str) {
        let query = raw.trim();
        let (ticket, sort) = {
            let mut state = self.state.borrow_mut();
            (state.search_requests.issue(), state.sort)
        };

        if query.chars().count() < self.min_search_len {
            self.view.replace(
                Region::SearchResults,
                &self.renderer.search_hint(self.min_search_len),
            );
            return;
        }

        let result = self
            .backend
            .products(ProductQuery {
                sort,
                category_id: None,
                search: Some(query.to_owned()),
            })
            .await;

        if !self.state.borrow().search_requests.is_current(ticket) {
            debug!("discarding stale search response for {:?}", query);
            return;
        }
        let html = match result {
            Ok(products) => self.renderer.search_results(&products),
            Err(err) => {
                warn!("search for {:?} failed: {}", query, err);
                self.renderer.search_error()
            }
        };
        self.view.replace(Region::SearchResults, &html);
    }

    pub async fn open_search_result(&self, id: ProductId) {
        self.close_search();
        self.open_product(id).await;
    }

    // Navigation

    /// Close the deepest open overlay, or end the session when none is open.
    pub fn back(&self) {
        let deepest = self.state.borrow().overlays.deepest();
        match deepest {
            Some(overlay) => self.close_overlay(overlay),
            None => self.host.close(),
        }
    }

    pub fn open_overlay(&self, overlay: Overlay) {
        self.set_overlay(overlay, true);
    }

    pub fn close_overlay(&self, overlay: Overlay) {
        self.set_overlay(overlay, false);
    }

    fn set_overlay(&self, overlay: Overlay, open: bool) {
        self.state.borrow_mut().overlays.set(overlay, open);
        self.view.set_overlay(overlay, open);
        self.sync_back_button();
    }

    fn alert(&self, message: &str) {
        if let Err(err) = self.host.show_alert(message) {
            warn!("alert {:?} not shown: {}", message, err);
        }
    }

    fn sync_back_button(&self) {
        let visible = self.state.borrow().overlays.any_open();
        self.host.set_back_button_visible(visible);
    }
}
