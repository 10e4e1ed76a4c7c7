//! In-memory doubles for the storefront seams.

use crate::debounce::Scheduler;
use crate::host::{Host, HostError, ImpactStyle, Popup};
use crate::overlay::Overlay;
use crate::state::NavTab;
use crate::theme::ThemeParams;
use crate::view::{Region, View};
use async_trait::async_trait;
use ms_api_types::{
    Cart, CartLine, CartMutation, Category, CategoryId, FavoriteToggle, MutationAck, Product,
    ProductId, ProductQuery,
};
use ms_client::{ApiError, ApiResult, Backend};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::oneshot;

struct Pending {
    due: Duration,
    cancelled: Rc<Cell<bool>>,
    task: Option<Box<dyn FnOnce()>>,
}

#[derive(Default)]
struct Clock {
    now: Duration,
    tasks: Vec<Pending>,
}

/// Scheduler driven by explicit `advance` calls.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<Clock>>,
}

pub struct ManualHandle {
    cancelled: Rc<Cell<bool>>,
}

impl Drop for ManualHandle {
    fn drop(&mut self) {
        self.cancelled.set(true);
    }
}

impl ManualScheduler {
    pub fn advance(&self, by: Duration) {
        let due: Vec<Box<dyn FnOnce()>> = {
            let mut clock = self.clock.borrow_mut();
            clock.now += by;
            let now = clock.now;
            clock.tasks.retain(|pending| !pending.cancelled.get());
            clock
                .tasks
                .iter_mut()
                .filter(|pending| pending.due <= now)
                .filter_map(|pending| pending.task.take())
                .collect()
        };
        self.clock
            .borrow_mut()
            .tasks
            .retain(|pending| pending.task.is_some());
        for task in due {
            task();
        }
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> ManualHandle {
        let cancelled = Rc::new(Cell::new(false));
        let mut clock = self.clock.borrow_mut();
        let due = clock.now + delay;
        clock.tasks.push(Pending {
            due,
            cancelled: cancelled.clone(),
            task: Some(task),
        });
        ManualHandle { cancelled }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Categories,
    Products(ProductQuery),
    Product(ProductId),
    Cart,
    AddToCart(CartMutation),
    UpdateCart(CartMutation),
    RemoveFromCart(ProductId),
    Favorites,
    ToggleFavorite(ProductId),
}

type HeldReply = (oneshot::Receiver<()>, ApiResult<Vec<Product>>);

/// Backend that behaves like a tiny shop server over a fixed catalog.
#[derive(Default)]
pub struct MockBackend {
    pub catalog: Vec<Product>,
    pub categories: Vec<Category>,
    pub cart: RefCell<Vec<CartLine>>,
    pub favorites: RefCell<BTreeSet<ProductId>>,
    failing: RefCell<HashSet<&'static str>>,
    held_products: RefCell<VecDeque<HeldReply>>,
    calls: RefCell<Vec<Call>>,
}

impl MockBackend {
    pub fn with_catalog(catalog: Vec<Product>) -> Self {
        Self {
            catalog,
            categories: vec![Category {
                id: CategoryId(1),
                name: "Электроника".to_owned(),
                emoji: Some("📱".to_owned()),
            }],
            ..Self::default()
        }
    }

    /// Make the named operation answer with a 500.
    pub fn fail(&self, operation: &'static str) {
        self.failing.borrow_mut().insert(operation);
    }

    /// The next `products` call waits for the returned sender before
    /// answering with `reply`.
    pub fn hold_products(&self, reply: ApiResult<Vec<Product>>) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.held_products.borrow_mut().push_back((gate, reply));
        release
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn product_queries(&self) -> Vec<ProductQuery> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Products(query) => Some(query.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, operation: &'static str, call: Call) -> ApiResult<()> {
        self.calls.borrow_mut().push(call);
        if self.failing.borrow().contains(operation) {
            return Err(ApiError::Status { status: 500 });
        }
        Ok(())
    }

    fn find(&self, id: ProductId) -> ApiResult<&Product> {
        self.catalog
            .iter()
            .find(|product| product.id == id)
            .ok_or(ApiError::Status { status: 404 })
    }
}

#[async_trait(?Send)]
impl Backend for MockBackend {
    async fn categories(&self) -> ApiResult<Vec<Category>> {
        self.record("categories", Call::Categories)?;
        Ok(self.categories.clone())
    }

    async fn products(&self, query: ProductQuery) -> ApiResult<Vec<Product>> {
        self.record("products", Call::Products(query.clone()))?;
        let held = self.held_products.borrow_mut().pop_front();
        if let Some((gate, reply)) = held {
            let _ = gate.await;
            return reply;
        }
        let needle = query.search.map(|s| s.to_lowercase());
        Ok(self
            .catalog
            .iter()
            .filter(|product| match &needle {
                Some(needle) => product.name.to_lowercase().contains(needle),
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn product(&self, id: ProductId) -> ApiResult<Product> {
        self.record("product", Call::Product(id))?;
        self.find(id).cloned()
    }

    async fn cart(&self) -> ApiResult<Cart> {
        self.record("cart", Call::Cart)?;
        Ok(Cart {
            items: self.cart.borrow().clone(),
        })
    }

    async fn add_to_cart(&self, item: CartMutation) -> ApiResult<MutationAck> {
        self.record("add_to_cart", Call::AddToCart(item))?;
        let product = self.find(item.product_id)?;
        let mut cart = self.cart.borrow_mut();
        match cart.iter_mut().find(|line| line.product_id == item.product_id) {
            Some(line) => line.quantity += item.quantity,
            None => cart.push(CartLine {
                product_id: product.id,
                name: product.name.clone(),
                price: product.price,
                photo: product.photo.clone(),
                quantity: item.quantity,
            }),
        }
        Ok(MutationAck { success: true })
    }

    async fn update_cart(&self, item: CartMutation) -> ApiResult<MutationAck> {
        self.record("update_cart", Call::UpdateCart(item))?;
        if let Some(line) = self
            .cart
            .borrow_mut()
            .iter_mut()
            .find(|line| line.product_id == item.product_id)
        {
            line.quantity = item.quantity;
        }
        Ok(MutationAck { success: true })
    }

    async fn remove_from_cart(&self, id: ProductId) -> ApiResult<MutationAck> {
        self.record("remove_from_cart", Call::RemoveFromCart(id))?;
        self.cart.borrow_mut().retain(|line| line.product_id != id);
        Ok(MutationAck { success: true })
    }

    async fn favorites(&self) -> ApiResult<Vec<Product>> {
        self.record("favorites", Call::Favorites)?;
        let favorites = self.favorites.borrow();
        Ok(self
            .catalog
            .iter()
            .filter(|product| favorites.contains(&product.id))
            .cloned()
            .collect())
    }

    async fn toggle_favorite(&self, id: ProductId) -> ApiResult<FavoriteToggle> {
        self.record("toggle_favorite", Call::ToggleFavorite(id))?;
        let mut favorites = self.favorites.borrow_mut();
        let is_favorite = if favorites.remove(&id) {
            false
        } else {
            favorites.insert(id)
        };
        Ok(FavoriteToggle { is_favorite })
    }
}

#[derive(Default)]
pub struct RecordingHost {
    pub theme: ThemeParams,
    pub fail_send: Cell<bool>,
    /// Refuse popups and alerts the way the host does while one is open.
    pub popup_open: Cell<bool>,
    pub ready: Cell<bool>,
    pub expanded: Cell<bool>,
    pub closed: Cell<u32>,
    pub impacts: RefCell<Vec<ImpactStyle>>,
    pub popups: RefCell<Vec<Popup>>,
    pub alerts: RefCell<Vec<String>>,
    pub progress: RefCell<Vec<bool>>,
    pub back_button: RefCell<Vec<bool>>,
    pub sent: RefCell<Vec<String>>,
}

impl RecordingHost {
    pub fn back_button_visible(&self) -> bool {
        self.back_button.borrow().last().copied().unwrap_or(false)
    }
}

impl Host for RecordingHost {
    fn init_data(&self) -> String {
        "query_id=test".to_owned()
    }

    fn theme_params(&self) -> ThemeParams {
        self.theme.clone()
    }

    fn ready(&self) {
        self.ready.set(true);
    }

    fn expand(&self) {
        self.expanded.set(true);
    }

    fn impact(&self, style: ImpactStyle) {
        self.impacts.borrow_mut().push(style);
    }

    fn show_popup(&self, popup: &Popup) -> Result<(), HostError> {
        if self.popup_open.get() {
            return Err(HostError::Call("WebAppPopupOpened".to_owned()));
        }
        self.popups.borrow_mut().push(popup.clone());
        Ok(())
    }

    fn show_alert(&self, message: &str) -> Result<(), HostError> {
        if self.popup_open.get() {
            return Err(HostError::Call("WebAppPopupOpened".to_owned()));
        }
        self.alerts.borrow_mut().push(message.to_owned());
        Ok(())
    }

    fn set_main_button_progress(&self, visible: bool) {
        self.progress.borrow_mut().push(visible);
    }

    fn set_back_button_visible(&self, visible: bool) {
        self.back_button.borrow_mut().push(visible);
    }

    fn send_data(&self, data: &str) -> Result<(), HostError> {
        if self.fail_send.get() {
            return Err(HostError::Call("WebAppDataInvalid".to_owned()));
        }
        self.sent.borrow_mut().push(data.to_owned());
        Ok(())
    }

    fn close(&self) {
        self.closed.set(self.closed.get() + 1);
    }
}

#[derive(Default)]
pub struct RecordingView {
    pub regions: RefCell<HashMap<Region, String>>,
    pub loading: RefCell<Vec<bool>>,
    pub badge: Cell<Option<u32>>,
    pub markers: RefCell<Vec<(ProductId, bool)>>,
    pub overlays: RefCell<HashMap<Overlay, bool>>,
    pub focused: Cell<u32>,
    pub nav: Cell<Option<NavTab>>,
    pub theme: RefCell<Vec<(&'static str, String)>>,
}

impl RecordingView {
    pub fn region(&self, region: Region) -> String {
        self.regions.borrow().get(&region).cloned().unwrap_or_default()
    }

    pub fn is_open(&self, overlay: Overlay) -> bool {
        self.overlays.borrow().get(&overlay).copied().unwrap_or(false)
    }
}

impl View for RecordingView {
    fn replace(&self, region: Region, html: &str) {
        self.regions.borrow_mut().insert(region, html.to_owned());
    }

    fn set_loading(&self, loading: bool) {
        self.loading.borrow_mut().push(loading);
    }

    fn set_cart_badge(&self, count: u32) {
        self.badge.set(Some(count));
    }

    fn set_favorite_marker(&self, id: ProductId, active: bool) {
        self.markers.borrow_mut().push((id, active));
    }

    fn set_overlay(&self, overlay: Overlay, open: bool) {
        self.overlays.borrow_mut().insert(overlay, open);
    }

    fn focus_search(&self) {
        self.focused.set(self.focused.get() + 1);
    }

    fn set_nav(&self, tab: NavTab) {
        self.nav.set(Some(tab));
    }

    fn apply_theme(&self, vars: &[(&'static str, String)]) {
        *self.theme.borrow_mut() = vars.to_vec();
    }
}

pub fn product(id: u64, name: &str, price: f64) -> Product {
    Product {
        id: ProductId(id),
        name: name.to_owned(),
        price,
        ..Product::default()
    }
}
