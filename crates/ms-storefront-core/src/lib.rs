//! Metro Shop storefront core.
//!
//! Owns the client-side state and every storefront operation. The browser,
//! the backend and the host SDK are reached through the `View`, `Backend`
//! and `Host` traits, so the whole flow runs natively under test.

pub mod actions;
pub mod config;
pub mod debounce;
pub mod host;
pub mod overlay;
pub mod render;
pub mod sequence;
pub mod state;
pub mod storefront;
pub mod theme;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use actions::{Action, ActionError, DELEGATION_SELECTOR};
pub use config::{ConfigError, StorefrontConfig};
pub use debounce::{Debouncer, Scheduler};
pub use host::{Host, HostError, ImpactStyle, Popup, PopupButton};
pub use overlay::{Overlay, OverlaySet};
pub use render::{FALLBACK_MARKER, Renderer, image_fallback};
pub use sequence::{RequestSequence, Ticket};
pub use state::{AppState, CategoryFilter, FavoriteSet, NavTab};
pub use storefront::{CheckoutError, Storefront};
pub use theme::ThemeParams;
pub use view::{Region, View};
