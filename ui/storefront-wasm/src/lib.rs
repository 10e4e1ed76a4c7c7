//! Metro Shop storefront, browser build.
//!
//! Binds the storefront core to the DOM and the Telegram WebApp SDK.

pub mod config;
pub mod dom;
pub mod events;
pub mod host;
pub mod logging;
pub mod observer;
pub mod scheduler;
pub mod view;

use ms_client::HttpBackend;
use ms_storefront_core::{Host, Storefront, StorefrontConfig};
use std::rc::Rc;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;

pub type Shop = Storefront<HttpBackend, host::TelegramHost, view::DomView>;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();

    init().await
}

async fn init() -> Result<(), JsValue> {
    let loaded = config::read();
    let config = match &loaded {
        Ok(Some(config)) => config.clone(),
        _ => StorefrontConfig::default(),
    };
    logging::install(&config.log_level);
    if let Err(err) = loaded {
        warn!("{}, using defaults", err);
    }

    let els = dom::Elements::bind()?;
    let host = host::TelegramHost::from_window()?;

    let origin = gloo_utils::window().location().origin()?;
    let api_base = config.resolve_api_base(&origin);
    info!("storefront api at {}", api_base);
    let backend =
        HttpBackend::new(api_base, host.init_data()).with_auth_header(config.auth_header.clone());

    let shop = Rc::new(Storefront::new(
        backend,
        host.clone(),
        view::DomView::new(els.clone()),
        &config,
    ));
    shop.bootstrap_host();

    events::bind_events(&els, &shop, &config)?;
    observer::watch_overlays(host)?;

    shop.start().await;
    Ok(())
}
