//! Telegram WebApp bindings and the `Host` implementation over them.

use ms_storefront_core::{Host, HostError, ImpactStyle, Popup, ThemeParams};
use tracing::warn;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[derive(Clone)]
    pub type WebApp;

    #[wasm_bindgen(method, getter, js_name = initData)]
    fn init_data(this: &WebApp) -> String;
    #[wasm_bindgen(method, getter, js_name = themeParams)]
    fn theme_params(this: &WebApp) -> JsValue;
    #[wasm_bindgen(method)]
    fn ready(this: &WebApp);
    #[wasm_bindgen(method)]
    fn expand(this: &WebApp);
    #[wasm_bindgen(method)]
    fn close(this: &WebApp);
    #[wasm_bindgen(method, catch, js_name = sendData)]
    fn send_data(this: &WebApp, data: &str) -> Result<(), JsValue>;
    #[wasm_bindgen(method, catch, js_name = showPopup)]
    fn show_popup(this: &WebApp, params: &JsValue) -> Result<(), JsValue>;
    #[wasm_bindgen(method, catch, js_name = showAlert)]
    fn show_alert(this: &WebApp, message: &str) -> Result<(), JsValue>;
    #[wasm_bindgen(method, getter, js_name = HapticFeedback)]
    fn haptic_feedback(this: &WebApp) -> HapticFeedback;
    #[wasm_bindgen(method, getter, js_name = MainButton)]
    fn main_button(this: &WebApp) -> MainButton;
    #[wasm_bindgen(method, getter, js_name = BackButton)]
    fn back_button(this: &WebApp) -> BackButton;

    pub type HapticFeedback;

    #[wasm_bindgen(method, js_name = impactOccurred)]
    fn impact_occurred(this: &HapticFeedback, style: &str);

    pub type MainButton;

    #[wasm_bindgen(method, js_name = showProgress)]
    fn show_progress(this: &MainButton);
    #[wasm_bindgen(method, js_name = hideProgress)]
    fn hide_progress(this: &MainButton);

    pub type BackButton;

    #[wasm_bindgen(method)]
    fn show(this: &BackButton);
    #[wasm_bindgen(method)]
    fn hide(this: &BackButton);
    #[wasm_bindgen(method, js_name = onClick)]
    fn on_click(this: &BackButton, callback: &js_sys::Function);
}

#[derive(Clone)]
pub struct TelegramHost {
    app: WebApp,
}

impl TelegramHost {
    /// Resolve `window.Telegram.WebApp`.
    pub fn from_window() -> Result<Self, JsValue> {
        let window = gloo_utils::window();
        let telegram = js_sys::Reflect::get(&window, &JsValue::from_str("Telegram"))?;
        if telegram.is_undefined() {
            return Err(JsValue::from_str("Telegram WebApp SDK not loaded"));
        }
        let app = js_sys::Reflect::get(&telegram, &JsValue::from_str("WebApp"))?;
        if app.is_undefined() {
            return Err(JsValue::from_str("missing Telegram.WebApp"));
        }
        Ok(Self {
            app: app.unchecked_into(),
        })
    }

    /// Subscribe to the host back control.
    pub fn on_back_button(&self, handler: impl FnMut() + 'static) {
        let cb = Closure::wrap(Box::new(handler) as Box<dyn FnMut()>);
        self.app.back_button().on_click(cb.as_ref().unchecked_ref());
        cb.forget();
    }
}

fn host_error(err: JsValue) -> HostError {
    HostError::Call(format!("{err:?}"))
}

impl Host for TelegramHost {
    fn init_data(&self) -> String {
        self.app.init_data()
    }

    fn theme_params(&self) -> ThemeParams {
        match serde_wasm_bindgen::from_value(self.app.theme_params()) {
            Ok(params) => params,
            Err(err) => {
                warn!("unreadable theme params: {}", err);
                ThemeParams::default()
            }
        }
    }

    fn ready(&self) {
        self.app.ready();
    }

    fn expand(&self) {
        self.app.expand();
    }

    fn impact(&self, style: ImpactStyle) {
        self.app.haptic_feedback().impact_occurred(style.as_str());
    }

    fn show_popup(&self, popup: &Popup) -> Result<(), HostError> {
        let params =
            serde_wasm_bindgen::to_value(popup).map_err(|err| HostError::Call(err.to_string()))?;
        self.app.show_popup(&params).map_err(host_error)
    }

    fn show_alert(&self, message: &str) -> Result<(), HostError> {
        self.app.show_alert(message).map_err(host_error)
    }

    fn set_main_button_progress(&self, visible: bool) {
        let button = self.app.main_button();
        if visible {
            button.show_progress();
        } else {
            button.hide_progress();
        }
    }

    fn set_back_button_visible(&self, visible: bool) {
        let button = self.app.back_button();
        if visible {
            button.show();
        } else {
            button.hide();
        }
    }

    fn send_data(&self, data: &str) -> Result<(), HostError> {
        self.app
            .send_data(data)
            .map_err(host_error)
    }

    fn close(&self) {
        self.app.close();
    }
}
