//! Host SDK seam: the mini-app runtime the storefront is embedded in.

use crate::theme::ThemeParams;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("host call failed: {0}")]
    Call(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactStyle {
    Light,
}

impl ImpactStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactStyle::Light => "light",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopupButton {
    #[serde(rename = "type")]
    pub kind: String,
}

impl PopupButton {
    pub fn ok() -> Self {
        Self {
            kind: "ok".to_owned(),
        }
    }
}

/// Native popup parameters, serialized as the host expects them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Popup {
    pub title: String,
    pub message: String,
    pub buttons: Vec<PopupButton>,
}

impl Popup {
    pub fn added_to_cart() -> Self {
        Self {
            title: "Добавлено!".to_owned(),
            message: "Товар добавлен в корзину".to_owned(),
            buttons: vec![PopupButton::ok()],
        }
    }
}

pub trait Host {
    /// Session token forwarded to the backend on every request.
    fn init_data(&self) -> String;
    fn theme_params(&self) -> ThemeParams;
    fn ready(&self);
    fn expand(&self);
    fn impact(&self, style: ImpactStyle);
    /// Fails when the host refuses, e.g. while another popup is open.
    fn show_popup(&self, popup: &Popup) -> Result<(), HostError>;
    fn show_alert(&self, message: &str) -> Result<(), HostError>;
    fn set_main_button_progress(&self, visible: bool);
    fn set_back_button_visible(&self, visible: bool);
    fn send_data(&self, data: &str) -> Result<(), HostError>;
    /// Terminate the mini-app session.
    fn close(&self);
}
