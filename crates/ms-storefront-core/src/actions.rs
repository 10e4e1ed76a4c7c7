//! Delegated UI actions.
//!
//! Rendered markup tags interactive elements with `data-action` and the ids
//! it needs; one click listener resolves the nearest tagged element into an
//! [`Action`].

use crate::state::CategoryFilter;
use ms_api_types::ProductId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("unknown action `{0}`")]
    UnknownAction(String),
    #[error("action `{action}` is missing `{attribute}`")]
    MissingAttribute {
        action: String,
        attribute: &'static str,
    },
    #[error("action `{action}` has invalid `{attribute}`: {value}")]
    InvalidAttribute {
        action: String,
        attribute: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SelectCategory(CategoryFilter),
    OpenProduct(ProductId),
    CloseProduct,
    AddToCart(ProductId),
    /// Add from the detail overlay, then close it.
    Buy(ProductId),
    ToggleFavorite(ProductId),
    SetQuantity { product_id: ProductId, quantity: i64 },
    OpenCart,
    CloseCart,
    Checkout,
    OpenSearch,
    CloseSearch,
    OpenSearchResult(ProductId),
    ShowCatalog,
    ShowFavorites,
}

/// What the click listener resolves with `closest()`. A boundary element has
/// no `data-action`, so clicks landing on it stop there instead of reaching
/// an enclosing card.
pub const DELEGATION_SELECTOR: &str = "[data-action], [data-action-boundary]";

pub const PRODUCT_ID: &str = "product-id";
pub const CATEGORY_ID: &str = "category-id";
pub const QUANTITY: &str = "quantity";

impl Action {
    /// Build an action from the `data-action` value and a lookup for the
    /// element's other `data-*` attributes (names without the prefix).
    pub fn from_attributes(
        action: &str,
        attr: impl Fn(&str) -> Option<String>,
    ) -> Result<Action, ActionError> {
        let lookup = |attribute: &'static str| {
            attr(attribute).ok_or_else(|| ActionError::MissingAttribute {
                action: action.to_owned(),
                attribute,
            })
        };
        let invalid = |attribute: &'static str, value: String| ActionError::InvalidAttribute {
            action: action.to_owned(),
            attribute,
            value,
        };
        let product_id = || -> Result<ProductId, ActionError> {
            let value = lookup(PRODUCT_ID)?;
            value
                .trim()
                .parse()
                .map(ProductId)
                .map_err(|_| invalid(PRODUCT_ID, value))
        };

        Ok(match action {
            "select-category" => {
                let value = lookup(CATEGORY_ID)?;
                let filter =
                    CategoryFilter::parse(&value).ok_or_else(|| invalid(CATEGORY_ID, value))?;
                Action::SelectCategory(filter)
            }
            "open-product" => Action::OpenProduct(product_id()?),
            "close-product" => Action::CloseProduct,
            "add-to-cart" => Action::AddToCart(product_id()?),
            "buy" => Action::Buy(product_id()?),
            "toggle-favorite" => Action::ToggleFavorite(product_id()?),
            "set-quantity" => {
                let product_id = product_id()?;
                let value = lookup(QUANTITY)?;
                let quantity = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid(QUANTITY, value))?;
                Action::SetQuantity {
                    product_id,
                    quantity,
                }
            }
            "open-cart" => Action::OpenCart,
            "close-cart" => Action::CloseCart,
            "checkout" => Action::Checkout,
            "open-search" => Action::OpenSearch,
            "close-search" => Action::CloseSearch,
            "open-search-result" => Action::OpenSearchResult(product_id()?),
            "show-catalog" => Action::ShowCatalog,
            "show-favorites" => Action::ShowFavorites,
            other => return Err(ActionError::UnknownAction(other.to_owned())),
        })
    }
}
