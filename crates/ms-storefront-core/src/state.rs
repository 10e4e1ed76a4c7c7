//! Client-side working copy of backend data for the current session.
//!
//! One `AppState` is owned by the `Storefront`; renderers receive the pieces
//! they need as arguments.

use crate::overlay::OverlaySet;
use crate::sequence::RequestSequence;
use ms_api_types::{CartLine, Category, CategoryId, Product, ProductId, SortKey};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(CategoryId),
}

impl CategoryFilter {
    pub fn category_id(&self) -> Option<CategoryId> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Category(id) => Some(*id),
        }
    }

    /// Value carried in the chip's `data-category-id` attribute.
    pub fn attribute_value(&self) -> String {
        match self {
            CategoryFilter::All => "all".to_owned(),
            CategoryFilter::Category(id) => id.to_string(),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "all" => Some(CategoryFilter::All),
            other => other.parse().ok().map(|id| CategoryFilter::Category(CategoryId(id))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NavTab {
    #[default]
    Catalog,
    Favorites,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet(BTreeSet<ProductId>);

impl FavoriteSet {
    pub fn from_products(products: &[Product]) -> Self {
        Self(products.iter().map(|p| p.id).collect())
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.0.contains(&id)
    }

    pub fn set(&mut self, id: ProductId, favorite: bool) {
        if favorite {
            self.0.insert(id);
        } else {
            self.0.remove(&id);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub categories: Vec<Category>,
    pub category: CategoryFilter,
    pub sort: SortKey,
    pub products: Vec<Product>,
    pub favorites: FavoriteSet,
    pub favorite_products: Vec<Product>,
    pub cart: Vec<CartLine>,
    pub overlays: OverlaySet,
    pub tab: NavTab,
    /// Tickets for everything rendered into the product grid.
    pub grid_requests: RequestSequence,
    pub detail_requests: RequestSequence,
    pub search_requests: RequestSequence,
}
