//! Overlay bookkeeping.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overlay {
    ProductDetail,
    Cart,
    Search,
}

impl Overlay {
    /// Order in which the back control closes overlays, deepest first.
    pub const BACK_ORDER: [Overlay; 3] = [Overlay::Search, Overlay::Cart, Overlay::ProductDetail];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlaySet {
    product_detail: bool,
    cart: bool,
    search: bool,
}

impl OverlaySet {
    fn slot(&mut self, overlay: Overlay) -> &mut bool {
        match overlay {
            Overlay::ProductDetail => &mut self.product_detail,
            Overlay::Cart => &mut self.cart,
            Overlay::Search => &mut self.search,
        }
    }

    pub fn set(&mut self, overlay: Overlay, open: bool) {
        *self.slot(overlay) = open;
    }

    pub fn is_open(&self, overlay: Overlay) -> bool {
        match overlay {
            Overlay::ProductDetail => self.product_detail,
            Overlay::Cart => self.cart,
            Overlay::Search => self.search,
        }
    }

    pub fn any_open(&self) -> bool {
        self.product_detail || self.cart || self.search
    }

    pub fn deepest(&self) -> Option<Overlay> {
        Overlay::BACK_ORDER
            .into_iter()
            .find(|overlay| self.is_open(*overlay))
    }
}
