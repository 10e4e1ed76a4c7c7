//! Markup for every container the storefront fills.
//!
//! Interactive elements carry `data-action` plus the ids they act on; the
//! browser layer dispatches clicks through [`crate::actions::Action`].
//! All text coming from the backend is escaped.

use crate::config::StorefrontConfig;
use crate::state::{CategoryFilter, FavoriteSet};
use ms_api_types::{CartLine, Category, Product, Review};

const NO_DESCRIPTION: &str = "Описание отсутствует";
const ANONYMOUS: &str = "Аноним";

/// `round((1 - price / old_price) * 100)` when the old price is higher.
pub fn discount_percent(price: f64, old_price: Option<f64>) -> Option<u32> {
    match old_price {
        Some(old) if old > price && old > 0.0 => {
            Some(((1.0 - price / old) * 100.0).round() as u32)
        }
        _ => None,
    }
}

pub fn cart_total(lines: &[CartLine]) -> f64 {
    lines
        .iter()
        .map(|line| line.price * f64::from(line.quantity))
        .sum()
}

pub fn cart_badge_count(lines: &[CartLine]) -> u32 {
    lines.iter().map(|line| line.quantity).sum()
}

/// One decimal place, halves rounded away from zero.
pub fn format_rating(value: f64) -> String {
    format!("{:.1}", (value * 10.0).round() / 10.0)
}

pub fn format_price(value: f64) -> String {
    format!("{value}")
}

/// Set on an image once its source has been swapped for the placeholder.
pub const FALLBACK_MARKER: &str = "data-fallback";

/// Placeholder source for a broken image, sized by the slot its class names.
/// `None` once the image already fell back, so a broken placeholder does not
/// loop.
pub fn image_fallback(template: &str, class_name: &str, already_swapped: bool) -> Option<String> {
    if already_swapped {
        return None;
    }
    let has_class = |name: &str| class_name.split_whitespace().any(|c| c == name);
    let size = if has_class("product-image") {
        "200x200"
    } else if has_class("cart-item-image") {
        "60x60"
    } else {
        "400x400"
    };
    Some(template.replace("{size}", size))
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn empty_state(icon: &str, title: &str, hint: &str, span_grid: bool) -> String {
    let style = if span_grid {
        r#" style="grid-column: 1/-1""#
    } else {
        ""
    };
    format!(
        r#"<div class="empty-state"{style}><i class="fas {icon}"></i><h3>{title}</h3><p>{hint}</p></div>"#
    )
}

#[derive(Debug, Clone)]
pub struct Renderer {
    currency: String,
    placeholder_image: String,
}

impl Renderer {
    pub fn new(config: &StorefrontConfig) -> Self {
        Self {
            currency: config.currency.clone(),
            placeholder_image: config.placeholder_image.clone(),
        }
    }

    fn price(&self, value: f64) -> String {
        format!("{}{}", format_price(value), escape_html(&self.currency))
    }

    fn image(&self, photo: Option<&str>, size: &str) -> String {
        match photo.map(str::trim).filter(|p| !p.is_empty()) {
            Some(photo) => escape_html(photo),
            None => escape_html(&self.placeholder_image.replace("{size}", size)),
        }
    }

    fn price_block(&self, class: &str, product: &Product) -> String {
        let mut html = format!(
            r#"<div class="{class}"><span class="current-price">{}</span>"#,
            self.price(product.price)
        );
        if let (Some(discount), Some(old)) = (
            discount_percent(product.price, product.old_price),
            product.old_price,
        ) {
            html.push_str(&format!(
                r#"<span class="old-price">{}</span><span class="discount-badge">-{discount}%</span>"#,
                self.price(old)
            ));
        }
        html.push_str("</div>");
        html
    }

    fn heart(&self, product: &Product, favorites: &FavoriteSet, extra: &str) -> String {
        let active = if favorites.contains(product.id) {
            " active"
        } else {
            ""
        };
        format!(
            r#"<button class="btn-fav{active}" data-action="toggle-favorite" data-product-id="{}"{extra}><i class="fas fa-heart"></i></button>"#,
            product.id
        )
    }

    pub fn categories(&self, categories: &[Category], active: CategoryFilter) -> String {
        let chip = |filter: CategoryFilter, label: String| {
            let class = if filter == active {
                "category-chip active"
            } else {
                "category-chip"
            };
            format!(
                r#"<button class="{class}" data-action="select-category" data-category-id="{}">{label}</button>"#,
                filter.attribute_value()
            )
        };

        let mut html = chip(CategoryFilter::All, "🏠 Все".to_owned());
        for category in categories {
            let emoji = category.emoji.as_deref().filter(|e| !e.is_empty()).unwrap_or("📦");
            html.push_str(&chip(
                CategoryFilter::Category(category.id),
                format!("{} {}", escape_html(emoji), escape_html(&category.name)),
            ));
        }
        html
    }

    pub fn product_card(&self, product: &Product, favorites: &FavoriteSet) -> String {
        let name = escape_html(&product.name);
        let rating = if product.rating > 0.0 {
            format!(
                r#"<span class="product-rating"><i class="fas fa-star"></i> {}</span>"#,
                format_rating(product.rating)
            )
        } else {
            String::new()
        };
        format!(
            concat!(
                r#"<div class="product-card" data-action="open-product" data-product-id="{id}">"#,
                r#"<img class="product-image" src="{image}" alt="{name}" loading="lazy">"#,
                r#"<div class="product-info">"#,
                r#"<div class="product-name">{name}</div>"#,
                "{price}",
                r#"<div class="product-meta">{rating}<span>🛒 {sold}</span></div>"#,
                r#"<div class="product-actions" data-action-boundary>"#,
                r#"<button class="btn-cart" data-action="add-to-cart" data-product-id="{id}"><i class="fas fa-cart-plus"></i> В корзину</button>"#,
                "{heart}",
                "</div></div></div>"
            ),
            id = product.id,
            image = self.image(product.photo.as_deref(), "200x200"),
            name = name,
            price = self.price_block("product-price", product),
            rating = rating,
            sold = product.sold_count,
            heart = self.heart(product, favorites, ""),
        )
    }

    pub fn product_grid(&self, products: &[Product], favorites: &FavoriteSet) -> String {
        if products.is_empty() {
            return empty_state(
                "fa-box-open",
                "Товаров не найдено",
                "Попробуйте выбрать другую категорию",
                true,
            );
        }
        products
            .iter()
            .map(|product| self.product_card(product, favorites))
            .collect()
    }

    pub fn products_error(&self) -> String {
        empty_state(
            "fa-exclamation-circle",
            "Ошибка загрузки",
            "Не удалось загрузить товары",
            true,
        )
    }

    pub fn favorites_empty(&self) -> String {
        empty_state(
            "fa-heart",
            "Избранное пусто",
            "Нажмите на сердечко у товара, чтобы сохранить его",
            true,
        )
    }

    fn review(&self, review: &Review) -> String {
        let author = review
            .first_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(ANONYMOUS);
        format!(
            r#"<div class="review"><div><strong>{}</strong> {}</div><div class="review-text">{}</div></div>"#,
            escape_html(author),
            "⭐".repeat(usize::from(review.rating.clamp(1, 5))),
            escape_html(review.text.as_deref().unwrap_or_default()),
        )
    }

    pub fn product_detail(&self, product: &Product, favorites: &FavoriteSet) -> String {
        let name = escape_html(&product.name);
        let rating_stat = if product.rating > 0.0 {
            format!(
                r#"<div class="stat-item"><div class="stat-value">⭐ {}</div><div class="stat-label">{} отзывов</div></div>"#,
                format_rating(product.rating),
                product.reviews_count
            )
        } else {
            String::new()
        };
        let description = [&product.description, &product.short_description]
            .into_iter()
            .filter_map(|text| text.as_deref())
            .find(|text| !text.trim().is_empty())
            .unwrap_or(NO_DESCRIPTION);
        let reviews = if product.reviews.is_empty() {
            String::new()
        } else {
            let list: String = product.reviews.iter().map(|r| self.review(r)).collect();
            format!("<h3>Отзывы</h3>{list}")
        };

        format!(
            concat!(
                r#"<div class="product-gallery"><img src="{image}" alt="{name}"></div>"#,
                r#"<div class="detail-content">"#,
                "<h1>{name}</h1>",
                "{price}",
                r#"<div class="detail-stats">"#,
                r#"<div class="stat-item"><div class="stat-value">{sold}</div><div class="stat-label">Продано</div></div>"#,
                r#"<div class="stat-item"><div class="stat-value">{views}</div><div class="stat-label">Просмотров</div></div>"#,
                "{rating_stat}",
                "</div>",
                r#"<div class="detail-description">{description}</div>"#,
                "{reviews}",
                "</div>",
                r#"<div class="detail-actions">"#,
                "{heart}",
                r#"<button class="btn-buy" data-action="buy" data-product-id="{id}"><i class="fas fa-cart-plus"></i> Добавить в корзину</button>"#,
                "</div>"
            ),
            image = self.image(product.photo.as_deref(), "400x400"),
            name = name,
            price = self.price_block("detail-price", product),
            sold = product.sold_count,
            views = product.views_count,
            rating_stat = rating_stat,
            description = escape_html(description),
            reviews = reviews,
            heart = self.heart(product, favorites, r#" style="width: 48px; height: 48px;""#),
            id = product.id,
        )
    }

    pub fn detail_error(&self) -> String {
        "<p>Ошибка загрузки товара</p>".to_owned()
    }

    pub fn loading(&self) -> String {
        r#"<div class="loading active"><div class="spinner"></div></div>"#.to_owned()
    }

    pub fn cart(&self, lines: &[CartLine]) -> String {
        if lines.is_empty() {
            return empty_state(
                "fa-shopping-cart",
                "Корзина пуста",
                "Добавьте товары из каталога",
                false,
            );
        }

        let total = self.price(cart_total(lines));
        let items: String = lines
            .iter()
            .map(|line| {
                let id = line.product_id;
                let quantity = i64::from(line.quantity);
                format!(
                    concat!(
                        r#"<div class="cart-item">"#,
                        r#"<img class="cart-item-image" src="{image}" alt="{name}">"#,
                        r#"<div class="cart-item-info">"#,
                        r#"<div class="cart-item-name">{name}</div>"#,
                        r#"<div class="cart-item-price">{price}</div>"#,
                        r#"<div class="quantity-control">"#,
                        r#"<button class="quantity-btn" data-action="set-quantity" data-product-id="{id}" data-quantity="{less}">−</button>"#,
                        r#"<span class="quantity-value">{quantity}</span>"#,
                        r#"<button class="quantity-btn" data-action="set-quantity" data-product-id="{id}" data-quantity="{more}">+</button>"#,
                        "</div></div></div>"
                    ),
                    image = self.image(line.photo.as_deref(), "60x60"),
                    name = escape_html(&line.name),
                    price = self.price(line.price),
                    id = id,
                    less = quantity - 1,
                    more = quantity + 1,
                    quantity = quantity,
                )
            })
            .collect();

        format!(
            concat!(
                r#"<div class="cart-content">{items}</div>"#,
                r#"<div class="cart-total"><span>Итого:</span><span>{total}</span></div>"#,
                r#"<div class="cart-checkout"><button class="btn-checkout" data-action="checkout">Оформить заказ на {total}</button></div>"#
            ),
            items = items,
            total = total,
        )
    }

    pub fn search_results(&self, products: &[Product]) -> String {
        if products.is_empty() {
            return self.search_empty();
        }
        products
            .iter()
            .map(|product| {
                format!(
                    concat!(
                        r#"<div class="cart-item" data-action="open-search-result" data-product-id="{id}">"#,
                        r#"<img class="cart-item-image" src="{image}" alt="">"#,
                        r#"<div class="cart-item-info">"#,
                        r#"<div class="cart-item-name">{name}</div>"#,
                        r#"<div class="cart-item-price">{price}</div>"#,
                        "</div></div>"
                    ),
                    id = product.id,
                    image = self.image(product.photo.as_deref(), "60x60"),
                    name = escape_html(&product.name),
                    price = self.price(product.price),
                )
            })
            .collect()
    }

    pub fn search_hint(&self, min_len: usize) -> String {
        format!(r#"<p class="search-hint">Введите минимум {min_len} символа</p>"#)
    }

    pub fn search_empty(&self) -> String {
        "<p>Ничего не найдено</p>".to_owned()
    }

    pub fn search_error(&self) -> String {
        "<p>Ошибка поиска</p>".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ms_api_types::{CategoryId, ProductId};

    fn renderer() -> Renderer {
        Renderer::new(&StorefrontConfig::default())
    }

    fn product(id: u64, price: f64, old_price: Option<f64>) -> Product {
        Product {
            id: ProductId(id),
            name: format!("Товар {id}"),
            price,
            old_price,
            ..Product::default()
        }
    }

    fn line(id: u64, price: f64, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId(id),
            name: format!("Товар {id}"),
            price,
            photo: None,
            quantity,
        }
    }

    #[test]
    fn discount_only_when_old_price_is_higher() {
        assert_eq!(discount_percent(80.0, Some(100.0)), Some(20));
        assert_eq!(discount_percent(100.0, Some(100.0)), None);
        assert_eq!(discount_percent(120.0, Some(100.0)), None);
        assert_eq!(discount_percent(80.0, None), None);
        assert_eq!(discount_percent(66.5, Some(100.0)), Some(34));
    }

    #[test]
    fn badge_and_total() {
        assert_eq!(cart_badge_count(&[line(1, 10.0, 2), line(2, 10.0, 3)]), 5);
        assert_eq!(cart_total(&[line(1, 100.0, 2), line(2, 50.0, 1)]), 250.0);
        assert_eq!(cart_badge_count(&[]), 0);
    }

    #[test]
    fn prices_print_like_plain_numbers() {
        assert_eq!(format_price(250.0), "250");
        assert_eq!(format_price(99.5), "99.5");
    }

    #[test]
    fn card_shows_discount_badge_and_active_heart() {
        let mut favorites = FavoriteSet::default();
        favorites.set(ProductId(1), true);

        let html = renderer().product_grid(
            &[product(1, 80.0, Some(100.0)), product(2, 100.0, Some(90.0))],
            &favorites,
        );
        assert_eq!(html.matches("discount-badge").count(), 1);
        assert!(html.contains("-20%"));
        assert!(html.contains(r#"<span class="old-price">100₽</span>"#));
        assert!(html.contains(
            r#"<button class="btn-fav active" data-action="toggle-favorite" data-product-id="1">"#
        ));
        assert!(html.contains(
            r#"<button class="btn-fav" data-action="toggle-favorite" data-product-id="2">"#
        ));
        assert!(html.contains("via.placeholder.com/200x200"));
    }

    #[test]
    fn empty_grid_renders_not_found() {
        let html = renderer().product_grid(&[], &FavoriteSet::default());
        assert!(html.contains("Товаров не найдено"));
    }

    #[test]
    fn names_are_escaped() {
        let mut item = product(5, 10.0, None);
        item.name = r#"<script>alert("x")</script>"#.to_owned();
        let html = renderer().product_card(&item, &FavoriteSet::default());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;"));
    }

    #[test]
    fn rating_hidden_when_zero() {
        let mut item = product(3, 10.0, None);
        assert!(!renderer().product_card(&item, &FavoriteSet::default()).contains("product-rating"));
        item.rating = 4.26;
        assert!(renderer().product_card(&item, &FavoriteSet::default()).contains("4.3"));
    }

    #[test]
    fn broken_images_fall_back_once() {
        let template = "https://via.placeholder.com/{size}";
        assert_eq!(
            image_fallback(template, "product-image", false).as_deref(),
            Some("https://via.placeholder.com/200x200")
        );
        assert_eq!(
            image_fallback(template, "cart-item-image lazy", false).as_deref(),
            Some("https://via.placeholder.com/60x60")
        );
        assert_eq!(
            image_fallback(template, "", false).as_deref(),
            Some("https://via.placeholder.com/400x400")
        );
        assert_eq!(image_fallback(template, "product-image", true), None);
    }

    #[test]
    fn card_actions_stop_delegation() {
        let html = renderer().product_card(&product(4, 10.0, None), &FavoriteSet::default());
        let boundary = html
            .find(r#"<div class="product-actions" data-action-boundary>"#)
            .unwrap();
        let cart_button = html.find(r#"data-action="add-to-cart""#).unwrap();
        let heart = html.find(r#"data-action="toggle-favorite""#).unwrap();
        assert!(boundary < cart_button && boundary < heart);
        assert!(html.starts_with(r#"<div class="product-card" data-action="open-product""#));
    }

    #[test]
    fn rating_halves_round_up() {
        assert_eq!(format_rating(4.25), "4.3");
        assert_eq!(format_rating(4.75), "4.8");
        assert_eq!(format_rating(4.0), "4.0");
        let mut item = product(3, 10.0, None);
        item.rating = 4.25;
        item.reviews_count = 2;
        let detail = renderer().product_detail(&item, &FavoriteSet::default());
        assert!(detail.contains("⭐ 4.3</div>"));
    }

    #[test]
    fn category_chips_mark_active_filter() {
        let categories = vec![
            Category {
                id: CategoryId(4),
                name: "Напитки".to_owned(),
                emoji: Some("🥤".to_owned()),
            },
            Category {
                id: CategoryId(5),
                name: "Разное".to_owned(),
                emoji: None,
            },
        ];
        let html = renderer().categories(&categories, CategoryFilter::Category(CategoryId(4)));
        assert!(html.contains(r#"<button class="category-chip" data-action="select-category" data-category-id="all">"#));
        assert!(html.contains(r#"<button class="category-chip active" data-action="select-category" data-category-id="4">🥤 Напитки</button>"#));
        assert!(html.contains("📦 Разное"));
    }

    #[test]
    fn detail_falls_back_through_descriptions_and_lists_reviews() {
        let mut item = product(9, 80.0, Some(100.0));
        item.short_description = Some("Коротко".to_owned());
        item.rating = 4.0;
        item.reviews_count = 2;
        item.reviews = vec![
            Review {
                first_name: None,
                rating: 3,
                text: Some("норм".to_owned()),
            },
            Review {
                first_name: Some("Олег".to_owned()),
                rating: 9,
                text: None,
            },
        ];

        let html = renderer().product_detail(&item, &FavoriteSet::default());
        assert!(html.contains(r#"<div class="detail-description">Коротко</div>"#));
        assert!(html.contains("<strong>Аноним</strong> ⭐⭐⭐</div>"));
        assert!(html.contains("<strong>Олег</strong> ⭐⭐⭐⭐⭐</div>"));
        assert!(html.contains("2 отзывов"));
        assert!(html.contains(r#"data-action="buy" data-product-id="9""#));
        assert!(html.contains("-20%"));

        item.short_description = None;
        assert!(renderer().product_detail(&item, &FavoriteSet::default()).contains(NO_DESCRIPTION));
    }

    #[test]
    fn cart_steppers_carry_target_quantity() {
        let html = renderer().cart(&[line(1, 100.0, 2), line(2, 50.0, 1)]);
        assert!(html.contains(r#"data-product-id="1" data-quantity="1">−"#));
        assert!(html.contains(r#"data-product-id="1" data-quantity="3">+"#));
        assert!(html.contains(r#"data-product-id="2" data-quantity="0">−"#));
        assert!(html.contains("<span>250₽</span>"));
        assert!(html.contains("Оформить заказ на 250₽"));
    }

    #[test]
    fn empty_cart_placeholder() {
        assert!(renderer().cart(&[]).contains("Корзина пуста"));
    }

    #[test]
    fn search_results_link_to_products() {
        let html = renderer().search_results(&[product(7, 30.0, None)]);
        assert!(html.contains(r#"data-action="open-search-result" data-product-id="7""#));
        assert_eq!(renderer().search_results(&[]), renderer().search_empty());
    }
}
