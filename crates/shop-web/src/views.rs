//! # Views
//!
//! Template structs and the display data they render. Everything a template
//! shows is precomputed here as strings so templates stay free of logic.

use askama::Template;
use askama_web::WebTemplate;
use shop_core::{Cart, CartLine, Category, PaymentForm, Product};

use crate::session::Flash;

// =============================================================================
// Display data
// =============================================================================

/// Data every full page needs: header, badge, flash and CSRF token.
#[derive(Debug, Clone)]
pub struct Chrome {
    pub store_title: String,
    pub cart_count: u32,
    pub csrf_token: String,
    /// Empty when there is nothing to show
    pub flash_message: String,
    pub flash_kind: String,
}

impl Chrome {
    pub fn new(
        store_title: &str,
        cart_count: u32,
        csrf_token: String,
        flash: Option<Flash>,
    ) -> Self {
        let (flash_message, flash_kind) = match flash {
            Some(flash) => (flash.message, flash.kind.as_str().to_string()),
            None => (String::new(), String::new()),
        };

        Self {
            store_title: store_title.to_string(),
            cart_count,
            csrf_token,
            flash_message,
            flash_kind,
        }
    }
}

/// One row of the flattened category tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRow {
    pub id: String,
    pub name: String,
    /// Empty when the platform sent no count
    pub count_label: String,
    pub depth: usize,
}

/// Flatten a category tree depth-first, resolving names for `lang`.
pub fn category_rows(categories: &[Category], lang: &str) -> Vec<CategoryRow> {
    fn walk(categories: &[Category], lang: &str, depth: usize, rows: &mut Vec<CategoryRow>) {
        for category in categories {
            rows.push(CategoryRow {
                id: category.id.clone(),
                name: category.name.resolve(lang).to_string(),
                count_label: category
                    .product_count
                    .map(|n| format!("({n})"))
                    .unwrap_or_default(),
                depth,
            });
            walk(&category.children, lang, depth + 1, rows);
        }
    }

    let mut rows = Vec::new();
    walk(categories, lang, 0, &mut rows);
    rows
}

#[derive(Debug, Clone)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub price: String,
    /// Empty when there is no image
    pub image_url: String,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price.display(),
            image_url: product.image_url.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProductDetail {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image_url: String,
    pub description: String,
}

impl From<&Product> for ProductDetail {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price.display(),
            image_url: product.image_url.clone().unwrap_or_default(),
            description: product.description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CartLineView {
    pub item_id: String,
    pub product_id: String,
    pub name: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            item_id: line.item_id.clone(),
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            unit_price: line.unit_price.display(),
            quantity: line.quantity,
            line_total: line.total().display(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
}

impl CartView {
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            total: String::new(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines.iter().map(CartLineView::from).collect(),
            total: cart.total().display(),
        }
    }
}

/// Previous/next links; an empty URL hides the link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    pub page: u32,
    pub prev_url: String,
    pub next_url: String,
}

impl Pager {
    /// Links for `page`, built by appending `page=N` to `base`.
    ///
    /// `base` already ends in `?` or `&`.
    pub fn new(base: &str, page: u32, has_next: bool) -> Self {
        let prev_url = if page > 1 {
            format!("{base}page={}", page - 1)
        } else {
            String::new()
        };
        let next_url = if has_next {
            format!("{base}page={}", page + 1)
        } else {
            String::new()
        };

        Self {
            page,
            prev_url,
            next_url,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HiddenField {
    pub name: String,
    pub value: String,
}

// =============================================================================
// Templates
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub chrome: Chrome,
    pub categories: Vec<CategoryRow>,
}

#[derive(Template, WebTemplate)]
#[template(path = "category.html")]
pub struct CategoryTemplate {
    pub chrome: Chrome,
    pub category_name: String,
    pub products: Vec<ProductCard>,
    pub pager: Pager,
}

#[derive(Template, WebTemplate)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub chrome: Chrome,
    pub query: String,
    pub products: Vec<ProductCard>,
    pub pager: Pager,
}

#[derive(Template, WebTemplate)]
#[template(path = "product.html")]
pub struct ProductTemplate {
    pub chrome: Chrome,
    pub product: ProductDetail,
}

#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub chrome: Chrome,
    pub cart: CartView,
}

/// Auto-submitting form to the hosted payment page.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub store_title: String,
    pub action: String,
    pub fields: Vec<HiddenField>,
}

impl CheckoutTemplate {
    pub fn new(store_title: &str, form: PaymentForm) -> Self {
        Self {
            store_title: store_title.to_string(),
            action: form.action,
            fields: form
                .fields
                .into_iter()
                .map(|(name, value)| HiddenField { name, value })
                .collect(),
        }
    }
}

/// Standalone error page; rendered without session data.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use shop_core::{Currency, LocalizedName, LocalizedValue, Price};

    #[test]
    fn test_category_rows_flatten_depth_first() {
        let tree = vec![
            Category::new("1", "Games")
                .with_child(Category::new("11", "Keys"))
                .with_child(Category::new("12", "Gift cards")),
            Category::new("2", "Software"),
        ];

        let rows = category_rows(&tree, "en-US");
        let ids: Vec<_> = rows.iter().map(|r| (r.id.as_str(), r.depth)).collect();
        assert_eq!(ids, vec![("1", 0), ("11", 1), ("12", 1), ("2", 0)]);
    }

    #[test]
    fn test_category_rows_resolve_names() {
        let mut category = Category::new("1", "");
        category.name = LocalizedName::Localized(vec![
            LocalizedValue {
                locale: "ru-RU".into(),
                value: "Игры".into(),
            },
            LocalizedValue {
                locale: "en-US".into(),
                value: "Games".into(),
            },
        ]);
        category.product_count = Some(12);

        let rows = category_rows(&[category], "en-US");
        assert_eq!(rows[0].name, "Games");
        assert_eq!(rows[0].count_label, "(12)");
    }

    #[test]
    fn test_pager_links() {
        let first = Pager::new("/category/5?", 1, true);
        assert!(first.prev_url.is_empty());
        assert_eq!(first.next_url, "/category/5?page=2");

        let last = Pager::new("/search?q=key&", 3, false);
        assert_eq!(last.prev_url, "/search?q=key&page=2");
        assert!(last.next_url.is_empty());
    }

    #[test]
    fn test_product_card_formats_price() {
        let product = Product::new("7", "Key", Price::from_cents(1999, Currency::USD));
        let card = ProductCard::from(&product);
        assert_eq!(card.price, "$19.99");
        assert!(card.image_url.is_empty());
    }

    #[test]
    fn test_checkout_template_renders_hidden_fields() {
        let form = PaymentForm::new("https://pay.example/pay")
            .with_field("cart_uid", "C0FFEE")
            .with_field("typecurr", "USD");
        let html = CheckoutTemplate::new("Shop", form).render().unwrap();

        assert!(html.contains(r#"action="https://pay.example/pay""#));
        assert!(html.contains(r#"name="cart_uid" value="C0FFEE""#));
        assert!(html.contains(r#"name="typecurr" value="USD""#));
    }

    #[test]
    fn test_error_template_renders_status() {
        let html = ErrorTemplate {
            status: 404,
            message: "Not here".into(),
        }
        .render()
        .unwrap();
        assert!(html.contains("404"));
        assert!(html.contains("Not here"));
    }
}
