//! # Request Handlers
//!
//! Page handlers render templates from backend data. Action handlers (cart
//! changes) check the CSRF token, call the backend and redirect with a flash
//! message. A failed backend call in an action or secondary page never shows
//! its detail: it is logged and the visitor sees the generic "failed" flash.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Deserialize;
use shop_core::{
    find_category, AddToCart, ListingQuery, PaymentNotification, ProductPage, SearchQuery,
    ShopError,
};
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use crate::error::{AppError, Result};
use crate::session::{self, Flash};
use crate::state::AppState;
use crate::views::{
    category_rows, CartTemplate, CartView, CategoryTemplate, CheckoutTemplate, Chrome, HomeTemplate,
    Pager, ProductCard, ProductDetail, ProductTemplate, SearchTemplate,
};

/// Upper bound for a single quantity field
const MAX_QUANTITY: u32 = 99;

// =============================================================================
// Request Types
// =============================================================================

/// Query of the old single-entry URL scheme (`/?page=category&id=5`)
#[derive(Debug, Default, Deserialize)]
pub struct LegacyQuery {
    pub page: Option<String>,
    pub id: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub csrf_token: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    #[serde(default)]
    pub item_id: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub csrf_token: String,
}

#[derive(Debug, Deserialize)]
pub struct CsrfForm {
    #[serde(default)]
    pub csrf_token: String,
}

// =============================================================================
// Helpers
// =============================================================================

/// Ids that may be placed in a path segment
fn is_path_token(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// 1-based page number; anything unparseable is page 1
fn page_number(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse::<u32>().ok())
        .unwrap_or(1)
        .max(1)
}

fn parse_quantity(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}

/// Whether a next page link should be shown. Without a page count from the
/// platform, a full page suggests there is more.
fn has_more(page: &ProductPage, rows: u32) -> bool {
    match page.total_pages {
        Some(_) => page.has_next(),
        None => page.products.len() as u32 >= rows,
    }
}

fn search_url(query: &str) -> String {
    format!("/search?q={}", urlencoding::encode(query))
}

/// Where an old-style `/?page=...` URL now lives
fn legacy_location(query: &LegacyQuery) -> Option<String> {
    let page = query.page.as_deref()?;
    let id = query.id.as_deref().filter(|id| is_path_token(id));

    let location = match (page, id) {
        ("category", Some(id)) => format!("/category/{id}"),
        ("product", Some(id)) => format!("/product/{id}"),
        ("search", _) => search_url(query.q.as_deref().unwrap_or_default().trim()),
        ("cart", _) => "/cart".to_string(),
        ("checkout", _) => "/checkout".to_string(),
        _ => "/".to_string(),
    };
    Some(location)
}

async fn chrome(state: &AppState, session: &Session) -> Result<Chrome> {
    let csrf_token = session::csrf_token(session).await?;
    let cart_count = session::cart_count(session).await?;
    let flash = session::take_flash(session).await?;
    Ok(Chrome::new(&state.store.title, cart_count, csrf_token, flash))
}

async fn flash_redirect(session: &Session, flash: Flash, to: &str) -> Result<Redirect> {
    session::set_flash(session, flash).await?;
    Ok(Redirect::to(to))
}

async fn category_name(state: &AppState, category_id: &str, lang: &str) -> String {
    let name = match state.backend.categories(lang).await {
        Ok(tree) => find_category(&tree, category_id)
            .map(|c| c.name.resolve(lang).to_string())
            .filter(|name| !name.is_empty()),
        Err(err) => {
            warn!("Category names unavailable: {}", err);
            None
        }
    };
    name.unwrap_or_else(|| format!("Category {category_id}"))
}

// =============================================================================
// Pages
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "shopfront",
        "backend": state.backend.backend_name(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Home page: the category tree
#[instrument(skip(state, session, query))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<LegacyQuery>,
) -> Result<Response> {
    if let Some(location) = legacy_location(&query) {
        return Ok(Redirect::permanent(&location).into_response());
    }

    let lang = state.store.lang.clone();
    let tree = state.backend.categories(&lang).await?;

    let view = HomeTemplate {
        chrome: chrome(&state, &session).await?,
        categories: category_rows(&tree, &lang),
    };
    Ok(view.into_response())
}

/// Products in a category
#[instrument(skip(state, session, query))]
pub async fn category(
    State(state): State<AppState>,
    session: Session,
    Path(category_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    if !is_path_token(&category_id) {
        return Err(AppError::NotFound(format!("category {category_id}")));
    }

    let page = page_number(query.page.as_deref());
    let rows = state.store.page_size;
    let locale = state.locale();

    let listing = ListingQuery {
        category_id: category_id.clone(),
        page,
        rows,
        locale: locale.clone(),
    };

    let products = match state.backend.products(&listing).await {
        Ok(products) => products,
        Err(err) => {
            warn!(category_id = %category_id, "Failed to load category: {}", err);
            return Ok(flash_redirect(&session, Flash::failed(), "/").await?.into_response());
        }
    };

    let view = CategoryTemplate {
        chrome: chrome(&state, &session).await?,
        category_name: category_name(&state, &category_id, &locale.lang).await,
        products: products.products.iter().map(ProductCard::from).collect(),
        pager: Pager::new(&format!("/category/{category_id}?"), page, has_more(&products, rows)),
    };
    Ok(view.into_response())
}

/// Search results
#[instrument(skip(state, session, params), fields(q = %params.q))]
pub async fn search(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<SearchParams>,
) -> Result<Response> {
    let text = params.q.trim().to_string();
    let page = page_number(params.page.as_deref());
    let rows = state.store.page_size;

    let results = if text.is_empty() {
        ProductPage::new(Vec::new(), page)
    } else {
        let query = SearchQuery {
            text: text.clone(),
            page,
            rows,
            locale: state.locale(),
        };
        match state.backend.search(&query).await {
            Ok(results) => results,
            Err(err) => {
                warn!("Search failed: {}", err);
                return Ok(flash_redirect(&session, Flash::failed(), "/").await?.into_response());
            }
        }
    };

    let view = SearchTemplate {
        chrome: chrome(&state, &session).await?,
        products: results.products.iter().map(ProductCard::from).collect(),
        pager: Pager::new(&format!("{}&", search_url(&text)), page, has_more(&results, rows)),
        query: text,
    };
    Ok(view.into_response())
}

/// Product page with the add-to-cart form
#[instrument(skip(state, session))]
pub async fn product(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<String>,
) -> Result<Response> {
    if !is_path_token(&product_id) {
        return Err(AppError::NotFound(format!("product {product_id}")));
    }

    let product = match state.backend.product(&product_id, &state.locale()).await {
        Ok(product) => product,
        Err(ShopError::NotFound(what)) => return Err(AppError::NotFound(what)),
        Err(err) => {
            warn!(product_id = %product_id, "Failed to load product: {}", err);
            return Ok(flash_redirect(&session, Flash::failed(), "/").await?.into_response());
        }
    };

    let view = ProductTemplate {
        chrome: chrome(&state, &session).await?,
        product: ProductDetail::from(&product),
    };
    Ok(view.into_response())
}

/// Cart view
#[instrument(skip(state, session))]
pub async fn cart_view(State(state): State<AppState>, session: Session) -> Result<Response> {
    let cart = match session::cart_id(&session).await? {
        None => CartView::empty(),
        Some(cart_id) => match state.backend.cart(&cart_id, &state.locale()).await {
            Ok(cart) => {
                session::set_cart_count(&session, cart.badge_count()).await?;
                CartView::from(&cart)
            }
            Err(err) => {
                warn!(cart_id = %cart_id, "Failed to load cart: {}", err);
                return Ok(flash_redirect(&session, Flash::failed(), "/").await?.into_response());
            }
        },
    };

    let view = CartTemplate {
        chrome: chrome(&state, &session).await?,
        cart,
    };
    Ok(view.into_response())
}

// =============================================================================
// Cart Actions
// =============================================================================

/// Add a product to the cart, creating the remote cart on first use
#[instrument(skip(state, session, form), fields(product_id = %form.product_id))]
pub async fn cart_add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    if !session::verify_csrf(&session, &form.csrf_token).await? {
        warn!("CSRF token mismatch on cart add");
        return flash_redirect(&session, Flash::failed(), "/").await;
    }
    if !is_path_token(&form.product_id) {
        return flash_redirect(&session, Flash::failed(), "/").await;
    }

    let quantity = parse_quantity(&form.quantity)
        .unwrap_or(1)
        .clamp(1, MAX_QUANTITY);

    let request = AddToCart {
        product_id: form.product_id.clone(),
        quantity,
        cart_id: session::cart_id(&session).await?,
        locale: state.locale(),
    };

    match state.backend.add_to_cart(&request).await {
        Ok(outcome) => {
            let previous = session::cart_count(&session).await?;
            let count = outcome.next_count(previous);
            session::set_cart_id(&session, &outcome.cart_id).await?;
            session::set_cart_count(&session, count).await?;

            info!(cart_id = %outcome.cart_id, count, "Added to cart");
            flash_redirect(&session, Flash::success("Added to cart"), "/cart").await
        }
        Err(err) => {
            warn!("Add to cart failed: {}", err);
            flash_redirect(&session, Flash::failed(), "/").await
        }
    }
}

/// Set one line's quantity; zero removes it
#[instrument(skip(state, session, form), fields(item_id = %form.item_id))]
pub async fn cart_update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Redirect> {
    if !session::verify_csrf(&session, &form.csrf_token).await? {
        warn!("CSRF token mismatch on cart update");
        return flash_redirect(&session, Flash::failed(), "/cart").await;
    }

    let (Some(cart_id), Some(quantity)) = (
        session::cart_id(&session).await?,
        parse_quantity(&form.quantity),
    ) else {
        return flash_redirect(&session, Flash::failed(), "/cart").await;
    };
    if form.item_id.trim().is_empty() {
        return flash_redirect(&session, Flash::failed(), "/cart").await;
    }

    let quantity = quantity.min(MAX_QUANTITY);
    match state
        .backend
        .update_cart_line(&cart_id, form.item_id.trim(), quantity, &state.locale())
        .await
    {
        Ok(cart) => {
            session::set_cart_count(&session, cart.badge_count()).await?;
            flash_redirect(&session, Flash::success("Cart updated"), "/cart").await
        }
        Err(err) => {
            warn!(cart_id = %cart_id, "Cart update failed: {}", err);
            flash_redirect(&session, Flash::failed(), "/cart").await
        }
    }
}

/// Remove every line, one remote call per line
#[instrument(skip(state, session, form))]
pub async fn cart_clear(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CsrfForm>,
) -> Result<Redirect> {
    if !session::verify_csrf(&session, &form.csrf_token).await? {
        warn!("CSRF token mismatch on cart clear");
        return flash_redirect(&session, Flash::failed(), "/cart").await;
    }

    let Some(cart_id) = session::cart_id(&session).await? else {
        return Ok(Redirect::to("/cart"));
    };

    match state.backend.clear_cart(&cart_id, &state.locale()).await {
        Ok(outcome) if outcome.is_complete() => {
            session::set_cart_count(&session, 0).await?;
            info!(cart_id = %cart_id, lines = outcome.attempted, "Cart cleared");
            flash_redirect(&session, Flash::success("Cart cleared"), "/cart").await
        }
        Ok(outcome) => {
            warn!(
                cart_id = %cart_id,
                attempted = outcome.attempted,
                failed = outcome.failed,
                "Cart partially cleared"
            );
            flash_redirect(&session, Flash::failed(), "/cart").await
        }
        Err(err) => {
            warn!(cart_id = %cart_id, "Cart clear failed: {}", err);
            flash_redirect(&session, Flash::failed(), "/cart").await
        }
    }
}

// =============================================================================
// Checkout & Callback
// =============================================================================

/// Hand the cart to the hosted payment page
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Result<Response> {
    let Some(cart_id) = session::cart_id(&session).await? else {
        return Ok(
            flash_redirect(&session, Flash::error("Your cart is empty"), "/cart")
                .await?
                .into_response(),
        );
    };

    let form = state.backend.checkout_form(&cart_id, &state.locale());
    info!(cart_id = %cart_id, action = %form.action, "Redirecting to payment page");

    Ok(CheckoutTemplate::new(&state.store.title, form).into_response())
}

/// Payment notification from the platform
#[instrument(skip(state, notification), fields(invoice_id = %notification.invoice_id))]
pub async fn payment_callback(
    State(state): State<AppState>,
    Query(notification): Query<PaymentNotification>,
) -> impl IntoResponse {
    let ok = state.backend.verify_notification(&notification);

    if ok {
        info!(
            amount = %notification.amount,
            currency = %notification.currency,
            "Payment confirmed"
        );
    } else {
        warn!("Payment callback rejected");
    }

    Json(serde_json::json!({ "ok": ok }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shop_core::{Currency, Price, Product};

    #[test]
    fn test_page_number() {
        assert_eq!(page_number(None), 1);
        assert_eq!(page_number(Some("3")), 3);
        assert_eq!(page_number(Some("0")), 1);
        assert_eq!(page_number(Some("-2")), 1);
        assert_eq!(page_number(Some("abc")), 1);
    }

    #[test]
    fn test_is_path_token() {
        assert!(is_path_token("123"));
        assert!(is_path_token("a-b_c"));
        assert!(!is_path_token(""));
        assert!(!is_path_token("1/2"));
        assert!(!is_path_token("x y"));
    }

    fn legacy(page: &str, id: Option<&str>, q: Option<&str>) -> Option<String> {
        legacy_location(&LegacyQuery {
            page: Some(page.to_string()),
            id: id.map(String::from),
            q: q.map(String::from),
        })
    }

    #[test]
    fn test_legacy_locations() {
        assert_eq!(legacy("category", Some("5"), None).as_deref(), Some("/category/5"));
        assert_eq!(legacy("product", Some("3012"), None).as_deref(), Some("/product/3012"));
        assert_eq!(
            legacy("search", None, Some("gift card")).as_deref(),
            Some("/search?q=gift%20card")
        );
        assert_eq!(legacy("cart", None, None).as_deref(), Some("/cart"));
        assert_eq!(legacy("product", Some("../x"), None).as_deref(), Some("/"));
        assert_eq!(legacy("unknown", None, None).as_deref(), Some("/"));
        assert_eq!(legacy_location(&LegacyQuery::default()), None);
    }

    #[test]
    fn test_has_more() {
        let product = Product::new("1", "A", Price::zero(Currency::USD));

        let full = ProductPage::new(vec![product.clone(); 2], 1);
        assert!(has_more(&full, 2));
        assert!(!has_more(&full, 3));

        let mut counted = ProductPage::new(vec![product; 2], 2);
        counted.total_pages = Some(2);
        assert!(!has_more(&counted, 2));
    }
}
