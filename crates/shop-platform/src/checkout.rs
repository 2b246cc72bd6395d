//! # Hosted Payment Page
//!
//! Checkout hands the cart over to the platform: the browser POSTs the cart id
//! with currency and language to the hosted payment page. Nothing is recorded
//! locally.

use crate::config::PlatformConfig;
use shop_core::{CartId, PaymentForm, ShopLocale};

/// Build the auto-submitting form for a cart
pub fn payment_form(config: &PlatformConfig, cart_id: &CartId, locale: &ShopLocale) -> PaymentForm {
    PaymentForm::new(config.payment_url.clone())
        .with_field("cart_uid", cart_id.as_str())
        .with_field("typecurr", locale.currency.as_str())
        .with_field("lang", locale.lang.clone())
}
