//! # Response Normalization
//!
//! The platform's public and authenticated endpoints describe the same things
//! with different field names. These helpers map every observed shape onto the
//! core types. The key lists below are the observed variants, tried in order;
//! a record that uses some other key is read with defaults rather than
//! rejected.

use serde_json::Value;
use shop_core::{Cart, CartId, CartLine, Category, Currency, LocalizedName, Price, Product};

/// Keys that carry a product id, in priority order
pub const ID_KEYS: &[&str] = &["id", "good_id", "id_goods", "product_id"];

/// Keys that carry a product name
pub const NAME_KEYS: &[&str] = &["name", "name_goods", "title"];

/// Price keys and the currency each one implies (`None`: read `currency`)
pub const PRICE_KEYS: &[(&str, Option<Currency>)] = &[
    ("price", None),
    ("price_usd", Some(Currency::USD)),
    ("price_rub", Some(Currency::RUB)),
    ("price_eur", Some(Currency::EUR)),
    ("price_uah", Some(Currency::UAH)),
];

/// Keys that carry an image URL
pub const IMAGE_KEYS: &[&str] = &["image", "image_url", "preview", "img"];

/// Keys that carry a long description
pub const DESCRIPTION_KEYS: &[&str] = &["info", "description", "add_info"];

/// Keys under which a response nests its list of records
const LIST_KEYS: &[&str] = &["product", "products", "rows", "items", "goods"];

/// Read a field as a string; numbers are rendered, blanks are skipped
pub fn string_field(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match record.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Read a numeric value that may be sent as a number or a string
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}

pub(crate) fn u32_field(record: &Value, keys: &[&str]) -> Option<u32> {
    keys.iter()
        .find_map(|key| record.get(*key).and_then(parse_number))
        .filter(|n| *n >= 0.0)
        .map(|n| n as u32)
}

/// Resolve a record's price from the first price key present.
///
/// `price` takes its currency from the record's `currency` field, else the
/// requested currency. `price_usd`/`price_rub`/... fix the currency.
pub fn price_of(record: &Value, fallback: Currency) -> Option<Price> {
    PRICE_KEYS.iter().find_map(|(key, implied)| {
        let amount = record.get(*key).and_then(parse_number)?;
        let currency = implied.unwrap_or_else(|| {
            record
                .get("currency")
                .and_then(Value::as_str)
                .and_then(Currency::from_code)
                .unwrap_or(fallback)
        });
        Some(Price::new(amount, currency))
    })
}

fn image_of(record: &Value) -> Option<String> {
    string_field(record, IMAGE_KEYS).or_else(|| {
        record
            .get("preview_imgs")
            .and_then(Value::as_array)
            .and_then(|imgs| imgs.first())
            .and_then(|img| string_field(img, &["url"]))
    })
}

/// Map one record onto a `Product`. Records without an id are skipped;
/// a missing price reads as zero in the requested currency.
pub fn normalize_product(record: &Value, fallback: Currency) -> Option<Product> {
    let id = string_field(record, ID_KEYS)?;
    let name = string_field(record, NAME_KEYS).unwrap_or_default();
    let price = price_of(record, fallback).unwrap_or_else(|| Price::zero(fallback));

    Some(Product {
        id,
        name,
        price,
        image_url: image_of(record),
        description: string_field(record, DESCRIPTION_KEYS),
    })
}

/// Find the record list in a response body.
///
/// Lists sit under one of several keys, sometimes wrapped once more
/// (`{"products": {"product": [...]}}`).
pub fn extract_list(body: &Value) -> &[Value] {
    for key in LIST_KEYS {
        match body.get(*key) {
            Some(Value::Array(items)) => return items,
            Some(nested) if nested.is_object() => {
                if let Some(items) = ["item", "product", "row"]
                    .iter()
                    .find_map(|k| nested.get(*k).and_then(Value::as_array))
                {
                    return items;
                }
            }
            _ => {}
        }
    }
    &[]
}

/// Map every record of a listing response
pub fn normalize_products(body: &Value, fallback: Currency) -> Vec<Product> {
    extract_list(body)
        .iter()
        .filter_map(|record| normalize_product(record, fallback))
        .collect()
}

/// Total page count, when the response carries one
pub fn total_pages(body: &Value) -> Option<u32> {
    u32_field(body, &["totalPages", "total_pages", "pages"])
}

fn normalize_category(record: &Value) -> Option<Category> {
    let id = string_field(record, &["id", "category_id"])?;
    let name = record
        .get("name")
        .cloned()
        .and_then(|v| serde_json::from_value::<LocalizedName>(v).ok())
        .unwrap_or_default();
    let children = ["sub", "children"]
        .iter()
        .find_map(|k| record.get(*k).and_then(Value::as_array))
        .map(|subs| subs.iter().filter_map(normalize_category).collect())
        .unwrap_or_default();

    Some(Category {
        id,
        name,
        product_count: u32_field(record, &["cnt", "count"]),
        children,
    })
}

/// Map a category tree response
pub fn normalize_categories(body: &Value) -> Vec<Category> {
    ["category", "categories"]
        .iter()
        .find_map(|k| body.get(*k).and_then(Value::as_array))
        .map(|records| records.iter().filter_map(normalize_category).collect())
        .unwrap_or_default()
}

fn normalize_cart_line(record: &Value, fallback: Currency) -> Option<CartLine> {
    let item_id = string_field(record, &["item_id"])?;
    let product_id = string_field(record, &["id", "product_id"]).unwrap_or_default();
    let name = string_field(record, NAME_KEYS).unwrap_or_default();
    let unit_price = price_of(record, fallback).unwrap_or_else(|| Price::zero(fallback));
    let quantity = u32_field(record, &["cnt_item", "quantity", "cnt"]).unwrap_or(1);

    Some(CartLine {
        item_id,
        product_id,
        name,
        unit_price,
        quantity,
    })
}

/// Map a cart listing response
pub fn normalize_cart(body: &Value, cart_id: &CartId, requested: Currency) -> Cart {
    let currency = ["cart_curr", "currency"]
        .iter()
        .find_map(|k| body.get(*k).and_then(Value::as_str))
        .and_then(Currency::from_code)
        .unwrap_or(requested);

    let mut cart = Cart::new(cart_id.clone(), currency);
    cart.lines = extract_list(body)
        .iter()
        .filter_map(|record| normalize_cart_line(record, currency))
        .collect();
    cart.count = u32_field(body, &["cart_cnt"]);
    cart
}
