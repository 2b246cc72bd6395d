//! # Product Types
//!
//! Product and price types shared by the platform client and the web layer.
//! Products are never stored locally; they are normalized from platform
//! responses on every request.

use serde::{Deserialize, Serialize};

/// Currencies the platform quotes prices in (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    USD,
    RUB,
    EUR,
    UAH,
}

impl Currency {
    /// Returns the ISO 4217 currency code as the platform expects it
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::RUB => "RUB",
            Currency::EUR => "EUR",
            Currency::UAH => "UAH",
        }
    }

    /// Parse a currency code, ignoring case and surrounding whitespace
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "RUB" | "RUR" => Some(Currency::RUB),
            "EUR" => Some(Currency::EUR),
            "UAH" => Some(Currency::UAH),
            _ => None,
        }
    }

    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u8 {
        2
    }

    /// Convert a decimal amount to the smallest currency unit (cents, kopecks)
    pub fn to_smallest_unit(&self, amount: f64) -> i64 {
        let multiplier = 10_f64.powi(self.decimal_places() as i32);
        (amount * multiplier).round() as i64
    }

    /// Convert from smallest unit back to decimal
    pub fn from_smallest_unit(&self, amount: i64) -> f64 {
        let divisor = 10_f64.powi(self.decimal_places() as i32);
        amount as f64 / divisor
    }

    fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::RUB => "₽",
            Currency::EUR => "€",
            Currency::UAH => "₴",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::USD
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::from_code(s).ok_or_else(|| format!("unsupported currency: {s}"))
    }
}

/// Language and currency a request is served in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopLocale {
    /// Language tag such as `en-US`
    pub lang: String,
    pub currency: Currency,
}

impl ShopLocale {
    pub fn new(lang: impl Into<String>, currency: Currency) -> Self {
        Self {
            lang: lang.into(),
            currency,
        }
    }
}

impl Default for ShopLocale {
    fn default() -> Self {
        Self::new("en-US", Currency::USD)
    }
}

/// Price with amount in smallest currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in smallest currency unit (cents for USD)
    pub amount: i64,
    /// Currency
    pub currency: Currency,
}

impl Price {
    /// Create a new price from decimal amount
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self {
            amount: currency.to_smallest_unit(amount),
            currency,
        }
    }

    /// Create a price from smallest unit (cents)
    pub fn from_cents(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Zero in the given currency
    pub fn zero(currency: Currency) -> Self {
        Self::from_cents(0, currency)
    }

    /// Get the decimal amount
    pub fn as_decimal(&self) -> f64 {
        self.currency.from_smallest_unit(self.amount)
    }

    /// Multiply by a quantity, saturating at the `i64` bounds
    pub fn times(&self, quantity: u32) -> Self {
        Self::from_cents(self.amount.saturating_mul(i64::from(quantity)), self.currency)
    }

    /// Format for display (e.g., "$10.00", "₽150.00")
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency.symbol(), self.as_decimal())
    }
}

/// A product as shown in listings and on the product page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Platform product identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Price in the currency the platform quoted
    pub price: Price,

    /// Optional image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Optional long description (product page only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Product {
    /// Create a product with the required fields
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image_url: None,
            description: None,
        }
    }

    /// Builder: set image URL
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

/// One page of a product listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    /// 1-based page number that was requested
    pub page: u32,
    /// Total pages when the platform reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
}

impl ProductPage {
    pub fn new(products: Vec<Product>, page: u32) -> Self {
        Self {
            products,
            page,
            total_pages: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Whether a next page link makes sense
    pub fn has_next(&self) -> bool {
        match self.total_pages {
            Some(total) => self.page < total,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_conversion() {
        let usd = Currency::USD;
        assert_eq!(usd.to_smallest_unit(10.99), 1099);
        assert_eq!(usd.from_smallest_unit(1099), 10.99);

        let rub = Currency::RUB;
        assert_eq!(rub.to_smallest_unit(150.5), 15050);
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("usd"), Some(Currency::USD));
        assert_eq!(Currency::from_code(" RUR "), Some(Currency::RUB));
        assert_eq!(Currency::from_code("btc"), None);
        assert_eq!("EUR".parse::<Currency>(), Ok(Currency::EUR));
    }

    #[test]
    fn test_price_display() {
        let price = Price::new(29.99, Currency::USD);
        assert_eq!(price.display(), "$29.99");

        let price_rub = Price::new(150.0, Currency::RUB);
        assert_eq!(price_rub.display(), "₽150.00");
    }

    #[test]
    fn test_price_times() {
        let price = Price::new(2.5, Currency::EUR);
        assert_eq!(price.times(3).amount, 750);
    }

    #[test]
    fn test_price_times_saturates() {
        let huge = Price::new(1e17, Currency::USD);
        assert_eq!(huge.times(99).amount, i64::MAX);

        let debt = Price::from_cents(i64::MIN / 2, Currency::USD);
        assert_eq!(debt.times(3).amount, i64::MIN);
    }

    #[test]
    fn test_product_builder() {
        let product = Product::new("3012", "Game key", Price::new(9.99, Currency::USD))
            .with_image("https://img.example/3012.png")
            .with_description("Steam key");

        assert_eq!(product.id, "3012");
        assert_eq!(product.image_url.as_deref(), Some("https://img.example/3012.png"));
        assert_eq!(product.description.as_deref(), Some("Steam key"));
    }

    #[test]
    fn test_product_page_has_next() {
        let mut page = ProductPage::new(Vec::new(), 1);
        assert!(!page.has_next());
        page.total_pages = Some(3);
        assert!(page.has_next());
        page.page = 3;
        assert!(!page.has_next());
    }
}
