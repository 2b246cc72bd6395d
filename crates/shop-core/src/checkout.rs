//! # Checkout Types
//!
//! Checkout is a browser-side form POST to the platform's hosted payment page.
//! Completion is reported back through a signed callback.

use serde::{Deserialize, Serialize};

/// A form the browser submits to the hosted payment page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentForm {
    /// Absolute URL of the hosted payment page
    pub action: String,
    /// Hidden fields, in submission order
    pub fields: Vec<(String, String)>,
}

impl PaymentForm {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            fields: Vec::new(),
        }
    }

    /// Builder: append a hidden field
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Query parameters of the payment callback
///
/// Absent parameters deserialize to empty strings, which never verify.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentNotification {
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub invoice_id: String,
    #[serde(default)]
    pub seller_id: String,
    #[serde(default)]
    pub signature: String,
}

impl PaymentNotification {
    /// Signed fields in canonical (alphabetical) order
    pub fn signed_fields(&self) -> [(&'static str, &str); 4] {
        [
            ("amount", self.amount.as_str()),
            ("currency", self.currency.as_str()),
            ("invoice_id", self.invoice_id.as_str()),
            ("seller_id", self.seller_id.as_str()),
        ]
    }
}
