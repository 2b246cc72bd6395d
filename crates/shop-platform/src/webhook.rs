//! # Payment Callback Verification
//!
//! The platform reports a completed payment by calling back with
//! `amount`, `currency`, `invoice_id`, `seller_id` and `signature`.
//! The signature is a hex HMAC-SHA256 over the other parameters, sorted by
//! name and joined as `key:value;`.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use shop_core::PaymentNotification;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

/// Canonical string for a set of parameters: `a:1;b:2;` in key order
pub fn canonical_string(params: &[(&str, &str)]) -> String {
    let mut pairs = params.to_vec();
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    pairs.iter().fold(String::new(), |mut acc, (key, value)| {
        acc.push_str(key);
        acc.push(':');
        acc.push_str(value);
        acc.push(';');
        acc
    })
}

fn keyed_mac(secret: &str, notification: &PaymentNotification) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(canonical_string(&notification.signed_fields()).as_bytes());
    Some(mac)
}

/// Lowercase hex signature for a notification
pub fn sign_notification(secret: &str, notification: &PaymentNotification) -> String {
    keyed_mac(secret, notification)
        .map(|mac| hex::encode(mac.finalize().into_bytes()))
        .unwrap_or_default()
}

/// Check a notification's signature in constant time.
///
/// The supplied signature must equal the lowercase hex HMAC byte for byte.
/// An empty secret never verifies.
pub fn verify_notification(secret: &str, notification: &PaymentNotification) -> bool {
    if secret.is_empty() {
        warn!("Payment callback received but no webhook secret is configured");
        return false;
    }

    let expected = sign_notification(secret, notification);
    let provided = notification.signature.as_bytes();
    if expected.is_empty() || expected.len() != provided.len() {
        debug!("Callback signature has the wrong length");
        return false;
    }

    expected.as_bytes().ct_eq(provided).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec-test";

    fn signed() -> PaymentNotification {
        let mut n = PaymentNotification {
            amount: "29.99".into(),
            currency: "USD".into(),
            invoice_id: "884512".into(),
            seller_id: "100500".into(),
            signature: String::new(),
        };
        n.signature = sign_notification(SECRET, &n);
        n
    }

    /// Replace the character at `idx` with a different one
    fn mutate(s: &str, idx: usize) -> String {
        s.chars()
            .enumerate()
            .map(|(i, c)| {
                if i != idx {
                    c
                } else if c == '0' {
                    '1'
                } else {
                    '0'
                }
            })
            .collect()
    }

    #[test]
    fn test_canonical_string_sorted() {
        let s = canonical_string(&[("seller_id", "7"), ("amount", "1.00"), ("currency", "USD")]);
        assert_eq!(s, "amount:1.00;currency:USD;seller_id:7;");
    }

    #[test]
    fn test_canonical_string_of_notification() {
        let n = signed();
        assert_eq!(
            canonical_string(&n.signed_fields()),
            "amount:29.99;currency:USD;invoice_id:884512;seller_id:100500;"
        );
    }

    #[test]
    fn test_valid_signature_verifies() {
        let n = signed();
        assert_eq!(n.signature.len(), 64);
        assert!(verify_notification(SECRET, &n));
    }

    #[test]
    fn test_uppercase_signature_rejected() {
        let original = signed();
        let idx = original
            .signature
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap();

        let mut one_letter = original.clone();
        one_letter.signature = original
            .signature
            .char_indices()
            .map(|(i, c)| if i == idx { c.to_ascii_uppercase() } else { c })
            .collect();
        assert!(!verify_notification(SECRET, &one_letter));

        let mut all = original.clone();
        all.signature = original.signature.to_uppercase();
        assert!(!verify_notification(SECRET, &all));
    }

    #[test]
    fn test_padded_signature_rejected() {
        let original = signed();
        for padded in [
            format!(" {}", original.signature),
            format!("{}\n", original.signature),
            format!(" {}\n", original.signature),
        ] {
            let mut n = original.clone();
            n.signature = padded;
            assert!(!verify_notification(SECRET, &n));
        }
    }

    #[test]
    fn test_wrong_secret_fails() {
        let n = signed();
        assert!(!verify_notification("other-secret", &n));
        assert!(!verify_notification("", &n));
    }

    #[test]
    fn test_any_field_mutation_fails() {
        let original = signed();

        for field in ["amount", "currency", "invoice_id", "seller_id"] {
            let value = original
                .signed_fields()
                .iter()
                .find(|(k, _)| *k == field)
                .map(|(_, v)| v.to_string())
                .unwrap();

            for idx in 0..value.chars().count() {
                let mut n = original.clone();
                let changed = mutate(&value, idx);
                match field {
                    "amount" => n.amount = changed,
                    "currency" => n.currency = changed,
                    "invoice_id" => n.invoice_id = changed,
                    _ => n.seller_id = changed,
                }
                assert!(
                    !verify_notification(SECRET, &n),
                    "mutation of {field} at {idx} verified"
                );
            }
        }
    }

    #[test]
    fn test_any_signature_mutation_fails() {
        let original = signed();
        for idx in 0..original.signature.len() {
            let mut n = original.clone();
            n.signature = mutate(&original.signature, idx);
            assert!(!verify_notification(SECRET, &n), "signature mutation at {idx} verified");
        }
    }

    #[test]
    fn test_missing_parameters_fail() {
        let n = PaymentNotification::default();
        assert!(!verify_notification(SECRET, &n));

        let mut truncated = signed();
        truncated.signature.pop();
        assert!(!verify_notification(SECRET, &truncated));
    }
}
