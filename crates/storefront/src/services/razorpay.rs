//! Razorpay payment gateway client.
//!
//! Two responsibilities: opening gateway orders over the REST API, and
//! verifying the HMAC-SHA256 payment signature the checkout widget posts
//! back. Amounts cross the wire in paise (the API takes minor units only).

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use aroura_core::Price;

use crate::config::RazorpayConfig;

const API_BASE: &str = "https://api.razorpay.com/v1";

type HmacSha256 = Hmac<Sha256>;

/// Errors from the payment gateway.
#[derive(Debug, Error)]
pub enum RazorpayError {
    #[error("Gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Gateway rejected the order: {status} {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Amount not representable in paise")]
    AmountOverflow,
}

/// A gateway order as returned by the orders API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayOrder {
    /// Gateway order id, e.g. `order_Nabc123XYZ`.
    pub id: String,
    /// Amount in paise.
    pub amount: i64,
    pub currency: String,
}

#[derive(Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

/// Payment fields the checkout widget posts back for verification.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentCallback {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

/// Razorpay REST client.
#[derive(Clone)]
pub struct RazorpayClient {
    http: reqwest::Client,
    key_id: String,
    key_secret: SecretString,
    base_url: String,
}

impl RazorpayClient {
    /// Build a client from gateway configuration.
    #[must_use]
    pub fn new(config: &RazorpayConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
            base_url: API_BASE.to_owned(),
        }
    }

    /// Public key id, handed to the checkout widget.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Open a gateway order for the given total, in INR.
    ///
    /// # Errors
    ///
    /// Returns `RazorpayError::AmountOverflow` if the total does not convert
    /// to paise, `Rejected` if the API returns a non-success status.
    pub async fn create_order(
        &self,
        total: Price,
        receipt: &str,
    ) -> Result<GatewayOrder, RazorpayError> {
        let amount = total.as_paise().ok_or(RazorpayError::AmountOverflow)?;
        let body = CreateOrderBody {
            amount,
            currency: "INR",
            receipt,
        };

        let response = self
            .http
            .post(format!("{}/orders", self.base_url))
            .basic_auth(&self.key_id, Some(self.key_secret.expose_secret()))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RazorpayError::Rejected { status, body });
        }

        Ok(response.json().await?)
    }

    /// Verify the payment signature from the checkout callback.
    ///
    /// The gateway signs `"{order_id}|{payment_id}"` with the key secret and
    /// sends the MAC hex-encoded. Comparison is constant-time.
    #[must_use]
    pub fn verify_signature(&self, callback: &PaymentCallback) -> bool {
        verify_payment_signature(
            self.key_secret.expose_secret(),
            &callback.razorpay_order_id,
            &callback.razorpay_payment_id,
            &callback.razorpay_signature,
        )
    }
}

fn verify_payment_signature(
    key_secret: &str,
    order_id: &str,
    payment_id: &str,
    signature_hex: &str,
) -> bool {
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(key_secret.as_bytes()) else {
        return false;
    };
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    mac.verify_slice(&signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    const ORDER_ID: &str = "order_Nabc123XYZ";
    const PAYMENT_ID: &str = "pay_Mdef456UVW";
    const KEY_SECRET: &str = "test_secret_key";
    // HMAC-SHA256(test_secret_key, "order_Nabc123XYZ|pay_Mdef456UVW")
    const GOOD_SIGNATURE: &str =
        "d21b31c77852b6638fdef3ce6795dfaa5f982b0acb7e5a551d6ef91b7707338a";

    #[test]
    fn known_signature_verifies() {
        assert!(verify_payment_signature(
            KEY_SECRET,
            ORDER_ID,
            PAYMENT_ID,
            GOOD_SIGNATURE
        ));
    }

    #[test]
    fn tampered_payment_id_fails() {
        assert!(!verify_payment_signature(
            KEY_SECRET,
            ORDER_ID,
            "pay_Mdef456UVX",
            GOOD_SIGNATURE
        ));
    }

    #[test]
    fn wrong_secret_fails() {
        assert!(!verify_payment_signature(
            "other_secret",
            ORDER_ID,
            PAYMENT_ID,
            GOOD_SIGNATURE
        ));
    }

    #[test]
    fn non_hex_signature_fails_without_panicking() {
        assert!(!verify_payment_signature(
            KEY_SECRET,
            ORDER_ID,
            PAYMENT_ID,
            "not hex at all"
        ));
    }

    #[test]
    fn price_converts_to_paise_for_the_gateway() {
        let total = Price::new(Decimal::new(149_900, 2)); // 1499.00
        assert_eq!(total.as_paise(), Some(149_900));
    }
}
