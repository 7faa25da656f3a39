//! Razorpay checkout signature
//!
//! `signature = hex(HMAC_SHA256(key_secret, "{order_id}|{payment_id}"))`

use hmac::Mac;

use crate::providers::common::{hmac_sha256, hmac_sha256_mac};

fn signing_payload(order_id: &str, payment_id: &str) -> String {
    format!("{order_id}|{payment_id}")
}

/// Compute the lowercase hex signature the checkout widget returns for a captured payment.
pub fn sign_payment(key_secret: &str, order_id: &str, payment_id: &str) -> String {
    hex::encode(hmac_sha256(
        key_secret.as_bytes(),
        signing_payload(order_id, payment_id).as_bytes(),
    ))
}

/// Constant-time check of a hex signature. Malformed hex never verifies.
pub(crate) fn verify_signature(
    key_secret: &str,
    order_id: &str,
    payment_id: &str,
    signature_hex: &str,
) -> bool {
    let Ok(signature) = hex::decode(signature_hex.trim()) else {
        return false;
    };
    hmac_sha256_mac(
        key_secret.as_bytes(),
        signing_payload(order_id, payment_id).as_bytes(),
    )
    .is_some_and(|mac| mac.verify_slice(&signature).is_ok())
}
