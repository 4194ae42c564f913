//! Payment-type normalization.
//!
//! Stored payment types come in three shapes: the plain enum string
//! (`"CARD"`), a legacy JSON object (`{"type": "CARD", "reference": ...}`),
//! or something unreadable. Every stream is normalized through this module
//! before aggregation.
//!
//! Unreadable values count as [`PaymentType::Cash`]. That fallback inflates
//! the expected drawer total, so every use of it is logged and counted in
//! the reconciliation (`unrecognized_payment_types`) for the closing
//! operator to see.

use serde_json::Value;
use tracing::warn;

use crate::models::PaymentType;

/// Strictly resolves a stored payment type; `None` when unreadable.
///
/// ```
/// use bakery_pos::cash::resolve_payment_type;
/// use bakery_pos::models::PaymentType;
///
/// assert_eq!(resolve_payment_type(Some("CASH")), Some(PaymentType::Cash));
/// assert_eq!(
///     resolve_payment_type(Some(r#"{"type":"CARD","other":1}"#)),
///     Some(PaymentType::Card)
/// );
/// assert_eq!(resolve_payment_type(Some("garbage")), None);
/// assert_eq!(resolve_payment_type(None), None);
/// ```
pub fn resolve_payment_type(raw: Option<&str>) -> Option<PaymentType> {
    let raw = raw?.trim();
    if let Some(kind) = PaymentType::from_code(raw) {
        return Some(kind);
    }
    match serde_json::from_str::<Value>(raw).ok()? {
        Value::String(code) => PaymentType::from_code(&code),
        Value::Object(fields) => fields
            .get("type")
            .and_then(Value::as_str)
            .and_then(PaymentType::from_code),
        _ => None,
    }
}

/// Resolves a stored payment type, falling back to CASH when unreadable.
///
/// The flag is `false` when the fallback was used.
pub fn normalize_payment_type(raw: Option<&str>) -> (PaymentType, bool) {
    match resolve_payment_type(raw) {
        Some(kind) => (kind, true),
        None => {
            warn!(raw = ?raw, "Unrecognized payment type, counting as CASH");
            (PaymentType::Cash, false)
        }
    }
}

/// Converts a payment type received in a JSON request into its stored form.
///
/// Strings are stored as-is, objects as their JSON text, null as nothing.
pub fn encode_payment_type(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
