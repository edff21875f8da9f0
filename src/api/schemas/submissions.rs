use crate::domain::submission::{Customer, ProductDetails, Submission, SubmissionKind};
use crate::error::AppError;
use crate::services::relay_service::RelayOutcome;
use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const MSG_MISSING_FIELDS: &str = "بيانات ناقصة. يرجى إرسال نوع الطلب، اسم المستخدم، ورقم الواتساب.";
const MSG_UNKNOWN_TYPE: &str = "نوع الطلب غير معروف. يجب أن يكون booking أو contact.";
const MSG_SENT: &str = "تم إرسال الطلب بنجاح!";
const MSG_FALLBACK: &str = "تم استلام طلبك ولكن هناك مشكلة تقنية في الإرسال";
const MSG_MANUAL: &str = "يمكنك التواصل معنا مباشرة عبر الواتساب";

/// Raw form submission as posted by the storefront widget. Every field is
/// optional at the wire level; `validate` applies the shallow presence rules.
#[derive(Debug, Deserialize)]
pub struct SubmissionRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub user: Option<CustomerPayload>,
    pub product: Option<ProductPayload>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerPayload {
    pub name: Option<String>,
    pub whatsapp: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductPayload {
    pub name: Option<String>,
    /// The widget sends either a number or a preformatted string.
    pub price: Option<Value>,
    pub currency: Option<String>,
    pub category: Option<String>,
    pub period: Option<String>,
    /// Legacy alias for `period`; `period` wins when both are present.
    pub duration: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl SubmissionRequest {
    /// Shallow validation: kind, customer name and WhatsApp number must be
    /// present and non-empty. Product subfields are never required.
    ///
    /// # Errors
    /// Returns the client-facing message when a required field is missing.
    pub fn validate(&self) -> Result<(), String> {
        let has_kind = self.kind.as_deref().is_some_and(|k| !k.is_empty());
        let has_name = self.user.as_ref().and_then(|u| u.name.as_deref()).is_some_and(|n| !n.is_empty());
        let has_whatsapp =
            self.user.as_ref().and_then(|u| u.whatsapp.as_deref()).is_some_and(|w| !w.is_empty());

        if has_kind && has_name && has_whatsapp { Ok(()) } else { Err(MSG_MISSING_FIELDS.to_string()) }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

// Numbers pass through as text; zero and empty strings fall back to the
// placeholder like every other absent field.
fn price_text(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s).filter(|s| !s.is_empty()),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

impl TryFrom<SubmissionRequest> for Submission {
    type Error = AppError;

    fn try_from(payload: SubmissionRequest) -> Result<Self, Self::Error> {
        payload.validate().map_err(AppError::Validation)?;

        let raw_kind = payload.kind.unwrap_or_default();
        let kind = SubmissionKind::parse(&raw_kind).ok_or_else(|| AppError::UnknownType(MSG_UNKNOWN_TYPE.into()))?;

        let user = payload.user.ok_or_else(|| AppError::Validation(MSG_MISSING_FIELDS.into()))?;
        let customer = Customer {
            name: user.name.unwrap_or_default(),
            whatsapp: user.whatsapp.unwrap_or_default(),
        };

        let product = payload.product.map(|p| ProductDetails {
            name: non_empty(p.name),
            price: price_text(p.price),
            currency: non_empty(p.currency),
            category: non_empty(p.category),
            period: non_empty(p.period).or_else(|| non_empty(p.duration)),
            notes: non_empty(p.notes),
            features: p.features,
        });

        Ok(Self { kind, customer, product, message: non_empty(payload.message) })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveredResponse {
    pub success: bool,
    pub message: String,
    pub message_id: i64,
    pub whatsapp_link: String,
    pub timestamp: String,
    pub debug: DeliveryDebug,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDebug {
    pub phone_cleaned: String,
    pub message_length: usize,
}

/// Transport-level success carrying a delivery failure: the submission is
/// treated as received and the customer is pointed at WhatsApp directly.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackResponse {
    pub success: bool,
    pub message: String,
    pub error: String,
    pub received: bool,
    pub fallback: bool,
    pub whatsapp_link: String,
    pub manual_message: String,
}

#[derive(Debug)]
pub enum SubmissionResponse {
    Delivered(DeliveredResponse),
    Fallback(FallbackResponse),
}

impl From<RelayOutcome> for SubmissionResponse {
    fn from(outcome: RelayOutcome) -> Self {
        match outcome {
            RelayOutcome::Delivered { message_id, whatsapp_link, timestamp, phone, message_length } => {
                Self::Delivered(DeliveredResponse {
                    success: true,
                    message: MSG_SENT.to_string(),
                    message_id,
                    whatsapp_link,
                    timestamp,
                    debug: DeliveryDebug { phone_cleaned: phone, message_length },
                })
            }
            RelayOutcome::Fallback { description, whatsapp_link } => Self::Fallback(FallbackResponse {
                success: false,
                message: MSG_FALLBACK.to_string(),
                error: description,
                received: true,
                fallback: true,
                whatsapp_link,
                manual_message: MSG_MANUAL.to_string(),
            }),
        }
    }
}

impl IntoResponse for SubmissionResponse {
    fn into_response(self) -> Response {
        // Both arms are HTTP 200; the fallback signals failure in the body only.
        match self {
            Self::Delivered(body) => Json(body).into_response(),
            Self::Fallback(body) => Json(body).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: Value) -> SubmissionRequest {
        serde_json::from_value(json).expect("deserialize")
    }

    #[test]
    fn test_validate_accepts_complete_submission() {
        let req = request(serde_json::json!({
            "type": "contact",
            "user": {"name": "Ali", "whatsapp": "+966 50 123 4567"},
            "message": "Hi",
        }));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_or_empty_required_fields() {
        let cases = vec![
            serde_json::json!({"user": {"name": "Ali", "whatsapp": "0501"}}),
            serde_json::json!({"type": "booking"}),
            serde_json::json!({"type": "booking", "user": {"whatsapp": "0501"}}),
            serde_json::json!({"type": "booking", "user": {"name": "Ali"}}),
            serde_json::json!({"type": "booking", "user": {"name": "", "whatsapp": "0501"}}),
            serde_json::json!({"type": "booking", "user": {"name": "Ali", "whatsapp": ""}}),
        ];
        for case in cases {
            let req = request(case.clone());
            assert!(req.validate().is_err(), "expected rejection for {case}");
        }
    }

    #[test]
    fn test_try_from_rejects_unknown_kind() {
        let req = request(serde_json::json!({
            "type": "refund",
            "user": {"name": "Ali", "whatsapp": "0501"},
        }));
        let err = Submission::try_from(req).expect_err("must fail");
        assert!(matches!(err, AppError::UnknownType(_)));
    }

    #[test]
    fn test_try_from_maps_duration_alias_and_price_number() {
        let req = request(serde_json::json!({
            "type": "booking",
            "user": {"name": "Ali", "whatsapp": "0501"},
            "product": {"name": "اشتراك", "price": 25, "duration": "سنوي"},
        }));
        let submission = Submission::try_from(req).expect("convert");
        let product = submission.product.expect("product");
        assert_eq!(product.price.as_deref(), Some("25"));
        assert_eq!(product.period.as_deref(), Some("سنوي"));
    }

    #[test]
    fn test_try_from_blanks_degrade_to_missing() {
        let req = request(serde_json::json!({
            "type": "booking",
            "user": {"name": "Ali", "whatsapp": "0501"},
            "product": {"name": "", "price": 0, "currency": ""},
            "message": "",
        }));
        let submission = Submission::try_from(req).expect("convert");
        let product = submission.product.expect("product");
        assert_eq!(product.name, None);
        assert_eq!(product.price, None);
        assert_eq!(product.currency, None);
        assert_eq!(submission.message, None);
    }

    #[test]
    fn test_response_keys_are_camel_case() {
        let delivered = SubmissionResponse::from(RelayOutcome::Delivered {
            message_id: 42,
            whatsapp_link: "https://wa.me/1?text=x".into(),
            timestamp: "2026-08-07T10:30:00Z".into(),
            phone: "1".into(),
            message_length: 7,
        });
        let SubmissionResponse::Delivered(body) = delivered else {
            panic!("expected delivered response");
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["messageId"], 42);
        assert_eq!(json["whatsappLink"], "https://wa.me/1?text=x");
        assert_eq!(json["debug"]["phoneCleaned"], "1");
        assert_eq!(json["debug"]["messageLength"], 7);

        let fallback = SubmissionResponse::from(RelayOutcome::Fallback {
            description: "Bad Request".into(),
            whatsapp_link: "https://wa.me/1".into(),
        });
        let SubmissionResponse::Fallback(body) = fallback else {
            panic!("expected fallback response");
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["success"], false);
        assert_eq!(json["received"], true);
        assert_eq!(json["fallback"], true);
        assert_eq!(json["manualMessage"], MSG_MANUAL);
    }
}
