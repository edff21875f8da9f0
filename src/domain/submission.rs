/// The two accepted submission shapes. Anything else is rejected during
/// validation, so rendering is total once a kind exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    Booking,
    Contact,
}

impl SubmissionKind {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "booking" => Some(Self::Booking),
            "contact" => Some(Self::Contact),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Booking => "booking",
            Self::Contact => "contact",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Customer {
    pub name: String,
    /// The number as the customer typed it; normalization happens at relay time.
    pub whatsapp: String,
}

/// Product details attached to a booking. Every field is optional: missing
/// values degrade to placeholder text at render time instead of failing
/// validation.
#[derive(Debug, Clone, Default)]
pub struct ProductDetails {
    pub name: Option<String>,
    pub price: Option<String>,
    pub currency: Option<String>,
    pub category: Option<String>,
    pub period: Option<String>,
    pub notes: Option<String>,
    pub features: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Submission {
    pub kind: SubmissionKind,
    pub customer: Customer,
    pub product: Option<ProductDetails>,
    pub message: Option<String>,
}
