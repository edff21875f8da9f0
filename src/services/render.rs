//! Pure rendering of the Telegram notification and WhatsApp welcome texts.
//! No side effects; the dispatch instant is passed in so tests stay
//! deterministic. The copy is the storefront's Arabic, unchanged.

use crate::domain::submission::{ProductDetails, Submission, SubmissionKind};
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::{format_description, offset};

const UNSPECIFIED: &str = "غير محدد";
const DEFAULT_CURRENCY: &str = "ريال";
const DEFAULT_CATEGORY: &str = "عام";
const DEFAULT_PERIOD: &str = "شهري";
const NO_NOTES: &str = "لا توجد ملاحظات";
const NO_MESSAGE: &str = "لا توجد رسالة";
const DEFAULT_PRODUCT: &str = "المنتج المطلوب";

// Riyadh is fixed at UTC+3 year-round; the `time` crate carries no locale
// data, so the date itself renders in English inside the Arabic template.
const RIYADH_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[weekday repr:long], [day] [month repr:long] [year] [hour]:[minute]:[second]");

#[must_use]
pub fn riyadh_timestamp(at: OffsetDateTime) -> String {
    let local = at.to_offset(offset!(+3));
    local.format(RIYADH_FORMAT).unwrap_or_else(|_| local.to_string())
}

/// Millisecond epoch of the dispatch instant; displayed as a request
/// reference, with no deduplication or idempotency semantics.
#[must_use]
pub const fn request_reference(at: OffsetDateTime) -> i128 {
    at.unix_timestamp_nanos() / 1_000_000
}

/// Renders the notification relayed to Telegram. Total for any valid kind.
#[must_use]
pub fn notification_text(submission: &Submission, phone: &str, whatsapp_link: &str, sent_at: OffsetDateTime) -> String {
    let timestamp = riyadh_timestamp(sent_at);
    match submission.kind {
        SubmissionKind::Booking => {
            booking_text(submission, phone, whatsapp_link, &timestamp, request_reference(sent_at))
        }
        SubmissionKind::Contact => contact_text(submission, phone, whatsapp_link, &timestamp),
    }
}

fn booking_text(submission: &Submission, phone: &str, whatsapp_link: &str, timestamp: &str, reference: i128) -> String {
    let empty = ProductDetails::default();
    let product = submission.product.as_ref().unwrap_or(&empty);

    // The feature block disappears entirely when there is nothing to list.
    let features = if product.features.is_empty() {
        String::new()
    } else {
        let bullets = product.features.iter().map(|f| format!("• {f}")).collect::<Vec<_>>().join("\n");
        format!("✨ **المميزات:**\n{bullets}\n\n")
    };

    format!(
        "🎯 **طلب حجز جديد - متجر نابلا** 🎯\n\
         \n\
         👤 **العميل:** {name}\n\
         📱 **الواتساب:** {whatsapp}\n\
         🔢 **الهاتف النظيف:** {phone}\n\
         \n\
         🛒 **المنتج:** {product_name}\n\
         💰 **السعر:** {price} {currency}\n\
         📂 **الفئة:** {category}\n\
         ⏰ **المدة:** {period}\n\
         \n\
         📝 **ملاحظات العميل:**\n\
         {notes}\n\
         \n\
         {features}🕐 **وقت الطلب:** {timestamp}\n\
         📌 **معرف الطلب:** {reference}\n\
         \n\
         🔗 **رابط التواصل المباشر:** {whatsapp_link}",
        name = submission.customer.name,
        whatsapp = submission.customer.whatsapp,
        product_name = product.name.as_deref().unwrap_or(UNSPECIFIED),
        price = product.price.as_deref().unwrap_or(UNSPECIFIED),
        currency = product.currency.as_deref().unwrap_or(DEFAULT_CURRENCY),
        category = product.category.as_deref().unwrap_or(DEFAULT_CATEGORY),
        period = product.period.as_deref().unwrap_or(DEFAULT_PERIOD),
        notes = product.notes.as_deref().unwrap_or(NO_NOTES),
    )
}

fn contact_text(submission: &Submission, phone: &str, whatsapp_link: &str, timestamp: &str) -> String {
    format!(
        "📩 **رسالة تواصل جديدة - متجر نابلا** 📩\n\
         \n\
         👤 **المرسل:** {name}\n\
         📱 **الواتساب:** {whatsapp}\n\
         🔢 **الهاتف النظيف:** {phone}\n\
         \n\
         💬 **الرسالة:**\n\
         {message}\n\
         \n\
         🕐 **وقت الإرسال:** {timestamp}\n\
         \n\
         🔗 **رابط التواصل المباشر:** {whatsapp_link}",
        name = submission.customer.name,
        whatsapp = submission.customer.whatsapp,
        message = submission.message.as_deref().unwrap_or(NO_MESSAGE),
    )
}

/// The pre-filled WhatsApp greeting appended to the link after a successful
/// relay, keyed by submission kind.
#[must_use]
pub fn welcome_text(submission: &Submission) -> String {
    match submission.kind {
        SubmissionKind::Booking => {
            let product_name =
                submission.product.as_ref().and_then(|p| p.name.as_deref()).unwrap_or(DEFAULT_PRODUCT);
            format!(
                "السلام عليكم ورحمة الله وبركاته 🌟\n\nأهلاً وسهلاً بك {}!\n\nلقد تلقينا طلبك للحصول على {}.\nسنتواصل معك خلال 24 ساعة لتأكيد الطلب وتنفيذه.\n\nشكراً لثقتك بنا!",
                submission.customer.name, product_name,
            )
        }
        SubmissionKind::Contact => format!(
            "السلام عليكم ورحمة الله وبركاته 🌟\n\nأهلاً وسهلاً بك {}!\n\nلقد تلقينا رسالتك وسنرد عليك خلال 24 ساعة.\n\nشكراً لتواصلك مع متجر نابلا!",
            submission.customer.name,
        ),
    }
}
