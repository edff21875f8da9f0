/// Strips everything that is not an ASCII digit. Total and idempotent; an
/// empty result is accepted and yields the degenerate `https://wa.me/` link.
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Plain WhatsApp deep link for an already-normalized number.
#[must_use]
pub fn whatsapp_link(phone: &str) -> String {
    format!("https://wa.me/{phone}")
}

/// WhatsApp deep link with a pre-filled message.
#[must_use]
pub fn whatsapp_link_with_text(phone: &str, text: &str) -> String {
    format!("https://wa.me/{phone}?text={}", urlencoding::encode(text))
}
