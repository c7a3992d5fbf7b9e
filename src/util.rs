/// Wrap non-empty text in double quotes, escaping inner quotes as `\"`.
/// Empty text stays empty so optional columns remain blank.
pub fn quote(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    quote_always(text)
}

/// Like [`quote`] but an empty value still yields `""`.
pub fn quote_always(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\\\""))
}

/// Quote only when the value would otherwise break the row: commas, quotes or line breaks.
pub fn quote_if_needed(text: &str) -> String {
    if text.contains([',', '"', '\n', '\r']) {
        quote_always(text)
    } else {
        text.to_string()
    }
}
