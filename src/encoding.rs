use crate::error::BulkerError;
use crate::util::quote_always;
use encoding_rs::{Encoding, UTF_8};
use std::path::Path;
use tracing::{debug, warn};

/// Ordered encodings to try on the description file; first successful decode wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingCandidates(Vec<&'static Encoding>);

impl EncodingCandidates {
    pub fn as_slice(&self) -> &[&'static Encoding] {
        &self.0
    }

    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|e| e.name().to_string()).collect()
    }
}

/// Build the candidate list: the user's choice, then the system locale's encoding,
/// then UTF-8. Duplicates and unknown labels are dropped.
pub fn resolve_encodings(user: Option<&str>) -> EncodingCandidates {
    resolve_encodings_with_locale(user, system_locale_encoding().as_deref())
}

/// Same as [`resolve_encodings`] with an explicit locale codeset instead of the environment.
pub fn resolve_encodings_with_locale(
    user: Option<&str>,
    locale: Option<&str>,
) -> EncodingCandidates {
    let mut out: Vec<&'static Encoding> = Vec::new();
    for label in [user, locale].into_iter().flatten() {
        let label = label.trim();
        if label.is_empty() {
            continue;
        }
        match Encoding::for_label(label.as_bytes()) {
            Some(enc) if enc != UTF_8 && !out.contains(&enc) => out.push(enc),
            Some(_) => {}
            None => warn!("Ignoring unknown text encoding '{}'", label),
        }
    }
    out.push(UTF_8);
    EncodingCandidates(out)
}

/// Codeset of the active locale (`LC_ALL`, then `LC_CTYPE`, then `LANG`), if any.
pub fn system_locale_encoding() -> Option<String> {
    ["LC_ALL", "LC_CTYPE", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
        .and_then(|value| locale_codeset(&value))
}

/// Extract the codeset from a locale name such as `de_DE.ISO-8859-15@euro`.
/// `C` and `POSIX` carry no codeset.
pub fn locale_codeset(locale: &str) -> Option<String> {
    let without_modifier = locale.split('@').next().unwrap_or(locale);
    let (_, codeset) = without_modifier.split_once('.')?;
    if codeset.is_empty() {
        None
    } else {
        Some(codeset.to_string())
    }
}

/// Decode `bytes` with the first candidate that accepts them.
pub fn decode_first(bytes: &[u8], candidates: &EncodingCandidates) -> Option<String> {
    for enc in candidates.as_slice() {
        match enc.decode_without_bom_handling_and_without_replacement(bytes) {
            Some(text) => {
                debug!("Decoded description as {}", enc.name());
                return Some(normalize_newlines(text.strip_prefix('\u{feff}').unwrap_or(&*text)));
            }
            None => debug!("Description is not valid {}", enc.name()),
        }
    }
    None
}

/// Read the description file and return it as a quoted CSV field.
pub fn read_description(
    path: &Path,
    candidates: &EncodingCandidates,
) -> Result<String, BulkerError> {
    let bytes = std::fs::read(path).map_err(|source| BulkerError::DescriptionUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    match decode_first(&bytes, candidates) {
        Some(text) => Ok(quote_always(&text)),
        None => Err(BulkerError::UnsupportedEncoding {
            path: path.to_path_buf(),
            tried: candidates.names(),
        }),
    }
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
