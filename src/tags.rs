use crate::util::quote;
use std::collections::HashSet;
use std::path::Path;

/// Words in `name` (extension removed) split on `sep`, empty pieces dropped.
pub fn words_from_name<'a>(name: &'a str, sep: &str) -> Vec<&'a str> {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);
    if sep.is_empty() {
        return if stem.is_empty() { Vec::new() } else { vec![stem] };
    }
    stem.split(sep).filter(|w| !w.is_empty()).collect()
}

/// Union of the explicit tags and the words of the file name, without duplicates.
/// Explicit tags come first, then new words in file-name order.
pub fn merge_tags(tags: &str, name: &str, sep: &str) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    let explicit = tags.split(' ').filter(|w| !w.is_empty());
    for word in explicit.chain(words_from_name(name, sep)) {
        if seen.insert(word) {
            out.push(word.to_string());
        }
    }
    out
}

/// Tags column for one file.
pub fn compose_tags(tags: &str, file_name: &str, sep: &str, from_name: bool) -> String {
    if from_name {
        quote(&merge_tags(tags, file_name, sep).join(" "))
    } else {
        quote(tags)
    }
}
