use crate::error::BulkerError;
use regex::Regex;
use std::path::Path;
use tracing::warn;
use walkdir::WalkDir;

/// Shell-style file name pattern with `fnmatch` semantics: `*`, `?`, `[seq]` and
/// `[!seq]`. Wildcards also match a leading dot; an unclosed `[` is a literal.
#[derive(Debug, Clone)]
pub struct FilePattern {
    /// `None` when the pattern contains an empty set and can never match.
    regex: Option<Regex>,
}

impl FilePattern {
    pub fn matches(&self, name: &str) -> bool {
        self.regex.as_ref().map_or(false, |re| re.is_match(name))
    }
}

pub fn compile_pattern(pattern: &str) -> Result<FilePattern, regex::Error> {
    let regex = match translate(pattern) {
        Some(body) => Some(Regex::new(&format!(r"\A(?s:{})\z", body))?),
        None => None,
    };
    Ok(FilePattern { regex })
}

/// Regex body for `pattern`, or `None` if some `[...]` set is empty.
fn translate(pattern: &str) -> Option<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let n = chars.len();
    let mut out = String::new();
    let mut i = 0;
    while i < n {
        let c = chars[i];
        i += 1;
        match c {
            '*' => {
                while i < n && chars[i] == '*' {
                    i += 1;
                }
                out.push_str(".*");
            }
            '?' => out.push('.'),
            '[' => {
                let mut j = i;
                if j < n && chars[j] == '!' {
                    j += 1;
                }
                if j < n && chars[j] == ']' {
                    j += 1;
                }
                while j < n && chars[j] != ']' {
                    j += 1;
                }
                if j >= n {
                    out.push_str(r"\[");
                } else {
                    out.push_str(&translate_set(&chars[i..j])?);
                    i = j + 1;
                }
            }
            other => out.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    Some(out)
}

/// Translate the inside of a `[...]` set. Reversed ranges like `z-a` are dropped.
fn translate_set(body: &[char]) -> Option<String> {
    let (negate, members) = match body.split_first() {
        Some(('!', rest)) => (true, rest),
        _ => (false, body),
    };

    let mut items = String::new();
    let mut k = 0;
    while k < members.len() {
        if k + 2 < members.len() && members[k + 1] == '-' {
            let (lo, hi) = (members[k], members[k + 2]);
            if lo <= hi {
                items.push_str(&escape_char(lo));
                items.push('-');
                items.push_str(&escape_char(hi));
            }
            k += 3;
        } else {
            items.push_str(&escape_char(members[k]));
            k += 1;
        }
    }

    match (items.is_empty(), negate) {
        (true, true) => Some(".".to_string()),
        (true, false) => None,
        (false, true) => Some(format!("[^{}]", items)),
        (false, false) => Some(format!("[{}]", items)),
    }
}

fn escape_char(c: char) -> String {
    regex::escape(c.encode_utf8(&mut [0; 4]))
}

/// Names of the immediate entries of `dir` matching `pattern`. Directories are included
/// when they match. Order is the filesystem's own unless `sort` is set.
pub fn select_files(
    dir: &Path,
    pattern: &FilePattern,
    sort: bool,
) -> Result<Vec<String>, BulkerError> {
    let mut walker = WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(false);
    if sort {
        walker = walker.sort_by_file_name();
    }

    let mut names = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| BulkerError::ListDirectory {
            path: dir.to_path_buf(),
            source,
        })?;
        let name = match entry.file_name().to_str() {
            Some(n) => n.to_string(),
            None => {
                warn!("Skipping non UTF-8 file name {}", entry.path().display());
                continue;
            }
        };
        if pattern.matches(&name) {
            names.push(name);
        }
    }
    Ok(names)
}
