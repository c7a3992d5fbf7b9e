use crate::encoding::{read_description, resolve_encodings};
use crate::error::{BulkerError, ValidationError};
use crate::files::{compile_pattern, select_files};
use crate::models::{CsvDocument, CsvRow, Frontend, Outcome, RunParameters};
use crate::prompt::Confirm;
use crate::tags::compose_tags;
use crate::util::{quote, quote_if_needed};
use crate::validate::validate;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Validate, build and route the document. This is the single entry point both
/// front-ends call.
pub fn generate(
    params: &RunParameters,
    frontend: Frontend,
    confirm: &mut dyn Confirm,
) -> Result<Outcome, BulkerError> {
    validate(params).map_err(BulkerError::Validation)?;
    let document = build_document(params)?;
    deliver(document, params.output_file.as_deref(), frontend, confirm)
}

/// Build the header and one row per selected file. Expects validated parameters.
pub fn build_document(params: &RunParameters) -> Result<CsvDocument, BulkerError> {
    let candidates = resolve_encodings(params.encoding.as_deref());
    debug!("Encoding candidates: {:?}", candidates.names());
    let description = read_description(&params.desc_file, &candidates)?;

    let pattern = compile_pattern(&params.pattern).map_err(|e| {
        BulkerError::Validation(vec![ValidationError::InvalidPattern {
            pattern: params.pattern.clone(),
            reason: e.to_string(),
        }])
    })?;
    let files = select_files(&params.dir_name, &pattern, params.sort_files)?;

    let geotag = quote(&params.geotag);
    let license = params.license.display_name().to_string();
    let pack_name = quote_if_needed(&params.pack_name);
    let is_explicit = if params.explicit { "1" } else { "0" }.to_string();

    let rows = files
        .iter()
        .map(|file_name| {
            let tags = compose_tags(&params.tags, file_name, &params.name_sep, params.name_tags);
            debug!("{} -> tags {}", file_name, tags);
            let name = quote_if_needed(file_name);
            CsvRow {
                audio_filename: name.clone(),
                name,
                tags,
                geotag: geotag.clone(),
                description: description.clone(),
                license: license.clone(),
                pack_name: pack_name.clone(),
                is_explicit: is_explicit.clone(),
            }
        })
        .collect::<Vec<_>>();

    info!("Described {} file(s) from {}", rows.len(), params.dir_name.display());
    Ok(CsvDocument { rows })
}

/// Write the document to `output`, or hand it back for display when there is none.
/// From the command line an existing file is only replaced after confirmation.
pub fn deliver(
    document: CsvDocument,
    output: Option<&Path>,
    frontend: Frontend,
    confirm: &mut dyn Confirm,
) -> Result<Outcome, BulkerError> {
    let path = match output {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => return Ok(Outcome::Display(document)),
    };

    if path.exists() && frontend == Frontend::Command {
        let question = format!("Destination file {} exists. Overwrite?", path.display());
        if !confirm.confirm(&question) {
            info!("Not overwriting {}", path.display());
            return Ok(Outcome::Declined);
        }
    }

    write_atomically(path, &document.render()).map_err(|source| BulkerError::WriteFailure {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote {}", path.display());
    Ok(Outcome::Written(path.to_path_buf()))
}

/// Write through a temporary file next to the destination so a failure leaves nothing
/// behind. The result keeps the permissions of the file it replaces; a new file gets the
/// mode a plain create would give it.
fn write_atomically(path: &Path, contents: &str) -> io::Result<()> {
    let target = resolve_symlinks(path)?;
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = new_temp_file(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;
    if let Ok(existing) = fs::metadata(&target) {
        tmp.as_file().set_permissions(existing.permissions())?;
    }
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}

/// Follow symlinks so the file they point at is replaced, not the link.
fn resolve_symlinks(path: &Path) -> io::Result<PathBuf> {
    let mut current = path.to_path_buf();
    for _ in 0..MAX_SYMLINK_HOPS {
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => {
                let link = fs::read_link(&current)?;
                current = match current.parent() {
                    Some(parent) if link.is_relative() => parent.join(link),
                    _ => link,
                };
            }
            _ => return Ok(current),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::Other,
        format!("too many levels of symbolic links at {}", path.display()),
    ))
}

const MAX_SYMLINK_HOPS: usize = 40;

#[cfg(unix)]
fn new_temp_file(dir: &Path) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;
    // 0o666 is filtered through the umask at creation
    tempfile::Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn new_temp_file(dir: &Path) -> io::Result<NamedTempFile> {
    NamedTempFile::new_in(dir)
}
