//! Interactive form front-end: asks for each field in turn, then runs the same
//! generation as the command line. The output path is chosen here on purpose,
//! so an existing file is overwritten without asking.

use crate::config::Config;
use crate::csv::generate;
use crate::models::{Frontend, License, Outcome, RunParameters};
use crate::prompt::Prompter;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Run the form until the user stops or input ends.
pub fn run_form<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    cfg: &Config,
) -> io::Result<()> {
    writeln!(prompter.output(), "Bulker: describe a folder of sounds for bulk upload.")?;
    loop {
        let params = match collect_parameters(prompter, cfg)? {
            Some(p) => p,
            None => return Ok(()),
        };

        match generate(&params, Frontend::Form, prompter) {
            Ok(Outcome::Written(path)) => {
                writeln!(prompter.output(), "CSV written to {}.", path.display())?;
            }
            Ok(Outcome::Display(doc)) => {
                for line in doc.lines() {
                    writeln!(prompter.output(), "{}", line)?;
                }
            }
            Ok(Outcome::Declined) => {
                writeln!(prompter.output(), "Nothing written.")?;
            }
            Err(e) => {
                for msg in e.messages() {
                    writeln!(prompter.output(), "Attention: {}", msg)?;
                }
            }
        }

        match prompter.ask_yes_no("Create another CSV?")? {
            Some(true) => continue,
            _ => return Ok(()),
        }
    }
}

/// Ask every field in the form's order. `None` when input ends midway.
pub fn collect_parameters<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    cfg: &Config,
) -> io::Result<Option<RunParameters>> {
    match read_parameters(prompter, cfg) {
        Ok(params) => Ok(Some(params)),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e),
    }
}

fn read_parameters<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    cfg: &Config,
) -> io::Result<RunParameters> {
    let default_pack = cfg.pack_name.clone().unwrap_or_default();
    let default_encoding = cfg.encoding.clone().unwrap_or_default();

    let dir_name = answered(prompter.ask_or("Directory of sounds", "")?)?;
    let pattern = answered(prompter.ask_or("Pattern", &cfg.pattern)?)?;
    let pack_name = answered(prompter.ask_or("Pack name", &default_pack)?)?;
    let license = ask_license(prompter, cfg.license)?;
    let geotag = answered(prompter.ask_or("Geotag (lat, lon, zoom)", "")?)?;
    let explicit = answered(prompter.ask_yes_no("Mark as explicit content?")?)?;
    let desc_file = answered(prompter.ask_or("Description file", "")?)?;
    let encoding = answered(prompter.ask_or("Text encoding", &default_encoding)?)?;
    let tags = answered(prompter.ask_or("Tags", "")?)?;
    let name_tags = answered(prompter.ask_yes_no("Add tags from the file name?")?)?;
    let name_sep = answered(prompter.ask_or("Separator", &cfg.name_sep)?)?;
    let output_file = answered(prompter.ask_or("Output file (blank to show here)", "")?)?;

    Ok(RunParameters {
        dir_name: PathBuf::from(dir_name.trim()),
        pattern,
        desc_file: PathBuf::from(desc_file.trim()),
        tags,
        name_tags,
        name_sep,
        geotag,
        license,
        pack_name,
        explicit,
        output_file: non_empty(output_file.trim()).map(PathBuf::from),
        encoding: non_empty(encoding.trim()).map(str::to_string),
        sort_files: cfg.sort_files,
    })
}

fn ask_license<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    default: License,
) -> io::Result<License> {
    const LABEL: &str = "License (0 = CC 0, by = Attribution, nc = Non Commercial)";
    loop {
        let answer = answered(prompter.ask_or(LABEL, default.code())?)?;
        match answer.parse::<License>() {
            Ok(l) => return Ok(l),
            Err(msg) => writeln!(prompter.output(), "{}", msg)?,
        }
    }
}

/// Input ending before the form is complete.
fn answered<T>(answer: Option<T>) -> io::Result<T> {
    answer.ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "form input ended"))
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
