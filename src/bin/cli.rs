use anyhow::{Context, Result};
use bulker::config::Config;
use bulker::form;
use bulker::prompt::Prompter;
use bulker::{generate, Frontend, License, Outcome, RunParameters};
use clap::Parser;
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "bulker",
    version,
    about = "Create a Freesound bulk-describe CSV for a folder of sounds",
    after_help = "Run bulker without arguments to fill in a form.\n\
                  The short spellings -df, -nt and -ns are accepted for --desc, --name_tags and --name_sep."
)]
struct Cli {
    /// Directory of sounds
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    dir_name: PathBuf,

    /// Pattern of files to describe, e.g. -p "sample*.wav" [default: *]
    #[arg(short, long)]
    pattern: Option<String>,

    /// Pack name
    #[arg(short = 'n', long = "name")]
    pack_name: Option<String>,

    /// License
    #[arg(short, long, value_enum, ignore_case = true)]
    license: License,

    /// Geotag in double quotes, e.g. "41.40348, 2.189420, 18"
    #[arg(short, long, default_value = "")]
    geotag: String,

    /// Mark sounds as explicit content
    #[arg(short = 'x', long)]
    explicit: bool,

    /// Text file with the description
    #[arg(long = "desc", visible_alias = "df", value_name = "FILE")]
    desc_file: PathBuf,

    /// Encoding of the text file with the description
    #[arg(short, long)]
    encoding: Option<String>,

    /// Tags in double quotes, e.g. "tag1 tag2"
    #[arg(short, long)]
    tags: String,

    /// Make extra tags from words in the file name
    #[arg(long = "name_tags", visible_aliases = ["nt", "name-tags"])]
    name_tags: bool,

    /// Name separator, e.g. "-" (used with --name_tags) [default: _]
    #[arg(long = "name_sep", visible_aliases = ["ns", "name-sep"])]
    name_sep: Option<String>,

    /// Output file name, standard output used if omitted
    #[arg(short, long = "output_file", visible_alias = "output-file", value_name = "FILE")]
    output_file: Option<PathBuf>,

    /// Sort files by name instead of directory order
    #[arg(long)]
    sort: bool,

    /// Path to config TOML
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Command-line values win; the config fills whatever was left out.
    fn into_parameters(self, cfg: &Config) -> RunParameters {
        RunParameters {
            dir_name: self.dir_name,
            pattern: self.pattern.unwrap_or_else(|| cfg.pattern.clone()),
            desc_file: self.desc_file,
            tags: self.tags,
            name_tags: self.name_tags,
            name_sep: self.name_sep.unwrap_or_else(|| cfg.name_sep.clone()),
            geotag: self.geotag,
            license: self.license,
            pack_name: self.pack_name.or_else(|| cfg.pack_name.clone()).unwrap_or_default(),
            explicit: self.explicit,
            output_file: self.output_file,
            encoding: self.encoding.or_else(|| cfg.encoding.clone()),
            sort_files: self.sort || cfg.sort_files,
        }
    }
}

/// Logs go to stderr (stdout may carry the CSV) and, when `log_dir` is configured,
/// to a daily-rotated file as well.
fn init_logging(cfg: &Config) -> Option<WorkerGuard> {
    // Honor RUST_LOG if set, otherwise only warnings.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    let mut guard = None;
    let file_layer = cfg.log_dir.as_ref().and_then(|dir| {
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("bulker")
            .filename_suffix("log")
            .build(dir);
        match appender {
            Ok(appender) => {
                let (non_blocking, g) = tracing_appender::non_blocking(appender);
                guard = Some(g);
                Some(fmt::layer().with_ansi(false).with_writer(non_blocking))
            }
            Err(e) => {
                eprintln!("Cannot log to {}: {}", dir.display(), e);
                None
            }
        }
    });

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer);
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to set global tracing subscriber: {}", e);
    }
    guard
}

/// Multi-letter single-dash flags (`-df`, `-nt`, `-ns`) would otherwise be split by clap
/// into `-d f`, `-n t` and `-n s`; rewrite them to their long aliases.
fn expand_legacy_flags<I: IntoIterator<Item = OsString>>(args: I) -> Vec<OsString> {
    let mut out = Vec::new();
    let mut after_separator = false;
    for arg in args {
        if after_separator {
            out.push(arg);
            continue;
        }
        let rewritten = arg.to_str().and_then(|s| {
            if s == "--" {
                after_separator = true;
                return None;
            }
            ["-df", "-nt", "-ns"].iter().find_map(|flag| {
                let rest = s.strip_prefix(*flag)?;
                if rest.is_empty() || rest.starts_with('=') {
                    Some(OsString::from(format!("-{}{}", flag, rest)))
                } else {
                    None
                }
            })
        });
        out.push(rewritten.unwrap_or(arg));
    }
    out
}

fn run_form() -> Result<()> {
    let cfg = Config::load(None).context("loading config")?;
    let _guard = init_logging(&cfg);
    let mut prompter = Prompter::stdio();
    form::run_form(&mut prompter, &cfg).context("running form")?;
    Ok(())
}

fn main() -> Result<()> {
    // No arguments at all: collect the parameters through the form instead.
    if std::env::args_os().len() <= 1 {
        return run_form();
    }

    let cli = Cli::parse_from(expand_legacy_flags(std::env::args_os()));
    let cfg = Config::load(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(p) => format!("loading config from {}", p.display()),
        None => "loading config".to_string(),
    })?;
    let guard = init_logging(&cfg);
    let params = cli.into_parameters(&cfg);

    let mut prompter = Prompter::stdio();
    match generate(&params, Frontend::Command, &mut prompter) {
        Ok(Outcome::Display(doc)) => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for line in doc.lines() {
                writeln!(out, "{}", line).context("writing to standard output")?;
            }
        }
        Ok(Outcome::Written(_)) | Ok(Outcome::Declined) => {}
        Err(e) => {
            for msg in e.messages() {
                eprintln!("{}", msg);
            }
            drop(guard);
            std::process::exit(1);
        }
    }
    Ok(())
}
