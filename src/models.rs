use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Header line of every generated document.
pub const CSV_HEADER: &str = "audio_filename,name,tags,geotag,description,license,pack_name,is_explicit";

/// Closed set of content licenses a sound can be published under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
pub enum License {
    #[default]
    #[serde(rename = "0")]
    #[value(name = "0")]
    Cc0,
    #[serde(rename = "by")]
    #[value(name = "by")]
    Attribution,
    #[serde(rename = "nc")]
    #[value(name = "nc")]
    NonCommercial,
}

impl License {
    pub const ALL: [License; 3] = [License::Cc0, License::Attribution, License::NonCommercial];

    /// Short code accepted on the command line and in the form.
    pub fn code(self) -> &'static str {
        match self {
            License::Cc0 => "0",
            License::Attribution => "by",
            License::NonCommercial => "nc",
        }
    }

    /// Name written into the `license` column.
    pub fn display_name(self) -> &'static str {
        match self {
            License::Cc0 => "Creative Commons 0",
            License::Attribution => "Attribution",
            License::NonCommercial => "Attribution Noncommercial",
        }
    }
}

impl FromStr for License {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        License::ALL
            .into_iter()
            .find(|l| l.code() == code)
            .ok_or_else(|| format!("unknown license code '{}' (expected 0, by or nc)", s.trim()))
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Which front-end collected the parameters. Only the overwrite policy depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frontend {
    /// Interactive form: the output path was picked deliberately, overwrite silently.
    Form,
    /// Command line: ask before replacing an existing output file.
    Command,
}

/// Flat parameter record produced by either front-end and consumed by the core.
#[derive(Debug, Clone, PartialEq)]
pub struct RunParameters {
    pub dir_name: PathBuf,
    pub pattern: String,
    pub desc_file: PathBuf,
    /// Space-separated explicit tags.
    pub tags: String,
    pub name_tags: bool,
    pub name_sep: String,
    /// `"lat, lon, zoom"` or empty.
    pub geotag: String,
    pub license: License,
    pub pack_name: String,
    pub explicit: bool,
    /// `None` prints the document instead of writing it.
    pub output_file: Option<PathBuf>,
    pub encoding: Option<String>,
    /// Sort selected files by name instead of keeping directory order.
    pub sort_files: bool,
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            dir_name: PathBuf::new(),
            pattern: "*".into(),
            desc_file: PathBuf::new(),
            tags: String::new(),
            name_tags: false,
            name_sep: "_".into(),
            geotag: String::new(),
            license: License::default(),
            pack_name: String::new(),
            explicit: false,
            output_file: None,
            encoding: None,
            sort_files: false,
        }
    }
}

/// One line of the document. Every field holds its already-encoded CSV text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    pub audio_filename: String,
    pub name: String,
    pub tags: String,
    pub geotag: String,
    pub description: String,
    pub license: String,
    pub pack_name: String,
    pub is_explicit: String,
}

impl CsvRow {
    pub fn to_line(&self) -> String {
        [
            self.audio_filename.as_str(),
            self.name.as_str(),
            self.tags.as_str(),
            self.geotag.as_str(),
            self.description.as_str(),
            self.license.as_str(),
            self.pack_name.as_str(),
            self.is_explicit.as_str(),
        ]
        .join(",")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvDocument {
    pub rows: Vec<CsvRow>,
}

impl CsvDocument {
    /// Header followed by one line per row. A multi-line description spans several
    /// physical lines inside its row.
    pub fn lines(&self) -> Vec<String> {
        std::iter::once(CSV_HEADER.to_string())
            .chain(self.rows.iter().map(CsvRow::to_line))
            .collect()
    }

    /// Full file contents, every line newline-terminated.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in self.lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

/// How a successful generation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Written(PathBuf),
    /// No output file was requested; the caller shows the document.
    Display(CsvDocument),
    /// The user refused to overwrite an existing file. Nothing was written.
    Declined,
}
