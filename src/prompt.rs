use std::io::{self, BufRead, Write};

/// Yes/no question asked before a destructive step.
pub trait Confirm {
    /// True only for an explicit yes. Anything else, including a read failure, is a no.
    fn confirm(&mut self, question: &str) -> bool;
}

/// Line-oriented prompts over any reader/writer pair (stdin/stdout in the binary,
/// in-memory buffers in tests).
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Print `label` and read one line, trailing newline removed.
    /// `Ok(None)` means the input is exhausted.
    pub fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    /// Ask with a default shown in brackets, used when the answer is blank.
    pub fn ask_or(&mut self, label: &str, default: &str) -> io::Result<Option<String>> {
        let shown = if default.is_empty() {
            format!("{}: ", label)
        } else {
            format!("{} [{}]: ", label, default)
        };
        Ok(self.ask(&shown)?.map(|answer| {
            if answer.trim().is_empty() {
                default.to_string()
            } else {
                answer
            }
        }))
    }

    pub fn ask_yes_no(&mut self, question: &str) -> io::Result<Option<bool>> {
        Ok(self.ask(&format!("{} [y/N] ", question))?.map(|a| is_yes(&a)))
    }
}

impl<R: BufRead, W: Write> Confirm for Prompter<R, W> {
    fn confirm(&mut self, question: &str) -> bool {
        match self.ask_yes_no(question) {
            Ok(answer) => answer.unwrap_or(false),
            Err(e) => {
                tracing::warn!("Could not read confirmation: {}", e);
                false
            }
        }
    }
}

/// Only `y`/`Y` counts as yes.
pub fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}
