//! Interactive input
//!
//! Everything the tool asks the user goes through [`Prompter`], so the
//! session and CLI code can be driven by scripted answers in tests.

use std::io::{self, BufRead, Write};

/// Source of answers to interactive questions
pub trait Prompter {
    /// Asks a question and returns the trimmed answer
    fn ask(&mut self, label: &str) -> io::Result<String>;

    /// Asks for a secret; implementations should not echo the input
    fn ask_secret(&mut self, label: &str) -> io::Result<String>;
}

/// Reads answers from the controlling terminal
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, label: &str) -> io::Result<String> {
        print!("{} ", label);
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin closed while waiting for input",
            ));
        }
        Ok(line.trim().to_string())
    }

    fn ask_secret(&mut self, label: &str) -> io::Result<String> {
        rpassword::prompt_password(format!("{} ", label)).map(|s| s.trim().to_string())
    }
}
