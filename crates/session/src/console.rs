//! Line-oriented console: typed prompts with re-prompt on bad input.
//!
//! Every read consumes exactly one line. Numeric reads trim the line and
//! retry until it parses; text reads return the line as typed.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use tracing::debug;

use crate::error::InputError;

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Hand back the output sink (tests read what was printed).
    pub fn into_output(self) -> W {
        self.output
    }

    /// Print one line.
    pub fn say(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    /// Print an empty line.
    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.output)
    }

    /// Direct access for table rendering.
    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    /// Prompt and return the raw line, without its terminator. An empty line
    /// is returned as an empty string.
    pub fn read_line(&mut self, prompt: &str) -> Result<String, InputError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(InputError::Closed);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }

    /// Prompt until the line parses as an integer.
    pub fn read_int(&mut self, prompt: &str) -> Result<i32, InputError> {
        self.read_parsed(prompt, "Invalid integer. Try again.", |_: &i32| true)
    }

    /// Prompt until the line parses as a finite decimal number.
    pub fn read_decimal(&mut self, prompt: &str) -> Result<f64, InputError> {
        self.read_parsed(prompt, "Invalid number. Try again.", |v: &f64| v.is_finite())
    }

    fn read_parsed<T: FromStr>(
        &mut self,
        prompt: &str,
        diagnostic: &str,
        accept: impl Fn(&T) -> bool,
    ) -> Result<T, InputError> {
        loop {
            let line = self.read_line(prompt)?;
            match line.trim().parse::<T>() {
                Ok(value) if accept(&value) => return Ok(value),
                _ => {
                    debug!("rejected input {line:?}");
                    writeln!(self.output, "{diagnostic}")?;
                }
            }
        }
    }
}
