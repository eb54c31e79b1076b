//! Line-oriented console used by the menus.
//!
//! A `Console` pairs an input source with an output sink. It is handed to the
//! dispatcher, the auth gate, and every operation explicitly, so tests can
//! drive the whole menu tree from a `Cursor` and inspect what was printed.

use crate::core::{ConsoleError, Result};
use std::io::{self, BufRead, Write};
use tracing::debug;

pub const CHOICE_PROMPT: &str = "Please make your choice: ";
pub const INVALID_INPUT: &str = "Your input is invalid!";

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    /// Console over the process's stdin and stdout
    pub fn stdio() -> Self {
        Console::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Console { input, output }
    }

    /// Reads one line without its line terminator.
    ///
    /// Returns `ConsoleError::InputClosed` at end of input.
    pub fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            debug!("input closed");
            return Err(ConsoleError::InputClosed);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }

    /// Prints `label` without a newline and reads the answer.
    pub fn prompt(&mut self, label: &str) -> Result<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        self.read_line()
    }

    /// Prompts until `parse` accepts the answer.
    ///
    /// Validation and parse errors are shown to the user and the prompt is
    /// repeated; any other error is returned.
    pub fn prompt_until<T, F>(&mut self, label: &str, mut parse: F) -> Result<T>
    where
        F: FnMut(&str) -> Result<T>,
    {
        loop {
            let answer = self.prompt(label)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(ConsoleError::Validation(msg)) => self.say(&msg)?,
                Err(ConsoleError::InputParse(_)) => self.say(INVALID_INPUT)?,
                Err(e) => return Err(e),
            }
        }
    }

    /// Reads a numeric menu choice, re-prompting on anything that is not a number.
    pub fn read_choice(&mut self) -> Result<u32> {
        self.prompt_until(CHOICE_PROMPT, parse_choice)
    }

    /// Writes one line of output.
    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Raw access to the output sink, e.g. for tabular results.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

/// Parses a menu choice.
pub fn parse_choice(input: &str) -> Result<u32> {
    input
        .trim()
        .parse::<u32>()
        .map_err(|_| ConsoleError::InputParse(input.to_string()))
}
