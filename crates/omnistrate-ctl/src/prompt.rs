use omnistrate_core::confirm::Confirm;
use std::io::{BufRead, BufReader, IsTerminal, Stdin, Write};

/// Yes/no confirmation for destructive steps.
///
/// On a terminal the question goes through `inquire`. Piped input is read one
/// line at a time, and end of input counts as no.
pub struct TerminalPrompt<R> {
    input: R,
    interactive: bool,
}

impl TerminalPrompt<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        let stdin = std::io::stdin();
        let interactive = stdin.is_terminal() && std::io::stderr().is_terminal();
        Self {
            input: BufReader::new(stdin),
            interactive,
        }
    }
}

impl<R: BufRead> TerminalPrompt<R> {
    /// Line-oriented prompt over `input`, never interactive.
    pub fn new(input: R) -> Self {
        Self {
            input,
            interactive: false,
        }
    }

    fn read_answer(&mut self, prompt: &str) -> bool {
        eprint!("{prompt} [y/N]: ");
        let _ = std::io::stderr().flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => {
                eprintln!();
                false
            }
            Ok(_) => is_yes(&line),
        }
    }
}

impl<R: BufRead> Confirm for TerminalPrompt<R> {
    fn confirm(&mut self, prompt: &str) -> bool {
        if !self.interactive {
            return self.read_answer(prompt);
        }
        // Esc and Ctrl-C both decline.
        inquire::Confirm::new(prompt)
            .with_default(false)
            .prompt()
            .unwrap_or(false)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
