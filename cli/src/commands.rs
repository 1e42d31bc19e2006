//! Line commands understood by the driver.

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Push(String),
    Pop,
    /// Simulated hardware back button.
    Back,
    Title(String),
    Status,
    Help,
    Quit,
    Empty,
}

pub(crate) const HELP: &str = "\
commands:
  push <source>   resolve and push a page
  pop             pop the current page
  back            press the hardware back button
  title <text>    retitle the current page
  status          show the navbar projection
  help            show this help
  quit            tear down and exit";

impl Command {
    pub(crate) fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb {
            "" => Ok(Command::Empty),
            "push" if rest.is_empty() => Err("usage: push <source>".to_string()),
            "push" => Ok(Command::Push(rest.to_string())),
            "pop" => Ok(Command::Pop),
            "back" => Ok(Command::Back),
            "title" if rest.is_empty() => Err("usage: title <text>".to_string()),
            "title" => Ok(Command::Title(rest.to_string())),
            "status" => Ok(Command::Status),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command: {other} (try `help`)")),
        }
    }
}
