use std::io::{self, Write};

pub fn print_json(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

pub fn print_text(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

/// Print each diagnostic on its own stderr line, without its trailing newline
pub fn print_diagnostics(messages: &[String]) -> io::Result<()> {
    let mut err = io::stderr().lock();
    for message in messages {
        writeln!(err, "  - {}", message.trim_end())?;
    }
    Ok(())
}
