//! Interactive stdin prompts.

use std::io::{self, Write};

/// Print a prompt and read one trimmed line.
pub fn line(message: &str) -> io::Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf)?;
    Ok(buf.trim().to_string())
}

/// Prompt until the user enters an nsec-formatted key.
pub fn nsec(message: &str) -> io::Result<String> {
    loop {
        let input = line(message)?;
        if input.starts_with("nsec1") {
            return Ok(input);
        }
        println!("Invalid format — a private key starts with nsec1.");
    }
}

/// Read recipient keys one per line until an empty line.
pub fn recipients() -> io::Result<Vec<String>> {
    println!("Enter recipient keys (npub or hex), one per line; empty line to finish:");
    let mut keys = Vec::new();
    loop {
        let input = line("> ")?;
        if input.is_empty() {
            break;
        }
        keys.push(input);
    }
    Ok(keys)
}

/// Yes/no confirmation.
pub fn confirm(message: &str) -> io::Result<bool> {
    Ok(line(&format!("{message} (y/n): "))?.eq_ignore_ascii_case("y"))
}
