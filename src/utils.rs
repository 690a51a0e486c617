// ABOUTME: Small terminal helpers shared by the CLI
// ABOUTME: Duration formatting, single-key input with a non-TTY fallback, and the MFA code prompt
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::io::{self, BufRead, IsTerminal, Write};

use chrono::Duration;

use crate::errors::{AppError, AppResult};
use crate::session::MfaPrompt;

const KEY_PROMPT: &str = "Enter a key (then press Enter): ";
const MFA_PROMPT: &str = "Enter Garmin MFA code: ";

/// Format as `H:MM:SS`; hours are not wrapped at a day
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds();
    let (minutes, seconds) = (total.div_euclid(60), total.rem_euclid(60));
    let (hours, minutes) = (minutes.div_euclid(60), minutes.rem_euclid(60));
    format!("{hours}:{minutes:02}:{seconds:02}")
}

fn read_trimmed_line(input: &mut impl BufRead) -> AppResult<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
}

/// Read one key press.
///
/// Input is line based. When `is_tty` is false a warning and a prompt are
/// written first. Returns the first character entered, or an empty string.
///
/// # Errors
///
/// Returns an error if reading or writing fails
pub fn read_key(
    input: &mut impl BufRead,
    output: &mut impl Write,
    is_tty: bool,
) -> AppResult<String> {
    if !is_tty {
        writeln!(output, "WARNING: stdin is not a TTY. Falling back to input().")?;
        write!(output, "{KEY_PROMPT}")?;
        output.flush()?;
    }
    let line = read_trimmed_line(input)?.unwrap_or_default();
    Ok(line.chars().next().map(String::from).unwrap_or_default())
}

/// [`read_key`] on the process's stdin and stdout
///
/// # Errors
///
/// Returns an error if reading or writing fails
pub fn safe_readkey() -> AppResult<String> {
    let stdin = io::stdin();
    let is_tty = stdin.is_terminal();
    read_key(&mut stdin.lock(), &mut io::stdout(), is_tty)
}

/// Prompt until a non-empty code is entered
///
/// # Errors
///
/// Returns `InvalidInput` if input closes before a code is entered
pub fn prompt_mfa_code(input: &mut impl BufRead, output: &mut impl Write) -> AppResult<String> {
    loop {
        write!(output, "{MFA_PROMPT}")?;
        output.flush()?;

        let Some(line) = read_trimmed_line(input)? else {
            return Err(AppError::invalid_input(
                "Input closed before an MFA code was entered",
            ));
        };
        let code = line.trim();
        if !code.is_empty() {
            return Ok(code.to_owned());
        }
        writeln!(output, "Code cannot be empty.")?;
    }
}

/// MFA prompt reading from the terminal
#[must_use]
pub fn stdin_mfa_prompt() -> Box<dyn MfaPrompt> {
    Box::new(|| prompt_mfa_code(&mut io::stdin().lock(), &mut io::stdout()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::seconds(0)), "0:00:00");
        assert_eq!(format_duration(Duration::seconds(3_725)), "1:02:05");
        assert_eq!(
            format_duration(Duration::days(1) + Duration::seconds(5)),
            "24:00:05"
        );
    }

    #[test]
    fn test_read_key_non_tty_prompts() -> AppResult<()> {
        let mut input = Cursor::new("yes\n");
        let mut output = Vec::new();
        let key = read_key(&mut input, &mut output, false)?;

        assert_eq!(key, "y");
        assert_eq!(
            String::from_utf8_lossy(&output),
            "WARNING: stdin is not a TTY. Falling back to input().\nEnter a key (then press Enter): "
        );
        Ok(())
    }

    #[test]
    fn test_read_key_tty_is_silent() -> AppResult<()> {
        let mut input = Cursor::new("\n");
        let mut output = Vec::new();
        assert_eq!(read_key(&mut input, &mut output, true)?, "");
        assert!(output.is_empty());
        Ok(())
    }

    #[test]
    fn test_prompt_mfa_code_reprompts_on_empty() -> AppResult<()> {
        let mut input = Cursor::new("\n  123456  \n");
        let mut output = Vec::new();
        let code = prompt_mfa_code(&mut input, &mut output)?;

        assert_eq!(code, "123456");
        assert_eq!(
            String::from_utf8_lossy(&output),
            "Enter Garmin MFA code: Code cannot be empty.\nEnter Garmin MFA code: "
        );
        Ok(())
    }

    #[test]
    fn test_prompt_mfa_code_eof() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert!(prompt_mfa_code(&mut input, &mut output).is_err());
    }
}
