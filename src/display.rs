// ABOUTME: Console rendering of API responses with a mirrored response.json file
// ABOUTME: Single-call and grouped layouts, plus the guarded call-then-display helper
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Response display
//!
//! Each rendering is printed to the configured writer and the same text is
//! written to `{export_dir}/response.json`, replacing the previous contents.

use std::fs;
use std::future::Future;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tracing::warn;

use crate::call_guard::CallGuard;
use crate::errors::{AppError, AppResult, CallOutcome, ConnectFault};

const RESPONSE_FILE: &str = "response.json";

fn rule(ch: char, width: usize) -> String {
    ch.to_string().repeat(width)
}

fn render(value: &Value) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Prints API responses and mirrors them to `response.json`
pub struct ResponseDisplay<W: Write> {
    export_dir: PathBuf,
    out: W,
}

impl ResponseDisplay<io::Stdout> {
    /// Display writing to standard output
    #[must_use]
    pub fn stdout(export_dir: impl Into<PathBuf>) -> Self {
        Self::new(export_dir, io::stdout())
    }
}

impl<W: Write> ResponseDisplay<W> {
    /// Display writing to `out`
    #[must_use]
    pub fn new(export_dir: impl Into<PathBuf>, out: W) -> Self {
        Self {
            export_dir: export_dir.into(),
            out,
        }
    }

    /// Path of the mirrored response file
    #[must_use]
    pub fn response_file(&self) -> PathBuf {
        self.export_dir.join(RESPONSE_FILE)
    }

    /// Consume the display and return the writer
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn save(&self, content: &str) -> AppResult<PathBuf> {
        let path = self.response_file();
        write_file(&path, content)?;
        Ok(path)
    }

    /// Render one response. `None` and `null` print "No data returned".
    ///
    /// # Errors
    ///
    /// Returns an error if the writer or the response file cannot be written
    pub fn display_single(&mut self, api_call: &str, output: Option<&Value>) -> AppResult<()> {
        writeln!(self.out, "\n📡 API Call: {api_call}")?;
        writeln!(self.out, "{}", rule('-', 50))?;

        let Some(value) = output.filter(|value| !value.is_null()) else {
            writeln!(self.out, "No data returned")?;
            self.save(&format!(
                "{dashes} {api_call} {dashes}\n{{}}\n{footer}\n",
                dashes = rule('-', 20),
                footer = rule('-', 77)
            ))?;
            return Ok(());
        };

        let formatted = render(value)?;
        writeln!(self.out, "{formatted}")?;
        writeln!(self.out, "{}", rule('-', 77))?;
        self.save(&format!(
            "{dashes} {api_call} {dashes}\n{formatted}\n{footer}\n",
            dashes = rule('-', 20),
            footer = rule('-', 77)
        ))?;
        Ok(())
    }

    /// Render several responses under one heading and save them together
    ///
    /// # Errors
    ///
    /// Returns an error if the writer or the response file cannot be written
    pub fn display_group(
        &mut self,
        group_name: &str,
        responses: &[(String, Value)],
    ) -> AppResult<()> {
        writeln!(self.out, "\n📡 API Group: {group_name}")?;

        let mut parts = Vec::with_capacity(responses.len() + 3);
        parts.push(format!("{eq} {group_name} {eq}", eq = rule('=', 20)));

        for (api_call, output) in responses {
            writeln!(self.out, "\n📋 {api_call}")?;
            writeln!(self.out, "{}", rule('-', 50))?;

            let formatted = if output.is_null() {
                writeln!(self.out, "No data returned")?;
                "{}".to_owned()
            } else {
                let formatted = render(output)?;
                writeln!(self.out, "{formatted}")?;
                formatted
            };

            parts.push(format!(
                "{dashes} {api_call} {dashes}\n{formatted}",
                dashes = rule('-', 20)
            ));
            writeln!(self.out, "{}", rule('-', 50))?;
        }

        parts.push(rule('=', 77));
        parts.push(String::new());
        let path = self.save(&parts.join("\n"))?;

        writeln!(self.out, "\n✅ Grouped responses saved to: {}", path.display())?;
        writeln!(self.out, "{}", rule('=', 77))?;
        Ok(())
    }

    /// Run one call through the guard and display whatever comes back.
    ///
    /// A failure is displayed as `{description} [ERROR]` with an
    /// `{"error": message}` body and yields `(false, None)`. Display errors
    /// are logged and do not change the returned outcome.
    pub async fn call_and_display<F>(
        &mut self,
        guard: &CallGuard,
        method_name: &str,
        description: &str,
        future: F,
    ) -> (bool, Option<Value>)
    where
        F: Future<Output = Result<Value, ConnectFault>> + Send,
        W: Send,
    {
        let result = match guard.run(method_name, future).await {
            CallOutcome::Success(value) => Ok(value),
            CallOutcome::Failure(descriptor) => Err(descriptor.message),
        };
        self.show_result(description, result)
    }

    /// Display the result of a session data call.
    ///
    /// Same layout as [`Self::call_and_display`]; the session has already
    /// checked the connection and classified any failure.
    pub fn display_result(
        &mut self,
        description: &str,
        result: AppResult<Value>,
    ) -> (bool, Option<Value>) {
        self.show_result(description, result.map_err(|e| e.message))
    }

    fn show_result(
        &mut self,
        description: &str,
        result: Result<Value, String>,
    ) -> (bool, Option<Value>) {
        let (shown, body, value) = match result {
            Ok(value) => (description.to_owned(), value.clone(), Some(value)),
            Err(message) => (
                format!("{description} [ERROR]"),
                json!({ "error": message }),
                None,
            ),
        };

        if let Err(e) = self.display_single(&shown, Some(&body)) {
            warn!(call = %description, error = %e, "Failed to display response");
        }
        (value.is_some(), value)
    }
}

fn write_file(path: &Path, content: &str) -> AppResult<()> {
    fs::write(path, content).map_err(|e| {
        AppError::storage(format!("Failed to write {}: {e}", path.display())).with_source(e)
    })
}
