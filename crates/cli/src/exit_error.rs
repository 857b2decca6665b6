// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! An error carrying the process exit code it should produce, so `main`
//! can centralize exit-code handling instead of command handlers calling
//! `std::process::exit` directly.

use std::fmt;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}
