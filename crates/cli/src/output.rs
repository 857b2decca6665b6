// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Output formatting shared by every command: `--format text` (the
//! default, human-readable) or `--format json` (machine-readable,
//! pretty-printed).

use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
