// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Service-unit filename conventions (§6): `<prefix>.<name>.service`,
//! `<prefix>.<name>.install.service`, `<prefix>.<name>.bootstrap.service`,
//! plus the translator's side files `<prefix>.<name>.script.install.json`
//! and `<prefix>.<name>.script.run`.
//!
//! The `ggl.` unit prefix matches `disable_and_unlink_service` in the
//! original `stale_component.c`, which builds unit names as
//! `ggl.<component>[.install|.bootstrap].service`.

pub const UNIT_PREFIX: &str = "ggl";

pub fn run_unit(name: &str) -> String {
    format!("{UNIT_PREFIX}.{name}.service")
}

pub fn install_unit(name: &str) -> String {
    format!("{UNIT_PREFIX}.{name}.install.service")
}

pub fn bootstrap_unit(name: &str) -> String {
    format!("{UNIT_PREFIX}.{name}.bootstrap.service")
}

pub fn script_install_file(name: &str) -> String {
    format!("{UNIT_PREFIX}.{name}.script.install.json")
}

pub fn script_run_file(name: &str) -> String {
    format!("{UNIT_PREFIX}.{name}.script.run")
}

/// Every on-disk filename associated with `name`'s units, for stale
/// cleanup's cascading deletion.
pub fn all_unit_files(name: &str) -> [String; 5] {
    [
        run_unit(name),
        install_unit(name),
        bootstrap_unit(name),
        script_install_file(name),
        script_run_file(name),
    ]
}

#[cfg(test)]
#[path = "units_tests.rs"]
mod tests;
