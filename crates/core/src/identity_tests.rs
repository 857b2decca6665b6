// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

use super::*;

#[test]
fn recipe_file_stem_joins_name_and_version() {
    let id = ComponentIdentity::new("foo", "1.0.0");
    assert_eq!(id.recipe_file_stem(), "foo-1.0.0");
}

#[test]
fn from_recipe_stem_splits_at_first_dash() {
    let id = ComponentIdentity::from_recipe_stem("foo-1.0.0").unwrap();
    assert_eq!(id.name, "foo");
    assert_eq!(id.version, "1.0.0");
}

#[test]
fn from_recipe_stem_with_hyphenated_name_keeps_rest_as_version() {
    let id = ComponentIdentity::from_recipe_stem("com.example.foo-1.0.0-beta").unwrap();
    assert_eq!(id.name, "com.example.foo");
    assert_eq!(id.version, "1.0.0-beta");
}

#[test]
fn from_recipe_stem_without_dash_is_none() {
    assert!(ComponentIdentity::from_recipe_stem("foo").is_none());
}

#[yare::parameterized(
    yaml = { "foo-1.0.0.yaml" },
    yml  = { "foo-1.0.0.yml" },
    json = { "foo-1.0.0.json" },
)]
fn from_recipe_filename_accepts_known_extensions(file_name: &str) {
    assert!(ComponentIdentity::from_recipe_filename(file_name).is_some());
}

#[test]
fn from_recipe_filename_rejects_unknown_extension() {
    assert!(ComponentIdentity::from_recipe_filename("foo-1.0.0.txt").is_none());
}

#[test]
fn display_uses_at_separator() {
    let id = ComponentIdentity::new("foo", "1.0.0");
    assert_eq!(id.to_string(), "foo@1.0.0");
}
