// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Component recipe documents: the declarative description of a component's
//! dependencies, artifacts, and default configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult};

/// A parsed component recipe.
///
/// Recipes arrive as YAML or JSON on disk; both deserialize into this same
/// structure since the two are structurally compatible for the fields this
/// daemon cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecipe {
    #[serde(rename = "ComponentName")]
    pub component_name: String,

    #[serde(rename = "ComponentVersion", default)]
    pub component_version: Option<String>,

    #[serde(rename = "ComponentConfiguration", default)]
    pub component_configuration: ComponentConfiguration,

    #[serde(rename = "ComponentDependencies", default)]
    pub component_dependencies: BTreeMap<String, DependencyProperties>,

    #[serde(rename = "Manifests", default)]
    pub manifests: Vec<Manifest>,
}

impl ComponentRecipe {
    /// Parse a recipe document, dispatching on the extension the file was
    /// loaded with (`yaml`/`yml` vs `json`); both are accepted for either
    /// extension since `serde_yaml` parses JSON as a degenerate case of
    /// YAML, but a caller should still use the recipe's real extension for
    /// error messages.
    pub fn parse(contents: &str, ext: &str) -> CoreResult<Self> {
        match ext {
            "json" => serde_json::from_str(contents)
                .map_err(|e| CoreError::parse(format!("invalid recipe JSON: {e}"))),
            "yaml" | "yml" => serde_yaml::from_str(contents)
                .map_err(|e| CoreError::parse(format!("invalid recipe YAML: {e}"))),
            other => Err(CoreError::unsupported(format!("recipe extension {other:?}"))),
        }
    }

    /// Select the manifest applicable to this platform.
    ///
    /// Greengrass-style platform selection (OS/architecture matching) is out
    /// of scope for the core's test surface; the daemon's nucleus is always
    /// `linux`, so the first manifest whose platform (if any) names `linux`
    /// or omits a platform entirely is selected.
    pub fn select_manifest(&self) -> Option<&Manifest> {
        self.manifests
            .iter()
            .find(|m| m.platform.as_deref().map(|os| os == "linux" || os == "all").unwrap_or(true))
            .or_else(|| self.manifests.first())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentConfiguration {
    #[serde(rename = "DefaultConfiguration", default)]
    pub default_configuration: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyProperties {
    #[serde(rename = "VersionRequirement")]
    pub version_requirement: String,
    #[serde(rename = "DependencyType", default)]
    pub dependency_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(rename = "Artifacts", default)]
    pub artifacts: Vec<ArtifactSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactSpec {
    #[serde(rename = "Uri")]
    pub uri: String,
    #[serde(rename = "Unarchive", default)]
    pub unarchive: Option<String>,
    #[serde(rename = "Digest", default)]
    pub digest: Option<String>,
    #[serde(rename = "Algorithm", default)]
    pub algorithm: Option<String>,
}

impl ArtifactSpec {
    pub fn requires_unarchive(&self) -> bool {
        matches!(self.unarchive.as_deref(), Some("ZIP") | Some("zip"))
    }

    pub fn parsed_uri(&self) -> CoreResult<ArtifactUri> {
        ArtifactUri::parse(&self.uri)
    }
}

/// The scheme-dispatched parts of an artifact URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactUri {
    S3 { host: String, path: String, file: String },
    Greengrass { host: String, path: String, file: String },
    Docker { registry: String, repo: String, tag: String, digest: Option<String> },
}

impl ArtifactUri {
    pub fn parse(uri: &str) -> CoreResult<Self> {
        if let Some(rest) = uri.strip_prefix("s3://") {
            let (host, path) = split_host_path(rest)?;
            let file = file_component(&path);
            return Ok(Self::S3 { host, path, file });
        }
        if let Some(rest) = uri.strip_prefix("greengrass://") {
            let (host, path) = split_host_path(rest)?;
            let file = file_component(&path);
            return Ok(Self::Greengrass { host, path, file });
        }
        if let Some(rest) = uri.strip_prefix("docker://") {
            return parse_docker_uri(rest);
        }
        Err(CoreError::unsupported(format!("artifact URI scheme: {uri:?}")))
    }
}

fn split_host_path(rest: &str) -> CoreResult<(String, String)> {
    match rest.split_once('/') {
        Some((host, path)) if !host.is_empty() && !path.is_empty() => {
            Ok((host.to_string(), path.to_string()))
        }
        _ => Err(CoreError::invalid(format!("malformed artifact URI path: {rest:?}"))),
    }
}

fn file_component(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}

/// Parse `registry/repo:tag@digest` or `registry/repo:tag` (digest optional).
fn parse_docker_uri(rest: &str) -> CoreResult<ArtifactUri> {
    let (repo_part, digest) = match rest.split_once('@') {
        Some((repo_part, digest)) => (repo_part, Some(digest.to_string())),
        None => (rest, None),
    };

    let (registry, repo_and_tag) = repo_part
        .split_once('/')
        .ok_or_else(|| CoreError::invalid(format!("malformed docker URI: {rest:?}")))?;

    let (repo, tag) = match repo_and_tag.rsplit_once(':') {
        Some((repo, tag)) => (repo.to_string(), tag.to_string()),
        None => (repo_and_tag.to_string(), String::new()),
    };

    Ok(ArtifactUri::Docker { registry: registry.to_string(), repo, tag, digest })
}

#[cfg(test)]
#[path = "recipe_tests.rs"]
mod tests;
