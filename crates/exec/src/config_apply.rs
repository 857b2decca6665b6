// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Configuration Apply (§4.6): `reset` (JSON-pointer deletions, with an
//! empty pointer deleting the whole subtree) runs before `merge` (an
//! arbitrary value tree merged in), both under
//! `services.<name>.configuration`.

use ecd_core::{ConfigurationUpdate, CoreError, CoreResult};
use ecd_storage::ConfigFacade;
use serde_json::{Map, Value};

fn configuration_key(name: &str) -> String {
    format!("services/{name}/configuration")
}

/// Apply a component's `configurationUpdate`: reset runs before merge;
/// either may be absent.
pub fn apply(config: &dyn ConfigFacade, name: &str, update: &ConfigurationUpdate) -> CoreResult<()> {
    apply_reset(config, name, &update.reset)?;
    if let Some(merge) = &update.merge {
        apply_merge(config, name, merge)?;
    }
    Ok(())
}

fn apply_reset(config: &dyn ConfigFacade, name: &str, reset: &[String]) -> CoreResult<()> {
    let key = configuration_key(name);
    for pointer in reset {
        if pointer.is_empty() {
            config.delete(&key)?;
            continue;
        }
        let mut value = config.read(&key)?.unwrap_or_else(|| Value::Object(Map::new()));
        delete_at_pointer(&mut value, pointer)?;
        config.write(&key, value)?;
    }
    Ok(())
}

fn apply_merge(config: &dyn ConfigFacade, name: &str, merge: &Value) -> CoreResult<()> {
    let key = configuration_key(name);
    let mut value = config.read(&key)?.unwrap_or_else(|| Value::Object(Map::new()));
    deep_merge(&mut value, merge);
    config.write(&key, value)?;
    Ok(())
}

/// Delete the value addressed by an RFC-6901 JSON pointer, relative to
/// `root`. A pointer addressing an absent path is a no-op, matching the
/// idempotence law: applying the same reset list twice yields the same
/// tree as applying it once.
fn delete_at_pointer(root: &mut Value, pointer: &str) -> CoreResult<()> {
    let tokens: Vec<String> = pointer
        .strip_prefix('/')
        .ok_or_else(|| CoreError::invalid(format!("malformed JSON pointer: {pointer:?}")))?
        .split('/')
        .map(unescape_token)
        .collect();

    let Some((last, ancestors)) = tokens.split_last() else {
        return Ok(());
    };

    let mut current = root;
    for token in ancestors {
        current = match current {
            Value::Object(map) => match map.get_mut(token) {
                Some(next) => next,
                None => return Ok(()),
            },
            Value::Array(arr) => match token.parse::<usize>().ok().and_then(|i| arr.get_mut(i)) {
                Some(next) => next,
                None => return Ok(()),
            },
            _ => return Ok(()),
        };
    }

    match current {
        Value::Object(map) => {
            map.remove(last);
        }
        Value::Array(arr) => {
            if let Ok(idx) = last.parse::<usize>() {
                if idx < arr.len() {
                    arr.remove(idx);
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn unescape_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

/// Recursively merge `incoming` into `base`: object keys merge
/// key-by-key; any other value (including arrays) replaces the existing
/// value outright.
fn deep_merge(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(incoming_map)) => {
            for (key, value) in incoming_map {
                deep_merge(base_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (base, incoming) => {
            *base = incoming.clone();
        }
    }
}

#[cfg(test)]
#[path = "config_apply_tests.rs"]
mod tests;
