//! String parameter maps (`--extra-<key> <value>`) and their typed readers.

use crate::error::OptionError;
use std::collections::HashMap;

/// Loose key/value options handed to registry constructors
pub type Params = HashMap<String, String>;

/// Read a boolean parameter, accepting the usual spellings
pub fn param_bool(params: &Params, key: &str, default: bool) -> Result<bool, OptionError> {
    match params.get(key) {
        None => Ok(default),
        Some(raw) => match raw.to_lowercase().as_str() {
            "true" | "1" | "yes" | "y" | "on" => Ok(true),
            "false" | "0" | "no" | "n" | "off" => Ok(false),
            _ => Err(OptionError::invalid(key, raw, "a boolean")),
        },
    }
}

pub fn param_int(params: &Params, key: &str, default: i64) -> Result<i64, OptionError> {
    match params.get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| OptionError::invalid(key, raw, "an integer")),
    }
}

pub fn param_level(params: &Params, key: &str, default: u8) -> Result<u8, OptionError> {
    match params.get(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u8>() {
            Ok(level) if (1..=6).contains(&level) => Ok(level),
            _ => Err(OptionError::invalid(key, raw, "a heading level between 1 and 6")),
        },
    }
}

pub fn param_string(params: &Params, key: &str, default: &str) -> String {
    params
        .get(key)
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

/// Comma-separated list parameter
pub fn param_list(params: &Params, key: &str, default: &[&str]) -> Vec<String> {
    match params.get(key) {
        None => default.iter().map(|s| s.to_string()).collect(),
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

pub fn param_char(params: &Params, key: &str, default: char) -> Result<char, OptionError> {
    match params.get(key) {
        None => Ok(default),
        Some(raw) => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(OptionError::invalid(key, raw, "a single character")),
            }
        }
    }
}
