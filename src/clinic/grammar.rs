//! # Prefix Grammar
//!
//! Field-based commands carry their arguments as prefixed tokens inside one line:
//!
//! ```text
//! add-patient n/John Doe ic/S1234567A dob/1990-01-01 g/M p/81234567 a/123 Main St
//! ```
//!
//! Each command declares a [`Grammar`]: its usage string and an ordered list of
//! [`Field`]s, each a token plus whether it is required. A single scanning function
//! ([`Grammar::scan`]) extracts every field.
//!
//! ## Scanning rules
//!
//! - A token only counts at the start of the input or right after whitespace, so
//!   `url/x` inside free text does not start an `l/`-style field.
//! - Tokens match ASCII case-insensitively (`IC/` == `ic/`).
//! - A value runs until the nearest valid occurrence of any *other* known token
//!   ([`TOKENS`], not just the command's own), or the end of the input.
//! - The first valid occurrence of a token wins.
//! - Values are trimmed; an empty value is the same as an absent field.

use crate::error::{ClinicError, Result};
use std::collections::HashMap;

/// Every token the parser recognises, across all commands.
pub const TOKENS: &[&str] = &[
    "n/", "ic/", "dob/", "g/", "p/", "a/", "dt/", "t/", "dsc/", "h/", "old/", "new/", "s/", "m/",
    "nt/",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub token: &'static str,
    pub required: bool,
}

pub const fn required(token: &'static str) -> Field {
    Field {
        token,
        required: true,
    }
}

pub const fn optional(token: &'static str) -> Field {
    Field {
        token,
        required: false,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Grammar {
    pub usage: &'static str,
    pub fields: &'static [Field],
}

/// Values extracted by [`Grammar::scan`], keyed by token.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Fields {
    values: HashMap<&'static str, String>,
}

impl Fields {
    pub fn get(&self, token: &str) -> Option<&str> {
        self.values.get(token).map(String::as_str)
    }

    /// Takes a field the grammar marked as required.
    ///
    /// `scan` already rejected inputs missing it, so absence here is a grammar bug and is
    /// reported as an input error rather than a panic.
    pub fn take(&mut self, token: &str) -> Result<String> {
        self.values
            .remove(token)
            .ok_or_else(|| ClinicError::usage(format!("Missing field {}", token)))
    }

    pub fn take_opt(&mut self, token: &str) -> Option<String> {
        self.values.remove(token)
    }
}

impl Grammar {
    pub const fn new(usage: &'static str, fields: &'static [Field]) -> Self {
        Self { usage, fields }
    }

    pub fn scan(&self, input: &str) -> Result<Fields> {
        let mut values = HashMap::new();
        for field in self.fields {
            match extract_value(input, field.token) {
                Some(value) => {
                    if value.contains('|') {
                        return Err(ClinicError::usage(format!(
                            "Values cannot contain '|' ({}{})",
                            field.token, value
                        )));
                    }
                    values.insert(field.token, value);
                }
                None if field.required => {
                    return Err(ClinicError::usage(self.usage));
                }
                None => {}
            }
        }
        Ok(Fields { values })
    }
}

/// Returns the value following `token`, or `None` if the token is absent or its value is blank.
pub fn extract_value(input: &str, token: &str) -> Option<String> {
    let start = find_token(input, token, 0)? + token.len();

    let end = TOKENS
        .iter()
        .filter(|other| !other.eq_ignore_ascii_case(token))
        .filter_map(|other| find_token(input, other, start))
        .min()
        .unwrap_or(input.len());

    let value = input[start..end].trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Byte offset of the first valid occurrence of `token` at or after `from`.
fn find_token(input: &str, token: &str, from: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    let needle = token.as_bytes();
    if needle.is_empty() || bytes.len() < needle.len() {
        return None;
    }

    (from..=bytes.len() - needle.len()).find(|&i| {
        bytes[i..i + needle.len()].eq_ignore_ascii_case(needle) && at_boundary(input, i)
    })
}

// Tokens are ASCII, so any matching offset is a char boundary.
fn at_boundary(input: &str, i: usize) -> bool {
    input[..i]
        .chars()
        .next_back()
        .map_or(true, char::is_whitespace)
}
