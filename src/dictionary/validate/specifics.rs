//! `specifics` validator: a URL-encoded bag of typed presentation parameters.
//!
//! Repeated keys are allowed (`bonus` is repeated once per answer). Unknown
//! keys pass through unchanged.

use std::fmt;

use url::form_urlencoded;

use super::number::{self, NumberKind};
use super::Correction;
use crate::dictionary::types::diagnostics::Diagnostic;

/// The declared value kind of a recognized key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Present without a value.
    Flag,
    PositiveReal,
    NonNegativeReal,
    PositiveInteger,
    Integer,
}

/// Recognized keys and their kinds.
pub const KEYS: &[(&str, ValueKind)] = &[
    ("require-all-right", ValueKind::Flag),
    ("no-random", ValueKind::Flag),
    ("pixelization", ValueKind::Flag),
    ("magnification", ValueKind::PositiveReal),
    ("last-magnification", ValueKind::PositiveReal),
    ("start", ValueKind::NonNegativeReal),
    ("repeat", ValueKind::PositiveInteger),
    ("length", ValueKind::PositiveReal),
    ("speed", ValueKind::PositiveReal),
    ("score", ValueKind::PositiveInteger),
    ("last-score", ValueKind::PositiveInteger),
    ("bonus", ValueKind::Integer),
];

/// `(dependent, prerequisite)` pairs.
pub const DEPENDENCIES: &[(&str, &str)] = &[
    ("last-magnification", "magnification"),
    ("last-score", "score"),
];

pub fn kind_of(key: &str) -> Option<ValueKind> {
    KEYS.iter().find(|(k, _)| *k == key).map(|(_, kind)| *kind)
}

/// An ordered, repeatable key/value parameter bag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Specifics {
    params: Vec<(String, String)>,
}

impl Specifics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an `application/x-www-form-urlencoded` string without validating it.
    pub fn parse(query: &str) -> Self {
        let params = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .filter(|(k, _)| !k.is_empty())
            .collect();
        Self { params }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.params
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.params.iter().any(|(k, _)| k == key)
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.push((key.into(), value.into()));
    }

    pub fn remove(&mut self, key: &str) {
        self.params.retain(|(k, _)| k != key);
    }

    /// `bonus` values in answer order; an unparsable one counts as zero.
    pub fn bonuses(&self) -> Vec<i64> {
        self.get_all("bonus").map(|b| b.parse().unwrap_or(0)).collect()
    }

    /// Replaces every `bonus`. Trailing zeros are not written.
    pub fn set_bonuses(&mut self, bonuses: &[i64]) {
        self.remove("bonus");
        let len = bonuses.iter().rposition(|b| *b != 0).map_or(0, |last| last + 1);
        for bonus in &bonuses[..len] {
            self.push("bonus", bonus.to_string());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Renders the bag; flags and other empty values are written as a bare key.
    pub fn to_query(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| {
                let key: String = form_urlencoded::byte_serialize(k.as_bytes()).collect();
                if v.is_empty() {
                    key
                } else {
                    let value: String = form_urlencoded::byte_serialize(v.as_bytes()).collect();
                    format!("{}={}", key, value)
                }
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for Specifics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}

fn check_value(key: &str, value: &str, kind: ValueKind) -> Result<String, Diagnostic> {
    let reject = |reason: &str| {
        Diagnostic::error(format!(
            "specifics: `{}={}` dropped, the value must be {}",
            key, value, reason
        ))
    };
    let number = |number_kind: NumberKind| {
        if value.is_empty() {
            return None;
        }
        number::parse_lenient(value).map(|n| (n, number::render(n, number_kind)))
    };

    match kind {
        ValueKind::Flag if value.is_empty() => Ok(String::new()),
        ValueKind::Flag => Err(reject("empty")),
        ValueKind::PositiveReal => match number(NumberKind::Real) {
            Some((n, rendered)) if n > 0.0 && rendered != "0" => Ok(rendered),
            _ => Err(reject("a positive real number")),
        },
        ValueKind::NonNegativeReal => match number(NumberKind::Real) {
            Some((n, rendered)) if n >= 0.0 => Ok(rendered),
            _ => Err(reject("a non-negative real number")),
        },
        ValueKind::PositiveInteger => match number(NumberKind::Integer) {
            Some((n, rendered)) if n.fract() == 0.0 && n >= 1.0 => Ok(rendered),
            _ => Err(reject("a positive integer")),
        },
        ValueKind::Integer => match number(NumberKind::Integer) {
            Some((n, rendered)) if n.fract() == 0.0 => Ok(rendered),
            _ => Err(reject("an integer")),
        },
    }
}

/// Validates every recognized key against its kind, then enforces key dependencies.
pub fn validate(specifics: &Specifics) -> (Specifics, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let mut kept = Specifics::new();

    for (key, value) in specifics.iter() {
        match kind_of(key) {
            Some(kind) => match check_value(key, value, kind) {
                Ok(checked) => kept.push(key, checked),
                Err(diagnostic) => diagnostics.push(diagnostic),
            },
            None => kept.push(key, value),
        }
    }

    for (dependent, prerequisite) in DEPENDENCIES {
        if kept.contains(dependent) && !kept.contains(prerequisite) {
            diagnostics.push(Diagnostic::error(format!(
                "specifics: `{}` requires `{}`; it was dropped",
                dependent, prerequisite
            )));
            kept.remove(dependent);
        }
    }

    (kept, diagnostics)
}

/// Validates a raw `specifics` field value.
pub fn correct(value: &str) -> Correction {
    let (kept, diagnostics) = validate(&Specifics::parse(value));
    Correction {
        value: kept.to_query(),
        diagnostics,
    }
}
