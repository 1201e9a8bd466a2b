//! Keyword based urgency detection. The verdict picks the sampling
//! temperature: urgent questions get a low temperature for short and
//! factual answers, everything else gets a high one for a friendlier
//! tone.

use std::fmt;
use std::ops::RangeInclusive;

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::core::ConfigError;

pub const URGENT_BAND: RangeInclusive<f64> = 0.0..=0.2;
pub const CASUAL_BAND: RangeInclusive<f64> = 0.7..=0.9;

pub const DEFAULT_URGENT_TEMPERATURE: f64 = 0.1;
pub const DEFAULT_CASUAL_TEMPERATURE: f64 = 0.9;

pub const DEFAULT_MARKERS: &[&str] = &[
    "urgent",
    "urgently",
    "immediately",
    "immediate",
    "asap",
    "a.s.a.p",
    "right now",
    "help!",
    "help me",
    "emergency",
    "critical",
    "broken",
    "not working",
    "problem",
    "issue",
];

/// Minimum run of consecutive `!` that marks a message as urgent.
pub const DEFAULT_EXCLAMATION_RUN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Urgency {
    Urgent,
    Casual,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Urgency::Urgent => write!(f, "URGENT"),
            Urgency::Casual => write!(f, "CASUAL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UrgencyVerdict {
    pub category: Urgency,
    pub temperature: f64,
}

#[derive(Debug, Clone)]
pub struct UrgencyClassifier {
    // None when the marker set is empty
    pattern: Option<Regex>,
    urgent_temperature: f64,
    casual_temperature: f64,
}

impl Default for UrgencyClassifier {
    fn default() -> Self {
        Self::new(
            DEFAULT_MARKERS,
            DEFAULT_EXCLAMATION_RUN,
            DEFAULT_URGENT_TEMPERATURE,
            DEFAULT_CASUAL_TEMPERATURE,
        )
        .expect("Default urgency markers are valid")
    }
}

impl UrgencyClassifier {
    /// Builds a classifier from a marker set. Markers are matched
    /// case-insensitively; a marker that starts or ends with a word
    /// character only matches on a word boundary at that end so
    /// "issue" does not fire on "tissue".
    pub fn new(
        markers: &[&str],
        exclamation_run: usize,
        urgent_temperature: f64,
        casual_temperature: f64,
    ) -> Result<Self, ConfigError> {
        if !URGENT_BAND.contains(&urgent_temperature) {
            return Err(ConfigError::InvalidValue {
                key: "urgent_temperature".to_string(),
                value: urgent_temperature.to_string(),
            });
        }
        if !CASUAL_BAND.contains(&casual_temperature) {
            return Err(ConfigError::InvalidValue {
                key: "casual_temperature".to_string(),
                value: casual_temperature.to_string(),
            });
        }

        let mut alternatives: Vec<String> = markers
            .iter()
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
            .map(marker_pattern)
            .collect();
        if exclamation_run > 0 {
            alternatives.push(format!("!{{{},}}", exclamation_run));
        }
        let pattern = if alternatives.is_empty() {
            None
        } else {
            let regex = RegexBuilder::new(&alternatives.join("|"))
                .case_insensitive(true)
                .build()
                .map_err(|e| ConfigError::InvalidValue {
                    key: "urgency_markers".to_string(),
                    value: e.to_string(),
                })?;
            Some(regex)
        };

        Ok(Self {
            pattern,
            urgent_temperature,
            casual_temperature,
        })
    }

    pub fn classify(&self, text: &str) -> UrgencyVerdict {
        let is_urgent = self.pattern.as_ref().is_some_and(|p| p.is_match(text));
        if is_urgent {
            UrgencyVerdict {
                category: Urgency::Urgent,
                temperature: self.urgent_temperature,
            }
        } else {
            UrgencyVerdict {
                category: Urgency::Casual,
                temperature: self.casual_temperature,
            }
        }
    }
}

fn marker_pattern(marker: &str) -> String {
    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let mut out = String::new();
    if is_word(marker.chars().next()) {
        out.push_str(r"\b");
    }
    out.push_str(&regex::escape(marker));
    if is_word(marker.chars().last()) {
        out.push_str(r"\b");
    }
    out
}
