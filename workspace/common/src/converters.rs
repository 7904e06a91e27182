//! Serde helpers for values that arrive from HTML forms as strings.
//!
//! The job board frontend posts `minStudents`, `maxStudents` and graduation
//! years either as JSON numbers or as the raw text of an `<input>`. These
//! helpers accept both and reject anything that is not an integer.

use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Int(i64),
    Str(String),
}

impl IntOrString {
    fn into_i32<E: de::Error>(self) -> Result<i32, E> {
        match self {
            IntOrString::Int(value) => i32::try_from(value)
                .map_err(|_| E::custom(format!("integer out of range: {}", value))),
            IntOrString::Str(text) => text
                .trim()
                .parse::<i32>()
                .map_err(|_| E::custom(format!("expected an integer, got '{}'", text))),
        }
    }
}

/// Deserialize a required integer given as a number or a numeric string.
pub fn int_or_string<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    IntOrString::deserialize(deserializer)?.into_i32()
}

/// Deserialize an optional integer given as a number or a numeric string.
///
/// Use together with `#[serde(default)]` so an absent field stays `None`.
pub fn option_int_or_string<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<IntOrString>::deserialize(deserializer)?
        .map(IntOrString::into_i32)
        .transpose()
}

/// Deserialize an identifier that may arrive as a number or as text, keeping it as text.
///
/// Student numbers are identifiers, so `"0042"` stays `"0042"`.
pub fn string_or_int<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(value) => Ok(value.to_string()),
        IntOrString::Str(text) => Ok(text),
    }
}

/// Optional variant of [`string_or_int`]; pair with `#[serde(default)]`.
pub fn option_string_or_int<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<IntOrString>::deserialize(deserializer)?.map(|value| match value {
        IntOrString::Int(value) => value.to_string(),
        IntOrString::Str(text) => text,
    }))
}

/// Parse a form field into an integer, reporting the field name on failure.
pub fn parse_form_int(field: &str, raw: &str) -> Result<i32, String> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| format!("Field '{}' must be an integer", field))
}

/// Display name used wherever an applicant is shown to an employer.
pub fn display_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name, last_name).trim().to_string()
}
