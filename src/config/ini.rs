//! INI Document Parser
//!
//! Parses the `[section]` / `key = value` files used to configure an
//! installation. Each line is parsed independently with nom combinators:
//!
//! ```text
//! ; comment          # comment
//! [Section Name]
//! key = value        key: value
//! ```
//!
//! Names are trimmed and, unless parsed with
//! [`IniDocument::parse_case_sensitive`], matched without regard to case.

use super::ConfigError;
use nom::{
    branch::alt,
    bytes::complete::{take_till, take_till1},
    character::complete::{char, one_of, space0},
    combinator::{all_consuming, map, rest},
    sequence::{delimited, pair, preceded, separated_pair, terminated},
    IResult,
};
use std::collections::HashMap;
use std::str::FromStr;

/// Accepted spellings for `true`
const TRUE_WORDS: [&str; 4] = ["true", "yes", "on", "1"];
/// Accepted spellings for `false`
const FALSE_WORDS: [&str; 4] = ["false", "no", "off", "0"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Comment,
    Section(&'a str),
    Entry(&'a str, &'a str),
}

fn comment(input: &str) -> IResult<&str, Line<'_>> {
    map(pair(one_of(";#"), rest), |_| Line::Comment)(input)
}

fn section(input: &str) -> IResult<&str, Line<'_>> {
    map(
        terminated(delimited(char('['), take_till(|c: char| c == ']'), char(']')), rest),
        |name: &str| Line::Section(name.trim()),
    )(input)
}

fn entry(input: &str) -> IResult<&str, Line<'_>> {
    map(
        separated_pair(take_till1(|c: char| c == '=' || c == ':'), one_of("=:"), rest),
        |(key, value): (&str, &str)| {
            Line::Entry(key.trim(), strip_inline_comment(value).trim())
        },
    )(input)
}

/// Drop a `;` or `#` comment that follows whitespace inside a value
fn strip_inline_comment(value: &str) -> &str {
    value
        .char_indices()
        .find(|&(i, c)| (c == ';' || c == '#') && value[..i].ends_with(char::is_whitespace))
        .map_or(value, |(i, _)| &value[..i])
}

fn line(input: &str) -> IResult<&str, Line<'_>> {
    all_consuming(preceded(space0, alt((comment, section, entry))))(input)
}

/// Parse a boolean the way config files spell it (`yes`, `Off`, `1`, ...)
pub fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if TRUE_WORDS.iter().any(|w| value.eq_ignore_ascii_case(w)) {
        Some(true)
    } else if FALSE_WORDS.iter().any(|w| value.eq_ignore_ascii_case(w)) {
        Some(false)
    } else {
        None
    }
}

/// Parsed INI file
#[derive(Debug, Clone, Default)]
pub struct IniDocument {
    sections: HashMap<String, HashMap<String, String>>,
    case_sensitive: bool,
}

impl IniDocument {
    /// Parse with case-insensitive section and key names
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Self::parse_with(text, false)
    }

    /// Parse keeping section and key names exactly as written
    pub fn parse_case_sensitive(text: &str) -> Result<Self, ConfigError> {
        Self::parse_with(text, true)
    }

    fn parse_with(text: &str, case_sensitive: bool) -> Result<Self, ConfigError> {
        let mut doc = IniDocument {
            sections: HashMap::new(),
            case_sensitive,
        };
        let mut current: Option<String> = None;

        for (index, raw) in text.trim_start_matches('\u{feff}').lines().enumerate() {
            let number = index + 1;
            if raw.trim().is_empty() {
                continue;
            }

            let syntax_error = || ConfigError::Syntax {
                line: number,
                content: raw.trim().to_string(),
            };
            let (_, parsed) = line(raw).map_err(|_| syntax_error())?;

            match parsed {
                Line::Comment => {}
                Line::Section(name) => {
                    if name.is_empty() {
                        return Err(syntax_error());
                    }
                    let name = doc.fold(name);
                    doc.sections.entry(name.clone()).or_default();
                    current = Some(name);
                }
                Line::Entry(key, value) => {
                    let section = current
                        .as_ref()
                        .ok_or(ConfigError::EntryOutsideSection { line: number })?;
                    let key = doc.fold(key);
                    // Later duplicates win
                    doc.sections
                        .entry(section.clone())
                        .or_default()
                        .insert(key, value.to_string());
                }
            }
        }

        Ok(doc)
    }

    fn fold(&self, name: &str) -> String {
        if self.case_sensitive {
            name.to_string()
        } else {
            name.to_lowercase()
        }
    }

    /// Whether the document has a `[section]` header with this name
    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(&self.fold(section))
    }

    /// Raw value of `key` in `section`
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(&self.fold(section))?
            .get(&self.fold(key))
            .map(String::as_str)
    }

    /// Raw value of `key` in `section`, or an error naming what is missing
    pub fn require(&self, section: &str, key: &str) -> Result<&str, ConfigError> {
        if !self.has_section(section) {
            return Err(ConfigError::MissingSection {
                section: section.to_string(),
            });
        }
        self.get(section, key).ok_or_else(|| ConfigError::MissingKey {
            section: section.to_string(),
            key: key.to_string(),
        })
    }

    /// Optional boolean value
    pub fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, ConfigError> {
        self.get(section, key)
            .map(|value| {
                parse_bool(value).ok_or_else(|| invalid(section, key, value, "a boolean"))
            })
            .transpose()
    }

    /// Required boolean value
    pub fn require_bool(&self, section: &str, key: &str) -> Result<bool, ConfigError> {
        let value = self.require(section, key)?;
        parse_bool(value).ok_or_else(|| invalid(section, key, value, "a boolean"))
    }

    /// Optional numeric value
    pub fn get_number<T: FromStr>(
        &self,
        section: &str,
        key: &str,
    ) -> Result<Option<T>, ConfigError> {
        self.get(section, key)
            .map(|value| parse_number(section, key, value))
            .transpose()
    }

    /// Required numeric value
    pub fn require_number<T: FromStr>(&self, section: &str, key: &str) -> Result<T, ConfigError> {
        let value = self.require(section, key)?;
        parse_number(section, key, value)
    }
}

fn parse_number<T: FromStr>(section: &str, key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .parse::<T>()
        .map_err(|_| invalid(section, key, value, std::any::type_name::<T>()))
}

fn invalid(section: &str, key: &str, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        expected,
    }
}
