//! Tel URNs: country-scoped phone number identities (`tel:+256711223344`).
//!
//! Inbound numbers are validated strictly against the channel's country; outbound URNs
//! come from the host already normalized, so [`Urn::parse`] only checks their shape.

use serde::{Deserialize, Serialize};
use std::fmt;

const TEL_SCHEME: &str = "tel";
/// Punctuation people write inside numbers; anything else that is not a digit is rejected.
const SEPARATORS: &[char] = &['-', '(', ')', '.', '/'];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrnError {
    #[error("unknown country code '{0}'")]
    UnknownCountry(String),
    #[error("'{number}' is not a valid phone number for country {country}")]
    InvalidNumber { number: String, country: String },
    #[error("invalid tel URN '{0}'")]
    Malformed(String),
}

/// A tel URN whose path is an E.164 number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Urn {
    path: String,
}

impl Urn {
    /// Strictly parse `number` as a phone number of `country` (ISO 3166 alpha-2, e.g. "UG").
    /// Local forms ("0711223344") and international forms ("+256711223344") are both accepted,
    /// as long as the result is a valid number for that country's numbering plan.
    pub fn tel_for_country(number: &str, country: &str) -> Result<Self, UrnError> {
        let country = country.trim().to_uppercase();
        let id: phonenumber::country::Id = country
            .parse()
            .map_err(|_| UrnError::UnknownCountry(country.clone()))?;
        let invalid = || UrnError::InvalidNumber {
            number: number.to_string(),
            country: country.clone(),
        };
        let mut cleaned = String::with_capacity(number.len());
        for c in number.chars() {
            match c {
                '0'..='9' => cleaned.push(c),
                '+' if cleaned.is_empty() => cleaned.push(c),
                c if c.is_whitespace() || SEPARATORS.contains(&c) => {}
                _ => return Err(invalid()),
            }
        }
        if cleaned.trim_start_matches('+').is_empty() {
            return Err(invalid());
        }
        let parsed = phonenumber::parse(Some(id), &cleaned).map_err(|_| invalid())?;
        if !phonenumber::is_valid(&parsed) {
            return Err(invalid());
        }
        let path = parsed
            .format()
            .mode(phonenumber::Mode::E164)
            .to_string();
        Ok(Self { path })
    }

    /// Parse a `tel:+<digits>` URN (or a bare `+<digits>` path).
    pub fn parse(s: &str) -> Result<Self, UrnError> {
        let s = s.trim();
        let path = match s.split_once(':') {
            Some((scheme, path)) if scheme.eq_ignore_ascii_case(TEL_SCHEME) => path,
            Some(_) => return Err(UrnError::Malformed(s.to_string())),
            None => s,
        };
        let digits = path.strip_prefix('+').unwrap_or(path);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(UrnError::Malformed(s.to_string()));
        }
        Ok(Self {
            path: format!("+{}", digits),
        })
    }

    /// E.164 number, e.g. "+256711223344".
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", TEL_SCHEME, self.path)
    }
}

impl TryFrom<String> for Urn {
    type Error = UrnError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Urn::parse(&value)
    }
}

impl From<Urn> for String {
    fn from(urn: Urn) -> Self {
        urn.to_string()
    }
}
