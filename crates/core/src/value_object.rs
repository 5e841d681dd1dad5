//! Value object trait: equality by value, not identity.
//!
//! Contact details (email, phone, website) are modelled as value objects that
//! can only be constructed from input that passed format validation, so code
//! holding one never needs to re-check it.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"));

static WEBSITE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?([A-Za-z0-9-]+\.)+[A-Za-z]{2,}(:[0-9]{1,5})?(/\S*)?$")
        .expect("valid website regex")
});

/// An email address in `local@domain.tld` shape, stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let value = raw.trim().to_lowercase();
        if !EMAIL_RE.is_match(&value) {
            return Err(DomainError::validation("invalid email format"));
        }
        Ok(Self(value))
    }

    pub fn is_valid(raw: &str) -> bool {
        EMAIL_RE.is_match(raw.trim())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A phone number made of exactly ten digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let value = raw.trim();
        if !PHONE_RE.is_match(value) {
            return Err(DomainError::validation("phone number must be exactly 10 digits"));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A website URL; the scheme is optional.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Website(String);

impl Website {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let value = raw.trim();
        if !WEBSITE_RE.is_match(value) {
            return Err(DomainError::validation("invalid website URL"));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! impl_string_value_object {
    ($t:ty) => {
        impl ValueObject for $t {}

        impl TryFrom<String> for $t {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

impl_string_value_object!(Email);
impl_string_value_object!(PhoneNumber);
impl_string_value_object!(Website);
