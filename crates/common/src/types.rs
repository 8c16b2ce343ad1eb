use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Characters that may not appear in an identity or info field
pub const ILLEGAL_FIELD_CHARS: &[char] = &['\n', '\r', ':'];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PortError {
    #[error("port is empty")]
    Empty,
    #[error("port contains a non-digit character: {0:?}")]
    NotNumeric(String),
    #[error("port out of range: {0}")]
    OutOfRange(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("field is empty")]
    Empty,
    #[error("illegal character {found:?} in {value:?}")]
    IllegalCharacter { value: String, found: char },
}

/// A TCP port number in (0, 65535]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    pub fn new(value: u16) -> Result<Self, PortError> {
        if value == 0 {
            return Err(PortError::OutOfRange(value.to_string()));
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> u16 {
        port.0
    }
}

impl FromStr for Port {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PortError::Empty);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PortError::NotNumeric(s.to_string()));
        }

        // Digits only, so the only parse failure left is overflow
        let value: u16 = s
            .parse()
            .map_err(|_| PortError::OutOfRange(s.to_string()))?;
        Self::new(value).map_err(|_| PortError::OutOfRange(s.to_string()))
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A port number as it appeared on the wire
///
/// The original text is kept so that an address registered as `007` is
/// handed back as `007`, while connecting uses the numeric port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    text: String,
    port: Port,
}

impl Address {
    pub fn port(&self) -> Port {
        self.port
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl FromStr for Address {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let port = s.parse()?;
        Ok(Self {
            text: s.to_string(),
            port,
        })
    }
}

impl From<Port> for Address {
    fn from(port: Port) -> Self {
        Self {
            text: port.to_string(),
            port,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A stop on an itinerary: either already an address or a name the
/// registry has to resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Address(Address),
    Name(String),
}

impl Destination {
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<Address>() {
            Ok(address) => Self::Address(address),
            Err(_) => Self::Name(raw.to_string()),
        }
    }

    pub fn needs_resolution(&self) -> bool {
        matches!(self, Self::Name(_))
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(address) => write!(f, "{}", address),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Reject identity/info strings that would break the line protocol
pub fn validate_field(value: &str) -> Result<&str, FieldError> {
    match value.chars().find(|c| ILLEGAL_FIELD_CHARS.contains(c)) {
        Some(found) => Err(FieldError::IllegalCharacter {
            value: value.to_string(),
            found,
        }),
        None => Ok(value),
    }
}

/// Reject names the registry would not accept in an add
///
/// Stricter than [`validate_field`]: the name must be non-empty and free of
/// every control character, not only line breaks.
pub fn validate_name(value: &str) -> Result<&str, FieldError> {
    if value.is_empty() {
        return Err(FieldError::Empty);
    }
    if let Some(found) = value.chars().find(|c| c.is_control()) {
        return Err(FieldError::IllegalCharacter {
            value: value.to_string(),
            found,
        });
    }
    validate_field(value)
}
