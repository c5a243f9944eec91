//! Column values carried by rows and HKey segments.
//!
//! The type-conversion subsystem lives elsewhere; this is only the small,
//! totally ordered value surface the execution core needs to key rows.

mod ordered;


use std::fmt::{self, Display};

pub use ordered::OrderedValueEncodeError;
pub(crate) use ordered::encode_ordered_value;

///
/// Value
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub(crate) const fn tag(&self) -> ValueTag {
        match self {
            Self::Null => ValueTag::Null,
            Self::Bool(_) => ValueTag::Bool,
            Self::Int(_) => ValueTag::Int,
            Self::Uint(_) => ValueTag::Uint,
            Self::Text(_) => ValueTag::Text,
            Self::Blob(_) => ValueTag::Blob,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "'{v}'"),
            Self::Blob(v) => write!(f, "blob({} bytes)", v.len()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

///
/// ValueTag
///
/// Stable leading byte of every ordered value encoding. Tag order is the
/// cross-variant sort order.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub(crate) enum ValueTag {
    Null = 0,
    Bool = 1,
    Int = 2,
    Uint = 3,
    Text = 4,
    Blob = 5,
}

impl ValueTag {
    #[must_use]
    pub(crate) const fn to_u8(self) -> u8 {
        self as u8
    }
}
