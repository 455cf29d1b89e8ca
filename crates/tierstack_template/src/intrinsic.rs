//! Intrinsic function expressions.
//!
//! An [`Expr`] is any property value that the provisioning engine may have
//! to resolve: a plain literal, a `Ref`, an attribute lookup, a mapping
//! lookup, or a composition of those. Expressions are never evaluated here;
//! they serialize to the engine's JSON encoding.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Engine-provided names that may be referenced without being declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoParameter {
    AccountId,
    NotificationArns,
    NoValue,
    Partition,
    Region,
    StackId,
    StackName,
    UrlSuffix,
}

impl PseudoParameter {
    pub fn as_str(&self) -> &'static str {
        match self {
            PseudoParameter::AccountId => "AWS::AccountId",
            PseudoParameter::NotificationArns => "AWS::NotificationARNs",
            PseudoParameter::NoValue => "AWS::NoValue",
            PseudoParameter::Partition => "AWS::Partition",
            PseudoParameter::Region => "AWS::Region",
            PseudoParameter::StackId => "AWS::StackId",
            PseudoParameter::StackName => "AWS::StackName",
            PseudoParameter::UrlSuffix => "AWS::URLSuffix",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::all().into_iter().find(|p| p.as_str() == s)
    }

    pub fn all() -> Vec<Self> {
        vec![
            PseudoParameter::AccountId,
            PseudoParameter::NotificationArns,
            PseudoParameter::NoValue,
            PseudoParameter::Partition,
            PseudoParameter::Region,
            PseudoParameter::StackId,
            PseudoParameter::StackName,
            PseudoParameter::UrlSuffix,
        ]
    }
}

impl std::fmt::Display for PseudoParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A property value, possibly containing unresolved references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Plain string value.
    Literal(String),
    /// `{"Ref": name}`
    Ref(String),
    /// `{"Fn::GetAtt": [name, attribute]}`
    GetAtt { name: String, attribute: String },
    /// `{"Fn::FindInMap": [map, top_key, second_key]}`
    FindInMap {
        map: String,
        top_key: Box<Expr>,
        second_key: String,
    },
    /// `{"Fn::Join": [delimiter, [parts...]]}`
    Join { delimiter: String, parts: Vec<Expr> },
    /// `{"Fn::Base64": expr}`
    Base64(Box<Expr>),
}

impl Expr {
    pub fn literal(value: impl Into<String>) -> Self {
        Expr::Literal(value.into())
    }

    /// Reference a pseudo-parameter such as `AWS::Region`.
    pub fn pseudo(parameter: PseudoParameter) -> Self {
        Expr::Ref(parameter.as_str().to_string())
    }

    pub fn find_in_map(map: impl Into<String>, top_key: Expr, second_key: impl Into<String>) -> Self {
        Expr::FindInMap {
            map: map.into(),
            top_key: Box::new(top_key),
            second_key: second_key.into(),
        }
    }

    pub fn join(delimiter: impl Into<String>, parts: Vec<Expr>) -> Self {
        Expr::Join {
            delimiter: delimiter.into(),
            parts,
        }
    }

    pub fn base64(inner: Expr) -> Self {
        Expr::Base64(Box::new(inner))
    }

    /// Returns the literal text if this expression needs no resolution.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Expr::Literal(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Expr::Literal(value.to_string())
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Expr::Literal(value)
    }
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Expr::Literal(value) => serializer.serialize_str(value),
            Expr::Ref(name) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Ref", name)?;
                map.end()
            }
            Expr::GetAtt { name, attribute } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::GetAtt", &[name, attribute])?;
                map.end()
            }
            Expr::FindInMap {
                map: map_name,
                top_key,
                second_key,
            } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::FindInMap", &(map_name, top_key.as_ref(), second_key))?;
                map.end()
            }
            Expr::Join { delimiter, parts } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::Join", &(delimiter, parts))?;
                map.end()
            }
            Expr::Base64(inner) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::Base64", inner.as_ref())?;
                map.end()
            }
        }
    }
}
