use std::fmt;

use serde::Serialize;

use crate::codec::CodecError;

/// A catalog value. Only strings and integers can be stored.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Int(i64),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Str(_) => None,
            Self::Int(i) => Some(*i),
        }
    }

    /// Convert a parsed JSON value, rejecting anything that isn't a string
    /// or an integer in `i64` range.
    pub fn from_json(key: &str, value: serde_json::Value) -> Result<Self, CodecError> {
        let found = match value {
            serde_json::Value::String(s) => return Ok(Self::Str(s)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => return Ok(Self::Int(i)),
                None => "number (non-i64)",
            },
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "bool",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        };
        Err(CodecError::UnsupportedValueType {
            key: key.to_string(),
            found,
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
        }
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Self::Str(v.clone())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(v as i64)
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.as_int() == Some(*other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn json_scalars_are_accepted() {
        assert_eq!(
            Value::from_json("a", serde_json::json!("hi")).unwrap(),
            Value::Str("hi".into())
        );
        assert_eq!(
            Value::from_json("a", serde_json::json!(-7)).unwrap(),
            Value::Int(-7)
        );
    }

    #[test]
    fn json_non_scalars_are_rejected() {
        for (v, found) in [
            (serde_json::json!(null), "null"),
            (serde_json::json!(true), "bool"),
            (serde_json::json!(1.5), "number (non-i64)"),
            (serde_json::json!([1]), "array"),
            (serde_json::json!({"x": 1}), "object"),
        ] {
            match Value::from_json("k", v) {
                Err(CodecError::UnsupportedValueType { key, found: f }) => {
                    assert_eq!(key, "k");
                    assert_eq!(f, found);
                }
                other => panic!("expected UnsupportedValueType, got {other:?}"),
            }
        }
    }

    #[test]
    fn display_renders_both_variants() {
        assert_eq!(Value::from("x").to_string(), "x");
        assert_eq!(Value::from(42).to_string(), "42");
    }
}
