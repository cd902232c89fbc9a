use std::fmt;

use serde::{Deserialize, Serialize};

/// A single operation argument.
///
/// The query mini-language carries three scalar kinds: a run of decimal
/// digits becomes an integer, the literals `true`/`false` become booleans,
/// and everything else stays a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Int(i64),
    Bool(bool),
    Str(String),
}

impl ArgValue {
    /// Coerce a decoded query token into its argument value.
    pub fn coerce(token: &str) -> Self {
        if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = token.parse::<i64>() {
                return ArgValue::Int(n);
            }
        }
        match token {
            "true" => ArgValue::Bool(true),
            "false" => ArgValue::Bool(false),
            _ => ArgValue::Str(token.to_string()),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Percent-encoded wire form, suitable for a query fragment.
    pub fn to_query_token(&self) -> String {
        match self {
            ArgValue::Int(n) => n.to_string(),
            ArgValue::Bool(b) => b.to_string(),
            ArgValue::Str(s) => urlencoding::encode(s).into_owned(),
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Int(n) => write!(f, "{n}"),
            ArgValue::Bool(b) => write!(f, "{b}"),
            ArgValue::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for ArgValue {
    fn from(n: i64) -> Self {
        ArgValue::Int(n)
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        ArgValue::Bool(b)
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Str(s.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        ArgValue::Str(s)
    }
}

/// A named action with an ordered argument list, the unit added to a
/// pipeline. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    pub args: Vec<ArgValue>,
}

impl Operation {
    pub fn new(name: impl Into<String>, args: Vec<ArgValue>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Re-encode the operation as a query fragment (`name` or
    /// `name=arg1,arg2`). Parsing the result yields this operation back.
    pub fn to_query_fragment(&self) -> String {
        let name = urlencoding::encode(&self.name);
        if self.args.is_empty() {
            return name.into_owned();
        }
        let args: Vec<String> = self.args.iter().map(ArgValue::to_query_token).collect();
        format!("{}={}", name, args.join(","))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_query_fragment())
    }
}
