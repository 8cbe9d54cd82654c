use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Serialize, Deserialize)]
pub enum Kind {
    #[default]
    Null,
    String,
    Integer,
}

// Values are carried as text with a kind attached. The kind is a reading of
// the text, recomputed each time a token is resolved, so the same stored
// text can read as a String in one statement and an Integer in the next.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Serialize, Deserialize)]
pub struct TypedValue {
    pub kind: Kind,
    pub text: String,
}

const QUOTE: char = '\'';
const NEWLINE_ESCAPE: &str = "\\n";

impl TypedValue {
    pub fn null(text: impl Into<String>) -> Self {
        TypedValue {
            kind: Kind::Null,
            text: text.into(),
        }
    }

    pub fn string(text: impl Into<String>) -> Self {
        TypedValue {
            kind: Kind::String,
            text: text.into(),
        }
    }

    pub fn integer(i: i64) -> Self {
        TypedValue {
            kind: Kind::Integer,
            text: i.to_string(),
        }
    }

    /// Classifies a token that needs no environment: a quoted string literal
    /// or a base-10 integer. Anything else returns None.
    pub fn literal(token: &str) -> Option<Self> {
        if token.starts_with(QUOTE) && token.ends_with(QUOTE) {
            let body = token.strip_prefix(QUOTE).unwrap_or(token);
            let body = body.strip_suffix(QUOTE).unwrap_or(body);
            return Some(TypedValue::string(body.replace(NEWLINE_ESCAPE, "\n")));
        }
        token.parse::<i64>().ok().map(TypedValue::integer)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.kind {
            Kind::Integer => self.text.parse().ok(),
            _ => None,
        }
    }

    pub fn is_int(&self) -> bool {
        self.kind == Kind::Integer
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
