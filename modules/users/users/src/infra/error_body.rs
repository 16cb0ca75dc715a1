//! Normalization of server error bodies into a display message.
//!
//! The backend reports validation problems as `{ "errors": [...] }`, but the
//! shape is not guaranteed: `errors` may be missing, a bare string, or the
//! body may not be JSON at all.

use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Option<Value>,
}

/// Message for a rejected create/update.
///
/// Array entries are joined with `", "`; a string is used as is; any other
/// shape, or nothing usable, yields `default_message`.
#[must_use]
pub fn rejection_message(body: &[u8], default_message: &str) -> String {
    let errors = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.errors);

    let joined = match errors {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_owned()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Some(Value::String(s)) => s.trim().to_owned(),
        _ => String::new(),
    };

    if joined.is_empty() {
        default_message.to_owned()
    } else {
        joined
    }
}
