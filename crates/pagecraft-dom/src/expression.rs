//! Templated expressions
//!
//! An expression is an ordered list of literal text and state references.
//! Its template form writes state references as `{{path}}`:
//! `Hello {{$store.source.user.name}}!`

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One part of an expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ExpressionPart {
    /// Literal text
    Text(String),
    /// Reference to a state path
    State(String),
}

/// Templated string referencing state paths
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    #[serde(default)]
    pub value: Vec<ExpressionPart>,
}

impl Expression {
    /// Create an empty expression
    pub fn new() -> Self {
        Self::default()
    }

    /// Expression holding a single literal
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return Self::new();
        }
        Self {
            value: vec![ExpressionPart::Text(text)],
        }
    }

    /// Expression holding a single state reference
    pub fn state(path: impl Into<String>) -> Self {
        Self {
            value: vec![ExpressionPart::State(path.into())],
        }
    }

    /// Parse the `{{path}}` template form
    ///
    /// An unterminated `{{` is kept as literal text.
    pub fn parse(template: &str) -> Self {
        let mut expr = Self::new();
        let mut rest = template;
        while let Some(open) = rest.find("{{") {
            let after = &rest[open + 2..];
            let Some(close) = after.find("}}") else {
                break;
            };
            expr.push_text(&rest[..open]);
            let path = after[..close].trim();
            if !path.is_empty() {
                expr.value.push(ExpressionPart::State(path.to_string()));
            }
            rest = &after[close + 2..];
        }
        expr.push_text(rest);
        expr
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(ExpressionPart::Text(last)) = self.value.last_mut() {
            last.push_str(text);
        } else {
            self.value.push(ExpressionPart::Text(text.to_string()));
        }
    }

    /// Render back to the `{{path}}` template form
    pub fn to_template(&self) -> String {
        let mut out = String::new();
        for part in &self.value {
            match part {
                ExpressionPart::Text(text) => out.push_str(text),
                ExpressionPart::State(path) => {
                    out.push_str("{{");
                    out.push_str(path);
                    out.push_str("}}");
                }
            }
        }
        out
    }

    /// State paths referenced by this expression, in order
    pub fn state_paths(&self) -> impl Iterator<Item = &str> {
        self.value.iter().filter_map(|part| match part {
            ExpressionPart::State(path) => Some(path.as_str()),
            ExpressionPart::Text(_) => None,
        })
    }

    /// Substitute state values from a JSON snapshot
    ///
    /// Missing paths render as the empty string.
    pub fn render(&self, state: &Value) -> String {
        let mut out = String::new();
        for part in &self.value {
            match part {
                ExpressionPart::Text(text) => out.push_str(text),
                ExpressionPart::State(path) => {
                    if let Some(value) = lookup(state, path) {
                        out.push_str(&value_text(value));
                    }
                }
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl From<&str> for Expression {
    fn from(template: &str) -> Self {
        Self::parse(template)
    }
}

/// Resolve a dotted state path against a JSON snapshot
///
/// Segments index objects by key and arrays by position.
pub fn lookup<'a>(state: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    path.split('.').try_fold(state, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Text form of a state value
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_template() {
        let expr = Expression::parse("Hello {{ $store.user.name }}!");
        assert_eq!(
            expr.value,
            vec![
                ExpressionPart::Text("Hello ".into()),
                ExpressionPart::State("$store.user.name".into()),
                ExpressionPart::Text("!".into()),
            ]
        );
        assert_eq!(expr.to_template(), "Hello {{$store.user.name}}!");
    }

    #[test]
    fn test_unterminated_reference_is_text() {
        let expr = Expression::parse("a {{b");
        assert_eq!(expr.value, vec![ExpressionPart::Text("a {{b".into())]);
    }

    #[test]
    fn test_empty_template() {
        assert!(Expression::parse("").is_empty());
        assert!(Expression::text("").is_empty());
    }

    #[test]
    fn test_render_against_state() {
        let state = json!({ "$store": { "user": { "name": "Ada", "tags": ["x", "y"] } } });
        let expr = Expression::parse("{{$store.user.name}}/{{$store.user.tags.1}}/{{$store.missing}}");
        assert_eq!(expr.render(&state), "Ada/y/");
    }

    #[test]
    fn test_serialized_shape() {
        let expr = Expression::parse("n={{count}}");
        assert_eq!(
            serde_json::to_value(&expr).unwrap(),
            json!({ "value": [
                { "kind": "text", "value": "n=" },
                { "kind": "state", "value": "count" },
            ]})
        );
    }

    #[test]
    fn test_state_paths() {
        let expr = Expression::parse("{{a}} and {{b.c}}");
        assert_eq!(expr.state_paths().collect::<Vec<_>>(), vec!["a", "b.c"]);
    }
}
