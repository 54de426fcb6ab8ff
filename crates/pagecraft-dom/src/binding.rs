//! State bindings
//!
//! A binding ties an element property (its visibility or an extra class) to
//! a condition over external state. Elements hold at most one binding per
//! [`BindingKind`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::expression::{lookup, value_text};
use crate::Expression;

/// Element property a binding controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingKind {
    /// Add `Binding::class` when the condition holds
    Class,
    /// Show the element when the condition holds
    Show,
    /// Hide the element when the condition holds
    Hide,
}

impl BindingKind {
    pub const ALL: [BindingKind; 3] = [Self::Class, Self::Show, Self::Hide];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Show => "show",
            Self::Hide => "hide",
        }
    }
}

/// Comparison applied by a binding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    #[default]
    #[serde(rename = "equals")]
    Equals,
    #[serde(rename = "not equals")]
    NotEquals,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "not contains")]
    NotContains,
    #[serde(rename = "greater than")]
    GreaterThan,
    #[serde(rename = "less than")]
    LessThan,
}

/// All conditions, in menu order
pub const CONDITIONS: [Condition; 6] = [
    Condition::Equals,
    Condition::NotEquals,
    Condition::Contains,
    Condition::NotContains,
    Condition::GreaterThan,
    Condition::LessThan,
];

impl Condition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "not equals",
            Self::Contains => "contains",
            Self::NotContains => "not contains",
            Self::GreaterThan => "greater than",
            Self::LessThan => "less than",
        }
    }

    /// Compare a state value against the rendered expected text
    ///
    /// Containment on arrays checks for an element with matching text;
    /// ordering compares numerically and fails on non-numbers.
    pub fn test(self, actual: &Value, expected: &str) -> bool {
        match self {
            Self::Equals => value_text(actual) == expected,
            Self::NotEquals => value_text(actual) != expected,
            Self::Contains => contains(actual, expected),
            Self::NotContains => !contains(actual, expected),
            Self::GreaterThan => compare(actual, expected).is_some_and(|(a, b)| a > b),
            Self::LessThan => compare(actual, expected).is_some_and(|(a, b)| a < b),
        }
    }
}

fn contains(actual: &Value, expected: &str) -> bool {
    match actual {
        Value::Array(items) => items.iter().any(|item| value_text(item) == expected),
        other => value_text(other).contains(expected),
    }
}

fn compare(actual: &Value, expected: &str) -> Option<(f64, f64)> {
    let a = match actual {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    let b = expected.trim().parse().ok()?;
    Some((a, b))
}

/// Conditional rule mapping external state to an element property
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    /// Path into external state
    #[serde(default)]
    pub from_state_name: String,
    #[serde(default)]
    pub condition: Condition,
    /// Value compared against the state
    #[serde(default)]
    pub value: Expression,
    /// Class to add; only meaningful for [`BindingKind::Class`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

impl Binding {
    /// Binding on a state path with an empty expected value
    pub fn new(from_state_name: impl Into<String>) -> Self {
        Self {
            from_state_name: from_state_name.into(),
            ..Self::default()
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    pub fn with_value(mut self, value: Expression) -> Self {
        self.value = value;
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Evaluate the rule against a JSON state snapshot
    ///
    /// A missing state path never satisfies the rule.
    pub fn evaluate(&self, state: &Value) -> bool {
        let Some(actual) = lookup(state, &self.from_state_name) else {
            return false;
        };
        let expected = self.value.render(state);
        self.condition.test(actual, &expected)
    }
}
