//! Actions
//!
//! Declarative units of behavior run when an event fires or a data source
//! succeeds. Each variant has a unique name used both as its serialized
//! `kind` and as the menu label shown to the author. Identity is by id:
//! trees are rebuilt on every edit, so references never survive.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{EventKind, Expression, Id};

/// Address of an action inside an element event
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ids {
    pub event: Id,
    pub action: Id,
}

impl Ids {
    pub fn new(event: impl Into<Id>, action: impl Into<Id>) -> Self {
        Self {
            event: event.into(),
            action: action.into(),
        }
    }
}

/// Address of an action in a data source's success list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceIds {
    pub source: Id,
    pub action: Id,
}

impl SourceIds {
    pub fn new(source: impl Into<Id>, action: impl Into<Id>) -> Self {
        Self {
            source: source.into(),
            action: action.into(),
        }
    }
}

/// Elements an animation plays on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnimationTarget {
    /// The element owning the event
    #[default]
    #[serde(rename = "self")]
    SelfElement,
    /// Its direct children
    Children,
    /// Every element carrying one of the classes
    Class {
        #[serde(rename = "classNames", default)]
        class_names: Vec<String>,
    },
}

/// Play a named animation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationAction {
    #[serde(default)]
    pub animation_name: String,
    #[serde(default)]
    pub target: AnimationTarget,
}

impl AnimationAction {
    pub fn new(animation_name: impl Into<String>) -> Self {
        Self {
            animation_name: animation_name.into(),
            target: AnimationTarget::SelfElement,
        }
    }

    pub fn with_target(mut self, target: AnimationTarget) -> Self {
        self.target = target;
        self
    }
}

/// Assign a value to a page state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStateAction {
    #[serde(default)]
    pub state_name: String,
    #[serde(default)]
    pub value: Expression,
}

/// Flip a boolean page state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleStateAction {
    #[serde(default)]
    pub state_name: String,
}

/// Re-run a data source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchAction {
    #[serde(default)]
    pub data_source_id: String,
}

/// Variant payload of an action
#[derive(Debug, Clone, PartialEq)]
pub enum ActionPayload {
    Animation(AnimationAction),
    SetState(SetStateAction),
    ToggleState(ToggleStateAction),
    Fetch(FetchAction),
    /// Variant registered at runtime, payload kept as JSON
    Custom { name: String, payload: Map<String, Value> },
}

impl ActionPayload {
    /// Variant name (serialized `kind` and menu label)
    pub fn name(&self) -> &str {
        match self {
            Self::Animation(_) => AnimationAction::NAME,
            Self::SetState(_) => SetStateAction::NAME,
            Self::ToggleState(_) => ToggleStateAction::NAME,
            Self::Fetch(_) => FetchAction::NAME,
            Self::Custom { name, .. } => name,
        }
    }

    fn fields(&self) -> Map<String, Value> {
        let value = match self {
            Self::Animation(a) => serde_json::to_value(a),
            Self::SetState(a) => serde_json::to_value(a),
            Self::ToggleState(a) => serde_json::to_value(a),
            Self::Fetch(a) => serde_json::to_value(a),
            Self::Custom { payload, .. } => return payload.clone(),
        };
        match value {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Typed access to one built-in action variant
pub trait ActionVariant: Clone + Sized {
    /// Unique variant name
    const NAME: &'static str;

    fn from_payload(payload: &ActionPayload) -> Option<&Self>;

    fn into_payload(self) -> ActionPayload;
}

macro_rules! action_variant {
    ($ty:ident, $variant:ident, $name:literal) => {
        impl ActionVariant for $ty {
            const NAME: &'static str = $name;

            fn from_payload(payload: &ActionPayload) -> Option<&Self> {
                match payload {
                    ActionPayload::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn into_payload(self) -> ActionPayload {
                ActionPayload::$variant(self)
            }
        }

        impl From<$ty> for ActionPayload {
            fn from(value: $ty) -> Self {
                ActionPayload::$variant(value)
            }
        }
    };
}

action_variant!(AnimationAction, Animation, "Animation");
action_variant!(SetStateAction, SetState, "Set state");
action_variant!(ToggleStateAction, ToggleState, "Toggle state");
action_variant!(FetchAction, Fetch, "Fetch");

/// An action attached to an event or a data source
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub id: Id,
    pub payload: ActionPayload,
}

impl Action {
    /// Create an action with a fresh id
    pub fn new(payload: impl Into<ActionPayload>) -> Self {
        Self {
            id: Id::new(),
            payload: payload.into(),
        }
    }

    /// Create an action with a known id
    pub fn with_id(id: impl Into<Id>, payload: impl Into<ActionPayload>) -> Self {
        Self {
            id: id.into(),
            payload: payload.into(),
        }
    }

    pub fn name(&self) -> &str {
        self.payload.name()
    }

    /// Whether this is the action with `id`
    pub fn is(&self, id: &Id) -> bool {
        self.id == *id
    }

    /// This action's id carrying `other`'s payload
    pub fn with_payload_of(&self, other: Action) -> Action {
        Action {
            id: self.id.clone(),
            payload: other.payload,
        }
    }

    /// Borrow the payload as a concrete variant
    pub fn as_variant<T: ActionVariant>(&self) -> Option<&T> {
        T::from_payload(&self.payload)
    }

    /// `{kind, id, ...payload}`
    pub fn serialize(&self) -> Value {
        let mut map = self.payload.fields();
        map.insert("kind".into(), Value::String(self.name().to_string()));
        map.insert("id".into(), Value::String(self.id.to_string()));
        Value::Object(map)
    }

    /// Describe this action for an event's settings surface
    pub fn settings(&self, ids: &Ids, event_kind: Option<EventKind>) -> SettingsDescriptor {
        SettingsDescriptor {
            title: self.name().to_string(),
            target: SettingsTarget::Event {
                ids: ids.clone(),
                event_kind,
            },
            fields: self.fields(),
        }
    }

    /// Describe this action for a data source's success list
    pub fn data_source_settings(&self, source: &Id) -> SettingsDescriptor {
        SettingsDescriptor {
            title: self.name().to_string(),
            target: SettingsTarget::DataSource(SourceIds {
                source: source.clone(),
                action: self.id.clone(),
            }),
            fields: self.fields(),
        }
    }

    fn fields(&self) -> Vec<SettingsField> {
        match &self.payload {
            ActionPayload::Animation(a) => {
                let mut fields = vec![
                    SettingsField::new("animationName", "Animation", FieldValue::Text(a.animation_name.clone())),
                    SettingsField::new(
                        "target",
                        "Target",
                        FieldValue::Choice {
                            selected: target_name(&a.target).to_string(),
                            options: vec!["self".into(), "children".into(), "class".into()],
                        },
                    ),
                ];
                if let AnimationTarget::Class { class_names } = &a.target {
                    fields.push(SettingsField::new("classNames", "Classes", FieldValue::List(class_names.clone())));
                }
                fields
            }
            ActionPayload::SetState(a) => vec![
                SettingsField::new("stateName", "State", FieldValue::Text(a.state_name.clone())),
                SettingsField::new("value", "Value", FieldValue::Expression(a.value.clone())),
            ],
            ActionPayload::ToggleState(a) => {
                vec![SettingsField::new("stateName", "State", FieldValue::Text(a.state_name.clone()))]
            }
            ActionPayload::Fetch(a) => vec![SettingsField::new(
                "dataSourceId",
                "Data source",
                FieldValue::Text(a.data_source_id.clone()),
            )],
            ActionPayload::Custom { payload, .. } => payload
                .iter()
                .map(|(key, value)| SettingsField::new(key.clone(), key.clone(), FieldValue::Json(value.clone())))
                .collect(),
        }
    }
}

fn target_name(target: &AnimationTarget) -> &'static str {
    match target {
        AnimationTarget::SelfElement => "self",
        AnimationTarget::Children => "children",
        AnimationTarget::Class { .. } => "class",
    }
}

/// What an editor surface needs to present one action
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsDescriptor {
    pub title: String,
    pub target: SettingsTarget,
    pub fields: Vec<SettingsField>,
}

/// Where an edited action is written back
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsTarget {
    Event {
        ids: Ids,
        event_kind: Option<EventKind>,
    },
    DataSource(SourceIds),
}

/// One editable field
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsField {
    /// Serialized field name
    pub name: String,
    pub label: String,
    pub value: FieldValue,
}

impl SettingsField {
    fn new(name: impl Into<String>, label: impl Into<String>, value: FieldValue) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            value,
        }
    }
}

/// Current value of an editable field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Choice { selected: String, options: Vec<String> },
    List(Vec<String>),
    Expression(Expression),
    Json(Value),
}
