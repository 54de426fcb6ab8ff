//! API data sources
//!
//! A data source fetches a URL into a named state and runs its success
//! actions. Sources belong to the page, not to any element.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::codec::id_field;
use crate::{Action, Decoder, DecodeError, DecodeResult, Id};

/// HTTP method of a data source request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// Shape of a state value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    #[default]
    String,
    Number,
    Boolean,
    Array,
    Object,
}

/// One field of a data source response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub kind: PropertyKind,
}

/// External-fetch descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct DataSource {
    pub id: Id,
    /// State the response is stored under, without the source prefix
    pub state_name: String,
    pub url: String,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
    /// Fields the response is expected to expose
    pub properties: Vec<Property>,
    /// Actions run after a successful fetch, in order
    pub on_success: Vec<Action>,
}

/// Serializable part of a data source
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Descriptor {
    state_name: String,
    url: String,
    #[serde(default)]
    method: HttpMethod,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    body: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    properties: Vec<Property>,
}

impl DataSource {
    /// GET `url` into `state_name`
    pub fn new(state_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: Id::new(),
            state_name: state_name.into(),
            url: url.into(),
            method: HttpMethod::Get,
            headers: BTreeMap::new(),
            body: None,
            properties: Vec::new(),
            on_success: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<Id>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, kind: PropertyKind) -> Self {
        self.properties.push(Property {
            name: name.into(),
            kind,
        });
        self
    }

    pub fn with_on_success(mut self, action: Action) -> Self {
        self.on_success.push(action);
        self
    }

    /// Full state path of the response under `prefix`
    ///
    /// With [`SOURCE_STATE_PREFIX`](crate::SOURCE_STATE_PREFIX) this is e.g.
    /// `$store.source.users`.
    pub fn state_path(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.state_name)
    }

    /// State paths exposed by this source with their kinds
    ///
    /// The response itself is an object; each declared property is listed
    /// below it.
    pub fn state_paths(&self, prefix: &str) -> Vec<(String, PropertyKind)> {
        let root = self.state_path(prefix);
        let mut out = Vec::with_capacity(self.properties.len() + 1);
        out.push((root.clone(), PropertyKind::Object));
        out.extend(
            self.properties
                .iter()
                .map(|p| (format!("{root}.{}", p.name), p.kind)),
        );
        out
    }

    /// Success action by id
    pub fn action(&self, id: &Id) -> Option<&Action> {
        self.on_success.iter().find(|a| a.is(id))
    }

    pub fn serialize(&self) -> Value {
        let descriptor = Descriptor {
            state_name: self.state_name.clone(),
            url: self.url.clone(),
            method: self.method,
            headers: self.headers.clone(),
            body: self.body.clone(),
            properties: self.properties.clone(),
        };
        let mut map = match serde_json::to_value(descriptor) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        map.insert("id".into(), json!(self.id));
        map.insert(
            "onSuccess".into(),
            Value::Array(self.on_success.iter().map(|a| a.serialize()).collect()),
        );
        Value::Object(map)
    }

    /// Rebuild a data source; malformed success actions fail it
    pub fn deserialize(value: &Value) -> DecodeResult<DataSource> {
        Decoder::strict(crate::ActionRegistry::shared()).data_source(value, "$")
    }
}

impl Decoder<'_> {
    /// Decode one data source
    pub fn data_source(&mut self, value: &Value, path: &str) -> DecodeResult<DataSource> {
        let map = value
            .as_object()
            .ok_or_else(|| DecodeError::invalid(path, "source", "expected an object"))?;
        let id = id_field(map, path)?;
        let descriptor: Descriptor =
            serde_json::from_value(value.clone()).map_err(|err| DecodeError::invalid(path, "source", err))?;
        let on_success = self.action_list(map.get("onSuccess"), path, "onSuccess")?;
        Ok(DataSource {
            id,
            state_name: descriptor.state_name,
            url: descriptor.url,
            method: descriptor.method,
            headers: descriptor.headers,
            body: descriptor.body,
            properties: descriptor.properties,
            on_success,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnimationAction, SOURCE_STATE_PREFIX, ToggleStateAction};

    #[test]
    fn test_state_paths() {
        let source = DataSource::new("users", "https://api.example.com/users")
            .with_property("list", PropertyKind::Array)
            .with_property("total", PropertyKind::Number);
        assert_eq!(source.state_path("$api."), "$api.users");
        assert_eq!(
            source.state_paths(SOURCE_STATE_PREFIX),
            vec![
                ("$store.source.users".to_string(), PropertyKind::Object),
                ("$store.source.users.list".to_string(), PropertyKind::Array),
                ("$store.source.users.total".to_string(), PropertyKind::Number),
            ]
        );
    }

    #[test]
    fn test_roundtrip() {
        let mut source = DataSource::new("users", "https://api.example.com/users")
            .with_id("s1")
            .with_property("list", PropertyKind::Array)
            .with_on_success(Action::with_id("a1", AnimationAction::new("fade")))
            .with_on_success(Action::with_id("a2", ToggleStateAction { state_name: "loaded".into() }));
        source.method = HttpMethod::Post;
        source.headers.insert("Authorization".into(), "Bearer x".into());
        source.body = Some("{}".into());

        let value = source.serialize();
        assert_eq!(value["method"], "POST");
        assert_eq!(value["onSuccess"][1]["kind"], "Toggle state");
        assert_eq!(DataSource::deserialize(&value).unwrap(), source);
    }

    #[test]
    fn test_missing_url() {
        let value = json!({ "id": "s1", "stateName": "x" });
        assert!(matches!(
            DataSource::deserialize(&value),
            Err(DecodeError::InvalidField { .. })
        ));
    }
}
