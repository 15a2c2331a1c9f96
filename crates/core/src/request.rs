#![forbid(unsafe_code)]

//! Inbound call shape: the verb plus the request metadata the host forwards.

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verb {
    Read,
    Create,
    Update,
    Delete,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Read => "read",
            Verb::Create => "create",
            Verb::Update => "update",
            Verb::Delete => "delete",
        }
    }

    /// Maps the host's HTTP method name (or the lower-case verb name) to a verb.
    pub fn from_wire(value: &str) -> Option<Self> {
        let pairs = [
            ("GET", Verb::Read),
            ("POST", Verb::Create),
            ("PUT", Verb::Update),
            ("DELETE", Verb::Delete),
        ];
        pairs.into_iter().find_map(|(method, verb)| {
            (value.eq_ignore_ascii_case(method) || value.eq_ignore_ascii_case(verb.as_str()))
                .then_some(verb)
        })
    }
}

/// A named input a handler requires, and where it is looked up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Param {
    Query(&'static str),
    Path(&'static str),
}

impl Param {
    pub fn name(self) -> &'static str {
        match self {
            Param::Query(name) | Param::Path(name) => name,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Request {
    #[serde(rename = "QueryType", default, deserialize_with = "null_as_default")]
    verb: String,
    #[serde(rename = "QueryString", default, deserialize_with = "null_as_default")]
    query: HashMap<String, Vec<String>>,
    #[serde(rename = "PathParams", default, deserialize_with = "null_as_default")]
    path: HashMap<String, String>,
    #[serde(rename = "PostData", default, deserialize_with = "payload_bytes")]
    payload: Vec<u8>,
}

impl Request {
    pub fn new(verb: impl Into<String>) -> Self {
        Self {
            verb: verb.into(),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query
            .entry(name.to_string())
            .or_default()
            .push(value.into());
        self
    }

    pub fn with_path(mut self, name: &str, value: impl Into<String>) -> Self {
        self.path.insert(name.to_string(), value.into());
        self
    }

    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = payload.into();
        self
    }

    /// The verb exactly as the host sent it; `None` only when unset.
    pub fn raw_verb(&self) -> Option<&str> {
        (!self.verb.is_empty()).then_some(self.verb.as_str())
    }

    pub fn query_values(&self, name: &str) -> &[String] {
        self.query.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// First value of a multi-valued query parameter.
    pub fn query_first(&self, name: &str) -> Option<&str> {
        self.query_values(name).first().map(String::as_str)
    }

    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path.get(name).map(String::as_str)
    }

    pub fn lookup(&self, param: Param) -> Option<&str> {
        match param {
            Param::Query(name) => self.query_first(name),
            Param::Path(name) => self.path_param(name),
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WirePayload {
    Text(String),
    Bytes(Vec<u8>),
}

fn payload_bytes<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<WirePayload>::deserialize(deserializer)? {
        Some(WirePayload::Text(text)) => text.into_bytes(),
        Some(WirePayload::Bytes(bytes)) => bytes,
        None => Vec::new(),
    })
}
