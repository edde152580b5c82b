// Variable lookup and classification against an expansion context

use std::borrow::Cow;
use tracing::warn;

use super::{Properties, Scalar, ScalarCodec, ScalarFamily, Value};
use crate::error::ExpandError;

/// A context value classified into one of the RFC 6570 value shapes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedValue {
    Undefined,
    Scalar(String),
    List(Vec<String>),
    AssociativeArray(Vec<(String, String)>),
}

/// Lookup strategy chosen once per context
#[derive(Clone, Copy)]
enum Lookup<'a> {
    Map(&'a [(String, Value)]),
    Record(&'a dyn Properties),
    /// Scalars, lists and null expose no names
    Empty,
}

/// Resolves variable names against a single context
pub struct ValueResolver<'a> {
    lookup: Lookup<'a>,
}

impl<'a> ValueResolver<'a> {
    pub fn new(context: &'a Value) -> Self {
        let lookup = match context {
            Value::Map(pairs) => Lookup::Map(pairs),
            Value::Record(record) => Lookup::Record(record.as_ref()),
            _ => Lookup::Empty,
        };
        Self { lookup }
    }

    /// Look up `name` and classify its value
    pub fn resolve(&self, name: &str) -> Result<ResolvedValue, ExpandError> {
        let Some(raw) = self.raw(name) else {
            return Ok(ResolvedValue::Undefined);
        };

        classify(name, &raw).map_err(|err| {
            warn!(variable = name, error = %err, "cannot expand variable");
            err
        })
    }

    fn raw(&self, name: &str) -> Option<Cow<'a, Value>> {
        match self.lookup {
            Lookup::Map(pairs) => pairs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| Cow::Borrowed(value)),
            Lookup::Record(record) => record.property(name).map(Cow::Owned),
            Lookup::Empty => None,
        }
    }
}

fn classify(name: &str, value: &Value) -> Result<ResolvedValue, ExpandError> {
    match value {
        Value::Null => Ok(ResolvedValue::Undefined),
        Value::Scalar(scalar) => Ok(ResolvedValue::Scalar(ScalarCodec::to_canonical_string(
            scalar,
        ))),
        Value::List(items) => classify_list(name, items),
        Value::Map(pairs) => collect_pairs(
            name,
            pairs.iter().map(|(k, v)| (k.clone(), Cow::Borrowed(v))),
        ),
        Value::Record(record) => collect_pairs(
            name,
            record
                .property_names()
                .into_iter()
                .filter_map(|k| record.property(&k).map(|v| (k, Cow::Owned(v)))),
        ),
    }
}

fn classify_list(name: &str, items: &[Value]) -> Result<ResolvedValue, ExpandError> {
    let mut family: Option<ScalarFamily> = None;
    let mut rendered = Vec::with_capacity(items.len());

    for item in items {
        let scalar: &Scalar = match item {
            Value::Null => continue,
            Value::Scalar(scalar) => scalar,
            other => {
                return Err(ExpandError::unsupported(
                    name,
                    format!("list items must be scalars, found a {}", other.shape_name()),
                ));
            }
        };

        match family {
            None => family = Some(scalar.family()),
            Some(expected) if expected != scalar.family() => {
                return Err(ExpandError::unsupported(
                    name,
                    format!(
                        "list mixes {:?} and {:?} values",
                        expected,
                        scalar.family()
                    ),
                ));
            }
            Some(_) => {}
        }

        rendered.push(ScalarCodec::to_canonical_string(scalar));
    }

    if rendered.is_empty() {
        Ok(ResolvedValue::Undefined)
    } else {
        Ok(ResolvedValue::List(rendered))
    }
}

fn collect_pairs<'v>(
    name: &str,
    entries: impl Iterator<Item = (String, Cow<'v, Value>)>,
) -> Result<ResolvedValue, ExpandError> {
    let mut pairs = Vec::new();

    for (key, value) in entries {
        match value.as_ref() {
            Value::Null => continue,
            Value::Scalar(scalar) => {
                pairs.push((key, ScalarCodec::to_canonical_string(scalar)));
            }
            other => {
                return Err(ExpandError::unsupported(
                    name,
                    format!(
                        "entry '{}' holds a nested {}, only one level of keys is supported",
                        key,
                        other.shape_name()
                    ),
                ));
            }
        }
    }

    if pairs.is_empty() {
        Ok(ResolvedValue::Undefined)
    } else {
        Ok(ResolvedValue::AssociativeArray(pairs))
    }
}
