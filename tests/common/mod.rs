// Common test utilities shared across test files

use earl::{Properties, UriTemplate, Value};

/// Parse and expand, panicking on any error
#[allow(dead_code)]
pub fn expand(template: &str, context: &Value) -> String {
    UriTemplate::parse(template)
        .expect("Failed to parse template")
        .expand(context)
        .expect("Failed to expand template")
}

/// The `keys` record used throughout the RFC examples
#[allow(dead_code)]
pub struct Keys;

impl Properties for Keys {
    fn property_names(&self) -> Vec<String> {
        vec!["semi".to_string(), "dot".to_string(), "comma".to_string()]
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "semi" => Some(Value::from(";")),
            "dot" => Some(Value::from(".")),
            "comma" => Some(Value::from(",")),
            _ => None,
        }
    }
}

/// `keys` as an ordered map
#[allow(dead_code)]
pub fn keys_map() -> Value {
    Value::map([("semi", ";"), ("dot", "."), ("comma", ",")])
}

/// Variables from RFC 6570 section 3.2, with `keys` supplied by `keys`
#[allow(dead_code)]
pub fn rfc_context(keys: Value) -> Value {
    Value::map([
        ("var", Value::from("value")),
        ("hello", Value::from("Hello World!")),
        ("path", Value::from("/foo/bar")),
        ("empty", Value::from("")),
        ("x", Value::from(1024)),
        ("y", Value::from(768)),
        ("list", Value::from(vec!["red", "green", "blue"])),
        ("keys", keys),
    ])
}
