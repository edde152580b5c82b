// Template expansion following the RFC 6570 operator rules

use tracing::{debug, trace, warn};

use super::ast::{Expression, Operator, Section, Template, VarSpec};
use crate::error::ExpandError;
use crate::value::{ResolvedValue, ScalarCodec, Value, ValueResolver};

/// Expands parsed templates against a context
pub struct TemplateExpander;

impl TemplateExpander {
    /// Expand `template` with the variables found in `context`
    ///
    /// Undefined variables contribute nothing. The first variable whose
    /// value cannot be expanded aborts the whole call.
    pub fn expand(template: &Template, context: &Value) -> Result<String, ExpandError> {
        let resolver = ValueResolver::new(context);
        let mut result = String::new();

        for section in &template.sections {
            match section {
                Section::Literal(text) => result.push_str(text),
                Section::Expression(expr) => expand_expression(expr, &resolver, &mut result)?,
            }
        }

        debug!(
            sections = template.sections.len(),
            length = result.len(),
            "expanded uri template"
        );
        Ok(result)
    }
}

fn expand_expression(
    expr: &Expression,
    resolver: &ValueResolver<'_>,
    out: &mut String,
) -> Result<(), ExpandError> {
    let op = expr.operator;
    let mut units = Vec::with_capacity(expr.var_specs.len());

    for spec in &expr.var_specs {
        let unit = match resolver.resolve(&spec.name)? {
            ResolvedValue::Undefined => continue,
            ResolvedValue::Scalar(value) => expand_scalar(op, spec, &value),
            ResolvedValue::List(items) => {
                reject_prefix(spec, "list")?;
                expand_list(op, spec, &items)
            }
            ResolvedValue::AssociativeArray(pairs) => {
                reject_prefix(spec, "associative array")?;
                expand_pairs(op, spec, &pairs)
            }
        };
        units.push(unit);
    }

    trace!(expression = %expr, defined = units.len(), "expanded expression");

    // Nothing defined: not even the operator prefix is emitted
    if units.is_empty() {
        return Ok(());
    }

    out.push_str(op.first());
    out.push_str(&units.join(op.separator()));
    Ok(())
}

fn expand_scalar(op: Operator, spec: &VarSpec, value: &str) -> String {
    let encoded = match spec.max_length() {
        Some(len) => ScalarCodec::encode(
            ScalarCodec::prefix(value, len, op.allows_reserved()),
            op.allows_reserved(),
        ),
        None => ScalarCodec::encode(value, op.allows_reserved()),
    };

    if op.is_named() {
        named(op, &spec.name, &encoded)
    } else {
        encoded
    }
}

fn expand_list(op: Operator, spec: &VarSpec, items: &[String]) -> String {
    let encoded: Vec<String> = items
        .iter()
        .map(|item| ScalarCodec::encode(item, op.allows_reserved()))
        .collect();

    if spec.is_exploded() {
        if op.is_named() {
            encoded
                .iter()
                .map(|item| named(op, &spec.name, item))
                .collect::<Vec<_>>()
                .join(op.separator())
        } else {
            encoded.join(op.separator())
        }
    } else {
        let joined = encoded.join(",");
        if op.is_named() {
            named(op, &spec.name, &joined)
        } else {
            joined
        }
    }
}

fn expand_pairs(op: Operator, spec: &VarSpec, pairs: &[(String, String)]) -> String {
    let encoded: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| {
            (
                ScalarCodec::encode(k, op.allows_reserved()),
                ScalarCodec::encode(v, op.allows_reserved()),
            )
        })
        .collect();

    if spec.is_exploded() {
        encoded
            .iter()
            .map(|(k, v)| {
                if op.is_named() {
                    named(op, k, v)
                } else {
                    format!("{}={}", k, v)
                }
            })
            .collect::<Vec<_>>()
            .join(op.separator())
    } else {
        let flattened = encoded
            .iter()
            .flat_map(|(k, v)| [k.as_str(), v.as_str()])
            .collect::<Vec<_>>()
            .join(",");
        if op.is_named() {
            named(op, &spec.name, &flattened)
        } else {
            flattened
        }
    }
}

/// `name=value`, or `name` followed by the operator's empty marker
fn named(op: Operator, name: &str, value: &str) -> String {
    if value.is_empty() {
        format!("{}{}", name, op.if_empty())
    } else {
        format!("{}={}", name, value)
    }
}

fn reject_prefix(spec: &VarSpec, shape: &str) -> Result<(), ExpandError> {
    match spec.max_length() {
        Some(len) => {
            warn!(variable = %spec.name, max_length = len, "prefix modifier on composite value");
            Err(ExpandError::unsupported(
                &spec.name,
                format!("max-length ':{}' cannot be applied to a {}", len, shape),
            ))
        }
        None => Ok(()),
    }
}
