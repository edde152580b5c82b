// RFC 6570 URI Template expansion
//
// Parse a template once, then expand it against any number of contexts.

pub mod config;
pub mod error;
pub mod template;
pub mod value;

use std::fmt;
use std::str::FromStr;

pub use error::{Error, ExpandError, Result, TemplateSyntaxError};
pub use template::{
    Expression, Modifier, Operator, Section, Template, TemplateExpander, TemplateParser, VarSpec,
};
pub use value::{Properties, ResolvedValue, Scalar, ScalarCodec, Value, ValueResolver};

/// A parsed URI template, ready to be expanded
///
/// Parsing happens once in [`UriTemplate::parse`]; the result is immutable
/// and can be shared between threads and reused for every expansion.
///
/// ```
/// # use earl::{UriTemplate, Value};
/// # fn main() -> Result<(), earl::Error> {
/// let template = UriTemplate::parse("/search{?q,page}")?;
/// let url = template.expand(&Value::map([("q", "rust"), ("page", "2")]))?;
/// assert_eq!(url, "/search?q=rust&page=2");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate {
    template: Template,
}

impl UriTemplate {
    pub fn parse(template: &str) -> std::result::Result<Self, TemplateSyntaxError> {
        Ok(Self {
            template: TemplateParser::parse(template)?,
        })
    }

    pub fn expand(&self, context: &Value) -> std::result::Result<String, ExpandError> {
        TemplateExpander::expand(&self.template, context)
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Every variable referenced by the template, in order
    pub fn variables(&self) -> Vec<&VarSpec> {
        self.template.variables()
    }
}

impl FromStr for UriTemplate {
    type Err = TemplateSyntaxError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.template)
    }
}

/// Parse and expand in one call
pub fn expand(template: &str, context: &Value) -> Result<String> {
    Ok(UriTemplate::parse(template)?.expand(context)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_template_roundtrip_display() {
        let template: UriTemplate = "/users{/id}{?fields*}".parse().unwrap();
        assert_eq!(template.to_string(), "/users{/id}{?fields*}");
        assert_eq!(template.variables().len(), 2);
    }

    #[test]
    fn test_expand_helper_reports_both_error_kinds() {
        let context = Value::map([("v", "x")]);
        assert_eq!(expand("{v}", &context).unwrap(), "x");
        assert!(matches!(expand("{v", &context), Err(Error::Syntax(_))));

        let nested = Value::map([("v", Value::map([("a", Value::from(vec![1]))]))]);
        assert!(matches!(expand("{v}", &nested), Err(Error::Expand(_))));
    }

    #[test]
    fn test_template_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<UriTemplate>();
        assert_send_sync::<Value>();
    }
}
