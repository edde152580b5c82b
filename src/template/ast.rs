// Abstract Syntax Tree types for URI templates

use serde::Serialize;
use std::fmt;

/// Represents a parsed template as an ordered list of sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Template {
    pub sections: Vec<Section>,
}

impl Template {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Get all variables in this template, in order of appearance
    pub fn variables(&self) -> Vec<&VarSpec> {
        self.sections
            .iter()
            .filter_map(|section| match section {
                Section::Expression(expr) => Some(expr.var_specs.iter()),
                Section::Literal(_) => None,
            })
            .flatten()
            .collect()
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            match section {
                Section::Literal(text) => f.write_str(text)?,
                Section::Expression(expr) => write!(f, "{}", expr)?,
            }
        }
        Ok(())
    }
}

/// A template consists of literal text and `{...}` expressions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Section {
    Literal(String),
    Expression(Expression),
}

/// A single `{...}` expression: operator plus its variable list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expression {
    pub operator: Operator,
    pub var_specs: Vec<VarSpec>,
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        if let Some(ch) = self.operator.as_char() {
            write!(f, "{}", ch)?;
        }
        for (i, spec) in self.var_specs.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", spec)?;
        }
        f.write_str("}")
    }
}

/// RFC 6570 expression operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// `{var}` simple string expansion
    None,
    /// `{+var}` reserved expansion
    Plus,
    /// `{#var}` fragment expansion
    Hash,
    /// `{.var}` label expansion
    Dot,
    /// `{/var}` path segment expansion
    Slash,
    /// `{;var}` path-style parameters
    Semicolon,
    /// `{?var}` form-style query
    Question,
    /// `{&var}` form-style query continuation
    Ampersand,
}

impl Operator {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(Operator::Plus),
            '#' => Some(Operator::Hash),
            '.' => Some(Operator::Dot),
            '/' => Some(Operator::Slash),
            ';' => Some(Operator::Semicolon),
            '?' => Some(Operator::Question),
            '&' => Some(Operator::Ampersand),
            _ => None,
        }
    }

    pub fn as_char(self) -> Option<char> {
        match self {
            Operator::None => None,
            Operator::Plus => Some('+'),
            Operator::Hash => Some('#'),
            Operator::Dot => Some('.'),
            Operator::Slash => Some('/'),
            Operator::Semicolon => Some(';'),
            Operator::Question => Some('?'),
            Operator::Ampersand => Some('&'),
        }
    }

    /// Prefix emitted before the first expanded value
    pub fn first(self) -> &'static str {
        match self {
            Operator::None | Operator::Plus => "",
            Operator::Hash => "#",
            Operator::Dot => ".",
            Operator::Slash => "/",
            Operator::Semicolon => ";",
            Operator::Question => "?",
            Operator::Ampersand => "&",
        }
    }

    /// Separator placed between expanded values
    pub fn separator(self) -> &'static str {
        match self {
            Operator::None | Operator::Plus | Operator::Hash => ",",
            Operator::Dot => ".",
            Operator::Slash => "/",
            Operator::Semicolon => ";",
            Operator::Question | Operator::Ampersand => "&",
        }
    }

    /// Whether values are emitted as `name=value` pairs
    pub fn is_named(self) -> bool {
        matches!(
            self,
            Operator::Semicolon | Operator::Question | Operator::Ampersand
        )
    }

    /// What follows a name when its value is empty
    pub fn if_empty(self) -> &'static str {
        match self {
            Operator::Question | Operator::Ampersand => "=",
            _ => "",
        }
    }

    pub fn allows_reserved(self) -> bool {
        matches!(self, Operator::Plus | Operator::Hash)
    }
}

/// Value modifier attached to a single varspec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    /// `:n` keeps at most `n` code points of a string value
    Prefix(usize),
    /// `*` expands composite values as separate units
    Explode,
}

/// A variable reference inside an expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarSpec {
    pub name: String,
    pub modifier: Option<Modifier>,
}

impl VarSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifier: None,
        }
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.modifier = Some(Modifier::Prefix(max_length));
        self
    }

    pub fn with_explode(mut self) -> Self {
        self.modifier = Some(Modifier::Explode);
        self
    }

    pub fn max_length(&self) -> Option<usize> {
        match self.modifier {
            Some(Modifier::Prefix(len)) => Some(len),
            _ => None,
        }
    }

    pub fn is_exploded(&self) -> bool {
        self.modifier == Some(Modifier::Explode)
    }
}

impl fmt::Display for VarSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        match self.modifier {
            Some(Modifier::Prefix(len)) => write!(f, ":{}", len),
            Some(Modifier::Explode) => f.write_str("*"),
            None => Ok(()),
        }
    }
}
