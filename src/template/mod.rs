// Template module for RFC 6570 URI templates
//
// This module provides parsing of template strings into sections and
// expansion of those sections against a variable context.

mod ast;
mod expander;
mod parser;

pub use ast::{Expression, Modifier, Operator, Section, Template, VarSpec};
pub use expander::TemplateExpander;
pub use parser::{TemplateParser, MAX_PREFIX_LENGTH};
