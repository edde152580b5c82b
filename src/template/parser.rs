// Template parser using recursive descent

use tracing::debug;

use super::ast::{Expression, Modifier, Operator, Section, Template, VarSpec};
use crate::error::TemplateSyntaxError;

/// Upper bound for a `:n` prefix modifier (four digits, no leading zero)
pub const MAX_PREFIX_LENGTH: usize = 9999;

/// Operator characters RFC 6570 sets aside for future extensions
const RESERVED_OPERATORS: &[char] = &['=', ',', '!', '@', '|'];

type ParseResult<T> = Result<T, TemplateSyntaxError>;

pub struct TemplateParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> TemplateParser<'a> {
    pub fn parse(template: &'a str) -> ParseResult<Template> {
        let mut parser = Self {
            input: template,
            pos: 0,
        };
        let parsed = parser.parse_template()?;
        debug!(
            template,
            sections = parsed.sections.len(),
            "parsed uri template"
        );
        Ok(parsed)
    }

    fn parse_template(&mut self) -> ParseResult<Template> {
        let mut sections = Vec::new();
        let mut literal_buf = String::new();

        while let Some(ch) = self.peek_char() {
            match ch {
                '{' => {
                    // Flush literal buffer before the expression
                    if !literal_buf.is_empty() {
                        sections.push(Section::Literal(std::mem::take(&mut literal_buf)));
                    }
                    let expr = self.parse_expression()?;
                    sections.push(Section::Expression(expr));
                }
                '}' => {
                    return Err(self.error("Unexpected closing brace"));
                }
                _ => {
                    literal_buf.push(ch);
                    self.pos += ch.len_utf8();
                }
            }
        }

        if !literal_buf.is_empty() {
            sections.push(Section::Literal(literal_buf));
        }

        Ok(Template::new(sections))
    }

    fn parse_expression(&mut self) -> ParseResult<Expression> {
        let start = self.pos;
        self.expect_char('{')?;

        let operator = match self.peek_char() {
            Some(ch) => match Operator::from_char(ch) {
                Some(op) => {
                    self.pos += 1;
                    op
                }
                None if RESERVED_OPERATORS.contains(&ch) => {
                    return Err(self.error(format!("Operator '{}' is reserved", ch)));
                }
                None => Operator::None,
            },
            None => return Err(unterminated(start)),
        };

        let mut var_specs = Vec::new();
        loop {
            var_specs.push(self.parse_varspec(start)?);

            match self.peek_char() {
                Some(',') => self.pos += 1,
                Some('}') => {
                    self.pos += 1;
                    break;
                }
                Some(ch) => {
                    return Err(self.error(format!("Invalid character '{}' in expression", ch)));
                }
                None => return Err(unterminated(start)),
            }
        }

        Ok(Expression {
            operator,
            var_specs,
        })
    }

    fn parse_varspec(&mut self, expr_start: usize) -> ParseResult<VarSpec> {
        let name = self.parse_variable_name(expr_start)?;

        let modifier = match self.peek_char() {
            Some(':') => {
                self.pos += 1;
                Some(Modifier::Prefix(self.parse_max_length()?))
            }
            Some('*') => {
                self.pos += 1;
                Some(Modifier::Explode)
            }
            _ => None,
        };

        // Only one modifier per varspec
        if modifier.is_some() && matches!(self.peek_char(), Some(':') | Some('*')) {
            return Err(self.error(format!(
                "Variable '{}' cannot have both a max-length and an explode modifier",
                name
            )));
        }

        Ok(VarSpec { name, modifier })
    }

    fn parse_variable_name(&mut self, expr_start: usize) -> ParseResult<String> {
        let start = self.pos;
        let mut name = String::new();

        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                name.push(ch);
                self.pos += 1;
            } else if ch == '%' {
                let escape = self.parse_pct_encoded()?;
                name.push_str(&escape);
            } else if ch == '.' {
                if name.is_empty() || name.ends_with('.') {
                    return Err(self.error("Unexpected '.' in variable name"));
                }
                name.push(ch);
                self.pos += 1;
            } else {
                break;
            }
        }

        if name.is_empty() {
            return match self.peek_char() {
                None => Err(unterminated(expr_start)),
                Some(_) => Err(TemplateSyntaxError::new(start, "Empty variable name")),
            };
        }
        if name.ends_with('.') {
            return Err(TemplateSyntaxError::new(
                self.pos - 1,
                "Variable name cannot end with '.'",
            ));
        }

        Ok(name)
    }

    fn parse_pct_encoded(&mut self) -> ParseResult<String> {
        let start = self.pos;
        let triplet = self.input.get(self.pos..self.pos + 3);
        match triplet {
            Some(t) if t[1..].chars().all(|c| c.is_ascii_hexdigit()) => {
                self.pos += 3;
                Ok(t.to_string())
            }
            _ => Err(TemplateSyntaxError::new(
                start,
                "Malformed percent-encoding in variable name",
            )),
        }
    }

    fn parse_max_length(&mut self) -> ParseResult<usize> {
        let start = self.pos;
        let digits: String = self.input[self.pos..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        self.pos += digits.len();

        if digits.is_empty() {
            return Err(TemplateSyntaxError::new(
                start,
                "Expected digits after ':' for max-length",
            ));
        }
        if digits.starts_with('0') {
            return Err(TemplateSyntaxError::new(
                start,
                format!("Max-length '{}' must start with a non-zero digit", digits),
            ));
        }

        match digits.parse::<usize>() {
            Ok(len) if len <= MAX_PREFIX_LENGTH => Ok(len),
            _ => Err(TemplateSyntaxError::new(
                start,
                format!(
                    "Max-length '{}' is out of range (1-{})",
                    digits, MAX_PREFIX_LENGTH
                ),
            )),
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn expect_char(&mut self, expected: char) -> ParseResult<()> {
        match self.peek_char() {
            Some(ch) if ch == expected => {
                self.pos += ch.len_utf8();
                Ok(())
            }
            Some(ch) => Err(self.error(format!("Expected '{}' but found '{}'", expected, ch))),
            None => Err(self.error(format!("Expected '{}' but found end of input", expected))),
        }
    }

    fn error(&self, message: impl Into<String>) -> TemplateSyntaxError {
        TemplateSyntaxError::new(self.pos, message)
    }
}

fn unterminated(start: usize) -> TemplateSyntaxError {
    TemplateSyntaxError::new(start, "Unterminated expression, missing '}'")
}
