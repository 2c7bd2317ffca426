//! Template text: `${name}`, `${name:type}`, `${name:type(p1, 'p 2')}` and `$$`.

use crate::error::{Result, TemplateError};
use once_cell::sync::Lazy;
use regex::Regex;

static VARIABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\A\$\{\s*(?P<name>\w*)\s*(?::\s*(?P<type>[\w.]+)\s*(?:\((?P<params>(?:'(?:[^']|'')*'|[^)'])*)\))?\s*)?\}",
    )
    .expect("template variable pattern must compile")
});

/// Variables whose name doubles as their type when no type is given.
const LEGACY_TYPES: &[&str] = &[
    "array",
    "array_type",
    "array_element",
    "iterable",
    "iterable_type",
    "iterable_element",
    "collection",
    "index",
    "cursor",
];

/// A variable of the template, with every place it occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVariable {
    pub name: String,
    /// Resolver type, e.g. `iterableVar` in `${list:iterableVar}`.
    pub type_name: Option<String>,
    pub params: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    /// Occurrence of `variables[index]`.
    Variable(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTemplate {
    pub segments: Vec<Segment>,
    /// Variables in order of first occurrence.
    pub variables: Vec<TemplateVariable>,
}

impl ParsedTemplate {
    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.variables.iter().position(|v| v.name == name)
    }
}

pub fn parse_template(template: &str) -> Result<ParsedTemplate> {
    let mut segments = Vec::new();
    let mut variables: Vec<TemplateVariable> = Vec::new();
    let mut text = String::new();
    let mut pos = 0;

    while let Some(found) = template[pos..].find('$') {
        let start = pos + found;
        text.push_str(&template[pos..start]);
        let rest = &template[start..];

        if rest.starts_with("$$") {
            text.push('$');
            pos = start + 2;
            continue;
        }

        let Some(caps) = VARIABLE.captures(rest) else {
            let message = if rest.starts_with("${") {
                "malformed variable"
            } else {
                "single dollar sign, use $$ for a literal $"
            };
            return Err(TemplateError::Syntax {
                offset: start,
                message: message.to_string(),
            });
        };

        let name = caps.name("name").map_or("", |m| m.as_str()).to_string();
        if name.is_empty() {
            return Err(TemplateError::Syntax {
                offset: start,
                message: "variable without a name".to_string(),
            });
        }
        let type_name = caps
            .name("type")
            .map(|m| m.as_str().to_string())
            .or_else(|| LEGACY_TYPES.contains(&name.as_str()).then(|| name.clone()));
        let params = match caps.name("params") {
            Some(m) => split_params(m.as_str()),
            None => Vec::new(),
        };

        let index = match variables.iter().position(|v| v.name == name) {
            Some(index) => {
                let existing = &mut variables[index];
                if caps.name("type").is_some() {
                    if existing.type_name.is_some() && existing.type_name != type_name {
                        return Err(TemplateError::Syntax {
                            offset: start,
                            message: format!("variable `{}` declared with two types", name),
                        });
                    }
                    existing.type_name = type_name;
                    if existing.params.is_empty() {
                        existing.params = params;
                    }
                }
                index
            }
            None => {
                variables.push(TemplateVariable {
                    name,
                    type_name,
                    params,
                });
                variables.len() - 1
            }
        };

        if !text.is_empty() {
            segments.push(Segment::Text(std::mem::take(&mut text)));
        }
        segments.push(Segment::Variable(index));
        pos = start + caps.get(0).map_or(1, |m| m.end());
    }

    text.push_str(&template[pos..]);
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }

    Ok(ParsedTemplate {
        segments,
        variables,
    })
}

/// Split a parameter list on top-level commas; quoted parameters lose their quotes.
fn split_params(params: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut depth = 0usize;
    let mut chars = params.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' if quoted => {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    current.push('\'');
                } else {
                    quoted = false;
                }
            }
            '\'' => quoted = true,
            '<' if !quoted => {
                depth += 1;
                current.push(c);
            }
            '>' if !quoted => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if !quoted && depth == 0 => {
                result.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() || !result.is_empty() {
        result.push(current.trim().to_string());
    }
    result
}
