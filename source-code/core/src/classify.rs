use crate::bindings::{BindingTable, VariableBinding};
use crate::encoder::{SubOption, SubOptions};
use crate::error::ArgumentError;

/// A classified call argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Str(String),
    Int(i64),
    Bool(bool),
    Var(VariableRef),
}

/// Resolved variable plus any `[key]` indices applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableRef {
    pub binding: VariableBinding,
    pub sub_options: SubOptions,
}

/// Strip the first and last character. No escape processing.
fn unquote(token: &str) -> String {
    let mut chars = token.chars();
    chars.next();
    chars.next_back();
    chars.as_str().to_string()
}

fn parse_bool(token: &str) -> Option<bool> {
    if token.eq_ignore_ascii_case("true") {
        Some(true)
    } else if token.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_int(token: &str) -> Result<i64, ArgumentError> {
    token
        .parse::<i64>()
        .map_err(|_| ArgumentError::NotANumber(token.to_string()))
}

pub fn classify(token: &str, bindings: &BindingTable) -> Result<Argument, ArgumentError> {
    match token.chars().next() {
        // An empty argument falls through to the number rule.
        None => Err(ArgumentError::NotANumber(String::new())),
        Some('\'' | '"') => Ok(Argument::Str(unquote(token))),
        Some('$') => classify_variable(token, bindings).map(Argument::Var),
        Some(_) => match parse_bool(token) {
            Some(b) => Ok(Argument::Bool(b)),
            None => parse_int(token).map(Argument::Int),
        },
    }
}

fn classify_variable(token: &str, bindings: &BindingTable) -> Result<VariableRef, ArgumentError> {
    let rest = &token[1..];
    let (name, suffix) = match rest.find('[') {
        Some(i) => rest.split_at(i),
        None => (rest, ""),
    };

    let name: String = name.chars().filter(|c| !c.is_whitespace()).collect();
    let binding = bindings
        .resolve(&name)
        .cloned()
        .ok_or(ArgumentError::UndefinedVariable(name))?;

    let sub_options = parse_sub_options(suffix)
        .ok_or_else(|| ArgumentError::UnknownShape(token.to_string()))?
        .into_iter()
        .map(classify_sub_option)
        .collect::<Result<SubOptions, _>>()?;

    Ok(VariableRef { binding, sub_options })
}

/// `['a'][0]` → `["'a'", "0"]`. `None` on unbalanced brackets or stray text.
fn parse_sub_options(suffix: &str) -> Option<Vec<&str>> {
    let mut keys = Vec::new();
    let mut rest = suffix.trim();

    while !rest.is_empty() {
        let body = rest.strip_prefix('[')?;
        let mut quote: Option<char> = None;
        let mut end = None;
        for (i, c) in body.char_indices() {
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '\'' | '"') => quote = Some(c),
                (None, ']') => {
                    end = Some(i);
                    break;
                }
                _ => {}
            }
        }
        let end = end?;
        keys.push(body[..end].trim());
        rest = body[end + 1..].trim_start();
    }

    Some(keys)
}

fn classify_sub_option(key: &str) -> Result<SubOption, ArgumentError> {
    match key.chars().next() {
        None => Err(ArgumentError::UnknownShape("[]".to_string())),
        Some('\'' | '"') => Ok(SubOption::Str(unquote(key))),
        Some(_) => match parse_bool(key) {
            Some(b) => Ok(SubOption::Bool(b)),
            None => parse_int(key).map(SubOption::Int),
        },
    }
}
