use crate::error::Malformed;
use crate::options::Options;

// ─────────────────────────────────────────────────────────────
// Line parser — one `[$name=]func(arg, ...);` per line
// ─────────────────────────────────────────────────────────────

/// One call statement, arguments still raw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStatement<'a> {
    /// Assignment target with `$` and whitespace removed.
    pub target: Option<String>,
    pub function: &'a str,
    /// Trimmed argument tokens, in order.
    pub args: Vec<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    /// Comment or blank line.
    Ignored,
    Statement(RawStatement<'a>),
}

fn is_horizontal_ws(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn trim_horizontal(s: &str) -> &str {
    s.trim_matches(is_horizontal_ws)
}

/// `//` not followed by `*`. A bare `//` line is a comment as well, where a
/// strict `//[^*]` match would reject it as a malformed statement.
fn is_comment(line: &str) -> bool {
    line.strip_prefix("//")
        .map_or(false, |rest| !rest.starts_with('*'))
}

/// PHP label: `[A-Za-z_\x80-\xff][A-Za-z0-9_\x80-\xff]*`, plus `extra`.
fn is_identifier(name: &str, extra: &[char]) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || !c.is_ascii() || extra.contains(&c) => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii() || extra.contains(&c))
}

pub fn parse_line<'a>(raw: &'a str, options: &Options) -> Result<Line<'a>, Malformed> {
    let line = trim_horizontal(raw.strip_suffix('\r').unwrap_or(raw));

    if line.is_empty() && options.skip_blank_lines {
        return Ok(Line::Ignored);
    }
    if options.skip_comments && is_comment(line) {
        return Ok(Line::Ignored);
    }

    let body = line.strip_suffix(");").ok_or(Malformed::MissingTerminator)?;

    // $target = ...
    let (target, call) = match body.strip_prefix('$') {
        Some(rest) => {
            let (name, call) = rest.split_once('=').ok_or(Malformed::MissingAssignment)?;
            let name: String = name.chars().filter(|c| !c.is_whitespace()).collect();
            if !is_identifier(&name, &[]) {
                return Err(Malformed::InvalidTarget(name));
            }
            (Some(name), call)
        }
        None => (None, body),
    };

    let (function, args) = call.split_once('(').ok_or(Malformed::MissingOpenParen)?;
    let function = trim_horizontal(function);
    if !is_identifier(function, &['\\']) {
        return Err(Malformed::InvalidFunctionName(function.to_string()));
    }

    Ok(Line::Statement(RawStatement {
        target,
        function,
        args: split_arguments(args)?,
    }))
}

/// Split on top-level commas. Commas inside quotes or `[...]` stay put.
///
/// A quote only opens a literal at the start of an argument or right after
/// `[`; an apostrophe inside a bare word (`it's`) is plain text.
pub fn split_arguments(src: &str) -> Result<Vec<&str>, Malformed> {
    if trim_horizontal(src).is_empty() {
        return Ok(Vec::new());
    }

    let mut args = Vec::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut start = 0;
    // last non-blank char of the current argument
    let mut prev: Option<char> = None;

    for (i, c) in src.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => continue,
            (None, '\'' | '"') if matches!(prev, None | Some('[')) => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                args.push(trim_horizontal(&src[start..i]));
                start = i + 1;
                prev = None;
                continue;
            }
            _ => {}
        }
        if !is_horizontal_ws(c) {
            prev = Some(c);
        }
    }
    if quote.is_some() {
        return Err(Malformed::UnterminatedString);
    }
    args.push(trim_horizontal(&src[start..]));

    Ok(args)
}
