use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;

use crate::options::Radix;

// ─────────────────────────────────────────────────────────────
// Character table
// ─────────────────────────────────────────────────────────────

/// Generated-program variable holding `chr` after the preamble runs.
pub const CHAR_TABLE: &str = "$_";

/// Picks octal or decimal for each emitted character code. Purely cosmetic:
/// both spellings evaluate to the same byte.
pub trait CodeStyle {
    fn octal(&mut self, byte: u8) -> bool;
}

#[derive(Debug, Clone)]
pub enum CharStyle {
    Decimal,
    Octal,
    Mixed(StdRng),
}

impl CharStyle {
    pub fn new(radix: Radix, seed: Option<u64>) -> Self {
        match radix {
            Radix::Decimal => CharStyle::Decimal,
            Radix::Octal => CharStyle::Octal,
            Radix::Mixed => CharStyle::Mixed(match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            }),
        }
    }
}

impl CodeStyle for CharStyle {
    fn octal(&mut self, _byte: u8) -> bool {
        match self {
            CharStyle::Decimal => false,
            CharStyle::Octal => true,
            CharStyle::Mixed(rng) => rng.random_bool(0.5),
        }
    }
}

/// `$_(99)` or `$_(0143)`.
pub fn char_term(byte: u8, style: &mut dyn CodeStyle) -> String {
    if style.octal(byte) {
        format!("{}(0{:o})", CHAR_TABLE, byte)
    } else {
        format!("{}({})", CHAR_TABLE, byte)
    }
}

/// Expression rebuilding `text` byte by byte. Empty text is `''`.
pub fn char_expr(text: &str, style: &mut dyn CodeStyle) -> String {
    if text.is_empty() {
        return "''".to_string();
    }
    text.bytes()
        .map(|b| char_term(b, style))
        .collect::<Vec<_>>()
        .join(".")
}

// ─────────────────────────────────────────────────────────────
// Sub-options
// ─────────────────────────────────────────────────────────────

/// Index applied to a field, e.g. the `'x'` in `$_GET['x']`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubOption {
    Str(String),
    Int(i64),
    Bool(bool),
}

pub type SubOptions = SmallVec<[SubOption; 2]>;

pub fn render_sub_options(sub_options: &[SubOption], style: &mut dyn CodeStyle) -> String {
    sub_options
        .iter()
        .map(|opt| match opt {
            SubOption::Int(n) => format!("[{}]", n),
            SubOption::Str(s) => format!("[{}]", char_expr(s, style)),
            SubOption::Bool(b) => format!("[{}]", if *b { 1 } else { 0 }),
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────
// Fields
// ─────────────────────────────────────────────────────────────

/// A `$_N` variable of the generated program holding an encoded string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedField {
    /// `$_N`.
    pub field_name: String,
    /// `$_N=<expr>;`.
    pub field_content: String,
    /// Rendered `[key]` indices, fixed at encode time.
    pub suffix: String,
}

impl EncodedField {
    pub fn encode(
        number: u32,
        key: &str,
        sub_options: &[SubOption],
        style: &mut dyn CodeStyle,
    ) -> Self {
        let field_name = format!("{}{}", CHAR_TABLE, number);
        let field_content = format!("{}={};", field_name, char_expr(key, style));
        let suffix = render_sub_options(sub_options, style);
        EncodedField { field_name, field_content, suffix }
    }

    /// Variable-variable lookup of the name this field holds.
    pub fn reference(&self) -> String {
        format!("${{{}}}{}", self.field_name, self.suffix)
    }
}
