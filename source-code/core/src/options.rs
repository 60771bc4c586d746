use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// PHP superglobals a script may reference without assigning them first.
pub const SUPERGLOBALS: &[&str] = &[
    "GLOBALS", "_SERVER", "_GET", "_POST", "_FILES", "_COOKIE", "_SESSION", "_REQUEST", "_ENV",
];

/// How character codes are written in `$_(N)` terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Radix {
    Decimal,
    Octal,
    /// Coin flip per character.
    #[default]
    Mixed,
}

impl FromStr for Radix {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "decimal" | "dec" => Ok(Radix::Decimal),
            "octal" | "oct" => Ok(Radix::Octal),
            "mixed" | "random" => Ok(Radix::Mixed),
            other => Err(format!("unknown radix '{}' (expected decimal, octal or mixed)", other)),
        }
    }
}

impl fmt::Display for Radix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Radix::Decimal => "decimal",
            Radix::Octal => "octal",
            Radix::Mixed => "mixed",
        })
    }
}

/// Knobs for one conversion. Missing keys in a config file fall back to
/// [`Options::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Drop `//` comment lines instead of treating them as statements.
    pub skip_comments: bool,
    /// Drop empty and whitespace-only lines.
    pub skip_blank_lines: bool,
    pub radix: Radix,
    /// Seed for the mixed radix; `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Placed between field declarations and calls in the output.
    pub statement_separator: String,
    /// Variable names that resolve to themselves without an assignment.
    pub predefined: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            skip_comments: true,
            skip_blank_lines: true,
            radix: Radix::Mixed,
            seed: None,
            statement_separator: String::new(),
            predefined: SUPERGLOBALS.iter().map(|s| s.to_string()).collect(),
        }
    }
}
