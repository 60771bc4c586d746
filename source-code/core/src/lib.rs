//! Translates scripts of one `[$var=]func(args);` call per line into PHP
//! where every name and string literal is rebuilt from `chr()` codes at
//! runtime.
//!
//! ```text
//! text → parser → classify (bindings) → encoder → emitter → assemble
//! ```

pub mod bindings;
pub mod classify;
pub mod decode;
pub mod emitter;
pub mod encoder;
pub mod error;
pub mod options;
pub mod parser;

use tracing::{debug, warn};

pub use bindings::{BindingTable, VariableBinding};
pub use classify::{classify, Argument, VariableRef};
pub use decode::{decode_chain, decode_program};
pub use emitter::{GeneratorState, PREAMBLE};
pub use encoder::{CharStyle, CodeStyle, EncodedField, SubOption, SubOptions};
pub use error::{ArgumentError, ConvertError, Malformed};
pub use options::{Options, Radix};
pub use parser::{parse_line, Line, RawStatement};

// ─────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────

/// Result of one run. `output` is always usable: on error it holds the
/// preamble plus everything generated before the failing line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub output: String,
    pub error: Option<ConvertError>,
    /// Statements that made it into `output`.
    pub statements: usize,
}

impl Conversion {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// `Ok(output)` or the halting error.
    pub fn into_result(self) -> Result<String, ConvertError> {
        match self.error {
            None => Ok(self.output),
            Some(err) => Err(err),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: Options,
}

impl Converter {
    pub fn new(options: Options) -> Self {
        Converter { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Convert with the radix and seed from the options.
    pub fn convert(&self, source: &str) -> Conversion {
        let mut style = CharStyle::new(self.options.radix, self.options.seed);
        self.convert_with(source, &mut style)
    }

    /// Convert with a caller-supplied radix strategy. Each call starts from
    /// fresh counters and bindings.
    pub fn convert_with(&self, source: &str, style: &mut dyn CodeStyle) -> Conversion {
        let mut state = GeneratorState::new();
        let mut bindings = BindingTable::with_predefined(&self.options.predefined);
        let mut statements = 0;
        let mut error = None;

        for (idx, raw) in source.lines().enumerate() {
            match self.convert_line(idx, raw, &mut state, &mut bindings, style) {
                Ok(true) => statements += 1,
                Ok(false) => {}
                Err(err) => {
                    warn!(line = idx, "conversion halted: {}", err);
                    error = Some(err);
                    break;
                }
            }
        }

        Conversion {
            output: state.assemble(&self.options.statement_separator),
            error,
            statements,
        }
    }

    fn convert_line(
        &self,
        idx: usize,
        raw: &str,
        state: &mut GeneratorState,
        bindings: &mut BindingTable,
        style: &mut dyn CodeStyle,
    ) -> Result<bool, ConvertError> {
        let stmt = match parse_line(raw, &self.options) {
            Ok(Line::Ignored) => return Ok(false),
            Ok(Line::Statement(stmt)) => stmt,
            Err(reason) => return Err(ConvertError::MalformedStatement { line: idx, reason }),
        };

        // Classify everything first so a bad argument leaves no trace.
        let args = stmt
            .args
            .iter()
            .map(|token| classify(token, bindings).map_err(|e| e.at(idx)))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(line = idx, function = stmt.function, args = args.len(), "statement");
        let captured = state.emit(stmt.function, &args, stmt.target.is_some(), style);
        if let (Some(name), Some(binding)) = (stmt.target.as_deref(), captured) {
            bindings.bind(name, binding);
        }
        Ok(true)
    }
}

/// Convert with default options.
pub fn convert(source: &str) -> Conversion {
    Converter::default().convert(source)
}
