use rustc_hash::FxHashMap;
use tracing::debug;

use crate::bindings::VariableBinding;
use crate::classify::{Argument, VariableRef};
use crate::encoder::{char_expr, CodeStyle, EncodedField, SubOptions};

/// Bootstrap: short-echo decoy, then `$_` becomes `chr` by xoring
/// characters out of `"INF-1.2Array"`.
pub const PREAMBLE: &str = "<?=0;$_=1/0..-1.2.[];$_=($_[1].$_[2]^$_[3].$_[5]).$_[8];";

/// First number handed out to fields and to result identifiers.
pub const COUNTER_BASE: u32 = 3;

/// Prefix of captured call results (`$__N`), kept apart from fields (`$_N`).
const RESULT_PREFIX: &str = "__";

/// Everything one run has generated so far.
#[derive(Debug)]
pub struct GeneratorState {
    field_counter: u32,
    result_counter: u32,
    declared: Vec<EncodedField>,
    /// (binding, sub-options) → index into `declared`.
    field_index: FxHashMap<(VariableBinding, SubOptions), usize>,
    calls: Vec<String>,
}

impl Default for GeneratorState {
    fn default() -> Self {
        GeneratorState {
            field_counter: COUNTER_BASE,
            result_counter: COUNTER_BASE,
            declared: Vec::new(),
            field_index: FxHashMap::default(),
            calls: Vec::new(),
        }
    }
}

impl GeneratorState {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn declared_fields(&self) -> &[EncodedField] {
        &self.declared
    }

    #[cfg(test)]
    pub fn emitted_calls(&self) -> &[String] {
        &self.calls
    }

    /// Allocate and declare a fresh field for `key`.
    pub fn encode(
        &mut self,
        key: &str,
        sub_options: SubOptions,
        style: &mut dyn CodeStyle,
    ) -> &EncodedField {
        let field = EncodedField::encode(self.field_counter, key, &sub_options, style);
        self.field_counter += 1;
        debug!(field = %field.field_name, key, "declared field");
        self.declared.push(field);
        &self.declared[self.declared.len() - 1]
    }

    /// Field for a variable reference, declared on first use only.
    fn field_for(&mut self, var: &VariableRef, style: &mut dyn CodeStyle) -> usize {
        let key = (var.binding.clone(), var.sub_options.clone());
        if let Some(&idx) = self.field_index.get(&key) {
            return idx;
        }
        self.encode(var.binding.identifier(), var.sub_options.clone(), style);
        let idx = self.declared.len() - 1;
        self.field_index.insert(key, idx);
        idx
    }

    fn next_result(&mut self) -> VariableBinding {
        let binding = VariableBinding::new(format!("{}{}", RESULT_PREFIX, self.result_counter));
        self.result_counter += 1;
        binding
    }

    /// Render one obfuscated call and append it. Returns the identifier
    /// holding the result when `captures_result` is set.
    pub fn emit(
        &mut self,
        function: &str,
        args: &[Argument],
        captures_result: bool,
        style: &mut dyn CodeStyle,
    ) -> Option<VariableBinding> {
        let target = captures_result.then(|| self.next_result());

        let callee = char_expr(function, style);
        let rendered: Vec<String> = args
            .iter()
            .map(|arg| match arg {
                Argument::Int(n) => n.to_string(),
                Argument::Bool(b) => String::from(if *b { "1" } else { "0" }),
                Argument::Str(s) => char_expr(s, style),
                Argument::Var(var) => {
                    let idx = self.field_for(var, style);
                    self.declared[idx].reference()
                }
            })
            .collect();

        let assignment = target.as_ref().map(|t| format!("{}=", t)).unwrap_or_default();
        let call = format!("{}({})({});", assignment, callee, rendered.join(","));
        debug!(function, captured = ?target, "emitted call");
        self.calls.push(call);

        target
    }

    /// Preamble, field declarations in first-use order, then calls in
    /// program order.
    pub fn assemble(&self, separator: &str) -> String {
        let body: Vec<&str> = self
            .declared
            .iter()
            .map(|f| f.field_content.as_str())
            .chain(self.calls.iter().map(String::as_str))
            .collect();

        let mut out = String::from(PREAMBLE);
        if !body.is_empty() {
            out.push_str(separator);
            out.push_str(&body.join(separator));
        }
        out
    }
}

// ─────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{CharStyle, SubOption};
    use smallvec::smallvec;

    fn var(id: &str) -> Argument {
        Argument::Var(VariableRef { binding: VariableBinding::new(id), sub_options: SubOptions::new() })
    }

    #[test]
    fn empty_state_is_bare_preamble() {
        assert_eq!(GeneratorState::new().assemble(""), PREAMBLE);
        assert_eq!(GeneratorState::new().assemble("\n"), PREAMBLE);
    }

    #[test]
    fn uncaptured_call_with_literals() {
        let mut state = GeneratorState::new();
        let style = &mut CharStyle::Decimal;
        let out = state.emit("f", &[Argument::Int(1), Argument::Bool(true), Argument::Str("a".into())], false, style);
        assert_eq!(out, None);
        assert_eq!(state.emitted_calls(), &["($_(102))(1,1,$_(97));".to_string()]);
        assert!(state.declared_fields().is_empty());
    }

    #[test]
    fn captured_calls_count_up_from_base() {
        let mut state = GeneratorState::new();
        let style = &mut CharStyle::Decimal;
        let a = state.emit("f", &[], true, style);
        let b = state.emit("f", &[], true, style);
        assert_eq!(a, Some(VariableBinding::new("__3")));
        assert_eq!(b, Some(VariableBinding::new("__4")));
        assert_eq!(state.emitted_calls()[0], "$__3=($_(102))();");
    }

    #[test]
    fn variable_fields_are_declared_once() {
        let mut state = GeneratorState::new();
        let style = &mut CharStyle::Decimal;
        state.emit("f", &[var("__3"), var("__3")], false, style);
        state.emit("g", &[var("__3"), var("_GET")], false, style);
        let names: Vec<_> = state.declared_fields().iter().map(|f| f.field_name.as_str()).collect();
        assert_eq!(names, vec!["$_3", "$_4"]);
        assert_eq!(state.emitted_calls()[0], "($_(102))(${$_3},${$_3});");
        assert_eq!(state.emitted_calls()[1], "($_(103))(${$_3},${$_4});");
    }

    #[test]
    fn different_sub_options_get_their_own_field() {
        let mut state = GeneratorState::new();
        let style = &mut CharStyle::Decimal;
        let indexed = Argument::Var(VariableRef {
            binding: VariableBinding::new("_GET"),
            sub_options: smallvec![SubOption::Int(0)],
        });
        state.emit("f", &[var("_GET"), indexed], false, style);
        assert_eq!(state.declared_fields().len(), 2);
        assert_eq!(state.emitted_calls()[0], "($_(102))(${$_3},${$_4}[0]);");
    }

    #[test]
    fn explicit_encode_always_allocates() {
        let mut state = GeneratorState::new();
        let style = &mut CharStyle::Decimal;
        let first = state.encode("k", SubOptions::new(), style).field_name.clone();
        let second = state.encode("k", SubOptions::new(), style).field_name.clone();
        assert_eq!(first, "$_3");
        assert_eq!(second, "$_4");
    }

    #[test]
    fn assemble_orders_fields_before_calls() {
        let mut state = GeneratorState::new();
        let style = &mut CharStyle::Decimal;
        state.emit("f", &[var("x")], false, style);
        let expected = format!("{}$_3=$_(120);($_(102))(${{$_3}});", PREAMBLE);
        assert_eq!(state.assemble(""), expected);
        let expected = format!("{}\n$_3=$_(120);\n($_(102))(${{$_3}});", PREAMBLE);
        assert_eq!(state.assemble("\n"), expected);
    }
}
