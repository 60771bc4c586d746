use rustc_hash::FxHashMap;
use std::fmt;

/// Name of a generated-program variable, without the leading `$`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableBinding(String);

impl VariableBinding {
    pub fn new(identifier: impl Into<String>) -> Self {
        VariableBinding(identifier.into())
    }

    pub fn identifier(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariableBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// Script variable name → generated identifier, for one run.
#[derive(Debug, Default)]
pub struct BindingTable {
    map: FxHashMap<String, VariableBinding>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table where every name in `names` resolves to itself.
    pub fn with_predefined<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for name in names {
            let name = name.as_ref();
            table.bind(name, VariableBinding::new(name));
        }
        table
    }

    /// Later assignments to the same name shadow earlier ones.
    pub fn bind(&mut self, name: &str, binding: VariableBinding) {
        self.map.insert(name.to_string(), binding);
    }

    pub fn resolve(&self, name: &str) -> Option<&VariableBinding> {
        self.map.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predefined_resolve_to_themselves() {
        let table = BindingTable::with_predefined(["_GET", "_POST"]);
        assert_eq!(table.resolve("_GET"), Some(&VariableBinding::new("_GET")));
        assert_eq!(table.resolve("cmd"), None);
        assert_eq!(table.resolve("_POST"), Some(&VariableBinding::new("_POST")));
    }

    #[test]
    fn rebinding_shadows() {
        let mut table = BindingTable::new();
        table.bind("x", VariableBinding::new("__3"));
        table.bind("x", VariableBinding::new("__4"));
        assert_eq!(table.resolve("x").map(|b| b.identifier()), Some("__4"));
        assert_eq!(VariableBinding::new("__4").to_string(), "$__4");
    }
}
