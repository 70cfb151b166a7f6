//! Lexical scope tracking for slot identifiers and translator tags.
//!
//! Tracks bindings with proper scope handling for nested functions, arrow
//! functions, and blocks. Declarations are hoisted into their scope before
//! the scope body is visited, so a slot can reference a `const` declared
//! further down the enclosing block.
//!
//! # Example
//! ```ignore
//! const count: number = 1;           // scope 0: count -> Value(number)
//! function render(name: string) {    // push scope 1: name -> Value(string)
//!     t`${name} has ${count}`;       // name from scope 1, count from scope 0
//! }                                  // pop scope 1
//! ```

use std::collections::HashMap;

use swc_ecma_ast::{ObjectPatProp, Pat};

use crate::core::data::ParamType;

/// What a name in scope refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// A variable, parameter, class, or enum with its best-known type.
    Value(ParamType),
    /// A function with its declared return type.
    Function { return_type: ParamType },
    /// The designated translator function (declared here or imported).
    Translator,
    /// A namespace import of the translator's declaring file.
    TranslatorNamespace,
}

impl Binding {
    /// Type of the binding when used as a value.
    pub fn value_type(&self) -> ParamType {
        match self {
            Binding::Value(ty) => ty.clone(),
            Binding::Function { .. } | Binding::Translator | Binding::TranslatorNamespace => {
                ParamType::Unknown
            }
        }
    }
}

/// Stack of binding scopes (innermost last).
#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<HashMap<String, Binding>>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// Create a new ScopeStack with a single module scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    /// Enter a new scope (e.g., when entering a function body).
    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Exit the current scope. Keeps at least the module scope.
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Insert a binding in the current (innermost) scope.
    pub fn insert(&mut self, name: impl Into<String>, binding: Binding) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.into(), binding);
        }
    }

    /// Insert a binding only if the current scope does not already declare the name.
    ///
    /// Used for hoisting, where an explicit translator binding must not be
    /// replaced by the plain declaration of the same function.
    pub fn insert_if_absent(&mut self, name: impl Into<String>, binding: Binding) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.entry(name.into()).or_insert(binding);
        }
    }

    /// Look up a binding by name, searching from innermost to outermost scope.
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

/// Collect every name bound by a pattern.
pub fn binding_names(pat: &Pat) -> Vec<String> {
    match pat {
        Pat::Ident(ident) => vec![ident.id.sym.to_string()],
        Pat::Object(obj) => obj
            .props
            .iter()
            .flat_map(|prop| match prop {
                ObjectPatProp::KeyValue(kv) => binding_names(&kv.value),
                ObjectPatProp::Assign(assign) => vec![assign.key.sym.to_string()],
                ObjectPatProp::Rest(rest) => binding_names(&rest.arg),
            })
            .collect(),
        Pat::Array(arr) => arr.elems.iter().flatten().flat_map(binding_names).collect(),
        Pat::Assign(assign) => binding_names(&assign.left),
        Pat::Rest(rest) => binding_names(&rest.arg),
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_new_has_module_scope() {
        let scopes = ScopeStack::new();
        assert_eq!(scopes.depth(), 1);
    }

    #[test]
    fn test_exit_scope_keeps_module_scope() {
        let mut scopes = ScopeStack::new();
        scopes.exit_scope();
        assert_eq!(scopes.depth(), 1);
    }

    #[test]
    fn test_inner_scope_shadows_outer() {
        let mut scopes = ScopeStack::new();
        scopes.insert("t", Binding::Translator);
        scopes.enter_scope();
        scopes.insert("t", Binding::Value(ParamType::known("string")));

        assert_eq!(
            scopes.get("t"),
            Some(&Binding::Value(ParamType::known("string")))
        );

        scopes.exit_scope();
        assert_eq!(scopes.get("t"), Some(&Binding::Translator));
    }

    #[test]
    fn test_insert_if_absent_keeps_existing() {
        let mut scopes = ScopeStack::new();
        scopes.insert("t", Binding::Translator);
        scopes.insert_if_absent(
            "t",
            Binding::Function {
                return_type: ParamType::known("string"),
            },
        );
        assert_eq!(scopes.get("t"), Some(&Binding::Translator));
    }

    #[test]
    fn test_value_type() {
        assert_eq!(
            Binding::Value(ParamType::known("number")).value_type(),
            ParamType::known("number")
        );
        assert_eq!(Binding::Translator.value_type(), ParamType::Unknown);
    }

    #[test]
    fn test_missing_binding() {
        let scopes = ScopeStack::new();
        assert_eq!(scopes.get("missing"), None);
    }
}
