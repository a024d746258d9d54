//! Global parameter scope extraction and value resolution.

use std::collections::HashMap;

use netgraph_core::units;

use crate::error::{Error, Result};

/// How unresolved values and references are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionMode {
    /// Unresolved values default to 0.0; unknown subcircuit references are
    /// skipped with a warning. Always produces a graph from best-effort
    /// input.
    #[default]
    Lenient,
    /// Unresolved values and unknown subcircuit references are errors.
    Strict,
}

/// Read-only mapping of parameter name to resolved numeric value.
///
/// Built once per input; later definitions shadow earlier ones in textual
/// order. There is no forward-reference resolution.
#[derive(Debug, Clone, Default)]
pub struct ParameterScope {
    values: HashMap<String, f64>,
}

impl ParameterScope {
    /// Scan all `parameters key=value ...` statements in encountered order,
    /// resolving each value against the scope as built so far.
    pub fn extract(text: &str, mode: ResolutionMode) -> Result<Self> {
        let mut scope = ParameterScope::default();
        for line in text.lines() {
            let line = line.trim();
            let Some(rest) = line.strip_prefix("parameters") else {
                continue;
            };
            if !rest.starts_with(char::is_whitespace) {
                continue;
            }
            for token in rest.split_whitespace() {
                let Some((key, value)) = token.split_once('=') else {
                    continue;
                };
                if key.is_empty() {
                    continue;
                }
                let resolved = resolve_in(&scope.values, value, mode)?;
                scope.values.insert(key.to_string(), resolved);
            }
        }
        Ok(scope)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The underlying name-to-value map, as consumed by the graph builder.
    pub fn values(&self) -> &HashMap<String, f64> {
        &self.values
    }

    /// A resolver reading this scope with the given mode.
    pub fn resolver(&self, mode: ResolutionMode) -> Resolver<'_> {
        Resolver { scope: self, mode }
    }
}

/// Resolves parameter references and numeric literals against a scope.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    scope: &'a ParameterScope,
    mode: ResolutionMode,
}

impl Resolver<'_> {
    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    pub fn scope(&self) -> &ParameterScope {
        self.scope
    }

    /// Resolve a token: scope entry first, then numeric literal with an
    /// optional engineering suffix. Unresolvable tokens yield 0.0 in
    /// lenient mode and an error in strict mode.
    pub fn resolve(&self, token: &str) -> Result<f64> {
        resolve_in(&self.scope.values, token, self.mode)
    }

    /// Resolve a token without defaulting: `None` when it is neither a
    /// scope entry nor a numeric literal.
    pub fn lookup(&self, token: &str) -> Option<f64> {
        let token = token.trim();
        self.scope.get(token).or_else(|| units::parse_raw(token))
    }
}

fn resolve_in(values: &HashMap<String, f64>, token: &str, mode: ResolutionMode) -> Result<f64> {
    let token = token.trim();
    if let Some(v) = values.get(token) {
        return Ok(*v);
    }
    if let Some(v) = units::parse_raw(token) {
        return Ok(v);
    }
    match mode {
        ResolutionMode::Lenient => Ok(0.0),
        ResolutionMode::Strict => Err(Error::UnresolvedValue(token.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_pairs() {
        let scope = ParameterScope::extract(
            "simulator lang=spectre\nparameters rload=2.2k cap=10n\n",
            ResolutionMode::Lenient,
        )
        .unwrap();
        assert_eq!(scope.get("rload"), Some(2200.0));
        assert_eq!(scope.get("cap"), Some(1e-8));
        // "lang=spectre" sits on a directive line, not a parameters line.
        assert!(!scope.contains("lang"));
    }

    #[test]
    fn test_sequential_resolution_no_forward_refs() {
        let scope = ParameterScope::extract(
            "parameters a=1k b=a\nparameters c=d d=5\n",
            ResolutionMode::Lenient,
        )
        .unwrap();
        assert_eq!(scope.get("a"), Some(1000.0));
        assert_eq!(scope.get("b"), Some(1000.0));
        // d is defined after c, so c cannot see it.
        assert_eq!(scope.get("c"), Some(0.0));
        assert_eq!(scope.get("d"), Some(5.0));
    }

    #[test]
    fn test_later_definitions_shadow() {
        let scope =
            ParameterScope::extract("parameters a=1\nparameters a=2\n", ResolutionMode::Lenient)
                .unwrap();
        assert_eq!(scope.get("a"), Some(2.0));
    }

    #[test]
    fn test_lenient_defaults_to_zero() {
        let scope = ParameterScope::default();
        let r = scope.resolver(ResolutionMode::Lenient);
        assert_eq!(r.resolve("bogus").unwrap(), 0.0);
    }

    #[test]
    fn test_strict_fails_on_unresolved() {
        let scope = ParameterScope::default();
        let r = scope.resolver(ResolutionMode::Strict);
        assert!(matches!(r.resolve("bogus"), Err(Error::UnresolvedValue(_))));
        assert_eq!(r.resolve("5x").unwrap(), 5.0);
    }

    #[test]
    fn test_strict_extract_fails() {
        assert!(ParameterScope::extract("parameters a=nope\n", ResolutionMode::Strict).is_err());
    }

    #[test]
    fn test_lookup_does_not_default() {
        let scope =
            ParameterScope::extract("parameters vdd=1.8\n", ResolutionMode::Lenient).unwrap();
        let r = scope.resolver(ResolutionMode::Lenient);
        assert_eq!(r.lookup("vdd"), Some(1.8));
        assert_eq!(r.lookup("2.2k"), Some(2200.0));
        assert_eq!(r.lookup("bogus"), None);
    }
}
