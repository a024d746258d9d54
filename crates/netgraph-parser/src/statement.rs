//! Per-statement component parsing.

use std::collections::{BTreeMap, HashMap};

use log::debug;

use netgraph_core::units;
use netgraph_core::{ComponentInstance, ComponentType, Sizing, Terminal};

use crate::error::Result;
use crate::scope::Resolver;

/// Mapping of subcircuit port names to the nets bound at the
/// instantiation site.
pub type PortMap = HashMap<String, String>;

/// Parse one netlist statement into a component instance.
///
/// Returns `Ok(None)` for blank lines, comment-only lines, and statements
/// with no recognizable primitive-type keyword. `prefix` is the instance
/// path for subcircuit bodies; top-level statements pass `None` and keep
/// their name unqualified.
pub fn parse_statement(
    line: &str,
    port_map: &PortMap,
    resolver: &Resolver<'_>,
    prefix: Option<&str>,
) -> Result<Option<ComponentInstance>> {
    // Strip trailing inline comment.
    let line = line.split('*').next().unwrap_or("").trim();
    if line.is_empty() {
        return Ok(None);
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();

    let Some((type_idx, ctype)) = tokens
        .iter()
        .enumerate()
        .find_map(|(i, t)| ComponentType::from_keyword(t).map(|c| (i, c)))
    else {
        debug!("skipping statement with no primitive type keyword: {line}");
        return Ok(None);
    };

    let name = match prefix {
        Some(p) => format!("{}_{}", p, tokens[0]),
        None => tokens[0].to_string(),
    };

    // Net span: everything between the name and the type keyword, with
    // parentheses stripped. Port-mapped names are remapped; everything
    // else is a literal global net reference.
    let mut nets: Vec<String> = Vec::new();
    for tok in &tokens[1..type_idx] {
        let cleaned = tok.replace(['(', ')'], "");
        for net in cleaned.split_whitespace() {
            if net.is_empty() {
                continue;
            }
            let mapped = port_map
                .get(net)
                .cloned()
                .unwrap_or_else(|| net.to_string());
            nets.push(mapped);
        }
    }

    let param_tokens = &tokens[type_idx + 1..];
    let raw_params = collect_raw_params(param_tokens);

    let length = resolve_param(&raw_params, "l", resolver)?;
    let mut width = resolve_param(&raw_params, "nfin", resolver)?;
    if width == 0.0 {
        width = resolve_param(&raw_params, "w", resolver)?;
    }
    let mut resistance = resolve_param(&raw_params, "nR", resolver)?;
    if resistance == 0.0 {
        resistance = resolve_param(&raw_params, "r", resolver)?;
    }
    let mut capacitance = resolve_param(&raw_params, "nC", resolver)?;
    if capacitance == 0.0 {
        capacitance = resolve_param(&raw_params, "c", resolver)?;
    }
    let dc = resolve_param(&raw_params, "dc", resolver)?;

    // Positional fallback: a resistor or capacitor written without a named
    // value takes the first unnamed token that resolves to a positive
    // number.
    if ctype == ComponentType::Resistor
        && !raw_params.contains_key("nR")
        && !raw_params.contains_key("r")
    {
        resistance = positional_value(param_tokens, resolver);
    }
    if ctype == ComponentType::Capacitor
        && !raw_params.contains_key("nC")
        && !raw_params.contains_key("c")
    {
        capacitance = positional_value(param_tokens, resolver);
    }

    // A voltage source whose dc value is a named reference keeps the
    // original token so the symbolic label can be displayed later.
    let dc_param = match raw_params.get("dc") {
        Some(raw) if ctype == ComponentType::VSource && units::parse_raw(raw).is_none() => {
            Some(raw.clone())
        }
        _ => None,
    };

    // Roles are positional and type-determined; zipping drops both missing
    // terminals and surplus net tokens beyond the type's arity.
    let terminals: Vec<Terminal> = ctype
        .terminal_roles()
        .iter()
        .zip(nets.iter())
        .map(|(role, net)| Terminal {
            role: *role,
            net: net.clone(),
        })
        .collect();

    Ok(Some(ComponentInstance {
        name,
        ctype,
        terminals,
        sizing: Sizing {
            length,
            width,
            resistance,
            capacitance,
            dc,
            dc_param,
            raw_params,
        },
    }))
}

/// Reassemble the parameter span into `key=value` assignments. A value may
/// span multiple whitespace-separated tokens; tokens accumulate until the
/// next `key=` marker or the end of the span.
fn collect_raw_params(tokens: &[&str]) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    let mut current: Option<(String, Vec<String>)> = None;

    for tok in tokens {
        if let Some((key, first)) = split_assignment(tok) {
            if let Some((k, vals)) = current.take() {
                params.insert(k, vals.join(" "));
            }
            let mut vals = Vec::new();
            if !first.is_empty() {
                vals.push(first.to_string());
            }
            current = Some((key.to_string(), vals));
        } else if let Some((_, vals)) = current.as_mut() {
            vals.push((*tok).to_string());
        }
    }
    if let Some((k, vals)) = current {
        params.insert(k, vals.join(" "));
    }
    params
}

/// Split a token at `=` when the left side is a plain identifier.
fn split_assignment(token: &str) -> Option<(&str, &str)> {
    let (key, value) = token.split_once('=')?;
    let mut chars = key.chars();
    let first = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some((key, value))
}

fn resolve_param(
    raw: &BTreeMap<String, String>,
    key: &str,
    resolver: &Resolver<'_>,
) -> Result<f64> {
    match raw.get(key) {
        Some(value) => resolver.resolve(value),
        None => Ok(0.0),
    }
}

/// First unnamed token in the parameter span that resolves to a positive
/// number. Tokens that resolve to nothing are skipped regardless of mode.
fn positional_value(tokens: &[&str], resolver: &Resolver<'_>) -> f64 {
    tokens
        .iter()
        .filter(|t| !t.contains('='))
        .filter_map(|t| resolver.lookup(t))
        .find(|v| *v > 0.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::{ParameterScope, ResolutionMode};
    use netgraph_core::TerminalRole;

    fn parse(line: &str) -> Option<ComponentInstance> {
        let scope = ParameterScope::default();
        let resolver = scope.resolver(ResolutionMode::Lenient);
        parse_statement(line, &PortMap::new(), &resolver, None).unwrap()
    }

    #[test]
    fn test_mosfet_statement() {
        let c = parse("M1 (d g s b) nfet l=40n nfin=12").unwrap();
        assert_eq!(c.name, "M1");
        assert_eq!(c.ctype, ComponentType::Nfet);
        assert_eq!(c.terminals.len(), 4);
        assert_eq!(c.terminals[0].role, TerminalRole::Drain);
        assert_eq!(c.terminals[0].net, "d");
        assert_eq!(c.terminals[3].role, TerminalRole::Bulk);
        assert!((c.sizing.length - 4e-8).abs() < 1e-18);
        assert_eq!(c.sizing.width, 12.0);
    }

    #[test]
    fn test_width_falls_back_to_w() {
        let c = parse("M1 d g s b pfet w=2u").unwrap();
        assert!((c.sizing.width - 2e-6).abs() < 1e-15);
    }

    #[test]
    fn test_unknown_statement_skipped() {
        assert!(parse("L1 a b 1n").is_none());
        assert!(parse("simulator lang=spectre").is_none());
        assert!(parse("").is_none());
        assert!(parse("* full comment line").is_none());
    }

    #[test]
    fn test_inline_comment_stripped() {
        let c = parse("R1 a b resistor r=1k * load").unwrap();
        assert_eq!(c.sizing.resistance, 1000.0);
        assert_eq!(c.sizing.raw_params.get("r").map(String::as_str), Some("1k"));
    }

    #[test]
    fn test_parameter_substitution() {
        let scope =
            ParameterScope::extract("parameters rload=1000\n", ResolutionMode::Lenient).unwrap();
        let resolver = scope.resolver(ResolutionMode::Lenient);
        let c = parse_statement("R1 a b resistor r=rload", &PortMap::new(), &resolver, None)
            .unwrap()
            .unwrap();
        assert_eq!(c.sizing.resistance, 1000.0);
    }

    #[test]
    fn test_port_remapping() {
        let mut ports = PortMap::new();
        ports.insert("pa".to_string(), "p1".to_string());
        let scope = ParameterScope::default();
        let resolver = scope.resolver(ResolutionMode::Lenient);
        let c = parse_statement("R1 pa internal resistor r=1k", &ports, &resolver, Some("A"))
            .unwrap()
            .unwrap();
        assert_eq!(c.name, "A_R1");
        assert_eq!(c.terminals[0].net, "p1");
        // Unmapped tokens are literal global net references.
        assert_eq!(c.terminals[1].net, "internal");
    }

    #[test]
    fn test_positional_resistance_fallback() {
        let c = parse("R1 a b resistor 4.7k").unwrap();
        assert_eq!(c.sizing.resistance, 4700.0);
        let c = parse("C1 a b capacitor 10p m=1").unwrap();
        assert!((c.sizing.capacitance - 1e-11).abs() < 1e-22);
    }

    #[test]
    fn test_named_value_beats_positional() {
        let c = parse("R1 a b resistor r=1k").unwrap();
        assert_eq!(c.sizing.resistance, 1000.0);
    }

    #[test]
    fn test_nr_overrides_r() {
        let c = parse("R1 a b resistor nR=2k r=1k").unwrap();
        assert_eq!(c.sizing.resistance, 2000.0);
    }

    #[test]
    fn test_multi_token_parameter_value() {
        let c = parse("E1 p n cp cn vcvs func=va + vb gain=2").unwrap();
        assert_eq!(
            c.sizing.raw_params.get("func").map(String::as_str),
            Some("va + vb")
        );
        assert_eq!(c.sizing.raw_params.get("gain").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_symbolic_dc_retained() {
        let scope =
            ParameterScope::extract("parameters vdd=1.8\n", ResolutionMode::Lenient).unwrap();
        let resolver = scope.resolver(ResolutionMode::Lenient);
        let c = parse_statement("V0 vdd! 0 vsource dc=vdd", &PortMap::new(), &resolver, None)
            .unwrap()
            .unwrap();
        assert_eq!(c.sizing.dc, 1.8);
        assert_eq!(c.sizing.dc_param.as_deref(), Some("vdd"));

        let c = parse_statement("V1 a 0 vsource dc=1.2", &PortMap::new(), &resolver, None)
            .unwrap()
            .unwrap();
        assert_eq!(c.sizing.dc, 1.2);
        assert_eq!(c.sizing.dc_param, None);
    }

    #[test]
    fn test_terminal_underflow_truncated() {
        let c = parse("M1 d g nfet l=40n").unwrap();
        assert_eq!(c.terminals.len(), 2);
        assert_eq!(c.terminals[1].role, TerminalRole::Gate);
    }

    #[test]
    fn test_surplus_nets_dropped() {
        let c = parse("R1 a b c resistor r=1k").unwrap();
        assert_eq!(c.terminals.len(), 2);
    }

    #[test]
    fn test_strict_mode_unresolved_sizing() {
        let scope = ParameterScope::default();
        let resolver = scope.resolver(ResolutionMode::Strict);
        let result = parse_statement("R1 a b resistor r=missing", &PortMap::new(), &resolver, None);
        assert!(result.is_err());
    }
}
