//! Primitive component types, terminal roles, and parsed instances.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Primitive component types recognized in netlist statements.
///
/// The discriminants are the numeric type codes emitted in component
/// feature vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Nfet = 0,
    Pfet = 1,
    Resistor = 2,
    Capacitor = 3,
    VSource = 4,
    ISource = 5,
    Vcvs = 6,
}

impl ComponentType {
    /// All primitive types in type-code order.
    pub const ALL: [ComponentType; 7] = [
        ComponentType::Nfet,
        ComponentType::Pfet,
        ComponentType::Resistor,
        ComponentType::Capacitor,
        ComponentType::VSource,
        ComponentType::ISource,
        ComponentType::Vcvs,
    ];

    /// The statement keyword for this type (`nfet`, `resistor`, ...).
    pub fn keyword(self) -> &'static str {
        match self {
            ComponentType::Nfet => "nfet",
            ComponentType::Pfet => "pfet",
            ComponentType::Resistor => "resistor",
            ComponentType::Capacitor => "capacitor",
            ComponentType::VSource => "vsource",
            ComponentType::ISource => "isource",
            ComponentType::Vcvs => "vcvs",
        }
    }

    /// Look up a statement token as a primitive-type keyword.
    pub fn from_keyword(token: &str) -> Option<Self> {
        ComponentType::ALL
            .into_iter()
            .find(|t| t.keyword() == token)
    }

    /// Numeric type code used in component feature vectors.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Decode a numeric type code.
    pub fn from_code(code: u32) -> Result<Self> {
        ComponentType::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or(Error::UnknownTypeCode(code))
    }

    /// Terminal roles for this type, in positional statement order.
    pub fn terminal_roles(self) -> &'static [TerminalRole] {
        match self {
            ComponentType::Nfet | ComponentType::Pfet => &[
                TerminalRole::Drain,
                TerminalRole::Gate,
                TerminalRole::Source,
                TerminalRole::Bulk,
            ],
            ComponentType::Resistor | ComponentType::Capacitor => {
                &[TerminalRole::P, TerminalRole::N]
            }
            ComponentType::VSource | ComponentType::ISource => {
                &[TerminalRole::Pos, TerminalRole::Neg]
            }
            ComponentType::Vcvs => &[
                TerminalRole::Pos,
                TerminalRole::Neg,
                TerminalRole::CtrlPos,
                TerminalRole::CtrlNeg,
            ],
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Role of a terminal on a component. Discriminants are the terminal-role
/// codes carried on graph edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalRole {
    Drain = 0,
    Gate = 1,
    Source = 2,
    Bulk = 3,
    P = 4,
    N = 5,
    Pos = 6,
    Neg = 7,
    CtrlPos = 8,
    CtrlNeg = 9,
}

impl TerminalRole {
    const ALL: [TerminalRole; 10] = [
        TerminalRole::Drain,
        TerminalRole::Gate,
        TerminalRole::Source,
        TerminalRole::Bulk,
        TerminalRole::P,
        TerminalRole::N,
        TerminalRole::Pos,
        TerminalRole::Neg,
        TerminalRole::CtrlPos,
        TerminalRole::CtrlNeg,
    ];

    /// Pin label used in the exchange format (`D`, `G`, `pos`, ...).
    pub fn pin_name(self) -> &'static str {
        match self {
            TerminalRole::Drain => "D",
            TerminalRole::Gate => "G",
            TerminalRole::Source => "S",
            TerminalRole::Bulk => "B",
            TerminalRole::P => "P",
            TerminalRole::N => "N",
            TerminalRole::Pos => "pos",
            TerminalRole::Neg => "neg",
            TerminalRole::CtrlPos => "ctrl_pos",
            TerminalRole::CtrlNeg => "ctrl_neg",
        }
    }

    /// Look up a pin label from the exchange format.
    pub fn from_pin_name(name: &str) -> Option<Self> {
        TerminalRole::ALL.into_iter().find(|r| r.pin_name() == name)
    }

    /// Numeric role code carried on edges.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Decode a numeric role code.
    pub fn from_code(code: u32) -> Result<Self> {
        TerminalRole::ALL
            .into_iter()
            .find(|r| r.code() == code)
            .ok_or(Error::UnknownRoleCode(code))
    }
}

/// A connection point on a component, bound to a net by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terminal {
    pub role: TerminalRole,
    pub net: String,
}

/// Sizing parameters resolved from a statement's parameter span.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sizing {
    /// Channel length (`l`).
    pub length: f64,
    /// Fin count or width (`nfin`, falling back to `w`).
    pub width: f64,
    /// Resistance (`nR`, falling back to `r`).
    pub resistance: f64,
    /// Capacitance (`nC`, falling back to `c`).
    pub capacitance: f64,
    /// DC value (`dc`).
    pub dc: f64,
    /// Original symbolic token of the `dc` parameter, retained when the
    /// value was a named reference rather than a literal.
    pub dc_param: Option<String>,
    /// Unparsed `key=value` parameter text, keyed by parameter name.
    /// Used for equality-based pairing of matched components.
    pub raw_params: BTreeMap<String, String>,
}

/// A flattened, uniquely named component instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInstance {
    /// Instance-path-qualified name, globally unique after flattening.
    pub name: String,
    pub ctype: ComponentType,
    /// Terminals in role order; never longer than the type's arity.
    pub terminals: Vec<Terminal>,
    pub sizing: Sizing,
}
