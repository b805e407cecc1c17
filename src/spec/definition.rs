use serde::Deserialize;

/// Naming scheme marker carried by a dynamic input declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingScheme {
    /// `base0`, `base1`, ...: trailing digits index the row. Unbounded.
    Numeric,
    /// `a`, `b`, ... `z`: one letter per row, capped at 26 rows.
    Letter,
}

impl NamingScheme {
    /// Maximum number of rows the scheme can name. `None` means unbounded.
    pub fn capacity(&self) -> Option<usize> {
        match self {
            NamingScheme::Numeric => None,
            NamingScheme::Letter => Some(26),
        }
    }

    /// The canonical slot name for a row index under this scheme.
    pub fn canonical_name(&self, base_name: &str, row: usize) -> String {
        match self {
            NamingScheme::Numeric => format!("{}{}", base_name, row),
            NamingScheme::Letter => char::from(b'a' + row as u8).to_string(),
        }
    }
}

/// The kind of editable default value a dynamic input carries alongside its connection.
///
/// Which kind an input uses is part of the node-type declaration; the runtime
/// value itself lives in a [`crate::node::ValueHolder`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CompanionKind {
    /// A numeric entry field; its default is 0.
    Number,
    /// A fixed set of choices; its default is the first option.
    Choice { options: Vec<String> },
    /// A free-text entry; its default is the empty string.
    Text,
}

/// Per-input options recognized from a declarative node spec.
///
/// Inputs without a `dynamic_scheme` marker are invisible to the slot engine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeclarationOptions {
    #[serde(default, alias = "dynamicScheme")]
    pub dynamic_scheme: Option<NamingScheme>,
    #[serde(default, alias = "dynamicGroup")]
    pub dynamic_group: u32,
    #[serde(default, alias = "companionValueKind")]
    pub companion_value_kind: Option<CompanionKind>,
}

/// One named input in a node-type declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct InputDeclaration {
    pub name: String,
    #[serde(alias = "valueType")]
    pub value_type: String,
    #[serde(default)]
    pub options: DeclarationOptions,
}

/// The declarative input spec of a node type: every named input, in declaration order.
///
/// The vector order is the explicit input ordering; it decides both the initial
/// slot layout and the member order within each dynamic group.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputSpec {
    pub inputs: Vec<InputDeclaration>,
}
