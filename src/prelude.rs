//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types and traits of the crate. Import this
//! module to wire a host editor up without naming each module individually.

// Observer and policy engine
pub use crate::engine::{SlotEngine, SlotEvent};

// Runtime slot model
pub use crate::node::{
    CompanionValue, ConnectionState, LinkId, NodeSlots, Slot, SlotId, ValueHolder,
};

// Registration-time model
pub use crate::registry::{GroupId, SlotDefinition, SlotRegistry};
pub use crate::spec::{
    CompanionKind, DeclarationOptions, InputDeclaration, InputSpec, IntoInputSpec, NamingScheme,
    spec_from_json,
};

// Host collaborator contract
pub use crate::host::GraphHost;

// Error types
pub use crate::error::{LayoutError, SpecConversionError, SpecError};
