//! # Dynslot - Dynamic Input-Slot Engine for Node Editors
//!
//! **Dynslot** manages variable-arity, grouped input slots on the nodes of a visual
//! graph editor: a node declares that some of its inputs belong to a dynamic family,
//! and the engine grows the family when its last row becomes occupied and shrinks it
//! again, without ever invalidating an existing connection, when interior rows
//! become empty. Slots keep canonical names (`x0, x1, ...` or `a, b, ...`), grouped
//! rows stay contiguous, and reentrant change notifications fired by the host during
//! a mutation are dropped by a per-node guard.
//!
//! ## Core Workflow
//!
//! The engine is host-agnostic. It operates on a canonical declarative model of a
//! node type's inputs and a small collaborator trait for the pieces it cannot own:
//!
//! 1.  **Declare**: Describe the node type's inputs as an [`spec::InputSpec`],
//!     parsed from JSON with [`spec::spec_from_json`], built directly, or converted
//!     from your own declaration format via the [`spec::IntoInputSpec`] trait.
//! 2.  **Register**: Parse the spec once per node type into a
//!     [`registry::SlotRegistry`]. If no input carries a dynamic marker the registry
//!     is inert and nothing else needs to happen.
//! 3.  **Attach**: Give every node instance a [`node::NodeSlots`] (its slot
//!     sequence, owned by the core) and an [`engine::SlotEngine`] (its observer),
//!     and implement [`host::GraphHost`] on your editor's connection table.
//! 4.  **Forward events**: Report every connection change, companion value edit,
//!     deserialization, and teardown to the engine; it keeps the layout settled and
//!     asks for exactly one repaint per event.
//!
//! ## Quick Start
//!
//! ```rust
//! use dynslot::prelude::*;
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! // A minimal host: a connection table keyed by link id, plus a repaint flag.
//! #[derive(Default)]
//! struct Editor {
//!     link_targets: HashMap<LinkId, usize>,
//!     needs_redraw: bool,
//! }
//!
//! impl GraphHost for Editor {
//!     fn retarget_link(&mut self, link: LinkId, position: usize) {
//!         self.link_targets.insert(link, position);
//!     }
//!     fn unlink(&mut self, link: LinkId) {
//!         self.link_targets.remove(&link);
//!     }
//!     fn request_redraw(&mut self) {
//!         self.needs_redraw = true;
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Declare the node type's inputs; `x0` seeds a numeric dynamic group.
//!     let spec = spec_from_json(
//!         r#"{
//!             "inputs": [
//!                 { "name": "x0", "valueType": "FLOAT",
//!                   "options": { "dynamicScheme": "numeric" } }
//!             ]
//!         }"#,
//!     )?;
//!
//!     // 2. Parse the registry once per node type, then attach an engine per node.
//!     let registry = Arc::new(SlotRegistry::parse(&spec)?);
//!     let mut engine = SlotEngine::new(registry);
//!     let mut node = NodeSlots::from_declarations(&spec);
//!     let mut editor = Editor::default();
//!
//!     // 3. The host records the link, then reports the transition.
//!     node.attach_link(0, 7)?;
//!     engine.on_connection_change(&mut node, &mut editor, 0, SlotEvent::Connect);
//!
//!     // The engine grew the group: a fresh empty `x1` now trails the layout.
//!     assert_eq!(node.len(), 2);
//!     assert_eq!(node.slot(1).unwrap().name, "x1");
//!     assert!(editor.needs_redraw);
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod host;
pub mod node;
pub mod prelude;
pub mod registry;
pub mod spec;
