//! Common test utilities for building input specs and driving slot events.
use dynslot::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

/// In-memory graph host double: a position-keyed connection table and a
/// repaint counter.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct MockHost {
    pub link_targets: HashMap<LinkId, usize>,
    pub redraws: usize,
}

impl GraphHost for MockHost {
    fn retarget_link(&mut self, link: LinkId, position: usize) {
        self.link_targets.insert(link, position);
    }

    fn unlink(&mut self, link: LinkId) {
        self.link_targets.remove(&link);
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }
}

/// A single-member numeric group seeded by `x0`.
#[allow(dead_code)]
pub fn numeric_spec() -> InputSpec {
    InputSpec {
        inputs: vec![InputDeclaration {
            name: "x0".to_string(),
            value_type: "FLOAT".to_string(),
            options: DeclarationOptions {
                dynamic_scheme: Some(NamingScheme::Numeric),
                dynamic_group: 0,
                companion_value_kind: None,
            },
        }],
    }
}

/// A single-member letter group seeded by `a`, optionally carrying a numeric
/// value holder.
#[allow(dead_code)]
pub fn letter_spec(with_companion: bool) -> InputSpec {
    InputSpec {
        inputs: vec![InputDeclaration {
            name: "a".to_string(),
            value_type: "FLOAT".to_string(),
            options: DeclarationOptions {
                dynamic_scheme: Some(NamingScheme::Letter),
                dynamic_group: 0,
                companion_value_kind: with_companion.then_some(CompanionKind::Number),
            },
        }],
    }
}

/// A numeric group whose slots carry a numeric value holder.
#[allow(dead_code)]
pub fn companion_spec() -> InputSpec {
    InputSpec {
        inputs: vec![InputDeclaration {
            name: "v0".to_string(),
            value_type: "FLOAT".to_string(),
            options: DeclarationOptions {
                dynamic_scheme: Some(NamingScheme::Numeric),
                dynamic_group: 0,
                companion_value_kind: Some(CompanionKind::Number),
            },
        }],
    }
}

/// A two-member group: each row is a `key` column and a `value` column.
#[allow(dead_code)]
pub fn pair_spec() -> InputSpec {
    InputSpec {
        inputs: vec![
            InputDeclaration {
                name: "key0".to_string(),
                value_type: "STRING".to_string(),
                options: DeclarationOptions {
                    dynamic_scheme: Some(NamingScheme::Numeric),
                    dynamic_group: 0,
                    companion_value_kind: None,
                },
            },
            InputDeclaration {
                name: "value0".to_string(),
                value_type: "*".to_string(),
                options: DeclarationOptions {
                    dynamic_scheme: Some(NamingScheme::Numeric),
                    dynamic_group: 0,
                    companion_value_kind: None,
                },
            },
        ],
    }
}

/// A node instance plus its engine and host double, with link bookkeeping.
#[allow(dead_code)]
pub struct Rig {
    pub engine: SlotEngine,
    pub node: NodeSlots,
    pub host: MockHost,
    next_link: LinkId,
}

#[allow(dead_code)]
impl Rig {
    pub fn new(spec: &InputSpec) -> Self {
        let registry = Arc::new(SlotRegistry::parse(spec).expect("spec should parse"));
        Self {
            engine: SlotEngine::new(registry),
            node: NodeSlots::from_declarations(spec),
            host: MockHost::default(),
            next_link: 1,
        }
    }

    /// Attaches a fresh link at `position` and reports the connect.
    pub fn connect(&mut self, position: usize) -> LinkId {
        let link = self.next_link;
        self.next_link += 1;
        self.node.attach_link(position, link).expect("attach");
        self.host.link_targets.insert(link, position);
        self.engine
            .on_connection_change(&mut self.node, &mut self.host, position, SlotEvent::Connect);
        link
    }

    /// Detaches the link at `position` and reports the disconnect.
    pub fn disconnect(&mut self, position: usize) {
        if let Ok(Some(link)) = self.node.detach_link(position) {
            self.host.link_targets.remove(&link);
        }
        self.engine.on_connection_change(
            &mut self.node,
            &mut self.host,
            position,
            SlotEvent::Disconnect,
        );
    }

    /// Writes a companion value at `position` and reports the edit.
    pub fn edit_value(&mut self, position: usize, value: CompanionValue) {
        let previous = self
            .node
            .set_companion_value(position, value)
            .expect("slot should carry a holder");
        self.engine
            .on_value_edit(&mut self.node, &mut self.host, position, &previous);
    }

    pub fn names(&self) -> Vec<String> {
        self.node.slots().iter().map(|s| s.name.clone()).collect()
    }

    pub fn occupancy(&self) -> Vec<bool> {
        self.node.slots().iter().map(|s| s.is_occupied()).collect()
    }
}

/// Asserts the settled-state invariants for every group: contiguous blocks,
/// at most one fully-empty row (exactly one unless at capacity), and canonical
/// names by row index.
#[allow(dead_code)]
pub fn assert_settled(rig: &Rig) {
    for group in rig.engine.registry().group_ids() {
        let members = rig.engine.registry().members(group);
        let slots = rig.engine.dynamic_slots(&rig.node, Some(group));
        if slots.is_empty() {
            continue;
        }

        // Contiguity
        for pair in slots.windows(2) {
            assert_eq!(
                pair[1].position,
                pair[0].position + 1,
                "group {} is not contiguous",
                group
            );
        }

        // Row occupancy
        let empty_rows = slots
            .chunks(members.len())
            .filter(|row| row.iter().all(|s| !s.is_occupied()))
            .count();
        if rig.engine.is_at_capacity(group) {
            assert!(
                empty_rows <= 1,
                "group {} at capacity has {} empty rows",
                group,
                empty_rows
            );
        } else {
            assert_eq!(empty_rows, 1, "group {} should keep one reserved empty row", group);
        }

        // Canonical naming, member column by member column
        for member in &members {
            let column: Vec<_> = slots.iter().filter(|s| member.matches(&s.name)).collect();
            for (row, slot) in column.iter().enumerate() {
                assert_eq!(
                    slot.name,
                    member.scheme.canonical_name(&member.base_name, row),
                    "group {} row {} has a non-canonical name",
                    group,
                    row
                );
            }
        }
    }
}
