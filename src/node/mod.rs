//! Runtime slot model for one node instance.

mod layout;
#[cfg(feature = "debug-tools")]
pub mod visualizer;

use crate::error::LayoutError;
use crate::spec::{CompanionKind, InputSpec};
use std::fmt;

/// Identifier of a connection in the host graph.
pub type LinkId = u64;

/// Stable identity of a slot, independent of its position.
///
/// Positions shift on every reorder; ids never do. Hosts that want to track a
/// slot across mutations should hold its id and resolve it back to a position
/// through [`NodeSlots::position_of`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(u64);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Empty,
    Occupied,
}

/// The editable runtime value of a companion holder.
#[derive(Debug, Clone, PartialEq)]
pub enum CompanionValue {
    Number(f64),
    Choice(String),
    Text(String),
}

impl CompanionValue {
    /// The per-kind default: numeric 0, first enumerated choice, empty text.
    pub fn default_for(kind: &CompanionKind) -> Self {
        match kind {
            CompanionKind::Number => CompanionValue::Number(0.0),
            CompanionKind::Choice { options } => {
                CompanionValue::Choice(options.first().cloned().unwrap_or_default())
            }
            CompanionKind::Text => CompanionValue::Text(String::new()),
        }
    }
}

impl fmt::Display for CompanionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompanionValue::Number(n) => {
                if n.fract() == 0.0 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            CompanionValue::Choice(c) => write!(f, "{}", c),
            CompanionValue::Text(t) => write!(f, "{}", t),
        }
    }
}

impl CompanionKind {
    /// Whether a value sits at this kind's default. Only a default↔non-default
    /// crossing counts as a synthetic connect/disconnect.
    pub fn is_default(&self, value: &CompanionValue) -> bool {
        *value == CompanionValue::default_for(self)
    }
}

/// A companion value holder: the editable default attached to one slot,
/// usable when no connection is present.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueHolder {
    pub label: String,
    pub kind: CompanionKind,
    pub value: CompanionValue,
    /// Screen y offset maintained by the host renderer; stays with the
    /// on-screen row across swaps.
    pub offset: f32,
}

impl ValueHolder {
    pub fn new(label: &str, kind: CompanionKind) -> Self {
        let value = CompanionValue::default_for(&kind);
        Self {
            label: label.to_string(),
            kind,
            value,
            offset: 0.0,
        }
    }

    pub fn is_default(&self) -> bool {
        self.kind.is_default(&self.value)
    }
}

/// One input slot on a node instance.
#[derive(Debug, Clone)]
pub struct Slot {
    pub id: SlotId,
    pub name: String,
    /// Index in the node's slot sequence. The host's connection table keys on
    /// this, which is why every reorder must repair it (see [`NodeSlots::swap`]).
    pub position: usize,
    pub value_type: String,
    pub link: Option<LinkId>,
    pub holder: Option<ValueHolder>,
    /// Cached layout geometry from the host renderer; stays with the on-screen
    /// row across swaps.
    pub rect: Option<[f32; 4]>,
}

impl Slot {
    /// A slot is occupied when a connection is attached or its companion value
    /// left its default.
    pub fn is_occupied(&self) -> bool {
        self.link.is_some() || self.holder.as_ref().is_some_and(|h| !h.is_default())
    }

    pub fn state(&self) -> ConnectionState {
        if self.is_occupied() {
            ConnectionState::Occupied
        } else {
            ConnectionState::Empty
        }
    }
}

/// The slot sequence of one node instance, exclusively owned by the core.
///
/// The host reads slots back for rendering; every mutation goes through the
/// methods here so positions and the host connection table stay consistent.
#[derive(Debug, Clone, Default)]
pub struct NodeSlots {
    slots: Vec<Slot>,
    next_id: u64,
}

impl NodeSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the initial declared configuration: one slot per declared input,
    /// dynamic or not, in declaration order.
    pub fn from_declarations(spec: &InputSpec) -> Self {
        let mut node = Self::new();
        for declaration in &spec.inputs {
            node.push_slot(
                &declaration.name,
                &declaration.value_type,
                declaration.options.companion_value_kind.clone(),
            );
        }
        node
    }

    fn allocate_id(&mut self) -> SlotId {
        let id = SlotId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn push_slot(
        &mut self,
        name: &str,
        value_type: &str,
        companion: Option<CompanionKind>,
    ) -> SlotId {
        // The holder must exist before the slot refers to it.
        let holder = companion.map(|kind| ValueHolder::new(name, kind));
        let id = self.allocate_id();
        let position = self.slots.len();
        self.slots.push(Slot {
            id,
            name: name.to_string(),
            position,
            value_type: value_type.to_string(),
            link: None,
            holder,
            rect: None,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, position: usize) -> Option<&Slot> {
        self.slots.get(position)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot_by_id(&self, id: SlotId) -> Option<&Slot> {
        self.slots.iter().find(|s| s.id == id)
    }

    pub fn position_of(&self, id: SlotId) -> Option<usize> {
        self.slots.iter().position(|s| s.id == id)
    }

    /// Enumerates companion holders in slot-position order.
    pub fn holders(&self) -> impl Iterator<Item = (&Slot, &ValueHolder)> {
        self.slots.iter().filter_map(|s| s.holder.as_ref().map(|h| (s, h)))
    }

    pub(crate) fn slots_mut(&mut self) -> &mut Vec<Slot> {
        &mut self.slots
    }

    /// Records a new connection on a slot. The host calls this when a link is
    /// created, before notifying the engine.
    pub fn attach_link(&mut self, position: usize, link: LinkId) -> Result<(), LayoutError> {
        let slot = self
            .slots
            .get_mut(position)
            .ok_or(LayoutError::NoSuchSlot(position))?;
        slot.link = Some(link);
        Ok(())
    }

    /// Clears a slot's connection, returning the link that was attached.
    pub fn detach_link(&mut self, position: usize) -> Result<Option<LinkId>, LayoutError> {
        let slot = self
            .slots
            .get_mut(position)
            .ok_or(LayoutError::NoSuchSlot(position))?;
        Ok(slot.link.take())
    }

    /// Writes a companion value and returns the previous one, for the host to
    /// hand to [`crate::engine::SlotEngine::on_value_edit`].
    pub fn set_companion_value(
        &mut self,
        position: usize,
        value: CompanionValue,
    ) -> Result<CompanionValue, LayoutError> {
        let slot = self
            .slots
            .get_mut(position)
            .ok_or(LayoutError::NoSuchSlot(position))?;
        let holder = slot
            .holder
            .as_mut()
            .ok_or(LayoutError::NoSuchHolder(position))?;
        Ok(std::mem::replace(&mut holder.value, value))
    }

    /// Stores renderer geometry for a slot.
    pub fn set_rect(&mut self, position: usize, rect: [f32; 4]) -> Result<(), LayoutError> {
        let slot = self
            .slots
            .get_mut(position)
            .ok_or(LayoutError::NoSuchSlot(position))?;
        slot.rect = Some(rect);
        Ok(())
    }

    /// Re-creates a missing holder with its kind's default value. Used by the
    /// configure pass when deserialization dropped one.
    pub(crate) fn restore_holder(&mut self, position: usize, kind: CompanionKind) {
        if let Some(slot) = self.slots.get_mut(position) {
            if slot.holder.is_none() {
                let label = slot.name.clone();
                slot.holder = Some(ValueHolder::new(&label, kind));
            }
        }
    }
}
