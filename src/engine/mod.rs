//! The connectivity observer: the single entry point the host drives on every
//! connection-state change, companion value edit, and node lifecycle event.

mod activation;

use crate::error::LayoutError;
use crate::host::GraphHost;
use crate::node::{CompanionValue, NodeSlots, Slot};
use crate::registry::{GroupId, SlotRegistry};
use activation::ActivationPass;
use ahash::AHashSet;
use std::cell::Cell;
use std::sync::Arc;

/// Connection-state transition reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotEvent {
    Connect,
    Disconnect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PassState {
    Idle,
    Processing,
}

/// Releases the processing flag on every exit path, including unwinds, so a
/// failed pass can never leave the engine permanently disabled.
struct PassGuard<'a>(&'a Cell<PassState>);

impl<'a> PassGuard<'a> {
    fn begin(state: &'a Cell<PassState>) -> Option<Self> {
        if state.get() == PassState::Processing {
            return None;
        }
        state.set(PassState::Processing);
        Some(PassGuard(state))
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.set(PassState::Idle);
    }
}

/// Per-node observer and policy engine for one node instance's dynamic slots.
///
/// The registry is parsed once per node type and shared; the engine carries the
/// per-node state: the reentrancy guard, the at-capacity marks, and the
/// diagnostics buffer. Events on slots no registry matcher recognizes are
/// ignored immediately.
///
/// Reentrant notifications (a host that synthesizes further events while a
/// mutation pass is still running) are dropped, not queued: the guard is an
/// explicit two-state machine on this engine, so concurrently edited nodes in
/// the same session can never interfere with each other.
pub struct SlotEngine {
    registry: Arc<SlotRegistry>,
    state: Cell<PassState>,
    at_capacity: AHashSet<GroupId>,
    diagnostics: Vec<LayoutError>,
}

impl SlotEngine {
    pub fn new(registry: Arc<SlotRegistry>) -> Self {
        Self {
            registry,
            state: Cell::new(PassState::Idle),
            at_capacity: AHashSet::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn registry(&self) -> &SlotRegistry {
        &self.registry
    }

    /// Entry point for connection notifications. The host records the link
    /// change on the node first, then reports the transition here.
    pub fn on_connection_change(
        &mut self,
        node: &mut NodeSlots,
        host: &mut dyn GraphHost,
        position: usize,
        event: SlotEvent,
    ) {
        let Some(slot) = node.slot(position) else {
            log::warn!("connection change on unknown slot position {}", position);
            return;
        };
        let Some(group) = self.registry.group_for_name(&slot.name) else {
            return;
        };
        self.dispatch(node, host, group, position, event);
    }

    /// Entry point for companion value edits. A value crossing between its
    /// kind's default and a non-default is treated exactly like a connect or
    /// disconnect; edits that stay on one side are ignored.
    pub fn on_value_edit(
        &mut self,
        node: &mut NodeSlots,
        host: &mut dyn GraphHost,
        position: usize,
        previous: &CompanionValue,
    ) {
        let Some(slot) = node.slot(position) else {
            log::warn!("value edit on unknown slot position {}", position);
            return;
        };
        let Some(group) = self.registry.group_for_name(&slot.name) else {
            return;
        };
        let Some(holder) = slot.holder.as_ref() else {
            log::warn!("value edit on slot '{}' without a holder", slot.name);
            return;
        };

        let was_default = holder.kind.is_default(previous);
        let is_default = holder.is_default();
        if was_default == is_default {
            return;
        }
        let event = if is_default {
            SlotEvent::Disconnect
        } else {
            SlotEvent::Connect
        };
        self.dispatch(node, host, group, position, event);
    }

    fn dispatch(
        &mut self,
        node: &mut NodeSlots,
        host: &mut dyn GraphHost,
        group: GroupId,
        position: usize,
        event: SlotEvent,
    ) {
        let Some(_guard) = PassGuard::begin(&self.state) else {
            log::warn!("slot event dropped: a mutation pass is already in progress");
            return;
        };

        let result = {
            let mut pass = ActivationPass::new(
                &self.registry,
                node,
                host,
                &mut self.at_capacity,
                &mut self.diagnostics,
            );
            match event {
                SlotEvent::Connect => pass.grow(group),
                SlotEvent::Disconnect => pass.shrink(group, position),
            }
        };
        if let Err(err) = result {
            log::error!("slot mutation pass failed: {}", err);
            self.diagnostics.push(err);
        }

        host.request_redraw();
    }

    /// Deserialize-time normalization: restores group contiguity with
    /// link-preserving swaps, re-creates holders the serialized workflow lost,
    /// renumbers, and settles the reserved-empty invariant.
    pub fn on_configure(&mut self, node: &mut NodeSlots, host: &mut dyn GraphHost) {
        let Some(_guard) = PassGuard::begin(&self.state) else {
            log::warn!("configure dropped: a mutation pass is already in progress");
            return;
        };

        let result = ActivationPass::new(
            &self.registry,
            node,
            host,
            &mut self.at_capacity,
            &mut self.diagnostics,
        )
        .configure();
        if let Err(err) = result {
            log::error!("configure pass failed: {}", err);
            self.diagnostics.push(err);
        }

        host.request_redraw();
    }

    /// Teardown: force-disconnects every still-connected dynamic slot so the
    /// host's connection table holds no dangling references afterwards.
    pub fn on_removed(&mut self, node: &mut NodeSlots, host: &mut dyn GraphHost) {
        let Some(_guard) = PassGuard::begin(&self.state) else {
            log::warn!("teardown dropped: a mutation pass is already in progress");
            return;
        };

        for position in 0..node.len() {
            let is_dynamic = node
                .slot(position)
                .is_some_and(|s| self.registry.is_dynamic_name(&s.name) && s.link.is_some());
            if !is_dynamic {
                continue;
            }
            if let Ok(Some(link)) = node.detach_link(position) {
                host.unlink(link);
            }
        }
    }

    /// Appends one empty row to a group, capacity permitting. Exposed so a
    /// host node type can pre-grow a group outside the event flow.
    pub fn grow_group(
        &mut self,
        node: &mut NodeSlots,
        host: &mut dyn GraphHost,
        group: GroupId,
    ) -> Result<(), LayoutError> {
        let Some(_guard) = PassGuard::begin(&self.state) else {
            log::warn!("grow dropped: a mutation pass is already in progress");
            return Ok(());
        };

        let result = ActivationPass::new(
            &self.registry,
            node,
            host,
            &mut self.at_capacity,
            &mut self.diagnostics,
        )
        .append_row(group);
        host.request_redraw();
        result
    }

    /// Renumbers every member column of a group back to canonical names.
    pub fn renumber_group(&self, node: &mut NodeSlots, group: GroupId) {
        for member in self.registry.members(group) {
            node.renumber(member);
        }
    }

    /// The dynamic slots of one group (or of all groups), in position order.
    pub fn dynamic_slots<'n>(&self, node: &'n NodeSlots, group: Option<GroupId>) -> Vec<&'n Slot> {
        node.slots()
            .iter()
            .filter(|s| match group {
                Some(g) => self.registry.group_for_name(&s.name) == Some(g),
                None => self.registry.is_dynamic_name(&s.name),
            })
            .collect()
    }

    /// Whether the group's naming scheme refused the last growth attempt.
    /// Clears as soon as a shrink frees a row.
    pub fn is_at_capacity(&self, group: GroupId) -> bool {
        self.at_capacity.contains(&group)
    }

    /// Drains the diagnostics recorded by mutation passes. Structural
    /// corruption is reported here (and through `log`) instead of aborting the
    /// pass that found it.
    pub fn take_diagnostics(&mut self) -> Vec<LayoutError> {
        std::mem::take(&mut self.diagnostics)
    }
}
