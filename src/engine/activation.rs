//! The group activation policy: when a connectivity transition grows a group,
//! when it shrinks one, and how a deserialized node is normalized back into a
//! settled layout.

use crate::error::LayoutError;
use crate::host::GraphHost;
use crate::node::{NodeSlots, Slot};
use crate::registry::{GroupId, SlotRegistry};
use ahash::AHashSet;
use itertools::Itertools;

/// One mutation pass over a node's slot layout, borrowed for the duration of a
/// single observer dispatch.
pub(super) struct ActivationPass<'a> {
    registry: &'a SlotRegistry,
    node: &'a mut NodeSlots,
    host: &'a mut dyn GraphHost,
    at_capacity: &'a mut AHashSet<GroupId>,
    diagnostics: &'a mut Vec<LayoutError>,
}

/// Aggregate state of one group row: the member positions and whether any
/// member is occupied. A row is Empty only when every member is.
struct RowState {
    positions: Vec<usize>,
    occupied: bool,
}

impl<'a> ActivationPass<'a> {
    pub(super) fn new(
        registry: &'a SlotRegistry,
        node: &'a mut NodeSlots,
        host: &'a mut dyn GraphHost,
        at_capacity: &'a mut AHashSet<GroupId>,
        diagnostics: &'a mut Vec<LayoutError>,
    ) -> Self {
        Self {
            registry,
            node,
            host,
            at_capacity,
            diagnostics,
        }
    }

    /// Positions of the group's slots, in position order.
    fn group_positions(&self, group: GroupId) -> Vec<usize> {
        self.node
            .slots()
            .iter()
            .filter(|s| self.registry.group_for_name(&s.name) == Some(group))
            .map(|s| s.position)
            .collect()
    }

    /// Splits the group's slots into rows, surfacing structural problems as
    /// diagnostics without aborting: a corrupt group is still scanned
    /// best-effort so the node does not end up in a worse state.
    fn scan_rows(&mut self, group: GroupId) -> Vec<RowState> {
        let members_len = self.registry.members(group).len();
        if members_len == 0 {
            return Vec::new();
        }
        let positions = self.group_positions(group);
        if positions.is_empty() {
            return Vec::new();
        }

        if positions.len() % members_len != 0 {
            let err = LayoutError::RaggedGroup {
                group,
                count: positions.len(),
                members: members_len,
            };
            log::error!("{}", err);
            self.diagnostics.push(err);
        }
        if let Some((gap_after, _)) = positions
            .iter()
            .copied()
            .tuple_windows()
            .find(|&(a, b)| b != a + 1)
        {
            let err = LayoutError::NonContiguousGroup {
                group,
                position: gap_after,
            };
            log::error!("{}", err);
            self.diagnostics.push(err);
        }

        positions
            .chunks(members_len)
            .map(|chunk| RowState {
                positions: chunk.to_vec(),
                occupied: chunk
                    .iter()
                    .any(|&p| self.node.slot(p).is_some_and(Slot::is_occupied)),
            })
            .collect()
    }

    /// Grow path: after an Empty→Occupied transition, append one empty row
    /// unless the group still has one.
    pub(super) fn grow(&mut self, group: GroupId) -> Result<(), LayoutError> {
        let rows = self.scan_rows(group);
        if rows.is_empty() || rows.iter().any(|r| !r.occupied) {
            return Ok(());
        }
        self.append_row(group)
    }

    /// Appends one empty row immediately after the group's last slot, member
    /// by member in declaration order. A member whose scheme is out of names
    /// is skipped and the group is marked at-capacity.
    pub(super) fn append_row(&mut self, group: GroupId) -> Result<(), LayoutError> {
        let registry = self.registry;
        let members = registry.members(group);
        if members.is_empty() {
            return Ok(());
        }
        let positions = self.group_positions(group);
        let row_index = positions.len() / members.len();
        let mut insert_position = positions.last().map(|&p| p + 1).unwrap_or(self.node.len());

        for member in members.iter().copied() {
            if let Some(capacity) = member.scheme.capacity() {
                if row_index >= capacity {
                    self.at_capacity.insert(group);
                    log::debug!("group {} at naming capacity ({} rows)", group, capacity);
                    continue;
                }
            }
            let name = member.scheme.canonical_name(&member.base_name, row_index);
            self.node
                .insert_at(self.host, member, &name, insert_position)?;
            insert_position += 1;
            self.node.renumber(member);
        }
        Ok(())
    }

    /// Shrink path: after an Occupied→Empty transition at `position`, remove
    /// the newly-empty row, but only when another empty row already exists,
    /// so exactly one empty row always survives as the reserved insertion
    /// point.
    pub(super) fn shrink(&mut self, group: GroupId, position: usize) -> Result<(), LayoutError> {
        let registry = self.registry;
        let members_len = registry.members(group).len();
        if members_len == 0 {
            return Ok(());
        }
        let rows = self.scan_rows(group);
        if rows.is_empty() {
            return Ok(());
        }

        let newly_empty = rows.iter().position(|r| r.positions.contains(&position));
        if let Some(row_index) = newly_empty {
            if !rows[row_index].occupied {
                let another_empty = rows
                    .iter()
                    .enumerate()
                    .any(|(i, r)| i != row_index && !r.occupied);
                if another_empty {
                    self.remove_row(group, row_index, members_len, rows.len())?;
                }
                // Otherwise the row stays as the reserved insertion point.
            }
        }

        for definition in registry.definitions() {
            self.node.renumber(definition);
        }

        let rows_now = self.group_positions(group).len() / members_len;
        let under_capacity = registry
            .members(group)
            .iter()
            .all(|m| m.scheme.capacity().is_none_or(|cap| rows_now < cap));
        if under_capacity {
            self.at_capacity.remove(&group);
        }
        Ok(())
    }

    /// Relocates row `row_index` to the group tail with member-wise swaps,
    /// never a direct interior splice, so connections on every later row are
    /// repaired swap by swap, then removes the tail row in one step.
    fn remove_row(
        &mut self,
        group: GroupId,
        row_index: usize,
        members_len: usize,
        row_count: usize,
    ) -> Result<(), LayoutError> {
        let positions = self.group_positions(group);

        for row in row_index..row_count.saturating_sub(1) {
            for member in 0..members_len {
                let a = positions.get(row * members_len + member).copied();
                let b = positions.get((row + 1) * members_len + member).copied();
                let (Some(a), Some(b)) = (a, b) else {
                    continue;
                };
                if let Err(err) = self.node.swap(self.host, a, b) {
                    log::error!("{}", err);
                    self.diagnostics.push(err);
                }
            }
        }

        let tail_index = (row_count - 1) * members_len;
        let Some(&tail_start) = positions.get(tail_index) else {
            return Ok(());
        };
        for _ in 0..positions.len() - tail_index {
            self.node.remove_at(self.host, tail_start)?;
        }
        Ok(())
    }

    /// Deserialize-time normalization (see `SlotEngine::on_configure`).
    pub(super) fn configure(&mut self) -> Result<(), LayoutError> {
        let registry = self.registry;

        // Contiguity: bubble each group back into one block. Everything
        // between a displaced member and its target is foreign to the group,
        // so the rotation bypasses the holder homogeneity check.
        for group in registry.group_ids() {
            let positions = self.group_positions(group);
            let Some(&first) = positions.first() else {
                continue;
            };
            for (k, &pos) in positions.iter().enumerate() {
                let target = first + k;
                if pos > target {
                    for current in ((target + 1)..=pos).rev() {
                        self.node.exchange(self.host, current - 1, current);
                    }
                }
            }
        }

        // Holder reconciliation: a serialized workflow does not always carry
        // the holders back, so re-create any that are missing.
        for position in 0..self.node.len() {
            let restore = {
                let Some(slot) = self.node.slot(position) else {
                    continue;
                };
                let Some(definition) = registry.definition_for_name(&slot.name) else {
                    continue;
                };
                match (&definition.companion, &slot.holder) {
                    (Some(kind), None) => Some((slot.name.clone(), kind.clone())),
                    _ => None,
                }
            };
            if let Some((name, kind)) = restore {
                log::warn!(
                    "slot '{}' lost its value holder during deserialization; restoring the default",
                    name
                );
                self.node.restore_holder(position, kind);
            }
        }

        for definition in registry.definitions() {
            self.node.renumber(definition);
        }

        // Settle the reserved-empty invariant: keep the positionally-last
        // empty row, remove earlier ones, grow the missing reserve.
        for group in registry.group_ids() {
            let members_len = registry.members(group).len();
            if members_len == 0 {
                continue;
            }
            let rows = self.scan_rows(group);
            let empties: Vec<usize> = rows
                .iter()
                .enumerate()
                .filter(|(_, r)| !r.occupied)
                .map(|(i, _)| i)
                .collect();

            if empties.is_empty() {
                self.append_row(group)?;
            } else if empties.len() > 1 {
                let mut row_count = rows.len();
                for &row in empties[..empties.len() - 1].iter().rev() {
                    self.remove_row(group, row, members_len, row_count)?;
                    row_count -= 1;
                }
                for definition in registry.definitions() {
                    self.node.renumber(definition);
                }
            }

            let rows_now = self.group_positions(group).len() / members_len;
            let at_cap = registry
                .members(group)
                .iter()
                .any(|m| m.scheme.capacity().is_some_and(|cap| rows_now >= cap));
            if at_cap {
                self.at_capacity.insert(group);
            } else {
                self.at_capacity.remove(&group);
            }
        }
        Ok(())
    }
}
