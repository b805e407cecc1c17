//! The reorder, rename, insert, and remove primitives of the slot sequence.
//!
//! Everything here is a pure layout mutation: occupancy is never changed, and
//! no primitive signals a redraw on its own; the observer batches mutations
//! and signals once.

use super::{NodeSlots, Slot, SlotId};
use crate::error::LayoutError;
use crate::host::GraphHost;
use crate::registry::SlotDefinition;

impl NodeSlots {
    /// Recomputes every slot's `position` field and re-points every attached
    /// link's stored target position through the host.
    ///
    /// Mandatory after any reordering: the host addresses connections by
    /// position, so this step is what keeps live connections attached to the
    /// correct slot.
    pub(crate) fn reindex(&mut self, host: &mut dyn GraphHost) {
        for (index, slot) in self.slots_mut().iter_mut().enumerate() {
            slot.position = index;
            if let Some(link) = slot.link {
                host.retarget_link(link, index);
            }
        }
    }

    /// The mechanical exchange, without precondition checks. Geometry and
    /// holder screen offsets stay with the on-screen row, not the slot.
    /// Rotations that cross group boundaries go through here directly, since
    /// holder homogeneity only holds within a group.
    pub(crate) fn exchange(&mut self, host: &mut dyn GraphHost, a: usize, b: usize) {
        let slots = self.slots_mut();
        slots.swap(a, b);

        let (low, high) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = slots.split_at_mut(high);
        let (first, second) = (&mut head[low], &mut tail[0]);
        std::mem::swap(&mut first.rect, &mut second.rect);
        if let (Some(ha), Some(hb)) = (first.holder.as_mut(), second.holder.as_mut()) {
            std::mem::swap(&mut ha.offset, &mut hb.offset);
        }

        self.reindex(host);
    }

    /// Exchanges the slots at positions `a` and `b` in place.
    ///
    /// Out-of-range or equal indices return [`LayoutError::SwapIndices`] and
    /// the call is a no-op. When exactly one of the two slots carries a value
    /// holder the group rows are no longer homogeneous; the exchange still
    /// happens best-effort, and [`LayoutError::HolderMismatch`] is returned so
    /// the caller can surface the corruption.
    ///
    /// A double swap of the same pair restores order, names, and every
    /// connection's stored target position.
    pub fn swap(&mut self, host: &mut dyn GraphHost, a: usize, b: usize) -> Result<(), LayoutError> {
        let len = self.len();
        if a >= len || b >= len || a == b {
            return Err(LayoutError::SwapIndices { a, b, len });
        }

        let mismatch = match (
            self.slots()[a].holder.is_some(),
            self.slots()[b].holder.is_some(),
        ) {
            (true, false) => Some(LayoutError::HolderMismatch {
                with_holder: a,
                without_holder: b,
            }),
            (false, true) => Some(LayoutError::HolderMismatch {
                with_holder: b,
                without_holder: a,
            }),
            _ => None,
        };

        self.exchange(host, a, b);

        match mismatch {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Reassigns canonical names to the member column described by
    /// `definition`, in current position order: `base0, base1, ...` for the
    /// numeric scheme, `a, b, ...` for letters. Holder labels follow their
    /// slot's name. Renames in place, never permutes, inserts, or removes,
    /// and is idempotent.
    pub fn renumber(&mut self, definition: &SlotDefinition) {
        let mut row = 0;
        for slot in self.slots_mut().iter_mut() {
            if !definition.matches(&slot.name) {
                continue;
            }
            let canonical = definition
                .scheme
                .canonical_name(&definition.base_name, row);
            if let Some(holder) = slot.holder.as_mut() {
                holder.label = canonical.clone();
            }
            slot.name = canonical;
            row += 1;
        }
    }

    /// Creates a new empty slot for `definition` under `name` and moves it to
    /// `position`.
    ///
    /// The slot is appended at the tail and rotated into place with the swap
    /// primitive's adjacent-exchange sequence, so every connection between the
    /// tail and the target position is repaired along the way. Fails without
    /// inserting when the definition's column is already at its naming
    /// scheme's capacity.
    pub fn insert_at(
        &mut self,
        host: &mut dyn GraphHost,
        definition: &SlotDefinition,
        name: &str,
        position: usize,
    ) -> Result<SlotId, LayoutError> {
        if let Some(capacity) = definition.scheme.capacity() {
            let existing = self
                .slots()
                .iter()
                .filter(|s| definition.matches(&s.name))
                .count();
            if existing >= capacity {
                return Err(LayoutError::AtCapacity {
                    group: definition.group,
                    capacity,
                });
            }
        }
        if position > self.len() {
            return Err(LayoutError::NoSuchSlot(position));
        }

        let id = self.push_slot(name, &definition.value_type, definition.companion.clone());

        // Rotate the tail slot into place. The rotation legitimately crosses
        // slots with and without holders, so it bypasses the homogeneity check.
        let tail = self.len() - 1;
        for index in (position..tail).rev() {
            self.exchange(host, index, index + 1);
        }
        Ok(id)
    }

    /// Splices out the slot at `position` and returns it.
    ///
    /// Interior removal shifts every later slot, so the shrink path only calls
    /// this after relocating the doomed row to the group tail; the reindex
    /// afterwards repairs whatever does shift (trailing non-dynamic slots).
    pub fn remove_at(
        &mut self,
        host: &mut dyn GraphHost,
        position: usize,
    ) -> Result<Slot, LayoutError> {
        if position >= self.len() {
            return Err(LayoutError::NoSuchSlot(position));
        }
        let removed = self.slots_mut().remove(position);
        self.reindex(host);
        Ok(removed)
    }
}
