//! Plain-text dump of a node's slot layout, for debugging with `debug-tools`.

use super::NodeSlots;
use std::fmt::Write;

/// Renders one line per slot: position, name, type, occupancy, link, holder.
pub fn dump_layout(node: &NodeSlots) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "slots: {}", node.len());
    for slot in node.slots() {
        let occupancy = if slot.is_occupied() { "occupied" } else { "empty" };
        let _ = write!(
            out,
            "  [{:>3}] {:<12} {:<10} {:<8}",
            slot.position, slot.name, slot.value_type, occupancy
        );
        if let Some(link) = slot.link {
            let _ = write!(out, " link={}", link);
        }
        if let Some(holder) = &slot.holder {
            let _ = write!(out, " holder={}={}", holder.label, holder.value);
        }
        let _ = writeln!(out);
    }
    out
}
