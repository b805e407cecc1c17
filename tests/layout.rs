//! Tests for the layout primitives: swap, renumber, insert, remove.
mod common;
use common::*;
use dynslot::prelude::*;

/// Builds `[x0:occ, x1:occ, x2:empty]` with live links.
fn grown_rig() -> (Rig, Vec<LinkId>) {
    let mut rig = Rig::new(&numeric_spec());
    let links = vec![rig.connect(0), rig.connect(1)];
    (rig, links)
}

#[test]
fn swap_is_an_involution_over_order_names_and_links() {
    let (mut rig, links) = grown_rig();
    let before_names = rig.names();
    let before_ids: Vec<_> = rig.node.slots().iter().map(|s| s.id).collect();
    let before_targets = rig.host.link_targets.clone();

    rig.node.swap(&mut rig.host, 0, 2).unwrap();
    // After one swap the moved link must follow its slot.
    assert_eq!(rig.host.link_targets[&links[0]], 2);

    rig.node.swap(&mut rig.host, 0, 2).unwrap();
    assert_eq!(rig.names(), before_names);
    let after_ids: Vec<_> = rig.node.slots().iter().map(|s| s.id).collect();
    assert_eq!(after_ids, before_ids);
    assert_eq!(rig.host.link_targets, before_targets);
}

#[test]
fn swap_repairs_every_position_field() {
    let (mut rig, _) = grown_rig();
    rig.node.swap(&mut rig.host, 1, 2).unwrap();
    for (index, slot) in rig.node.slots().iter().enumerate() {
        assert_eq!(slot.position, index);
    }
}

#[test]
fn swap_rejects_out_of_range_and_equal_indices() {
    let (mut rig, _) = grown_rig();
    let before = rig.names();

    for (a, b) in [(0, 3), (5, 1), (2, 2)] {
        let err = rig.node.swap(&mut rig.host, a, b).unwrap_err();
        assert!(matches!(err, LayoutError::SwapIndices { .. }));
    }
    assert_eq!(rig.names(), before);
}

#[test]
fn swap_reports_holder_mismatch_but_still_exchanges() {
    // One group with holders, one without: swapping across them is corrupt
    // but must proceed best-effort.
    let mut spec = companion_spec();
    spec.inputs.push(InputDeclaration {
        name: "n0".to_string(),
        value_type: "INT".to_string(),
        options: DeclarationOptions {
            dynamic_scheme: Some(NamingScheme::Numeric),
            dynamic_group: 1,
            companion_value_kind: None,
        },
    });
    let mut rig = Rig::new(&spec);
    // [v0 (holder), n0]

    let err = rig.node.swap(&mut rig.host, 0, 1).unwrap_err();
    assert!(matches!(err, LayoutError::HolderMismatch { .. }));
    assert_eq!(rig.names(), ["n0", "v0"]);
}

#[test]
fn renumber_is_idempotent() {
    let (mut rig, _) = grown_rig();
    rig.node.swap(&mut rig.host, 0, 2).unwrap();

    let definition = rig
        .engine
        .registry()
        .definition_for_name("x0")
        .unwrap()
        .clone();
    rig.node.renumber(&definition);
    let once = rig.names();
    rig.node.renumber(&definition);
    assert_eq!(rig.names(), once);
    assert_eq!(once, ["x0", "x1", "x2"]);
}

#[test]
fn renumber_never_reorders_slots() {
    let (mut rig, _) = grown_rig();
    rig.node.swap(&mut rig.host, 0, 2).unwrap();
    let ids: Vec<_> = rig.node.slots().iter().map(|s| s.id).collect();

    let definition = rig
        .engine
        .registry()
        .definition_for_name("x0")
        .unwrap()
        .clone();
    rig.node.renumber(&definition);

    let after: Vec<_> = rig.node.slots().iter().map(|s| s.id).collect();
    assert_eq!(ids, after);
}

#[test]
fn insert_rotates_into_place_and_preserves_connections() {
    let (mut rig, links) = grown_rig();
    let definition = rig
        .engine
        .registry()
        .definition_for_name("x0")
        .unwrap()
        .clone();

    let id = rig
        .node
        .insert_at(&mut rig.host, &definition, "x9", 1)
        .unwrap();
    assert_eq!(rig.node.position_of(id), Some(1));
    assert_eq!(rig.names(), ["x0", "x9", "x1", "x2"]);
    // The link that sat at position 1 followed its slot to position 2.
    assert_eq!(rig.host.link_targets[&links[1]], 2);

    rig.node.renumber(&definition);
    assert_eq!(rig.names(), ["x0", "x1", "x2", "x3"]);
}

#[test]
fn insert_refuses_a_full_letter_column() {
    let mut rig = Rig::new(&letter_spec(false));
    for i in 0..26 {
        rig.connect(i);
    }
    let definition = rig
        .engine
        .registry()
        .definition_for_name("a")
        .unwrap()
        .clone();

    let err = rig
        .node
        .insert_at(&mut rig.host, &definition, "aa", 0)
        .unwrap_err();
    assert!(matches!(err, LayoutError::AtCapacity { .. }));
    assert_eq!(rig.node.len(), 26);
}

#[test]
fn insert_allocates_the_holder_with_the_slot() {
    let mut rig = Rig::new(&companion_spec());
    let definition = rig
        .engine
        .registry()
        .definition_for_name("v0")
        .unwrap()
        .clone();

    let id = rig
        .node
        .insert_at(&mut rig.host, &definition, "v1", 1)
        .unwrap();
    let slot = rig.node.slot_by_id(id).unwrap();
    let holder = slot.holder.as_ref().expect("definition demands a holder");
    assert_eq!(holder.label, "v1");
    assert!(holder.is_default());
    assert!(!slot.is_occupied());
}

#[test]
fn remove_at_reindexes_the_tail() {
    let (mut rig, links) = grown_rig();
    let removed = rig.node.remove_at(&mut rig.host, 0).unwrap();
    assert_eq!(removed.name, "x0");

    for (index, slot) in rig.node.slots().iter().enumerate() {
        assert_eq!(slot.position, index);
    }
    // The second connection shifted down with its slot.
    assert_eq!(rig.host.link_targets[&links[1]], 0);
}
