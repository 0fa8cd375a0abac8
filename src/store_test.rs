#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::element::Anchor;
use crate::scene::build_scene;

fn store() -> DocStore {
    DocStore::default()
}

fn shape_at(store: &mut DocStore, x: f64, y: f64) -> ElementId {
    store.add(ElementKind::Shape, &ElementPatch::position(x, y))
}

fn text_with(store: &mut DocStore, text: &str) -> ElementId {
    store.add(ElementKind::Text, &ElementPatch::prop("text", text))
}

fn follow(store: &mut DocStore, leader: &str, anchor: Anchor) -> ElementId {
    let patch = ElementPatch {
        anchor: Some(Some(anchor)),
        relative_to: Some(Some(leader.to_owned())),
        ..ElementPatch::default()
    };
    store.add(ElementKind::Text, &patch)
}

fn el<'a>(store: &'a DocStore, id: &str) -> &'a Element {
    store.get(id).unwrap()
}

fn ids(store: &DocStore) -> Vec<ElementId> {
    store.elements().iter().map(|e| e.id.clone()).collect()
}

// =============================================================
// add
// =============================================================

#[test]
fn add_merges_patch_over_skeleton() {
    let mut s = store();
    let id = text_with(&mut s, "Hi");
    let e = el(&s, &id);
    assert_eq!(e.kind, ElementKind::Text);
    assert_eq!(e.style().text(), "Hi");
    assert_eq!(e.style().font_size(), 32.0);
    assert_eq!((e.x, e.y, e.width, e.height), (20.0, 20.0, 60.0, 10.0));
}

#[test]
fn add_appends_on_top_and_selects() {
    let mut s = store();
    let a = shape_at(&mut s, 0.0, 0.0);
    let b = shape_at(&mut s, 10.0, 10.0);
    assert_eq!(ids(&s), vec![a, b.clone()]);
    assert_eq!(s.selection(), &[b]);
}

#[test]
fn add_assigns_unique_ids() {
    let mut s = store();
    let a = shape_at(&mut s, 0.0, 0.0);
    let b = shape_at(&mut s, 0.0, 0.0);
    assert_ne!(a, b);
    assert!(!a.is_empty());
}

#[test]
fn add_clamps_geometry() {
    let mut s = store();
    let id = s.add(
        ElementKind::Shape,
        &ElementPatch { x: Some(-20.0), width: Some(0.0), rotation: Some(-90.0), ..ElementPatch::default() },
    );
    let e = el(&s, &id);
    assert_eq!(e.x, 0.0);
    assert_eq!(e.width, 5.0);
    assert_eq!(e.rotation, 270.0);
}

// =============================================================
// update: merge and clamp
// =============================================================

#[test]
fn update_unknown_id_is_noop() {
    let mut s = store();
    shape_at(&mut s, 0.0, 0.0);
    let before = s.snapshot();
    assert!(!s.update("missing", &ElementPatch::position(1.0, 1.0)));
    assert_eq!(s.snapshot(), before);
}

#[test]
fn update_leaves_other_fields_untouched() {
    let mut s = store();
    let id = text_with(&mut s, "Hello");
    let mut expected = el(&s, &id).clone();
    assert!(s.update(&id, &ElementPatch { x: Some(10.0), ..ElementPatch::default() }));
    expected.x = 10.0;
    assert_eq!(el(&s, &id), &expected);
}

#[test]
fn update_clamps_size_floor() {
    let mut s = store();
    let id = shape_at(&mut s, 0.0, 0.0);
    s.update(&id, &ElementPatch { width: Some(-5.0), height: Some(-5.0), ..ElementPatch::default() });
    assert_eq!(el(&s, &id).width, 5.0);
    assert_eq!(el(&s, &id).height, 3.0);
}

#[test]
fn update_clamps_position() {
    let mut s = store();
    let id = shape_at(&mut s, 0.0, 0.0);
    s.update(&id, &ElementPatch::position(200.0, -1.0));
    assert_eq!(el(&s, &id).x, 95.0);
    assert_eq!(el(&s, &id).y, 0.0);
}

#[test]
fn update_normalizes_rotation() {
    let mut s = store();
    let id = shape_at(&mut s, 0.0, 0.0);
    s.update(&id, &ElementPatch { rotation: Some(-10.0), ..ElementPatch::default() });
    assert_eq!(el(&s, &id).rotation, 350.0);
    s.update(&id, &ElementPatch { rotation: Some(370.0), ..ElementPatch::default() });
    assert_eq!(el(&s, &id).rotation, 10.0);
}

#[test]
fn update_clamps_opacity_and_rejects_nan() {
    let mut s = store();
    let id = shape_at(&mut s, 0.0, 0.0);
    s.update(&id, &ElementPatch { opacity: Some(3.0), x: Some(f64::NAN), ..ElementPatch::default() });
    assert_eq!(el(&s, &id).opacity, 1.0);
    assert_eq!(el(&s, &id).x, 0.0);
}

#[test]
fn update_null_prop_removes_key() {
    let mut s = store();
    let id = shape_at(&mut s, 0.0, 0.0);
    s.update(&id, &ElementPatch::prop("stroke", "#000"));
    assert_eq!(el(&s, &id).style().stroke(), Some("#000"));
    s.update(&id, &ElementPatch::prop("stroke", json!(null)));
    assert_eq!(el(&s, &id).style().stroke(), None);
}

#[test]
fn locked_element_still_accepts_update() {
    let mut s = store();
    let id = shape_at(&mut s, 0.0, 0.0);
    s.set_locked(&id, true);
    assert!(s.update(&id, &ElementPatch::prop("fill", "#fff")));
    assert_eq!(el(&s, &id).style().fill(), "#fff");
}

#[test]
fn bind_config_survives_unrelated_updates() {
    let mut s = store();
    let id = s.add(
        ElementKind::Text,
        &ElementPatch {
            is_bindable: Some(true),
            bind_config: Some(json!({"field": "title"})),
            ..ElementPatch::default()
        },
    );
    s.update(&id, &ElementPatch::position(40.0, 40.0));
    s.update(&id, &ElementPatch::prop("color", "#f00"));
    assert!(el(&s, &id).is_bindable);
    assert_eq!(el(&s, &id).bind_config, Some(json!({"field": "title"})));
}

// =============================================================
// Auto-scale
// =============================================================

#[test]
fn auto_scale_shrinks_long_text() {
    let mut s = store();
    let id = text_with(&mut s, &"x".repeat(40));
    s.update(&id, &ElementPatch { auto_scale: Some(true), ..ElementPatch::default() });
    // 600 px box / (40 chars * 0.55) = 27.27
    assert_eq!(el(&s, &id).style().font_size(), 27.0);
}

#[test]
fn auto_scale_respects_font_floor() {
    let mut s = store();
    let id = text_with(&mut s, &"x".repeat(200));
    s.update(&id, &ElementPatch { auto_scale: Some(true), ..ElementPatch::default() });
    assert_eq!(el(&s, &id).style().font_size(), 10.0);
}

#[test]
fn auto_scale_never_grows() {
    let mut s = store();
    let id = text_with(&mut s, "Hi");
    s.update(&id, &ElementPatch { auto_scale: Some(true), ..ElementPatch::default() });
    assert_eq!(el(&s, &id).style().font_size(), 32.0);
}

#[test]
fn auto_scale_off_keeps_font() {
    let mut s = store();
    let id = text_with(&mut s, &"x".repeat(40));
    s.update(&id, &ElementPatch { width: Some(20.0), ..ElementPatch::default() });
    assert_eq!(el(&s, &id).style().font_size(), 32.0);
}

#[test]
fn auto_scale_reruns_on_width_change() {
    let mut s = store();
    let id = text_with(&mut s, &"x".repeat(20));
    s.update(&id, &ElementPatch { auto_scale: Some(true), ..ElementPatch::default() });
    assert_eq!(el(&s, &id).style().font_size(), 32.0);
    s.update(&id, &ElementPatch { width: Some(30.0), ..ElementPatch::default() });
    // 300 px / (20 * 0.55) = 27.27
    assert_eq!(el(&s, &id).style().font_size(), 27.0);
}

#[test]
fn auto_scale_ignores_non_text() {
    let mut s = store();
    let id = shape_at(&mut s, 0.0, 0.0);
    s.update(&id, &ElementPatch { auto_scale: Some(true), ..ElementPatch::default() });
    assert!(!el(&s, &id).props.contains_key("fontSize"));
}

// =============================================================
// Anchor follow
// =============================================================

#[test]
fn bottom_anchor_places_below_leader_on_add() {
    let mut s = store();
    let leader = shape_at(&mut s, 10.0, 20.0);
    let f = follow(&mut s, &leader, Anchor::Bottom);
    assert_eq!(el(&s, &f).y, 52.0);
}

#[test]
fn bottom_anchor_follows_leader_updates() {
    let mut s = store();
    let leader = shape_at(&mut s, 10.0, 20.0);
    let f = follow(&mut s, &leader, Anchor::BottomLeft);
    s.update(&leader, &ElementPatch::position(10.0, 30.0));
    assert_eq!(el(&s, &f).y, 62.0);
    s.update(&leader, &ElementPatch { height: Some(10.0), ..ElementPatch::default() });
    assert_eq!(el(&s, &f).y, 42.0);
}

#[test]
fn top_anchor_places_above_leader() {
    let mut s = store();
    let leader = shape_at(&mut s, 10.0, 40.0);
    let f = follow(&mut s, &leader, Anchor::Top);
    // text height 10, gap 2
    assert_eq!(el(&s, &f).y, 28.0);
}

#[test]
fn top_anchor_floors_at_zero() {
    let mut s = store();
    let leader = shape_at(&mut s, 10.0, 5.0);
    let f = follow(&mut s, &leader, Anchor::TopRight);
    assert_eq!(el(&s, &f).y, 0.0);
}

#[test]
fn unknown_anchor_does_not_move() {
    let mut s = store();
    let leader = shape_at(&mut s, 10.0, 20.0);
    let f = follow(&mut s, &leader, Anchor::Other("left".into()));
    assert_eq!(el(&s, &f).y, 20.0);
}

#[test]
fn anchors_cascade_through_chains() {
    let mut s = store();
    let a = shape_at(&mut s, 0.0, 0.0);
    let b = follow(&mut s, &a, Anchor::Bottom);
    let c = follow(&mut s, &b, Anchor::Bottom);
    assert_eq!(el(&s, &b).y, 32.0);
    assert_eq!(el(&s, &c).y, 44.0);
    s.update(&a, &ElementPatch::position(0.0, 10.0));
    assert_eq!(el(&s, &b).y, 42.0);
    assert_eq!(el(&s, &c).y, 54.0);
}

#[test]
fn cyclic_anchors_terminate() {
    let mut s = store();
    let a = shape_at(&mut s, 0.0, 0.0);
    let b = follow(&mut s, &a, Anchor::Bottom);
    s.update(
        &a,
        &ElementPatch {
            anchor: Some(Some(Anchor::Bottom)),
            relative_to: Some(Some(b.clone())),
            ..ElementPatch::default()
        },
    );
    s.update(&a, &ElementPatch::position(0.0, 5.0));
    assert!(s.get(&a).is_some());
}

#[test]
fn detaching_stops_following() {
    let mut s = store();
    let leader = shape_at(&mut s, 10.0, 20.0);
    let f = follow(&mut s, &leader, Anchor::Bottom);
    s.update(&f, &ElementPatch { relative_to: Some(None), ..ElementPatch::default() });
    s.update(&leader, &ElementPatch::position(10.0, 0.0));
    assert_eq!(el(&s, &f).y, 52.0);
}

// =============================================================
// delete
// =============================================================

#[test]
fn delete_removes_and_prunes_selection() {
    let mut s = store();
    let a = shape_at(&mut s, 0.0, 0.0);
    assert!(s.delete(&a));
    assert!(s.get(&a).is_none());
    assert!(s.selection().is_empty());
    assert!(!s.delete(&a));
}

#[test]
fn delete_leader_detaches_followers() {
    let mut s = store();
    let leader = shape_at(&mut s, 10.0, 20.0);
    let f = follow(&mut s, &leader, Anchor::Bottom);
    s.delete(&leader);
    assert_eq!(el(&s, &f).relative_to, None);
}

#[test]
fn delete_group_releases_members() {
    let mut s = store();
    let a = shape_at(&mut s, 0.0, 0.0);
    let b = shape_at(&mut s, 40.0, 40.0);
    let g = s.group(&[a.clone(), b.clone()]).unwrap();
    assert!(s.delete(&g));
    assert_eq!(el(&s, &a).group_id, None);
    assert_eq!(el(&s, &b).group_id, None);
    assert_eq!(s.elements().len(), 2);
}

#[test]
fn deleting_member_of_pair_dissolves_group() {
    let mut s = store();
    let a = shape_at(&mut s, 0.0, 0.0);
    let b = shape_at(&mut s, 40.0, 40.0);
    let g = s.group(&[a.clone(), b.clone()]).unwrap();
    s.delete(&a);
    assert!(s.get(&g).is_none());
    assert_eq!(el(&s, &b).group_id, None);
    assert!(s.selection().is_empty());
}

#[test]
fn deleting_member_of_trio_refits_group() {
    let mut s = store();
    let a = shape_at(&mut s, 0.0, 0.0);
    let b = shape_at(&mut s, 20.0, 20.0);
    let c = shape_at(&mut s, 60.0, 60.0);
    let g = s.group(&[a, b.clone(), c.clone()]).unwrap();
    s.delete(&c);
    let group = el(&s, &g);
    assert_eq!(group.children.len(), 2);
    assert!(!group.children.contains(&c));
    assert!(group.children.contains(&b));
    assert_eq!(group.bounds(), Rect::new(0.0, 0.0, 50.0, 50.0));
}

#[test]
fn delete_selection_removes_all_selected() {
    let mut s = store();
    let a = shape_at(&mut s, 0.0, 0.0);
    let b = shape_at(&mut s, 10.0, 0.0);
    let c = shape_at(&mut s, 20.0, 0.0);
    s.set_selection(&[a, b]);
    assert_eq!(s.delete_selection(), 2);
    assert_eq!(ids(&s), vec![c]);
}

// =============================================================
// duplicate / clipboard
// =============================================================

#[test]
fn duplicate_offsets_and_selects() {
    let mut s = store();
    let a = shape_at(&mut s, 10.0, 10.0);
    let d = s.duplicate(&a).unwrap();
    assert_ne!(a, d);
    assert_eq!((el(&s, &d).x, el(&s, &d).y), (13.0, 13.0));
    assert_eq!(s.selection(), &[d.clone()]);
    assert_eq!(ids(&s).last(), Some(&d));
}

#[test]
fn duplicate_unknown_is_none() {
    let mut s = store();
    assert!(s.duplicate("nope").is_none());
}

#[test]
fn duplicate_group_copies_members() {
    let mut s = store();
    let a = shape_at(&mut s, 0.0, 0.0);
    let b = shape_at(&mut s, 40.0, 40.0);
    let g = s.group(&[a.clone(), b.clone()]).unwrap();
    let d = s.duplicate(&g).unwrap();

    let copy = el(&s, &d).clone();
    assert_eq!(copy.children.len(), 2);
    for child in &copy.children {
        assert_ne!(child, &a);
        assert_ne!(child, &b);
        assert_eq!(el(&s, child).group_id.as_deref(), Some(d.as_str()));
    }
    assert_eq!(copy.bounds(), Rect::new(3.0, 3.0, 70.0, 70.0));
    assert_eq!(el(&s, &g).children, vec![a, b]);
}

#[test]
fn duplicate_of_member_is_standalone() {
    let mut s = store();
    let a = shape_at(&mut s, 0.0, 0.0);
    let b = shape_at(&mut s, 40.0, 40.0);
    let g = s.group(&[a.clone(), b]).unwrap();
    let d = s.duplicate(&a).unwrap();
    assert_eq!(el(&s, &d).group_id, None);
    assert_eq!(el(&s, &g).children.len(), 2);
}

#[test]
fn duplicate_selection_selects_copies() {
    let mut s = store();
    let a = shape_at(&mut s, 0.0, 0.0);
    let b = shape_at(&mut s, 10.0, 0.0);
    s.set_selection(&[a, b]);
    let copies = s.duplicate_selection();
    assert_eq!(copies.len(), 2);
    assert_eq!(s.selection(), copies.as_slice());
    assert_eq!(s.elements().len(), 4);
}

#[test]
fn paste_offsets_from_original_each_time() {
    let mut s = store();
    let a = shape_at(&mut s, 10.0, 10.0);
    assert!(s.copy(&a));
    let p1 = s.paste().unwrap();
    let p2 = s.paste().unwrap();
    assert_ne!(p1, p2);
    assert_eq!((el(&s, &p1).x, el(&s, &p1).y), (15.0, 15.0));
    assert_eq!((el(&s, &p2).x, el(&s, &p2).y), (15.0, 15.0));
    assert_eq!(s.selection(), &[p2]);
}

#[test]
fn paste_with_empty_clipboard_is_none() {
    let mut s = store();
    assert!(!s.has_clipboard());
    assert!(s.paste().is_none());
}

#[test]
fn copy_is_a_snapshot() {
    let mut s = store();
    let a = shape_at(&mut s, 10.0, 10.0);
    s.copy(&a);
    s.update(&a, &ElementPatch::position(50.0, 50.0));
    let p = s.paste().unwrap();
    assert_eq!(el(&s, &p).x, 15.0);
}

#[test]
fn cut_removes_and_fills_clipboard() {
    let mut s = store();
    let a = shape_at(&mut s, 10.0, 10.0);
    assert!(s.cut(&a));
    assert!(s.get(&a).is_none());
    let p = s.paste().unwrap();
    assert_eq!(el(&s, &p).x, 15.0);
}

// =============================================================
// group / ungroup
// =============================================================

#[test]
fn group_builds_union_box() {
    let mut s = store();
    let a = shape_at(&mut s, 10.0, 10.0);
    let b = shape_at(&mut s, 50.0, 50.0);
    let g = s.group(&[a.clone(), b.clone()]).unwrap();
    let group = el(&s, &g);
    assert!(group.is_group());
    assert_eq!(group.bounds(), Rect::new(10.0, 10.0, 70.0, 70.0));
    assert_eq!(group.children, vec![a.clone(), b.clone()]);
    assert_eq!(el(&s, &a).group_id.as_deref(), Some(g.as_str()));
    assert_eq!(el(&s, &b).group_id.as_deref(), Some(g.as_str()));
    assert_eq!(s.selection(), &[g]);
}

#[test]
fn group_needs_two_eligible() {
    let mut s = store();
    let a = shape_at(&mut s, 10.0, 10.0);
    assert!(s.group(&[a.clone()]).is_none());
    assert!(s.group(&[a.clone(), a.clone()]).is_none());
    assert!(s.group(&[a, "ghost".into()]).is_none());
}

#[test]
fn group_skips_grouped_members() {
    let mut s = store();
    let a = shape_at(&mut s, 0.0, 0.0);
    let b = shape_at(&mut s, 10.0, 0.0);
    let c = shape_at(&mut s, 20.0, 0.0);
    let g = s.group(&[a.clone(), b]).unwrap();
    assert!(s.group(&[a, c.clone()]).is_none());
    assert!(s.group(&[g, c]).is_none());
}

#[test]
fn group_ungroup_round_trip() {
    let mut s = store();
    let a = shape_at(&mut s, 10.0, 10.0);
    let b = shape_at(&mut s, 50.0, 50.0);
    let before = s.snapshot();
    s.set_selection(&[a.clone(), b.clone()]);
    let g = s.group_selection().unwrap();
    assert!(s.ungroup(&g));
    assert_eq!(s.snapshot(), before);
    assert_eq!(s.selection(), &[a, b]);
}

#[test]
fn ungroup_non_group_is_noop() {
    let mut s = store();
    let a = shape_at(&mut s, 10.0, 10.0);
    assert!(!s.ungroup(&a));
    assert!(!s.ungroup("ghost"));
}

#[test]
fn moving_group_carries_members() {
    let mut s = store();
    let a = shape_at(&mut s, 10.0, 10.0);
    let b = shape_at(&mut s, 50.0, 50.0);
    let g = s.group(&[a.clone(), b.clone()]).unwrap();
    assert!(s.move_by(&[g.clone()], 5.0, 5.0));
    assert_eq!(el(&s, &g).bounds(), Rect::new(15.0, 15.0, 70.0, 70.0));
    assert_eq!((el(&s, &a).x, el(&s, &a).y), (15.0, 15.0));
    assert_eq!((el(&s, &b).x, el(&s, &b).y), (55.0, 55.0));
}

#[test]
fn scaling_group_scales_members() {
    let mut s = store();
    let a = shape_at(&mut s, 10.0, 10.0);
    let b = shape_at(&mut s, 50.0, 10.0);
    let g = s.group(&[a.clone(), b.clone()]).unwrap();
    s.update(&g, &ElementPatch { width: Some(140.0), ..ElementPatch::default() });
    assert_eq!(el(&s, &a).bounds(), Rect::new(10.0, 10.0, 60.0, 30.0));
    assert_eq!(el(&s, &b).bounds(), Rect::new(90.0, 10.0, 60.0, 30.0));
}

#[test]
fn anchor_follow_refits_followers_group() {
    let mut s = store();
    let leader = shape_at(&mut s, 10.0, 0.0);
    let f = follow(&mut s, &leader, Anchor::Bottom);
    let o = shape_at(&mut s, 60.0, 60.0);
    let g = s.group(&[f.clone(), o.clone()]).unwrap();
    assert_eq!(el(&s, &g).bounds(), Rect::new(20.0, 32.0, 70.0, 58.0));

    s.update(&leader, &ElementPatch::position(10.0, 10.0));
    assert_eq!(el(&s, &f).y, 42.0);
    let union = Rect::union([el(&s, &f).bounds(), el(&s, &o).bounds()]).unwrap();
    assert_eq!(el(&s, &g).bounds(), union);
    assert_eq!(union, Rect::new(20.0, 42.0, 70.0, 48.0));
}

#[test]
fn ungroup_detaches_followers_of_group() {
    let mut s = store();
    let a = shape_at(&mut s, 0.0, 0.0);
    let b = shape_at(&mut s, 40.0, 0.0);
    let g = s.group(&[a, b]).unwrap();
    let t = follow(&mut s, &g, Anchor::Bottom);
    assert_eq!(el(&s, &t).relative_to.as_deref(), Some(g.as_str()));
    assert!(s.ungroup(&g));
    assert_eq!(el(&s, &t).relative_to, None);
}

#[test]
fn dissolved_group_detaches_followers() {
    let mut s = store();
    let a = shape_at(&mut s, 0.0, 0.0);
    let b = shape_at(&mut s, 40.0, 0.0);
    let g = s.group(&[a.clone(), b]).unwrap();
    let t = follow(&mut s, &g, Anchor::Bottom);
    assert!(s.delete(&a));
    assert!(s.get(&g).is_none());
    assert_eq!(el(&s, &t).relative_to, None);
}

#[test]
fn moving_member_refits_group() {
    let mut s = store();
    let a = shape_at(&mut s, 10.0, 10.0);
    let b = shape_at(&mut s, 50.0, 50.0);
    let g = s.group(&[a.clone(), b]).unwrap();
    s.update(&a, &ElementPatch::position(0.0, 0.0));
    assert_eq!(el(&s, &g).bounds(), Rect::new(0.0, 0.0, 80.0, 80.0));
}

// =============================================================
// z-order
// =============================================================

#[test]
fn reorder_moves_by_index() {
    let mut s = store();
    let a = shape_at(&mut s, 0.0, 0.0);
    let b = shape_at(&mut s, 0.0, 0.0);
    let c = shape_at(&mut s, 0.0, 0.0);
    assert!(s.reorder(0, 2));
    assert_eq!(ids(&s), vec![b.clone(), c.clone(), a.clone()]);
    assert!(!s.reorder(5, 0));
    assert!(!s.reorder(1, 1));
    assert!(s.reorder(1, 99));
    assert_eq!(ids(&s), vec![b, a, c]);
    assert!(!s.reorder(2, 99));
}

#[test]
fn front_back_forward_backward() {
    let mut s = store();
    let a = shape_at(&mut s, 0.0, 0.0);
    let b = shape_at(&mut s, 0.0, 0.0);
    let c = shape_at(&mut s, 0.0, 0.0);

    assert!(s.bring_to_front(&a));
    assert_eq!(ids(&s), vec![b.clone(), c.clone(), a.clone()]);
    assert!(s.send_to_back(&a));
    assert_eq!(ids(&s), vec![a.clone(), b.clone(), c.clone()]);
    assert!(s.bring_forward(&a));
    assert_eq!(ids(&s), vec![b.clone(), a.clone(), c.clone()]);
    assert!(s.send_backward(&c));
    assert_eq!(ids(&s), vec![b.clone(), c.clone(), a.clone()]);

    assert!(!s.send_backward(&b));
    assert!(!s.bring_forward(&a));
    assert!(!s.bring_to_front("ghost"));
}

fn paint_order(store: &DocStore) -> Vec<ElementId> {
    build_scene(store.document(), 100.0, 100.0).items.into_iter().map(|i| i.id).collect()
}

#[test]
fn group_moves_with_members_in_z_order() {
    let mut s = store();
    let a = shape_at(&mut s, 0.0, 0.0);
    let b = shape_at(&mut s, 10.0, 10.0);
    let c = shape_at(&mut s, 20.0, 20.0);
    let g = s.group(&[a.clone(), b.clone()]).unwrap();
    assert_eq!(paint_order(&s), vec![a.clone(), b.clone(), c.clone()]);

    assert!(s.bring_to_front(&g));
    assert_eq!(paint_order(&s), vec![c.clone(), a.clone(), b.clone()]);
    assert_eq!(ids(&s), vec![c.clone(), a.clone(), b.clone(), g.clone()]);

    assert!(s.send_backward(&g));
    assert_eq!(paint_order(&s), vec![a.clone(), b.clone(), c.clone()]);
    assert!(!s.send_to_back(&g));

    assert!(s.bring_forward(&g));
    assert_eq!(paint_order(&s), vec![c.clone(), a.clone(), b.clone()]);
    assert!(!s.bring_forward(&g));
}

#[test]
fn reorder_of_group_index_moves_block() {
    let mut s = store();
    let a = shape_at(&mut s, 0.0, 0.0);
    let b = shape_at(&mut s, 10.0, 10.0);
    let c = shape_at(&mut s, 20.0, 20.0);
    let g = s.group(&[a.clone(), b.clone()]).unwrap();
    assert!(s.send_to_back(&c));
    assert_eq!(ids(&s), vec![c.clone(), a.clone(), b.clone(), g.clone()]);
    assert!(s.reorder(3, 0));
    assert_eq!(ids(&s), vec![a, b, g, c]);
}

// =============================================================
// align / move / nudge
// =============================================================

#[test]
fn align_against_frame() {
    let mut s = store();
    let id = shape_at(&mut s, 10.0, 10.0);
    let cases = [
        (AlignMode::Left, (0.0, 10.0)),
        (AlignMode::Center, (35.0, 10.0)),
        (AlignMode::Right, (70.0, 10.0)),
        (AlignMode::Top, (70.0, 0.0)),
        (AlignMode::Middle, (70.0, 35.0)),
        (AlignMode::Bottom, (70.0, 70.0)),
    ];
    for (mode, (x, y)) in cases {
        assert!(s.align(&id, mode));
        assert_eq!((el(&s, &id).x, el(&s, &id).y), (x, y), "{mode:?}");
    }
}

#[test]
fn locked_rejects_transforms() {
    let mut s = store();
    let id = shape_at(&mut s, 10.0, 10.0);
    s.set_locked(&id, true);
    assert!(!s.align(&id, AlignMode::Left));
    assert!(!s.move_by(&[id.clone()], 5.0, 5.0));
    assert_eq!(el(&s, &id).x, 10.0);
}

#[test]
fn nudge_moves_selection() {
    let mut s = store();
    let a = shape_at(&mut s, 10.0, 10.0);
    s.nudge_selection(1.0, 0.0, false);
    assert_eq!(el(&s, &a).x, 11.0);
    s.nudge_selection(0.0, -1.0, true);
    assert_eq!(el(&s, &a).y, 0.0);
}

#[test]
fn move_by_skips_members_of_moved_group() {
    let mut s = store();
    let a = shape_at(&mut s, 10.0, 10.0);
    let b = shape_at(&mut s, 50.0, 50.0);
    let g = s.group(&[a.clone(), b]).unwrap();
    s.move_by(&[g, a.clone()], 5.0, 0.0);
    assert_eq!(el(&s, &a).x, 15.0);
}

// =============================================================
// selection
// =============================================================

#[test]
fn select_and_toggle() {
    let mut s = store();
    let a = shape_at(&mut s, 0.0, 0.0);
    let b = shape_at(&mut s, 0.0, 0.0);
    assert!(s.select(&a));
    assert_eq!(s.selection(), &[a.clone()]);
    s.toggle_select(&b, true);
    assert_eq!(s.selection(), &[a.clone(), b.clone()]);
    s.toggle_select(&a, true);
    assert_eq!(s.selection(), &[b.clone()]);
    s.toggle_select(&a, false);
    assert_eq!(s.selection(), &[a.clone()]);
    assert!(!s.select("ghost"));
    assert_eq!(s.selection(), &[a]);
    s.clear_selection();
    assert!(s.selection().is_empty());
}

#[test]
fn select_all_skips_members() {
    let mut s = store();
    let a = shape_at(&mut s, 0.0, 0.0);
    let b = shape_at(&mut s, 0.0, 0.0);
    let c = shape_at(&mut s, 0.0, 0.0);
    let g = s.group(&[a, b]).unwrap();
    s.select_all();
    assert_eq!(s.selection(), &[c, g]);
}

#[test]
fn set_selection_filters_unknown_and_duplicates() {
    let mut s = store();
    let a = shape_at(&mut s, 0.0, 0.0);
    s.set_selection(&[a.clone(), "ghost".into(), a.clone()]);
    assert_eq!(s.selection(), &[a]);
}

#[test]
fn replace_elements_prunes_selection() {
    let mut s = store();
    let a = shape_at(&mut s, 0.0, 0.0);
    let before = s.snapshot();
    let b = shape_at(&mut s, 0.0, 0.0);
    s.set_selection(&[a.clone(), b]);
    s.replace_elements(before);
    assert_eq!(s.selection(), &[a]);
}

// =============================================================
// viewport / document settings
// =============================================================

#[test]
fn zoom_is_clamped() {
    let mut s = store();
    s.set_zoom(10.0);
    assert_eq!(s.viewport().zoom, 5.0);
    s.set_zoom(0.01);
    assert_eq!(s.viewport().zoom, 0.1);
    s.set_zoom(f64::NAN);
    assert_eq!(s.viewport().zoom, 0.1);
}

#[test]
fn pan_accumulates() {
    let mut s = store();
    s.pan_by(10.0, -5.0);
    s.pan_by(1.0, 1.0);
    assert_eq!((s.viewport().pan_x, s.viewport().pan_y), (11.0, -4.0));
}

#[test]
fn document_settings_setters() {
    let mut s = store();
    s.set_background(Background { color: "#000000".into(), image: None, gradient: None });
    s.set_frame(Frame::from_preset(&crate::document::FRAME_PRESETS[1]));
    s.set_grid(GridConfig { grid_visible: true, snap_enabled: false, grid_size: 10.0 });
    assert_eq!(s.document().background.color, "#000000");
    assert_eq!(s.document().frame.height, 1920);
    assert!(!s.document().config.snap_enabled);
}
