use super::*;
use crate::dom::{parse_document, select_all, select_first};

const FORM: &str = r#"
<div class="section">
  <p><label>Name</label><input type="text" name="Name" value="Jane Doe" size="30"></p>
  <p><input type="email" name="Email" value="" style="width:240px"></p>
  <p><input name="City" value="Leeds" style="width:180px;font-family:Georgia;font-style:italic"></p>
  <p><textarea name="Notes">first
second</textarea></p>
  <p><textarea name="Empty"></textarea></p>
  <p><input type="checkbox" name="agree" checked> I agree</p>
  <p><input type="checkbox" name="news"> Newsletter</p>
  <p><input type="radio" name="plan" value="a"> A <input type="radio" name="plan" value="b" checked> B</p>
  <p><select name="size"><option>S</option></select><input type="file" name="upload"></p>
</div>"#;

fn section() -> NodeRef {
    let doc = parse_document(FORM);
    select_first(&doc, ".section").unwrap()
}

fn texts(snapshot: &Snapshot) -> Vec<String> {
    snapshot
        .records()
        .iter()
        .map(|record| record.replacement.text_contents())
        .collect()
}

#[test]
fn test_snapshot_orders_records_by_field_group() {
    let root = section();
    let snapshot = FieldSnapshotBuilder::snapshot(&root);

    let kinds: Vec<FieldKind> = snapshot.records().iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            FieldKind::SingleLine,
            FieldKind::SingleLine,
            FieldKind::MultiLine,
            FieldKind::Checkbox,
            FieldKind::Checkbox,
            FieldKind::Radio,
            FieldKind::Radio,
        ]
    );
    assert_eq!(
        texts(&snapshot),
        vec![
            "Jane Doe",
            "Leeds",
            "first\nsecond",
            CHECKBOX_CHECKED,
            CHECKBOX_UNCHECKED,
            RADIO_UNCHECKED,
            RADIO_CHECKED,
        ]
    );
}

#[test]
fn test_snapshot_skips_empty_values_and_unsupported_fields() {
    let root = section();
    let _snapshot = FieldSnapshotBuilder::snapshot(&root);

    let remaining: Vec<String> = select_all(&root, "input, textarea, select")
        .iter()
        .filter_map(|node| dom::attr(node, "name"))
        .collect();
    assert_eq!(remaining, vec!["Email", "Empty", "size", "upload"]);
}

#[test]
fn test_snapshot_carries_width_and_font_overrides() {
    let root = section();
    let snapshot = FieldSnapshotBuilder::snapshot(&root);

    let name = &snapshot.records()[0].replacement;
    assert_eq!(dom::style_property(name, "min-width").as_deref(), Some("30ch"));

    let city = &snapshot.records()[1].replacement;
    let style = dom::attr(city, "style").unwrap();
    assert!(style.contains("min-width:180px;"));
    assert!(style.contains("font-family:Georgia;"));
    assert!(style.contains("font-style:italic;"));

    let notes = &snapshot.records()[2].replacement;
    assert_eq!(dom::tag_name(notes).as_deref(), Some("div"));
    assert_eq!(
        dom::style_property(notes, "white-space").as_deref(),
        Some("pre-wrap")
    );
}

#[test]
fn test_records_point_at_live_parents() {
    let root = section();
    let snapshot = FieldSnapshotBuilder::snapshot(&root);

    for record in snapshot.records() {
        assert!(record.is_in_place());
        assert!(record.original.parent().is_none());
    }
}

#[test]
fn test_restore_reinstates_identical_tree() {
    let root = section();
    let before = root.to_string();

    let mut snapshot = FieldSnapshotBuilder::snapshot(&root);
    assert_ne!(root.to_string(), before);

    let restored = Restorer::restore(&mut snapshot);
    assert_eq!(restored, 7);
    assert!(snapshot.is_empty());
    assert_eq!(root.to_string(), before);
}

#[test]
fn test_restore_twice_is_harmless() {
    let root = section();
    let before = root.to_string();

    let mut snapshot = FieldSnapshotBuilder::snapshot(&root);
    let records = snapshot.records().to_vec();

    assert_eq!(Restorer::restore(&mut snapshot), 7);
    assert_eq!(Restorer::restore(&mut snapshot), 0);
    assert_eq!(Restorer::restore_records(&records), 0);
    assert_eq!(root.to_string(), before);
}

#[test]
fn test_restore_records_skips_moved_replacements() {
    let root = section();
    let snapshot = FieldSnapshotBuilder::snapshot(&root);
    let records = snapshot.records().to_vec();

    // Someone else detached the first static node.
    records[0].replacement.detach();

    assert_eq!(Restorer::restore_records(&records), records.len() - 1);
    assert!(records[0].original.parent().is_none());
    assert!(records[1].original.parent().is_some());
}

#[test]
fn test_empty_root_gives_empty_snapshot() {
    let doc = parse_document("<div class=\"section\"><p>No fields</p></div>");
    let root = select_first(&doc, ".section").unwrap();
    let mut snapshot = FieldSnapshotBuilder::snapshot(&root);
    assert!(snapshot.is_empty());
    assert_eq!(Restorer::restore(&mut snapshot), 0);
}

#[test]
fn test_glyphs() {
    assert_eq!(checkbox_glyph(true), "☑");
    assert_eq!(checkbox_glyph(false), "☐");
    assert_eq!(radio_glyph(true), "◉");
    assert_eq!(radio_glyph(false), "○");
}
