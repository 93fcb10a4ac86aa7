use fieldcraft_codec::{
    MediaCache, MediaDetail, MediaObject, ResolvedAttachment, StoredValue, attachment_id,
    collect_ids, collect_ids_into, format,
};
use fieldcraft_model::FieldDefinition;
use fieldcraft_types::AttachmentId;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::{BTreeMap, HashSet};

fn ids(raw: &[u64]) -> HashSet<AttachmentId> {
    raw.iter().copied().map(AttachmentId::new).collect()
}

// ── attachment_id ────────────────────────────────────────────────

#[test]
fn attachment_id_coercions() {
    assert_eq!(attachment_id(&json!(4)), Some(AttachmentId::new(4)));
    assert_eq!(attachment_id(&json!("  4 ")), Some(AttachmentId::new(4)));
    assert_eq!(attachment_id(&json!(4.0)), Some(AttachmentId::new(4)));
    assert_eq!(attachment_id(&json!({"id": "4"})), Some(AttachmentId::new(4)));
    assert_eq!(attachment_id(&json!(4.5)), None);
    assert_eq!(attachment_id(&json!(0)), None);
    assert_eq!(attachment_id(&json!(-2)), None);
    assert_eq!(attachment_id(&json!(true)), None);
    assert_eq!(attachment_id(&json!([4])), None);
}

// ── collect_ids ──────────────────────────────────────────────────

#[test]
fn collects_from_image_and_gallery() {
    let image = FieldDefinition::image("cover");
    assert_eq!(collect_ids(&StoredValue::text("8"), &image), ids(&[8]));

    let gallery = FieldDefinition::gallery("photos");
    assert_eq!(collect_ids(&StoredValue::text("[3,7,3,9]"), &gallery), ids(&[3, 7, 9]));
    assert_eq!(collect_ids(&StoredValue::from_json(json!([1, "2"])), &gallery), ids(&[1, 2]));
}

#[test]
fn ignores_scalar_fields() {
    let text = FieldDefinition::text("title");
    assert!(collect_ids(&StoredValue::text("12"), &text).is_empty());
    let number = FieldDefinition::number("count");
    assert!(collect_ids(&StoredValue::text("12"), &number).is_empty());
}

#[test]
fn walks_repeaters_groups_and_sections() {
    let schema = FieldDefinition::group(
        "page",
        vec![
            FieldDefinition::image("hero"),
            FieldDefinition::section("more", vec![FieldDefinition::file("pdf")]),
            FieldDefinition::repeater(
                "slides",
                vec![
                    FieldDefinition::image("photo"),
                    FieldDefinition::gallery("extras"),
                    FieldDefinition::text("caption"),
                ],
            ),
        ],
    );
    let stored = StoredValue::from_json(json!({
        "hero": "1",
        "pdf": "2",
        "slides": "[{\"photo\":\"3\",\"extras\":[4,5],\"caption\":\"6\"},\"junk\",{\"photo\":\"\"}]"
    }));
    assert_eq!(collect_ids(&stored, &schema), ids(&[1, 2, 3, 4, 5]));
}

#[test]
fn includes_default_value_ids() {
    let image = FieldDefinition::image("fallback").with_default(json!(42));
    assert_eq!(collect_ids(&StoredValue::null(), &image), ids(&[42]));
    assert_eq!(collect_ids(&StoredValue::text("7"), &image), ids(&[7]));
}

#[test]
fn group_stored_as_list_collects_child_defaults() {
    let schema = FieldDefinition::group(
        "branding",
        vec![FieldDefinition::image("logo").with_default(json!(5))],
    );
    let stored = StoredValue::from_json(json!([1]));
    let found = collect_ids(&stored, &schema);
    assert_eq!(found, ids(&[5]));

    let mut cache = MediaCache::new(MediaDetail::Basic);
    cache.insert(
        AttachmentId::new(5),
        ResolvedAttachment {
            url: "/logo.png".into(),
            mime_type: "image/png".into(),
            ..ResolvedAttachment::default()
        },
    );
    let out = serde_json::to_value(format(&stored, &schema, &cache)).unwrap();
    assert_eq!(out["logo"]["id"], json!(5));
}

#[test]
fn collect_into_accumulates_across_fields() {
    let mut all = HashSet::new();
    collect_ids_into(&json!("1"), &FieldDefinition::image("a"), &mut all);
    collect_ids_into(&json!([1, 2]), &FieldDefinition::gallery("b"), &mut all);
    assert_eq!(all, ids(&[1, 2]));
}

#[test]
fn malformed_structures_collect_nothing() {
    let gallery = FieldDefinition::gallery("photos");
    assert!(collect_ids(&StoredValue::text("not json"), &gallery).is_empty());
    let repeater = FieldDefinition::repeater("r", vec![FieldDefinition::image("i")]);
    assert!(collect_ids(&StoredValue::from_json(json!({"i": 3})), &repeater).is_empty());
}

// ── MediaCache ───────────────────────────────────────────────────

fn resolved() -> ResolvedAttachment {
    ResolvedAttachment {
        url: "https://cdn.example.com/a.pdf".into(),
        mime_type: "application/pdf".into(),
        alt: String::new(),
        title: "Spec sheet".into(),
        sizes: BTreeMap::new(),
    }
}

#[test]
fn cache_builds_media_objects_at_its_detail_level() {
    let mut basic = MediaCache::new(MediaDetail::Basic);
    basic.insert(AttachmentId::new(2), resolved());
    assert_eq!(
        basic.media(AttachmentId::new(2)),
        Some(MediaObject {
            id: AttachmentId::new(2),
            url: "https://cdn.example.com/a.pdf".into(),
            mime_type: "application/pdf".into(),
            alt: None,
            title: None,
            sizes: None,
        })
    );

    let mut entries = std::collections::HashMap::new();
    entries.insert(AttachmentId::new(2), resolved());
    let full = MediaCache::from_resolved(entries, MediaDetail::Full);
    let media = full.media(AttachmentId::new(2)).unwrap();
    assert_eq!(media.title.as_deref(), Some("Spec sheet"));
    assert_eq!(media.sizes, Some(BTreeMap::new()));
    assert_eq!(full.len(), 1);
    assert!(full.contains(AttachmentId::new(2)));
    assert!(full.media(AttachmentId::new(3)).is_none());
}

#[test]
fn media_detail_serde() {
    assert_eq!(serde_json::to_string(&MediaDetail::Full).unwrap(), "\"full\"");
    let parsed: MediaDetail = serde_json::from_str("\"basic\"").unwrap();
    assert_eq!(parsed, MediaDetail::Basic);
    assert_eq!(MediaDetail::default(), MediaDetail::Basic);
}
