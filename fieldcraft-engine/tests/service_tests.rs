use fieldcraft_codec::{ApiValue, MediaDetail, ResolvedAttachment, StoredValue};
use fieldcraft_engine::{
    Collaborators, CollisionPolicy, EngineConfig, EngineError, FieldService, WriteSummary,
};
use fieldcraft_model::{ContextDescriptor, FieldDefinition, FieldGroup, Rule};
use fieldcraft_store::{
    ContentStore, MemoryAttachmentStore, MemoryContentStore, MemoryContextResolver,
    MemoryOptionsStore, OptionsStore, StoreError,
};
use fieldcraft_types::{AttachmentId, RecordId};
use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};
use std::sync::Arc;

const POST: RecordId = RecordId::new(100);

struct Harness {
    content: MemoryContentStore,
    options: MemoryOptionsStore,
    attachments: MemoryAttachmentStore,
    service: FieldService,
}

fn harness(groups: Vec<FieldGroup>, config: EngineConfig) -> Harness {
    let content = MemoryContentStore::new();
    let options = MemoryOptionsStore::new();
    let attachments = MemoryAttachmentStore::new();
    let contexts = MemoryContextResolver::new();
    contexts
        .register(POST, ContextDescriptor::for_record(POST, "post"))
        .unwrap();

    let stores = Collaborators {
        content: Arc::new(content.clone()),
        options: Arc::new(options.clone()),
        attachments: Arc::new(attachments.clone()),
        contexts: Arc::new(contexts),
    };
    let service = FieldService::new(stores, groups, config).unwrap();
    Harness {
        content,
        options,
        attachments,
        service,
    }
}

fn post_group(key: &str, fields: Vec<FieldDefinition>) -> FieldGroup {
    FieldGroup::new(key, key, fields).with_rules(vec![Rule::content_type("post")])
}

fn image(id: u64) -> ResolvedAttachment {
    ResolvedAttachment {
        url: format!("https://cdn.example.com/{id}.jpg"),
        mime_type: "image/jpeg".into(),
        alt: format!("alt {id}"),
        ..ResolvedAttachment::default()
    }
}

fn input(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

// ── Read path ────────────────────────────────────────────────────

#[test]
fn read_formats_every_field_in_order() {
    let h = harness(
        vec![post_group(
            "group_post",
            vec![
                FieldDefinition::text("subtitle"),
                FieldDefinition::number("rating"),
                FieldDefinition::boolean("featured"),
                FieldDefinition::image("cover"),
            ],
        )],
        EngineConfig::default(),
    );
    h.content.set(POST, "subtitle", StoredValue::text("Hello")).unwrap();
    h.content.set(POST, "rating", StoredValue::text("4.5")).unwrap();
    h.content.set(POST, "cover", StoredValue::text("7")).unwrap();
    h.attachments.insert(AttachmentId::new(7), image(7)).unwrap();

    let out = h.service.read_record(POST).unwrap();
    assert_eq!(
        out.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["subtitle", "rating", "featured", "cover"]
    );
    assert_eq!(out["subtitle"], ApiValue::Text("Hello".into()));
    assert_eq!(out["rating"].as_f64(), Some(4.5));
    assert_eq!(out["featured"], ApiValue::Bool(false));
    assert_eq!(out["cover"].as_media().unwrap().url, "https://cdn.example.com/7.jpg");
    assert_eq!(out["cover"].as_media().unwrap().alt, None);
}

#[test]
fn read_honours_full_media_detail() {
    let config = EngineConfig {
        media_detail: MediaDetail::Full,
        ..EngineConfig::default()
    };
    let h = harness(vec![post_group("group_post", vec![FieldDefinition::image("cover")])], config);
    h.content.set(POST, "cover", StoredValue::text("7")).unwrap();
    h.attachments.insert(AttachmentId::new(7), image(7)).unwrap();

    let out = h.service.read_record(POST).unwrap();
    assert_eq!(out["cover"].as_media().unwrap().alt.as_deref(), Some("alt 7"));
}

#[test]
fn repeater_of_fifty_images_resolves_in_one_batch() {
    let h = harness(
        vec![post_group(
            "group_team",
            vec![
                FieldDefinition::image("logo"),
                FieldDefinition::repeater(
                    "team",
                    vec![FieldDefinition::text("name"), FieldDefinition::image("photo")],
                ),
            ],
        )],
        EngineConfig::default(),
    );
    let rows: Vec<Value> = (0..50)
        .map(|i| json!({"name": format!("member {i}"), "photo": (i % 10 + 1).to_string()}))
        .collect();
    let wire = serde_json::to_string(&rows).unwrap();
    h.content.set(POST, "team", StoredValue::text(wire)).unwrap();
    h.content.set(POST, "logo", StoredValue::text("1")).unwrap();
    for id in 1..=10 {
        h.attachments.insert(AttachmentId::new(id), image(id)).unwrap();
    }

    let out = h.service.read_record(POST).unwrap();
    assert_eq!(h.attachments.batch_calls(), 1);

    let team = out["team"].as_list().unwrap();
    assert_eq!(team.len(), 50);
    assert_eq!(team[49].get("photo").unwrap().as_media().unwrap().id.get(), 10);
    assert_eq!(out["logo"].as_media().unwrap().id.get(), 1);
}

#[test]
fn read_without_media_makes_no_batch_call() {
    let h = harness(vec![post_group("group_post", vec![FieldDefinition::text("subtitle")])], EngineConfig::default());
    h.service.read_record(POST).unwrap();
    assert_eq!(h.attachments.batch_calls(), 0);
}

#[test]
fn gallery_scenario_keeps_duplicates_and_drops_unresolvable() {
    let h = harness(vec![post_group("group_post", vec![FieldDefinition::gallery("photos")])], EngineConfig::default());
    h.content.set(POST, "photos", StoredValue::text("[3,7,3,9]")).unwrap();
    h.attachments.insert(AttachmentId::new(3), image(3)).unwrap();
    h.attachments.insert(AttachmentId::new(9), image(9)).unwrap();

    let out = h.service.read_record(POST).unwrap();
    let ids: Vec<u64> = out["photos"]
        .as_list()
        .unwrap()
        .iter()
        .map(|m| m.as_media().unwrap().id.get())
        .collect();
    assert_eq!(ids, vec![3, 3, 9]);
    assert_eq!(h.attachments.batch_calls(), 1);
}

#[test]
fn flatten_and_override_reads_second_definition() {
    let h = harness(
        vec![
            post_group("group_a", vec![FieldDefinition::text("title")]),
            post_group("group_b", vec![FieldDefinition::number("title")]),
        ],
        EngineConfig::default(),
    );
    h.content.set(POST, "title", StoredValue::text("12")).unwrap();
    let out = h.service.read_record(POST).unwrap();
    assert_eq!(out["title"].as_i64(), Some(12));
}

// ── Write path ───────────────────────────────────────────────────

#[test]
fn write_sanitizes_upserts_and_deletes() {
    let h = harness(
        vec![post_group(
            "group_post",
            vec![
                FieldDefinition::text("subtitle"),
                FieldDefinition::number("rating"),
                FieldDefinition::gallery("photos"),
            ],
        )],
        EngineConfig::default(),
    );
    h.content.set(POST, "rating", StoredValue::text("3")).unwrap();

    let summary = h
        .service
        .write_record(
            POST,
            &input(json!({
                "subtitle": " <em>Hi</em> ",
                "rating": "not a number",
                "photos": [4, "5", 0],
                "unknown": "x"
            })),
        )
        .unwrap();

    assert_eq!(
        summary,
        WriteSummary {
            updated: vec!["subtitle".into(), "photos".into()],
            deleted: vec!["rating".into()],
            ignored: vec!["unknown".into()],
        }
    );
    assert_eq!(h.content.get(POST, "subtitle").unwrap(), Some(StoredValue::text("Hi")));
    assert_eq!(h.content.get(POST, "photos").unwrap(), Some(StoredValue::text("[4,5]")));
    assert_eq!(h.content.get(POST, "rating").unwrap(), None);
    assert_eq!(h.content.get(POST, "unknown").unwrap(), None);
}

#[test]
fn absent_fields_are_left_untouched_except_booleans() {
    let h = harness(
        vec![post_group(
            "group_post",
            vec![FieldDefinition::text("subtitle"), FieldDefinition::boolean("featured")],
        )],
        EngineConfig::default(),
    );
    h.content.set(POST, "subtitle", StoredValue::text("Keep me")).unwrap();
    h.content.set(POST, "featured", StoredValue::text("1")).unwrap();

    let summary = h.service.write_record(POST, &Map::new()).unwrap();
    assert_eq!(summary.updated, vec!["featured".to_string()]);
    assert_eq!(h.content.get(POST, "subtitle").unwrap(), Some(StoredValue::text("Keep me")));
    assert_eq!(h.content.get(POST, "featured").unwrap(), Some(StoredValue::text("0")));
}

#[test]
fn boolean_sentinel_list_takes_last_value() {
    let h = harness(vec![post_group("group_post", vec![FieldDefinition::boolean("featured")])], EngineConfig::default());
    h.service
        .write_record(POST, &input(json!({"featured": ["0", "1"]})))
        .unwrap();
    assert_eq!(h.content.get(POST, "featured").unwrap(), Some(StoredValue::text("1")));
    h.service
        .write_record(POST, &input(json!({"featured": ["0"]})))
        .unwrap();
    assert_eq!(h.content.get(POST, "featured").unwrap(), Some(StoredValue::text("0")));
}

#[test]
fn links_repeater_round_trip() {
    let h = harness(
        vec![post_group(
            "group_links",
            vec![FieldDefinition::repeater(
                "links",
                vec![FieldDefinition::text("label"), FieldDefinition::url("target")],
            )],
        )],
        EngineConfig::default(),
    );
    h.service
        .write_record(
            POST,
            &input(json!({"links": [
                {"label": "Home", "target": "/"},
                {"label": "bad", "target": "javascript:evil()"}
            ]})),
        )
        .unwrap();

    let out = h.service.read_record(POST).unwrap();
    assert_eq!(
        out["links"].to_json(),
        json!([
            {"label": "Home", "target": "/"},
            {"label": "bad", "target": null}
        ])
    );
}

#[test]
fn read_output_can_be_written_back() {
    let h = harness(
        vec![post_group(
            "group_post",
            vec![FieldDefinition::image("cover"), FieldDefinition::gallery("photos")],
        )],
        EngineConfig::default(),
    );
    for id in [2, 3] {
        h.attachments.insert(AttachmentId::new(id), image(id)).unwrap();
    }
    h.content.set(POST, "cover", StoredValue::text("2")).unwrap();
    h.content.set(POST, "photos", StoredValue::text("[3,2]")).unwrap();

    let read = h.service.read_record(POST).unwrap();
    let echoed: Map<String, Value> = read.iter().map(|(k, v)| (k.clone(), v.to_json())).collect();
    h.service.write_record(POST, &echoed).unwrap();

    assert_eq!(h.content.get(POST, "cover").unwrap(), Some(StoredValue::text("2")));
    assert_eq!(h.content.get(POST, "photos").unwrap(), Some(StoredValue::text("[3,2]")));
}

// ── Options pages ────────────────────────────────────────────────

#[test]
fn options_page_reads_and_writes_prefixed_keys() {
    let settings = FieldGroup::new(
        "group_settings",
        "Settings",
        vec![FieldDefinition::email("contact"), FieldDefinition::image("logo")],
    )
    .with_rules(vec![Rule::options_page("site-settings")]);
    let h = harness(vec![settings], EngineConfig::default());
    h.attachments.insert(AttachmentId::new(4), image(4)).unwrap();

    let summary = h
        .service
        .write_options("site-settings", &input(json!({"contact": "hi@example.com", "logo": 4})))
        .unwrap();
    assert_eq!(summary.updated.len(), 2);
    assert_eq!(h.options.get("options_contact").unwrap(), Some(StoredValue::text("hi@example.com")));
    assert_eq!(h.options.get("options_logo").unwrap(), Some(StoredValue::text("4")));

    let out = h.service.read_options("site-settings").unwrap();
    assert_eq!(out["contact"].as_str(), Some("hi@example.com"));
    assert_eq!(out["logo"].as_media().unwrap().id.get(), 4);

    // Record contexts never see options-page groups.
    assert!(h.service.read_record(POST).unwrap().is_empty());
}

#[test]
fn options_prefix_is_configurable() {
    let settings = FieldGroup::new("group_settings", "Settings", vec![FieldDefinition::text("phone")])
        .with_rules(vec![Rule::options_page("footer")]);
    let config = EngineConfig {
        options_key_prefix: "site_".into(),
        ..EngineConfig::default()
    };
    let h = harness(vec![settings], config);
    h.service
        .write_options("footer", &input(json!({"phone": "555"})))
        .unwrap();
    assert_eq!(h.options.keys().unwrap(), vec!["site_phone"]);
}

// ── Collaborator failures ────────────────────────────────────────

#[test]
fn content_store_failure_propagates() {
    let h = harness(vec![post_group("group_post", vec![FieldDefinition::text("subtitle")])], EngineConfig::default());
    h.content.set_offline(true);
    let err = h.service.read_record(POST).unwrap_err();
    assert!(matches!(err, EngineError::Store(StoreError::Unavailable(_))));
    let err = h
        .service
        .write_record(POST, &input(json!({"subtitle": "x"})))
        .unwrap_err();
    assert!(matches!(err, EngineError::Store(_)));
}

#[test]
fn attachment_store_failure_propagates() {
    let h = harness(vec![post_group("group_post", vec![FieldDefinition::image("cover")])], EngineConfig::default());
    h.content.set(POST, "cover", StoredValue::text("3")).unwrap();
    h.attachments.set_offline(true);
    let err = h.service.read_record(POST).unwrap_err();
    assert!(matches!(err, EngineError::Store(StoreError::Unavailable(_))));
}

#[test]
fn unknown_record_propagates_not_found() {
    let h = harness(vec![], EngineConfig::default());
    let err = h.service.read_record(RecordId::new(1)).unwrap_err();
    assert!(matches!(err, EngineError::Store(StoreError::NotFound(_))));
}

// ── Collision policy ─────────────────────────────────────────────

fn colliding_groups() -> Vec<FieldGroup> {
    vec![
        post_group("group_a", vec![FieldDefinition::text("title")]),
        post_group("group_b", vec![FieldDefinition::text("title")]),
    ]
}

#[test]
fn collisions_allowed_by_default() {
    let h = harness(colliding_groups(), EngineConfig::default());
    assert_eq!(h.service.groups().len(), 2);
}

#[test]
fn reject_policy_refuses_collisions() {
    let config = EngineConfig {
        name_collisions: CollisionPolicy::Reject,
        ..EngineConfig::default()
    };
    let stores = Collaborators {
        content: Arc::new(MemoryContentStore::new()),
        options: Arc::new(MemoryOptionsStore::new()),
        attachments: Arc::new(MemoryAttachmentStore::new()),
        contexts: Arc::new(MemoryContextResolver::new()),
    };
    let err = FieldService::new(stores, colliding_groups(), config).err().unwrap();
    match err {
        EngineError::Schema(issues) => {
            assert_eq!(issues.len(), 1);
            assert!(issues[0].is_collision());
        }
        other => panic!("unexpected error: {other}"),
    }
}
