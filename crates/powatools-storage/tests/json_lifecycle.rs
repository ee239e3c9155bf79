use powatools_storage::{JsonStore, MemoryStore, StorageError, JSON_CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const BUCKET: &str = "test-bucket";

fn store() -> JsonStore<MemoryStore> {
    JsonStore::new(MemoryStore::with_buckets([BUCKET]).unwrap())
}

#[test]
fn json_lifecycle() {
    let store = store();
    let key = "hello.json";

    assert!(!store.exists(BUCKET, key));

    store.put_json(BUCKET, key, &json!({"hello": "world"})).unwrap();
    assert!(store.exists(BUCKET, key));

    let value: Value = store.get_json(BUCKET, key).unwrap();
    assert!(value.is_object());
    assert_eq!(value["hello"], "world");

    store.delete_object(BUCKET, key).unwrap();
    assert!(!store.exists(BUCKET, key));
}

#[test]
fn typed_documents_round_trip() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Settings {
        retries: u32,
        regions: Vec<String>,
    }

    let store = store();
    let settings = Settings {
        retries: 2,
        regions: vec!["eu-west-1".to_string()],
    };

    store.put_json(BUCKET, "settings.json", &settings).unwrap();
    let loaded: Settings = store.get_json(BUCKET, "settings.json").unwrap();
    assert_eq!(loaded, settings);
}

#[test]
fn put_json_sets_content_type() {
    let store = store();
    store.put_json(BUCKET, "a.json", &[1, 2, 3]).unwrap();

    let info = powatools_storage::BlobStore::head(store.inner(), BUCKET, "a.json").unwrap();
    assert_eq!(info.content_type.as_deref(), Some(JSON_CONTENT_TYPE));
}

#[test]
fn missing_document_is_not_found() {
    let err = store().get_json::<Value>(BUCKET, "absent.json").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn non_json_document_is_a_json_error() {
    let store = store();
    powatools_storage::BlobStore::put(
        store.inner(),
        BUCKET,
        "notes.txt",
        b"plain text".to_vec(),
        "text/plain",
    )
    .unwrap();

    let err = store.get_json::<Value>(BUCKET, "notes.txt").unwrap_err();
    assert!(matches!(err, StorageError::Json { .. }));
}
