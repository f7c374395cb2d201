use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use mockall::predicate::eq;
use mockall::Sequence;

use docsmith::contract::{
    ArtifactIndex, ArtifactRecord, ArtifactStore, MockArtifactIndex, MockArtifactStore,
};
use docsmith::error::Error;
use docsmith::sync::sync;

fn documents(entries: &[(&str, &str)]) -> BTreeMap<PathBuf, String> {
    entries
        .iter()
        .map(|(path, content)| (PathBuf::from(path), content.to_string()))
        .collect()
}

#[tokio::test]
async fn removes_previous_state_before_uploading() {
    let docs = documents(&[("/proj/MyApp/Program.cs", "# File Overview\nProgram docs")]);
    let mut store = MockArtifactStore::new();
    let mut index = MockArtifactIndex::new();
    let mut seq = Sequence::new();

    index
        .expect_names_by_bucket()
        .with(eq("MyApp"))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(vec!["Old.md".to_string()]));
    store
        .expect_bucket_exists()
        .with(eq("MyApp"))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(true));
    store
        .expect_remove_objects()
        .withf(|bucket, objects| bucket == "MyApp" && objects == ["Old.md".to_string()])
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));
    store
        .expect_remove_bucket()
        .with(eq("MyApp"))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    index
        .expect_delete_by_bucket()
        .with(eq("MyApp"))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    store
        .expect_bucket_exists()
        .with(eq("MyApp"))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(false));
    store
        .expect_make_bucket()
        .with(eq("MyApp"))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    store
        .expect_put_object()
        .withf(|bucket, object, content| {
            bucket == "MyApp"
                && object == "Program.md"
                && content == b"# File Overview\nProgram docs"
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(()));
    index
        .expect_insert_many()
        .withf(|records| {
            records.len() == 1
                && records[0].file_path == "Program.md"
                && records[0].bucket_name == "MyApp"
                && records[0].content_type == "text/markdown"
                && records[0].file_size == "# File Overview\nProgram docs".len() as u64
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    sync(&store, &index, &docs, "/home/dev/MyApp").await.unwrap();
}

#[tokio::test]
async fn absent_bucket_skips_object_removal() {
    let docs = documents(&[("/proj/MyApp/Program.cs", "# File Overview\ndocs")]);
    let mut store = MockArtifactStore::new();
    let mut index = MockArtifactIndex::new();

    index
        .expect_names_by_bucket()
        .returning(|_| Ok(vec!["Old.md".to_string()]));
    index.expect_delete_by_bucket().returning(|_| Ok(()));
    index.expect_insert_many().returning(|_| Ok(()));
    store.expect_bucket_exists().returning(|_| Ok(false));
    store.expect_remove_objects().times(0);
    store.expect_remove_bucket().times(0);
    store.expect_make_bucket().times(1).returning(|_| Ok(()));
    store.expect_put_object().returning(|_, _, _| Ok(()));

    sync(&store, &index, &docs, "MyApp").await.unwrap();
}

#[tokio::test]
async fn empty_stale_listing_skips_object_removal_but_drops_the_bucket() {
    let docs = documents(&[]);
    let mut store = MockArtifactStore::new();
    let mut index = MockArtifactIndex::new();

    index.expect_names_by_bucket().returning(|_| Ok(vec![]));
    index.expect_delete_by_bucket().times(1).returning(|_| Ok(()));
    store.expect_bucket_exists().times(1).returning(|_| Ok(true));
    store.expect_remove_objects().times(0);
    store.expect_remove_bucket().times(1).returning(|_| Ok(()));

    sync(&store, &index, &docs, "MyApp").await.unwrap();
}

#[tokio::test]
async fn generation_preamble_is_trimmed_before_upload() {
    let docs = documents(&[(
        "/proj/MyApp/Program.cs",
        "Sure, here is the documentation you asked for.\n# File Overview\nProgram docs",
    )]);
    let mut store = MockArtifactStore::new();
    let mut index = MockArtifactIndex::new();

    index.expect_names_by_bucket().returning(|_| Ok(vec![]));
    index.expect_delete_by_bucket().returning(|_| Ok(()));
    store.expect_bucket_exists().returning(|_| Ok(false));
    store.expect_make_bucket().returning(|_| Ok(()));
    store
        .expect_put_object()
        .withf(|_, _, content| content == b"# File Overview\nProgram docs")
        .times(1)
        .returning(|_, _, _| Ok(()));
    index
        .expect_insert_many()
        .withf(|records| records[0].file_size == "# File Overview\nProgram docs".len() as u64)
        .times(1)
        .returning(|_| Ok(()));

    sync(&store, &index, &docs, "MyApp").await.unwrap();
}

#[tokio::test]
async fn index_failure_aborts_before_any_upload() {
    let docs = documents(&[("/proj/MyApp/Program.cs", "# File Overview\ndocs")]);
    let mut store = MockArtifactStore::new();
    let mut index = MockArtifactIndex::new();

    index
        .expect_names_by_bucket()
        .returning(|_| Err(Error::failure("get.files.index", "index unreachable")));
    store.expect_bucket_exists().times(0);
    store.expect_put_object().times(0);

    let err = sync(&store, &index, &docs, "MyApp")
        .await
        .expect_err("listing failure must abort the sync");
    assert_eq!(err.code(), "get.files.index");
}

/// In-memory doubles used to observe end state across two full runs.
#[derive(Default)]
struct MemoryStore {
    buckets: Mutex<BTreeMap<String, BTreeMap<String, Vec<u8>>>>,
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, Error> {
        Ok(self.buckets.lock().unwrap().contains_key(bucket))
    }

    async fn make_bucket(&self, bucket: &str) -> Result<(), Error> {
        self.buckets
            .lock()
            .unwrap()
            .insert(bucket.to_string(), BTreeMap::new());
        Ok(())
    }

    async fn remove_bucket(&self, bucket: &str) -> Result<(), Error> {
        self.buckets.lock().unwrap().remove(bucket);
        Ok(())
    }

    async fn put_object(&self, bucket: &str, object: &str, content: &[u8]) -> Result<(), Error> {
        self.buckets
            .lock()
            .unwrap()
            .entry(bucket.to_string())
            .or_default()
            .insert(object.to_string(), content.to_vec());
        Ok(())
    }

    async fn remove_objects(&self, bucket: &str, objects: &[String]) -> Result<(), Error> {
        if let Some(contents) = self.buckets.lock().unwrap().get_mut(bucket) {
            for object in objects {
                contents.remove(object);
            }
        }
        Ok(())
    }
}

#[derive(Default)]
struct MemoryIndex {
    records: Mutex<Vec<ArtifactRecord>>,
}

#[async_trait]
impl ArtifactIndex for MemoryIndex {
    async fn insert_many(&self, records: Vec<ArtifactRecord>) -> Result<(), Error> {
        self.records.lock().unwrap().extend(records);
        Ok(())
    }

    async fn delete_by_bucket(&self, bucket: &str) -> Result<(), Error> {
        self.records
            .lock()
            .unwrap()
            .retain(|r| r.bucket_name != bucket);
        Ok(())
    }

    async fn names_by_bucket(&self, bucket: &str) -> Result<Vec<String>, Error> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.bucket_name == bucket)
            .map(|r| r.file_path.clone())
            .collect())
    }
}

#[tokio::test]
async fn a_second_run_fully_replaces_the_first() {
    let store = MemoryStore::default();
    let index = MemoryIndex::default();

    let first = documents(&[
        ("/proj/MyApp/Program.cs", "# File Overview\nv1 Program"),
        ("/proj/MyApp/Helper.cs", "# File Overview\nv1 Helper"),
    ]);
    sync(&store, &index, &first, "/home/dev/MyApp").await.unwrap();

    let second = documents(&[("/proj/MyApp/Program.cs", "# File Overview\nv2 Program")]);
    sync(&store, &index, &second, "/home/dev/MyApp").await.unwrap();

    let buckets = store.buckets.lock().unwrap();
    let contents = buckets.get("MyApp").expect("bucket should exist");
    assert_eq!(contents.len(), 1);
    assert_eq!(
        contents.get("Program.md").map(Vec::as_slice),
        Some(b"# File Overview\nv2 Program".as_slice())
    );

    let records = index.records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].file_path, "Program.md");
    assert_eq!(records[0].bucket_name, "MyApp");
    assert_eq!(records[0].content_type, "text/markdown");
}
