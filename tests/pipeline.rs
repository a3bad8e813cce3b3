// End-to-end integration tests for framewatch
//
// These tests drive the full pipeline over in-memory storage: upload
// notifications feed the batch accumulator, a stand-in inference job drops
// detection sidecars, and the summary pass sweeps, reconciles and archives.

use std::io::Cursor;
use std::sync::Arc;

use framewatch_batch::{BatchAccumulator, MemoryBatchStore, RecordingTrigger};
use framewatch_core::{QueueEvent, QueueRecord, WHOLE_IMAGE_CATEGORY};
use framewatch_stats::{MemoryStatSink, Reconciler};
use framewatch_storage::{bulk_move, ObjectStore};
use image::{ImageBuffer, Rgb};
use opendal::{services, Operator};

fn memory_store() -> ObjectStore {
    let op = Operator::new(services::Memory::default())
        .expect("Failed to create memory operator")
        .finish();
    ObjectStore::new(op)
}

fn frame_bytes(value: u8) -> Vec<u8> {
    let img = ImageBuffer::from_pixel(4, 4, Rgb([value, value, value]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("Failed to encode frame");
    out.into_inner()
}

fn upload_notification(key: &str) -> QueueRecord {
    QueueRecord {
        body: format!(r#"{{"Records":[{{"s3":{{"object":{{"key":"{}"}}}}}}]}}"#, key),
    }
}

const SIDECAR: &[u8] = br#"[
    {"category_name":"car","category_id":1,"bbox":[0,0,10,10],"area":100,"score":0.9},
    {"category_name":"car","category_id":2,"bbox":[5,5,20,20],"area":200,"score":0.8},
    {"category_name":"giraffe","category_id":9,"bbox":[1,1,2,2],"area":10,"score":0.99}
]"#;

#[tokio::test]
async fn accumulator_hands_off_full_batches() {
    let batch_store = Arc::new(MemoryBatchStore::new());
    let trigger = Arc::new(RecordingTrigger::new());
    let accumulator = BatchAccumulator::new(batch_store.clone(), trigger.clone(), 2);

    let keys = [
        "image_2024-01-02_03:04:05.jpg",
        "image_2024-01-02_03:04:35.jpg",
        "image_2024-01-02_03:05:05.jpg",
    ];
    let event = QueueEvent {
        records: keys.iter().map(|k| upload_notification(k)).collect(),
    };

    let summary = accumulator.ingest(&event).await;

    assert_eq!(summary.appended, 3);
    assert_eq!(summary.dispatched, 1);
    let dispatched = trigger.dispatched();
    assert_eq!(dispatched.len(), 1);
    assert_eq!(dispatched[0].batch, &keys[..2]);
    // The third key waits for the next batch
    assert_eq!(batch_store.snapshot(), vec![keys[2]]);
}

#[tokio::test]
async fn summary_pass_reconciles_and_archives() {
    let store = memory_store();

    // Inference job output: frame + sidecar at the drop prefix
    store
        .write("image_2024-01-02_03:04:05.jpg", frame_bytes(120))
        .await
        .unwrap();
    store
        .write("image_2024-01-02_03:04:05.jpg.out", SIDECAR.to_vec())
        .await
        .unwrap();

    let sink = Arc::new(MemoryStatSink::new());
    let reconciler = Reconciler::new(store.clone(), sink.clone());

    let staged = bulk_move(&store, "", "unprocessed").await.unwrap();
    assert_eq!(staged.moved.len(), 2);

    let report = reconciler.run("unprocessed").await.unwrap();
    assert!(report.is_clean());
    assert_eq!(report.images_processed, 1);
    assert_eq!(report.rows_written, 2);

    let archived = bulk_move(&store, "unprocessed", "processed").await.unwrap();
    assert_eq!(archived.moved.len(), 2);

    // Rows: one allow-listed category plus the whole-image row; the
    // disallowed category is dropped
    let car = sink.get("2024-01-02_03:04:05", "car").unwrap();
    assert_eq!(car.count, Some(2));
    assert_eq!(car.mean_area.as_ref().unwrap().as_str(), "150");
    assert_eq!(car.mean_score.as_ref().unwrap().as_str(), "0.85");
    assert!(sink.get("2024-01-02_03:04:05", "giraffe").is_none());

    let whole = sink
        .get("2024-01-02_03:04:05", WHOLE_IMAGE_CATEGORY)
        .unwrap();
    assert_eq!(whole.mean_brightness.as_ref().unwrap().as_str(), "120");

    // Everything swept out of unprocessed/ and into processed/
    assert!(store.list("unprocessed").await.unwrap().is_empty());
    let mut processed = store.list("processed").await.unwrap();
    processed.sort();
    assert_eq!(
        processed,
        vec![
            "processed/image_2024-01-02_03:04:05.jpg",
            "processed/image_2024-01-02_03:04:05.jpg.out",
        ]
    );
}

#[tokio::test]
async fn rerunning_summary_pass_is_idempotent() {
    let store = memory_store();
    store
        .write("unprocessed/image_2024-01-02_03:04:05.jpg.out", SIDECAR.to_vec())
        .await
        .unwrap();

    let sink = Arc::new(MemoryStatSink::new());
    let reconciler = Reconciler::new(store.clone(), sink.clone());

    reconciler.run("unprocessed").await.unwrap();
    let first = sink.rows();
    reconciler.run("unprocessed").await.unwrap();

    assert_eq!(first, sink.rows());
}

#[tokio::test]
async fn malformed_filenames_do_not_poison_the_pass() {
    let store = memory_store();
    store
        .write("unprocessed/thumbnail.jpg", frame_bytes(10))
        .await
        .unwrap();
    store
        .write("unprocessed/image_2024-01-02_03:04:05.jpg", frame_bytes(200))
        .await
        .unwrap();

    let sink = Arc::new(MemoryStatSink::new());
    let reconciler = Reconciler::new(store.clone(), sink.clone());

    let report = reconciler.run("unprocessed").await.unwrap();

    assert_eq!(report.images_processed, 1);
    assert_eq!(report.failures.len(), 1);
    assert!(sink
        .get("2024-01-02_03:04:05", WHOLE_IMAGE_CATEGORY)
        .is_some());
}
