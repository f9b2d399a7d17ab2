use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use lizard::application::mounts::MountRegistry;
use lizard::application::provider::{PostProvider, PostSource, SourceError, StaticPostSource};
use lizard::application::session::SessionId;
use lizard::domain::entities::PostRecord;
use metrics_util::debugging::DebuggingRecorder;

struct DownSource;

#[async_trait]
impl PostSource for DownSource {
    async fn fetch_posts(&self) -> Result<Vec<PostRecord>, SourceError> {
        Err(SourceError::transport("connection refused"))
    }
}

#[tokio::test]
async fn provider_and_registry_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let capacity = NonZeroUsize::new(1).expect("non-zero");
    let session = SessionId::new();

    let provider = PostProvider::new(Arc::new(StaticPostSource::new(Vec::new())), capacity);
    provider.catalog(session).await.expect("first fetch");
    provider.catalog(session).await.expect("cached");

    let failing = PostProvider::new(Arc::new(DownSource), capacity);
    assert!(failing.catalog(session).await.is_err());

    let mounts = MountRegistry::new(capacity);
    mounts.mount(session, "");
    mounts.mount(session, "category=Tech");
    assert_eq!(mounts.len(), 1);

    let names: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    let expected = [
        "lizard_posts_cache_hit_total",
        "lizard_posts_cache_miss_total",
        "lizard_posts_fetch_failed_total",
        "lizard_posts_fetch_ms",
        "lizard_mounted_views",
    ];

    for metric in expected {
        assert!(names.contains(metric), "missing metric: {metric}");
    }
}
