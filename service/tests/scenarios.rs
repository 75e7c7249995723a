//! End-to-end behaviour of the future service over the in-memory store.

use std::sync::Arc;

use datafutures_authorization::{AuthorizationError, ChallengeVerifier, RevealFlow, RevealState};
use datafutures_crypto::ValueCodec;
use datafutures_nullables::{NullClock, NullSigner, NullStore};
use datafutures_service::{
    counters, CodecKind, CreationError, FutureService, NewFuture, RevealError, ServiceConfig,
};
use datafutures_types::{Category, FutureId, FutureRecord, OwnerAddress, Timestamp};

const T0: u64 = 1_700_000_000;

type Service = FutureService<Arc<NullStore>>;

fn config() -> ServiceConfig {
    ServiceConfig {
        contract_address: "0xC0FFEE".into(),
        chain_id: 8009,
        ..ServiceConfig::default()
    }
}

fn setup_with(config: &ServiceConfig) -> (Service, Arc<NullStore>, Arc<NullClock>) {
    let store = Arc::new(NullStore::new());
    let clock = Arc::new(NullClock::new(T0));
    let service = FutureService::from_config(store.clone(), config, clock.clone()).unwrap();
    (service, store, clock)
}

fn setup() -> (Service, Arc<NullStore>, Arc<NullClock>) {
    setup_with(&config())
}

fn forecast(value: f64) -> NewFuture {
    NewFuture {
        owner: OwnerAddress::new("0xABC"),
        description: "Temp forecast".into(),
        category: Category::Climate,
        value,
        expiry_days: 7,
    }
}

#[tokio::test]
async fn create_then_list_and_reveal() {
    let (service, _, _) = setup();

    let created = service.create(forecast(23.5)).await.unwrap();
    let listed = service.list().await;

    assert_eq!(listed.len(), 1);
    let record = &listed[0];
    assert_eq!(record, &created);
    assert_eq!(record.category, Category::Climate);
    assert_eq!(record.owner.as_str(), "0xABC");
    assert_eq!(record.description, "Temp forecast");
    assert_eq!(record.expires_at.as_secs() - record.created_at.as_secs(), 604_800);
    assert!(record.encrypted_value.starts_with("FHE-"));
    assert_eq!(service.codec().decode(&record.encrypted_value).unwrap(), 23.5);

    let value = service.reveal(record, &NullSigner::approving()).await.unwrap();
    assert_eq!(value, 23.5);
    assert_eq!(service.stats().get(counters::CREATED), 1);
    assert_eq!(service.stats().get(counters::REVEALS_SUCCEEDED), 1);
}

#[tokio::test]
async fn listing_is_newest_first_and_stable() {
    let (service, _, clock) = setup();
    let mut ids = Vec::new();
    for v in [1.0, 2.0, 3.0] {
        ids.push(service.create(forecast(v)).await.unwrap().id);
        clock.advance(60);
    }

    let first: Vec<FutureId> = service.list().await.into_iter().map(|r| r.id).collect();
    let second: Vec<FutureId> = service.list().await.into_iter().map(|r| r.id).collect();

    ids.reverse();
    assert_eq!(first, ids);
    assert_eq!(first, second);
}

#[tokio::test]
async fn same_second_creations_keep_index_order() {
    let (service, _, _) = setup();
    let a = service.create(forecast(1.0)).await.unwrap().id;
    let b = service.create(forecast(2.0)).await.unwrap().id;

    let listed: Vec<FutureId> = service.list().await.into_iter().map(|r| r.id).collect();
    assert_eq!(listed, vec![a, b]);
}

#[tokio::test]
async fn dangling_index_entry_is_skipped() {
    let (service, store, _) = setup();
    let kept = service.create(forecast(5.0)).await.unwrap();

    let mut index: Vec<String> = serde_json::from_slice(&store.get_raw("future_keys")).unwrap();
    index.insert(0, "future-1-deadbeef".into());
    store.put_raw("future_keys", &serde_json::to_vec(&index).unwrap());

    let listed = service.list().await;
    assert_eq!(listed, vec![kept]);
    assert_eq!(service.stats().get(counters::ENTRIES_SKIPPED), 1);

    let detailed = service.list_detailed().await;
    assert_eq!(detailed.issues.len(), 1);
}

#[tokio::test]
async fn unknown_stored_category_reads_as_other() {
    let (service, store, _) = setup();
    store.put_raw(
        "future_legacy-1",
        br#"{"value":"42.5","timestamp":1000,"owner":"0xA","description":"old","category":"Weather"}"#,
    );
    store.put_raw("future_keys", br#"["legacy-1"]"#);

    let listed = service.list().await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].category, Category::Other);
    assert_eq!(listed[0].expires_at, Timestamp::new(1000).plus_days(30));

    // Legacy passthrough token.
    let value = service.reveal(&listed[0], &NullSigner::approving()).await.unwrap();
    assert_eq!(value, 42.5);
}

#[tokio::test]
async fn concurrent_creates_never_lose_both() {
    let mut cfg = config();
    cfg.index_append_attempts = 1;
    let store = Arc::new(NullStore::new());
    store.set_yielding(true);
    let clock = Arc::new(NullClock::new(T0));
    let a = FutureService::from_config(store.clone(), &cfg, clock.clone()).unwrap();
    let b = FutureService::from_config(store.clone(), &cfg, clock.clone()).unwrap();

    let (ra, rb) = tokio::join!(a.create(forecast(1.0)), b.create(forecast(2.0)));
    let (ra, rb) = (ra.unwrap(), rb.unwrap());

    let listed: Vec<FutureId> = a.list().await.into_iter().map(|r| r.id).collect();
    assert!(!listed.is_empty());
    assert!(listed.iter().all(|id| *id == ra.id || *id == rb.id));

    // Both records stay reachable by id, indexed or not.
    assert_eq!(a.get(&ra.id).await.unwrap(), Some(ra.clone()));
    assert_eq!(a.get(&rb.id).await.unwrap(), Some(rb.clone()));

    // The last writer always reads its own id back, so at most one append
    // reports a loss.
    let lost = a.stats().get(counters::INDEX_APPEND_FAILURES)
        + b.stats().get(counters::INDEX_APPEND_FAILURES);
    assert!(lost <= 1);
}

#[tokio::test]
async fn concurrent_creates_with_retry_both_land() {
    let store = Arc::new(NullStore::new());
    store.set_yielding(true);
    let clock = Arc::new(NullClock::new(T0));
    let a = FutureService::from_config(store.clone(), &config(), clock.clone()).unwrap();
    let b = FutureService::from_config(store.clone(), &config(), clock.clone()).unwrap();

    let (ra, rb) = tokio::join!(a.create(forecast(1.0)), b.create(forecast(2.0)));
    assert!(ra.is_ok() && rb.is_ok());
    assert_eq!(a.list().await.len(), 2);
}

#[tokio::test]
async fn unavailable_store() {
    let (service, store, _) = setup();
    service.create(forecast(1.0)).await.unwrap();
    store.set_available(false);

    assert!(service.list().await.is_empty());
    assert!(matches!(
        service.create(forecast(2.0)).await,
        Err(CreationError::StoreUnavailable)
    ));
    assert!(service.get(&FutureId::new("x")).await.is_err());
}

#[tokio::test]
async fn failed_record_write_appends_nothing() {
    let (service, store, _) = setup();
    store.fail_writes(true);

    let result = service.create(forecast(1.0)).await;
    assert!(matches!(result, Err(CreationError::WriteFailed(_))));

    store.fail_writes(false);
    assert!(store.get_raw("future_keys").is_empty());
    assert!(service.list().await.is_empty());
    assert_eq!(service.stats().get(counters::CREATED), 0);
}

#[tokio::test]
async fn failed_append_leaves_detectable_unindexed_record() {
    let (service, store, _) = setup();
    store.fail_writes_to("future_keys");

    let record = service.create(forecast(9.0)).await.unwrap();
    assert!(service.list().await.is_empty());
    assert_eq!(service.get(&record.id).await.unwrap(), Some(record.clone()));
    assert_eq!(service.stats().get(counters::INDEX_APPEND_FAILURES), 1);

    let report = service.reconcile().await.unwrap();
    assert_eq!(report.unindexed, vec![record.id.clone()]);
    assert!(report.dangling.is_empty());

    store.clear_write_failures();
    assert_eq!(service.repair().await.unwrap(), 1);
    assert!(service.reconcile().await.unwrap().is_consistent());
    assert_eq!(service.list().await, vec![record]);
}

#[tokio::test]
async fn declined_signature() {
    let (service, _, _) = setup();
    let record = service.create(forecast(1.0)).await.unwrap();

    let mut flow = RevealFlow::new();
    let result = service
        .reveal_in(&mut flow, &record, &NullSigner::declining())
        .await;

    assert!(matches!(result, Err(RevealError::UserDeclined)));
    assert_eq!(flow.state(), &RevealState::Declined);
    assert_eq!(flow.value(), None);
    assert_eq!(service.stats().get(counters::REVEALS_DECLINED), 1);
}

#[tokio::test]
async fn malformed_token_is_a_decode_failure() {
    let (service, _, _) = setup();
    let record = FutureRecord {
        id: FutureId::new("broken"),
        encrypted_value: "FHE-***not base64***".into(),
        created_at: Timestamp::new(T0),
        expires_at: Timestamp::new(T0 + 60),
        owner: OwnerAddress::new("0xABC"),
        description: String::new(),
        category: Category::Tech,
    };

    let mut flow = RevealFlow::new();
    let result = service
        .reveal_in(&mut flow, &record, &NullSigner::approving())
        .await;

    assert!(matches!(result, Err(RevealError::DecodeFailed(_))));
    assert!(matches!(flow.state(), RevealState::Failed(_)));
    assert_eq!(service.stats().get(counters::REVEALS_FAILED), 1);
}

#[tokio::test]
async fn verified_reveal_inside_window() {
    let mut cfg = config();
    cfg.verify_signatures = true;
    let (service, _, clock) = setup_with(&cfg);
    let record = service.create(forecast(7.5)).await.unwrap();

    clock.advance(29 * 86_400);
    assert_eq!(
        service.reveal(&record, &NullSigner::approving()).await.unwrap(),
        7.5
    );
}

#[tokio::test]
async fn verified_reveal_after_window_is_unauthorized() {
    let mut cfg = config();
    cfg.verify_signatures = true;
    let (service, _, clock) = setup_with(&cfg);
    let record = service.create(forecast(7.5)).await.unwrap();

    clock.advance(30 * 86_400 + 1);
    let result = service.reveal(&record, &NullSigner::approving()).await;
    assert!(matches!(
        result,
        Err(RevealError::Unauthorized(AuthorizationError::Expired { .. }))
    ));
}

#[tokio::test]
async fn pinned_verifier_rejects_other_signers() {
    let store = Arc::new(NullStore::new());
    let clock = Arc::new(NullClock::new(T0));
    let stranger = datafutures_crypto::keypair_from_seed(&[9u8; 32]).public;
    let service = FutureService::from_config(store, &config(), clock)
        .unwrap()
        .with_verifier(ChallengeVerifier::pinned([stranger]));
    let record = service.create(forecast(1.0)).await.unwrap();

    let result = service.reveal(&record, &NullSigner::approving()).await;
    assert!(matches!(
        result,
        Err(RevealError::Unauthorized(AuthorizationError::UnknownSigner(_)))
    ));
}

#[tokio::test]
async fn sealed_codec_from_config() {
    let mut cfg = config();
    cfg.codec = CodecKind::Sealed;
    cfg.codec_secret = Some("6461746166757475726573".into());
    let (service, store, _) = setup_with(&cfg);

    let record = service.create(forecast(-3.25)).await.unwrap();
    assert!(record.encrypted_value.starts_with("SEALED-"));
    let raw = String::from_utf8(store.get_raw(&format!("future_{}", record.id))).unwrap();
    assert!(!raw.contains("-3.25"));

    let value = service.reveal(&record, &NullSigner::approving()).await.unwrap();
    assert_eq!(value, -3.25);
}

#[tokio::test]
async fn summary_counts_active_and_expired() {
    let (service, _, clock) = setup();
    service.create(forecast(1.0)).await.unwrap();
    let mut short = forecast(2.0);
    short.expiry_days = 1;
    short.category = Category::Finance;
    service.create(short).await.unwrap();

    clock.advance(86_400);
    let summary = service.summary().await;
    assert_eq!(summary.total, 2);
    assert_eq!(summary.active, 1);
    assert_eq!(summary.expired, 1);
    assert_eq!(summary.by_category[&Category::Climate], 1);
    assert_eq!(summary.by_category[&Category::Finance], 1);
}
