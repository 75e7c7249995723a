//! The future service: one instance per client session.

use std::sync::Arc;

use datafutures_authorization::{
    AuthorizationSession, ChallengeVerifier, RevealFlow, SignError, Signer,
};
use datafutures_crypto::ValueCodec;
use datafutures_index::{IndexManager, IndexOptions, ListIssue, Listing, Reconciliation};
use datafutures_store::{KeyScan, RecordStore};
use datafutures_types::{Category, Clock, FutureId, FutureRecord, OwnerAddress};
use datafutures_utils::StatsCounter;

use crate::{CreationError, FutureSummary, RevealError, ServiceConfig, ServiceError};

/// Names of the operation counters kept by [`FutureService::stats`].
pub mod counters {
    pub const CREATED: &str = "futures_created";
    pub const INDEX_APPEND_FAILURES: &str = "index_append_failures";
    pub const ENTRIES_SKIPPED: &str = "entries_skipped";
    pub const REVEALS_SUCCEEDED: &str = "reveals_succeeded";
    pub const REVEALS_DECLINED: &str = "reveals_declined";
    pub const REVEALS_FAILED: &str = "reveals_failed";

    pub const ALL: [&str; 6] = [
        CREATED,
        INDEX_APPEND_FAILURES,
        ENTRIES_SKIPPED,
        REVEALS_SUCCEEDED,
        REVEALS_DECLINED,
        REVEALS_FAILED,
    ];
}

/// Input for [`FutureService::create`].
#[derive(Clone, Debug)]
pub struct NewFuture {
    pub owner: OwnerAddress,
    pub description: String,
    pub category: Category,
    pub value: f64,
    /// Lifetime in days; zero selects the configured default.
    pub expiry_days: u64,
}

pub struct FutureService<S> {
    index: IndexManager<S>,
    codec: Arc<dyn ValueCodec>,
    clock: Arc<dyn Clock>,
    session: AuthorizationSession,
    verifier: Option<ChallengeVerifier>,
    stats: StatsCounter,
}

impl<S: RecordStore> FutureService<S> {
    pub fn new(
        store: S,
        codec: Arc<dyn ValueCodec>,
        clock: Arc<dyn Clock>,
        session: AuthorizationSession,
        options: IndexOptions,
    ) -> Self {
        Self {
            index: IndexManager::new(store, options),
            codec,
            clock,
            session,
            verifier: None,
            stats: StatsCounter::new(&counters::ALL),
        }
    }

    /// Build a service from configuration, starting a fresh authorization
    /// session at the clock's current time.
    pub fn from_config(
        store: S,
        config: &ServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ServiceError> {
        let codec = config.build_codec()?;
        let session = AuthorizationSession::start(
            config.scope(),
            config.authorization_duration_days,
            clock.now(),
        );
        let service = Self::new(store, codec, clock, session, config.index_options());
        Ok(if config.verify_signatures {
            service.with_verifier(ChallengeVerifier::new())
        } else {
            service
        })
    }

    /// Check every reveal signature against the session challenge and window.
    pub fn with_verifier(mut self, verifier: ChallengeVerifier) -> Self {
        self.verifier = Some(verifier);
        self
    }

    pub fn store(&self) -> &S {
        self.index.store()
    }

    pub fn session(&self) -> &AuthorizationSession {
        &self.session
    }

    pub fn codec(&self) -> &dyn ValueCodec {
        self.codec.as_ref()
    }

    pub fn stats(&self) -> &StatsCounter {
        &self.stats
    }

    /// All readable futures, newest first. An unavailable store lists as
    /// empty.
    pub async fn list(&self) -> Vec<FutureRecord> {
        self.list_detailed().await.records
    }

    /// Like [`list`](Self::list), keeping the entries that were skipped.
    pub async fn list_detailed(&self) -> Listing {
        if !self.index.store().is_available().await {
            tracing::debug!("record store unavailable; listing nothing");
            return Listing::default();
        }
        let listing = self.index.list_all().await;
        let skipped = listing
            .issues
            .iter()
            .filter(|issue| !matches!(issue, ListIssue::Index(_)))
            .count();
        self.stats.add(counters::ENTRIES_SKIPPED, skipped as u64);
        listing
    }

    /// Read one future by id, whether or not the index lists it.
    pub async fn get(&self, id: &FutureId) -> Result<Option<FutureRecord>, ServiceError> {
        Ok(self.index.try_read_record(id).await?)
    }

    /// Publish a new future.
    ///
    /// The record is written before its id is appended to the index. A
    /// failed write aborts with nothing indexed. A failed append leaves the
    /// record in place but unindexed; it is logged and counted, and the
    /// record is still returned.
    pub async fn create(&self, request: NewFuture) -> Result<FutureRecord, CreationError> {
        if !self.index.store().is_available().await {
            return Err(CreationError::StoreUnavailable);
        }
        if !request.owner.is_valid() {
            return Err(CreationError::MissingOwner);
        }

        let now = self.clock.now();
        let days = if request.expiry_days == 0 {
            self.index.options().default_expiry_days
        } else {
            request.expiry_days
        };
        let record = FutureRecord {
            id: FutureId::generate(now),
            encrypted_value: self.codec.encode(request.value)?,
            created_at: now,
            expires_at: now.plus_days(days),
            owner: request.owner,
            description: request.description,
            category: request.category,
        };

        self.index
            .write_record(&record)
            .await
            .map_err(|e| CreationError::WriteFailed(e.to_string()))?;

        if let Err(e) = self.index.append_id(&record.id).await {
            self.stats.increment(counters::INDEX_APPEND_FAILURES);
            tracing::warn!(
                id = %record.id,
                error = %e,
                "record written but not indexed; run reconcile to repair"
            );
        }

        self.stats.increment(counters::CREATED);
        tracing::info!(
            id = %record.id,
            category = %record.category,
            codec = self.codec.name(),
            expires_at = record.expires_at.as_secs(),
            "future created"
        );
        Ok(record)
    }

    /// Authorize and decode one future's value.
    pub async fn reveal(
        &self,
        record: &FutureRecord,
        signer: &dyn Signer,
    ) -> Result<f64, RevealError> {
        let mut flow = RevealFlow::new();
        self.reveal_in(&mut flow, record, signer).await
    }

    /// Reveal, driving a caller-held [`RevealFlow`] so an interface can show
    /// progress and later hide the value. The flow must be idle.
    pub async fn reveal_in(
        &self,
        flow: &mut RevealFlow,
        record: &FutureRecord,
        signer: &dyn Signer,
    ) -> Result<f64, RevealError> {
        flow.request_signature().map_err(RevealError::Flow)?;

        let challenge = self.session.challenge();
        let signed = match signer.sign(&challenge).await {
            Ok(signed) => signed,
            Err(SignError::Declined) => {
                flow.declined().map_err(RevealError::Flow)?;
                self.stats.increment(counters::REVEALS_DECLINED);
                tracing::info!(id = %record.id, "reveal declined by signer");
                return Err(RevealError::UserDeclined);
            }
            Err(SignError::Unavailable(reason)) => {
                flow.failed(reason.clone()).map_err(RevealError::Flow)?;
                self.stats.increment(counters::REVEALS_FAILED);
                tracing::warn!(id = %record.id, reason = %reason, "signer unavailable");
                return Err(RevealError::SignerUnavailable(reason));
            }
        };
        flow.signed().map_err(RevealError::Flow)?;

        if let Some(verifier) = &self.verifier {
            if let Err(e) = verifier.verify(self.session.params(), &signed, self.clock.now()) {
                flow.failed(e.to_string()).map_err(RevealError::Flow)?;
                self.stats.increment(counters::REVEALS_FAILED);
                tracing::warn!(
                    id = %record.id,
                    signer = %signed.public_key,
                    error = %e,
                    "reveal signature rejected"
                );
                return Err(RevealError::Unauthorized(e));
            }
        }

        match self.codec.decode(&record.encrypted_value) {
            Ok(value) => {
                flow.revealed(value).map_err(RevealError::Flow)?;
                self.stats.increment(counters::REVEALS_SUCCEEDED);
                tracing::info!(id = %record.id, signer = %signed.public_key, "future revealed");
                Ok(value)
            }
            Err(e) => {
                flow.failed(e.to_string()).map_err(RevealError::Flow)?;
                self.stats.increment(counters::REVEALS_FAILED);
                tracing::warn!(id = %record.id, error = %e, "stored value failed to decode");
                Err(RevealError::DecodeFailed(e))
            }
        }
    }

    /// Counts over the current listing.
    pub async fn summary(&self) -> FutureSummary {
        let records = self.list().await;
        FutureSummary::from_records(&records, self.clock.now())
    }
}

impl<S: KeyScan> FutureService<S> {
    /// Diff stored records against the index.
    pub async fn reconcile(&self) -> Result<Reconciliation, ServiceError> {
        Ok(self.index.reconcile().await?)
    }

    /// Append every unindexed record id to the index. Returns how many were
    /// added.
    pub async fn repair(&self) -> Result<usize, ServiceError> {
        Ok(self.index.repair().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datafutures_authorization::AuthorizationScope;
    use datafutures_crypto::MarkerCodec;
    use datafutures_nullables::{NullClock, NullSigner, NullStore};
    use datafutures_types::{SessionKey, Timestamp};

    fn service(store: Arc<NullStore>, clock: Arc<NullClock>) -> FutureService<Arc<NullStore>> {
        let session = AuthorizationSession::with_key(
            SessionKey::parse("0x0123").unwrap(),
            AuthorizationScope {
                contract_address: "0xC0FFEE".into(),
                chain_id: 8009,
            },
            30,
            clock.now(),
        );
        FutureService::new(
            store,
            Arc::new(MarkerCodec),
            clock,
            session,
            IndexOptions::default(),
        )
    }

    fn request(value: f64, expiry_days: u64) -> NewFuture {
        NewFuture {
            owner: OwnerAddress::new("0xABC"),
            description: "Temp forecast".into(),
            category: Category::Climate,
            value,
            expiry_days,
        }
    }

    #[tokio::test]
    async fn zero_expiry_uses_default() {
        let clock = Arc::new(NullClock::new(1_000));
        let svc = service(Arc::new(NullStore::new()), clock);
        let record = svc.create(request(1.0, 0)).await.unwrap();
        assert_eq!(record.lifetime_secs(), 30 * 86_400);
    }

    #[tokio::test]
    async fn blank_owner_rejected() {
        let store = Arc::new(NullStore::new());
        let svc = service(store.clone(), Arc::new(NullClock::new(1)));
        let mut req = request(1.0, 7);
        req.owner = OwnerAddress::new("  ");
        assert!(matches!(svc.create(req).await, Err(CreationError::MissingOwner)));
        assert_eq!(store.set_count(), 0);
    }

    #[tokio::test]
    async fn non_finite_value_rejected_before_write() {
        let store = Arc::new(NullStore::new());
        let svc = service(store.clone(), Arc::new(NullClock::new(1)));
        assert!(matches!(
            svc.create(request(f64::NAN, 7)).await,
            Err(CreationError::Encode(_))
        ));
        assert_eq!(store.set_count(), 0);
    }

    #[tokio::test]
    async fn signer_sees_session_challenge() {
        let clock = Arc::new(NullClock::new(1_700_000_000));
        let svc = service(Arc::new(NullStore::new()), clock);
        let record = svc.create(request(23.5, 7)).await.unwrap();
        let signer = NullSigner::approving();
        assert_eq!(svc.reveal(&record, &signer).await.unwrap(), 23.5);
        assert_eq!(signer.messages(), vec![svc.session().challenge()]);
        assert_eq!(
            signer.messages()[0],
            "publickey:0x0123\ncontractAddresses:0xC0FFEE\ncontractsChainId:8009\n\
             startTimestamp:1700000000\ndurationDays:30"
        );
    }

    #[tokio::test]
    async fn unavailable_signer_fails_the_flow() {
        let svc = service(Arc::new(NullStore::new()), Arc::new(NullClock::new(5)));
        let record = svc.create(request(2.0, 1)).await.unwrap();
        let mut flow = RevealFlow::new();
        let result = svc
            .reveal_in(&mut flow, &record, &NullSigner::unavailable("no wallet"))
            .await;
        assert!(matches!(result, Err(RevealError::SignerUnavailable(r)) if r == "no wallet"));
        assert!(flow.state().is_terminal());
        assert_eq!(svc.stats().get(counters::REVEALS_FAILED), 1);
    }

    #[tokio::test]
    async fn revealed_flow_must_be_hidden_before_revealing_again() {
        let svc = service(Arc::new(NullStore::new()), Arc::new(NullClock::new(5)));
        let record = svc.create(request(4.25, 1)).await.unwrap();
        let signer = NullSigner::approving();
        let mut flow = RevealFlow::new();

        assert_eq!(svc.reveal_in(&mut flow, &record, &signer).await.unwrap(), 4.25);
        assert_eq!(flow.value(), Some(4.25));
        assert!(matches!(
            svc.reveal_in(&mut flow, &record, &signer).await,
            Err(RevealError::Flow(_))
        ));

        flow.hide().unwrap();
        assert_eq!(flow.value(), None);
        assert_eq!(svc.reveal_in(&mut flow, &record, &signer).await.unwrap(), 4.25);
        assert_eq!(signer.messages().len(), 2);
    }

    #[tokio::test]
    async fn skipped_entries_are_counted() {
        let store = Arc::new(NullStore::new());
        let svc = service(store.clone(), Arc::new(NullClock::new(5)));
        svc.create(request(1.0, 1)).await.unwrap();
        store.put_raw("future_keys", br#"["ghost"]"#);
        assert!(svc.list().await.is_empty());
        assert_eq!(svc.stats().get(counters::ENTRIES_SKIPPED), 1);
    }
}
