//! Connection cache
//!
//! Holds at most one connected store handle for the life of the process.
//! Concurrent callers that arrive while the first connection is being
//! established all await that same attempt instead of opening their own.
//! A failed attempt is forgotten so the next call tries again.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};

use super::store::StoreHandle;

/// Error raised while establishing the store connection
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConnectError {
    /// Store address missing from the environment
    #[error("{var} environment variable is not defined")]
    Configuration { var: &'static str },

    /// Store unreachable or rejected the connection
    #[error("failed to connect to database: {source}")]
    Connection {
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync>,
    },
}

impl ConnectError {
    pub fn connection<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            source: Arc::new(source),
        }
    }
}

/// Opens a new pooled store connection.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<StoreHandle, ConnectError>;
}

type PendingConnect = Shared<BoxFuture<'static, Result<StoreHandle, ConnectError>>>;

#[derive(Default)]
struct CacheState {
    conn: Option<StoreHandle>,
    pending: Option<PendingConnect>,
}

/// Single-flight cache around a [`Connector`].
pub struct ConnectionCache {
    connector: Arc<dyn Connector>,
    state: Mutex<CacheState>,
}

impl ConnectionCache {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Return the cached handle, joining or starting a connection attempt
    /// if there is none yet.
    pub async fn connect(&self) -> Result<StoreHandle, ConnectError> {
        loop {
            let attempt = {
                let mut state = self.lock();
                if let Some(conn) = &state.conn {
                    return Ok(Arc::clone(conn));
                }
                match &state.pending {
                    Some(pending) => pending.clone(),
                    None => {
                        tracing::debug!("opening database connection");
                        let connector = Arc::clone(&self.connector);
                        let attempt = async move { connector.connect().await }.boxed().shared();
                        state.pending = Some(attempt.clone());
                        attempt
                    }
                }
            };

            let result = attempt.clone().await;

            let orphaned = {
                let mut state = self.lock();
                // Only the attempt still registered may publish; a disconnect()
                // or a newer attempt may have replaced it while we waited.
                if state
                    .pending
                    .as_ref()
                    .is_some_and(|pending| pending.ptr_eq(&attempt))
                {
                    state.pending = None;
                    match &result {
                        Ok(conn) => {
                            state.conn = Some(Arc::clone(conn));
                            tracing::info!("database connection established");
                        }
                        Err(e) => tracing::warn!(error = %e, "database connection failed"),
                    }
                    None
                } else {
                    match &result {
                        Ok(conn) if !state.conn.as_ref().is_some_and(|c| Arc::ptr_eq(c, conn)) => {
                            Some(Arc::clone(conn))
                        }
                        _ => None,
                    }
                }
            };

            // A handle nobody published was dropped by disconnect(); close it
            // and start over.
            match orphaned {
                Some(conn) => {
                    tracing::debug!("closing connection opened across a disconnect");
                    conn.close().await;
                }
                None => return result,
            }
        }
    }

    /// Close the cached handle and forget any pending attempt.
    pub async fn disconnect(&self) {
        let conn = {
            let mut state = self.lock();
            state.pending = None;
            state.conn.take()
        };

        if let Some(conn) = conn {
            conn.close().await;
            tracing::info!("database connection closed");
        }
    }

    /// True if a connected handle is cached.
    pub fn is_connected(&self) -> bool {
        self.lock().conn.is_some()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use uuid::Uuid;

    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::db::store::{BookingFilter, DocumentStore, StoreError};
    use crate::models::{Booking, Event, NewBooking, NewEvent};

    /// Memory store that counts `close()` calls.
    struct TrackedStore {
        inner: MemoryStore,
        closes: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl DocumentStore for TrackedStore {
        async fn insert_event(&self, event: NewEvent) -> Result<Event, StoreError> {
            self.inner.insert_event(event).await
        }

        async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
            self.inner.list_events().await
        }

        async fn find_event_by_slug(&self, slug: &str) -> Result<Option<Event>, StoreError> {
            self.inner.find_event_by_slug(slug).await
        }

        async fn find_event_by_id(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
            self.inner.find_event_by_id(id).await
        }

        async fn find_similar_events(&self, event: &Event) -> Result<Vec<Event>, StoreError> {
            self.inner.find_similar_events(event).await
        }

        async fn insert_booking(&self, booking: NewBooking) -> Result<Booking, StoreError> {
            self.inner.insert_booking(booking).await
        }

        async fn find_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, StoreError> {
            self.inner.find_bookings(filter).await
        }

        async fn close(&self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Counts attempts and closes; fails while `fail` is set.
    struct CountingConnector {
        attempts: AtomicUsize,
        closes: Arc<AtomicUsize>,
        fail: AtomicBool,
        delay: Duration,
    }

    impl CountingConnector {
        fn new(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                attempts: AtomicUsize::new(0),
                closes: Arc::new(AtomicUsize::new(0)),
                fail: AtomicBool::new(false),
                delay,
            })
        }

        fn attempts(&self) -> usize {
            self.attempts.load(Ordering::SeqCst)
        }

        fn closes(&self) -> usize {
            self.closes.load(Ordering::SeqCst)
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("connection refused")]
    struct Refused;

    #[async_trait]
    impl Connector for CountingConnector {
        async fn connect(&self) -> Result<StoreHandle, ConnectError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.fail.load(Ordering::SeqCst) {
                return Err(ConnectError::connection(Refused));
            }
            let store: StoreHandle = Arc::new(TrackedStore {
                inner: MemoryStore::new(),
                closes: Arc::clone(&self.closes),
            });
            Ok(store)
        }
    }

    struct Unconfigured;

    #[async_trait]
    impl Connector for Unconfigured {
        async fn connect(&self) -> Result<StoreHandle, ConnectError> {
            Err(ConnectError::Configuration {
                var: "DATABASE_URL",
            })
        }
    }

    #[tokio::test]
    async fn concurrent_first_calls_share_one_attempt() {
        let connector = CountingConnector::new(Duration::from_millis(50));
        let cache = Arc::new(ConnectionCache::new(connector.clone()));

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.connect().await })
            })
            .collect();

        let mut conns = Vec::new();
        for handle in handles {
            conns.push(handle.await.expect("task panicked").expect("connect failed"));
        }

        assert_eq!(connector.attempts(), 1);
        assert!(conns.iter().all(|c| Arc::ptr_eq(c, &conns[0])));
        assert!(cache.is_connected());
    }

    #[tokio::test]
    async fn cached_handle_is_reused() {
        let connector = CountingConnector::new(Duration::ZERO);
        let cache = ConnectionCache::new(connector.clone());

        let first = cache.connect().await.unwrap();
        let second = cache.connect().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(connector.attempts(), 1);
    }

    #[tokio::test]
    async fn failure_is_not_cached() {
        let connector = CountingConnector::new(Duration::ZERO);
        connector.fail.store(true, Ordering::SeqCst);
        let cache = ConnectionCache::new(connector.clone());

        let err = cache.connect().await.err().expect("connect should fail");
        assert!(matches!(err, ConnectError::Connection { .. }));
        assert_eq!(err.to_string(), "failed to connect to database: connection refused");
        assert!(!cache.is_connected());

        connector.fail.store(false, Ordering::SeqCst);
        cache.connect().await.unwrap();
        assert_eq!(connector.attempts(), 2);
        assert!(cache.is_connected());
    }

    #[tokio::test]
    async fn concurrent_callers_share_a_failure() {
        let connector = CountingConnector::new(Duration::from_millis(20));
        connector.fail.store(true, Ordering::SeqCst);
        let cache = Arc::new(ConnectionCache::new(connector.clone()));

        let (a, b) = tokio::join!(cache.connect(), cache.connect());
        assert!(a.is_err() && b.is_err());
        assert_eq!(connector.attempts(), 1);
    }

    #[tokio::test]
    async fn missing_configuration_is_reported_each_call() {
        let cache = ConnectionCache::new(Arc::new(Unconfigured));

        for _ in 0..2 {
            let err = cache.connect().await.err().expect("connect should fail");
            assert_eq!(err.to_string(), "DATABASE_URL environment variable is not defined");
        }
    }

    #[tokio::test]
    async fn disconnect_clears_handle() {
        let connector = CountingConnector::new(Duration::ZERO);
        let cache = ConnectionCache::new(connector.clone());

        let first = cache.connect().await.unwrap();
        cache.disconnect().await;
        assert!(!cache.is_connected());

        assert_eq!(connector.closes(), 1);

        let second = cache.connect().await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(connector.attempts(), 2);
    }

    #[tokio::test]
    async fn handle_finished_after_disconnect_is_closed() {
        let connector = CountingConnector::new(Duration::from_millis(50));
        let cache = Arc::new(ConnectionCache::new(connector.clone()));

        let in_flight = tokio::spawn({
            let cache = Arc::clone(&cache);
            async move { cache.connect().await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        cache.disconnect().await;

        let conn = in_flight.await.expect("task panicked").expect("connect failed");
        assert_eq!(connector.closes(), 1);
        assert_eq!(connector.attempts(), 2);
        assert!(cache.is_connected());

        let again = cache.connect().await.unwrap();
        assert!(Arc::ptr_eq(&conn, &again));
    }

    #[tokio::test]
    async fn disconnect_without_connection_is_noop() {
        let connector = CountingConnector::new(Duration::ZERO);
        let cache = ConnectionCache::new(connector.clone());
        cache.disconnect().await;
        assert_eq!(connector.attempts(), 0);
    }
}
