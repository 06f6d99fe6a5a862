//! In-process store of running study sessions.
//!
//! Each session owns its queue and review state; nothing is shared between
//! entries. Discarding a session is removing its entry. Sessions left idle
//! for longer than the store's TTL are evicted whenever a new one is
//! inserted, so abandoned sessions do not pile up.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use study_core::{count_matching, SessionConfig, SessionError, StudySession};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::repository::CardRepository;

/// Idle time after which a session is evicted, unless configured otherwise.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(2 * 60 * 60);

struct StoredSession {
    session: StudySession,
    last_touched: Instant,
}

/// Sessions keyed by id.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, StoredSession>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn insert(&self, session: StudySession) -> Uuid {
        let now = Instant::now();
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.write().await;
        let evicted = evict_idle(&mut sessions, self.ttl, now);
        if evicted > 0 {
            tracing::info!("Evicted {} idle sessions", evicted);
        }
        sessions.insert(
            id,
            StoredSession {
                session,
                last_touched: now,
            },
        );
        id
    }

    /// Run `f` against a session.
    pub async fn read<T>(&self, id: Uuid, f: impl FnOnce(&StudySession) -> T) -> Result<T> {
        let sessions = self.sessions.read().await;
        let stored = sessions.get(&id).ok_or_else(|| not_found(id))?;
        Ok(f(&stored.session))
    }

    /// Apply a state transition to a session.
    pub async fn update<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut StudySession) -> std::result::Result<T, SessionError>,
    ) -> Result<T> {
        let mut sessions = self.sessions.write().await;
        let stored = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        stored.last_touched = Instant::now();
        Ok(f(&mut stored.session)?)
    }

    pub async fn remove(&self, id: Uuid) -> Result<StudySession> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|stored| stored.session)
            .ok_or_else(|| not_found(id))
    }

    /// Drop sessions not updated within the TTL as of `now`. Returns how
    /// many were dropped.
    pub async fn evict_idle(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.write().await;
        evict_idle(&mut sessions, self.ttl, now)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

fn evict_idle(
    sessions: &mut HashMap<Uuid, StoredSession>,
    ttl: Duration,
    now: Instant,
) -> usize {
    let before = sessions.len();
    sessions.retain(|_, stored| now.saturating_duration_since(stored.last_touched) < ttl);
    before - sessions.len()
}

fn not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Session {} not found", id))
}

/// Fetch the card set and start a new session over it.
///
/// Repository failures are not retried; they surface as upstream errors.
pub async fn start_session(
    cards: &dyn CardRepository,
    store: &SessionStore,
    config: SessionConfig,
) -> Result<Uuid> {
    let all_cards = cards.fetch_all().await.map_err(|e| {
        tracing::warn!("Card repository fetch failed: {}", e);
        ApiError::from(e)
    })?;

    let session = StudySession::start(&all_cards, config)?;
    let queued = session.queue().len();
    let id = store.insert(session).await;

    tracing::info!("Started session {} with {} cards", id, queued);
    Ok(id)
}

/// Matching and queued card counts for a config, without starting a session.
pub async fn preview(cards: &dyn CardRepository, config: &SessionConfig) -> Result<(usize, usize)> {
    config.validate()?;

    let all_cards = cards.fetch_all().await?;
    let matching = count_matching(&all_cards, config);
    Ok((matching, matching.min(config.card_count as usize)))
}
