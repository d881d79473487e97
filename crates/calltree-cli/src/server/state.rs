//! Server application state

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use calltree_core::{Abi, FormSession, TreeBuilder};

use super::error::{ApiError, ApiResult};

pub type SessionId = u64;

/// Open sessions allowed at once unless configured otherwise
pub const DEFAULT_MAX_SESSIONS: usize = 256;

/// Application state shared across handlers
///
/// Each form session lives behind the shared lock, so a tree is never
/// edited by two requests at once.
#[derive(Clone)]
pub struct AppState {
    sessions: Arc<RwLock<HashMap<SessionId, FormSession>>>,
    next_id: Arc<AtomicU64>,
    default_abi: Option<Arc<Abi>>,
    builder: TreeBuilder,
    max_sessions: usize,
}

impl AppState {
    pub fn new(builder: TreeBuilder) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            default_abi: None,
            builder,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }

    /// Cap the number of sessions open at once
    pub fn with_max_sessions(mut self, max: usize) -> Self {
        self.max_sessions = max;
        self
    }

    /// ABI used by `/functions` and by sessions created without one
    pub fn with_abi(mut self, abi: Abi) -> Self {
        self.default_abi = Some(Arc::new(abi));
        self
    }

    pub fn default_abi(&self) -> Option<&Abi> {
        self.default_abi.as_deref()
    }

    pub fn sessions(&self) -> &RwLock<HashMap<SessionId, FormSession>> {
        &self.sessions
    }

    /// Fresh, unregistered session over `abi`
    pub fn new_session(&self, abi: Abi) -> FormSession {
        FormSession::with_builder(abi, self.builder.clone())
    }

    /// Register a session and return its id. Fails once the session limit is reached.
    pub async fn open_session(&self, session: FormSession) -> ApiResult<SessionId> {
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.max_sessions {
            return Err(ApiError::too_many_sessions(self.max_sessions));
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        sessions.insert(id, session);
        Ok(id)
    }
}
