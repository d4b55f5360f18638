//! Document hub: one repository, many snapshot listeners.

use crate::repo::document_repo::{DocumentRepository, RepoError};
use log::{debug, info};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;

pub type SyncResult<T> = Result<T, SyncError>;

/// Failure modes of the synchronization layer.
#[derive(Debug)]
pub enum SyncError {
    Repo(RepoError),
    /// Subscriber bookkeeping is unusable (poisoned lock).
    Subscribers(String),
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Subscribers(message) => write!(f, "subscriber registry unavailable: {message}"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Subscribers(_) => None,
        }
    }
}

impl From<RepoError> for SyncError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl SyncError {
    /// Whether this failure is a rejected stale write.
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, Self::Repo(RepoError::VersionConflict { .. }))
    }
}

/// Full-document state delivered to listeners after every accepted save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSnapshot {
    pub path: String,
    pub body: String,
    pub version: u64,
}

/// Standing observation on one document path.
///
/// The current document (when it exists) is queued at subscribe time, so
/// the first drain always observes present state.
pub struct Subscription {
    receiver: Receiver<DocumentSnapshot>,
}

impl Subscription {
    /// Next pending snapshot, if any. Never blocks.
    pub fn try_next(&self) -> Option<DocumentSnapshot> {
        self.receiver.try_recv().ok()
    }
}

/// Fan-out over one document repository.
///
/// All saves to a path go through the hub so every subscriber of that
/// path observes them, the writer included.
pub struct DocumentHub {
    repo: Box<dyn DocumentRepository + Send + Sync>,
    subscribers: Mutex<HashMap<String, Vec<Sender<DocumentSnapshot>>>>,
}

impl DocumentHub {
    pub fn new(repo: impl DocumentRepository + Send + Sync + 'static) -> Self {
        Self {
            repo: Box::new(repo),
            subscribers: Mutex::new(HashMap::new()),
        }
    }

    /// Loads the current document at `path`.
    pub fn load(&self, path: &str) -> SyncResult<Option<DocumentSnapshot>> {
        let doc = self.repo.load(path)?;
        Ok(doc.map(|doc| DocumentSnapshot {
            path: doc.path,
            body: doc.body,
            version: doc.version,
        }))
    }

    /// Registers a listener on `path` and queues the current document
    /// into it when one exists.
    pub fn subscribe(&self, path: &str) -> SyncResult<Subscription> {
        let (sender, receiver) = channel();
        if let Some(snapshot) = self.load(path)? {
            // Cannot fail: the matching receiver is alive in this scope.
            let _ = sender.send(snapshot);
        }

        self.with_subscribers(|subscribers| {
            subscribers
                .entry(path.to_string())
                .or_default()
                .push(sender);
        })?;

        info!("event=subscribe module=sync status=ok path={path}");
        Ok(Subscription { receiver })
    }

    /// Saves through the repository and echoes the accepted document to
    /// every listener of `path`.
    pub fn save(&self, path: &str, body: &str, expected_version: Option<u64>) -> SyncResult<u64> {
        let version = self.repo.save(path, body, expected_version)?;
        debug!("event=document_save module=sync status=ok path={path} version={version}");

        let snapshot = DocumentSnapshot {
            path: path.to_string(),
            body: body.to_string(),
            version,
        };
        self.with_subscribers(|subscribers| {
            if let Some(senders) = subscribers.get_mut(path) {
                // Dropped subscriptions are pruned as their send fails.
                senders.retain(|sender| sender.send(snapshot.clone()).is_ok());
            }
        })?;

        Ok(version)
    }

    fn with_subscribers<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, Vec<Sender<DocumentSnapshot>>>) -> T,
    ) -> SyncResult<T> {
        let mut subscribers = self
            .subscribers
            .lock()
            .map_err(|_| SyncError::Subscribers("subscriber lock poisoned".to_string()))?;
        Ok(f(&mut subscribers))
    }
}

#[cfg(test)]
mod tests {
    use super::DocumentHub;
    use crate::repo::document_repo::MemoryDocumentRepository;

    #[test]
    fn subscriber_receives_current_document_and_later_saves() {
        let hub = DocumentHub::new(MemoryDocumentRepository::new());
        hub.save("a/doc", "first", None).unwrap();

        let subscription = hub.subscribe("a/doc").unwrap();
        let initial = subscription.try_next().unwrap();
        assert_eq!(initial.body, "first");
        assert_eq!(initial.version, 1);

        hub.save("a/doc", "second", Some(1)).unwrap();
        let echoed = subscription.try_next().unwrap();
        assert_eq!(echoed.body, "second");
        assert_eq!(echoed.version, 2);
        assert!(subscription.try_next().is_none());
    }

    #[test]
    fn subscriber_on_missing_document_starts_empty() {
        let hub = DocumentHub::new(MemoryDocumentRepository::new());
        let subscription = hub.subscribe("a/doc").unwrap();
        assert!(subscription.try_next().is_none());
    }

    #[test]
    fn writer_receives_its_own_echo() {
        let hub = DocumentHub::new(MemoryDocumentRepository::new());
        let mine = hub.subscribe("a/doc").unwrap();
        let theirs = hub.subscribe("a/doc").unwrap();

        hub.save("a/doc", "shared", None).unwrap();
        assert_eq!(mine.try_next().unwrap().body, "shared");
        assert_eq!(theirs.try_next().unwrap().body, "shared");
    }

    #[test]
    fn saves_to_other_paths_are_not_delivered() {
        let hub = DocumentHub::new(MemoryDocumentRepository::new());
        let subscription = hub.subscribe("a/doc").unwrap();
        hub.save("b/doc", "elsewhere", None).unwrap();
        assert!(subscription.try_next().is_none());
    }
}
