use crate::registry::{RemoteStream, RemoteTrack};
use dashmap::DashMap;
use huddle_core::PeerName;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerStatus {
    Connecting,
    Connected,
    Closed,
}

#[derive(Debug, Clone)]
pub struct PeerEntry {
    pub stream: Option<RemoteStream>,
    pub status: PeerStatus,
}

impl PeerEntry {
    fn placeholder() -> Self {
        Self {
            stream: None,
            status: PeerStatus::Connecting,
        }
    }
}

/// Снимок пиров для UI. Клонировать дёшево (внутри Arc); писать может только сессия.
#[derive(Clone)]
pub struct PeerRegistry {
    peers: Arc<DashMap<PeerName, PeerEntry>>,
    revision: Arc<watch::Sender<u64>>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            peers: Arc::new(DashMap::new()),
            revision: Arc::new(revision),
        }
    }

    pub fn get(&self, peer: &PeerName) -> Option<PeerEntry> {
        self.peers.get(peer).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, peer: &PeerName) -> bool {
        self.peers.contains_key(peer)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn names(&self) -> Vec<PeerName> {
        let mut names: Vec<PeerName> = self.peers.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn snapshot(&self) -> BTreeMap<PeerName, PeerEntry> {
        self.peers
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }

    /// Receiver that changes on every registry write.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    /// Returns `false` when the peer was already known.
    pub(crate) fn ensure_placeholder(&self, peer: &PeerName) -> bool {
        if self.peers.contains_key(peer) {
            return false;
        }
        self.peers.insert(peer.clone(), PeerEntry::placeholder());
        self.bump();
        true
    }

    pub(crate) fn set_status(&self, peer: &PeerName, status: PeerStatus) {
        let changed = {
            let mut entry = self
                .peers
                .entry(peer.clone())
                .or_insert_with(PeerEntry::placeholder);
            let changed = entry.status != status;
            entry.status = status;
            changed
        };
        if changed {
            debug!("Peer {} is now {:?}", peer, status);
            self.bump();
        }
    }

    pub(crate) fn apply_track(&self, peer: &PeerName, track: RemoteTrack) {
        {
            let mut entry = self
                .peers
                .entry(peer.clone())
                .or_insert_with(PeerEntry::placeholder);
            match entry.stream.as_mut() {
                Some(stream) => stream.apply(track),
                None => entry.stream = Some(RemoteStream::new(track)),
            }
        }
        self.bump();
    }

    pub(crate) fn remove(&self, peer: &PeerName) -> bool {
        let removed = self.peers.remove(peer).is_some();
        if removed {
            self.bump();
        }
        removed
    }

    pub(crate) fn clear(&self) {
        if !self.peers.is_empty() {
            self.peers.clear();
            self.bump();
        }
    }
}

impl Default for PeerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
