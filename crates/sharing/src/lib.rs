//! Wardrobe sharing graph
//!
//! Directed "owner shares with viewer" edges keyed by username. The graph
//! gates which users may list another owner's garment collection.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use thiserror::Error;

/// Result type
pub type Result<T> = std::result::Result<T, SharingError>;

/// Error type
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SharingError {
    #[error("a wardrobe cannot be shared with its owner")]
    SelfShareRejected,

    /// Deliberately carries no detail: the caller must not learn whether
    /// the owner exists.
    #[error("access denied")]
    AccessDenied,
}

/// Directed share edges, keyed by stable username.
///
/// A single lock serializes mutation of the edge sets so concurrent
/// share/unshare calls cannot lose updates; reads take a snapshot.
#[derive(Debug, Default)]
pub struct ShareGraph {
    edges: RwLock<HashMap<String, BTreeSet<String>>>,
}

impl ShareGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `viewer` access to `owner`'s wardrobe.
    ///
    /// Idempotent: sharing an already-shared pair succeeds without creating
    /// a duplicate edge.
    pub fn share(&self, owner: &str, viewer: &str) -> Result<()> {
        if owner == viewer {
            return Err(SharingError::SelfShareRejected);
        }
        let mut edges = self.edges.write().unwrap_or_else(|e| e.into_inner());
        let inserted = edges
            .entry(owner.to_string())
            .or_default()
            .insert(viewer.to_string());
        if inserted {
            log::info!("wardrobe of {} shared with {}", owner, viewer);
        }
        Ok(())
    }

    /// Revoke `viewer`'s access to `owner`'s wardrobe.
    ///
    /// Idempotent: removing a non-existent edge succeeds silently.
    pub fn unshare(&self, owner: &str, viewer: &str) {
        let mut edges = self.edges.write().unwrap_or_else(|e| e.into_inner());
        if let Some(viewers) = edges.get_mut(owner) {
            if viewers.remove(viewer) {
                log::info!("wardrobe of {} unshared with {}", owner, viewer);
            }
            if viewers.is_empty() {
                edges.remove(owner);
            }
        }
    }

    pub fn is_shared(&self, owner: &str, viewer: &str) -> bool {
        let edges = self.edges.read().unwrap_or_else(|e| e.into_inner());
        edges
            .get(owner)
            .map(|viewers| viewers.contains(viewer))
            .unwrap_or(false)
    }

    /// Everyone `owner` has shared their wardrobe with.
    pub fn viewers_of(&self, owner: &str) -> BTreeSet<String> {
        let edges = self.edges.read().unwrap_or_else(|e| e.into_inner());
        edges.get(owner).cloned().unwrap_or_default()
    }

    /// Every owner who has shared their wardrobe with `viewer`.
    pub fn owners_sharing_with(&self, viewer: &str) -> BTreeSet<String> {
        let edges = self.edges.read().unwrap_or_else(|e| e.into_inner());
        edges
            .iter()
            .filter(|(_, viewers)| viewers.contains(viewer))
            .map(|(owner, _)| owner.clone())
            .collect()
    }

    /// Check that `viewer` may list `owner`'s collection.
    pub fn authorize_view(&self, owner: &str, viewer: &str) -> Result<()> {
        if self.is_shared(owner, viewer) {
            Ok(())
        } else {
            Err(SharingError::AccessDenied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn share_is_idempotent() {
        let graph = ShareGraph::new();
        assert!(!graph.is_shared("alice", "bob"));
        graph.share("alice", "bob").unwrap();
        assert!(graph.is_shared("alice", "bob"));
        graph.share("alice", "bob").unwrap();
        assert_eq!(graph.viewers_of("alice").len(), 1);
    }

    #[test]
    fn self_share_is_rejected() {
        let graph = ShareGraph::new();
        assert_eq!(
            graph.share("alice", "alice"),
            Err(SharingError::SelfShareRejected)
        );
        assert!(graph.viewers_of("alice").is_empty());
    }

    #[test]
    fn unshare_is_idempotent() {
        let graph = ShareGraph::new();
        graph.share("alice", "bob").unwrap();
        graph.unshare("alice", "bob");
        graph.unshare("alice", "bob");
        assert!(!graph.is_shared("alice", "bob"));
        assert!(graph.viewers_of("alice").is_empty());
    }

    #[test]
    fn edges_are_directed() {
        let graph = ShareGraph::new();
        graph.share("alice", "bob").unwrap();
        assert!(graph.is_shared("alice", "bob"));
        assert!(!graph.is_shared("bob", "alice"));
    }

    #[test]
    fn listings_cover_both_directions() {
        let graph = ShareGraph::new();
        graph.share("alice", "bob").unwrap();
        graph.share("carol", "bob").unwrap();
        graph.share("alice", "dave").unwrap();

        let viewers: Vec<_> = graph.viewers_of("alice").into_iter().collect();
        assert_eq!(viewers, vec!["bob".to_string(), "dave".to_string()]);

        let owners: Vec<_> = graph.owners_sharing_with("bob").into_iter().collect();
        assert_eq!(owners, vec!["alice".to_string(), "carol".to_string()]);
    }

    #[test]
    fn authorize_view_requires_an_edge() {
        let graph = ShareGraph::new();
        assert_eq!(
            graph.authorize_view("alice", "bob"),
            Err(SharingError::AccessDenied)
        );
        // The error for a nonexistent owner is indistinguishable.
        assert_eq!(
            graph.authorize_view("nobody", "bob"),
            Err(SharingError::AccessDenied)
        );
        graph.share("alice", "bob").unwrap();
        assert_eq!(graph.authorize_view("alice", "bob"), Ok(()));
    }

    #[test]
    fn concurrent_share_and_unshare_do_not_lose_updates() {
        let graph = Arc::new(ShareGraph::new());
        let mut handles = Vec::new();
        for i in 0..8 {
            let graph = Arc::clone(&graph);
            handles.push(std::thread::spawn(move || {
                let viewer = format!("viewer-{}", i);
                for _ in 0..100 {
                    graph.share("alice", &viewer).unwrap();
                    graph.unshare("alice", &viewer);
                }
                graph.share("alice", &viewer).unwrap();
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(graph.viewers_of("alice").len(), 8);
    }
}
