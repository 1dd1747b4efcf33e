//! Cluster registry.
//!
//! # Responsibilities
//! - Map a cluster id to its single destination address
//! - Validate destinations eagerly (absolute URL with scheme and host)
//!
//! # Design Decisions
//! - One destination per cluster; no load balancing at this layer
//! - Built once at startup, immutable, shared read-only
//! - A malformed destination refuses startup rather than failing the first
//!   request that resolves it

use std::collections::HashMap;

use url::Url;

/// A named backend service with its one destination address.
#[derive(Debug, Clone)]
pub struct ClusterRule {
    pub id: String,
    pub destination: String,
}

impl ClusterRule {
    pub fn new(id: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            destination: destination.into(),
        }
    }
}

/// Why the cluster registry refused to build. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    #[error("cluster '{id}' has no destination address")]
    MissingDestination { id: String },

    #[error("cluster '{id}' destination is not an absolute URL: {destination}")]
    InvalidDestination { id: String, destination: String },

    #[error("duplicate cluster id '{id}'")]
    DuplicateCluster { id: String },
}

/// Immutable map of cluster id → validated destination URL.
#[derive(Debug)]
pub struct ClusterRegistry {
    destinations: HashMap<String, Url>,
}

impl ClusterRegistry {
    pub fn new(clusters: Vec<ClusterRule>) -> Result<Self, ClusterError> {
        let mut destinations = HashMap::with_capacity(clusters.len());
        for cluster in clusters {
            if cluster.destination.trim().is_empty() {
                return Err(ClusterError::MissingDestination { id: cluster.id });
            }
            let url = Url::parse(&cluster.destination).map_err(|_| {
                ClusterError::InvalidDestination {
                    id: cluster.id.clone(),
                    destination: cluster.destination.clone(),
                }
            })?;
            if !url.has_host() {
                return Err(ClusterError::InvalidDestination {
                    id: cluster.id.clone(),
                    destination: cluster.destination.clone(),
                });
            }
            if destinations.insert(cluster.id.clone(), url).is_some() {
                return Err(ClusterError::DuplicateCluster { id: cluster.id });
            }
        }
        Ok(Self { destinations })
    }

    pub fn contains(&self, cluster_id: &str) -> bool {
        self.destinations.contains_key(cluster_id)
    }

    /// Destination address for a cluster id.
    pub fn destination(&self, cluster_id: &str) -> Option<&Url> {
        self.destinations.get(cluster_id)
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}
