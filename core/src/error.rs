use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("Failed to enumerate volumes: {0}")]
    Enumeration(String),

    #[error("Query failed for drive {volume}: {source}")]
    Query {
        volume: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cluster size for drive {volume} returned inconsistent values")]
    Inconsistent { volume: String },

    #[error("drive {volume} reported a total cluster count of zero")]
    ZeroClusters { volume: String },

    #[error("Invalid volume identifier: '{0}'")]
    InvalidIdentifier(String),

    #[error("Platform not supported: {0}")]
    PlatformNotSupported(String),
}

impl ClusterError {
    pub fn query(volume: impl Into<String>, source: std::io::Error) -> Self {
        ClusterError::Query {
            volume: volume.into(),
            source,
        }
    }
}
