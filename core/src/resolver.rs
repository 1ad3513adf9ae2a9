use crate::{ClusterError, GeometryProvider, VolumeId, VolumeManager};

/// Number of independent derivations that must agree before a size is trusted.
pub const CONSISTENCY_SAMPLES: usize = 3;

/// Derives the cluster size of a volume from its capacity and cluster count.
pub struct ClusterSizeResolver<'a> {
    volumes: &'a dyn VolumeManager,
    geometry: &'a dyn GeometryProvider,
}

impl<'a> ClusterSizeResolver<'a> {
    pub fn new(volumes: &'a dyn VolumeManager, geometry: &'a dyn GeometryProvider) -> Self {
        Self { volumes, geometry }
    }

    /// Cluster size in bytes, checked against repeated samples of the same volume.
    pub fn cluster_size(&self, id: &VolumeId) -> Result<u64, ClusterError> {
        if id.is_empty() {
            return Err(ClusterError::InvalidIdentifier(id.to_string()));
        }

        let cluster_size = self.sample(id)?;
        for _ in 1..CONSISTENCY_SAMPLES {
            if self.sample(id)? != cluster_size {
                log::warn!("Drive {} returned differing cluster sizes within one run", id);
                return Err(ClusterError::Inconsistent {
                    volume: id.to_string(),
                });
            }
        }

        Ok(cluster_size)
    }

    fn sample(&self, id: &VolumeId) -> Result<u64, ClusterError> {
        let capacity = self.volumes.total_capacity(id)?;
        let geometry = self.geometry.query_geometry(id)?;

        if geometry.total_clusters == 0 {
            return Err(ClusterError::ZeroClusters {
                volume: id.to_string(),
            });
        }

        let cluster_size = capacity / geometry.total_clusters;
        log::debug!(
            "Drive {}: capacity {} bytes over {} clusters ({} free) -> {} bytes per cluster",
            id,
            capacity,
            geometry.total_clusters,
            geometry.free_clusters,
            cluster_size
        );

        let nominal = geometry.nominal_cluster_size();
        if nominal != 0 && nominal != cluster_size {
            log::debug!(
                "Drive {}: {} sectors x {} bytes does not match derived cluster size {}",
                id,
                geometry.sectors_per_cluster,
                geometry.bytes_per_sector,
                cluster_size
            );
        }

        Ok(cluster_size)
    }
}
