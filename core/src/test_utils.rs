/// Scripted volume host for tests - never touches real volumes
use crate::{ClusterError, GeometryProvider, Volume, VolumeGeometry, VolumeId, VolumeKind, VolumeManager};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// Fake platform that answers both the enumeration and the native geometry query.
///
/// Each volume is keyed by its identifier (first letter of its name). Geometry
/// answers can be scripted per call to simulate a volume whose counters change
/// between samples.
#[derive(Default)]
pub struct MockVolumeHost {
    volumes: Vec<Volume>,
    capacities: HashMap<VolumeId, u64>,
    scripts: HashMap<VolumeId, Vec<u64>>,
    failing_queries: HashSet<VolumeId>,
    fail_enumeration: bool,
    query_log: RefCell<Vec<VolumeId>>,
}

impl MockVolumeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a volume whose capacity and cluster count never change.
    pub fn with_volume(
        mut self,
        name: &str,
        kind: VolumeKind,
        is_ready: bool,
        capacity: u64,
        total_clusters: u64,
    ) -> Self {
        let id = Self::key(name);
        self.volumes.push(Volume {
            name: name.to_string(),
            kind,
            is_ready,
            filesystem: Some("NTFS".to_string()),
        });
        self.capacities.insert(id.clone(), capacity);
        self.scripts.insert(id, vec![total_clusters]);
        self
    }

    /// Successive `total_clusters` answers; the last one repeats once exhausted.
    pub fn with_cluster_script(mut self, id: &str, totals: Vec<u64>) -> Self {
        self.scripts.insert(VolumeId::from(id), totals);
        self
    }

    pub fn with_failing_query(mut self, id: &str) -> Self {
        self.failing_queries.insert(VolumeId::from(id));
        self
    }

    pub fn with_failing_enumeration(mut self) -> Self {
        self.fail_enumeration = true;
        self
    }

    /// Number of native queries issued for `id`.
    pub fn query_count(&self, id: &str) -> usize {
        self.query_log
            .borrow()
            .iter()
            .filter(|queried| queried.as_str() == id)
            .count()
    }

    fn key(name: &str) -> VolumeId {
        VolumeId::new(name.chars().take(1).collect::<String>())
    }

    fn not_found(id: &VolumeId) -> ClusterError {
        ClusterError::query(
            id.as_str(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "The device is not ready."),
        )
    }
}

impl VolumeManager for MockVolumeHost {
    fn enumerate_volumes(&self) -> Result<Vec<Volume>, ClusterError> {
        if self.fail_enumeration {
            return Err(ClusterError::Enumeration("mock enumeration failure".to_string()));
        }
        Ok(self.volumes.clone())
    }

    fn total_capacity(&self, id: &VolumeId) -> Result<u64, ClusterError> {
        self.capacities
            .get(id)
            .copied()
            .ok_or_else(|| Self::not_found(id))
    }
}

impl GeometryProvider for MockVolumeHost {
    fn query_geometry(&self, id: &VolumeId) -> Result<VolumeGeometry, ClusterError> {
        let call = {
            let mut log = self.query_log.borrow_mut();
            log.push(id.clone());
            log.iter().filter(|queried| *queried == id).count() - 1
        };

        if self.failing_queries.contains(id) {
            return Err(ClusterError::query(
                id.as_str(),
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Access is denied."),
            ));
        }

        let script = self.scripts.get(id).ok_or_else(|| Self::not_found(id))?;
        let total_clusters = script
            .get(call)
            .or_else(|| script.last())
            .copied()
            .unwrap_or_default();

        Ok(VolumeGeometry {
            sectors_per_cluster: 8,
            bytes_per_sector: 512,
            free_clusters: total_clusters / 2,
            total_clusters,
        })
    }
}
