use clustinfo_core::{ClusterError, GeometryProvider, Volume, VolumeGeometry, VolumeId, VolumeManager};

/// Stand-in for hosts without a native cluster query; every call fails.
pub struct UnsupportedVolumeManager;

impl UnsupportedVolumeManager {
    fn unsupported() -> ClusterError {
        ClusterError::PlatformNotSupported(std::env::consts::OS.to_string())
    }
}

impl VolumeManager for UnsupportedVolumeManager {
    fn enumerate_volumes(&self) -> Result<Vec<Volume>, ClusterError> {
        Err(Self::unsupported())
    }

    fn total_capacity(&self, _id: &VolumeId) -> Result<u64, ClusterError> {
        Err(Self::unsupported())
    }
}

impl GeometryProvider for UnsupportedVolumeManager {
    fn query_geometry(&self, _id: &VolumeId) -> Result<VolumeGeometry, ClusterError> {
        Err(Self::unsupported())
    }
}
