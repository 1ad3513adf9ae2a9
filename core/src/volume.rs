use std::fmt;

use crate::ClusterError;

/// Normalized name of a volume: a drive letter on Windows, a mount point elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VolumeId(String);

impl VolumeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Root path handed to the native query, `D` -> `D:\`.
    pub fn drive_root(&self) -> String {
        format!("{}:\\", self.0)
    }
}

impl fmt::Display for VolumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VolumeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeKind {
    Fixed,
    Removable,
    Optical,
    Network,
    Unknown,
}

impl VolumeKind {
    /// Kinds included when every volume is reported.
    pub fn is_reportable(self) -> bool {
        matches!(self, VolumeKind::Fixed | VolumeKind::Removable | VolumeKind::Optical)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    pub name: String,
    pub kind: VolumeKind,
    pub is_ready: bool,
    pub filesystem: Option<String>,
}

/// Raw allocation counters as reported by the operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VolumeGeometry {
    pub sectors_per_cluster: u64,
    pub bytes_per_sector: u64,
    pub free_clusters: u64,
    pub total_clusters: u64,
}

impl VolumeGeometry {
    /// Cluster size implied by the sector counters alone.
    pub fn nominal_cluster_size(&self) -> u64 {
        self.sectors_per_cluster.saturating_mul(self.bytes_per_sector)
    }
}

pub trait VolumeManager {
    fn enumerate_volumes(&self) -> Result<Vec<Volume>, ClusterError>;

    /// Total size of the volume in bytes.
    fn total_capacity(&self, id: &VolumeId) -> Result<u64, ClusterError>;

    fn identifier_for(&self, volume: &Volume) -> VolumeId {
        VolumeId::new(volume.name.chars().take(1).collect::<String>())
    }
}

pub trait GeometryProvider {
    fn query_geometry(&self, id: &VolumeId) -> Result<VolumeGeometry, ClusterError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Letters;

    impl VolumeManager for Letters {
        fn enumerate_volumes(&self) -> Result<Vec<Volume>, ClusterError> {
            Ok(vec![])
        }

        fn total_capacity(&self, _id: &VolumeId) -> Result<u64, ClusterError> {
            Ok(0)
        }
    }

    #[test]
    fn default_identifier_is_first_character() {
        let volume = Volume {
            name: "C:\\".to_string(),
            kind: VolumeKind::Fixed,
            is_ready: true,
            filesystem: Some("NTFS".to_string()),
        };
        assert_eq!(Letters.identifier_for(&volume), VolumeId::from("C"));
    }

    #[test]
    fn drive_root_appends_separator() {
        assert_eq!(VolumeId::from("E").drive_root(), "E:\\");
    }

    #[test]
    fn only_local_kinds_are_reportable() {
        assert!(VolumeKind::Fixed.is_reportable());
        assert!(VolumeKind::Removable.is_reportable());
        assert!(VolumeKind::Optical.is_reportable());
        assert!(!VolumeKind::Network.is_reportable());
        assert!(!VolumeKind::Unknown.is_reportable());
    }
}
