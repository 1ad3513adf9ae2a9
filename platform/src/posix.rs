//! statvfs-backed geometry shared by the Linux and macOS managers.
//!
//! POSIX exposes a single fundamental block size rather than sectors grouped
//! into clusters, so a "cluster" here is one `f_frsize` fragment.

use clustinfo_core::{ClusterError, VolumeGeometry, VolumeId};
use nix::sys::statvfs::{statvfs, Statvfs};
use std::path::Path;

fn stat(id: &VolumeId) -> Result<Statvfs, ClusterError> {
    // A relative name would resolve against the working directory, not a volume.
    if !Path::new(id.as_str()).is_absolute() {
        return Err(ClusterError::InvalidIdentifier(id.to_string()));
    }
    statvfs(id.as_str()).map_err(|errno| ClusterError::query(id.as_str(), std::io::Error::from(errno)))
}

#[allow(clippy::unnecessary_cast)]
pub(crate) fn geometry(id: &VolumeId) -> Result<VolumeGeometry, ClusterError> {
    let stats = stat(id)?;
    Ok(VolumeGeometry {
        sectors_per_cluster: 1,
        bytes_per_sector: stats.fragment_size() as u64,
        free_clusters: stats.blocks_free() as u64,
        total_clusters: stats.blocks() as u64,
    })
}

#[allow(clippy::unnecessary_cast)]
pub(crate) fn capacity(id: &VolumeId) -> Result<u64, ClusterError> {
    let stats = stat(id)?;
    Ok((stats.blocks() as u64).saturating_mul(stats.fragment_size() as u64))
}

pub(crate) fn is_ready(mount_point: &str) -> bool {
    statvfs(mount_point).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_identifier_is_rejected() {
        for name in ["D", ".", "mnt/data"] {
            let err = geometry(&VolumeId::from(name)).unwrap_err();
            assert!(matches!(err, ClusterError::InvalidIdentifier(ref id) if id == name), "{name}: {err:?}");
            assert!(matches!(capacity(&VolumeId::from(name)), Err(ClusterError::InvalidIdentifier(_))));
        }
    }

    #[test]
    fn test_root_has_geometry() {
        let root = geometry(&VolumeId::from("/")).unwrap();
        assert_eq!(root.sectors_per_cluster, 1);
        assert!(root.bytes_per_sector > 0);
    }
}
