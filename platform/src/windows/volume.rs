use clustinfo_core::{ClusterError, GeometryProvider, Volume, VolumeGeometry, VolumeId, VolumeKind, VolumeManager};
use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;
use windows::core::PCWSTR;
use windows::Win32::Storage::FileSystem::{
    GetDiskFreeSpaceExW, GetDiskFreeSpaceW, GetDriveTypeW, GetLogicalDrives, GetVolumeInformationW,
};

// GetDriveTypeW return codes
const DRIVE_REMOVABLE: u32 = 2;
const DRIVE_FIXED: u32 = 3;
const DRIVE_REMOTE: u32 = 4;
const DRIVE_CDROM: u32 = 5;

pub struct WindowsVolumeManager;

impl WindowsVolumeManager {
    fn wide(s: &str) -> Vec<u16> {
        OsStr::new(s).encode_wide().chain(std::iter::once(0)).collect()
    }

    fn logical_drive_letters() -> Vec<char> {
        let mask = unsafe { GetLogicalDrives() };
        ('A'..='Z')
            .enumerate()
            .filter(|(idx, _)| mask & (1u32 << idx) != 0)
            .map(|(_, letter)| letter)
            .collect()
    }

    fn drive_kind(drive_type: u32) -> VolumeKind {
        match drive_type {
            DRIVE_FIXED => VolumeKind::Fixed,
            DRIVE_REMOVABLE => VolumeKind::Removable,
            DRIVE_CDROM => VolumeKind::Optical,
            DRIVE_REMOTE => VolumeKind::Network,
            _ => VolumeKind::Unknown,
        }
    }

    /// Filesystem name of a mounted volume, or `None` when the drive is not ready.
    fn volume_filesystem(root: &[u16]) -> Option<String> {
        let mut fs_buf = [0u16; 64];
        let result = unsafe {
            GetVolumeInformationW(
                PCWSTR::from_raw(root.as_ptr()),
                None,
                None,
                None,
                None,
                Some(&mut fs_buf),
            )
        };
        result.ok()?;

        let fs = String::from_utf16_lossy(&fs_buf).trim_end_matches('\0').trim().to_string();
        Some(fs)
    }

    fn last_error(id: &VolumeId) -> ClusterError {
        ClusterError::query(id.as_str(), std::io::Error::last_os_error())
    }
}

impl VolumeManager for WindowsVolumeManager {
    fn enumerate_volumes(&self) -> Result<Vec<Volume>, ClusterError> {
        let letters = Self::logical_drive_letters();
        if letters.is_empty() {
            return Err(ClusterError::Enumeration(format!(
                "GetLogicalDrives failed: {}",
                std::io::Error::last_os_error()
            )));
        }

        let volumes = letters
            .into_iter()
            .map(|letter| {
                let name = format!("{}:\\", letter);
                let root = Self::wide(&name);
                let kind = Self::drive_kind(unsafe { GetDriveTypeW(PCWSTR::from_raw(root.as_ptr())) });
                let filesystem = Self::volume_filesystem(&root);
                log::debug!("Found drive {} ({:?}, filesystem: {:?})", name, kind, filesystem);
                Volume {
                    name,
                    kind,
                    is_ready: filesystem.is_some(),
                    filesystem: filesystem.filter(|fs| !fs.is_empty()),
                }
            })
            .collect();

        Ok(volumes)
    }

    fn total_capacity(&self, id: &VolumeId) -> Result<u64, ClusterError> {
        let root = Self::wide(&id.drive_root());
        let mut total = 0u64;

        unsafe { GetDiskFreeSpaceExW(PCWSTR::from_raw(root.as_ptr()), None, Some(&mut total as *mut u64), None) }
            .map_err(|_| Self::last_error(id))?;

        Ok(total)
    }
}

impl GeometryProvider for WindowsVolumeManager {
    fn query_geometry(&self, id: &VolumeId) -> Result<VolumeGeometry, ClusterError> {
        let root = Self::wide(&id.drive_root());
        let mut sectors_per_cluster = 0u32;
        let mut bytes_per_sector = 0u32;
        let mut free_clusters = 0u32;
        let mut total_clusters = 0u32;

        unsafe {
            GetDiskFreeSpaceW(
                PCWSTR::from_raw(root.as_ptr()),
                Some(&mut sectors_per_cluster as *mut u32),
                Some(&mut bytes_per_sector as *mut u32),
                Some(&mut free_clusters as *mut u32),
                Some(&mut total_clusters as *mut u32),
            )
        }
        .map_err(|_| Self::last_error(id))?;

        Ok(VolumeGeometry {
            sectors_per_cluster: u64::from(sectors_per_cluster),
            bytes_per_sector: u64::from(bytes_per_sector),
            free_clusters: u64::from(free_clusters),
            total_clusters: u64::from(total_clusters),
        })
    }
}
