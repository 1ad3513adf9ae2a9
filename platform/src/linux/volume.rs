use crate::posix;
use anyhow::Context;
use clustinfo_core::{ClusterError, GeometryProvider, Volume, VolumeGeometry, VolumeId, VolumeKind, VolumeManager};
use std::fs;
use std::path::Path;

const NETWORK_FILESYSTEMS: &[&str] = &[
    "nfs", "nfs4", "cifs", "smb3", "smbfs", "ncpfs", "afs", "9p", "ceph", "glusterfs", "fuse.sshfs",
];

const OPTICAL_FILESYSTEMS: &[&str] = &["iso9660", "udf"];

#[derive(Debug, PartialEq, Eq)]
struct MountEntry {
    source: String,
    target: String,
    fstype: String,
}

pub struct LinuxVolumeManager;

impl LinuxVolumeManager {
    fn read_mounts() -> anyhow::Result<Vec<MountEntry>> {
        let contents = fs::read_to_string("/proc/mounts").context("Failed to read /proc/mounts")?;
        Ok(Self::parse_mounts(&contents))
    }

    fn parse_mounts(contents: &str) -> Vec<MountEntry> {
        contents
            .lines()
            .filter_map(|line| {
                let mut parts = line.split_whitespace();
                let source = parts.next()?;
                let target = parts.next()?;
                let fstype = parts.next()?;
                Some(MountEntry {
                    source: Self::unescape(source),
                    target: Self::unescape(target),
                    fstype: fstype.to_string(),
                })
            })
            .collect()
    }

    /// /proc/mounts encodes spaces, tabs and backslashes as three-digit octal escapes.
    fn unescape(field: &str) -> String {
        let bytes = field.as_bytes();
        let mut out = Vec::with_capacity(bytes.len());
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'\\' && i + 3 < bytes.len() {
                let digits = &bytes[i + 1..i + 4];
                if digits.iter().all(|b| (b'0'..=b'7').contains(b)) {
                    let value = digits.iter().fold(0u32, |acc, b| acc * 8 + u32::from(b - b'0'));
                    if let Ok(value) = u8::try_from(value) {
                        out.push(value);
                        i += 4;
                        continue;
                    }
                }
            }
            out.push(bytes[i]);
            i += 1;
        }
        String::from_utf8_lossy(&out).into_owned()
    }

    fn is_removable(source: &str) -> bool {
        let name = match source.strip_prefix("/dev/") {
            Some(name) => name,
            None => return false,
        };

        // Partitions carry no removable flag of their own; their parent disk does.
        let class_path = Path::new("/sys/class/block").join(name);
        let candidates = [
            Some(class_path.join("removable")),
            fs::canonicalize(&class_path)
                .ok()
                .and_then(|p| p.parent().map(|parent| parent.join("removable"))),
        ];

        candidates
            .iter()
            .flatten()
            .find_map(|path| fs::read_to_string(path).ok())
            .map(|content| content.trim() == "1")
            .unwrap_or(false)
    }

    fn classify(entry: &MountEntry) -> VolumeKind {
        if NETWORK_FILESYSTEMS.contains(&entry.fstype.as_str()) {
            return VolumeKind::Network;
        }

        if OPTICAL_FILESYSTEMS.contains(&entry.fstype.as_str()) || entry.source.starts_with("/dev/sr") {
            return VolumeKind::Optical;
        }

        if entry.source.starts_with("/dev/") {
            if Self::is_removable(&entry.source) {
                return VolumeKind::Removable;
            }
            return VolumeKind::Fixed;
        }

        VolumeKind::Unknown
    }

    /// Drops file bind mounts and repeat mounts of a block device already seen.
    ///
    /// Bind mounts and btrfs subvolumes list the same device several times; only
    /// the first directory mount stands for the volume.
    fn distinct_mounts(mounts: Vec<MountEntry>, is_dir: impl Fn(&str) -> bool) -> Vec<MountEntry> {
        let mut seen_sources: Vec<String> = Vec::new();
        mounts
            .into_iter()
            .filter(|entry| {
                if !is_dir(&entry.target) {
                    log::debug!("Skipping file mount {} on {}", entry.source, entry.target);
                    return false;
                }
                if entry.source.starts_with("/dev/") {
                    if seen_sources.contains(&entry.source) {
                        log::debug!("Skipping repeat mount of {} on {}", entry.source, entry.target);
                        return false;
                    }
                    seen_sources.push(entry.source.clone());
                }
                true
            })
            .collect()
    }
}

impl VolumeManager for LinuxVolumeManager {
    fn enumerate_volumes(&self) -> Result<Vec<Volume>, ClusterError> {
        let mounts = Self::read_mounts().map_err(|e| ClusterError::Enumeration(format!("{:#}", e)))?;

        let mounts = Self::distinct_mounts(mounts, |target| Path::new(target).is_dir());

        let volumes = mounts
            .into_iter()
            .map(|entry| {
                let kind = Self::classify(&entry);
                let is_ready = posix::is_ready(&entry.target);
                log::debug!(
                    "Found mount {} on {} ({}, {:?}, ready: {})",
                    entry.source,
                    entry.target,
                    entry.fstype,
                    kind,
                    is_ready
                );
                Volume {
                    name: entry.target,
                    kind,
                    is_ready,
                    filesystem: Some(entry.fstype),
                }
            })
            .collect();

        Ok(volumes)
    }

    fn total_capacity(&self, id: &VolumeId) -> Result<u64, ClusterError> {
        posix::capacity(id)
    }

    /// Enumeration keeps one mount per device, so the mount point identifies the volume.
    fn identifier_for(&self, volume: &Volume) -> VolumeId {
        VolumeId::new(volume.name.clone())
    }
}

impl GeometryProvider for LinuxVolumeManager {
    fn query_geometry(&self, id: &VolumeId) -> Result<VolumeGeometry, ClusterError> {
        posix::geometry(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(source: &str, target: &str, fstype: &str) -> MountEntry {
        MountEntry {
            source: source.to_string(),
            target: target.to_string(),
            fstype: fstype.to_string(),
        }
    }

    #[test]
    fn test_parse_mounts() {
        let contents = "\
/dev/nvme0n1p2 / ext4 rw,relatime 0 0
proc /proc proc rw,nosuid,nodev,noexec,relatime 0 0
/dev/sdb1 /media/usb\\040stick vfat rw,relatime 0 0
";
        let mounts = LinuxVolumeManager::parse_mounts(contents);

        assert_eq!(mounts.len(), 3);
        assert_eq!(mounts[0], entry("/dev/nvme0n1p2", "/", "ext4"));
        assert_eq!(mounts[2].target, "/media/usb stick");
    }

    #[test]
    fn test_parse_skips_truncated_lines() {
        let mounts = LinuxVolumeManager::parse_mounts("/dev/sda1 /boot\n\n");
        assert!(mounts.is_empty());
    }

    #[test]
    fn test_unescape_leaves_plain_fields_alone() {
        assert_eq!(LinuxVolumeManager::unescape("/mnt/data"), "/mnt/data");
        assert_eq!(LinuxVolumeManager::unescape("/mnt/a\\011b"), "/mnt/a\tb");
        assert_eq!(LinuxVolumeManager::unescape("/mnt/trailing\\"), "/mnt/trailing\\");
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            LinuxVolumeManager::classify(&entry("server:/export", "/net", "nfs4")),
            VolumeKind::Network
        );
        assert_eq!(
            LinuxVolumeManager::classify(&entry("/dev/sr0", "/media/cdrom", "iso9660")),
            VolumeKind::Optical
        );
        assert_eq!(
            LinuxVolumeManager::classify(&entry("tmpfs", "/run", "tmpfs")),
            VolumeKind::Unknown
        );
        assert_eq!(
            LinuxVolumeManager::classify(&entry("overlay", "/", "overlay")),
            VolumeKind::Unknown
        );
    }

    #[test]
    fn test_container_bind_mounts_report_device_once() {
        let contents = "\
overlay / overlay rw,relatime,lowerdir=/var/lib/docker/overlay2/l/A 0 0
proc /proc proc rw,nosuid,nodev,noexec,relatime 0 0
/dev/sda1 /data ext4 rw,relatime 0 0
/dev/sda1 /etc/resolv.conf ext4 rw,relatime 0 0
/dev/sda1 /etc/hostname ext4 rw,relatime 0 0
/dev/sda1 /etc/hosts ext4 rw,relatime 0 0
/dev/sda1 /srv/cache ext4 rw,relatime 0 0
/dev/sdb1 /backup ext4 rw,relatime 0 0
";
        let files = ["/etc/resolv.conf", "/etc/hostname", "/etc/hosts"];
        let mounts = LinuxVolumeManager::distinct_mounts(
            LinuxVolumeManager::parse_mounts(contents),
            |target| !files.contains(&target),
        );
        let targets: Vec<&str> = mounts.iter().map(|m| m.target.as_str()).collect();

        assert_eq!(targets, vec!["/", "/proc", "/data", "/backup"]);
    }

    #[test]
    fn test_file_mount_does_not_shadow_later_directory_mount() {
        let mounts = vec![
            entry("/dev/sda1", "/etc/hosts", "ext4"),
            entry("/dev/sda1", "/data", "ext4"),
        ];
        let mounts = LinuxVolumeManager::distinct_mounts(mounts, |target| target != "/etc/hosts");

        assert_eq!(mounts, vec![entry("/dev/sda1", "/data", "ext4")]);
    }

    #[test]
    fn test_identifier_is_mount_point() {
        let volume = Volume {
            name: "/home".to_string(),
            kind: VolumeKind::Fixed,
            is_ready: true,
            filesystem: Some("ext4".to_string()),
        };
        assert_eq!(LinuxVolumeManager.identifier_for(&volume), VolumeId::from("/home"));
    }
}
