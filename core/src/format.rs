const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// Renders a cluster size as `B`, `KB` or `MB`, truncating rather than rounding.
///
/// Anything of a gigabyte or more falls back to plain bytes; no filesystem
/// allocates clusters that large.
pub fn readable_size(bytes: u64) -> String {
    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{} KB", bytes / KB)
    } else if bytes < GB {
        format!("{} MB", bytes / MB)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_boundaries() {
        assert_eq!(readable_size(0), "0 B");
        assert_eq!(readable_size(512), "512 B");
        assert_eq!(readable_size(1023), "1023 B");
        assert_eq!(readable_size(1024), "1 KB");
        assert_eq!(readable_size(1024 * 1024 - 1), "1023 KB");
        assert_eq!(readable_size(1024 * 1024), "1 MB");
        assert_eq!(readable_size(GB - 1), "1023 MB");
    }

    #[test]
    fn test_truncates_instead_of_rounding() {
        assert_eq!(readable_size(1535), "1 KB");
        assert_eq!(readable_size(2047), "1 KB");
        assert_eq!(readable_size(3 * MB - 1), "2 MB");
    }

    #[test]
    fn test_common_cluster_sizes() {
        assert_eq!(readable_size(4096), "4 KB");
        assert_eq!(readable_size(32768), "32 KB");
        assert_eq!(readable_size(2 * MB), "2 MB");
    }

    #[test]
    fn test_gigabyte_and_above_fall_back_to_bytes() {
        assert_eq!(readable_size(GB), "1073741824 B");
        assert_eq!(readable_size(4 * GB), "4294967296 B");
    }
}
