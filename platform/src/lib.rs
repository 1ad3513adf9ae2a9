#[cfg(any(target_os = "linux", target_os = "macos"))]
mod posix;

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
pub mod unsupported;

#[cfg(target_os = "linux")]
pub use linux::LinuxVolumeManager as PlatformVolumeManager;

#[cfg(target_os = "windows")]
pub use windows::WindowsVolumeManager as PlatformVolumeManager;

#[cfg(target_os = "macos")]
pub use macos::MacOSVolumeManager as PlatformVolumeManager;

#[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
pub use unsupported::UnsupportedVolumeManager as PlatformVolumeManager;
