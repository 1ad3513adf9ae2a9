use clap::Parser;
use clustinfo_core::{select_volumes, ClusterReport, ClusterSizeResolver};
use clustinfo_platform::PlatformVolumeManager;
use std::io::{self, Write};

#[derive(Parser, Debug)]
#[command(name = "clustinfo")]
#[command(about = "Report the cluster (allocation unit) size of mounted volumes", long_about = None)]
struct Cli {
    /// Volume to inspect (e.g. C, C: or C:\ on Windows, a mount point elsewhere).
    /// All ready fixed, removable and optical volumes are reported when omitted.
    volume: Option<String>,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .target(env_logger::Target::Stderr)
        .init();

    let manager = PlatformVolumeManager;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out)?;
    writeln!(out, "Reading Cluster Size Info...")?;

    let targets = select_volumes(&manager, cli.volume.as_deref())?;
    if targets.is_empty() {
        log::warn!("No ready fixed, removable or optical volumes found");
    }

    let report = ClusterReport::new(ClusterSizeResolver::new(&manager, &manager));
    let summary = report.run(&targets, &mut out)?;
    out.flush()?;

    log::info!("Reported {} volumes, {} failed", summary.reported, summary.failed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_reports_everything() {
        let cli = Cli::try_parse_from(["clustinfo"]).unwrap();
        assert_eq!(cli.volume, None);
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn test_single_volume_argument() {
        let cli = Cli::try_parse_from(["clustinfo", "D:\\"]).unwrap();
        assert_eq!(cli.volume.as_deref(), Some("D:\\"));
    }

    #[test]
    fn test_extra_arguments_are_rejected() {
        let err = Cli::try_parse_from(["clustinfo", "C", "D"]).unwrap_err();
        assert!(err.use_stderr());
    }

    #[test]
    fn test_verbosity_levels() {
        let cli = Cli::try_parse_from(["clustinfo", "-vv", "C"]).unwrap();
        assert_eq!(cli.log_level(), "debug");
        let cli = Cli::try_parse_from(["clustinfo", "-vvvv"]).unwrap();
        assert_eq!(cli.log_level(), "trace");
    }
}
