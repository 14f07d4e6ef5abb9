//! Progress spinner for extraction runs.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressState;
use indicatif::ProgressStyle;
use scopex_core::ProgressCallback;
use std::fmt::Write;
use std::path::Path;
use std::time::Duration;

/// CLI progress spinner implementing `ProgressCallback`.
///
/// The number of admitted entries is not known up front, so the spinner
/// shows a running entry count, bytes written and expanded archives.
/// Automatically cleans up on drop.
pub struct CliProgress {
    bar: ProgressBar,
    bytes_written: u64,
    archives_expanded: usize,
}

impl CliProgress {
    /// Creates a new CLI progress spinner.
    ///
    /// # Arguments
    ///
    /// * `message` - Message to display (e.g., "Extracting")
    #[must_use]
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();

        // Template: "⠋ Extracting 42 entries (15.2 MB) 20241010/alice@org.co.uk/a.zip"
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {prefix} {pos} entries ({bytes}) {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .with_key("bytes", |state: &ProgressState, w: &mut dyn Write| {
                    write!(w, "{}", humanize_bytes(state.len().unwrap_or(0))).unwrap_or(());
                }),
        );
        bar.set_prefix(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));

        Self {
            bar,
            bytes_written: 0,
            archives_expanded: 0,
        }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stdout().is_term()
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for CliProgress {
    fn on_entry_start(&mut self, path: &Path) {
        self.bar.set_message(path.display().to_string());
    }

    fn on_bytes_written(&mut self, bytes: u64) {
        self.bytes_written = self.bytes_written.saturating_add(bytes);
        // The length slot carries the byte total for the `bytes` key.
        self.bar.set_length(self.bytes_written);
    }

    fn on_archive_expanded(&mut self, archive: &Path, files: usize) {
        self.archives_expanded += 1;
        self.bar.set_message(format!(
            "{} ({files} files, {} archives so far)",
            archive.display(),
            self.archives_expanded
        ));
    }

    fn on_entry_complete(&mut self, _path: &Path) {
        self.bar.inc(1);
    }

    fn on_complete(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// Converts bytes to human-readable format (KB, MB, GB, TB).
#[allow(clippy::cast_precision_loss)]
fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize_bytes() {
        assert_eq!(humanize_bytes(0), "0 B");
        assert_eq!(humanize_bytes(512), "512 B");
        assert_eq!(humanize_bytes(1024), "1.0 KB");
        assert_eq!(humanize_bytes(1536), "1.5 KB");
        assert_eq!(humanize_bytes(1024 * 1024), "1.0 MB");
        assert_eq!(humanize_bytes(1024 * 1024 * 1024), "1.0 GB");
        assert_eq!(humanize_bytes(1024_u64.pow(4)), "1.0 TB");
    }

    #[test]
    fn test_progress_callback() {
        let mut progress = CliProgress::new("Testing");

        progress.on_entry_start(Path::new("20241010/alice@org.co.uk/a.zip"));
        progress.on_bytes_written(1024);
        progress.on_archive_expanded(Path::new("20241010/alice@org.co.uk/a.zip"), 3);
        progress.on_entry_complete(Path::new("20241010/alice@org.co.uk/a.zip"));

        assert_eq!(progress.bytes_written, 1024);
        assert_eq!(progress.archives_expanded, 1);
        assert_eq!(progress.bar.position(), 1);
    }
}
