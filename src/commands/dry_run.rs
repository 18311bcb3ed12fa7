//! Dry-run preview: show what a download run would do without running yt-dlp.

use std::path::Path;

use tunegrab_core::{DownloadItem, already_downloaded};

/// Prints one line per item, marking items whose file already exists.
///
/// Returns the number of items that would be downloaded.
pub fn run_dry_run_preview(items: &[DownloadItem], output_dir: &Path) -> usize {
    println!(
        "Dry run preview: {} track(s) into {}",
        items.len(),
        output_dir.display()
    );

    let mut would_download = 0usize;
    for item in items {
        if already_downloaded(output_dir, &item.target_filename) {
            println!("- [already downloaded] {}", item.target_filename);
        } else {
            would_download += 1;
            println!("- [queued] {} ({})", item.target_filename, item.source_id);
        }
    }

    println!(
        "Dry run summary: {} to download, {} already present.",
        would_download,
        items.len() - would_download
    );
    println!("Dry run - no files downloaded");
    would_download
}
