//! `library` command: list the mp3 files already in the output folder.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::app::config_runtime::{CliValueSources, apply_config_defaults};
use crate::app_config::load_default_file_config;
use crate::cli::{DownloadArgs, LibraryArgs};
use crate::output::{terminal_width, truncate_to_width};

/// Lists `*.mp3` file names in `dir`, sorted case-insensitively.
///
/// `query`, when given, keeps names containing it (case-insensitive).
/// A missing folder is an empty library.
pub fn list_library(dir: &Path, query: Option<&str>) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let needle = query.map(str::to_lowercase);
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Failed to read library folder '{}'", dir.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_mp3 = Path::new(&name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("mp3"));
        if !is_mp3 {
            continue;
        }
        if let Some(needle) = needle.as_deref() {
            if !name.to_lowercase().contains(needle) {
                continue;
            }
        }
        names.push(name);
    }

    names.sort_by_key(|name| name.to_lowercase());
    Ok(names)
}

pub fn run_library_command(
    library_args: &LibraryArgs,
    download_args: &DownloadArgs,
    cli_sources: &CliValueSources,
) -> Result<()> {
    let dir = match &library_args.output_dir {
        Some(dir) => dir.clone(),
        None => {
            let loaded = load_default_file_config()?;
            apply_config_defaults(download_args.clone(), cli_sources, loaded.config.as_ref())?
                .output_dir
                .unwrap_or_else(|| PathBuf::from("."))
        }
    };

    let names = list_library(&dir, library_args.query.as_deref())?;
    if names.is_empty() {
        match &library_args.query {
            Some(query) => println!("No tracks matching '{query}' in {}", dir.display()),
            None => println!("No downloaded tracks in {}", dir.display()),
        }
        return Ok(());
    }

    let width = terminal_width();
    for name in &names {
        println!("{}", truncate_to_width(name, width));
    }
    println!("{} track(s) in {}", names.len(), dir.display());
    Ok(())
}
