//! Discovery of the external executables tunegrab drives.
//!
//! `yt-dlp` performs the actual media download and `ffmpeg` is its audio
//! codec dependency. Both are located once at startup.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Program name of the extraction tool.
pub const YT_DLP: &str = "yt-dlp";

/// Program name of the audio codec dependency.
pub const FFMPEG: &str = "ffmpeg";

/// Errors raised while locating external tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// An explicitly configured path does not exist.
    #[error("{tool} not found at configured path {path}\n  Suggestion: Fix the path or remove the override to search PATH")]
    ConfiguredPathMissing {
        /// Tool name.
        tool: String,
        /// The configured path.
        path: PathBuf,
    },

    /// The tool is not on `PATH`.
    #[error("{tool} not found on PATH\n  Suggestion: Install {tool} and make sure it is on your PATH")]
    NotOnPath {
        /// Tool name.
        tool: String,
    },
}

/// Locates `tool`, preferring an explicit override over a `PATH` search.
///
/// # Errors
///
/// Returns [`ToolError::ConfiguredPathMissing`] when the override does not
/// exist, or [`ToolError::NotOnPath`] when the search fails.
pub fn locate_tool(tool: &str, configured: Option<&Path>) -> Result<PathBuf, ToolError> {
    if let Some(path) = configured {
        if path.exists() {
            debug!(tool, path = %path.display(), "Using configured tool path");
            return Ok(path.to_path_buf());
        }
        return Err(ToolError::ConfiguredPathMissing {
            tool: tool.to_string(),
            path: path.to_path_buf(),
        });
    }

    which::which(tool)
        .inspect(|path| debug!(tool, path = %path.display(), "Found tool on PATH"))
        .map_err(|_| ToolError::NotOnPath {
            tool: tool.to_string(),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_tool_configured_path_existing() {
        let temp = tempfile::TempDir::new().unwrap();
        let fake = temp.path().join("yt-dlp");
        std::fs::write(&fake, b"").unwrap();
        assert_eq!(locate_tool(YT_DLP, Some(&fake)).unwrap(), fake);
    }

    #[test]
    fn test_locate_tool_configured_path_missing() {
        let err = locate_tool(FFMPEG, Some(Path::new("/definitely/not/here/ffmpeg"))).unwrap_err();
        assert!(matches!(err, ToolError::ConfiguredPathMissing { .. }));
        assert!(err.to_string().contains("ffmpeg"));
    }

    #[test]
    fn test_locate_tool_unknown_program_not_on_path() {
        let err = locate_tool("tunegrab-no-such-tool-xyz", None).unwrap_err();
        assert!(matches!(err, ToolError::NotOnPath { .. }));
    }
}
