//! Artifact materializer - writes one parsed artifact to disk as a site
//!
//! Each iteration gets an isolated directory named from the iteration
//! number alone, so re-materializing the same iteration is
//! idempotent-by-replacement: the old directory is removed in full before
//! anything is written, never merged with the new content.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::artifact::Artifact;

/// File name of the single served document inside a site directory
pub const DOCUMENT_NAME: &str = "index.html";

/// A materialized, numbered site on disk
///
/// The directory persists after hosting ends so earlier iterations stay
/// inspectable; nothing here deletes prior iterations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    /// Iteration number this site belongs to
    pub iteration: u32,

    /// Isolated directory holding exactly one document
    pub dir: PathBuf,

    /// Path of the assembled page document
    pub document: PathBuf,
}

/// Errors from writing a site to disk
///
/// Fatal for the current iteration, recoverable at session level.
#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("filesystem error while writing site: {0}")]
    Io(#[from] std::io::Error),
}

/// Deterministic site directory for an iteration number
///
/// Derived from the number only, never from content, so repeated calls for
/// the same iteration resolve to the same path.
pub fn site_dir(root: &Path, iteration: u32) -> PathBuf {
    root.join(format!("site-{iteration:03}"))
}

/// Write an artifact to the iteration's site directory
///
/// Any pre-existing directory at the target path is deleted first; the
/// directory is fully rebuilt before the document is written.
pub fn materialize(artifact: &Artifact, iteration: u32, root: &Path) -> Result<Site, MaterializeError> {
    let dir = site_dir(root, iteration);
    debug!(iteration, dir = %dir.display(), "materialize: called");

    if dir.exists() {
        debug!(dir = %dir.display(), "materialize: replacing existing site directory");
        fs::remove_dir_all(&dir)?;
    }
    fs::create_dir_all(&dir)?;

    let document = dir.join(DOCUMENT_NAME);
    let page = match artifact {
        Artifact::Split {
            markup,
            style,
            behavior,
        } => assemble_document(markup, style, behavior),
        Artifact::Fused { document } => document.clone(),
    };
    fs::write(&document, &page)?;

    info!(iteration, document = %document.display(), bytes = page.len(), "site materialized");
    Ok(Site {
        iteration,
        dir,
        document,
    })
}

/// Fuse split sections into one standalone page
///
/// Behavior runs only after DOMContentLoaded and inside a try/catch, so a
/// broken generated script reports to the console instead of taking the
/// whole page down.
fn assemble_document(markup: &str, style: &str, behavior: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Generated Website</title>
    <style>
        * {{ margin: 0; padding: 0; box-sizing: border-box; }}
        body {{ font-family: Arial, sans-serif; color: #333; line-height: 1.6; }}
        {style}
    </style>
</head>
<body>
    {markup}
    <script>
        document.addEventListener('DOMContentLoaded', function () {{
            'use strict';
            try {{
                {behavior}
            }} catch (err) {{
                console.error('generated script failed:', err);
            }}
        }});
    </script>
</body>
</html>
"#
    )
}
