use annotator::prelude::Document;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Read and import a document JSON file.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Document::from_json(&text).with_context(|| format!("importing {}", path.display()))
}

/// Write `doc` as pretty JSON to `out`, or back to `input` when `out` is `None`.
pub fn save_document(doc: &Document, input: &Path, out: Option<&Path>) -> Result<PathBuf> {
    let target = out.unwrap_or(input).to_path_buf();
    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let json = doc.to_json_pretty().context("serializing document")?;
    fs::write(&target, json).with_context(|| format!("writing {}", target.display()))?;
    Ok(target)
}
