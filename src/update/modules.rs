// file: src/update/modules.rs
// version: 1.0.0
// guid: 8a4d2f6b-1c93-4e70-b5a2-0f7e9d3c1b48

//! Optional server modules listed in `modules/init.txt`

use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// SQL files contributed by every enabled module, in listing order
///
/// A directory entry contributes all `.sql` files beneath it, sorted; a file
/// entry contributes itself when it is a `.sql` file.
pub fn module_sql_files(root: &Path) -> Result<Vec<PathBuf>> {
    let modules_dir = root.join("modules");
    let init = modules_dir.join("init.txt");
    if !init.is_file() {
        debug!("No module list at {}", init.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for line in fs::read_to_string(&init)?.lines() {
        let entry = line.trim();
        if entry.is_empty() || entry.starts_with('#') {
            continue;
        }

        let path = modules_dir.join(entry);
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(&path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.into_path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "sql"))
                .collect();
            found.sort();
            files.extend(found);
        } else if entry.ends_with(".sql") {
            files.push(path);
        }
    }

    Ok(files)
}
