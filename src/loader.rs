//! Discovery and decoding of template files below a root directory

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::LoaderConfig;
use crate::error::{ResolveError, Result};
use crate::record::TemplateRecord;

/// Decode every template file below the configured root
///
/// Returns `(locator, record)` pairs in sorted path order, where the
/// locator is the path relative to the root. A missing root yields no
/// records.
pub fn load_records(config: &LoaderConfig) -> Result<Vec<(String, TemplateRecord)>> {
    let root = &config.root;
    if !root.exists() {
        warn!("Template directory does not exist: {:?}", root);
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    collect_files(root, config, &mut files)?;
    files.sort();

    let mut records = Vec::with_capacity(files.len());
    for path in files {
        let locator = locator_for(root, &path);
        let source = std::fs::read_to_string(&path).map_err(|source| ResolveError::Io {
            path: path.clone(),
            source,
        })?;
        let record = TemplateRecord::from_yaml_str(&source).map_err(|e| e.at(&locator))?;
        debug!("Decoded template file {}", locator);
        records.push((locator, record));
    }

    info!("Decoded {} template files from {:?}", records.len(), root);
    Ok(records)
}

fn collect_files(dir: &Path, config: &LoaderConfig, files: &mut Vec<PathBuf>) -> Result<()> {
    let io_err = |source: std::io::Error| ResolveError::Io {
        path: dir.to_path_buf(),
        source,
    };

    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_dir() {
            if config.recursive {
                collect_files(&path, config, files)?;
            }
        } else if config.matches(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// Path relative to the root, with `/` separators
fn locator_for(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
