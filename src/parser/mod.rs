//! Parser module: source discovery, dispatch by file extension, tree building.

pub mod builder;
pub mod comment;
pub mod csharp;

use crate::diagnostics::Diagnostics;
use crate::model::DocumentationProject;
use anyhow::{anyhow, Context, Result};
use builder::Builder;
use csharp::Declaration;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File extensions recognized as source files.
const SUPPORTED_EXTENSIONS: &[&str] = &["cs"];

/// Scan a source file into declarations based on its extension.
pub fn parse_file(path: &Path, content: &str) -> Result<Vec<Declaration>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("cs") => Ok(csharp::scan(content)?),
        _ => Err(anyhow!("unsupported file type: {}", path.display())),
    }
}

/// All supported source files below `folder`, sorted for deterministic output.
pub fn collect_sources(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for ext in SUPPORTED_EXTENSIONS {
        let pattern = format!(
            "{}/**/*.{}",
            glob::Pattern::escape(&folder.to_string_lossy()),
            ext
        );
        let matches = glob::glob(&pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file());
        files.extend(matches);
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Name used for a folder's output subdirectory.
pub fn package_name(folder: &Path) -> String {
    folder
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| folder.to_string_lossy().to_string())
}

/// Parse every source file in `folder` into `project`.
///
/// Files that cannot be read or scanned are reported and skipped.
pub fn parse_folder(project: &mut DocumentationProject, folder: &Path, diags: &mut Diagnostics) -> Result<usize> {
    let files = collect_sources(folder)?;
    if files.is_empty() {
        diags.warn(format!("no source files found in {}", folder.display()));
    }

    let mut builder = Builder::new(project, package_name(folder));
    let mut created = 0;
    for path in &files {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                diags.error(format!("skipping {}: {}", path.display(), e));
                continue;
            }
        };
        match parse_file(path, &content) {
            Ok(decls) => {
                debug!("{}: {} declarations", path.display(), decls.len());
                created += builder.add_file(path, &decls, diags);
            }
            Err(e) => diags.error(format!("skipping {}: {}", path.display(), e)),
        }
    }

    info!(
        "{}: {} files, {} documented items",
        folder.display(),
        files.len(),
        created
    );
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn unsupported_extension() {
        assert!(parse_file(Path::new("notes.txt"), "").is_err());
    }

    #[test]
    fn package_name_is_folder_name() {
        assert_eq!(package_name(Path::new("/work/Assets/Scripts")), "Scripts");
    }

    #[test]
    fn broken_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(
            dir.path().join("sub/Good.cs"),
            "/// <summary>ok</summary>\npublic class Good { }",
        )
        .unwrap();
        fs::write(dir.path().join("Broken.cs"), "public class Broken { }\n}").unwrap();
        fs::write(dir.path().join("readme.md"), "# not code").unwrap();

        let mut project = DocumentationProject::new();
        let mut diags = Diagnostics::new();
        let created = parse_folder(&mut project, dir.path(), &mut diags).unwrap();

        assert_eq!(created, 1);
        assert!(diags.mentions("Broken.cs"));
        assert_eq!(project.namespaces().len(), 1);
    }
}
