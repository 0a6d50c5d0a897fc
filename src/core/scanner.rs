use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub path: PathBuf,
    pub language: String,
    pub extension: String,
}

pub struct FileScanner {
    extensions: HashMap<String, String>,
    exclude_dirs: Vec<String>,
    follow_links: bool,
}

impl FileScanner {
    pub fn new<S: AsRef<str>>(extensions: &[S]) -> Self {
        let extensions = extensions
            .iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .filter_map(|ext| language_for_extension(&ext).map(|lang| (ext, lang.to_string())))
            .collect();

        Self {
            extensions,
            exclude_dirs: Vec::new(),
            follow_links: false,
        }
    }

    pub fn with_exclude_dirs<S: AsRef<str>>(mut self, dirs: &[S]) -> Self {
        self.exclude_dirs = dirs.iter().map(|d| d.as_ref().to_string()).collect();
        self
    }

    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Every file under `root_path` with a configured extension, sorted by path
    pub fn scan_directory(&self, root_path: &Path) -> Result<Vec<FileInfo>> {
        if !root_path.is_dir() {
            anyhow::bail!("{} is not a directory", root_path.display());
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(root_path)
            .follow_links(self.follow_links)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_excluded(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("skipping unreadable entry: {err}");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(info) = self.file_info(entry.path()) {
                files.push(info);
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    /// Classify a single path, `None` when its extension is not configured
    pub fn file_info(&self, path: &Path) -> Option<FileInfo> {
        let extension = path.extension()?.to_str()?;
        self.extensions.get(extension).map(|language| FileInfo {
            path: path.to_path_buf(),
            language: language.clone(),
            extension: extension.to_string(),
        })
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .map(|name| self.exclude_dirs.iter().any(|dir| dir == name))
                .unwrap_or(false)
    }
}

fn language_for_extension(extension: &str) -> Option<&'static str> {
    match extension {
        "py" | "pyi" | "pyw" => Some("python"),
        _ => None,
    }
}
