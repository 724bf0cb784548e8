use crate::config::ScanConfig;
use crate::error::{MediaBatchError, Result};
use crate::scanner::file_filter::FileFilter;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// The two file classes the batch operations work on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Archive,
    Audio,
}

impl FileKind {
    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Archive => "zip",
            FileKind::Audio => "mp3",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileKind::Archive => "archive",
            FileKind::Audio => "audio",
        }
    }
}

/// A file discovered by classification, eligible for transformation.
/// Immutable once produced; `has_tags` is populated for audio candidates only.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub path: PathBuf,
    pub relative_path: PathBuf,
    pub size: u64,
    pub has_tags: Option<bool>,
}

impl Candidate {
    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    pub fn format_size(&self) -> String {
        format_bytes(self.size)
    }
}

pub struct FileScanner {
    filter: FileFilter,
    max_depth: usize,
    follow_links: bool,
}

impl FileScanner {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            filter: FileFilter::new(config),
            max_depth: config.max_depth,
            follow_links: config.follow_links,
        }
    }

    /// Enumerate candidates of `kind` under `root`, sorted by path relative
    /// to `root` so the scan order is stable across runs and filesystems.
    ///
    /// The walk is best-effort: unreadable directory entries are dropped and
    /// an unreadable candidate file is reported as a zero-size candidate.
    /// Transformation failures surface later, per file.
    pub fn scan<P: AsRef<Path>>(&self, root: P, kind: FileKind) -> Result<Vec<Candidate>> {
        let root_path = root.as_ref();

        if !root_path.exists() {
            return Err(MediaBatchError::InvalidPath {
                path: root_path.display().to_string(),
            });
        }

        if !root_path.is_dir() {
            return Err(MediaBatchError::InvalidPath {
                path: format!("{} is not a directory", root_path.display()),
            });
        }

        let mut candidates = Vec::new();

        let walker = WalkDir::new(root_path)
            .max_depth(self.max_depth)
            .follow_links(self.follow_links)
            .into_iter()
            .filter_entry(|e| self.should_traverse(e));

        for entry in walker.filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if !matches_kind(path, kind) || self.filter.is_excluded_file(path) {
                continue;
            }

            let relative_path = path
                .strip_prefix(root_path)
                .unwrap_or(path)
                .to_path_buf();

            candidates.push(self.classify(path, relative_path, kind));
        }

        candidates.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        Ok(candidates)
    }

    fn classify(&self, path: &Path, relative_path: PathBuf, kind: FileKind) -> Candidate {
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        let has_tags = match kind {
            FileKind::Archive => None,
            // Cheap probe: a readable tag container is enough, the contents
            // are not inspected here.
            FileKind::Audio => Some(size > 0 && id3::Tag::read_from_path(path).is_ok()),
        };

        Candidate {
            path: path.to_path_buf(),
            relative_path,
            size,
            has_tags,
        }
    }

    fn should_traverse(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        self.filter.should_traverse_directory(entry.path())
    }

    pub fn statistics(&self, candidates: &[Candidate]) -> ScanStatistics {
        let total_files = candidates.len();
        let total_size = candidates.iter().map(|c| c.size).sum();
        let tagged_files = candidates
            .iter()
            .filter(|c| c.has_tags == Some(true))
            .count();

        let (largest_file_size, largest_file_path) = candidates
            .iter()
            .max_by_key(|c| c.size)
            .map(|c| (c.size, c.relative_path.clone()))
            .unwrap_or((0, PathBuf::new()));

        ScanStatistics {
            total_files,
            total_size,
            tagged_files,
            largest_file_size,
            largest_file_path,
        }
    }
}

fn matches_kind(path: &Path, kind: FileKind) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(kind.extension()))
}

#[derive(Debug, Default)]
pub struct ScanStatistics {
    pub total_files: usize,
    pub total_size: u64,
    pub tagged_files: usize,
    pub largest_file_size: u64,
    pub largest_file_path: PathBuf,
}

impl ScanStatistics {
    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Scan results:\n  Total files: {}\n  Total size: {}\n",
            self.total_files,
            format_bytes(self.total_size)
        );

        if self.tagged_files > 0 {
            summary.push_str(&format!("  Files with tags: {}\n", self.tagged_files));
        }

        if self.largest_file_size > 0 {
            summary.push_str(&format!(
                "  Largest file: {} ({})\n",
                self.largest_file_path.display(),
                format_bytes(self.largest_file_size)
            ));
        }

        summary
    }
}

pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use id3::TagLike;
    use std::fs;
    use tempfile::TempDir;

    fn scanner() -> FileScanner {
        FileScanner::new(&ScanConfig::default())
    }

    #[test]
    fn test_scan_finds_archives_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("b.zip"), b"PK").unwrap();
        fs::write(root.join("a.zip"), b"PK").unwrap();
        fs::write(root.join("notes.txt"), b"not an archive").unwrap();
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("nested").join("c.zip"), b"PK").unwrap();

        let candidates = scanner().scan(root, FileKind::Archive).unwrap();

        let relative: Vec<_> = candidates
            .iter()
            .map(|c| c.relative_path.display().to_string())
            .collect();
        assert_eq!(relative, vec!["a.zip", "b.zip", "nested/c.zip"]);
        assert!(candidates.iter().all(|c| c.has_tags.is_none()));
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let result = scanner().scan("/nonexistent/music", FileKind::Audio);
        assert!(matches!(result, Err(MediaBatchError::InvalidPath { .. })));
    }

    #[test]
    fn test_scan_skips_excluded_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        let junk = root.join("__MACOSX");
        fs::create_dir(&junk).unwrap();
        fs::write(junk.join("hidden.zip"), b"PK").unwrap();
        fs::write(root.join("visible.zip"), b"PK").unwrap();

        let candidates = scanner().scan(root, FileKind::Archive).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].relative_path, PathBuf::from("visible.zip"));
    }

    #[test]
    fn test_audio_tag_probe() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        let untagged = root.join("plain.mp3");
        fs::write(&untagged, vec![0u8; 128]).unwrap();

        let tagged = root.join("tagged.mp3");
        fs::write(&tagged, vec![0u8; 128]).unwrap();
        let mut tag = id3::Tag::new();
        tag.set_title("Test Title");
        tag.write_to_path(&tagged, id3::Version::Id3v24).unwrap();

        let candidates = scanner().scan(root, FileKind::Audio).unwrap();
        assert_eq!(candidates.len(), 2);

        let by_name = |name: &str| {
            candidates
                .iter()
                .find(|c| c.relative_path == PathBuf::from(name))
                .unwrap()
        };
        assert_eq!(by_name("plain.mp3").has_tags, Some(false));
        assert_eq!(by_name("tagged.mp3").has_tags, Some(true));
    }

    #[test]
    fn test_empty_scan_is_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let candidates = scanner().scan(temp_dir.path(), FileKind::Archive).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(500), "500 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1048576), "1.0 MB");
    }
}
