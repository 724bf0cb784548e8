use crate::config::ScanConfig;
use regex::Regex;
use std::path::Path;

pub struct FileFilter {
    exclude_dirs: Vec<String>,
    exclude_patterns: Vec<Regex>,
}

impl FileFilter {
    pub fn new(config: &ScanConfig) -> Self {
        let exclude_patterns = config
            .exclude_patterns
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect();

        Self {
            exclude_dirs: config.exclude_dirs.clone(),
            exclude_patterns,
        }
    }

    /// Directories whose name is on the exclude list are not descended into.
    pub fn should_traverse_directory(&self, path: &Path) -> bool {
        if let Some(dir_name) = path.file_name().and_then(|s| s.to_str()) {
            if self.exclude_dirs.iter().any(|excluded| excluded == dir_name) {
                return false;
            }
        }
        true
    }

    pub fn is_excluded_file(&self, path: &Path) -> bool {
        let filename = match path.file_name().and_then(|s| s.to_str()) {
            Some(name) => name,
            None => return true,
        };

        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.is_match(filename))
    }
}
