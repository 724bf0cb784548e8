use crate::error::{MediaBatchError, Result};
use crate::scanner::Candidate;
use std::fs;
use std::io;
use std::path::PathBuf;
use zip::ZipArchive;

/// Extracts one archive candidate into `<output root>/<archive stem>/`.
///
/// Entries are staged into a temporary directory inside the output root and
/// renamed into place only after every entry landed, so a rejected or corrupt
/// archive leaves no partial extraction on disk.
pub struct ArchiveExtractor {
    output_root: PathBuf,
    skip_existing: bool,
}

impl ArchiveExtractor {
    pub fn new(output_root: PathBuf, skip_existing: bool) -> Self {
        Self {
            output_root,
            skip_existing,
        }
    }

    /// Destination directory, derived from the archive's base name.
    pub fn destination_for(&self, candidate: &Candidate) -> PathBuf {
        let stem = candidate
            .path
            .file_stem()
            .map(|s| s.to_os_string())
            .unwrap_or_else(|| "archive".into());
        self.output_root.join(stem)
    }

    pub fn skip_reason(&self, candidate: &Candidate) -> Option<String> {
        if self.skip_existing && self.destination_for(candidate).exists() {
            return Some("destination exists".to_string());
        }
        None
    }

    pub fn extract(&self, candidate: &Candidate) -> Result<String> {
        let destination = self.destination_for(candidate);

        let file = fs::File::open(&candidate.path)?;
        let mut archive = ZipArchive::new(file).map_err(|e| MediaBatchError::Archive {
            path: candidate.display_path(),
            message: e.to_string(),
        })?;

        let staging = tempfile::Builder::new()
            .prefix(".mediabatch-")
            .tempdir_in(&self.output_root)?;

        let entry_count = archive.len();
        for i in 0..entry_count {
            let mut entry = archive.by_index(i).map_err(|e| MediaBatchError::Archive {
                path: candidate.display_path(),
                message: e.to_string(),
            })?;

            // Zip-slip guard: reject any entry whose normalized path would
            // resolve outside the destination directory. The whole archive
            // fails, not just the entry.
            let relative = match entry.enclosed_name() {
                Some(name) => name.to_path_buf(),
                None => {
                    return Err(MediaBatchError::UnsafeEntryPath {
                        entry: entry.name().to_string(),
                    });
                }
            };

            let target = staging.path().join(relative);

            if entry.is_dir() {
                fs::create_dir_all(&target)?;
                continue;
            }

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }

            let mut output = fs::File::create(&target)?;
            io::copy(&mut entry, &mut output)?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = entry.unix_mode() {
                    fs::set_permissions(&target, fs::Permissions::from_mode(mode))?;
                }
            }
        }

        // Replace any previous extraction wholesale.
        if destination.exists() {
            fs::remove_dir_all(&destination)?;
        }
        fs::rename(staging.into_path(), &destination)?;

        Ok(format!("{} entries", entry_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;
    use tempfile::TempDir;
    use zip::write::FileOptions;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let file = fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (name, content) in entries {
            writer
                .start_file(*name, FileOptions::default())
                .unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap();
    }

    fn candidate_for(path: &Path) -> Candidate {
        Candidate {
            path: path.to_path_buf(),
            relative_path: PathBuf::from(path.file_name().unwrap()),
            size: fs::metadata(path).map(|m| m.len()).unwrap_or(0),
            has_tags: None,
        }
    }

    #[test]
    fn test_extract_preserves_entry_structure() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();

        let archive_path = source.path().join("album.zip");
        write_zip(
            &archive_path,
            &[
                ("track01.mp3", b"audio one".as_slice()),
                ("covers/front.jpg", b"jpeg".as_slice()),
            ],
        );

        let extractor = ArchiveExtractor::new(output.path().to_path_buf(), false);
        let detail = extractor.extract(&candidate_for(&archive_path)).unwrap();

        assert_eq!(detail, "2 entries");
        let dest = output.path().join("album");
        assert_eq!(fs::read(dest.join("track01.mp3")).unwrap(), b"audio one");
        assert!(dest.join("covers").join("front.jpg").exists());
        // No staging leftovers
        let stray: Vec<_> = fs::read_dir(output.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".mediabatch-"))
            .collect();
        assert!(stray.is_empty());
    }

    #[test]
    fn test_zip_slip_rejected_without_side_effects() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();

        let archive_path = source.path().join("evil.zip");
        write_zip(
            &archive_path,
            &[
                ("ok.txt", b"fine".as_slice()),
                ("../escape.txt", b"outside".as_slice()),
            ],
        );

        let extractor = ArchiveExtractor::new(output.path().to_path_buf(), false);
        let result = extractor.extract(&candidate_for(&archive_path));

        assert!(matches!(
            result,
            Err(MediaBatchError::UnsafeEntryPath { .. })
        ));
        // The destination was never created and nothing escaped the root.
        assert!(!output.path().join("evil").exists());
        assert!(!output.path().parent().unwrap().join("escape.txt").exists());
        assert!(fs::read_dir(output.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_skip_existing_destination() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();

        let archive_path = source.path().join("album.zip");
        write_zip(&archive_path, &[("track.mp3", b"audio".as_slice())]);

        fs::create_dir(output.path().join("album")).unwrap();

        let extractor = ArchiveExtractor::new(output.path().to_path_buf(), true);
        let reason = extractor.skip_reason(&candidate_for(&archive_path));
        assert_eq!(reason.as_deref(), Some("destination exists"));

        let extractor = ArchiveExtractor::new(output.path().to_path_buf(), false);
        assert!(extractor.skip_reason(&candidate_for(&archive_path)).is_none());
    }

    #[test]
    fn test_existing_destination_is_replaced() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();

        let archive_path = source.path().join("album.zip");
        write_zip(&archive_path, &[("new.txt", b"new".as_slice())]);

        let dest = output.path().join("album");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("stale.txt"), b"old").unwrap();

        let extractor = ArchiveExtractor::new(output.path().to_path_buf(), false);
        extractor.extract(&candidate_for(&archive_path)).unwrap();

        assert!(dest.join("new.txt").exists());
        assert!(!dest.join("stale.txt").exists());
    }

    #[test]
    fn test_corrupt_archive_fails_cleanly() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();

        let archive_path = source.path().join("broken.zip");
        fs::write(&archive_path, b"this is not a zip file").unwrap();

        let extractor = ArchiveExtractor::new(output.path().to_path_buf(), false);
        let result = extractor.extract(&candidate_for(&archive_path));

        assert!(matches!(result, Err(MediaBatchError::Archive { .. })));
        assert!(!output.path().join("broken").exists());
    }
}
