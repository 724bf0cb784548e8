use crate::error::{MediaBatchError, Result};
use crate::scanner::Candidate;
use id3::{Tag, TagLike, Version};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

/// The fixed set of recognized tag fields. Anything else in a tag container
/// is treated as removable baggage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TagField {
    Title,
    Artist,
    Album,
    Year,
    Track,
    Genre,
}

impl TagField {
    pub const ALL: [TagField; 6] = [
        TagField::Title,
        TagField::Artist,
        TagField::Album,
        TagField::Year,
        TagField::Track,
        TagField::Genre,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "title" => Some(TagField::Title),
            "artist" => Some(TagField::Artist),
            "album" => Some(TagField::Album),
            "year" => Some(TagField::Year),
            "track" => Some(TagField::Track),
            "genre" => Some(TagField::Genre),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TagField::Title => "title",
            TagField::Artist => "artist",
            TagField::Album => "album",
            TagField::Year => "year",
            TagField::Track => "track",
            TagField::Genre => "genre",
        }
    }

    fn present_in(&self, tag: &Tag) -> bool {
        match self {
            TagField::Title => tag.title().is_some(),
            TagField::Artist => tag.artist().is_some(),
            TagField::Album => tag.album().is_some(),
            TagField::Year => tag.year().is_some(),
            TagField::Track => tag.track().is_some(),
            TagField::Genre => tag.genre().is_some(),
        }
    }

    fn copy_into(&self, from: &Tag, to: &mut Tag) {
        match self {
            TagField::Title => {
                if let Some(title) = from.title() {
                    to.set_title(title);
                }
            }
            TagField::Artist => {
                if let Some(artist) = from.artist() {
                    to.set_artist(artist);
                }
            }
            TagField::Album => {
                if let Some(album) = from.album() {
                    to.set_album(album);
                }
            }
            TagField::Year => {
                if let Some(year) = from.year() {
                    to.set_year(year);
                }
            }
            TagField::Track => {
                if let Some(track) = from.track() {
                    to.set_track(track);
                }
            }
            TagField::Genre => {
                if let Some(genre) = from.genre() {
                    to.set_genre(genre);
                }
            }
        }
    }
}

/// Which recognized fields survive a strip run.
///
/// `remove_all` wins over any keep list. Unrecognized names in the keep list
/// are ignored. With neither given, nothing is retained.
#[derive(Debug, Clone, Default)]
pub struct FieldSelection {
    retain: BTreeSet<TagField>,
}

impl FieldSelection {
    pub fn new(remove_all: bool, keep_fields: Option<&str>) -> Self {
        if remove_all {
            return Self::default();
        }

        let retain = keep_fields
            .map(|list| list.split(',').filter_map(TagField::parse).collect())
            .unwrap_or_default();

        Self { retain }
    }

    pub fn retains(&self, field: TagField) -> bool {
        self.retain.contains(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.retain.is_empty()
    }
}

/// Rewrites one audio candidate's tag container, keeping only the selected
/// fields. Without an output root the file is rewritten in place; with one,
/// the source tree stays untouched and the result lands at the mirrored
/// relative path.
pub struct MetadataStripper {
    output_root: Option<PathBuf>,
    selection: FieldSelection,
    skip_clean: bool,
    dry_run: bool,
}

impl MetadataStripper {
    pub fn new(
        output_root: Option<PathBuf>,
        selection: FieldSelection,
        skip_clean: bool,
        dry_run: bool,
    ) -> Self {
        Self {
            output_root,
            selection,
            skip_clean,
            dry_run,
        }
    }

    pub fn skip_reason(&self, candidate: &Candidate) -> Option<String> {
        if self.skip_clean && candidate.has_tags == Some(false) {
            return Some("no existing tags".to_string());
        }
        None
    }

    fn output_path_for(&self, candidate: &Candidate) -> PathBuf {
        match &self.output_root {
            Some(root) => root.join(&candidate.relative_path),
            None => candidate.path.clone(),
        }
    }

    pub fn strip(&self, candidate: &Candidate) -> Result<String> {
        let (tag, present) = self.read_tag(candidate)?;

        let (kept, removed): (Vec<TagField>, Vec<TagField>) = present
            .iter()
            .copied()
            .partition(|field| self.selection.retains(*field));

        if self.dry_run {
            return Ok(format!(
                "dry run: would remove {}; keep {}",
                field_list(&removed),
                field_list(&kept)
            ));
        }

        let target = self.output_path_for(candidate);

        if target != candidate.path {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(&candidate.path, &target)?;

            if let Ok(metadata) = fs::metadata(&candidate.path) {
                if let Ok(modified) = metadata.modified() {
                    let _ = filetime::set_file_mtime(
                        &target,
                        filetime::FileTime::from_system_time(modified),
                    );
                }
            }
        }

        // Rebuild the container only when something is actually removed; a
        // clean file (or one with no tag at all) keeps its exact bytes.
        if let Some(tag) = tag {
            if !removed.is_empty() {
                let mut new_tag = Tag::new();
                for field in &kept {
                    field.copy_into(&tag, &mut new_tag);
                }
                new_tag
                    .write_to_path(&target, Version::Id3v24)
                    .map_err(|e| MediaBatchError::Tag {
                        path: candidate.display_path(),
                        message: e.to_string(),
                    })?;
            }
        }

        Ok(format!(
            "removed {} fields, kept {}",
            removed.len(),
            kept.len()
        ))
    }

    fn read_tag(&self, candidate: &Candidate) -> Result<(Option<Tag>, Vec<TagField>)> {
        match Tag::read_from_path(&candidate.path) {
            Ok(tag) => {
                let present = TagField::ALL
                    .iter()
                    .copied()
                    .filter(|field| field.present_in(&tag))
                    .collect();
                Ok((Some(tag), present))
            }
            Err(err) if matches!(err.kind, id3::ErrorKind::NoTag) => Ok((None, Vec::new())),
            Err(err) => Err(MediaBatchError::Tag {
                path: candidate.display_path(),
                message: err.to_string(),
            }),
        }
    }
}

fn field_list(fields: &[TagField]) -> String {
    if fields.is_empty() {
        return "nothing".to_string();
    }
    fields
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_tagged_mp3(path: &Path) {
        fs::write(path, vec![0u8; 256]).unwrap();
        let mut tag = Tag::new();
        tag.set_title("Some Title");
        tag.set_artist("Some Artist");
        tag.set_album("Some Album");
        tag.write_to_path(path, Version::Id3v24).unwrap();
    }

    fn candidate_for(root: &Path, path: &Path) -> Candidate {
        Candidate {
            path: path.to_path_buf(),
            relative_path: path.strip_prefix(root).unwrap().to_path_buf(),
            size: fs::metadata(path).map(|m| m.len()).unwrap_or(0),
            has_tags: Some(Tag::read_from_path(path).is_ok()),
        }
    }

    #[test]
    fn test_field_selection_rules() {
        // remove_all wins over any keep list
        let selection = FieldSelection::new(true, Some("title,artist"));
        assert!(selection.is_empty());

        // intersection with the recognized set; unknown names ignored
        let selection = FieldSelection::new(false, Some("title, bogus, ARTIST"));
        assert!(selection.retains(TagField::Title));
        assert!(selection.retains(TagField::Artist));
        assert!(!selection.retains(TagField::Album));

        // neither given: nothing retained
        let selection = FieldSelection::new(false, None);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_keep_title_strips_the_rest() {
        let dir = TempDir::new().unwrap();
        let track = dir.path().join("track.mp3");
        write_tagged_mp3(&track);

        let stripper = MetadataStripper::new(
            None,
            FieldSelection::new(false, Some("title")),
            false,
            false,
        );
        let candidate = candidate_for(dir.path(), &track);
        let detail = stripper.strip(&candidate).unwrap();

        assert_eq!(detail, "removed 2 fields, kept 1");
        let tag = Tag::read_from_path(&track).unwrap();
        assert_eq!(tag.title(), Some("Some Title"));
        assert_eq!(tag.artist(), None);
        assert_eq!(tag.album(), None);
    }

    #[test]
    fn test_remove_all_overrides_keep_list() {
        let dir = TempDir::new().unwrap();
        let track = dir.path().join("track.mp3");
        write_tagged_mp3(&track);

        let stripper = MetadataStripper::new(
            None,
            FieldSelection::new(true, Some("title,artist,album")),
            false,
            false,
        );
        let candidate = candidate_for(dir.path(), &track);
        stripper.strip(&candidate).unwrap();

        let tag = Tag::read_from_path(&track).unwrap();
        for field in TagField::ALL {
            assert!(!field.present_in(&tag), "{} survived", field.name());
        }
    }

    #[test]
    fn test_dry_run_leaves_bytes_untouched() {
        let dir = TempDir::new().unwrap();
        let track = dir.path().join("track.mp3");
        write_tagged_mp3(&track);
        let before = fs::read(&track).unwrap();

        let stripper =
            MetadataStripper::new(None, FieldSelection::new(true, None), false, true);
        let candidate = candidate_for(dir.path(), &track);
        let detail = stripper.strip(&candidate).unwrap();

        assert_eq!(
            detail,
            "dry run: would remove title, artist, album; keep nothing"
        );
        assert_eq!(fs::read(&track).unwrap(), before);
    }

    #[test]
    fn test_output_root_mirrors_structure_and_preserves_source() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();

        let nested = source.path().join("albums");
        fs::create_dir(&nested).unwrap();
        let track = nested.join("track.mp3");
        write_tagged_mp3(&track);
        let source_bytes = fs::read(&track).unwrap();

        let stripper = MetadataStripper::new(
            Some(output.path().to_path_buf()),
            FieldSelection::new(true, None),
            false,
            false,
        );
        let candidate = candidate_for(source.path(), &track);
        stripper.strip(&candidate).unwrap();

        // Source untouched, mirrored copy stripped
        assert_eq!(fs::read(&track).unwrap(), source_bytes);
        let mirrored = output.path().join("albums").join("track.mp3");
        let tag = Tag::read_from_path(&mirrored).unwrap();
        assert_eq!(tag.title(), None);
    }

    #[test]
    fn test_untagged_file_stays_byte_identical() {
        let dir = TempDir::new().unwrap();
        let track = dir.path().join("plain.mp3");
        fs::write(&track, vec![0u8; 256]).unwrap();
        let before = fs::read(&track).unwrap();

        let stripper =
            MetadataStripper::new(None, FieldSelection::new(true, None), false, false);
        let candidate = candidate_for(dir.path(), &track);
        let detail = stripper.strip(&candidate).unwrap();

        assert_eq!(detail, "removed 0 fields, kept 0");
        assert_eq!(fs::read(&track).unwrap(), before);
    }

    #[test]
    fn test_skip_clean_policy() {
        let dir = TempDir::new().unwrap();
        let track = dir.path().join("plain.mp3");
        fs::write(&track, vec![0u8; 64]).unwrap();

        let mut candidate = candidate_for(dir.path(), &track);
        candidate.has_tags = Some(false);

        let skipping =
            MetadataStripper::new(None, FieldSelection::default(), true, false);
        assert_eq!(
            skipping.skip_reason(&candidate).as_deref(),
            Some("no existing tags")
        );

        let not_skipping =
            MetadataStripper::new(None, FieldSelection::default(), false, false);
        assert!(not_skipping.skip_reason(&candidate).is_none());

        candidate.has_tags = Some(true);
        assert!(skipping.skip_reason(&candidate).is_none());
    }
}
