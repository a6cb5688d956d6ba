//! Directory listing with lazily backfilled metadata

use crate::{classify_name, DirectoryPath, FileClass, FilterSpec, FsError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use std::fmt::Write;
use std::fs;
use std::path::PathBuf;

/// Entries stat'ed per backfill call when the caller has no preference
pub const DEFAULT_BATCH: usize = 50;

const SIZE_UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

/// One child of the listed directory
#[derive(Debug, Clone)]
pub struct Entry {
    pub is_dir: bool,
    pub name: String,
    /// Unset until backfilled; always unset for directories
    pub size_bytes: Option<u64>,
    /// Unset until backfilled; always unset for directories
    pub modified: Option<DateTime<Local>>,
    pub class: FileClass,
}

impl Entry {
    fn new(name: String, is_dir: bool) -> Self {
        Self {
            class: classify_name(&name, is_dir),
            is_dir,
            name,
            size_bytes: None,
            modified: None,
        }
    }

    /// Has metadata been backfilled?
    pub fn has_metadata(&self) -> bool {
        self.size_bytes.is_some()
    }

    /// Human-readable size; blank for directories and unfilled entries
    pub fn size_text(&self) -> String {
        match (self.is_dir, self.size_bytes) {
            (false, Some(bytes)) => format_size(bytes),
            _ => String::new(),
        }
    }

    /// Modification time in `format` (chrono strftime); blank when unset
    /// or when `format` cannot be rendered
    pub fn modified_text(&self, format: &str) -> String {
        let Some(time) = self.modified else {
            return String::new();
        };

        let mut text = String::new();
        if write!(text, "{}", time.format(format)).is_err() {
            return String::new();
        }
        text
    }
}

/// Can chrono render every specifier in `format`?
pub fn is_valid_time_format(format: &str) -> bool {
    StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

/// Directories first, then files, each group in OS enumeration order.
///
/// Replaced wholesale on every navigation or filter change. The only
/// in-place mutation is [`Listing::backfill`].
#[derive(Debug, Clone)]
pub struct Listing {
    dir: PathBuf,
    entries: Vec<Entry>,
    dir_count: usize,
}

impl Listing {
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn directories(&self) -> &[Entry] {
        &self.entries[..self.dir_count]
    }

    pub fn files(&self) -> &[Entry] {
        &self.entries[self.dir_count..]
    }

    /// Fill size and modification time for the file entries in
    /// `start..start + batch` that don't have them yet.
    ///
    /// Called by the view when rows become visible. Returns the number of
    /// entries filled; entries that can no longer be stat'ed stay unset.
    pub fn backfill(&mut self, start: usize, batch: usize) -> usize {
        let end = start.saturating_add(batch).min(self.entries.len());
        if start >= end {
            return 0;
        }

        let mut filled = 0;
        for entry in &mut self.entries[start..end] {
            if entry.is_dir || entry.has_metadata() {
                continue;
            }

            let path = self.dir.join(&entry.name);
            match fs::metadata(&path) {
                Ok(metadata) => {
                    entry.size_bytes = Some(metadata.len());
                    entry.modified = metadata.modified().ok().map(DateTime::<Local>::from);
                    filled += 1;
                }
                Err(e) => {
                    tracing::debug!("Cannot stat {}: {}", path.display(), e);
                }
            }
        }

        tracing::trace!("Backfilled {} entries from index {}", filled, start);
        filled
    }
}

/// Enumerate `dir` under `filter`.
///
/// Subdirectories are always listed. Files are matched against each pattern
/// of the filter in turn and the results concatenated, so a file matched by
/// two patterns appears twice.
pub fn list_directory(dir: &DirectoryPath, filter: &FilterSpec) -> Result<Listing> {
    let patterns = filter.compile()?;
    let path = dir.as_path();

    let read_dir = fs::read_dir(path).map_err(|e| FsError::from_io(path, e))?;

    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in read_dir {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry in {}: {}", path.display(), e);
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().to_string();
        let is_dir = match entry.file_type() {
            Ok(ft) if ft.is_symlink() => entry.path().is_dir(),
            Ok(ft) => ft.is_dir(),
            Err(_) => continue,
        };

        if is_dir {
            dirs.push(Entry::new(name, true));
        } else {
            files.push(name);
        }
    }

    let dir_count = dirs.len();
    let mut entries = dirs;
    for pattern in &patterns {
        entries.extend(
            files
                .iter()
                .filter(|name| pattern.matches(name))
                .map(|name| Entry::new(name.clone(), false)),
        );
    }

    tracing::debug!(
        "Listed {}: {} directories, {} files",
        path.display(),
        dir_count,
        entries.len() - dir_count
    );

    Ok(Listing {
        dir: dir.to_path_buf(),
        entries,
        dir_count,
    })
}

/// Format a byte count for the size column.
///
/// Picks the smallest of KB/MB/GB/TB that keeps the value below 10240 and
/// rounds up any remainder, so a 1-byte file shows as "1 KB".
pub fn format_size(bytes: u64) -> String {
    let mut denom: u64 = 1024;
    for unit in SIZE_UNITS {
        if bytes < denom * 10240 {
            let quot = bytes / denom + u64::from(bytes % denom > 0);
            return format!("{quot} {unit}");
        }
        denom *= 1024;
    }
    "> 10 TB".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FileFilter;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, DirectoryPath) {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("photos")).unwrap();
        fs::create_dir(temp.path().join("docs.png")).unwrap();
        fs::write(temp.path().join("a.png"), vec![0u8; 2048]).unwrap();
        fs::write(temp.path().join("b.jpg"), b"jpg").unwrap();
        fs::write(temp.path().join("notes.txt"), b"").unwrap();
        let dir = DirectoryPath::resolve(temp.path()).unwrap();
        (temp, dir)
    }

    fn names(entries: &[Entry]) -> Vec<&str> {
        let mut v: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        v.sort();
        v
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 KB");
        assert_eq!(format_size(1), "1 KB");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1025), "2 KB");
        assert_eq!(format_size(10240 * 1024 - 1), "10240 KB");
        assert_eq!(format_size(10240 * 1024), "10 MB");
        assert_eq!(format_size(10240 * 1024 + 1), "11 MB");
        assert_eq!(format_size(10240 * 1024 * 1024), "10 GB");
        assert_eq!(format_size(10240u64 * 1024 * 1024 * 1024), "10 TB");
        assert_eq!(format_size(10240u64 * 1024 * 1024 * 1024 * 1024 - 1), "10240 TB");
        assert_eq!(format_size(10240u64 * 1024 * 1024 * 1024 * 1024), "> 10 TB");
        assert_eq!(format_size(u64::MAX), "> 10 TB");
    }

    #[test]
    fn test_directories_ignore_filter() {
        let (_temp, dir) = fixture();
        let filter = FilterSpec::Predefined(FileFilter::new("Images", "*.png"));
        let listing = list_directory(&dir, &filter).unwrap();

        assert_eq!(names(listing.directories()), vec!["docs.png", "photos"]);
        assert_eq!(names(listing.files()), vec!["a.png"]);
        assert!(listing.directories().iter().all(|e| e.class == FileClass::Folder));
        assert_eq!(listing.files()[0].class, FileClass::Image);
    }

    #[test]
    fn test_directories_come_first() {
        let (_temp, dir) = fixture();
        let listing = list_directory(&dir, &FilterSpec::default()).unwrap();
        assert_eq!(listing.len(), 5);
        assert!(listing.entries()[..2].iter().all(|e| e.is_dir));
        assert!(listing.entries()[2..].iter().all(|e| !e.is_dir));
    }

    #[test]
    fn test_patterns_concatenate_without_dedup() {
        let (_temp, dir) = fixture();
        let filter = FilterSpec::Predefined(FileFilter::new("Mixed", "*.jpg;*.png;*"));
        let listing = list_directory(&dir, &filter).unwrap();
        let files: Vec<_> = listing.files().iter().map(|e| e.name.as_str()).collect();

        assert_eq!(files.len(), 5);
        assert_eq!(files[0], "b.jpg");
        assert_eq!(files[1], "a.png");
    }

    #[test]
    fn test_custom_filter_prefix() {
        let (_temp, dir) = fixture();
        let listing = list_directory(&dir, &FilterSpec::Custom("no".into())).unwrap();
        assert_eq!(names(listing.files()), vec!["notes.txt"]);
    }

    #[test]
    fn test_metadata_unset_until_backfill() {
        let (_temp, dir) = fixture();
        let mut listing = list_directory(&dir, &FilterSpec::default()).unwrap();
        assert!(listing.entries().iter().all(|e| e.size_bytes.is_none() && e.modified.is_none()));

        let filled = listing.backfill(0, DEFAULT_BATCH);
        assert_eq!(filled, 3);

        let png = listing.files().iter().find(|e| e.name == "a.png").unwrap();
        assert_eq!(png.size_bytes, Some(2048));
        assert_eq!(png.size_text(), "2 KB");
        assert!(png.modified.is_some());

        // Directories stay blank
        assert!(listing.directories().iter().all(|e| e.size_text().is_empty()));

        // Already filled entries are skipped
        assert_eq!(listing.backfill(0, DEFAULT_BATCH), 0);
    }

    #[test]
    fn test_backfill_window_is_bounded() {
        let (_temp, dir) = fixture();
        let mut listing = list_directory(&dir, &FilterSpec::default()).unwrap();

        assert_eq!(listing.backfill(2, 1), 1);
        assert!(listing.entries()[2].has_metadata());
        assert!(!listing.entries()[3].has_metadata());
        assert!(!listing.entries()[4].has_metadata());

        assert_eq!(listing.backfill(99, 10), 0);
    }

    #[test]
    fn test_backfill_skips_vanished_files() {
        let (temp, dir) = fixture();
        let mut listing = list_directory(&dir, &FilterSpec::default()).unwrap();
        fs::remove_file(temp.path().join("b.jpg")).unwrap();

        assert_eq!(listing.backfill(0, DEFAULT_BATCH), 2);
        let jpg = listing.files().iter().find(|e| e.name == "b.jpg").unwrap();
        assert!(!jpg.has_metadata());
    }

    #[test]
    fn test_modified_text_with_bad_format() {
        let mut entry = Entry::new("plot.png".to_string(), false);
        assert_eq!(entry.modified_text("%Y"), "");

        let now = Local::now();
        entry.modified = Some(now);
        assert_eq!(entry.modified_text("%Y %Q"), "");
        assert_eq!(entry.modified_text("%Y"), now.format("%Y").to_string());
    }

    #[test]
    fn test_time_format_check() {
        assert!(is_valid_time_format("%Y/%m/%d %H:%M:%S"));
        assert!(is_valid_time_format("plain text"));
        assert!(!is_valid_time_format("%Q"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory() {
        use std::os::unix::fs::PermissionsExt;

        let (temp, _dir) = fixture();
        let locked = temp.path().join("photos");
        let dir = DirectoryPath::resolve(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Root reads through any mode bits
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = list_directory(&dir, &FilterSpec::default());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(matches!(result, Err(FsError::AccessDenied(_))));
    }

    #[test]
    fn test_missing_directory() {
        let (temp, dir) = fixture();
        drop(temp);
        assert!(matches!(
            list_directory(&dir, &FilterSpec::default()),
            Err(FsError::NotFound(_))
        ));
    }
}
