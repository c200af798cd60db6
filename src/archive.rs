//! Archive extraction into a scoped workspace.
//!
//! A chat export is a ZIP bundle: one plain-text chat log plus the attached
//! media files. [`Workspace::extract`] unpacks the bundle into a temporary
//! directory, decodes the log, and maps every media filename to its on-disk
//! path. Dropping the [`Workspace`] reclaims the directory, so disposal is
//! guaranteed on every exit path of the analysis run.
//!
//! # Example
//!
//! ```rust,no_run
//! use chatlens::archive::Workspace;
//!
//! let bytes = std::fs::read("export.zip")?;
//! let workspace = Workspace::new()?;
//! let extracted = workspace.extract(&bytes)?;
//! println!("{} media files", extracted.media_count());
//! # Ok::<(), chatlens::ChatlensError>(())
//! ```

use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::error::{ChatlensError, Result};

/// A temporary directory holding one request's extracted archive.
///
/// The directory is removed when the workspace is dropped, including on
/// parse or aggregation failure.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

/// The decoded contents of an extracted archive.
#[derive(Debug)]
pub struct Extracted {
    /// The chat-log text, decoded as UTF-8 with undecodable sequences
    /// replaced.
    pub chat_text: String,

    media: HashMap<String, PathBuf>,
}

impl Workspace {
    /// Creates a fresh scoped workspace.
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    /// Returns the workspace directory path.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Unpacks archive bytes and locates the chat log.
    ///
    /// Every entry is written under the workspace directory. Entries with
    /// unsafe paths are skipped. Exactly one `.txt` entry is selected as the
    /// chat log, preferring filenames containing "chat"; all other entries
    /// become media, keyed by their bare filename.
    ///
    /// # Errors
    ///
    /// [`ChatlensError::Zip`] when the archive is corrupt, and
    /// [`ChatlensError::Extraction`] when no `.txt` entry is found.
    pub fn extract(&self, bytes: &[u8]) -> Result<Extracted> {
        let cursor = Cursor::new(bytes);
        let mut archive = zip::ZipArchive::new(cursor)?;

        let mut txt_files: Vec<(String, PathBuf)> = Vec::new();
        let mut media: HashMap<String, PathBuf> = HashMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let Some(rel_path) = file.enclosed_name() else {
                warn!(entry = %file.name(), "skipping archive entry with unsafe path");
                continue;
            };

            if file.is_dir() {
                continue;
            }

            let Some(file_name) = rel_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
            else {
                continue;
            };
            // macOS export bundles carry resource-fork noise
            if file_name.starts_with("._") || file_name == ".DS_Store" {
                continue;
            }

            let is_txt = file_name.to_lowercase().ends_with(".txt");
            // Media is keyed by bare filename; keep the first entry when two
            // subdirectories carry the same name
            if !is_txt && media.contains_key(&file_name) {
                warn!(filename = %file_name, "duplicate media filename in archive, keeping the first");
                continue;
            }

            let dest_path = self.dir.path().join(&rel_path);
            if let Some(parent) = dest_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = fs::File::create(&dest_path)?;
            std::io::copy(&mut file, &mut out)?;

            if is_txt {
                txt_files.push((file_name, dest_path));
            } else {
                media.insert(file_name, dest_path);
            }
        }

        let chat_path = select_chat_file(&txt_files).ok_or_else(|| {
            ChatlensError::extraction("no .txt chat log entry found in the archive")
        })?;

        // Best-effort transcoding: replace undecodable sequences instead of
        // failing on a partially corrupt export.
        let raw = fs::read(chat_path)?;
        let chat_text = String::from_utf8_lossy(&raw).into_owned();

        info!(
            media_files = media.len(),
            chat_bytes = chat_text.len(),
            "extracted chat export archive"
        );

        Ok(Extracted { chat_text, media })
    }
}

/// Picks the chat log from the extracted `.txt` entries, preferring names
/// containing "chat".
fn select_chat_file(txt_files: &[(String, PathBuf)]) -> Option<&Path> {
    if let Some((name, path)) = txt_files
        .iter()
        .find(|(name, _)| name.to_lowercase().contains("chat"))
    {
        debug!(file = %name, "selected chat log");
        return Some(path);
    }
    txt_files.first().map(|(name, path)| {
        debug!(file = %name, "no 'chat' entry, using first .txt file");
        path.as_path()
    })
}

impl Extracted {
    /// Number of extracted media files.
    pub fn media_count(&self) -> usize {
        self.media.len()
    }

    /// Iterates over extracted media filenames.
    pub fn media_names(&self) -> impl Iterator<Item = &str> {
        self.media.keys().map(String::as_str)
    }

    /// Returns the extracted path for a media filename, if present.
    pub fn media_path(&self, filename: &str) -> Option<&Path> {
        self.media.get(filename).map(PathBuf::as_path)
    }

    /// Reads the bytes of an extracted media file.
    pub fn media_bytes(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self.media_path(filename).ok_or_else(|| {
            ChatlensError::extraction(format!("media file not found in archive: {filename}"))
        })?;
        Ok(fs::read(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn make_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, bytes) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(bytes).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extract_chat_and_media() {
        let bytes = make_zip(&[
            ("WhatsApp Chat with Alice.txt", b"hello log"),
            ("PTT-20240101-WA0001.opus", b"\x00\x01audio"),
            ("IMG-20240101-WA0002.jpg", b"\xff\xd8jpeg"),
        ]);

        let workspace = Workspace::new().unwrap();
        let extracted = workspace.extract(&bytes).unwrap();

        assert_eq!(extracted.chat_text, "hello log");
        assert_eq!(extracted.media_count(), 2);
        assert_eq!(
            extracted.media_bytes("PTT-20240101-WA0001.opus").unwrap(),
            b"\x00\x01audio"
        );
        assert!(extracted.media_path("IMG-20240101-WA0002.jpg").is_some());
    }

    #[test]
    fn test_extract_prefers_chat_named_txt() {
        let bytes = make_zip(&[
            ("notes.txt", b"not the log"),
            ("chat.txt", b"the log"),
        ]);
        let workspace = Workspace::new().unwrap();
        let extracted = workspace.extract(&bytes).unwrap();
        assert_eq!(extracted.chat_text, "the log");
    }

    #[test]
    fn test_extract_falls_back_to_first_txt() {
        let bytes = make_zip(&[("export.txt", b"fallback log")]);
        let workspace = Workspace::new().unwrap();
        let extracted = workspace.extract(&bytes).unwrap();
        assert_eq!(extracted.chat_text, "fallback log");
    }

    #[test]
    fn test_extract_nested_entries() {
        let bytes = make_zip(&[("export/chat.txt", b"nested"), ("export/media/a.jpg", b"x")]);
        let workspace = Workspace::new().unwrap();
        let extracted = workspace.extract(&bytes).unwrap();
        assert_eq!(extracted.chat_text, "nested");
        assert!(extracted.media_path("a.jpg").is_some());
    }

    #[test]
    fn test_duplicate_media_filename_keeps_first() {
        let bytes = make_zip(&[
            ("chat.txt", b"log"),
            ("a/PTT-1.opus", b"first"),
            ("b/PTT-1.opus", b"second"),
        ]);
        let workspace = Workspace::new().unwrap();
        let extracted = workspace.extract(&bytes).unwrap();

        assert_eq!(extracted.media_count(), 1);
        assert_eq!(extracted.media_bytes("PTT-1.opus").unwrap(), b"first");
    }

    #[test]
    fn test_extract_no_txt_entry() {
        let bytes = make_zip(&[("photo.jpg", b"x")]);
        let workspace = Workspace::new().unwrap();
        let err = workspace.extract(&bytes).unwrap_err();
        assert!(err.is_extraction());
    }

    #[test]
    fn test_extract_corrupt_archive() {
        let workspace = Workspace::new().unwrap();
        let err = workspace.extract(b"definitely not a zip").unwrap_err();
        assert!(err.is_extraction());
    }

    #[test]
    fn test_extract_lossy_decoding() {
        // invalid UTF-8 in the log must not abort extraction
        let bytes = make_zip(&[("chat.txt", b"hi \xff\xfe there")]);
        let workspace = Workspace::new().unwrap();
        let extracted = workspace.extract(&bytes).unwrap();
        assert!(extracted.chat_text.starts_with("hi "));
        assert!(extracted.chat_text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_workspace_cleanup_on_drop() {
        let path;
        {
            let workspace = Workspace::new().unwrap();
            path = workspace.path().to_path_buf();
            let bytes = make_zip(&[("chat.txt", b"log")]);
            workspace.extract(&bytes).unwrap();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_skips_macos_resource_forks() {
        let bytes = make_zip(&[
            ("chat.txt", b"log"),
            ("__MACOSX/._chat.txt", b"junk"),
            (".DS_Store", b"junk"),
        ]);
        let workspace = Workspace::new().unwrap();
        let extracted = workspace.extract(&bytes).unwrap();
        assert_eq!(extracted.chat_text, "log");
        assert_eq!(extracted.media_count(), 0);
    }

    #[test]
    fn test_media_bytes_missing_file() {
        let bytes = make_zip(&[("chat.txt", b"log")]);
        let workspace = Workspace::new().unwrap();
        let extracted = workspace.extract(&bytes).unwrap();
        assert!(extracted.media_bytes("nope.opus").is_err());
    }
}
