//! Internalized enrollment gallery.
//!
//! At finalization the null implementation copies the harness-provided EDB
//! (the file of concatenated enrollment templates) into its own gallery
//! file inside the enrollment directory and rewrites the manifest as a JSON
//! index. Nothing references the harness inputs afterwards, which is what
//! the contract demands: the input files may vanish once finalization
//! returns.
//!
//! The manifest format is the out-of-band agreement between this repo's
//! harness and implementation: one whitespace-separated text line per
//! template, `template_id offset length`, offsets into the EDB.
//!
//! During identification sessions the internalized gallery file is opened
//! read-only and memory-mapped. Any number of reader processes can share
//! the finalized directory this way without coordination.

use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tatte_api::v2::GalleryType;
use tatte_types::{ReturnCode, ReturnStatus};

/// Name of the internalized template data file, a verbatim copy of the EDB.
pub const GALLERY_DATA_FILE: &str = "null_gallery.edb";

/// Name of the internalized index file.
pub const GALLERY_INDEX_FILE: &str = "null_gallery.json";

/// Location of one template within the gallery data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Template ID from the enrollment manifest
    pub template_id: String,
    /// Byte offset into the gallery data file
    pub offset: u64,
    /// Template length in bytes; zero-length (blank) templates are legal
    pub length: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct GalleryIndex {
    gallery_type: GalleryType,
    entries: Vec<IndexEntry>,
}

/// Parse the harness manifest: `template_id offset length` per line, blank
/// lines ignored.
pub fn parse_manifest(path: &Path) -> Result<Vec<IndexEntry>, ReturnStatus> {
    let mut text = String::new();
    File::open(path)
        .and_then(|mut f| f.read_to_string(&mut text))
        .map_err(|e| {
            ReturnStatus::new(
                ReturnCode::InputLocationError,
                format!("cannot read manifest {}: {e}", path.display()),
            )
        })?;

    let mut entries = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 3 {
            return Err(ReturnStatus::new(
                ReturnCode::ParseError,
                format!(
                    "manifest line {}: expected `id offset length`, got {} fields",
                    lineno + 1,
                    fields.len()
                ),
            ));
        }
        let parse_u64 = |s: &str, what: &str| {
            s.parse::<u64>().map_err(|_| {
                ReturnStatus::new(
                    ReturnCode::ParseError,
                    format!("manifest line {}: bad {what} `{s}`", lineno + 1),
                )
            })
        };
        entries.push(IndexEntry {
            template_id: fields[0].to_string(),
            offset: parse_u64(fields[1], "offset")?,
            length: parse_u64(fields[2], "length")?,
        });
    }
    Ok(entries)
}

fn check_entries_fit(entries: &[IndexEntry], data_len: u64) -> Result<(), ReturnStatus> {
    for entry in entries {
        let end = entry.offset.checked_add(entry.length);
        if !matches!(end, Some(end) if end <= data_len) {
            return Err(ReturnStatus::new(
                ReturnCode::TemplateFormatError,
                format!(
                    "template {} spans {}..{} past EDB of {} bytes",
                    entry.template_id,
                    entry.offset,
                    entry.offset.saturating_add(entry.length),
                    data_len
                ),
            ));
        }
    }
    Ok(())
}

/// Copy the EDB and manifest into the implementation's own files inside
/// `enrollment_dir`. Returns the number of indexed templates.
///
/// Fails with `EnrollDirError` if the directory was already finalized - the
/// read-only transition is one-way.
pub fn internalize(
    enrollment_dir: &Path,
    edb_name: &Path,
    manifest_name: &Path,
    gallery_type: GalleryType,
) -> Result<usize, ReturnStatus> {
    if !enrollment_dir.is_dir() {
        return Err(ReturnStatus::new(
            ReturnCode::EnrollDirError,
            format!("{} is not a directory", enrollment_dir.display()),
        ));
    }

    let index_path = enrollment_dir.join(GALLERY_INDEX_FILE);
    if index_path.exists() {
        return Err(ReturnStatus::new(
            ReturnCode::EnrollDirError,
            format!("{} is already finalized", enrollment_dir.display()),
        ));
    }

    let entries = parse_manifest(manifest_name)?;

    let edb_len = fs::metadata(edb_name)
        .map_err(|e| {
            ReturnStatus::new(
                ReturnCode::InputLocationError,
                format!("cannot stat EDB {}: {e}", edb_name.display()),
            )
        })?
        .len();
    check_entries_fit(&entries, edb_len)?;

    // Copy, don't reference: the harness inputs may disappear after this
    // call returns.
    fs::copy(edb_name, enrollment_dir.join(GALLERY_DATA_FILE))
        .map_err(|e| ReturnStatus::from_io(ReturnCode::EnrollDirError, e))?;

    let index = GalleryIndex {
        gallery_type,
        entries,
    };
    let encoded = serde_json::to_vec_pretty(&index).map_err(|e| {
        ReturnStatus::new(
            ReturnCode::EnrollDirError,
            format!("cannot encode gallery index: {e}"),
        )
    })?;
    fs::write(&index_path, encoded)
        .map_err(|e| ReturnStatus::from_io(ReturnCode::EnrollDirError, e))?;

    Ok(index.entries.len())
}

/// Read-only view over a finalized gallery.
#[derive(Debug)]
pub struct Gallery {
    index: GalleryIndex,
    // None only for a zero-byte data file, which cannot be mapped
    data: Option<Mmap>,
}

impl Gallery {
    /// Open the internalized gallery inside a finalized enrollment
    /// directory. The data file is memory-mapped read-only, so concurrent
    /// reader processes need no coordination.
    pub fn open(enrollment_dir: &Path) -> Result<Self, ReturnStatus> {
        let index_path = enrollment_dir.join(GALLERY_INDEX_FILE);
        let text = fs::read_to_string(&index_path).map_err(|e| {
            ReturnStatus::new(
                ReturnCode::InputLocationError,
                format!(
                    "{} is not a finalized enrollment directory: {e}",
                    enrollment_dir.display()
                ),
            )
        })?;
        let index: GalleryIndex = serde_json::from_str(&text).map_err(|e| {
            ReturnStatus::new(
                ReturnCode::TemplateFormatError,
                format!("corrupt gallery index: {e}"),
            )
        })?;

        let data_path = enrollment_dir.join(GALLERY_DATA_FILE);
        let file = File::open(&data_path).map_err(|e| {
            ReturnStatus::new(
                ReturnCode::InputLocationError,
                format!("cannot open gallery data {}: {e}", data_path.display()),
            )
        })?;
        let len = file
            .metadata()
            .map_err(|e| ReturnStatus::from_io(ReturnCode::EnrollDirError, e))?
            .len();

        let data = if len == 0 {
            None
        } else {
            // Safety: the mapping is read-only and the finalized gallery
            // file is never modified by contract.
            Some(unsafe {
                Mmap::map(&file).map_err(|e| ReturnStatus::from_io(ReturnCode::EnrollDirError, e))?
            })
        };

        check_entries_fit(&index.entries, len)?;

        Ok(Self { index, data })
    }

    pub fn gallery_type(&self) -> GalleryType {
        self.index.gallery_type
    }

    /// Number of enrolled templates, blank ones included.
    pub fn len(&self) -> usize {
        self.index.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.entries.is_empty()
    }

    fn bytes(&self) -> &[u8] {
        self.data.as_deref().unwrap_or(&[])
    }

    /// Iterate `(template_id, template_bytes)` in enrollment order. Entry
    /// bounds were validated at open time.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.index.entries.iter().map(|entry| {
            let start = entry.offset as usize;
            let end = start + entry.length as usize;
            (entry.template_id.as_str(), &self.bytes()[start..end])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_enrollment(dir: &Path, templates: &[(&str, &[u8])]) -> (std::path::PathBuf, std::path::PathBuf) {
        let edb_path = dir.join("edb");
        let manifest_path = dir.join("edb.manifest");

        let mut edb = File::create(&edb_path).unwrap();
        let mut manifest = File::create(&manifest_path).unwrap();
        let mut offset = 0u64;
        for (id, bytes) in templates {
            edb.write_all(bytes).unwrap();
            writeln!(manifest, "{id} {offset} {}", bytes.len()).unwrap();
            offset += bytes.len() as u64;
        }
        (edb_path, manifest_path)
    }

    #[test]
    fn test_manifest_round_trip() {
        let dir = tempdir().unwrap();
        let (_, manifest) = write_enrollment(
            dir.path(),
            &[("t1", b"aaaa"), ("t2", b""), ("t3", b"cccccc")],
        );

        let entries = parse_manifest(&manifest).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].template_id, "t1");
        assert_eq!((entries[1].offset, entries[1].length), (4, 0));
        assert_eq!((entries[2].offset, entries[2].length), (4, 6));
    }

    #[test]
    fn test_malformed_manifest_line_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.manifest");
        fs::write(&path, "t1 0 4\nt2 zero 4\n").unwrap();

        let status = parse_manifest(&path).unwrap_err();
        assert_eq!(status.code, ReturnCode::ParseError);
        assert!(
            status.info.contains("line 2"),
            "diagnostic should point at the bad line: {}",
            status.info
        );
    }

    #[test]
    fn test_missing_manifest_is_an_input_location_error() {
        let status = parse_manifest(Path::new("/nonexistent/manifest")).unwrap_err();
        assert_eq!(status.code, ReturnCode::InputLocationError);
    }

    #[test]
    fn test_internalize_copies_edb_bytes() {
        let dir = tempdir().unwrap();
        let (edb, manifest) =
            write_enrollment(dir.path(), &[("a", b"0123"), ("b", b"456789")]);

        let count =
            internalize(dir.path(), &edb, &manifest, GalleryType::Unconsolidated).unwrap();
        assert_eq!(count, 2);

        // The copy is byte-identical and independent of the inputs
        fs::remove_file(&edb).unwrap();
        fs::remove_file(&manifest).unwrap();

        let gallery = Gallery::open(dir.path()).unwrap();
        let templates: Vec<(String, Vec<u8>)> = gallery
            .iter()
            .map(|(id, bytes)| (id.to_string(), bytes.to_vec()))
            .collect();
        assert_eq!(
            templates,
            vec![
                ("a".to_string(), b"0123".to_vec()),
                ("b".to_string(), b"456789".to_vec()),
            ],
            "gallery must serve the exact enrolled bytes after inputs vanish"
        );
        assert_eq!(gallery.gallery_type(), GalleryType::Unconsolidated);
    }

    #[test]
    fn test_second_internalize_is_rejected() {
        let dir = tempdir().unwrap();
        let (edb, manifest) = write_enrollment(dir.path(), &[("a", b"0123")]);

        internalize(dir.path(), &edb, &manifest, GalleryType::Consolidated).unwrap();
        let status = internalize(dir.path(), &edb, &manifest, GalleryType::Consolidated)
            .unwrap_err();
        assert_eq!(
            status.code,
            ReturnCode::EnrollDirError,
            "finalization is one-way; a second attempt must be rejected"
        );
    }

    #[test]
    fn test_entry_past_edb_end_is_a_template_format_error() {
        let dir = tempdir().unwrap();
        let edb = dir.path().join("edb");
        let manifest = dir.path().join("edb.manifest");
        fs::write(&edb, b"1234").unwrap();
        fs::write(&manifest, "t1 0 4\nt2 2 10\n").unwrap();

        let status = internalize(dir.path(), &edb, &manifest, GalleryType::Unconsolidated)
            .unwrap_err();
        assert_eq!(status.code, ReturnCode::TemplateFormatError);
    }

    #[test]
    fn test_open_unfinalized_directory_fails() {
        let dir = tempdir().unwrap();
        let status = Gallery::open(dir.path()).unwrap_err();
        assert_eq!(status.code, ReturnCode::InputLocationError);
    }

    #[test]
    fn test_all_blank_gallery_is_readable() {
        // Every enrolled template blank: zero-byte EDB, no mapping possible
        let dir = tempdir().unwrap();
        let (edb, manifest) = write_enrollment(dir.path(), &[("a", b""), ("b", b"")]);

        internalize(dir.path(), &edb, &manifest, GalleryType::Consolidated).unwrap();
        let gallery = Gallery::open(dir.path()).unwrap();

        assert_eq!(gallery.len(), 2);
        for (_, bytes) in gallery.iter() {
            assert!(bytes.is_empty());
        }
    }

    #[test]
    fn test_concurrent_readers_share_a_finalized_gallery() {
        let dir = tempdir().unwrap();
        let (edb, manifest) = write_enrollment(dir.path(), &[("a", b"0123")]);
        internalize(dir.path(), &edb, &manifest, GalleryType::Unconsolidated).unwrap();

        // Several simultaneous read-only views, no locks involved
        let g1 = Gallery::open(dir.path()).unwrap();
        let g2 = Gallery::open(dir.path()).unwrap();
        let g3 = Gallery::open(dir.path()).unwrap();

        for g in [&g1, &g2, &g3] {
            let (id, bytes) = g.iter().next().unwrap();
            assert_eq!(id, "a");
            assert_eq!(bytes, b"0123");
        }
    }
}
