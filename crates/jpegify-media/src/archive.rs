//! ZIP extraction and result archive writing.

use std::fs::{self, File};
use std::io::{self, Cursor, Read, Write};
use std::path::{Path, PathBuf};

use jpegify_models::{AcceptedKind, ConvertedImage};
use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{MediaError, MediaResult};

/// Extract the ZIP archive `bytes` (uploaded as `name`) into `dest`.
///
/// Entries whose paths would escape `dest` and entries that cannot be
/// decompressed or written are skipped. `budget` is the number of
/// decompressed bytes still allowed for the request and is reduced by what
/// this archive writes; going over it fails with
/// [`MediaError::ArchiveTooLarge`]. Returns the number of files written.
pub fn extract_archive(
    name: &str,
    bytes: &[u8],
    dest: &Path,
    budget: &mut u64,
) -> MediaResult<usize> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
        debug!(archive = %name, error = %e, "Upload is not a readable ZIP archive");
        MediaError::NotAnArchive {
            name: name.to_string(),
        }
    })?;

    let mut extracted = 0;
    for index in 0..archive.len() {
        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(archive = %name, index, error = %e, "Skipping unreadable archive entry");
                continue;
            }
        };

        let Some(relative) = entry.enclosed_name() else {
            warn!(archive = %name, entry = %entry.name(), "Skipping archive entry with unsafe path");
            continue;
        };
        let target = dest.join(relative);

        if entry.is_dir() {
            if let Err(e) = fs::create_dir_all(&target) {
                warn!(archive = %name, entry = %entry.name(), error = %e, "Skipping archive directory");
            }
            continue;
        }

        // A file entry may collide with an earlier entry of the same path.
        let created = match target.parent() {
            Some(parent) => fs::create_dir_all(parent).and_then(|_| File::create(&target)),
            None => File::create(&target),
        };
        let mut out = match created {
            Ok(out) => out,
            Err(e) => {
                warn!(archive = %name, entry = %entry.name(), error = %e, "Skipping archive entry that cannot be written");
                continue;
            }
        };

        // One byte past the budget is enough to tell it was exceeded.
        let mut limited = (&mut entry).take(budget.saturating_add(1));
        let written = match io::copy(&mut limited, &mut out) {
            Ok(written) => written,
            Err(e) => {
                warn!(archive = %name, entry = %entry.name(), error = %e, "Failed to extract archive entry");
                drop(out);
                let _ = fs::remove_file(&target);
                continue;
            }
        };

        if written > *budget {
            warn!(archive = %name, entry = %entry.name(), "Archive exceeds the extraction limit");
            drop(out);
            let _ = fs::remove_file(&target);
            return Err(MediaError::ArchiveTooLarge {
                name: name.to_string(),
            });
        }
        *budget -= written;
        extracted += 1;
    }

    debug!(archive = %name, extracted, "Archive extracted");
    Ok(extracted)
}

/// Recursively list files under `root` whose names match `accepted`.
///
/// Paths are returned sorted so discovery order is stable.
pub fn scan_matching(root: &Path, accepted: AcceptedKind) -> MediaResult<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let path = entry.path();

            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file()
                && accepted.matches(&entry.file_name().to_string_lossy())
            {
                found.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}

/// Pack `outputs` into a deflate-compressed ZIP, one root-level entry each.
pub fn write_result_archive(outputs: &[ConvertedImage]) -> MediaResult<Vec<u8>> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for output in outputs {
        zip.start_file(output.name.as_str(), options)?;
        zip.write_all(&output.jpeg)?;
    }

    Ok(zip.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn zip_of(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let options = SimpleFileOptions::default();
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extract_and_scan_recursively() {
        let dir = TempDir::new().unwrap();
        let bytes = zip_of(&[
            ("b.webp", b"b"),
            ("nested/deeper/a.WEBP", b"a"),
            ("notes.txt", b"ignored"),
            ("nested/c.png", b"ignored"),
        ]);

        let extracted = extract_archive("batch.zip", &bytes, dir.path(), &mut u64::MAX).unwrap();
        assert_eq!(extracted, 4);

        let found = scan_matching(dir.path(), AcceptedKind::Webp).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![PathBuf::from("b.webp"), PathBuf::from("nested/deeper/a.WEBP")]
        );
    }

    #[test]
    fn test_scan_jpeg_accepts_both_extensions() {
        let dir = TempDir::new().unwrap();
        let bytes = zip_of(&[("x.jpg", b"x"), ("y.jpeg", b"y"), ("z.webp", b"z")]);
        extract_archive("batch.zip", &bytes, dir.path(), &mut u64::MAX).unwrap();

        let found = scan_matching(dir.path(), AcceptedKind::Jpeg).unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_colliding_entry_is_skipped() {
        let dir = TempDir::new().unwrap();
        let bytes = zip_of(&[
            ("good.webp", b"g"),
            ("x", b"plain file"),
            ("x/inner.webp", b"cannot live under a file"),
        ]);

        let extracted = extract_archive("batch.zip", &bytes, dir.path(), &mut u64::MAX).unwrap();
        assert_eq!(extracted, 2);

        let found = scan_matching(dir.path(), AcceptedKind::Webp).unwrap();
        assert_eq!(found, vec![dir.path().join("good.webp")]);
    }

    #[test]
    fn test_extraction_budget_is_shared_and_enforced() {
        let dir = TempDir::new().unwrap();
        let bytes = zip_of(&[("a.webp", &[0u8; 600]), ("b.webp", &[0u8; 600])]);

        let mut budget = 1000;
        let err = extract_archive("big.zip", &bytes, dir.path(), &mut budget).unwrap_err();
        assert!(matches!(err, MediaError::ArchiveTooLarge { ref name } if name == "big.zip"));
        assert!(err.is_client_error());
        assert!(!dir.path().join("b.webp").exists());

        let mut budget = 1200;
        let other = TempDir::new().unwrap();
        extract_archive("exact.zip", &bytes, other.path(), &mut budget).unwrap();
        assert_eq!(budget, 0);
    }

    #[test]
    fn test_not_a_zip() {
        let dir = TempDir::new().unwrap();
        let err = extract_archive("fake.zip", b"plain text", dir.path(), &mut u64::MAX).unwrap_err();
        assert!(matches!(err, MediaError::NotAnArchive { ref name } if name == "fake.zip"));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_result_archive_is_deflated_at_root() {
        let outputs = vec![
            ConvertedImage {
                name: "a.jpg".to_string(),
                jpeg: vec![1, 2, 3],
                width: 1,
                height: 1,
            },
            ConvertedImage {
                name: "b.jpg".to_string(),
                jpeg: vec![4, 5],
                width: 1,
                height: 1,
            },
        ];

        let bytes = write_result_archive(&outputs).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "a.jpg");
        assert_eq!(first.compression(), CompressionMethod::Deflated);
        let mut data = Vec::new();
        first.read_to_end(&mut data).unwrap();
        assert_eq!(data, vec![1, 2, 3]);
        drop(first);

        assert_eq!(archive.by_index(1).unwrap().name(), "b.jpg");
    }
}
