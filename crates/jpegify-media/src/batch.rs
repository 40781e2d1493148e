//! Profile-driven batch conversion.
//!
//! One request is a single linear pass:
//! 1. Request-level gate: every upload must be acceptable for the profile,
//!    otherwise the whole request is rejected before any decoding.
//! 2. Discovery: direct uploads are taken as-is, archives are extracted into a
//!    scoped temporary directory and scanned for matching entries.
//! 3. Conversion: each item becomes an [`ItemOutcome`]; failures are logged
//!    and excluded.
//! 4. Packaging: zero outputs is a request-level failure, otherwise the
//!    outputs are zipped.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use jpegify_models::{
    BatchReport, ConversionProfile, ConversionSettings, ConvertedImage, InputItem, ItemFailure,
    ItemOutcome, SourceMode,
};
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::archive::{extract_archive, scan_matching, write_result_archive};
use crate::error::{MediaError, MediaResult};
use crate::transcode::transcode;

/// An item discovered for conversion, loaded lazily.
#[derive(Debug)]
struct PendingItem {
    name: String,
    source: PendingSource,
}

#[derive(Debug)]
enum PendingSource {
    Upload(Vec<u8>),
    Extracted(PathBuf),
}

impl PendingItem {
    fn load(&self) -> MediaResult<Cow<'_, [u8]>> {
        match &self.source {
            PendingSource::Upload(bytes) => Ok(Cow::Borrowed(bytes.as_slice())),
            PendingSource::Extracted(path) => Ok(Cow::Owned(fs::read(path)?)),
        }
    }
}

/// Default cap on bytes extracted from archives in one request (1 GiB).
pub const DEFAULT_MAX_EXTRACTED_BYTES: u64 = 1024 * 1024 * 1024;

/// Converts one request's uploads according to a [`ConversionProfile`].
///
/// Holds no per-request state and can be shared between requests.
#[derive(Debug, Clone)]
pub struct BatchConverter {
    settings: ConversionSettings,
    temp_root: Option<PathBuf>,
    max_extracted_bytes: u64,
}

impl Default for BatchConverter {
    fn default() -> Self {
        Self::new(ConversionSettings::default())
    }
}

impl BatchConverter {
    pub fn new(settings: ConversionSettings) -> Self {
        Self {
            settings,
            temp_root: None,
            max_extracted_bytes: DEFAULT_MAX_EXTRACTED_BYTES,
        }
    }

    /// Create temporary directories under `root` instead of the system default.
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    /// Cap the decompressed size of all archives in one request.
    pub fn with_extraction_limit(mut self, max_bytes: u64) -> Self {
        self.max_extracted_bytes = max_bytes;
        self
    }

    /// Convert a whole request.
    ///
    /// Blocking: decodes, resizes and encodes on the calling thread.
    pub fn convert(
        &self,
        profile: &ConversionProfile,
        uploads: Vec<InputItem>,
    ) -> MediaResult<BatchReport> {
        let uploads = self.gate(profile, uploads)?;

        // Dropped on every exit path, taking extracted entries with it.
        let staging = match profile.source {
            SourceMode::Direct => None,
            SourceMode::Archive | SourceMode::Mixed => Some(self.staging_dir()?),
        };

        let mut budget = self.max_extracted_bytes;
        let items = discover(
            profile,
            uploads,
            staging.as_ref().map(TempDir::path),
            &mut budget,
        )?;
        debug!(profile = %profile.id, items = items.len(), "Discovered items");

        let outcomes: Vec<ItemOutcome> = items
            .iter()
            .map(|item| self.convert_item(profile, item))
            .collect();

        package(profile, outcomes)
    }

    /// Apply the request-level extension gate.
    fn gate(
        &self,
        profile: &ConversionProfile,
        mut uploads: Vec<InputItem>,
    ) -> MediaResult<Vec<InputItem>> {
        if profile.source == SourceMode::Archive && uploads.len() > 1 {
            warn!(
                profile = %profile.id,
                ignored = uploads.len() - 1,
                "Archive endpoint received several files, using the first"
            );
            uploads.truncate(1);
        }

        if let Some(bad) = uploads.iter().find(|u| !profile.accepts_upload(&u.name)) {
            return Err(MediaError::rejected(profile.rejection_message(&bad.name)));
        }

        Ok(uploads)
    }

    fn staging_dir(&self) -> MediaResult<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("jpegify-");
        let dir = match &self.temp_root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        Ok(dir)
    }

    fn convert_item(&self, profile: &ConversionProfile, item: &PendingItem) -> ItemOutcome {
        let result = item
            .load()
            .and_then(|bytes| transcode(&bytes, profile.transform, &self.settings));

        match result {
            Ok(encoded) => ItemOutcome::Converted(ConvertedImage {
                name: profile.output_name(&item.name),
                jpeg: encoded.bytes,
                width: encoded.width,
                height: encoded.height,
            }),
            Err(e) => {
                warn!(profile = %profile.id, item = %item.name, error = %e, "Failed to convert item");
                ItemOutcome::Failed(ItemFailure {
                    name: item.name.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

/// Expand uploads into items, in discovery order.
fn discover(
    profile: &ConversionProfile,
    uploads: Vec<InputItem>,
    staging: Option<&Path>,
    budget: &mut u64,
) -> MediaResult<Vec<PendingItem>> {
    let mut items = Vec::new();

    for (index, upload) in uploads.into_iter().enumerate() {
        let is_image = profile.source != SourceMode::Archive && profile.accepted.matches(&upload.name);
        if is_image {
            items.push(PendingItem {
                name: upload.name,
                source: PendingSource::Upload(upload.bytes),
            });
            continue;
        }

        let Some(staging) = staging else {
            return Err(MediaError::rejected(profile.rejection_message(&upload.name)));
        };
        let dest = staging.join(index.to_string());
        fs::create_dir_all(&dest)?;
        extract_archive(&upload.name, &upload.bytes, &dest, budget)?;

        for path in scan_matching(&dest, profile.accepted)? {
            let name = path
                .strip_prefix(&dest)
                .unwrap_or(&path)
                .to_string_lossy()
                .into_owned();
            items.push(PendingItem {
                name,
                source: PendingSource::Extracted(path),
            });
        }
    }

    Ok(items)
}

/// Collect outcomes into the result archive.
fn package(profile: &ConversionProfile, outcomes: Vec<ItemOutcome>) -> MediaResult<BatchReport> {
    let mut outputs: Vec<ConvertedImage> = Vec::new();
    let mut failures = Vec::new();

    for outcome in outcomes {
        match outcome {
            ItemOutcome::Converted(image) => {
                match outputs.iter_mut().find(|o| o.name == image.name) {
                    Some(existing) => {
                        warn!(profile = %profile.id, entry = %image.name, "Duplicate output name, keeping the later item");
                        *existing = image;
                    }
                    None => outputs.push(image),
                }
            }
            ItemOutcome::Failed(failure) => failures.push(failure),
        }
    }

    if outputs.is_empty() {
        warn!(profile = %profile.id, failed = failures.len(), "No valid files in request");
        return Err(MediaError::NoValidFiles(profile.no_valid_files_message()));
    }

    let archive = write_result_archive(&outputs)?;
    let entries: Vec<String> = outputs.into_iter().map(|o| o.name).collect();

    info!(
        profile = %profile.id,
        converted = entries.len(),
        failed = failures.len(),
        archive_bytes = archive.len(),
        "Batch converted"
    );

    Ok(BatchReport {
        archive_name: profile.archive_name,
        archive,
        entries,
        failures,
    })
}
