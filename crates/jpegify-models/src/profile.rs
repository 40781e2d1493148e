//! Endpoint conversion profiles.
//!
//! Every conversion endpoint is the same batch routine configured by a
//! [`ConversionProfile`]: which inputs it accepts, where they come from,
//! how they are transformed and how the outputs are named.

use serde::Serialize;
use std::fmt;

use crate::utils::{has_extension, is_zip_name};

/// Input image family accepted by a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptedKind {
    Webp,
    Jpeg,
}

impl AcceptedKind {
    /// Lowercase extensions (without the dot) for this family.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            AcceptedKind::Webp => &["webp"],
            AcceptedKind::Jpeg => &["jpg", "jpeg"],
        }
    }

    /// Case-insensitive extension match.
    pub fn matches(&self, name: &str) -> bool {
        has_extension(name, self.extensions())
    }

    /// Display label used in user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            AcceptedKind::Webp => "WebP",
            AcceptedKind::Jpeg => "JPEG",
        }
    }
}

/// Where the items of a request come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    /// Every upload is an image.
    Direct,
    /// A single uploaded ZIP archive, scanned recursively.
    Archive,
    /// Each upload is either an image or a ZIP archive expanded in place.
    Mixed,
}

/// Pixel transform applied between decode and encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    /// Re-encode at the source size.
    Identity,
    /// Shrink to fit and center on the fixed white canvas.
    ResizeAndPad,
}

/// Identifier of each conversion endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileId {
    ConvertWebp,
    ConvertZip,
    ConvertWebpResize,
    ConvertZipResize,
    ResizeJpeg,
}

impl ProfileId {
    pub const ALL: &'static [ProfileId] = &[
        ProfileId::ConvertWebp,
        ProfileId::ConvertZip,
        ProfileId::ConvertWebpResize,
        ProfileId::ConvertZipResize,
        ProfileId::ResizeJpeg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileId::ConvertWebp => "convert_webp",
            ProfileId::ConvertZip => "convert_zip",
            ProfileId::ConvertWebpResize => "convert_webp_resize",
            ProfileId::ConvertZipResize => "convert_zip_resize",
            ProfileId::ResizeJpeg => "resize_jpeg",
        }
    }

    /// The full profile for this endpoint.
    pub fn profile(&self) -> &'static ConversionProfile {
        match self {
            ProfileId::ConvertWebp => &ConversionProfile::CONVERT_WEBP,
            ProfileId::ConvertZip => &ConversionProfile::CONVERT_ZIP,
            ProfileId::ConvertWebpResize => &ConversionProfile::CONVERT_WEBP_RESIZE,
            ProfileId::ConvertZipResize => &ConversionProfile::CONVERT_ZIP_RESIZE,
            ProfileId::ResizeJpeg => &ConversionProfile::RESIZE_JPEG,
        }
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full description of one conversion endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConversionProfile {
    pub id: ProfileId,
    /// Route path the profile is served on
    pub path: &'static str,
    pub accepted: AcceptedKind,
    pub source: SourceMode,
    pub transform: Transform,
    /// Appended to the input stem before `.jpg`
    pub output_suffix: &'static str,
    /// Filename advertised in `Content-Disposition`
    pub archive_name: &'static str,
}

const CONVERTED_ARCHIVE: &str = "converted_images.zip";
const RESIZED_ARCHIVE: &str = "resized_images.zip";

impl ConversionProfile {
    pub const CONVERT_WEBP: ConversionProfile = ConversionProfile {
        id: ProfileId::ConvertWebp,
        path: "/convert-webp/",
        accepted: AcceptedKind::Webp,
        source: SourceMode::Direct,
        transform: Transform::Identity,
        output_suffix: "",
        archive_name: CONVERTED_ARCHIVE,
    };

    pub const CONVERT_ZIP: ConversionProfile = ConversionProfile {
        id: ProfileId::ConvertZip,
        path: "/convert-zip/",
        accepted: AcceptedKind::Webp,
        source: SourceMode::Archive,
        transform: Transform::Identity,
        output_suffix: "",
        archive_name: CONVERTED_ARCHIVE,
    };

    pub const CONVERT_WEBP_RESIZE: ConversionProfile = ConversionProfile {
        id: ProfileId::ConvertWebpResize,
        path: "/convert-webp-resize/",
        accepted: AcceptedKind::Webp,
        source: SourceMode::Direct,
        transform: Transform::ResizeAndPad,
        output_suffix: "",
        archive_name: CONVERTED_ARCHIVE,
    };

    pub const CONVERT_ZIP_RESIZE: ConversionProfile = ConversionProfile {
        id: ProfileId::ConvertZipResize,
        path: "/convert-zip-resize/",
        accepted: AcceptedKind::Webp,
        source: SourceMode::Archive,
        transform: Transform::ResizeAndPad,
        output_suffix: "",
        archive_name: CONVERTED_ARCHIVE,
    };

    pub const RESIZE_JPEG: ConversionProfile = ConversionProfile {
        id: ProfileId::ResizeJpeg,
        path: "/resize-jpeg/",
        accepted: AcceptedKind::Jpeg,
        source: SourceMode::Mixed,
        transform: Transform::ResizeAndPad,
        output_suffix: "_resized",
        archive_name: RESIZED_ARCHIVE,
    };

    /// Whether an upload with this name passes the request-level gate.
    pub fn accepts_upload(&self, name: &str) -> bool {
        match self.source {
            SourceMode::Direct => self.accepted.matches(name),
            SourceMode::Archive => is_zip_name(name),
            SourceMode::Mixed => self.accepted.matches(name) || is_zip_name(name),
        }
    }

    /// Output entry name for an input name.
    pub fn output_name(&self, input_name: &str) -> String {
        format!(
            "{}{}.jpg",
            crate::utils::file_stem(input_name),
            self.output_suffix
        )
    }

    /// Message for an upload rejected by [`accepts_upload`](Self::accepts_upload).
    pub fn rejection_message(&self, name: &str) -> String {
        match self.source {
            SourceMode::Direct => format!("Файл {} не {}", name, self.accepted.label()),
            SourceMode::Archive => "Загрузите .zip файл".to_string(),
            SourceMode::Mixed => {
                format!("Файл {} не {} и не ZIP", name, self.accepted.label())
            }
        }
    }

    /// Message for a request that produced no outputs.
    pub fn no_valid_files_message(&self) -> String {
        match self.source {
            SourceMode::Archive => {
                format!("Нет валидных {} файлов в архиве", self.accepted.label())
            }
            SourceMode::Direct | SourceMode::Mixed => {
                format!("Нет валидных {} файлов", self.accepted.label())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_lookup_matches_id() {
        for id in ProfileId::ALL {
            assert_eq!(id.profile().id, *id);
            assert_eq!(id.to_string(), id.as_str());
        }
        let mut labels: Vec<_> = ProfileId::ALL.iter().map(ProfileId::as_str).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), ProfileId::ALL.len());
    }

    #[test]
    fn test_accepts_upload_per_source_mode() {
        let direct = ConversionProfile::CONVERT_WEBP;
        assert!(direct.accepts_upload("a.webp"));
        assert!(direct.accepts_upload("A.WebP"));
        assert!(!direct.accepts_upload("photo.png"));
        assert!(!direct.accepts_upload("batch.zip"));

        let archive = ConversionProfile::CONVERT_ZIP;
        assert!(archive.accepts_upload("batch.zip"));
        assert!(!archive.accepts_upload("a.webp"));

        let mixed = ConversionProfile::RESIZE_JPEG;
        assert!(mixed.accepts_upload("a.jpg"));
        assert!(mixed.accepts_upload("a.JPEG"));
        assert!(mixed.accepts_upload("batch.zip"));
        assert!(!mixed.accepts_upload("a.webp"));
    }

    #[test]
    fn test_output_names() {
        assert_eq!(ConversionProfile::CONVERT_WEBP.output_name("a.webp"), "a.jpg");
        assert_eq!(
            ConversionProfile::CONVERT_ZIP_RESIZE.output_name("dir/sub/a.webp"),
            "a.jpg"
        );
        assert_eq!(
            ConversionProfile::RESIZE_JPEG.output_name("photo.jpeg"),
            "photo_resized.jpg"
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ConversionProfile::CONVERT_WEBP.rejection_message("photo.png"),
            "Файл photo.png не WebP"
        );
        assert_eq!(
            ConversionProfile::CONVERT_ZIP.rejection_message("a.rar"),
            "Загрузите .zip файл"
        );
        assert_eq!(
            ConversionProfile::RESIZE_JPEG.rejection_message("a.gif"),
            "Файл a.gif не JPEG и не ZIP"
        );
        assert_eq!(
            ConversionProfile::CONVERT_WEBP_RESIZE.no_valid_files_message(),
            "Нет валидных WebP файлов"
        );
        assert_eq!(
            ConversionProfile::CONVERT_ZIP.no_valid_files_message(),
            "Нет валидных WebP файлов в архиве"
        );
        assert_eq!(
            ConversionProfile::RESIZE_JPEG.no_valid_files_message(),
            "Нет валидных JPEG файлов"
        );
    }

    #[test]
    fn test_profile_id_serializes_snake_case() {
        let json = serde_json::to_string(&ProfileId::ConvertZipResize).unwrap();
        assert_eq!(json, "\"convert_zip_resize\"");
    }
}
