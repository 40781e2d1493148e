//! File name helpers.

/// Last path component of an uploaded name or archive entry.
///
/// Both `/` and `\` are treated as separators since browsers on Windows may
/// send either.
pub fn file_name(name: &str) -> &str {
    name.rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(name)
}

/// File name without its last extension.
///
/// `a/b/photo.final.webp` -> `photo.final`. Leading-dot names keep the dot.
pub fn file_stem(name: &str) -> &str {
    let base = file_name(name);
    match base.rfind('.') {
        Some(0) | None => base,
        Some(idx) => &base[..idx],
    }
}

/// Case-insensitive check that `name` ends with `.ext` for one of `extensions`.
pub fn has_extension(name: &str, extensions: &[&str]) -> bool {
    let lower = name.to_lowercase();
    extensions.iter().any(|ext| {
        lower
            .strip_suffix(ext)
            .is_some_and(|rest| rest.ends_with('.'))
    })
}

/// Whether `name` looks like a ZIP archive.
pub fn is_zip_name(name: &str) -> bool {
    has_extension(name, &["zip"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("photo.webp"), "photo");
        assert_eq!(file_stem("nested/dir/photo.webp"), "photo");
        assert_eq!(file_stem("C:\\Users\\me\\photo.jpeg"), "photo");
        assert_eq!(file_stem("photo.final.webp"), "photo.final");
        assert_eq!(file_stem("noext"), "noext");
        assert_eq!(file_stem(".hidden"), ".hidden");
    }

    #[test]
    fn test_has_extension_is_case_insensitive() {
        assert!(has_extension("a.webp", &["webp"]));
        assert!(has_extension("A.WEBP", &["webp"]));
        assert!(has_extension("b.JPeG", &["jpg", "jpeg"]));
        assert!(!has_extension("photo.png", &["webp"]));
        assert!(!has_extension("webp", &["webp"]));
        assert!(!has_extension("photowebp", &["webp"]));
    }

    #[test]
    fn test_is_zip_name() {
        assert!(is_zip_name("batch.zip"));
        assert!(is_zip_name("BATCH.ZIP"));
        assert!(!is_zip_name("batch.zip.webp"));
    }
}
