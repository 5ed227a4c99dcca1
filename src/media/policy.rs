//! Upload allow-list and limits.

use crate::config::UploadsConfig;
use crate::{EstateError, Result};

/// Content types accepted for listing media.
const ALLOWED_TYPES: &[(&str, MediaKind)] = &[
    ("image/jpeg", MediaKind::Photo),
    ("image/png", MediaKind::Photo),
    ("video/mp4", MediaKind::Video),
];

/// Extensions accepted for listing media.
const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "mp4"];

/// Whether an upload is a photo or a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
}

/// A file received from a client, fully buffered.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub kind: MediaKind,
    pub content: Vec<u8>,
}

/// Limits applied to listing uploads.
#[derive(Debug, Clone, Copy)]
pub struct UploadPolicy {
    /// Per-file ceiling in bytes.
    pub max_file_size: u64,
    /// Files per listing.
    pub max_files: usize,
}

impl UploadPolicy {
    pub fn from_config(config: &UploadsConfig) -> Self {
        Self {
            max_file_size: config.max_file_size_mb.saturating_mul(1024 * 1024),
            max_files: config.max_files,
        }
    }

    /// Largest request body a listing submission can need.
    pub fn body_limit(&self) -> usize {
        let files = self.max_file_size.saturating_mul(self.max_files as u64);
        usize::try_from(files.saturating_add(1024 * 1024)).unwrap_or(usize::MAX)
    }

    /// Classify a file by its name and declared content type.
    ///
    /// Both the extension and the content type must be on the allow-list;
    /// the content type decides photo versus video.
    pub fn classify(&self, file_name: &str, content_type: Option<&str>) -> Result<MediaKind> {
        let ext_ok = std::path::Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| ALLOWED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));

        let guessed_ok = mime_guess::from_path(file_name)
            .iter()
            .any(|m| ALLOWED_TYPES.iter().any(|(t, _)| m.essence_str() == *t));

        let declared = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase());
        let kind = declared.as_deref().and_then(|ct| {
            ALLOWED_TYPES
                .iter()
                .find(|(t, _)| *t == ct)
                .map(|(_, kind)| *kind)
        });

        match kind {
            Some(kind) if ext_ok && guessed_ok => Ok(kind),
            _ => Err(EstateError::Validation(format!(
                "Unsupported file type: {file_name} (allowed: jpeg, jpg, png, mp4)"
            ))),
        }
    }

    /// Reject content above the per-file ceiling.
    pub fn check_size(&self, file_name: &str, len: u64) -> Result<()> {
        if len > self.max_file_size {
            return Err(EstateError::Validation(format!(
                "File too large: {file_name} (max {}MB)",
                self.max_file_size / 1024 / 1024
            )));
        }
        Ok(())
    }

    /// Reject a submission with more files than allowed.
    pub fn check_count(&self, count: usize) -> Result<()> {
        if count > self.max_files {
            return Err(EstateError::Validation(format!(
                "Too many files (max {})",
                self.max_files
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> UploadPolicy {
        UploadPolicy::from_config(&UploadsConfig::default())
    }

    #[test]
    fn test_from_config() {
        let policy = policy();
        assert_eq!(policy.max_file_size, 50 * 1024 * 1024);
        assert_eq!(policy.max_files, 5);
        assert_eq!(policy.body_limit(), 251 * 1024 * 1024);
    }

    #[test]
    fn test_classify_allowed() {
        let p = policy();
        assert_eq!(p.classify("a.jpg", Some("image/jpeg")).unwrap(), MediaKind::Photo);
        assert_eq!(p.classify("a.jpeg", Some("image/jpeg")).unwrap(), MediaKind::Photo);
        assert_eq!(p.classify("a.png", Some("image/png")).unwrap(), MediaKind::Photo);
        assert_eq!(p.classify("A.PNG", Some("IMAGE/PNG")).unwrap(), MediaKind::Photo);
        assert_eq!(p.classify("tour.mp4", Some("video/mp4")).unwrap(), MediaKind::Video);
    }

    #[test]
    fn test_classify_rejected() {
        let p = policy();
        assert!(p.classify("a.gif", Some("image/gif")).is_err());
        assert!(p.classify("a.jpg", Some("image/gif")).is_err());
        assert!(p.classify("a.gif", Some("image/jpeg")).is_err());
        assert!(p.classify("a.jpg", None).is_err());
        assert!(p.classify("noext", Some("image/jpeg")).is_err());
        assert!(p.classify("script.js", Some("application/javascript")).is_err());
    }

    #[test]
    fn test_check_size() {
        let p = UploadPolicy {
            max_file_size: 10,
            max_files: 5,
        };
        assert!(p.check_size("a.jpg", 10).is_ok());
        assert!(p.check_size("a.jpg", 11).is_err());
    }

    #[test]
    fn test_check_count() {
        let p = policy();
        assert!(p.check_count(5).is_ok());
        assert!(p.check_count(6).is_err());
    }
}
