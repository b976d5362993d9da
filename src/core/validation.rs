use super::errors::ValidationError;
use super::models::UploadCandidate;

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "docx", "doc"];
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

const SIZE_UNITS: [&str; 3] = ["KB", "MB", "GB"];

/// An upload that passed the gate. Only this type can be submitted for analysis.
#[derive(Debug, Clone)]
pub struct ValidatedUpload(UploadCandidate);

impl ValidatedUpload {
    pub fn candidate(&self) -> &UploadCandidate {
        &self.0
    }

    pub fn file_name(&self) -> &str {
        &self.0.file_name
    }

    pub fn size_bytes(&self) -> u64 {
        self.0.size_bytes
    }
}

pub fn validate_upload(candidate: UploadCandidate) -> Result<ValidatedUpload, ValidationError> {
    if !has_allowed_extension(&candidate.file_name) {
        return Err(ValidationError::UnsupportedFileType);
    }

    if candidate.size_bytes > MAX_UPLOAD_BYTES {
        return Err(ValidationError::FileTooLarge {
            size: format_file_size(candidate.size_bytes),
            limit: format_file_size(MAX_UPLOAD_BYTES),
        });
    }

    Ok(ValidatedUpload(candidate))
}

pub fn has_allowed_extension(file_name: &str) -> bool {
    let Some((_, extension)) = file_name.rsplit_once('.') else {
        return false;
    };

    ALLOWED_EXTENSIONS
        .iter()
        .any(|allowed| extension.eq_ignore_ascii_case(allowed))
}

pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{value:.2} {}", SIZE_UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, size: u64) -> UploadCandidate {
        UploadCandidate {
            file_name: name.to_string(),
            size_bytes: size,
            content: super::super::models::UploadContent::Memory(bytes::Bytes::new()),
        }
    }

    #[test]
    fn accepts_supported_extensions_in_any_case() {
        for name in ["resume.pdf", "Resume.PDF", "cv.final.docx", "old.Doc", ".pdf"] {
            assert!(has_allowed_extension(name), "{name} should be accepted");
        }
    }

    #[test]
    fn rejects_other_extensions() {
        for name in ["resume.txt", "resume.pdf.exe", "resume", "pdf", "resume.", "notes.docxx"] {
            assert!(!has_allowed_extension(name), "{name} should be rejected");
        }
    }

    #[test]
    fn unsupported_type_has_fixed_message() {
        let err = validate_upload(candidate("photo.png", 10)).unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedFileType);
        assert_eq!(err.to_string(), "unsupported file type");
    }

    #[test]
    fn size_limit_is_inclusive() {
        assert!(validate_upload(candidate("cv.pdf", MAX_UPLOAD_BYTES)).is_ok());
        assert!(validate_upload(candidate("cv.pdf", 0)).is_ok());
        assert!(validate_upload(candidate("cv.pdf", MAX_UPLOAD_BYTES + 1)).is_err());
    }

    #[test]
    fn oversize_message_carries_both_sizes() {
        let err = validate_upload(candidate("cv.docx", 12 * 1024 * 1024)).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("12.00 MB"), "{message}");
        assert!(message.contains("10.00 MB"), "{message}");
    }

    #[test]
    fn extension_is_checked_before_size() {
        let err = validate_upload(candidate("huge.zip", MAX_UPLOAD_BYTES * 2)).unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedFileType);
    }

    #[test]
    fn formats_sizes_with_escalating_units() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1023), "1023 B");
        assert_eq!(format_file_size(1024), "1.00 KB");
        assert_eq!(format_file_size(1_048_576), "1.00 MB");
        assert_eq!(format_file_size(2_621_440), "2.50 MB");
        assert_eq!(format_file_size(10_485_760), "10.00 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3.00 GB");
        assert_eq!(format_file_size(2048 * 1024 * 1024 * 1024), "2048.00 GB");
    }

    #[test]
    fn validated_upload_keeps_candidate() {
        let upload = validate_upload(candidate("cv.pdf", 100)).unwrap();
        assert_eq!(upload.file_name(), "cv.pdf");
        assert_eq!(upload.size_bytes(), 100);
    }
}
