//! Upload intake: multipart parsing, extension checks, and filename sanitization.

use axum::extract::Multipart;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Extensions (lowercase, without the dot) accepted for upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf"];

/// Multipart field carrying the document.
pub const FILE_FIELD: &str = "file";

const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "AUX", "COM1", "COM2", "COM3", "COM4", "LPT1", "LPT2", "LPT3", "PRN", "NUL",
];

/// Errors raised while reading the multipart body.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The body could not be decoded as multipart form data.
    #[error("Failed to read form field: {0}")]
    Multipart(String),
}

/// A file received from the upload form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// File name exactly as sent by the client.
    pub filename: String,
    /// Raw file contents.
    pub data: Vec<u8>,
}

/// Whether `filename` has an allowed extension (text after the last `.`, case-insensitive).
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, extension)| {
            ALLOWED_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str())
        })
}

/// Reduce a client-supplied name to a safe, flat file name.
///
/// The name is NFKD-decomposed first so accented letters keep their base letter. Only ASCII
/// letters, digits, `_`, `.` and `-` survive; path separators and runs of whitespace become
/// single `_`; leading and trailing `.`/`_` are stripped. The result may be empty.
pub fn secure_filename(filename: &str) -> String {
    let decomposed: String = filename.nfkd().collect();
    let flattened = decomposed.replace(['/', '\\'], " ");
    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    let mut name = kept.trim_matches(['.', '_']).to_string();

    let stem = name.split('.').next().unwrap_or_default().to_ascii_uppercase();
    if !name.is_empty() && WINDOWS_DEVICE_NAMES.contains(&stem.as_str()) {
        name.insert(0, '_');
    }
    name
}

/// Read the document field from a multipart body, ignoring every other field.
///
/// Returns `Ok(None)` when the form carried no `file` field.
pub async fn parse_upload(mut multipart: Multipart) -> Result<Option<UploadedFile>, UploadError> {
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| UploadError::Multipart(error.to_string()))?
    {
        if field.name() == Some(FILE_FIELD) && file.is_none() {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|error| UploadError::Multipart(error.to_string()))?
                .to_vec();
            file = Some(UploadedFile { filename, data });
        } else {
            field
                .bytes()
                .await
                .map_err(|error| UploadError::Multipart(error.to_string()))?;
        }
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_file_checks_last_extension_case_insensitively() {
        assert!(allowed_file("invoice.pdf"));
        assert!(allowed_file("SCAN.PDF"));
        assert!(allowed_file("archive.tar.pdf"));
        assert!(!allowed_file("readme.txt"));
        assert!(!allowed_file("report.pdf.exe"));
        assert!(!allowed_file("pdf"));
        assert!(!allowed_file(""));
    }

    #[test]
    fn secure_filename_flattens_paths_and_spaces() {
        assert_eq!(secure_filename("My cool movie.mov"), "My_cool_movie.mov");
        assert_eq!(secure_filename("../../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("C:\\Users\\me\\q3 report.pdf"), "C_Users_me_q3_report.pdf");
    }

    #[test]
    fn secure_filename_drops_unsafe_characters() {
        assert_eq!(secure_filename("in<voi>ce?.pdf"), "invoice.pdf");
        assert_eq!(secure_filename("résumé.pdf"), "resume.pdf");
        assert_eq!(secure_filename("Ångström ﬁle.pdf"), "Angstrom_file.pdf");
        assert_eq!(secure_filename("日本語.pdf"), "pdf");
        assert_eq!(secure_filename("...."), "");
    }

    #[test]
    fn secure_filename_guards_windows_device_names() {
        assert_eq!(secure_filename("con.pdf"), "_con.pdf");
        assert_eq!(secure_filename("console.pdf"), "console.pdf");
    }
}
