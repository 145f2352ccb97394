use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use serde::Serialize;

use crate::Error;

/// Sum of all attachment sizes on a single message, in bytes (10 MiB)
pub const MAX_ATTACHMENTS_SIZE: u64 = 10_485_760;

// Base64 line length in the encoded attachment content
const ENCODED_LINE_LENGTH: usize = 76;

/// File extensions Postmark accepts as attachments.
///
/// Matching is case-sensitive: `report.PDF` is rejected.
pub static ALLOWED_EXTENSIONS: &[&str] = &[
    "gif", "jpg", "jpeg", "png", "swf", "flv", "avi", "mpg", "mp3", "wav", "rm", "mov", "psd",
    "ai", "tif", "tiff", "txt", "rtf", "htm", "html", "pdf", "doc", "docx", "ppt", "pptx", "xls",
    "xlsx", "ps", "eps", "log", "csv", "ics", "xml",
];

/// A resolved attachment, ready to be serialized into the payload
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Attachment {
    /// Base file name
    pub name: String,

    /// Base64 content, split into CRLF-terminated lines
    pub content: String,

    /// MIME type inferred from the extension
    pub content_type: String,
}

pub fn is_allowed(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Validate all paths, then read and encode each file.
///
/// Nothing is read until every path exists, has an allowed extension and
/// the combined size fits under `MAX_ATTACHMENTS_SIZE`.
pub fn resolve(paths: &[PathBuf]) -> Result<Vec<Attachment>, Error> {
    let mut total_size: u64 = 0;

    for path in paths {
        if !path.is_file() {
            return Err(Error::AttachmentNotFound(path.clone()));
        }

        if !is_allowed(path) {
            return Err(Error::AttachmentTypeRejected(path.clone()));
        }

        total_size += fs::metadata(path)?.len();
    }

    log::debug!(
        "{} attachment(s), {} bytes total",
        paths.len(),
        total_size
    );

    if total_size > MAX_ATTACHMENTS_SIZE {
        return Err(Error::AttachmentTooLarge {
            total: total_size,
            limit: MAX_ATTACHMENTS_SIZE,
        });
    }

    paths.iter().map(|p| read(p)).collect()
}

fn read(path: &Path) -> Result<Attachment, Error> {
    let data = fs::read(path)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(&data);

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    Ok(Attachment {
        name,
        content: chunk_split(&encoded, ENCODED_LINE_LENGTH),
        content_type,
    })
}

/// Split `data` into lines of `len` characters, each terminated by CRLF
fn chunk_split(data: &str, len: usize) -> String {
    let mut out = String::with_capacity(data.len() + (data.len() / len + 1) * 2);

    // base64 output is ASCII, so byte chunks are char chunks
    for chunk in data.as_bytes().chunks(len) {
        out.push_str(&String::from_utf8_lossy(chunk));
        out.push_str("\r\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn file_with(dir: &tempfile::TempDir, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(data).unwrap();
        path
    }

    fn file_of_size(dir: &tempfile::TempDir, name: &str, size: u64) -> PathBuf {
        let path = dir.path().join(name);
        fs::File::create(&path).unwrap().set_len(size).unwrap();
        path
    }

    #[test]
    fn pdf_is_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let path = file_with(&dir, "invoice.pdf", b"%PDF-1.4");

        let attachments = resolve(&[path]).unwrap();

        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].name, "invoice.pdf");
        assert_eq!(attachments[0].content_type, "application/pdf");
    }

    #[test]
    fn exe_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = file_with(&dir, "setup.exe", b"MZ");

        match resolve(&[path.clone()]) {
            Err(Error::AttachmentTypeRejected(p)) => assert_eq!(p, path),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn extension_check_is_case_sensitive() {
        assert!(is_allowed(Path::new("report.pdf")));
        assert!(!is_allowed(Path::new("report.PDF")));
        assert!(!is_allowed(Path::new("README")));
    }

    #[test]
    fn missing_file_is_named() {
        let path = PathBuf::from("/nonexistent/attachment.txt");

        match resolve(&[path.clone()]) {
            Err(Error::AttachmentNotFound(p)) => assert_eq!(p, path),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn missing_file_reported_before_bad_type() {
        let dir = tempfile::tempdir().unwrap();
        let bad = file_with(&dir, "setup.exe", b"MZ");
        let missing = dir.path().join("gone.txt");

        assert!(matches!(
            resolve(&[missing, bad]),
            Err(Error::AttachmentNotFound(_))
        ));
    }

    #[test]
    fn combined_size_over_limit_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let a = file_of_size(&dir, "a.txt", MAX_ATTACHMENTS_SIZE / 2);
        let b = file_of_size(&dir, "b.txt", MAX_ATTACHMENTS_SIZE / 2 + 1);

        match resolve(&[a, b]) {
            Err(Error::AttachmentTooLarge { total, limit }) => {
                assert_eq!(total, 10_485_761);
                assert_eq!(limit, MAX_ATTACHMENTS_SIZE);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn combined_size_at_limit_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let a = file_of_size(&dir, "a.csv", MAX_ATTACHMENTS_SIZE);

        assert!(resolve(&[a]).is_ok());
    }

    #[test]
    fn content_is_wrapped_base64() {
        let dir = tempfile::tempdir().unwrap();
        let path = file_with(&dir, "notes.txt", &[b'x'; 100]);

        let attachment = &resolve(&[path]).unwrap()[0];
        let lines: Vec<&str> = attachment.content.split("\r\n").collect();

        // 100 bytes -> 136 base64 chars -> 76 + 60, then the trailing CRLF
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].len(), 76);
        assert_eq!(lines[1].len(), 60);
        assert_eq!(lines[2], "");
        assert!(attachment.content.starts_with("eHh4"));
        assert_eq!(attachment.content_type, "text/plain");
    }

    #[test]
    fn serializes_with_provider_field_names() {
        let attachment = Attachment {
            name: "a.txt".to_string(),
            content: "eA==\r\n".to_string(),
            content_type: "text/plain".to_string(),
        };

        let json = serde_json::to_value(&attachment).unwrap();

        assert_eq!(json["Name"], "a.txt");
        assert_eq!(json["Content"], "eA==\r\n");
        assert_eq!(json["ContentType"], "text/plain");
    }
}
