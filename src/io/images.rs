use std::fs;
use std::path::{Path, PathBuf};

use base64::{Engine as _, engine::general_purpose::STANDARD};

/// Error type for turning picture files into stored blobs
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("could not read image {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unsupported image type: {0}")]
    UnsupportedType(PathBuf),
    #[error("image file is empty: {0}")]
    Empty(PathBuf),
}

fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(mime)
}

/// Encode a picture file as a `data:` URL for storage in an event.
pub fn encode_image(path: &Path) -> Result<String, ImageError> {
    let mime = mime_for(path).ok_or_else(|| ImageError::UnsupportedType(path.to_path_buf()))?;
    let bytes = fs::read(path).map_err(|e| ImageError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    if bytes.is_empty() {
        return Err(ImageError::Empty(path.to_path_buf()));
    }
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn encodes_png_as_data_url() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seal.PNG");
        fs::write(&path, b"\x89PNG").unwrap();
        assert_eq!(encode_image(&path).unwrap(), "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, b"hello").unwrap();
        assert!(matches!(encode_image(&path), Err(ImageError::UnsupportedType(_))));
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            encode_image(&dir.path().join("gone.jpg")),
            Err(ImageError::ReadError { .. })
        ));
    }

    #[test]
    fn empty_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blank.gif");
        fs::write(&path, b"").unwrap();
        assert!(matches!(encode_image(&path), Err(ImageError::Empty(_))));
    }
}
