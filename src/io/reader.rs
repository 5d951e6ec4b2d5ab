//! Input readers for the command line.
//!
//! Message text comes from an argument, a file, or standard input. Files
//! and stdin are capped at the same size and must be valid UTF-8.

use crate::error::{IoError, Result};
use std::io::Read;
use std::path::Path;

/// Maximum input size accepted from a file or stdin (1MB).
const MAX_INPUT_SIZE: u64 = 1024 * 1024;

/// Reads a UTF-8 text file.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the path does not exist, and
/// [`IoError::ReadFailed`] if the file is too large, unreadable, or not
/// valid UTF-8.
///
/// # Examples
///
/// ```no_run
/// use vplink::io::read_text;
///
/// let content = read_text("message.txt").unwrap();
/// ```
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let path_ref = path.as_ref();
    let path_str = path_ref.to_string_lossy().to_string();

    if !path_ref.exists() {
        return Err(IoError::FileNotFound { path: path_str }.into());
    }

    let file = std::fs::File::open(path_ref).map_err(|e| IoError::ReadFailed {
        path: path_str.clone(),
        reason: e.to_string(),
    })?;
    read_limited(file, &path_str)
}

/// Reads all of standard input as UTF-8 text.
///
/// # Errors
///
/// Returns [`IoError::ReadFailed`] if stdin cannot be read, exceeds the
/// size cap, or is not valid UTF-8.
pub fn read_stdin() -> Result<String> {
    read_limited(std::io::stdin().lock(), "<stdin>")
}

/// Returns `text` if given, otherwise reads standard input.
///
/// # Errors
///
/// Propagates errors from [`read_stdin`].
pub fn text_or_stdin(text: Option<&str>) -> Result<String> {
    text.map_or_else(read_stdin, |t| Ok(t.to_string()))
}

/// Returns the message text from whichever source was given: `file` if
/// present, then `text`, falling back to standard input.
///
/// # Errors
///
/// Propagates errors from [`read_text`] and [`read_stdin`].
pub fn read_input(text: Option<&str>, file: Option<&Path>) -> Result<String> {
    file.map_or_else(|| text_or_stdin(text), read_text)
}

fn read_limited<R: Read>(reader: R, source: &str) -> Result<String> {
    let mut bytes = Vec::new();
    reader
        .take(MAX_INPUT_SIZE + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| IoError::ReadFailed {
            path: source.to_string(),
            reason: e.to_string(),
        })?;

    if bytes.len() as u64 > MAX_INPUT_SIZE {
        return Err(IoError::ReadFailed {
            path: source.to_string(),
            reason: format!("input too large (max: {MAX_INPUT_SIZE} bytes)"),
        }
        .into());
    }

    String::from_utf8(bytes).map_err(|e| {
        IoError::ReadFailed {
            path: source.to_string(),
            reason: format!("invalid UTF-8 at byte {}", e.utf8_error().valid_up_to()),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_text() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all("Hello 世界".as_bytes()).unwrap();
        assert_eq!(read_text(file.path()).unwrap(), "Hello 世界");
    }

    #[test]
    fn test_read_text_not_found() {
        let err = read_text("/nonexistent/message.txt").unwrap_err();
        assert!(matches!(err, Error::Io(IoError::FileNotFound { .. })));
    }

    #[test]
    fn test_read_limited_invalid_utf8() {
        let err = read_limited(&[b'a', 0xFF][..], "test").unwrap_err();
        assert!(err.to_string().contains("invalid UTF-8 at byte 1"));
    }

    #[test]
    fn test_read_limited_too_large() {
        let big = vec![b'a'; usize::try_from(MAX_INPUT_SIZE).unwrap() + 1];
        let err = read_limited(&big[..], "test").unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_read_input_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"from a file").unwrap();
        assert_eq!(read_input(None, Some(file.path())).unwrap(), "from a file");
        assert_eq!(read_input(Some("given"), None).unwrap(), "given");
    }

    #[test]
    fn test_read_input_invalid_utf8_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[b'o', b'k', 0xC3]).unwrap();
        let err = read_input(None, Some(file.path())).unwrap_err();
        assert!(matches!(err, Error::Io(IoError::ReadFailed { .. })));
    }

    #[test]
    fn test_text_or_stdin_prefers_argument() {
        assert_eq!(text_or_stdin(Some("given")).unwrap(), "given");
    }
}
