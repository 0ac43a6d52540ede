use crate::utils::error::{Result, SoundError};
use std::net::SocketAddr;
use std::path::Path;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> SoundError {
    SoundError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// 音效端點只接受 http(s)
pub fn validate_url(field_name: &str, url_str: &str) -> Result<Url> {
    let url = Url::parse(url_str.trim())
        .map_err(|e| invalid(field_name, url_str, format!("not a URL ({})", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field_name,
            url_str,
            format!("expected http or https, got {}", url.scheme()),
        ));
    }

    Ok(url)
}

fn check_path_text(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field_name, path, "path is empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path.escape_default(), "path contains a NUL byte"));
    }
    Ok(())
}

/// 輸出目錄可以尚未建立，但不能是已存在的檔案
pub fn validate_dir(field_name: &str, path: &str) -> Result<()> {
    check_path_text(field_name, path)?;
    let dir = Path::new(path);
    if dir.exists() && !dir.is_dir() {
        return Err(invalid(field_name, path, "exists but is not a directory"));
    }
    Ok(())
}

/// 讀取用的檔案必須已經存在
pub fn validate_file(field_name: &str, path: &str) -> Result<()> {
    check_path_text(field_name, path)?;
    if !Path::new(path).is_file() {
        return Err(invalid(field_name, path, "no such file"));
    }
    Ok(())
}

pub fn validate_socket_addr(field_name: &str, addr: &str) -> Result<SocketAddr> {
    addr.parse::<SocketAddr>()
        .map_err(|e| invalid(field_name, addr, format!("Invalid socket address: {}", e)))
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_validate_url() {
        let url = validate_url("client.endpoint", "http://127.0.0.1:5000/generate_sound").unwrap();
        assert_eq!(url.path(), "/generate_sound");
        assert!(validate_url("client.endpoint", "https://example.com/generate_sound").is_ok());
        assert!(validate_url("client.endpoint", "").is_err());
        assert!(validate_url("client.endpoint", "invalid-url").is_err());
        assert!(validate_url("client.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_dir() {
        let temp_dir = TempDir::new().unwrap();
        let file = NamedTempFile::new_in(temp_dir.path()).unwrap();

        assert!(validate_dir("client.save_dir", "./renders").is_ok());
        assert!(validate_dir("client.save_dir", temp_dir.path().to_str().unwrap()).is_ok());
        assert!(validate_dir("client.save_dir", file.path().to_str().unwrap()).is_err());
        assert!(validate_dir("client.save_dir", " ").is_err());
        assert!(validate_dir("client.save_dir", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_file() {
        let file = NamedTempFile::new().unwrap();
        assert!(validate_file("server.default_score", file.path().to_str().unwrap()).is_ok());
        assert!(validate_file("server.default_score", "./no/such/score.txt").is_err());
        assert!(validate_file("server.default_score", "").is_err());
    }

    #[test]
    fn test_validate_socket_addr() {
        assert!(validate_socket_addr("server.bind", "127.0.0.1:5000").is_ok());
        assert!(validate_socket_addr("server.bind", "localhost").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("synth.sample_rate", 44100, 8000, 192_000).is_ok());
        assert!(validate_range("synth.sample_rate", 100, 8000, 192_000).is_err());
        assert!(validate_range("synth.melody_amplitude", 4.5, 0.0, 4.0).is_err());
    }
}
