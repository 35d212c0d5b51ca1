//! Schema retrieval over HTTP or from disk.

use serde_json::Value;
use std::path::PathBuf;

/// Sent with every HTTP request.
pub const USER_AGENT: &str = concat!("declgen/", env!("CARGO_PKG_VERSION"));

/// A fetched schema: the exact text (fingerprinted) and its parsed form.
#[derive(Debug, Clone)]
pub struct FetchedSchema {
    pub text: String,
    pub json: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("failed to read response body from {url}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("schema is not valid JSON")]
    Json(#[source] serde_json::Error),
}

/// Fetch a schema from an `http(s)://` URL, a `file://` URL, or a path.
pub fn fetch_schema(source: &str) -> Result<FetchedSchema, FetchError> {
    let text = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_http(source)?
    } else {
        let path = PathBuf::from(source.strip_prefix("file://").unwrap_or(source));
        std::fs::read_to_string(&path).map_err(|source| FetchError::Io { path, source })?
    };

    let json = serde_json::from_str(&text).map_err(FetchError::Json)?;
    tracing::info!(source, bytes = text.len(), "fetched schema");
    Ok(FetchedSchema { text, json })
}

fn fetch_http(url: &str) -> Result<String, FetchError> {
    // ureq reports non-2xx statuses as `Error::Status`
    let response = ureq::get(url)
        .set("User-Agent", USER_AGENT)
        .set("Accept", "application/json")
        .call()
        .map_err(|source| FetchError::Http {
            url: url.to_string(),
            source: Box::new(source),
        })?;

    tracing::debug!(url, status = response.status(), "schema response");

    response.into_string().map_err(|source| FetchError::Body {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fetch_from_path_and_file_url() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, r#"{ "type": "object" }"#).unwrap();

        let plain = fetch_schema(path.to_str().unwrap()).unwrap();
        assert_eq!(plain.text, r#"{ "type": "object" }"#);
        assert_eq!(plain.json["type"], "object");

        let url = format!("file://{}", path.display());
        let via_url = fetch_schema(&url).unwrap();
        assert_eq!(via_url.text, plain.text);
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, "<html>not json</html>").unwrap();
        assert!(matches!(
            fetch_schema(path.to_str().unwrap()),
            Err(FetchError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            fetch_schema(missing.to_str().unwrap()),
            Err(FetchError::Io { .. })
        ));
    }

    #[test]
    fn test_user_agent_names_the_tool() {
        assert!(USER_AGENT.starts_with("declgen/"));
    }
}
