//! Local streaming SHA-256 of a remote asset

use super::{AssetHasher, prefixed};
use crate::core::error::{Result, SyncError};
use crate::core::output::{self, ProgressGuard};
use indicatif::ProgressBar;
use sha2::Digest;
use std::io::Read;
use std::time::Duration;

/// Chunk size for reading the response body (1MB)
const CHUNK_SIZE: usize = 1024 * 1024;

/// Timeout for asset downloads
const DOWNLOAD_TIMEOUT_SECS: u64 = 300;

/// Hashes assets by downloading them and digesting the body on the fly.
#[derive(Debug, Clone)]
pub struct StreamingHasher {
    timeout: Duration,
}

impl StreamingHasher {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DOWNLOAD_TIMEOUT_SECS),
        }
    }
}

impl Default for StreamingHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetHasher for StreamingHasher {
    fn compute_hash(&self, url: &str) -> Result<String> {
        output::detail(&format!("downloading {}", url));

        let response = ureq::get(url)
            .timeout(self.timeout)
            .call()
            .map_err(|e| SyncError::network(url, format!("download failed: {}", e)))?;

        let pb = output::spinner(&format!("hashing {}", file_name(url)));
        let _guard = ProgressGuard::new(&pb);
        if let Some(len) = response
            .header("content-length")
            .and_then(|s| s.parse().ok())
        {
            output::upgrade_to_bytes(&pb, len);
        }

        let mut reader = response.into_reader();
        let digest = hash_reader::<sha2::Sha256>(&mut reader, Some(&pb))
            .map_err(|e| SyncError::network(url, format!("read error: {}", e)))?;

        Ok(prefixed(&digest))
    }
}

/// Digest everything `reader` yields, in [`CHUNK_SIZE`] pieces.
///
/// Returns the lowercase hex digest.
pub fn hash_reader<D: Digest>(
    reader: &mut impl Read,
    progress: Option<&ProgressBar>,
) -> std::io::Result<String> {
    let mut hasher = D::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut total_read = 0u64;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        hasher.update(&buffer[..n]);
        total_read += n as u64;

        if let Some(pb) = progress {
            pb.set_position(total_read);
        }
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Last path segment of a URL, for progress messages.
fn file_name(url: &str) -> &str {
    let clean = url.split(['?', '#']).next().unwrap_or(url);
    clean
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(clean)
}

#[cfg(test)]
mod tests {
    use super::*;

    // SHA256 of "hello world"
    const HELLO_SHA256: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    #[test]
    fn test_hash_reader_known_bytes() {
        let mut data: &[u8] = b"hello world";
        let digest = hash_reader::<sha2::Sha256>(&mut data, None).unwrap();
        assert_eq!(digest, HELLO_SHA256);
    }

    #[test]
    fn test_hash_reader_empty_input() {
        let mut data: &[u8] = b"";
        let digest = hash_reader::<sha2::Sha256>(&mut data, None).unwrap();
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_hash_reader_spans_multiple_chunks() {
        let data = vec![0xabu8; CHUNK_SIZE * 2 + 17];
        let streamed = hash_reader::<sha2::Sha256>(&mut data.as_slice(), None).unwrap();
        let reference = hex::encode(sha2::Sha256::digest(&data));
        assert_eq!(streamed, reference);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            file_name("https://example.com/dl/zen.macos-universal.dmg"),
            "zen.macos-universal.dmg"
        );
        assert_eq!(file_name("https://example.com/dl/a.tar.xz?x=1"), "a.tar.xz");
    }

    mod mock_tests {
        use super::*;
        use crate::hash::HASH_PREFIX;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        #[tokio::test]
        async fn test_streaming_hash_matches_reference() {
            let mock_server = MockServer::start().await;

            Mock::given(method("GET"))
                .and(path("/dl/zen.linux-x86_64.tar.xz"))
                .respond_with(ResponseTemplate::new(200).set_body_bytes(b"hello world".to_vec()))
                .mount(&mock_server)
                .await;

            let url = format!("{}/dl/zen.linux-x86_64.tar.xz", mock_server.uri());
            let hash = StreamingHasher::new().compute_hash(&url).unwrap();

            assert_eq!(hash, format!("{}{}", HASH_PREFIX, HELLO_SHA256));
        }

        #[tokio::test]
        async fn test_streaming_hash_download_failure() {
            let mock_server = MockServer::start().await;

            Mock::given(method("GET"))
                .and(path("/dl/missing.dmg"))
                .respond_with(ResponseTemplate::new(404))
                .mount(&mock_server)
                .await;

            let url = format!("{}/dl/missing.dmg", mock_server.uri());
            let err = StreamingHasher::new().compute_hash(&url).unwrap_err();

            assert!(matches!(err, SyncError::Network { .. }));
        }
    }
}
