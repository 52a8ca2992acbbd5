use std::time::Duration;

use reqwest::{StatusCode, blocking::Client, redirect::Policy};
use tracing::debug;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Blocking HTTP access to the thumbnail host.
///
/// Meant to be driven from a blocking worker, never from the UI thread.
pub struct ThumbnailClient {
    /// Follows redirects, for fetching the image itself
    http: Client,
    /// Never follows redirects: a 3xx answer to a probe is a miss
    probe_http: Client,
    probe_timeout: Duration,
    download_timeout: Duration,
}

impl ThumbnailClient {
    pub fn new(probe_timeout: Duration, download_timeout: Duration) -> reqwest::Result<Self> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        let probe_http = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(Policy::none())
            .build()?;
        Ok(Self {
            http,
            probe_http,
            probe_timeout,
            download_timeout,
        })
    }

    /// HEAD request; only the status matters.
    pub fn probe(&self, url: &str) -> reqwest::Result<StatusCode> {
        let resp = self
            .probe_http
            .head(url)
            .timeout(self.probe_timeout)
            .send()?;
        debug!(url, status = %resp.status(), "probe");
        Ok(resp.status())
    }

    /// GET the image body. Non-success statuses are errors.
    pub fn download(&self, url: &str) -> reqwest::Result<Vec<u8>> {
        let bytes = self
            .http
            .get(url)
            .timeout(self.download_timeout)
            .send()?
            .error_for_status()?
            .bytes()?;
        debug!(url, len = bytes.len(), "downloaded");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;

    use super::*;
    use crate::error::FetchError;

    /// Serves canned responses on loopback until the test process exits.
    ///
    /// `/moved` redirects to `/target`, `/target` answers 200 with a small
    /// body, everything else is a 404.
    fn serve() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let mut reader = BufReader::new(stream.try_clone().unwrap());

                let mut request_line = String::new();
                reader.read_line(&mut request_line).unwrap();
                loop {
                    let mut header = String::new();
                    if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
                        break;
                    }
                }

                let path = request_line.split_whitespace().nth(1).unwrap_or("/");
                let response = match path {
                    "/moved" => "HTTP/1.1 302 Found\r\nLocation: /target\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string(),
                    "/target" => "HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\nimage".to_string(),
                    _ => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string(),
                };
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}")
    }

    fn client() -> ThumbnailClient {
        ThumbnailClient::new(Duration::from_secs(5), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_probe_reports_missing_as_status() {
        let base = serve();
        let status = client().probe(&format!("{base}/missing.jpg")).unwrap();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_probe_does_not_follow_redirects() {
        let base = serve();
        let status = client().probe(&format!("{base}/moved")).unwrap();
        assert_eq!(status, StatusCode::FOUND);
    }

    #[test]
    fn test_probe_ok() {
        let base = serve();
        assert_eq!(client().probe(&format!("{base}/target")).unwrap(), StatusCode::OK);
    }

    #[test]
    fn test_download_follows_redirects() {
        let base = serve();
        let bytes = client().download(&format!("{base}/moved")).unwrap();
        assert_eq!(bytes, b"image");
    }

    #[test]
    fn test_download_rejects_error_status() {
        let base = serve();
        let err = client().download(&format!("{base}/missing.jpg")).unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));

        let msg = FetchError::from(err).to_string();
        assert!(msg.starts_with("Network error: "), "{msg}");
    }
}
