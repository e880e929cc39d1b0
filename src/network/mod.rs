pub mod art;
pub mod state;

pub use art::HttpImageProvider;
pub use state::HttpStateProvider;

use std::time::Duration;

use crate::error::{FetchError, LoadError};
use crate::types::PlaybackState;

/// Source of playback snapshots
pub trait StateProvider {
    fn poll(&mut self) -> Result<PlaybackState, LoadError>;
}

/// Source of encoded album art bytes
pub trait ImageProvider {
    fn fetch_bytes(&mut self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Blocking client shared by the state and art providers
///
/// Every request carries `timeout`; a timeout surfaces as a recoverable
/// `FetchError`, never a stall of the render loop past that bound.
pub fn build_client(timeout: Duration, insecure: bool) -> Result<reqwest::blocking::Client, FetchError> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .danger_accept_invalid_certs(insecure)
        .build()
        .map_err(FetchError::Client)
}

/// GET `url` and return the body, non-2xx is an error
pub(crate) fn get_bytes(client: &reqwest::blocking::Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let response = client.get(url).send().map_err(|source| FetchError::Request {
        url: url.to_string(),
        source,
    })?;

    if !response.status().is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let body = response.bytes().map_err(|source| FetchError::Body {
        url: url.to_string(),
        source,
    })?;
    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Answer one connection per canned response, in order
    fn serve(responses: Vec<String>) -> (String, thread::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let mut request_lines = Vec::new();
            for response in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut request = Vec::new();
                let mut chunk = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = stream.read(&mut chunk).unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&chunk[..n]);
                }
                let text = String::from_utf8_lossy(&request);
                request_lines.push(text.lines().next().unwrap_or_default().to_string());
                stream.write_all(response.as_bytes()).unwrap();
            }
            request_lines
        });
        (base, handle)
    }

    fn response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    fn client() -> reqwest::blocking::Client {
        // Ignore any proxy configured in the environment
        reqwest::blocking::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    #[test]
    fn test_state_poll_error_classes() {
        let (base, server) = serve(vec![
            response("404 Not Found", "nope"),
            response("200 OK", "<html>not json</html>"),
            response("200 OK", "[1, 2, 3]"),
            response("200 OK", r#"{"track_title": "Song", "artist_list": ["Band"], "is_playing": true}"#),
        ]);
        let endpoint = format!("{}/state", base);
        let mut provider = HttpStateProvider::new(client(), endpoint.clone());

        match provider.poll() {
            Err(LoadError::Fetch(FetchError::Status { url, status })) => {
                assert_eq!(status, 404);
                assert_eq!(url, endpoint);
            }
            other => panic!("expected HTTP 404, got {:?}", other),
        }
        assert!(matches!(provider.poll(), Err(LoadError::Decode(DecodeError::Json(_)))));
        assert!(matches!(provider.poll(), Err(LoadError::Decode(DecodeError::NotAnObject))));

        let state = provider.poll().unwrap();
        assert_eq!(state.track, "Song");
        assert_eq!(state.artist, "Band");
        assert!(state.is_playing);

        let requests = server.join().unwrap();
        assert_eq!(requests.len(), 4);
        assert!(requests.iter().all(|line| line.starts_with("GET /state ")));
    }

    #[test]
    fn test_image_fetch_returns_body_verbatim() {
        let (base, server) = serve(vec![
            response("200 OK", "\u{1}\u{2}PNG-ish"),
            response("500 Internal Server Error", ""),
        ]);
        let mut provider = HttpImageProvider::new(client());
        let url = format!("{}/cover.jpg", base);

        assert_eq!(provider.fetch_bytes(&url).unwrap(), b"\x01\x02PNG-ish".to_vec());
        assert!(matches!(
            provider.fetch_bytes(&url),
            Err(FetchError::Status { status: 500, .. })
        ));
        server.join().unwrap();
    }

    #[test]
    fn test_unreachable_host_is_request_error() {
        // Grab a free port, then close it so nothing is listening
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{}/state", port);
        let err = get_bytes(&client(), &url).unwrap_err();
        assert!(matches!(err, FetchError::Request { .. }), "{:?}", err);
    }
}
