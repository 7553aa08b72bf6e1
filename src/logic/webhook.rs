// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Delivery of packaged submissions to the webhook.

use reqwest::blocking::Client;
use tracing::{info, warn};

use crate::error::SubmitError;
use crate::logic::packager::{Payload, build_payload};
use crate::models::submission::DraftSubmission;

/// Sends one payload and reports the outcome.
pub trait Transport: Send + Sync {
    /// POST the payload; `Ok` carries the response body text of a 2xx answer.
    fn post(&self, payload: Payload) -> Result<String, SubmitError>;
}

/// Multipart POST over HTTP(S). No request timeout is configured.
pub struct HttpTransport {
    client: Client,
    url: String,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

impl Transport for HttpTransport {
    fn post(&self, payload: Payload) -> Result<String, SubmitError> {
        let files = payload.file_count();
        let form = payload.into_form()?;

        info!(url = %self.url, files, "Posting submission");
        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Webhook rejected submission");
            return Err(SubmitError::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.text().map_err(classify)?;
        info!(status = status.as_u16(), bytes = body.len(), "Submission accepted");
        Ok(body)
    }
}

/// Package a validated draft and deliver it in a single attempt.
pub fn submit_draft(
    draft: &DraftSubmission,
    transport: &dyn Transport,
) -> Result<String, SubmitError> {
    let payload = build_payload(draft)?;
    transport.post(payload)
}

/// Failures before a response arrives are connectivity problems.
fn classify(err: reqwest::Error) -> SubmitError {
    if err.is_connect() || err.is_timeout() || err.is_request() {
        warn!(error = %err, "Webhook unreachable");
        SubmitError::Connectivity
    } else {
        warn!(error = %err, "Webhook request failed");
        SubmitError::Unknown(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::logic::packager::{FILE_FIELD, Part, PartBody};

    /// Serve one canned response; the raw request is sent back over the channel.
    fn one_shot_server(response: &'static str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/webhook", listener.local_addr().unwrap());
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            stream
                .set_read_timeout(Some(Duration::from_secs(2)))
                .unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            while let Ok(n) = stream.read(&mut buf) {
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }
            stream.write_all(response.as_bytes()).unwrap();
            let _ = tx.send(String::from_utf8_lossy(&request).into_owned());
        });

        (url, rx)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let headers = text[..header_end].to_ascii_lowercase();
        let body_len = raw.len() - (header_end + 4);
        if let Some(length) = headers
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
        {
            return body_len >= length;
        }
        text.ends_with("0\r\n\r\n")
    }

    fn sample_payload() -> Payload {
        Payload {
            parts: vec![
                Part {
                    name: FILE_FIELD.into(),
                    body: PartBody::File {
                        file_name: "a.pdf".into(),
                        mime: "application/pdf".into(),
                        bytes: b"%PDF".to_vec(),
                    },
                },
                Part {
                    name: "cliente".into(),
                    body: PartBody::Text("Acme".into()),
                },
            ],
        }
    }

    #[test]
    fn success_returns_body_text() {
        let (url, rx) = one_shot_server(
            "HTTP/1.1 200 OK\r\nContent-Length: 8\r\nConnection: close\r\n\r\naccepted",
        );

        let body = HttpTransport::new(url).post(sample_payload()).unwrap();

        assert_eq!(body, "accepted");
        let request = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(request.starts_with("POST /webhook"));
        assert!(request.contains("multipart/form-data"));
        assert!(request.contains("name=\"data\"; filename=\"a.pdf\""));
        assert!(request.contains("name=\"cliente\""));
    }

    #[test]
    fn non_success_status_is_reported() {
        let (url, _rx) = one_shot_server(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );

        let err = HttpTransport::new(url).post(sample_payload()).unwrap_err();

        assert_eq!(
            err,
            SubmitError::Status {
                status: 500,
                status_text: "Internal Server Error".into()
            }
        );
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn refused_connection_is_connectivity_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let err = HttpTransport::new(format!("http://127.0.0.1:{port}/webhook"))
            .post(sample_payload())
            .unwrap_err();

        assert_eq!(err, SubmitError::Connectivity);
    }

    #[test]
    fn invalid_part_mime_is_unknown_error() {
        let payload = Payload {
            parts: vec![Part {
                name: FILE_FIELD.into(),
                body: PartBody::File {
                    file_name: "a.bin".into(),
                    mime: "not a mime".into(),
                    bytes: Vec::new(),
                },
            }],
        };

        let err = HttpTransport::new("http://127.0.0.1:9/webhook")
            .post(payload)
            .unwrap_err();

        assert!(matches!(err, SubmitError::Unknown(msg) if msg.contains("Invalid content type")));
    }
}
