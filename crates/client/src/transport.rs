//! Transport seam and the reqwest-backed HTTP implementation.
//!
//! Stages talk to the server only through [`Transport`], which keeps the
//! protocol logic independent of HTTP mechanics and testable with mocks.

use std::future::Future;
use std::pin::Pin;

use chunkup_protocol::constants::{FIELD_CHUNK, FIELD_CHUNK_ID, FIELD_CHUNK_MD5, FIELD_FILE_MD5};
use chunkup_protocol::{ChunkFields, Envelope};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};

use crate::config::ClientConfig;
use crate::error::UploadError;

/// Future returned by every [`Transport`] call.
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<Envelope, UploadError>> + Send + 'a>>;

/// Request/response exchange with the upload server.
///
/// Every call resolves to the server's JSON envelope. Transport failures
/// (connection errors, non-2xx status, undecodable body) resolve to `Err`.
pub trait Transport: Send + Sync {
    /// Sends a GET with the given query parameters.
    fn get(&self, url: &str, query: &[(String, String)]) -> TransportFuture<'_>;

    /// POSTs a JSON body.
    fn post_json(&self, url: &str, body: &serde_json::Value) -> TransportFuture<'_>;

    /// POSTs one chunk as `multipart/form-data`.
    fn post_chunk(&self, url: &str, fields: &ChunkFields, data: Vec<u8>) -> TransportFuture<'_>;
}

/// [`Transport`] over HTTP using `reqwest`.
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Builds a client carrying the configured headers and timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, UploadError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| UploadError::Config(format!("invalid header name: {name}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| UploadError::Config(format!("invalid value for header {name}")))?;
            headers.insert(name, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
        })
    }

    /// Wraps an existing `reqwest` client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, query: &[(String, String)]) -> TransportFuture<'_> {
        let req = self.http.get(url).query(query);
        Box::pin(send(req))
    }

    fn post_json(&self, url: &str, body: &serde_json::Value) -> TransportFuture<'_> {
        let req = self.http.post(url).json(body);
        Box::pin(send(req))
    }

    fn post_chunk(&self, url: &str, fields: &ChunkFields, data: Vec<u8>) -> TransportFuture<'_> {
        let part = Part::bytes(data)
            .file_name(format!("{}-{}", fields.file_md5, fields.chunk_id))
            .mime_str("application/octet-stream");
        let req = match part {
            Ok(part) => {
                let form = Form::new()
                    .part(FIELD_CHUNK, part)
                    .text(FIELD_CHUNK_MD5, fields.chunk_md5.clone())
                    .text(FIELD_CHUNK_ID, fields.chunk_id.to_string())
                    .text(FIELD_FILE_MD5, fields.file_md5.clone());
                self.http.post(url).multipart(form)
            }
            Err(e) => return Box::pin(async move { Err(UploadError::Http(e)) }),
        };
        Box::pin(send(req))
    }
}

/// Sends a request and decodes the envelope.
async fn send(req: reqwest::RequestBuilder) -> Result<Envelope, UploadError> {
    let resp = req.send().await?;
    let status = resp.status();

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(UploadError::Api {
            status: status.as_u16(),
            body,
        });
    }

    let body = resp.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
