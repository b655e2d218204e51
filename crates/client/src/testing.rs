//! Test doubles shared by the stage and orchestrator tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use chunkup_protocol::{ChunkFields, Envelope};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::config::ClientConfig;
use crate::error::UploadError;
use crate::transport::{Transport, TransportFuture};

pub const CHECK_URL: &str = "http://mock/check";
pub const UPLOAD_URL: &str = "http://mock/upload";
pub const MERGE_URL: &str = "http://mock/merge";
pub const PROCESS_URL: &str = "http://mock/process";

pub fn test_config() -> ClientConfig {
    ClientConfig::new(CHECK_URL, UPLOAD_URL, MERGE_URL)
}

// ---------------------------------------------------------------------------
// Envelope helpers
// ---------------------------------------------------------------------------

pub fn check_complete(path: &str) -> Envelope {
    Envelope::success(Some(&serde_json::json!({
        "status": true,
        "path": path,
        "chunk_ids": [],
    })))
    .unwrap()
}

pub fn check_missing(ids: &[usize]) -> Envelope {
    Envelope::success(Some(&serde_json::json!({
        "status": false,
        "chunk_ids": ids,
    })))
    .unwrap()
}

pub fn ok_with(data: serde_json::Value) -> Envelope {
    Envelope::success(Some(&data)).unwrap()
}

// ---------------------------------------------------------------------------
// MockTransport
// ---------------------------------------------------------------------------

/// A request observed by [`MockTransport`].
#[derive(Debug, Clone)]
pub enum Call {
    Get {
        url: String,
        query: Vec<(String, String)>,
    },
    PostJson {
        url: String,
        body: serde_json::Value,
    },
    Chunk {
        fields: ChunkFields,
        len: usize,
    },
}

/// When one chunk request started and finished.
#[derive(Debug, Clone, Copy)]
pub struct ChunkSpan {
    pub index: usize,
    pub started: Instant,
    pub finished: Instant,
}

/// Scripted transport that records every request.
#[derive(Default)]
pub struct MockTransport {
    check: Option<Envelope>,
    merge: Option<Envelope>,
    process: Option<Envelope>,
    /// Chunks answered with a non-success `response_code`.
    rejected_chunks: HashSet<usize>,
    /// Chunks whose request fails at the transport level.
    erroring_chunks: HashSet<usize>,
    chunk_delay: Duration,
    /// Per-chunk delays overriding `chunk_delay`.
    slow_chunks: HashMap<usize, Duration>,
    calls: Mutex<Vec<Call>>,
    timeline: Mutex<Vec<ChunkSpan>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_check(mut self, env: Envelope) -> Self {
        self.check = Some(env);
        self
    }

    pub fn with_merge(mut self, env: Envelope) -> Self {
        self.merge = Some(env);
        self
    }

    pub fn with_process(mut self, env: Envelope) -> Self {
        self.process = Some(env);
        self
    }

    pub fn rejecting_chunk(mut self, index: usize) -> Self {
        self.rejected_chunks.insert(index);
        self
    }

    pub fn erroring_chunk(mut self, index: usize) -> Self {
        self.erroring_chunks.insert(index);
        self
    }

    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    pub fn with_slow_chunk(mut self, index: usize, delay: Duration) -> Self {
        self.slow_chunks.insert(index, delay);
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Chunk indices sent, sorted.
    pub fn chunk_ids_sent(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Chunk { fields, .. } => Some(fields.chunk_id),
                _ => None,
            })
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn chunk_calls(&self) -> Vec<(ChunkFields, usize)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Chunk { fields, len } => Some((fields, len)),
                _ => None,
            })
            .collect()
    }

    /// JSON bodies posted to `url`.
    pub fn json_bodies(&self, url: &str) -> Vec<serde_json::Value> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::PostJson { url: u, body } if u == url => Some(body),
                _ => None,
            })
            .collect()
    }

    pub fn get_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Get { .. }))
            .count()
    }

    /// Start and finish of every chunk request, in completion order.
    pub fn chunk_timeline(&self) -> Vec<ChunkSpan> {
        self.timeline.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn not_scripted(url: &str) -> UploadError {
    UploadError::Api {
        status: 404,
        body: format!("no scripted reply for {url}"),
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str, query: &[(String, String)]) -> TransportFuture<'_> {
        self.record(Call::Get {
            url: url.to_string(),
            query: query.to_vec(),
        });
        let reply = self.check.clone().ok_or_else(|| not_scripted(url));
        Box::pin(async move { reply })
    }

    fn post_json(&self, url: &str, body: &serde_json::Value) -> TransportFuture<'_> {
        self.record(Call::PostJson {
            url: url.to_string(),
            body: body.clone(),
        });
        let reply = if url == MERGE_URL {
            self.merge.clone()
        } else {
            self.process.clone()
        }
        .ok_or_else(|| not_scripted(url));
        Box::pin(async move { reply })
    }

    fn post_chunk(&self, _url: &str, fields: &ChunkFields, data: Vec<u8>) -> TransportFuture<'_> {
        let fields = fields.clone();
        Box::pin(async move {
            let started = Instant::now();
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let index = fields.chunk_id;
            let delay = self
                .slow_chunks
                .get(&index)
                .copied()
                .unwrap_or(self.chunk_delay);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            self.timeline.lock().unwrap().push(ChunkSpan {
                index,
                started,
                finished: Instant::now(),
            });
            self.record(Call::Chunk {
                fields,
                len: data.len(),
            });
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.erroring_chunks.contains(&index) {
                return Err(UploadError::Api {
                    status: 502,
                    body: "bad gateway".into(),
                });
            }
            if self.rejected_chunks.contains(&index) {
                return Ok(Envelope::failure(1, "chunk rejected"));
            }
            Ok(Envelope::success::<()>(None).unwrap())
        })
    }
}

// ---------------------------------------------------------------------------
// MockHttpServer
// ---------------------------------------------------------------------------

/// A canned HTTP response.
pub struct ScriptedReply {
    status: u16,
    body: String,
}

impl ScriptedReply {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

/// A request captured by [`MockHttpServer`].
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// Request line plus headers.
    pub head: String,
    pub body: Vec<u8>,
}

/// Minimal HTTP/1.1 server answering one connection per scripted reply.
pub struct MockHttpServer {
    pub url: String,
    captured: Arc<tokio::sync::Mutex<Vec<CapturedRequest>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl MockHttpServer {
    pub async fn start(replies: Vec<ScriptedReply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let captured = Arc::new(tokio::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&captured);

        let handle = tokio::spawn(async move {
            for reply in replies {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                if let Ok(req) = read_request(&mut stream).await {
                    sink.lock().await.push(req);
                }
                let resp = format!(
                    "HTTP/1.1 {} Scripted\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    reply.status,
                    reply.body.len(),
                    reply.body
                );
                let _ = stream.write_all(resp.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        Self {
            url: format!("http://127.0.0.1:{port}"),
            captured,
            _handle: handle,
        }
    }

    pub async fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().await.clone()
    }
}

async fn read_request(stream: &mut TcpStream) -> std::io::Result<CapturedRequest> {
    let mut buf = Vec::new();
    let mut tmp = [0u8; 8192];

    let header_end = loop {
        let n = stream.read(&mut tmp).await?;
        if n == 0 {
            return Err(std::io::ErrorKind::UnexpectedEof.into());
        }
        buf.extend_from_slice(&tmp[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut tmp).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&tmp[..n]);
    }

    Ok(CapturedRequest {
        head,
        body: buf[header_end..].to_vec(),
    })
}
