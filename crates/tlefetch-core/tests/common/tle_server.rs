//! Minimal HTTP/1.1 server for integration tests.
//!
//! Answers each GET with the next scripted `(status, body)` pair; once the
//! script is exhausted the last pair repeats. Counts requests so tests can
//! assert how many attempts were made.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

pub struct TleServer {
    /// Base URL, e.g. "http://127.0.0.1:12345/gp.php?CATNR=25544".
    pub url: String,
    hits: Arc<AtomicUsize>,
}

impl TleServer {
    /// Number of requests served so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Serve `body` with 200 OK on every request.
pub fn start(body: Vec<u8>) -> TleServer {
    start_scripted(vec![(200, body)])
}

/// Serve the scripted responses in order, repeating the last one.
pub fn start_scripted(script: Vec<(u16, Vec<u8>)>) -> TleServer {
    assert!(!script.is_empty(), "script needs at least one response");
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_srv = Arc::clone(&hits);
    let script = Arc::new(script);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let n = hits_srv.fetch_add(1, Ordering::SeqCst);
            let (status, body) = script[n.min(script.len() - 1)].clone();
            thread::spawn(move || handle(stream, status, &body));
        }
    });
    TleServer {
        url: format!("http://127.0.0.1:{}/gp.php?CATNR=25544", port),
        hits,
    }
}

/// URL on a port nothing listens on.
pub fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/gp.php?CATNR=25544", port)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}

fn handle(mut stream: std::net::TcpStream, status: u16, body: &[u8]) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    let header = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason(status),
        body.len()
    );
    let _ = stream.write_all(header.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}
