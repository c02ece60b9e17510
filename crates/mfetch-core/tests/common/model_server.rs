//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed table of paths: static bodies, bare error statuses and
//! redirects. Records every requested path so tests can count attempts.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub enum Route {
    /// 200 OK with this body.
    Body(Vec<u8>),
    /// Empty response with this status.
    Status(u16),
    /// 302 Found pointing at another path on this server.
    Redirect(String),
}

pub struct ModelServer {
    base: String,
    hits: Arc<Mutex<Vec<String>>>,
}

impl ModelServer {
    /// Full URL for `path` (which must start with '/').
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Paths requested so far, in arrival order.
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. The server runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> ModelServer {
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(p, r)| (p.to_string(), r))
            .collect(),
    );
    let hits = Arc::new(Mutex::new(Vec::new()));
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let server_hits = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let hits = Arc::clone(&server_hits);
            thread::spawn(move || handle(stream, &routes, &hits));
        }
    });
    ModelServer {
        base: format!("http://127.0.0.1:{}", port),
        hits,
    }
}

/// A URL on a port nothing listens on, so connecting fails.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/model.tflite", port)
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>, hits: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    hits.lock().unwrap().push(path.clone());

    let empty: &[u8] = &[];
    let (status, extra, body) = match routes.get(&path) {
        Some(Route::Body(body)) => ("200 OK", String::new(), body.as_slice()),
        Some(Route::Status(code)) => (status_text(*code), String::new(), empty),
        Some(Route::Redirect(to)) => ("302 Found", format!("Location: {}\r\n", to), empty),
        None => ("404 Not Found", String::new(), empty),
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n",
        status,
        body.len(),
        extra
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(body);
}

fn status_text(code: u16) -> &'static str {
    match code {
        403 => "403 Forbidden",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        503 => "503 Service Unavailable",
        _ => "400 Bad Request",
    }
}
