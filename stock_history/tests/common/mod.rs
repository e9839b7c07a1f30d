#![allow(dead_code)]

use std::{
    io::{BufRead, BufReader, Write},
    net::TcpListener,
    thread::{self, JoinHandle},
};

pub const CHART_AAPL_DAILY: &str = include_str!("../fixtures/chart_aapl_daily.json");
pub const CHART_NO_DATA: &str = include_str!("../fixtures/chart_no_data.json");
pub const CHART_NOT_FOUND: &str = include_str!("../fixtures/chart_not_found.json");

/// What the server saw.
pub struct RecordedRequest {
    /// e.g. `GET /v8/finance/chart/AAPL?period1=... HTTP/1.1`
    pub line: String,
    /// Raw header lines, names lowercased.
    pub headers: Vec<String>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        let prefix = format!("{}:", name.to_ascii_lowercase());
        self.headers
            .iter()
            .find(|h| h.starts_with(&prefix))
            .map(|h| h[prefix.len()..].trim())
    }
}

/// A chart server that answers exactly one request and then shuts down.
pub struct OneShotServer {
    pub base_url: String,
    handle: JoinHandle<RecordedRequest>,
}

impl OneShotServer {
    pub fn start(status: u16, body: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr");

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

            let mut line = String::new();
            reader.read_line(&mut line).expect("request line");
            let mut headers = Vec::new();
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).expect("header line");
                if header == "\r\n" || header.is_empty() {
                    break;
                }
                let (name, value) = header.split_once(':').unwrap_or((header.as_str(), ""));
                headers.push(format!("{}:{}", name.to_ascii_lowercase(), value.trim_end()));
            }

            let reason = match status {
                200 => "OK",
                404 => "Not Found",
                _ => "Error",
            };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).expect("write response");
            stream.flush().expect("flush response");

            RecordedRequest {
                line: line.trim_end().to_string(),
                headers,
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            handle,
        }
    }

    /// Blocks until the single request has been served.
    pub fn request(self) -> RecordedRequest {
        self.handle.join().expect("server thread panicked")
    }
}
