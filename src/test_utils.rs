//! Stub HTTP server for exercising remote operations in tests.
//!
//! Serves a fixed script of responses over a loopback listener, one
//! connection per response, and records every request it saw so tests
//! can assert on methods, paths, headers, and bodies. Not part of the
//! stable API; gated behind the `test-support` feature.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread::JoinHandle;

/// One scripted response.
#[derive(Debug, Clone)]
pub struct StubResponse {
    /// HTTP status code to answer with.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl StubResponse {
    /// Convenience constructor.
    #[must_use]
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_owned(),
        }
    }
}

/// A request as seen by the stub server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request method (`GET`, `POST`, ...).
    pub method: String,
    /// Request path including any query string.
    pub path: String,
    /// Header name/value pairs in arrival order.
    pub headers: Vec<(String, String)>,
    /// Raw request body.
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Look up a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Loopback HTTP server answering a fixed script of responses.
///
/// The server thread exits once the script is exhausted; call
/// [`StubServer::finish`] to join it and obtain the recorded requests.
/// Tests must send exactly as many requests as there are scripted
/// responses, otherwise `finish` blocks.
pub struct StubServer {
    addr: SocketAddr,
    handle: JoinHandle<Vec<RecordedRequest>>,
}

impl StubServer {
    /// Bind a loopback listener and serve the given responses in order.
    ///
    /// # Panics
    ///
    /// Panics when the loopback listener cannot be bound.
    #[must_use]
    pub fn run(responses: Vec<StubResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
        let addr = listener.local_addr().expect("stub listener address");
        let handle = std::thread::spawn(move || serve_script(&listener, &responses));
        Self { addr, handle }
    }

    /// Base URL of the stub server.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Join the server thread and return the requests it recorded.
    ///
    /// # Panics
    ///
    /// Panics when the server thread itself panicked.
    #[must_use]
    pub fn finish(self) -> Vec<RecordedRequest> {
        self.handle.join().expect("join stub server thread")
    }
}

fn serve_script(listener: &TcpListener, responses: &[StubResponse]) -> Vec<RecordedRequest> {
    let mut recorded = Vec::new();
    for response in responses {
        let Ok((mut stream, _)) = listener.accept() else {
            break;
        };
        let Some(request) = read_request(&mut stream) else {
            break;
        };
        recorded.push(request);
        write_response(&mut stream, response);
    }
    recorded
}

fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 1024];

    let header_end = loop {
        if let Some(position) = find_blank_line(&buffer) {
            break position;
        }
        let read = stream.read(&mut chunk).ok()?;
        if read == 0 {
            return None;
        }
        buffer.extend_from_slice(&chunk[..read]);
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).into_owned();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_owned();
    let path = request_line.next()?.to_owned();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| {
            line.split_once(':')
                .map(|(key, value)| (key.trim().to_owned(), value.trim().to_owned()))
        })
        .collect();

    let content_length = headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buffer[header_end + 4..].to_vec();
    while body.len() < content_length {
        let read = stream.read(&mut chunk).ok()?;
        if read == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..read]);
    }

    Some(RecordedRequest {
        method,
        path,
        headers,
        body,
    })
}

fn write_response(stream: &mut TcpStream, response: &StubResponse) {
    let head = format!(
        "HTTP/1.1 {} {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
        response.status,
        reason_phrase(response.status),
        response.body.len(),
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(response.body.as_bytes());
    let _ = stream.flush();
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}

fn find_blank_line(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|window| window == b"\r\n\r\n")
}
