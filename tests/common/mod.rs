//! Shared helpers for integration tests: a tiny raw HTTP/1.1 client and
//! one-time `may` runtime setup.

#![allow(dead_code)]

pub mod test_server {
    use std::net::TcpListener;
    use std::sync::Once;

    static MAY_INIT: Once = Once::new();

    /// Configures the may coroutine runtime and test tracing exactly once
    /// per test binary.
    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x10000);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .with_test_writer()
                .try_init();
        });
    }

    /// Grabs a free TCP port by binding port 0 and releasing it.
    pub fn free_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind port 0");
        listener.local_addr().expect("local addr").port()
    }
}

pub mod http {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::{SocketAddr, TcpStream};
    use std::time::Duration;

    /// A parsed raw HTTP response.
    pub struct RawResponse {
        pub status: u16,
        pub headers: Vec<(String, String)>,
        pub body: Vec<u8>,
    }

    impl RawResponse {
        /// First value of the named header, case-insensitive.
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }

        /// All values of the named header, in wire order.
        pub fn header_values(&self, name: &str) -> Vec<&str> {
            self.headers
                .iter()
                .filter(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
                .collect()
        }

        pub fn body_str(&self) -> String {
            String::from_utf8_lossy(&self.body).to_string()
        }
    }

    /// Sends a single request on a fresh connection and parses the response.
    ///
    /// The transport always announces a Content-Length, so the body is read
    /// exactly rather than waiting for EOF on a keep-alive connection.
    pub fn send_request(
        addr: SocketAddr,
        method: &str,
        path: &str,
        headers: &[(&str, &str)],
        body: Option<&[u8]>,
    ) -> RawResponse {
        let mut stream = TcpStream::connect(addr).expect("connect");
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .expect("read timeout");

        let mut request = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\n");
        for (name, value) in headers {
            request.push_str(&format!("{name}: {value}\r\n"));
        }
        if let Some(body) = body {
            request.push_str(&format!("Content-Length: {}\r\n", body.len()));
        }
        request.push_str("\r\n");
        stream.write_all(request.as_bytes()).expect("write request");
        if let Some(body) = body {
            stream.write_all(body).expect("write body");
        }
        stream.flush().expect("flush");

        let mut reader = BufReader::new(stream);

        let mut status_line = String::new();
        reader.read_line(&mut status_line).expect("status line");
        let status = status_line
            .split_whitespace()
            .nth(1)
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or_else(|| panic!("bad status line: {status_line:?}"));

        let mut response_headers = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("header line");
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                response_headers.push((name.trim().to_string(), value.trim().to_string()));
            }
        }

        let content_length = response_headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.parse::<usize>().ok())
            .unwrap_or(0);
        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).expect("body");

        RawResponse {
            status,
            headers: response_headers,
            body,
        }
    }

    /// Convenience GET with no extra headers.
    pub fn get(addr: SocketAddr, path: &str) -> RawResponse {
        send_request(addr, "GET", path, &[], None)
    }
}
