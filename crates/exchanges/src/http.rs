//! HTTP transport for quote sources
//!
//! - [`HttpTransport`] is the seam the quote sources talk to, so tests can
//!   script exchange responses without a network
//! - [`MonoioHttpsClient`] is the production implementation: monoio TCP,
//!   rustls, HTTP/1.1 with `Connection: close`, every request under a timeout

use crate::errors::{ExchangeError, Result};
use async_trait::async_trait;
use monoio::io::{AsyncReadRent, AsyncWriteRentExt};
use monoio::net::TcpStream;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection};
use std::io::{Read, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

const IO_CHUNK: usize = 8192;

/// HTTP response
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body of a 2xx response, `HttpError` otherwise
    pub fn into_success_body(self) -> Result<String> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(ExchangeError::HttpError(self.status, self.body))
        }
    }
}

/// Minimal GET transport used by the quote sources
#[async_trait(?Send)]
pub trait HttpTransport {
    /// Issue a GET with the given headers, in order
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse>;

    /// GET and require a 2xx status
    async fn get_success(&self, url: &str, headers: &[(&str, &str)]) -> Result<String> {
        self.get(url, headers).await?.into_success_body()
    }
}

/// Monoio-native HTTPS client
pub struct MonoioHttpsClient {
    tls_config: Arc<ClientConfig>,
    timeout: Duration,
}

impl MonoioHttpsClient {
    /// Create a client with webpki roots and the default timeout
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_millis(DEFAULT_TIMEOUT_MS))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let mut root_store = rustls::RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let tls_config = ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        Self {
            tls_config: Arc::new(tls_config),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Make an HTTPS request with custom headers, without the timeout guard
    pub async fn request_with_headers(
        &self,
        method: &str,
        url: &str,
        body: Option<&str>,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse> {
        let parsed_url = url::Url::parse(url)?;
        if parsed_url.scheme() != "https" {
            return Err(ExchangeError::InvalidUrl(format!("Only https is supported: {url}")));
        }

        let host = parsed_url
            .host_str()
            .ok_or_else(|| ExchangeError::InvalidUrl(format!("No host in URL: {url}")))?;
        let port = parsed_url.port().unwrap_or(443);
        let path_and_query = path_and_query(&parsed_url);

        let tcp_stream = TcpStream::connect(format!("{host}:{port}"))
            .await
            .map_err(|e| ExchangeError::NetworkError(format!("TCP connect to {host}:{port} failed: {e}")))?;

        let server_name = ServerName::try_from(host.to_string())
            .map_err(|e| ExchangeError::InvalidUrl(format!("Invalid server name {host}: {e:?}")))?;

        let tls_conn = ClientConnection::new(self.tls_config.clone(), server_name)
            .map_err(|e| ExchangeError::NetworkError(format!("TLS setup failed: {e}")))?;

        let mut tls_stream = TlsStream::new(tcp_stream, tls_conn);

        let content_length = body.map(|b| b.len()).unwrap_or(0);
        let mut request = format!(
            "{method} {path_and_query} HTTP/1.1\r\n\
             Host: {host}\r\n\
             User-Agent: FxDesk/1.0\r\n\
             Connection: close\r\n\
             Content-Length: {content_length}\r\n"
        );
        for (key, value) in headers {
            request.push_str(&format!("{key}: {value}\r\n"));
        }
        request.push_str("\r\n");
        if let Some(body) = body {
            request.push_str(body);
        }

        tls_stream.write_all(request.as_bytes()).await?;
        let response_data = tls_stream.read_to_end().await?;

        parse_http_response(&response_data)
    }
}

impl Default for MonoioHttpsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl HttpTransport for MonoioHttpsClient {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        debug!("📡 GET {}", url);
        match monoio::time::timeout(self.timeout, self.request_with_headers("GET", url, None, headers)).await {
            Ok(result) => result,
            Err(_) => Err(ExchangeError::Timeout(format!(
                "GET {url} exceeded {}ms",
                self.timeout.as_millis()
            ))),
        }
    }
}

/// `/path?query` of a URL, what the server sees on the request line
pub fn path_and_query(url: &url::Url) -> String {
    let mut out = url.path().to_string();
    if out.is_empty() {
        out.push('/');
    }
    if let Some(query) = url.query() {
        out.push('?');
        out.push_str(query);
    }
    out
}

/// Parse a raw HTTP/1.1 response, decoding chunked bodies
pub fn parse_http_response(data: &[u8]) -> Result<HttpResponse> {
    let header_end = find_subslice(data, b"\r\n\r\n")
        .ok_or_else(|| ExchangeError::NetworkError("Invalid HTTP response: no header terminator".to_string()))?;

    let header_part = String::from_utf8_lossy(&data[..header_end]);
    let raw_body = &data[header_end + 4..];

    let mut lines = header_part.lines();
    let status_line = lines
        .next()
        .ok_or_else(|| ExchangeError::NetworkError("Empty response".to_string()))?;

    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| ExchangeError::NetworkError(format!("Invalid status line: {status_line}")))?;

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let chunked = headers.iter().any(|(k, v)| {
        k.eq_ignore_ascii_case("transfer-encoding") && v.to_ascii_lowercase().contains("chunked")
    });

    let body = if chunked {
        decode_chunked(raw_body)?
    } else {
        raw_body.to_vec()
    };

    Ok(HttpResponse {
        status,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

/// Decode a `Transfer-Encoding: chunked` body
pub fn decode_chunked(mut data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len());

    loop {
        let line_end = find_subslice(data, b"\r\n")
            .ok_or_else(|| ExchangeError::NetworkError("Truncated chunk size line".to_string()))?;
        let size_line = String::from_utf8_lossy(&data[..line_end]);
        // chunk extensions after ';' are ignored
        let size_hex = size_line.split(';').next().unwrap_or("").trim();
        let size = usize::from_str_radix(size_hex, 16)
            .map_err(|_| ExchangeError::NetworkError(format!("Invalid chunk size: {size_hex}")))?;

        data = &data[line_end + 2..];
        if size == 0 {
            return Ok(out);
        }
        if data.len() < size {
            return Err(ExchangeError::NetworkError("Truncated chunk".to_string()));
        }

        out.extend_from_slice(&data[..size]);
        data = data[size..].strip_prefix(b"\r\n").unwrap_or(&data[size..]);
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// rustls client session over a monoio TCP stream
struct TlsStream {
    stream: TcpStream,
    tls_conn: ClientConnection,
    write_buf: Vec<u8>,
    read_buf: Vec<u8>,
    handshake_complete: bool,
}

impl TlsStream {
    fn new(stream: TcpStream, tls_conn: ClientConnection) -> Self {
        Self {
            stream,
            tls_conn,
            write_buf: Vec::with_capacity(IO_CHUNK),
            read_buf: Vec::with_capacity(IO_CHUNK),
            handshake_complete: false,
        }
    }

    /// Send whatever TLS records rustls has queued
    async fn flush_tls(&mut self) -> Result<()> {
        while self.tls_conn.wants_write() {
            self.write_buf.clear();
            let n = self
                .tls_conn
                .write_tls(&mut self.write_buf)
                .map_err(|e| ExchangeError::NetworkError(format!("TLS write failed: {e}")))?;
            if n == 0 {
                break;
            }
            let (result, buf) = self.stream.write_all(std::mem::take(&mut self.write_buf)).await;
            self.write_buf = buf;
            result.map_err(|e| ExchangeError::NetworkError(format!("TCP write failed: {e}")))?;
        }
        Ok(())
    }

    /// Read one TCP segment into rustls, returns false on EOF
    async fn fill_tls(&mut self) -> Result<bool> {
        let mut buf = std::mem::take(&mut self.read_buf);
        buf.clear();
        buf.reserve(IO_CHUNK);
        let (result, buf) = self.stream.read(buf).await;
        self.read_buf = buf;
        let bytes_read = result.map_err(|e| ExchangeError::NetworkError(format!("TCP read failed: {e}")))?;

        if bytes_read == 0 {
            return Ok(false);
        }

        self.tls_conn
            .read_tls(&mut std::io::Cursor::new(&self.read_buf[..bytes_read]))
            .map_err(|e| ExchangeError::NetworkError(format!("TLS read failed: {e}")))?;
        self.tls_conn
            .process_new_packets()
            .map_err(|e| ExchangeError::NetworkError(format!("TLS process failed: {e}")))?;
        Ok(true)
    }

    async fn complete_handshake(&mut self) -> Result<()> {
        if self.handshake_complete {
            return Ok(());
        }

        loop {
            self.flush_tls().await?;

            if !self.tls_conn.is_handshaking() {
                self.handshake_complete = true;
                return Ok(());
            }

            if self.tls_conn.wants_read() {
                if !self.fill_tls().await? {
                    return Err(ExchangeError::NetworkError("Connection closed during handshake".to_string()));
                }
            } else if !self.tls_conn.wants_write() {
                return Err(ExchangeError::NetworkError("TLS handshake stalled".to_string()));
            }
        }
    }

    async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.complete_handshake().await?;

        self.tls_conn
            .writer()
            .write_all(data)
            .map_err(|e| ExchangeError::NetworkError(format!("TLS application write failed: {e}")))?;

        self.flush_tls().await
    }

    async fn read_to_end(&mut self) -> Result<Vec<u8>> {
        self.complete_handshake().await?;

        let mut response_data = Vec::new();
        let mut plain = [0u8; IO_CHUNK];

        loop {
            match self.tls_conn.reader().read(&mut plain) {
                // clean close_notify from the peer
                Ok(0) => break,
                Ok(n) => {
                    response_data.extend_from_slice(&plain[..n]);
                    continue;
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
                // peer closed TCP without close_notify, keep what we have
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(ExchangeError::NetworkError(format!("TLS read failed: {e}"))),
            }

            if !self.fill_tls().await? {
                break;
            }
        }

        Ok(response_data)
    }
}
