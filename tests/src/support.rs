//! In-memory exchange stand-ins
//!
//! [`ScriptedTransport`] answers GETs from queued responses keyed by URL and
//! by whether the request carried a Bitkub signature, and records every
//! request it saw.

use async_trait::async_trait;
use fxdesk_exchanges::bitkub::auth::HEADER_SIGN;
use fxdesk_exchanges::{ExchangeError, HttpResponse, HttpTransport, Result};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

pub const TICKER_URL: &str = "https://api.bitkub.com/api/market/ticker?sym=THB_USDT";
pub const SERVER_TIME_URL: &str = "https://api.bitkub.com/api/servertime";
pub const RAPIRA_URL: &str = "https://api.rapira.net/open/market/rates";

/// One request as the transport received it
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_signed(&self) -> bool {
        self.header(HEADER_SIGN).is_some()
    }
}

#[derive(Default)]
struct Script {
    responses: HashMap<(String, bool), VecDeque<Result<HttpResponse>>>,
    requests: Vec<RecordedRequest>,
}

/// Cloneable handle; clones share the script and the request log
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Rc<RefCell<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for unsigned GETs of `url`
    pub fn on(self, url: &str, response: Result<HttpResponse>) -> Self {
        self.push(url, false, response);
        self
    }

    /// Queue a response for signed GETs of `url`
    pub fn on_signed(self, url: &str, response: Result<HttpResponse>) -> Self {
        self.push(url, true, response);
        self
    }

    fn push(&self, url: &str, signed: bool, response: Result<HttpResponse>) {
        self.script
            .borrow_mut()
            .responses
            .entry((url.to_string(), signed))
            .or_default()
            .push_back(response);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.script.borrow().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.script.borrow().requests.len()
    }
}

#[async_trait(?Send)]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        let request = RecordedRequest {
            url: url.to_string(),
            headers: headers.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        };
        let signed = request.is_signed();

        let mut script = self.script.borrow_mut();
        script.requests.push(request);
        script
            .responses
            .get_mut(&(url.to_string(), signed))
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(ExchangeError::NetworkError(format!("connection refused: {url}"))))
    }
}

pub fn ok(body: &str) -> Result<HttpResponse> {
    Ok(HttpResponse::new(200, body))
}

pub fn status(code: u16, body: &str) -> Result<HttpResponse> {
    Ok(HttpResponse::new(code, body))
}

pub fn ticker_body(last: &str) -> String {
    format!(r#"{{"THB_USDT":{{"id":1,"last":{last},"lowestAsk":32.11,"highestBid":32.09}}}}"#)
}

pub fn rapira_body(bid: &str) -> String {
    format!(
        r#"{{"data":[{{"symbol":"BTC/USDT","bidPrice":60000.1,"askPrice":60010}},{{"symbol":"USDT/RUB","bidPrice":{bid},"askPrice":80.2}}],"code":0}}"#
    )
}
