//! A minimal request abstraction so signing/verification doesn't depend on
//! a concrete HTTP client or server crate — the transport layer is
//! explicitly out of scope; this crate only needs method/path/authority
//! and header lookup.

use std::collections::HashMap;

/// What `build_signature_base` and `sign_request` need from a request.
/// Implement this over whatever request type the host's transport layer
/// uses.
pub trait SignableRequest {
    fn method(&self) -> &str;
    fn path(&self) -> &str;
    fn authority(&self) -> &str;
    fn header(&self, name: &str) -> Option<&str>;
    fn set_header(&mut self, name: &str, value: String);
    fn body(&self) -> &[u8];
}

/// A concrete, in-memory request used by tests and simple callers.
#[derive(Clone, Debug, Default)]
pub struct SimpleRequest {
    pub method: String,
    pub path: String,
    pub authority: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl SimpleRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>, authority: impl Into<String>) -> Self {
        SimpleRequest {
            method: method.into(),
            path: path.into(),
            authority: authority.into(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into().to_lowercase(), value.into());
        self
    }
}

impl SignableRequest for SimpleRequest {
    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn authority(&self) -> &str {
        &self.authority
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    fn set_header(&mut self, name: &str, value: String) {
        self.headers.insert(name.to_lowercase(), value);
    }

    fn body(&self) -> &[u8] {
        &self.body
    }
}
