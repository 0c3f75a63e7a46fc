//! `Signature-Input` parameter parsing and rendering (spec §4.6, §6).
//!
//! Syntax: `sigN=(comp1 comp2 ...);keyid="kid";alg="ed25519|hmac-sha256";
//! created=unix;expires=unix;nonce="..."`.

use crate::components::Component;
use crate::error::HttpSigError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    Ed25519,
    HmacSha256,
}

impl SignatureAlgorithm {
    fn as_str(&self) -> &'static str {
        match self {
            SignatureAlgorithm::Ed25519 => "ed25519",
            SignatureAlgorithm::HmacSha256 => "hmac-sha256",
        }
    }

    fn parse(raw: &str) -> Result<Self, HttpSigError> {
        match raw {
            "ed25519" => Ok(SignatureAlgorithm::Ed25519),
            "hmac-sha256" => Ok(SignatureAlgorithm::HmacSha256),
            _ => Err(HttpSigError::MalformedParams),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureParams {
    pub sig_name: String,
    pub covered: Vec<Component>,
    pub keyid: String,
    pub alg: SignatureAlgorithm,
    pub created: i64,
    pub expires: Option<i64>,
    pub nonce: String,
}

impl SignatureParams {
    /// The `@signature-params` value: `("comp1" "comp2" ...);keyid="...";
    /// alg="...";created=...;[expires=...;]nonce="..."`, exactly as it
    /// must appear both in the `Signature-Input` header and as the final
    /// line of the signature base.
    pub fn params_value(&self) -> String {
        let components = self
            .covered
            .iter()
            .map(|c| format!("\"{}\"", c.name()))
            .collect::<Vec<_>>()
            .join(" ");
        let mut value = format!(
            "({});keyid=\"{}\";alg=\"{}\";created={}",
            components,
            self.keyid,
            self.alg.as_str(),
            self.created
        );
        if let Some(expires) = self.expires {
            value.push_str(&format!(";expires={}", expires));
        }
        value.push_str(&format!(";nonce=\"{}\"", self.nonce));
        value
    }

    /// The full `Signature-Input` header value: `sigN=<params_value>`.
    pub fn header_value(&self) -> String {
        format!("{}={}", self.sig_name, self.params_value())
    }

    /// Parse a `Signature-Input` header value of the form
    /// `sigN=(...);keyid="...";alg="...";created=...;...`.
    pub fn parse(header_value: &str) -> Result<Self, HttpSigError> {
        let (sig_name, rest) = header_value
            .split_once('=')
            .ok_or(HttpSigError::MalformedParams)?;
        let rest = rest.trim_start();
        let close = rest.find(')').ok_or(HttpSigError::MalformedParams)?;
        if !rest.starts_with('(') {
            return Err(HttpSigError::MalformedParams);
        }
        let components_raw = &rest[1..close];
        let covered = components_raw
            .split_whitespace()
            .map(|tok| Component::parse(tok.trim_matches('"')))
            .collect();

        let params_str = &rest[close + 1..];
        let mut keyid = None;
        let mut alg = None;
        let mut created = None;
        let mut expires = None;
        let mut nonce = None;

        for part in params_str.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let (key, value) = part.split_once('=').ok_or(HttpSigError::MalformedParams)?;
            let value = value.trim_matches('"');
            match key {
                "keyid" => keyid = Some(value.to_string()),
                "alg" => alg = Some(SignatureAlgorithm::parse(value)?),
                "created" => {
                    created = Some(value.parse::<i64>().map_err(|_| HttpSigError::MalformedParams)?)
                }
                "expires" => {
                    expires =
                        Some(value.parse::<i64>().map_err(|_| HttpSigError::MalformedParams)?)
                }
                "nonce" => nonce = Some(value.to_string()),
                _ => {}
            }
        }

        Ok(SignatureParams {
            sig_name: sig_name.to_string(),
            covered,
            keyid: keyid.ok_or(HttpSigError::MalformedParams)?,
            alg: alg.ok_or(HttpSigError::MalformedParams)?,
            created: created.ok_or(HttpSigError::MalformedParams)?,
            expires,
            nonce: nonce.ok_or(HttpSigError::MalformedParams)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SignatureParams {
        SignatureParams {
            sig_name: "sig1".to_string(),
            covered: vec![
                Component::Method,
                Component::Path,
                Component::Header("host".to_string()),
                Component::Header("date".to_string()),
                Component::Header("content-digest".to_string()),
            ],
            keyid: "kid-123".to_string(),
            alg: SignatureAlgorithm::HmacSha256,
            created: 1_700_000_000,
            expires: None,
            nonce: "abc123".to_string(),
        }
    }

    #[test]
    fn header_value_matches_spec_syntax() {
        let params = sample();
        assert_eq!(
            params.header_value(),
            "sig1=(\"@method\" \"@path\" \"host\" \"date\" \"content-digest\");keyid=\"kid-123\";alg=\"hmac-sha256\";created=1700000000;nonce=\"abc123\""
        );
    }

    #[test]
    fn parse_is_inverse_of_header_value() {
        let params = sample();
        let parsed = SignatureParams::parse(&params.header_value()).unwrap();
        assert_eq!(parsed, params);
    }

    #[test]
    fn parse_with_expires_roundtrips() {
        let mut params = sample();
        params.expires = Some(1_700_000_300);
        let parsed = SignatureParams::parse(&params.header_value()).unwrap();
        assert_eq!(parsed.expires, Some(1_700_000_300));
    }

    #[test]
    fn unknown_algorithm_errors() {
        let raw = "sig1=(\"@method\");keyid=\"k\";alg=\"rsa\";created=1;nonce=\"n\"";
        assert!(matches!(
            SignatureParams::parse(raw),
            Err(HttpSigError::MalformedParams)
        ));
    }
}
