//! Signature base construction (spec §4.6): each covered component
//! rendered on its own line as `"<name>": <value>`, followed by
//! `"@signature-params": <params-exactly-as-in-input>`.

use crate::components::Component;
use crate::error::HttpSigError;
use crate::params::SignatureParams;
use crate::request::SignableRequest;

/// Build the exact byte sequence that gets signed/verified. Header values
/// are trimmed of surrounding whitespace; no further structured-field
/// normalization is performed (single-valued headers assumed).
pub fn build_signature_base(
    req: &impl SignableRequest,
    params: &SignatureParams,
) -> Result<Vec<u8>, HttpSigError> {
    let mut base = String::new();
    for component in &params.covered {
        let value = component_value(req, component)?;
        base.push_str(&format!("\"{}\": {}\n", component.name(), value.trim()));
    }
    base.push_str(&format!(
        "\"@signature-params\": {}",
        params.params_value()
    ));
    Ok(base.into_bytes())
}

fn component_value<'a>(
    req: &'a impl SignableRequest,
    component: &Component,
) -> Result<String, HttpSigError> {
    match component {
        Component::Method => Ok(req.method().to_string()),
        Component::Path => Ok(req.path().to_string()),
        Component::Authority => Ok(req.authority().to_string()),
        Component::Header(name) => req
            .header(name)
            .map(|v| v.to_string())
            .ok_or(HttpSigError::MissingComponent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SignatureAlgorithm;
    use crate::request::SimpleRequest;

    fn sample_params() -> SignatureParams {
        SignatureParams {
            sig_name: "sig1".to_string(),
            covered: vec![
                Component::Method,
                Component::Path,
                Component::Header("host".to_string()),
                Component::Header("date".to_string()),
            ],
            keyid: "kid-1".to_string(),
            alg: SignatureAlgorithm::HmacSha256,
            created: 1_700_000_000,
            expires: None,
            nonce: "n1".to_string(),
        }
    }

    #[test]
    fn base_contains_one_line_per_component_plus_params() {
        let req = SimpleRequest::new("POST", "/a2a", "agent.example")
            .with_header("host", "agent.example")
            .with_header("date", "Tue, 07 Jan 2026 20:00:00 GMT");
        let params = sample_params();
        let base = build_signature_base(&req, &params).unwrap();
        let base = String::from_utf8(base).unwrap();
        assert_eq!(base.lines().count(), 5);
        assert!(base.contains("\"@method\": POST"));
        assert!(base.ends_with(&params.params_value()));
    }

    #[test]
    fn missing_covered_header_errors() {
        let req = SimpleRequest::new("POST", "/a2a", "agent.example");
        let params = sample_params();
        assert!(matches!(
            build_signature_base(&req, &params),
            Err(HttpSigError::MissingComponent)
        ));
    }

    #[test]
    fn header_values_are_trimmed() {
        let req = SimpleRequest::new("GET", "/x", "a")
            .with_header("host", "  a  ")
            .with_header("date", "d");
        let params = SignatureParams {
            covered: vec![Component::Header("host".to_string()), Component::Header("date".to_string())],
            ..sample_params()
        };
        let base = build_signature_base(&req, &params).unwrap();
        let base = String::from_utf8(base).unwrap();
        assert!(base.contains("\"host\": a\n"));
    }
}
