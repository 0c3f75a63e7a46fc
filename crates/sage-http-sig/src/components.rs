//! Covered-component identifiers (spec §4.6).

/// A component eligible for coverage by a signature: one of the three
/// derived request-line components, a small set of named pseudo-headers,
/// or an arbitrary request/response header.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    Method,
    Path,
    Authority,
    Header(String),
}

impl Component {
    /// The wire name as it appears inside `Signature-Input`'s component
    /// list, e.g. `"@method"` or `"content-digest"`.
    pub fn name(&self) -> String {
        match self {
            Component::Method => "@method".to_string(),
            Component::Path => "@path".to_string(),
            Component::Authority => "@authority".to_string(),
            Component::Header(name) => name.to_lowercase(),
        }
    }

    pub fn parse(raw: &str) -> Component {
        match raw {
            "@method" => Component::Method,
            "@path" => Component::Path,
            "@authority" => Component::Authority,
            other => Component::Header(other.to_lowercase()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_components_roundtrip() {
        for raw in ["@method", "@path", "@authority"] {
            assert_eq!(Component::parse(raw).name(), raw);
        }
    }

    #[test]
    fn header_components_are_lowercased() {
        assert_eq!(Component::parse("Content-Digest").name(), "content-digest");
        assert_eq!(Component::parse("Date").name(), "date");
    }
}
