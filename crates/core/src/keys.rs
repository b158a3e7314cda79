pub use domain_key::KeyParseError;
use domain_key::{define_domain, key_type};

define_domain!(PrameterDomain, "parameter");
key_type!(ParameterKey, PrameterDomain);

define_domain!(CredentialDomain, "credential");
key_type!(CredentialKey, CredentialDomain);

/// Registry key for a node type, e.g. `"http.request"` or `"loop.forEach"`.
///
/// Distinct from [`crate::id::NodeId`], which identifies one instance of a
/// node within a particular workflow definition.
define_domain!(NodeDomain, "node");
key_type!(NodeKey, NodeDomain);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn node_key_roundtrips_through_display() {
        let key = NodeKey::from_str("http.request").unwrap();
        assert_eq!(key.to_string(), "http.request");
    }
}
