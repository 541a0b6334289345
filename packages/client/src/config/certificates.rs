//! Per-registry client certificate selection

use std::collections::BTreeMap;

use url::Url;

use super::options::ClientCertificate;

/// Maps a target URL to the client certificate configured for it.
pub trait CertificateSelector: Send + Sync {
    fn select(
        &self,
        certificates: &BTreeMap<String, ClientCertificate>,
        target: &Url,
    ) -> Option<ClientCertificate>;
}

/// Picks the entry whose key equals the target URL, otherwise the entry
/// with the longest scheme-less prefix of it that ends on a path boundary.
///
/// `//registry.example.com/team/` matches
/// `https://registry.example.com/team/pkg` but not
/// `https://registry.example.com/teammate`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LongestPrefixSelector;

impl CertificateSelector for LongestPrefixSelector {
    fn select(
        &self,
        certificates: &BTreeMap<String, ClientCertificate>,
        target: &Url,
    ) -> Option<ClientCertificate> {
        if certificates.is_empty() {
            return None;
        }
        if let Some(exact) = certificates.get(target.as_str()) {
            return Some(exact.clone());
        }

        let wanted = scheme_less(target.as_str());
        certificates
            .iter()
            .map(|(prefix, cert)| (scheme_less(prefix), cert))
            .filter(|(prefix, _)| on_boundary(&wanted, prefix))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, cert)| cert.clone())
    }
}

fn scheme_less(raw: &str) -> String {
    let rest = match raw.find("://") {
        Some(idx) => &raw[idx + 1..],
        None if raw.starts_with("//") => raw,
        None => return format!("//{raw}"),
    };
    rest.to_owned()
}

fn on_boundary(target: &str, prefix: &str) -> bool {
    if prefix.len() <= 2 || !target.starts_with(prefix) {
        return false;
    }
    prefix.ends_with('/') || matches!(target.as_bytes().get(prefix.len()), None | Some(b'/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cert(tag: &str) -> ClientCertificate {
        ClientCertificate {
            cert: format!("cert-{tag}"),
            key: format!("key-{tag}"),
            ca: None,
        }
    }

    #[test]
    fn test_longest_prefix_wins() {
        let mut certs = BTreeMap::new();
        certs.insert("//registry.example.com/".to_owned(), cert("host"));
        certs.insert("https://registry.example.com/team".to_owned(), cert("team"));
        let target = Url::parse("https://registry.example.com/team/pkg").expect("url should parse");

        let picked = LongestPrefixSelector.select(&certs, &target).expect("a cert should match");
        assert_eq!(picked.cert, "cert-team");
    }

    #[test]
    fn test_prefix_must_end_on_path_boundary() {
        let mut certs = BTreeMap::new();
        certs.insert("//registry.example.com/team".to_owned(), cert("team"));
        let target = Url::parse("https://registry.example.com/teammate").expect("url should parse");

        assert!(LongestPrefixSelector.select(&certs, &target).is_none());
    }

    #[test]
    fn test_host_without_scheme_matches() {
        let mut certs = BTreeMap::new();
        certs.insert("registry.example.com".to_owned(), cert("bare"));
        let target = Url::parse("https://registry.example.com/pkg").expect("url should parse");

        let picked = LongestPrefixSelector.select(&certs, &target).expect("a cert should match");
        assert_eq!(picked.key, "key-bare");
    }
}
