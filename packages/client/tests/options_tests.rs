use std::collections::HashMap;
use std::net::IpAddr;

use mesh_agent_client::{ConfigurationError, ConnectionOptions, NoProxy, TlsSettings};

fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn test_defaults() {
    let options = ConnectionOptions::default();

    assert!(options.strict_ssl);
    assert!(!options.has_proxy());
    assert_eq!(options.no_proxy, None);
    assert_eq!(options.no_proxy_rule(), &NoProxy::Never);
    assert_eq!(options.max_sockets(), 50);
    assert!(options.ca.is_empty());
    assert!(options.timeout.is_none());
}

#[test]
fn test_zero_max_sockets_means_default() {
    let options = ConnectionOptions {
        max_sockets: Some(0),
        ..ConnectionOptions::default()
    };
    assert_eq!(options.max_sockets(), 50);

    let options = ConnectionOptions {
        max_sockets: Some(8),
        ..ConnectionOptions::default()
    };
    assert_eq!(options.max_sockets(), 8);
}

#[test]
fn test_empty_proxy_is_no_proxy() {
    let options = ConnectionOptions {
        http_proxy: Some(String::new()),
        ..ConnectionOptions::default()
    };
    assert!(!options.has_proxy());
}

#[test]
fn test_json_camel_case() {
    let options = ConnectionOptions::from_json(
        r#"{
            "httpProxy": "http://proxy.local:3128",
            "httpsProxy": "socks5://proxy.local:1080",
            "noProxy": "localhost, .internal",
            "ca": "-----BEGIN CERTIFICATE-----",
            "cert": ["chain-a", "chain-b"],
            "key": "private",
            "maxSockets": 12,
            "localAddress": "10.0.0.2",
            "timeout": 5000
        }"#,
    )
    .expect("Options should parse");

    assert_eq!(options.http_proxy.as_deref(), Some("http://proxy.local:3128"));
    assert_eq!(options.https_proxy.as_deref(), Some("socks5://proxy.local:1080"));
    assert_eq!(options.no_proxy, Some(NoProxy::from("localhost, .internal")));
    assert_eq!(options.ca, vec!["-----BEGIN CERTIFICATE-----".to_owned()]);
    assert_eq!(options.cert.len(), 2);
    assert_eq!(options.key.as_deref(), Some("private"));
    assert!(options.strict_ssl, "strictSsl should default to true");
    assert_eq!(options.max_sockets(), 12);
    assert_eq!(
        options.local_address,
        Some("10.0.0.2".parse::<IpAddr>().expect("Test address should parse"))
    );
    assert_eq!(options.timeout, Some(5000));
}

#[test]
fn test_json_boolean_no_proxy_and_null_lists() {
    let options = ConnectionOptions::from_json(r#"{"noProxy": true, "ca": null, "strictSsl": false}"#)
        .expect("Options should parse");

    assert_eq!(options.no_proxy, Some(NoProxy::Always));
    assert!(options.ca.is_empty());
    assert!(!options.strict_ssl);
}

#[test]
fn test_json_client_certificates() {
    let options = ConnectionOptions::from_json(
        r#"{"clientCertificates": {"//registry.example.com/": {"cert": "c", "key": "k", "ca": "a"}}}"#,
    )
    .expect("Options should parse");

    let entry = options
        .client_certificates
        .get("//registry.example.com/")
        .expect("Entry should be present");
    assert_eq!(entry.cert, "c");
    assert_eq!(entry.ca.as_deref(), Some("a"));
}

#[test]
fn test_json_rejects_bad_local_address() {
    let err = ConnectionOptions::from_json(r#"{"localAddress": "not-an-ip"}"#)
        .expect_err("Bad address should fail");
    assert!(matches!(err, ConfigurationError::Parse(_)));
}

#[test]
fn test_json_rejects_incomplete_client_certificate() {
    let err = ConnectionOptions::from_json(
        r#"{"clientCertificates": {"//registry.example.com/": {"cert": "c", "key": " "}}}"#,
    )
    .expect_err("Missing key should fail");

    match err {
        ConfigurationError::InvalidParameter(message) => {
            assert!(message.contains("//registry.example.com/"));
        }
        other => panic!("Unexpected error: {other}"),
    }
}

#[test]
fn test_from_lookup_prefers_upper_case() {
    let options = ConnectionOptions::from_lookup(env(&[
        ("HTTP_PROXY", "http://upper:1"),
        ("http_proxy", "http://lower:1"),
        ("https_proxy", "http://lower:2"),
        ("no_proxy", "localhost"),
    ]));

    assert_eq!(options.http_proxy.as_deref(), Some("http://upper:1"));
    assert_eq!(options.https_proxy.as_deref(), Some("http://lower:2"));
    assert_eq!(options.no_proxy, Some(NoProxy::from("localhost")));
    assert!(options.strict_ssl);
}

#[test]
fn test_from_lookup_ignores_blank_values() {
    let options = ConnectionOptions::from_lookup(env(&[("HTTPS_PROXY", "  ")]));
    assert!(options.https_proxy.is_none());
    assert!(!options.has_proxy());
}

#[test]
fn test_lookup_fallback_keeps_explicit_values() {
    let options = ConnectionOptions {
        https_proxy: Some("http://explicit:8080".to_owned()),
        ..ConnectionOptions::default()
    }
    .with_lookup_fallback(env(&[
        ("HTTPS_PROXY", "http://env:8080"),
        ("HTTP_PROXY", "http://env:3128"),
        ("NO_PROXY", "*.corp"),
    ]));

    assert_eq!(options.https_proxy.as_deref(), Some("http://explicit:8080"));
    assert_eq!(options.http_proxy.as_deref(), Some("http://env:3128"));
    assert_eq!(options.no_proxy, Some(NoProxy::from("*.corp")));
}

#[test]
fn test_lookup_fallback_keeps_explicit_false_no_proxy() {
    let lookup = || env(&[("NO_PROXY", "registry.example.com")]);

    let explicit = ConnectionOptions::from_json(r#"{"noProxy": false}"#)
        .expect("Options should parse")
        .with_lookup_fallback(lookup());
    assert_eq!(explicit.no_proxy, Some(NoProxy::Never));
    assert!(!explicit.no_proxy_rule().matches("registry.example.com"));

    let unset = ConnectionOptions::from_json(r#"{"noProxy": null}"#)
        .expect("Options should parse")
        .with_lookup_fallback(lookup());
    assert_eq!(unset.no_proxy, Some(NoProxy::from("registry.example.com")));
    assert!(unset.no_proxy_rule().matches("registry.example.com"));
}

#[test]
fn test_tls_settings_from_options() {
    let options = ConnectionOptions {
        ca: vec!["ca-1".to_owned(), "ca-2".to_owned()],
        key: Some("key".to_owned()),
        strict_ssl: false,
        ..ConnectionOptions::default()
    };

    let tls = TlsSettings::from_options(&options);
    assert!(!tls.strict_ssl);
    assert_eq!(tls.ca.len(), 2);
    assert!(tls.cert.is_empty());
    assert_eq!(tls.key.as_deref(), Some("key"));

    let debug = format!("{tls:?}");
    assert!(!debug.contains("\"key\""), "Debug should not print the key: {debug}");
}
