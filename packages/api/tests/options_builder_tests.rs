//! Options builder tests

use mesh_agent::{ClientCertificate, NoProxy, OptionsBuilder};

#[test]
fn test_defaults_match_connection_options() {
    let options = OptionsBuilder::new().build();
    assert_eq!(options, mesh_agent::ConnectionOptions::default());
    assert!(options.strict_ssl);
}

#[test]
fn test_fluent_fields() {
    let options = OptionsBuilder::new()
        .http_proxy("http://proxy.local:3128")
        .https_proxy("socks5://proxy.local:1080")
        .no_proxy("localhost, .internal")
        .ca("ca-1")
        .ca("ca-2")
        .cert("chain")
        .key("key")
        .strict_ssl(false)
        .max_sockets(4)
        .local_address("127.0.0.1".parse().expect("Test address should parse"))
        .timeout_ms(2500)
        .build();

    assert_eq!(options.http_proxy.as_deref(), Some("http://proxy.local:3128"));
    assert_eq!(options.https_proxy.as_deref(), Some("socks5://proxy.local:1080"));
    assert_eq!(options.no_proxy, Some(NoProxy::from("localhost, .internal")));
    assert_eq!(options.ca, vec!["ca-1".to_owned(), "ca-2".to_owned()]);
    assert_eq!(options.cert, vec!["chain".to_owned()]);
    assert_eq!(options.key.as_deref(), Some("key"));
    assert!(!options.strict_ssl);
    assert_eq!(options.max_sockets(), 4);
    assert!(options.local_address.is_some());
    assert_eq!(options.timeout, Some(2500));
}

#[test]
fn test_proxy_sets_both_schemes() {
    let options = OptionsBuilder::new().proxy("http://proxy.local:8080").no_proxy(true).build();

    assert_eq!(options.http_proxy, options.https_proxy);
    assert_eq!(options.no_proxy, Some(NoProxy::Always));
}

#[test]
fn test_try_build_validates_client_certificates() {
    let incomplete = ClientCertificate {
        cert: "cert".to_owned(),
        key: String::new(),
        ca: None,
    };
    let result = OptionsBuilder::new()
        .client_certificate("//registry.example.com/", incomplete)
        .try_build();
    assert!(result.is_err());

    let complete = ClientCertificate {
        cert: "cert".to_owned(),
        key: "key".to_owned(),
        ca: None,
    };
    let options = OptionsBuilder::new()
        .client_certificate("//registry.example.com/", complete)
        .try_build()
        .expect("Complete certificate should validate");
    assert_eq!(options.client_certificates.len(), 1);
}

#[test]
fn test_from_options_keeps_existing_values() {
    let base = OptionsBuilder::new().https_proxy("http://proxy.local:8080").build();
    let options = OptionsBuilder::from_options(base).max_sockets(2).build();

    assert_eq!(options.https_proxy.as_deref(), Some("http://proxy.local:8080"));
    assert_eq!(options.max_sockets(), 2);
}
