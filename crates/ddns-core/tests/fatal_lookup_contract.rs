//! Contract Test: Fatal Lookups
//!
//! Constraints verified:
//! - A failed address resolution stops the run before any provider call
//! - A missing domain stops the run before the record lookup
//! - A missing record stops the run before the update
//!
//! Each failure surfaces as `Err`, which the binary turns into exit code 1.

mod common;

use common::*;
use ddns_core::{DdnsEngine, DomainRef, Error, RunMode};
use std::net::Ipv4Addr;

#[tokio::test]
async fn ip_resolution_failure_makes_no_provider_calls() {
    let provider = MockDnsProvider::with_record("1.2.3.4");
    let engine = DdnsEngine::new(
        Box::new(UnreachableIpSource),
        Box::new(provider.clone()),
        home_target(),
        RunMode::Live,
    );

    let err = engine.run_once().await.expect_err("run must fail");

    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(provider.domain_call_count(), 0);
    assert_eq!(provider.record_call_count(), 0);
    assert_eq!(provider.update_call_count(), 0);
}

#[tokio::test]
async fn missing_domain_stops_before_record_lookup() {
    let provider = MockDnsProvider::empty();

    let err = engine_for(Ipv4Addr::new(1, 2, 3, 4), &provider, RunMode::Live)
        .run_once()
        .await
        .expect_err("run must fail");

    assert!(err.is_not_found());
    assert!(
        err.to_string().contains("example.com"),
        "error should name the domain: {err}"
    );
    assert_eq!(provider.domain_call_count(), 1);
    assert_eq!(provider.record_call_count(), 0);
    assert_eq!(provider.update_call_count(), 0);
}

#[tokio::test]
async fn missing_record_stops_before_update() {
    let provider = MockDnsProvider::empty();
    provider.push_domain(DomainRef {
        id: 7,
        name: "example.com".to_string(),
    });
    // Right name, wrong type: the filter must not match it
    let mut aaaa = record(50, "home", "::1");
    aaaa.record_type = "AAAA".to_string();
    provider.push_record(aaaa);

    let err = engine_for(Ipv4Addr::new(1, 2, 3, 4), &provider, RunMode::Live)
        .run_once()
        .await
        .expect_err("run must fail");

    assert!(err.is_not_found());
    assert!(err.to_string().contains("home"));
    assert_eq!(provider.record_call_count(), 1);
    assert_eq!(provider.update_call_count(), 0);
}
