use MirrorDB::MirrorConfig;

#[test]
fn defaults_match_documented_values() {
    let cfg = MirrorConfig::default();
    assert_eq!(cfg.fetch_concurrency, 100);
    assert_eq!(cfg.poll_interval_ms, 5_000);
    assert_eq!(cfg.resolve_cache_secs, 15);
    assert_eq!(cfg.resolve_timeout_ms, 1_000);
    assert_eq!(cfg.object_timeout_ms, 5_000);
    assert_eq!(cfg.page_timeout_ms, 1_000);
    assert_eq!(cfg.fail_escalate_after, 10);
    assert_eq!(cfg.backoff_cap_ticks, 4);
    assert_eq!(cfg.api_base, "http://127.0.0.1:8080");
    assert_eq!(cfg.gateway_base, cfg.api_base);
    assert_eq!(cfg.store_dir, None);
}

#[test]
fn fluent_setters_override_fields() {
    let cfg = MirrorConfig::default()
        .with_fetch_concurrency(8)
        .with_poll_interval_ms(15_000)
        .with_resolve_cache_secs(0)
        .with_api_base("http://gw.internal:5001")
        .with_gateway_base("http://blocks.internal:8080")
        .with_store_dir(Some("/var/lib/mirror"));

    assert_eq!(cfg.fetch_concurrency, 8);
    assert_eq!(cfg.poll_interval_ms, 15_000);
    assert_eq!(cfg.resolve_cache_secs, 0);
    assert_eq!(cfg.api_base, "http://gw.internal:5001");
    assert_eq!(cfg.gateway_base, "http://blocks.internal:8080");
    assert_eq!(cfg.store_dir.as_deref(), Some("/var/lib/mirror"));
}

#[test]
fn degenerate_values_are_clamped() {
    let cfg = MirrorConfig::default()
        .with_fetch_concurrency(0)
        .with_fail_escalate_after(0)
        .with_backoff_cap_ticks(0);
    assert_eq!(cfg.fetch_concurrency, 1);
    assert_eq!(cfg.fail_escalate_after, 1);
    assert_eq!(cfg.backoff_cap_ticks, 1);
}

#[test]
fn display_lists_every_tunable() {
    let s = format!("{}", MirrorConfig::default());
    for needle in [
        "fetch_concurrency",
        "poll_interval_ms",
        "resolve_cache_secs",
        "api_base",
        "store_dir",
    ] {
        assert!(s.contains(needle), "missing {needle} in: {s}");
    }
}
