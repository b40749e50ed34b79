use std::sync::Once;

static INIT: Once = Once::new();

/// Picks the filter: explicit (CLI or config file), then `RUST_LOG`, then
/// `info`.
pub fn resolve_filter(explicit: Option<&str>, env: Option<&str>) -> String {
    let set = |f: &&str| !f.trim().is_empty();
    explicit
        .filter(set)
        .or(env.filter(set))
        .unwrap_or("info")
        .to_string()
}

/// Initializes the global logger once, later calls are ignored.
pub fn init_logging(explicit: Option<&str>) {
    INIT.call_once(|| {
        let env = std::env::var("RUST_LOG").ok();
        let filter = resolve_filter(explicit, env.as_deref());

        env_logger::Builder::new()
            .parse_filters(&filter)
            .format_timestamp_millis()
            .init();

        log::debug!("logging initialized with filter {filter:?}");
    });
}
