use std::time::Instant;

/// Progress output is silenced when this is set to `1` or `true`.
pub const QUIET_ENV: &str = "ADDRESS_HIERARCHY_QUIET";

fn logging_disabled() -> bool {
    std::env::var(QUIET_ENV)
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
}

/// Print a message prefixed with elapsed time since `start`.
pub fn log_with_elapsed(start: Instant, message: &str) {
    if logging_disabled() {
        return;
    }

    let elapsed = start.elapsed().as_secs_f32();
    println!("[{elapsed:>8.2}s] {message}");
}
