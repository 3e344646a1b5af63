//! Environment-variable configuration. No config file, no CLI flags —
//! matching the reference implementation and the `ad` editor's own
//! convention of reading settings straight out of the environment.
use std::env;

const DEFAULT_PORT: u16 = 15440;

/// Reads `serverport15440`, falling back to the documented default.
pub fn port() -> u16 {
    env::var("serverport15440")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_port_when_unset() {
        // SAFETY: test runs single-threaded within this process's env access.
        unsafe { env::remove_var("serverport15440") };
        assert_eq!(port(), DEFAULT_PORT);
    }

    #[test]
    fn parses_configured_port() {
        unsafe { env::set_var("serverport15440", "9000") };
        assert_eq!(port(), 9000);
        unsafe { env::remove_var("serverport15440") };
    }
}
