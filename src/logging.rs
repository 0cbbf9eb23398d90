//! Debug logging utilities
//!
//! A single process-wide toggle for line-oriented diagnostics on standard
//! output. The flag only affects observability, never behavior.

use std::sync::atomic::{AtomicBool, Ordering};

/// Global debug flag
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Enable or disable debug logging
pub fn set_debug(enabled: bool) {
    DEBUG_ENABLED.store(enabled, Ordering::Relaxed);
    if enabled {
        println!("[debug] debug mode enabled");
    }
}

/// Check if debug logging is enabled
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

/// Log debug message
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            println!("[debug] {}", format_args!($($arg)*));
        }
    };
}

/// Log debug message with context
#[macro_export]
macro_rules! debug_context {
    ($context:expr, $($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            println!("[debug] [{}] {}", $context, format_args!($($arg)*));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_roundtrip() {
        set_debug(false);
        assert!(!is_debug_enabled());
        set_debug(true);
        assert!(is_debug_enabled());
        set_debug(false);
        assert!(!is_debug_enabled());
    }
}
