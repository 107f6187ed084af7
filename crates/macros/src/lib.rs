#[doc(hidden)]
pub use near_sdk as __near_sdk;

/// Log a diagnostic line prefixed with the call site. Compiled to nothing
/// unless the crate using it enables its `debug_log` feature.
#[macro_export]
macro_rules! debug_log {
    ($($x:expr),+) => {
        #[cfg(feature = "debug_log")]
        $crate::__near_sdk::log!("{}:{} {}", file!(), line!(), format!($($x),+))
    };
}

/// Return early with `Err($err)` when the condition does not hold.
///
/// Counterpart of `assert!` for code paths that report failures to the caller
/// instead of aborting the whole transaction.
#[macro_export]
macro_rules! ensure {
    ($condition:expr, $err:expr) => {
        if !($condition) {
            return Err($err.into());
        }
    };
}

/// Unwrap an [Option], returning `Err($err)` from the enclosing function when
/// it is `None`.
#[macro_export]
macro_rules! require_some {
    ($option:expr, $err:expr) => {
        match $option {
            Some(v) => v,
            None => return Err($err.into()),
        }
    };
}
