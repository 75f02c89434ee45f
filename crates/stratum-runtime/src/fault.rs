//! Fail-fast device fault handling
//!
//! A GPU command-stream error leaves the issuing context in an
//! unrecoverable state; any result computed afterwards cannot be trusted.
//! Every device-API and numerics-library status is therefore checked at the
//! call site, and a non-success status terminates the process. No retry, no
//! unwinding.

use std::fmt::Display;
use std::panic::Location;
use tracing::error;

/// Report an unrecoverable device fault and terminate the process.
///
/// Never returns. The diagnostic names the call site and the failing status;
/// the process exits with a non-zero code.
pub fn unrecoverable(site: &str, kind: &str, status: &dyn Display) -> ! {
    error!(site, kind, status = %status, "unrecoverable device fault");
    eprintln!("{}: {} failure: {}", site, kind, status);
    eprintln!("Aborting...");
    std::process::exit(1);
}

/// Unwrap a device-API status, terminating the process on failure.
#[track_caller]
pub fn check_device<T, E: Display>(result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(status) => {
            let loc = Location::caller();
            unrecoverable(&format!("{}:{}", loc.file(), loc.line()), "device API", &status)
        }
    }
}

/// Unwrap a numerics-library status, terminating the process on failure.
#[track_caller]
pub fn check_numerics<T, E: Display>(result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(status) => {
            let loc = Location::caller();
            unrecoverable(
                &format!("{}:{}", loc.file(), loc.line()),
                "numerics library",
                &status,
            )
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
