//! Host execution-context seam
//!
//! The host runtime that schedules operator tasks owns the real execution
//! context; this crate only holds a handle to it, for diagnostics and for
//! draining device work before host-side inspection.

use stratum_types::Result;

/// Handle to the externally-owned execution context.
///
/// Implementations must be `Send + Sync` so the handle can be shared across
/// issuing threads (one stream per worker).
pub trait HostContext: Send + Sync {
    /// Human-readable identifier used in diagnostics
    fn name(&self) -> &str;

    /// Block until all device work issued through this context has drained
    fn synchronize(&self) -> Result<()>;
}
