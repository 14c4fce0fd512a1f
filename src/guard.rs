use std::path::Path;

/// Directory whose presence marks a destination as already scaffolded.
pub const SENTINEL: &str = ".roo";

/// Whether `sentinel` exists directly beneath `destination`.
///
/// Read-only. A destination that does not exist, or whose parent cannot be
/// read, counts as not initialized.
pub fn is_initialized(destination: &Path, sentinel: &str) -> bool {
    let marker = destination.join(sentinel);
    let present = marker.symlink_metadata().is_ok();
    tracing::debug!(marker = %marker.display(), present, "guard check");
    present
}
