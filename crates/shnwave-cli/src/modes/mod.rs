pub mod info;
pub mod len;
pub mod pad;
pub mod strip;

use std::path::Path;

use shnwave_services::ServiceError;
use tracing::warn;

/// Log why a file is being skipped. Header failures were already logged
/// by the parser.
pub(crate) fn report_skip(path: &Path, err: &ServiceError) {
    if matches!(err, ServiceError::Wave(_)) {
        return;
    }
    warn!("skipping '{}': {}", path.display(), err);
}

pub(crate) fn plural(n: u64) -> &'static str {
    if n == 1 { "" } else { "s" }
}
