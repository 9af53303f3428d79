//! Output file naming

use crate::types::{IdentityContext, WILDCARD};

/// Token written into file names in place of a literal `*`
pub const STAR_TOKEN: &str = "_star_";

/// Suffix appended after service, stage and region
pub const POLICY_FILE_SUFFIX: &str = "-policy";

/// Replace a value that is exactly `*` with [`STAR_TOKEN`]
pub fn escape_filename_value(value: &str) -> &str {
    if value == WILDCARD {
        STAR_TOKEN
    } else {
        value
    }
}

/// `{service}-{stage}-{region}-policy`, with wildcard stage/region escaped.
///
/// Only the file name is escaped; document content keeps the literal `*`.
pub fn policy_file_stem(identity: &IdentityContext) -> String {
    format!(
        "{}-{}-{}{}",
        identity.service_name,
        escape_filename_value(&identity.stage),
        escape_filename_value(&identity.region),
        POLICY_FILE_SUFFIX
    )
}

/// [`policy_file_stem`] with a `.json` extension
pub fn policy_file_name(identity: &IdentityContext) -> String {
    format!("{}.json", policy_file_stem(identity))
}
