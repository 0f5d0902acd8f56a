/// Build stamp baked into the shipped page. Reported to the update worker
/// once the registration is ready, and appended to startup asset paths so
/// stale copies never outlive a deploy.
pub const VERSION: &str = "660731-1515";

pub fn add_version_to_path(path: &str) -> String {
    return format!("{path}?v={VERSION}");
}
