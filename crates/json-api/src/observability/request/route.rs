//! Route templating for span names and metric labels.

use uuid::Uuid;

/// Replace uuid path segments with `{uuid}` so each route is one label value.
pub(super) fn templated(path: &str) -> String {
    let segments: Vec<&str> = path
        .trim_start_matches('/')
        .split('/')
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                "{uuid}"
            } else {
                segment
            }
        })
        .collect();

    format!("/{}", segments.join("/"))
}
