//! Admin API paths.

pub const SCENARIOS: &str = "/__admin/scenarios";
pub const SCENARIOS_RESET: &str = "/__admin/scenarios/reset";
pub const MAPPINGS: &str = "/__admin/mappings";
pub const MAPPINGS_FIND_BY_METADATA: &str = "/__admin/mappings/find-by-metadata";
pub const MAPPINGS_REMOVE_BY_METADATA: &str = "/__admin/mappings/remove-by-metadata";
pub const REQUESTS: &str = "/__admin/requests";
pub const REQUESTS_COUNT: &str = "/__admin/requests/count";
pub const REQUESTS_FIND: &str = "/__admin/requests/find";
pub const FILES: &str = "/__admin/files";

pub fn mapping(id: &str) -> String {
    format!("{MAPPINGS}/{}", urlencoding::encode(id))
}

/// File names may contain directories; each segment is encoded on its own.
pub fn file(name: &str) -> String {
    let segments: Vec<_> = name
        .trim_start_matches('/')
        .split('/')
        .map(urlencoding::encode)
        .collect();
    format!("{FILES}/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names_are_unchanged() {
        assert_eq!(mapping("76ada7b0-49ae"), "/__admin/mappings/76ada7b0-49ae");
        assert_eq!(file("README.md"), "/__admin/files/README.md");
        assert_eq!(file("nested/dir/a.json"), "/__admin/files/nested/dir/a.json");
    }

    #[test]
    fn test_reserved_characters_are_encoded() {
        assert_eq!(file("report#1.json"), "/__admin/files/report%231.json");
        assert_eq!(file("a?b c.txt"), "/__admin/files/a%3Fb%20c.txt");
        assert_eq!(mapping("id/with?query"), "/__admin/mappings/id%2Fwith%3Fquery");
    }
}
