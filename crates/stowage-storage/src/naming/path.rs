use std::path::MAIN_SEPARATOR_STR;

/// Lexically clean an expanded directory and join it with the platform separator.
///
/// Both `/` and `\` are treated as separators. Empty and `.` segments are
/// dropped and `..` removes the previous segment; a `..` above the root of a
/// rooted path is dropped. A relative path that cleans down to nothing
/// becomes `.`, an empty input stays empty.
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }

    let rooted = path.starts_with(['/', '\\']);
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join(MAIN_SEPARATOR_STR);
    if rooted {
        format!("{}{}", MAIN_SEPARATOR_STR, joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}
