use crate::api::Time;

/// Longest object name the storage bucket accepts.
const MAX_FILE_NAME_LEN: usize = 100;

/// An image picked by the user, to be stored next to its post.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Maps anything the bucket could choke on to `_`. Dots are kept so the
/// extension survives truncation.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
            _ => '_',
        })
        .collect()
}

/// Shortens `name` to at most `max` bytes, keeping the extension.
pub fn truncate_file_name(name: &str, max: usize) -> String {
    if name.len() <= max {
        return name.to_string();
    }
    let extension = name.rfind('.').map(|i| &name[i..]).unwrap_or("");
    let mut base_len = max.saturating_sub(extension.len());
    while !name.is_char_boundary(base_len) {
        base_len -= 1;
    }
    format!("{}{}", &name[..base_len], extension)
}

/// Bucket path for a post's image: sanitized title, upload time in millis,
/// then the (sanitized, truncated) original file name.
pub fn object_path(title: &str, file_name: &str, now: Time) -> String {
    format!(
        "{}-{}-{}",
        sanitize_file_name(title),
        now.timestamp_millis(),
        truncate_file_name(&sanitize_file_name(file_name), MAX_FILE_NAME_LEN),
    )
}
