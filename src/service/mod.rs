pub mod comics;
pub mod library;
pub mod upload;
pub mod users;

pub use comics::ComicService;
pub use library::LibraryService;
pub use upload::UploadGatekeeper;
pub use users::UserService;

/// Lowercase, trim, turn spaces into dashes and drop everything outside `[a-z0-9-]`.
pub fn slugify(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn slugify_strips_punctuation_and_non_ascii() {
        assert_eq!(slugify("  Slice of Life "), "slice-of-life");
        assert_eq!(slugify("Sci-Fi & Fantasy!"), "sci-fi--fantasy");
        assert_eq!(slugify("แฟนตาซี"), "");
    }
}
