use crate::types::Tag;

/// First tag named `name`, scanning in insertion order.
pub fn first_tag_named<'a>(name: &str, tags: &'a [Tag]) -> Option<&'a Tag> {
    tags.iter().find(|tag| tag.name == name)
}

/// Strip every trailing `/` from `url`. Idempotent.
pub fn trim_trailing_slash(url: &str) -> &str {
    url.trim_end_matches('/')
}
