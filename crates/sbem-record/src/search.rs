/// Find the first occurrence of `needle` in `haystack`.
///
/// Returns the offset of the match within `haystack`. An empty needle
/// matches at offset 0.
pub fn find_sequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
