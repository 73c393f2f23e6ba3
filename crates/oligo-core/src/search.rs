//! Exact, overlapping substring search over residue bytes.

/// 0-based start offsets of every (overlapping) occurrence of `needle`.
pub fn find_all(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return Vec::new();
    }
    haystack
        .windows(needle.len())
        .enumerate()
        .filter(|(_, w)| *w == needle)
        .map(|(i, _)| i)
        .collect()
}

/// Count overlapping occurrences of `needle`, stopping once `limit` is reached.
pub fn count_matches(haystack: &[u8], needle: &[u8], limit: Option<usize>) -> usize {
    if needle.is_empty() || needle.len() > haystack.len() {
        return 0;
    }
    let limit = limit.unwrap_or(usize::MAX);
    let mut count = 0;
    for window in haystack.windows(needle.len()) {
        if window == needle {
            count += 1;
            if count >= limit {
                break;
            }
        }
    }
    count
}

/// 0-based offset of the first occurrence at or after `from`.
pub fn find_first(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| i + from)
}

/// 0-based offset of the last occurrence.
pub fn find_last(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).rposition(|w| w == needle)
}
