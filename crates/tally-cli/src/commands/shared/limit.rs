/// Upper bound for any listing.
pub const MAX_LIMIT: u32 = 10_000;

/// Compute effective limit: global `--limit` when set, otherwise the
/// command's fallback. Zero means "use the fallback".
#[must_use]
pub fn effective_limit(global: Option<u32>, fallback: u32) -> u32 {
    global
        .filter(|limit| *limit > 0)
        .unwrap_or(fallback)
        .min(MAX_LIMIT)
}
