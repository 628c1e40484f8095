//! Pairs a cross-seeded torrent with the original it duplicates.
//!
//! The original lives in the cross-seed's base category (the part of the
//! category before the first `.`) and carries exactly the same name.

use tracing::warn;

use crate::torrent_client::TorrentInfo;

/// Category prefix before the first `.`; the whole string if there is none.
pub fn base_category(category: &str) -> &str {
    category.split('.').next().unwrap_or(category)
}

/// First candidate in the same base category whose name equals the
/// cross-seed's name exactly.
///
/// Candidates are taken in the order the client returned them. When several
/// share the name the first one still wins; a warning is logged so the
/// ambiguity is visible.
pub fn find_original<'a>(
    cross_seed: &TorrentInfo,
    candidates: &'a [TorrentInfo],
) -> Option<&'a TorrentInfo> {
    let base = base_category(&cross_seed.category);
    let mut matches = candidates
        .iter()
        .filter(|c| c.name == cross_seed.name && base_category(&c.category) == base);
    let original = matches.next()?;

    let others = matches.count();
    if others > 0 {
        warn!(
            "{} more torrents named {:?} in category {:?}, using {}",
            others,
            cross_seed.name,
            original.category,
            original.hash
        );
    }

    Some(original)
}
