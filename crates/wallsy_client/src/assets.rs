// SPDX-License-Identifier: Apache-2.0

use crate::models::catalog::ItemLink;

const INSECURE_SCHEME: &str = "http://";
const SECURE_SCHEME: &str = "https://";

/// Rewrites a literal `http://` prefix to `https://`. Any other address is returned as is.
pub(crate) fn secure_url(url: &str) -> String {
    match url.strip_prefix(INSECURE_SCHEME) {
        Some(rest) => format!("{SECURE_SCHEME}{rest}"),
        None => url.to_string(),
    }
}

/// Picks the full-resolution address out of an asset manifest.
///
/// Only `.jpg` and `.png` variants are considered (exact, case-sensitive suffix).
/// Preference: the first `~orig.` variant, then the first `~large.` variant, then
/// whatever image comes first. Empty when the manifest has no image at all.
pub(crate) fn select_full_image_url(manifest: &[String]) -> String {
    let images: Vec<String> = manifest
        .iter()
        .filter(|url| url.ends_with(".jpg") || url.ends_with(".png"))
        .map(|url| secure_url(url))
        .collect();

    images
        .iter()
        .find(|url| url.contains("~orig."))
        .or_else(|| images.iter().find(|url| url.contains("~large.")))
        .or_else(|| images.first())
        .cloned()
        .unwrap_or_default()
}

/// First preview link of an item, scheme normalized. Empty if there are no links.
pub(crate) fn thumbnail_url(links: Option<&[ItemLink]>) -> String {
    links
        .and_then(|links| links.first())
        .map(|link| secure_url(&link.href))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|u| u.to_string()).collect()
    }

    #[test]
    fn secure_url_only_rewrites_plain_http() {
        assert_eq!(secure_url("http://x/a.jpg"), "https://x/a.jpg");
        assert_eq!(secure_url("https://x/a.jpg"), "https://x/a.jpg");
        assert_eq!(secure_url("ftp://x/a.jpg"), "ftp://x/a.jpg");
        assert_eq!(secure_url("HTTP://x/a.jpg"), "HTTP://x/a.jpg");
        assert_eq!(secure_url(""), "");
    }

    #[test]
    fn original_wins_over_large() {
        let urls = manifest(&["http://x/img~large.jpg", "http://x/img~orig.png"]);
        assert_eq!(select_full_image_url(&urls), "https://x/img~orig.png");
    }

    #[test]
    fn large_wins_over_first_image() {
        let urls = manifest(&[
            "http://x/img~thumb.jpg",
            "http://x/img~large.jpg",
            "http://x/img~orig.tif",
        ]);
        assert_eq!(select_full_image_url(&urls), "https://x/img~large.jpg");
    }

    #[test]
    fn falls_back_to_first_image_in_manifest_order() {
        let urls = manifest(&[
            "http://x/metadata.json",
            "http://x/img~medium.png",
            "http://x/img~small.jpg",
        ]);
        assert_eq!(select_full_image_url(&urls), "https://x/img~medium.png");
    }

    #[test]
    fn no_image_variants_yields_empty() {
        let urls = manifest(&["http://x/img~orig.tif", "http://x/img~large.JPG", "http://x/a.mp4"]);
        assert_eq!(select_full_image_url(&urls), "");
        assert_eq!(select_full_image_url(&[]), "");
    }

    #[test]
    fn other_schemes_survive_selection() {
        let urls = manifest(&["s3://bucket/img~orig.jpg"]);
        assert_eq!(select_full_image_url(&urls), "s3://bucket/img~orig.jpg");
    }

    #[test]
    fn thumbnail_uses_first_link() {
        let links = vec![
            ItemLink { href: "http://x/thumb.jpg".into() },
            ItemLink { href: "http://x/other.jpg".into() },
        ];
        assert_eq!(thumbnail_url(Some(&links)), "https://x/thumb.jpg");
        assert_eq!(thumbnail_url(Some(&[])), "");
        assert_eq!(thumbnail_url(None), "");
    }
}
