use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

use crate::filter;

/// Caption used when every discovery strategy comes up empty.
pub const DEFAULT_CAPTION: &str = "No description available";

/// Sibling text longer than this (in characters) is assumed to be body copy,
/// not a caption.
const MAX_SIBLING_CAPTION_CHARS: usize = 200;

/// An image discovered on a page, resolved to an absolute URL with its caption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    pub url: Url,
    pub caption: String,
}

/// Extract image+caption candidates from rendered HTML.
///
/// Containers are located with a cascade of fallback strategies; within each
/// container the caption is resolved with its own cascade. A container that
/// cannot be processed is skipped and never aborts the page, so this function
/// does not fail.
pub fn extract(html: &str, page_url: &Url) -> Vec<ImageCandidate> {
    let doc = Html::parse_document(html);
    let containers = discover_containers(&doc);

    ::log::info!("Found {} image containers", containers.len());

    let mut candidates = Vec::new();
    for (idx, container) in containers.into_iter().enumerate() {
        match process_container(container, page_url) {
            Some(candidate) => candidates.push(candidate),
            None => ::log::debug!("Container {} yielded no image", idx),
        }
    }
    candidates
}

/// Locate candidate image containers, trying strategies in fixed priority
/// order and stopping at the first one that yields any result.
fn discover_containers(doc: &Html) -> Vec<ElementRef<'_>> {
    let marker = Selector::parse(r#"[class*="image-container"]"#).unwrap();
    let found: Vec<_> = doc.select(&marker).collect();
    if !found.is_empty() {
        return dedup_by_identity(found);
    }

    let figure = Selector::parse("figure").unwrap();
    let found: Vec<_> = doc.select(&figure).collect();
    if !found.is_empty() {
        return dedup_by_identity(found);
    }

    let found = paired_blocks(doc);
    if !found.is_empty() {
        return dedup_by_identity(found);
    }

    ::log::warn!("No standard containers found, falling back to bare <img> tags");
    dedup_by_identity(bare_images(doc))
}

/// Blocks that hold both an image and a caption-like element as descendants
fn paired_blocks(doc: &Html) -> Vec<ElementRef<'_>> {
    let block = Selector::parse("div").unwrap();
    let img = Selector::parse("img").unwrap();
    let caption_like = Selector::parse("figcaption, p, span").unwrap();

    doc.select(&block)
        .filter(|div| div.select(&img).next().is_some() && div.select(&caption_like).next().is_some())
        .collect()
}

/// Absolute fallback: every image element directly, minus decorative ones.
///
/// The container is the image's parent so sibling captions stay reachable.
fn bare_images(doc: &Html) -> Vec<ElementRef<'_>> {
    let img = Selector::parse("img").unwrap();

    doc.select(&img)
        .filter(|el| !filter::is_decorative(el.value().attr("src").unwrap_or("")))
        .map(|el| el.parent().and_then(ElementRef::wrap).unwrap_or(el))
        .collect()
}

/// Drop repeated containers, keeping first-occurrence order.
fn dedup_by_identity(containers: Vec<ElementRef<'_>>) -> Vec<ElementRef<'_>> {
    let mut seen = HashSet::new();
    containers
        .into_iter()
        .filter(|el| seen.insert(el.id()))
        .collect()
}

/// Resolve one container into an image candidate, or skip it.
fn process_container(container: ElementRef<'_>, page_url: &Url) -> Option<ImageCandidate> {
    let img_sel = Selector::parse("img").unwrap();
    let img = if container.value().name() == "img" {
        container
    } else {
        container.select(&img_sel).next()?
    };

    let src = image_source(img)?;
    if filter::is_inline_data(src) {
        ::log::debug!("Skipping inline data: image");
        return None;
    }

    let url = match page_url.join(src) {
        Ok(url) => url,
        Err(e) => {
            ::log::warn!("Could not resolve image source {:?}: {}", src, e);
            return None;
        }
    };

    let caption = extract_caption(container, img);
    Some(ImageCandidate { url, caption })
}

/// First non-empty of `src`, `data-src`, `data-lazy-src`, in that order
fn image_source(img: ElementRef<'_>) -> Option<&str> {
    ["src", "data-src", "data-lazy-src"]
        .into_iter()
        .find_map(|attr| img.value().attr(attr).filter(|s| !s.trim().is_empty()))
}

/// Resolve the caption for an image, first non-empty strategy wins.
fn extract_caption(container: ElementRef<'_>, img: ElementRef<'_>) -> String {
    caption_from_figcaption(container)
        .or_else(|| caption_from_class(container))
        .or_else(|| caption_from_attr(img, "alt"))
        .or_else(|| caption_from_attr(img, "title"))
        .or_else(|| caption_from_sibling(container))
        .unwrap_or_else(|| DEFAULT_CAPTION.to_string())
}

fn caption_from_figcaption(container: ElementRef<'_>) -> Option<String> {
    let figcaption = Selector::parse("figcaption").unwrap();
    container
        .select(&figcaption)
        .map(|el| element_text(el))
        .find(|text| !text.is_empty())
}

/// Any descendant whose class contains "caption", case-insensitively
fn caption_from_class(container: ElementRef<'_>) -> Option<String> {
    container
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.id() != container.id())
        .filter(|el| {
            el.value()
                .attr("class")
                .map(|class| class.to_lowercase().contains("caption"))
                .unwrap_or(false)
        })
        .map(|el| element_text(el))
        .find(|text| !text.is_empty())
}

/// Attribute text, only when long enough to plausibly describe the image.
/// Lengths are counted in characters, not bytes, so CJK captions measure
/// the same as Latin ones.
fn caption_from_attr(img: ElementRef<'_>, attr: &str) -> Option<String> {
    img.value()
        .attr(attr)
        .map(str::trim)
        .filter(|text| text.chars().count() > 3)
        .map(str::to_string)
}

/// The nearest following sibling block, only when its text is caption-sized
fn caption_from_sibling(container: ElementRef<'_>) -> Option<String> {
    let sibling = container
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| matches!(el.value().name(), "p" | "span" | "div"))?;

    let text = element_text(sibling);
    if !text.is_empty() && text.chars().count() < MAX_SIBLING_CAPTION_CHARS {
        Some(text)
    } else {
        None
    }
}

/// Whitespace-normalized text content of an element
fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the local filename for the image at the given 1-based dataset index.
///
/// The extension comes from the URL path and is kept as-is (case included) when
/// it is at most 5 characters counting the dot; missing or implausibly long
/// extensions default to `.jpg`.
pub fn image_filename(url: &Url, index: usize) -> String {
    format!("image_{:04}{}", index, path_extension(url.path()))
}

fn path_extension(path: &str) -> String {
    let name = path.rsplit('/').next().unwrap_or("");
    match name.rfind('.') {
        Some(pos) if pos > 0 => {
            let ext = &name[pos..];
            if ext.len() <= 5 {
                ext.to_string()
            } else {
                ".jpg".to_string()
            }
        }
        _ => ".jpg".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://2025.igem.wiki/team/results").unwrap()
    }

    fn extract_all(html: &str) -> Vec<ImageCandidate> {
        extract(html, &page_url())
    }

    #[test]
    fn test_marker_class_wins_over_figure() {
        let html = r#"
            <div class="hero image-container"><img src="/a.jpg" alt="marker image"></div>
            <figure><img src="/b.jpg"><figcaption>Figure B</figcaption></figure>
        "#;
        let candidates = extract_all(html);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].url.path(), "/a.jpg");
    }

    #[test]
    fn test_figure_fallback() {
        let html = r#"
            <figure><img src="/b.jpg"><figcaption>Figure B</figcaption></figure>
        "#;
        let candidates = extract_all(html);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].url.path(), "/b.jpg");
        assert_eq!(candidates[0].caption, "Figure B");
    }

    #[test]
    fn test_paired_block_fallback() {
        let html = r#"
            <div><img src="/c.png"><p class="img-caption">Paired caption</p></div>
        "#;
        let candidates = extract_all(html);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].url.path(), "/c.png");
        assert_eq!(candidates[0].caption, "Paired caption");
    }

    #[test]
    fn test_bare_image_fallback_skips_decorative() {
        let html = r#"
            <div><img src="/header-Logo.png"></div>
            <div><img src="/favicon.ico"></div>
            <div><img src="/figures/result.jpg" alt="a real figure"></div>
        "#;
        let candidates = extract_all(html);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].url.path(), "/figures/result.jpg");
    }

    #[test]
    fn test_shared_parent_is_processed_once() {
        // Two bare images under one parent resolve to the same container,
        // which must not be processed twice.
        let html = r#"
            <div><img src="/one.jpg"><img src="/two.jpg"></div>
        "#;
        let candidates = extract_all(html);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].url.path(), "/one.jpg");
    }

    #[test]
    fn test_inline_data_source_is_skipped() {
        let html = r#"
            <figure><img src="data:image/png;base64,AAAA"><figcaption>Inline</figcaption></figure>
        "#;
        assert!(extract_all(html).is_empty());
    }

    #[test]
    fn test_data_src_fallback_resolves_against_page() {
        let html = r#"
            <figure><img data-src="lazy/pic.jpg"><figcaption>Lazy</figcaption></figure>
        "#;
        let candidates = extract_all(html);
        assert_eq!(candidates.len(), 1);
        assert_eq!(
            candidates[0].url,
            page_url().join("lazy/pic.jpg").unwrap()
        );
    }

    #[test]
    fn test_empty_src_falls_through_to_data_src() {
        let html = r#"
            <figure><img src="" data-src="/real.jpg"><figcaption>Real</figcaption></figure>
        "#;
        let candidates = extract_all(html);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].url.path(), "/real.jpg");
    }

    #[test]
    fn test_data_lazy_src_is_last_resort() {
        let html = r#"
            <figure><img data-src="/eager.jpg" data-lazy-src="/lazy.jpg"><figcaption>X</figcaption></figure>
        "#;
        let candidates = extract_all(html);
        assert_eq!(candidates[0].url.path(), "/eager.jpg");

        let html = r#"
            <figure><img data-lazy-src="/lazy.jpg"><figcaption>X</figcaption></figure>
        "#;
        let candidates = extract_all(html);
        assert_eq!(candidates[0].url.path(), "/lazy.jpg");
    }

    #[test]
    fn test_image_without_source_is_skipped() {
        let html = r#"<figure><img alt="no source"><figcaption>X</figcaption></figure>"#;
        assert!(extract_all(html).is_empty());
    }

    #[test]
    fn test_caption_class_beats_alt() {
        let html = r#"
            <div class="image-container">
                <img src="/a.jpg" alt="B, longer than three chars">
                <span class="photo-Caption">A</span>
            </div>
        "#;
        let candidates = extract_all(html);
        assert_eq!(candidates[0].caption, "A");
    }

    #[test]
    fn test_figcaption_beats_caption_class() {
        let html = r#"
            <figure>
                <img src="/a.jpg">
                <span class="caption">from class</span>
                <figcaption>from figcaption</figcaption>
            </figure>
        "#;
        let candidates = extract_all(html);
        assert_eq!(candidates[0].caption, "from figcaption");
    }

    #[test]
    fn test_short_alt_is_rejected() {
        // "abc" is exactly 3 chars, below the threshold; title takes over
        let html = r#"
            <div class="image-container">
                <img src="/a.jpg" alt="abc" title="a descriptive title">
            </div>
        "#;
        let candidates = extract_all(html);
        assert_eq!(candidates[0].caption, "a descriptive title");
    }

    #[test]
    fn test_sibling_caption_when_nothing_inside() {
        let html = r#"
            <div class="image-container"><img src="/a.jpg"></div>
            <p>Text right after the container</p>
        "#;
        let candidates = extract_all(html);
        assert_eq!(candidates[0].caption, "Text right after the container");
    }

    #[test]
    fn test_short_cjk_alt_is_rejected() {
        // Two CJK characters are six bytes but still below the threshold
        let html = r#"
            <div class="image-container"><img src="/a.jpg" alt="图片"></div>
        "#;
        let candidates = extract_all(html);
        assert_eq!(candidates[0].caption, DEFAULT_CAPTION);
    }

    #[test]
    fn test_cjk_sibling_caption_under_limit_is_kept() {
        // 100 CJK characters exceed 200 bytes but stay under the character cap
        let caption = "图".repeat(100);
        let html = format!(
            r#"<div class="image-container"><img src="/a.jpg"></div><p>{}</p>"#,
            caption
        );
        let candidates = extract_all(&html);
        assert_eq!(candidates[0].caption, caption);
    }

    #[test]
    fn test_long_sibling_text_is_not_a_caption() {
        let long = "x".repeat(250);
        let html = format!(
            r#"<div class="image-container"><img src="/a.jpg"></div><p>{}</p>"#,
            long
        );
        let candidates = extract_all(&html);
        assert_eq!(candidates[0].caption, DEFAULT_CAPTION);
    }

    #[test]
    fn test_default_caption() {
        let html = r#"<div class="image-container"><img src="/a.jpg"></div>"#;
        let candidates = extract_all(html);
        assert_eq!(candidates[0].caption, DEFAULT_CAPTION);
    }

    #[test]
    fn test_caption_whitespace_is_normalized() {
        let html = r#"
            <figure><img src="/a.jpg"><figcaption>
                Figure   1:
                a multi-line caption
            </figcaption></figure>
        "#;
        let candidates = extract_all(html);
        assert_eq!(candidates[0].caption, "Figure 1: a multi-line caption");
    }

    #[test]
    fn test_filename_keeps_extension_case() {
        let url = Url::parse("https://x/y/pic.PNG").unwrap();
        assert_eq!(image_filename(&url, 1), "image_0001.PNG");
    }

    #[test]
    fn test_filename_defaults_to_jpg_without_extension() {
        let url = Url::parse("https://x/y/pic").unwrap();
        assert_eq!(image_filename(&url, 1), "image_0001.jpg");
    }

    #[test]
    fn test_filename_rejects_implausible_extension() {
        let url = Url::parse("https://x/y/pic.download").unwrap();
        assert_eq!(image_filename(&url, 3), "image_0003.jpg");
    }

    #[test]
    fn test_filename_accepts_five_char_extension() {
        // ".jpeg" is 5 chars counting the dot, the longest plausible case
        let url = Url::parse("https://x/y/pic.jpeg").unwrap();
        assert_eq!(image_filename(&url, 12), "image_0012.jpeg");
    }

    #[test]
    fn test_filename_index_is_zero_padded() {
        let url = Url::parse("https://x/y/pic.gif").unwrap();
        assert_eq!(image_filename(&url, 1234), "image_1234.gif");
    }
}
