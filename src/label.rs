use tracing::debug;
use url::Url;

use crate::detect::{detect_links, LinkMatcher, LinkifyMatcher};
use crate::hit_test::{hit_test, TapResult};
use crate::layout::{FontMetrics, LayoutConfig, Point, Size};
use crate::opener::UrlOpener;
use crate::styled::StyledText;

/// A text label whose URL-like substrings are tappable links.
///
/// Owns the plain text and the styled text derived from it; both are replaced
/// together on every [`set_text`](Self::set_text).
#[derive(Debug)]
pub struct LinkLabel {
    text: String,
    styled: StyledText,
    matcher: Option<Box<dyn LinkMatcher>>,
    pub config: LayoutConfig,
}

impl LinkLabel {
    pub fn new(text: impl Into<String>, bounds: Size) -> Self {
        Self::with_matcher(text, bounds, Some(Box::new(LinkifyMatcher::new())))
    }

    /// Label with a custom matcher; `None` disables link detection.
    pub fn with_matcher(
        text: impl Into<String>,
        bounds: Size,
        matcher: Option<Box<dyn LinkMatcher>>,
    ) -> Self {
        let text = text.into();
        let styled = detect_links(&text, matcher.as_deref());
        Self {
            text,
            styled,
            matcher,
            config: LayoutConfig::new(bounds),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.styled = detect_links(&self.text, self.matcher.as_deref());
        debug!(links = self.styled.links().count(), "label text replaced");
    }

    pub fn styled_text(&self) -> &StyledText {
        &self.styled
    }

    pub fn set_bounds(&mut self, bounds: Size) {
        self.config.bounds = bounds;
    }

    pub fn hit_test(&self, point: Point, metrics: &dyn FontMetrics) -> TapResult {
        let styled = (!self.styled.is_empty()).then_some(&self.styled);
        hit_test(point, &self.config, styled, metrics)
    }

    /// Link under `point`, without opening it.
    pub fn link_at(&self, point: Point, metrics: &dyn FontMetrics) -> Option<Url> {
        self.hit_test(point, metrics).url
    }

    /// Handles a tap: opens the link under `point`, if any, and returns
    /// whether the point is inside the label.
    pub fn tap(
        &self,
        point: Point,
        metrics: &dyn FontMetrics,
        opener: &mut dyn UrlOpener,
    ) -> bool {
        let result = self.hit_test(point, metrics);
        if let Some(url) = &result.url {
            opener.open_url(url);
        }
        result.inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::SchemeMatcher;
    use crate::layout::{MonospaceMetrics, TextAlignment};
    use crate::opener::RecordingOpener;

    const MONO: MonospaceMetrics = MonospaceMetrics::new(10.0, 20.0);

    #[test]
    fn tap_opens_link() {
        let label = LinkLabel::new("visit example.com now", Size::new(400.0, 20.0));
        let mut opener = RecordingOpener::default();
        assert!(label.tap(Point::new(85.0, 10.0), &MONO, &mut opener));
        assert_eq!(opener.opened.len(), 1);
        assert_eq!(opener.opened[0].as_str(), "http://example.com/");
    }

    #[test]
    fn tap_outside_link_opens_nothing() {
        let label = LinkLabel::new("visit example.com now", Size::new(400.0, 20.0));
        let mut opener = RecordingOpener::default();
        assert!(label.tap(Point::new(15.0, 10.0), &MONO, &mut opener));
        assert!(label.tap(Point::new(350.0, 10.0), &MONO, &mut opener));
        assert!(!label.tap(Point::new(450.0, 10.0), &MONO, &mut opener));
        assert!(opener.opened.is_empty());
    }

    #[test]
    fn set_text_reruns_detection() {
        let mut label = LinkLabel::new("nothing here", Size::new(400.0, 20.0));
        assert_eq!(label.styled_text().links().count(), 0);

        label.set_text("now see example.org");
        assert_eq!(label.text(), "now see example.org");
        assert_eq!(label.styled_text().links().count(), 1);

        label.set_text("gone again");
        assert_eq!(label.styled_text().links().count(), 0);
        assert_eq!(label.styled_text().to_plain_string(), "gone again");
    }

    #[test]
    fn matcher_is_pluggable() {
        let label = LinkLabel::with_matcher(
            "example.com and https://example.org",
            Size::new(400.0, 20.0),
            Some(Box::new(SchemeMatcher)),
        );
        let links: Vec<_> = label.styled_text().links().map(|l| l.text).collect();
        assert_eq!(links, vec!["https://example.org"]);

        let none = LinkLabel::with_matcher("example.com", Size::new(400.0, 20.0), None);
        assert_eq!(none.styled_text().links().count(), 0);
    }

    #[test]
    fn hover_lookup_follows_bounds_and_alignment() {
        let mut label = LinkLabel::new("example.com", Size::new(110.0, 20.0));
        assert!(label.link_at(Point::new(5.0, 10.0), &MONO).is_some());

        label.set_bounds(Size::new(310.0, 20.0));
        label.config.alignment = TextAlignment::Center;
        assert!(label.link_at(Point::new(105.0, 10.0), &MONO).is_some());
        // The text now ends at x = 210.
        assert!(label.link_at(Point::new(215.0, 10.0), &MONO).is_none());
        // Blank space before the centered text is not part of the link.
        assert!(label.link_at(Point::new(5.0, 10.0), &MONO).is_none());
    }

    #[test]
    fn centered_wrapped_label_ignores_blank_after_short_line() {
        let mut label = LinkLabel::new("aaaa example.com", Size::new(100.0, 100.0));
        label.config.alignment = TextAlignment::Center;
        let mut opener = RecordingOpener::default();
        assert!(label.tap(Point::new(80.0, 30.0), &MONO, &mut opener));
        assert!(opener.opened.is_empty());
        assert!(label.link_at(Point::new(80.0, 30.0), &MONO).is_none());

        assert!(label.tap(Point::new(25.0, 50.0), &MONO, &mut opener));
        assert_eq!(opener.opened.len(), 1);
    }

    #[test]
    fn empty_label_never_links() {
        let label = LinkLabel::new("", Size::new(100.0, 20.0));
        let mut opener = RecordingOpener::default();
        assert!(label.tap(Point::new(5.0, 5.0), &MONO, &mut opener));
        assert!(opener.opened.is_empty());
    }
}
