use std::ops::Range;

use url::Url;

/// A contiguous run of label text, optionally carrying a link target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub url: Option<Url>,
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
        }
    }

    pub fn link(text: impl Into<String>, url: Url) -> Self {
        Self {
            text: text.into(),
            url: Some(url),
        }
    }

    pub fn is_link(&self) -> bool {
        self.url.is_some()
    }
}

/// A detected link: its byte range in the plain text and the resolved URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkSpan<'a> {
    pub range: Range<usize>,
    pub text: &'a str,
    pub url: &'a Url,
}

/// Ordered plain/link segments whose texts concatenate to the label's text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyledText {
    segments: Vec<Segment>,
}

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single plain segment covering `text` (no segments for empty text).
    pub fn plain(text: &str) -> Self {
        let mut out = Self::new();
        out.push_plain(text);
        out
    }

    /// Appends plain text, merging with a preceding plain segment.
    pub fn push_plain(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.segments.last_mut() {
            Some(last) if !last.is_link() => last.text.push_str(text),
            _ => self.segments.push(Segment::plain(text)),
        }
    }

    pub fn push_link(&mut self, text: &str, url: Url) {
        if text.is_empty() {
            return;
        }
        self.segments.push(Segment::link(text, url));
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn to_plain_string(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Total length in chars.
    pub fn char_len(&self) -> usize {
        self.segments.iter().map(|s| s.text.chars().count()).sum()
    }

    pub fn links(&self) -> impl Iterator<Item = LinkSpan<'_>> {
        let mut offset = 0;
        self.segments.iter().filter_map(move |seg| {
            let start = offset;
            offset += seg.text.len();
            seg.url.as_ref().map(|url| LinkSpan {
                range: start..offset,
                text: seg.text.as_str(),
                url,
            })
        })
    }

    /// Segment containing the char at `char_index`.
    pub fn segment_at(&self, char_index: usize) -> Option<&Segment> {
        let mut remaining = char_index;
        for seg in &self.segments {
            let n = seg.text.chars().count();
            if remaining < n {
                return Some(seg);
            }
            remaining -= n;
        }
        None
    }

    /// Link target of the char at `char_index`, if it belongs to a link.
    pub fn link_at(&self, char_index: usize) -> Option<&Url> {
        self.segment_at(char_index).and_then(|s| s.url.as_ref())
    }

    /// Iterates chars with a flag telling whether each one is part of a link.
    pub fn chars_with_links(&self) -> impl Iterator<Item = (char, bool)> + '_ {
        self.segments
            .iter()
            .flat_map(|seg| seg.text.chars().map(move |ch| (ch, seg.is_link())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn plain_merges_adjacent_runs() {
        let mut st = StyledText::new();
        st.push_plain("ab");
        st.push_plain("");
        st.push_plain("cd");
        assert_eq!(st.segments(), &[Segment::plain("abcd")]);
    }

    #[test]
    fn empty_text_has_no_segments() {
        assert!(StyledText::plain("").is_empty());
    }

    #[test]
    fn link_lookup_by_char_index() {
        let mut st = StyledText::new();
        st.push_plain("go ");
        st.push_link("x.io", url("http://x.io"));
        st.push_plain(" ok");
        assert_eq!(st.link_at(2), None);
        assert_eq!(st.link_at(3), Some(&url("http://x.io/")));
        assert_eq!(st.link_at(6), Some(&url("http://x.io/")));
        assert_eq!(st.link_at(7), None);
        assert_eq!(st.link_at(100), None);
        assert_eq!(st.char_len(), 10);
    }

    #[test]
    fn char_index_counts_scalars_not_bytes() {
        let mut st = StyledText::new();
        st.push_plain("héé ");
        st.push_link("a.io", url("http://a.io"));
        assert!(st.link_at(3).is_none());
        assert!(st.link_at(4).is_some());
    }

    #[test]
    fn links_report_byte_ranges() {
        let mut st = StyledText::new();
        st.push_plain("é ");
        st.push_link("a.io", url("http://a.io"));
        let spans: Vec<_> = st.links().collect();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].range, 3..7);
        assert_eq!(spans[0].text, "a.io");
        assert_eq!(st.to_plain_string(), "é a.io");
    }
}
