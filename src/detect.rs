//! Link detection: finds URL-like tokens and splits text into plain/link
//! segments.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use linkify::{LinkFinder, LinkKind};
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::styled::StyledText;

/// Source of link token ranges.
///
/// Implementations return byte ranges into `text`, ordered by position and
/// non-overlapping. Ranges that violate this are skipped by [`detect_links`].
pub trait LinkMatcher: fmt::Debug {
    fn find_links(&self, text: &str) -> Result<Vec<Range<usize>>>;
}

/// Default matcher backed by `linkify`, accepting bare domains such as
/// `example.com/path`.
pub struct LinkifyMatcher {
    finder: LinkFinder,
}

impl LinkifyMatcher {
    pub fn new() -> Self {
        let mut finder = LinkFinder::new();
        finder.url_must_have_scheme(false);
        finder.kinds(&[LinkKind::Url]);
        Self { finder }
    }
}

impl Default for LinkifyMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LinkifyMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkifyMatcher").finish_non_exhaustive()
    }
}

impl LinkMatcher for LinkifyMatcher {
    fn find_links(&self, text: &str) -> Result<Vec<Range<usize>>> {
        Ok(self
            .finder
            .links(text)
            .map(|link| link.start()..link.end())
            .collect())
    }
}

/// Matcher that only accepts explicit `http://` and `https://` URLs.
#[derive(Clone, Copy, Debug, Default)]
pub struct SchemeMatcher;

impl LinkMatcher for SchemeMatcher {
    fn find_links(&self, text: &str) -> Result<Vec<Range<usize>>> {
        let mut results = Vec::new();
        let bytes = text.as_bytes();
        let mut i = 0;

        while i < text.len() {
            let rest = &text[i..];
            let scheme_len = if rest.starts_with("https://") {
                8
            } else if rest.starts_with("http://") {
                7
            } else {
                // Advance to the next char boundary.
                i += rest.chars().next().map_or(1, char::len_utf8);
                continue;
            };

            let start = i;
            let mut end = start;
            for (off, ch) in rest.char_indices() {
                if ch.is_whitespace() || matches!(ch, '"' | '\'' | '<' | '>') {
                    break;
                }
                end = start + off + ch.len_utf8();
            }
            // Trailing punctuation is almost never part of the URL.
            while end > start
                && matches!(
                    bytes[end - 1],
                    b'.' | b',' | b')' | b']' | b';' | b':' | b'!' | b'?'
                )
            {
                end -= 1;
            }
            if end > start + scheme_len {
                results.push(start..end);
                i = end;
            } else {
                i = start + scheme_len;
            }
        }

        Ok(results)
    }
}

/// Which built-in matcher a label uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatcherKind {
    #[default]
    Linkify,
    Scheme,
}

impl MatcherKind {
    pub fn build(self) -> Box<dyn LinkMatcher> {
        match self {
            MatcherKind::Linkify => Box::new(LinkifyMatcher::new()),
            MatcherKind::Scheme => Box::new(SchemeMatcher),
        }
    }
}

impl FromStr for MatcherKind {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linkify" => Ok(MatcherKind::Linkify),
            "scheme" => Ok(MatcherKind::Scheme),
            _ => Err(Error::UnknownMatcher(s.to_string())),
        }
    }
}

fn has_http_scheme(token: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        token
            .get(..scheme.len())
            .is_some_and(|p| p.eq_ignore_ascii_case(scheme))
    })
}

/// Turns a link token into an absolute URL, prefixing `http://` when the
/// token does not already carry an `http://` or `https://` scheme.
pub fn resolve_url(token: &str) -> Option<Url> {
    let has_scheme = has_http_scheme(token);
    let parsed = if has_scheme {
        Url::parse(token)
    } else {
        Url::parse(&format!("http://{token}"))
    };
    match parsed {
        Ok(url) => Some(url),
        Err(e) => {
            debug!(token, error = %e, "link token is not a valid url");
            None
        }
    }
}

/// Splits `text` into plain and link segments.
///
/// Slicing is done by the matcher's reported offsets, so a token whose text
/// recurs elsewhere never shifts a later split. Without a matcher, or when the
/// matcher fails, the whole text comes back as one plain segment.
pub fn detect_links(text: &str, matcher: Option<&dyn LinkMatcher>) -> StyledText {
    let Some(matcher) = matcher else {
        return StyledText::plain(text);
    };
    let ranges = match matcher.find_links(text) {
        Ok(ranges) => ranges,
        Err(e) => {
            debug!(error = %e, "link matcher failed, treating text as plain");
            return StyledText::plain(text);
        }
    };

    let mut out = StyledText::new();
    let mut emitted = 0;
    let mut last_end = 0;
    for range in ranges {
        let usable = range.start >= last_end
            && range.start < range.end
            && range.end <= text.len()
            && text.is_char_boundary(range.start)
            && text.is_char_boundary(range.end);
        if !usable {
            debug!(?range, "skipping unusable link range");
            continue;
        }
        last_end = range.end;

        let token = &text[range.clone()];
        if let Some(url) = resolve_url(token) {
            out.push_plain(&text[emitted..range.start]);
            out.push_link(token, url);
            emitted = range.end;
        }
    }
    out.push_plain(&text[emitted..]);

    debug!(
        links = out.links().count(),
        segments = out.segments().len(),
        "detected links"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styled::Segment;

    #[derive(Debug)]
    struct FixedMatcher(Vec<Range<usize>>);

    impl LinkMatcher for FixedMatcher {
        fn find_links(&self, _text: &str) -> Result<Vec<Range<usize>>> {
            Ok(self.0.clone())
        }
    }

    #[derive(Debug)]
    struct FailingMatcher;

    impl LinkMatcher for FailingMatcher {
        fn find_links(&self, _text: &str) -> Result<Vec<Range<usize>>> {
            Err(Error::Matcher("unavailable".into()))
        }
    }

    fn detect(text: &str) -> StyledText {
        detect_links(text, Some(&LinkifyMatcher::new()))
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn concatenation_reproduces_input() {
        let inputs = [
            "",
            "no links here",
            "visit example.com now",
            "example.com",
            "one.com two.org three.net",
            "example.com example.com",
            "see https://example.com/x, then http://example.org.",
            "héllo wörld.de ünd mehr",
            "line one\nexample.com/path\n\nend",
        ];
        for input in inputs {
            let st = detect(input);
            assert_eq!(st.to_plain_string(), input, "input: {input:?}");
            assert!(
                st.segments().iter().all(|s| !s.text.is_empty()),
                "empty segment for {input:?}"
            );
        }
    }

    #[test]
    fn no_link_passthrough() {
        let st = detect("just some words");
        assert_eq!(st.segments(), &[Segment::plain("just some words")]);
    }

    #[test]
    fn bare_domain_gets_http_scheme() {
        let st = detect("go to example.com/path please");
        let links: Vec<_> = st.links().collect();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].text, "example.com/path");
        assert_eq!(links[0].url.as_str(), "http://example.com/path");
    }

    #[test]
    fn existing_scheme_is_kept() {
        let st = detect("https://example.com");
        assert_eq!(st.segments().len(), 1);
        assert_eq!(st.link_at(0), Some(&url("https://example.com")));
    }

    #[test]
    fn scheme_check_ignores_case() {
        assert_eq!(
            resolve_url("HTTPS://Example.com").map(|u| u.scheme().to_string()),
            Some("https".to_string())
        );
    }

    #[test]
    fn host_starting_with_http_is_not_a_scheme() {
        assert_eq!(
            resolve_url("httpbin.org/get").map(String::from),
            Some("http://httpbin.org/get".to_string())
        );
        assert_eq!(
            resolve_url("HTTP://httpbin.org").map(String::from),
            Some("http://httpbin.org/".to_string())
        );
        let st = detect("try httpbin.org/get");
        assert_eq!(st.links().map(|l| l.text).collect::<Vec<_>>(), vec!["httpbin.org/get"]);
    }

    #[test]
    fn matcher_kind_names() {
        assert_eq!("Scheme".parse::<MatcherKind>().unwrap(), MatcherKind::Scheme);
        assert_eq!("linkify".parse::<MatcherKind>().unwrap(), MatcherKind::Linkify);
        assert!(matches!(
            "linkfy".parse::<MatcherKind>(),
            Err(Error::UnknownMatcher(ref s)) if s == "linkfy"
        ));
    }

    #[test]
    fn repeated_token_splits_by_offset() {
        let text = "example.com x example.com";
        let st = detect(text);
        let ranges: Vec<_> = st.links().map(|l| l.range).collect();
        assert_eq!(ranges, vec![0..11, 14..25]);
        assert_eq!(st.to_plain_string(), text);
    }

    #[test]
    fn adjacent_links_stay_separate() {
        let text = "http://a.comhttp://b.com";
        let st = detect_links(text, Some(&FixedMatcher(vec![0..12, 12..24])));
        assert_eq!(
            st.segments(),
            &[
                Segment::link("http://a.com", url("http://a.com")),
                Segment::link("http://b.com", url("http://b.com")),
            ]
        );
    }

    #[test]
    fn invalid_token_stays_plain() {
        let text = "bad http://[zz and good.com";
        let st = detect_links(text, Some(&FixedMatcher(vec![4..14, 19..27])));
        assert_eq!(
            st.segments(),
            &[
                Segment::plain("bad http://[zz and "),
                Segment::link("good.com", url("http://good.com")),
            ]
        );
    }

    #[test]
    fn unusable_ranges_are_skipped() {
        let text = "héllo a.io";
        // 2 is inside 'é'; 7..6 is reversed; 7..99 is out of bounds.
        let ranges = vec![2..4, 7..6, 7..99, 7..11, 8..11];
        let st = detect_links(text, Some(&FixedMatcher(ranges)));
        assert_eq!(
            st.segments(),
            &[
                Segment::plain("héllo "),
                Segment::link("a.io", url("http://a.io")),
            ]
        );
    }

    #[test]
    fn missing_or_failing_matcher_degrades_to_plain() {
        let text = "see example.com";
        assert_eq!(detect_links(text, None).segments(), &[Segment::plain(text)]);
        assert_eq!(
            detect_links(text, Some(&FailingMatcher)).segments(),
            &[Segment::plain(text)]
        );
        assert!(detect_links("", None).is_empty());
    }

    #[test]
    fn scheme_matcher_finds_explicit_urls() {
        let text = "a https://x.io/p, b http://y.org. c z.com http://";
        let found = SchemeMatcher.find_links(text).unwrap();
        let tokens: Vec<_> = found.iter().map(|r| &text[r.clone()]).collect();
        assert_eq!(tokens, vec!["https://x.io/p", "http://y.org"]);
    }

    #[test]
    fn scheme_matcher_handles_multibyte_text() {
        let text = "日本 https://例え.jp 終";
        let st = detect_links(text, Some(&SchemeMatcher));
        assert_eq!(st.to_plain_string(), text);
        assert_eq!(st.links().count(), 1);
    }
}
