//! A text label that turns URL-like substrings into tappable links.
//!
//! [`LinkLabel`] owns the text and its [`StyledText`] segments. Taps go
//! through [`hit_test`], which lays the text out with the label's geometry and
//! maps the point to a character; if that character belongs to a link the URL
//! is handed to a [`UrlOpener`].

pub mod color;
pub mod config;
pub mod detect;
pub mod error;
pub mod font;
pub mod label;
pub mod layout;
pub mod opener;
pub mod renderer;
pub mod styled;

pub use detect::{
    detect_links, resolve_url, LinkMatcher, LinkifyMatcher, MatcherKind, SchemeMatcher,
};
pub use error::{Error, Result};
pub use hit_test::{hit_test, point_inside, TapResult};
pub use label::LinkLabel;
pub use layout::{
    FontMetrics, LayoutConfig, LineBreakMode, MonospaceMetrics, Point, Size, TextAlignment,
    TextLayout,
};
pub use opener::{RecordingOpener, SystemOpener, UrlOpener};
pub use styled::{LinkSpan, Segment, StyledText};
