//! Media Query - Parser and evaluator for the breakpoint query subset.
//!
//! Supported syntax:
//!
//! ```text
//! query-list  := query ("," query)*
//! query       := ["not" | "only"] media-type ["and" feature ("and" feature)*]
//!              | feature ("and" feature)*
//! media-type  := "all" | "screen" | "print" | "speech"
//! feature     := "(" name ":" value ")"
//! name        := width | min-width | max-width
//!              | height | min-height | max-height | orientation
//! value       := number ["px" | "em" | "rem"] | "portrait" | "landscape"
//! ```
//!
//! Tokenizing follows CSS syntax rules, so comments and whitespace are
//! ignored and a block left open at the end of input is closed there.
//! Names and keywords are case-insensitive. Lengths must be finite.
//! Anything else is rejected at parse time.

use bitflags::bitflags;
use cssparser::{
    match_ignore_ascii_case, BasicParseErrorKind, ParseError, ParseErrorKind, Parser, ParserInput,
    Token,
};

use super::viewport::{Orientation, Viewport};

/// Pixels per `em`/`rem` unit.
const EM_PX: f32 = 16.0;

bitflags! {
    /// Viewport features a query depends on.
    ///
    /// Used to skip re-evaluating watches when only an unrelated
    /// dimension of the viewport changed.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct QueryFeatures: u8 {
        const WIDTH = 1 << 0;
        const HEIGHT = 1 << 1;
        const ORIENTATION = 1 << 2;
    }
}

/// Media type prefix of a query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaType {
    All,
    Screen,
    Print,
    Speech,
}

impl MediaType {
    fn parse(word: &str) -> Option<Self> {
        match_ignore_ascii_case! { word,
            "all" => Some(Self::All),
            "screen" => Some(Self::Screen),
            "print" => Some(Self::Print),
            "speech" => Some(Self::Speech),
            _ => None,
        }
    }

    /// Viewports are always screens.
    fn matches(self) -> bool {
        matches!(self, Self::All | Self::Screen)
    }
}

/// One feature test, e.g. `(min-width: 600px)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MediaFeature {
    Width(f32),
    MinWidth(f32),
    MaxWidth(f32),
    Height(f32),
    MinHeight(f32),
    MaxHeight(f32),
    Orientation(Orientation),
}

impl MediaFeature {
    fn matches(&self, viewport: &Viewport) -> bool {
        match *self {
            Self::Width(px) => viewport.width == px,
            Self::MinWidth(px) => viewport.width >= px,
            Self::MaxWidth(px) => viewport.width <= px,
            Self::Height(px) => viewport.height == px,
            Self::MinHeight(px) => viewport.height >= px,
            Self::MaxHeight(px) => viewport.height <= px,
            Self::Orientation(orientation) => viewport.orientation() == orientation,
        }
    }

    fn features(&self) -> QueryFeatures {
        match self {
            Self::Width(_) | Self::MinWidth(_) | Self::MaxWidth(_) => QueryFeatures::WIDTH,
            Self::Height(_) | Self::MinHeight(_) | Self::MaxHeight(_) => QueryFeatures::HEIGHT,
            Self::Orientation(_) => QueryFeatures::ORIENTATION,
        }
    }
}

/// A single query of a comma-separated list.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaCondition {
    pub negated: bool,
    pub media_type: Option<MediaType>,
    pub features: Vec<MediaFeature>,
}

impl MediaCondition {
    fn matches(&self, viewport: &Viewport) -> bool {
        let type_ok = self.media_type.is_none_or(MediaType::matches);
        let result = type_ok && self.features.iter().all(|f| f.matches(viewport));
        result != self.negated
    }
}

/// A parsed media query list. Matches when any of its conditions matches.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaQuery {
    source: String,
    conditions: Vec<MediaCondition>,
}

impl MediaQuery {
    /// Parse query text. The error string describes the first problem found.
    pub fn parse(source: &str) -> Result<Self, String> {
        if source.trim().is_empty() {
            return Err("empty media query".to_string());
        }
        let mut input = ParserInput::new(source);
        let mut parser = Parser::new(&mut input);
        let conditions = parser
            .parse_comma_separated(parse_condition)
            .map_err(describe)?;
        Ok(Self {
            source: source.to_string(),
            conditions,
        })
    }

    /// Original query text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parsed conditions, in source order.
    pub fn conditions(&self) -> &[MediaCondition] {
        &self.conditions
    }

    /// Evaluate against a viewport.
    pub fn matches(&self, viewport: &Viewport) -> bool {
        self.conditions.iter().any(|c| c.matches(viewport))
    }

    /// Viewport features this query reads.
    pub fn features(&self) -> QueryFeatures {
        self.conditions
            .iter()
            .flat_map(|c| c.features.iter())
            .fold(QueryFeatures::empty(), |acc, f| acc | f.features())
    }
}

// =============================================================================
// PARSING
// =============================================================================

type QueryError<'i> = ParseError<'i, String>;

fn describe(err: QueryError<'_>) -> String {
    match err.kind {
        ParseErrorKind::Custom(message) => message,
        ParseErrorKind::Basic(BasicParseErrorKind::EndOfInput) => {
            "unexpected end of media query".to_string()
        }
        ParseErrorKind::Basic(BasicParseErrorKind::UnexpectedToken(token)) => {
            format!("unexpected token {token:?}")
        }
        ParseErrorKind::Basic(other) => format!("{other:?}"),
    }
}

fn parse_condition<'i>(input: &mut Parser<'i, '_>) -> Result<MediaCondition, QueryError<'i>> {
    let mut negated = false;
    let mut media_type = None;
    let mut features = Vec::new();

    if input.try_parse(|p| p.expect_parenthesis_block()).is_ok() {
        features.push(input.parse_nested_block(parse_feature)?);
    } else {
        let mut word = input.expect_ident()?.clone();
        if word.eq_ignore_ascii_case("not") || word.eq_ignore_ascii_case("only") {
            negated = word.eq_ignore_ascii_case("not");
            word = input.expect_ident()?.clone();
        }
        match MediaType::parse(&word) {
            Some(parsed) => media_type = Some(parsed),
            None => {
                return Err(input.new_custom_error(format!("unknown media type '{}'", &*word)));
            }
        }
    }

    while !input.is_exhausted() {
        input.expect_ident_matching("and")?;
        input.expect_parenthesis_block()?;
        features.push(input.parse_nested_block(parse_feature)?);
    }

    Ok(MediaCondition {
        negated,
        media_type,
        features,
    })
}

fn parse_feature<'i>(input: &mut Parser<'i, '_>) -> Result<MediaFeature, QueryError<'i>> {
    let name = input.expect_ident()?.clone();
    input.expect_colon()?;
    let feature = match_ignore_ascii_case! { &*name,
        "width" => MediaFeature::Width(parse_length(input)?),
        "min-width" => MediaFeature::MinWidth(parse_length(input)?),
        "max-width" => MediaFeature::MaxWidth(parse_length(input)?),
        "height" => MediaFeature::Height(parse_length(input)?),
        "min-height" => MediaFeature::MinHeight(parse_length(input)?),
        "max-height" => MediaFeature::MaxHeight(parse_length(input)?),
        "orientation" => MediaFeature::Orientation(parse_orientation(input)?),
        _ => return Err(input.new_custom_error(format!("unsupported media feature '{}'", &*name))),
    };
    Ok(feature)
}

fn parse_orientation<'i>(input: &mut Parser<'i, '_>) -> Result<Orientation, QueryError<'i>> {
    let value = input.expect_ident()?.clone();
    match_ignore_ascii_case! { &*value,
        "portrait" => Ok(Orientation::Portrait),
        "landscape" => Ok(Orientation::Landscape),
        _ => Err(input.new_custom_error(format!("unknown orientation '{}'", &*value))),
    }
}

/// A length in pixels. Unitless numbers are pixels.
fn parse_length<'i>(input: &mut Parser<'i, '_>) -> Result<f32, QueryError<'i>> {
    let location = input.current_source_location();
    let px = match *input.next()? {
        Token::Number { value, .. } => value,
        Token::Dimension {
            value, ref unit, ..
        } => {
            let scale = match_ignore_ascii_case! { &**unit,
                "px" => 1.0,
                "em" | "rem" => EM_PX,
                _ => return Err(location.new_custom_error(format!("unsupported unit '{}'", &**unit))),
            };
            value * scale
        }
        ref token => return Err(location.new_unexpected_token_error(token.clone())),
    };
    if !px.is_finite() {
        return Err(location.new_custom_error("length out of range".to_string()));
    }
    Ok(px)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vp(width: f32, height: f32) -> Viewport {
        Viewport::new(width, height)
    }

    #[test]
    fn test_screen_range() {
        let q = MediaQuery::parse("screen and (min-width: 600px) and (max-width: 959px)").unwrap();
        assert!(q.matches(&vp(600.0, 400.0)));
        assert!(q.matches(&vp(959.0, 400.0)));
        assert!(!q.matches(&vp(599.0, 400.0)));
        assert!(!q.matches(&vp(960.0, 400.0)));
        assert_eq!(q.features(), QueryFeatures::WIDTH);
    }

    #[test]
    fn test_comma_list_any() {
        let q = MediaQuery::parse(
            "(orientation: portrait) and (max-width: 599px), (orientation: landscape) and (max-width: 959px)",
        )
        .unwrap();
        assert!(q.matches(&vp(400.0, 800.0)));
        assert!(q.matches(&vp(900.0, 500.0)));
        assert!(!q.matches(&vp(700.0, 900.0)));
        assert_eq!(q.features(), QueryFeatures::WIDTH | QueryFeatures::ORIENTATION);
    }

    #[test]
    fn test_not_and_print() {
        let print = MediaQuery::parse("print").unwrap();
        assert!(!print.matches(&vp(800.0, 600.0)));

        let not_print = MediaQuery::parse("not print").unwrap();
        assert!(not_print.matches(&vp(800.0, 600.0)));

        let only = MediaQuery::parse("ONLY Screen AND (Max-Width: 50em)").unwrap();
        assert!(only.matches(&vp(800.0, 600.0)));
        assert!(!only.matches(&vp(801.0, 600.0)));
    }

    #[test]
    fn test_height_features() {
        let q = MediaQuery::parse("(min-height: 30) and (max-height: 40)").unwrap();
        assert!(q.matches(&vp(10.0, 35.0)));
        assert!(!q.matches(&vp(10.0, 41.0)));
        assert_eq!(q.features(), QueryFeatures::HEIGHT);
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(MediaQuery::parse("").is_err());
        assert!(MediaQuery::parse("screen and").is_err());
        assert!(MediaQuery::parse("tv").is_err());
        assert!(MediaQuery::parse("(min-width 600px)").is_err());
        assert!(MediaQuery::parse("(min-width: wide)").is_err());
        assert!(MediaQuery::parse("(hover: hover)").is_err());
        assert!(MediaQuery::parse("(min-width: 600vw)").is_err());
        assert!(MediaQuery::parse("(min-width: nan)").is_err());
        assert!(MediaQuery::parse("(max-width: inf)").is_err());
        assert!(MediaQuery::parse("(max-width: 1e60px)").is_err());
        assert!(MediaQuery::parse("screen or (min-width: 1px)").is_err());
        assert!(MediaQuery::parse("screen, ").is_err());
    }
}
