//! Legacy color code formatting for chat messages.
//!
//! Messages are written with the `&` (or `§`) markup used by Minecraft style
//! servers: `&c` selects red, `&l` turns on bold, `&r` resets everything.
//! [`Formatter`] turns such a string into a list of [`Segment`]s that a chat
//! sink can render, optionally turning URLs into clickable links.

mod render;

pub use render::{encode_json, to_ansi, visible_text};

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i-u)(https?://|www\.)[a-z0-9_\-.~:/?#\[\]@!$\&'()*+,;=%]+").unwrap()
});

static CODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new("[&§][0-9a-fk-or]").unwrap());

fn is_escape(ch: char) -> bool {
    ch == '&' || ch == '§'
}

/// Characters that end a sentence rather than a URL.
fn is_trailing_punctuation(ch: char) -> bool {
    matches!(ch, ')' | '.' | ',' | ';' | '!' | '?')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
}

impl NamedColor {
    pub const ALL: [NamedColor; 16] = [
        NamedColor::Black,
        NamedColor::DarkBlue,
        NamedColor::DarkGreen,
        NamedColor::DarkAqua,
        NamedColor::DarkRed,
        NamedColor::DarkPurple,
        NamedColor::Gold,
        NamedColor::Gray,
        NamedColor::DarkGray,
        NamedColor::Blue,
        NamedColor::Green,
        NamedColor::Aqua,
        NamedColor::Red,
        NamedColor::LightPurple,
        NamedColor::Yellow,
        NamedColor::White,
    ];

    pub fn from_code(code: char) -> Option<NamedColor> {
        let index = code.to_digit(16)?;
        // Uppercase hex digits are not color codes.
        if code.is_ascii_uppercase() {
            return None;
        }
        Some(Self::ALL[index as usize])
    }

    pub fn code(self) -> char {
        let index = Self::ALL.iter().position(|&c| c == self).unwrap_or_default();
        char::from_digit(index as u32, 16).unwrap_or('f')
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        use NamedColor::*;
        match self {
            Black => (0x00, 0x00, 0x00),
            DarkBlue => (0x00, 0x00, 0xAA),
            DarkGreen => (0x00, 0xAA, 0x00),
            DarkAqua => (0x00, 0xAA, 0xAA),
            DarkRed => (0xAA, 0x00, 0x00),
            DarkPurple => (0xAA, 0x00, 0xAA),
            Gold => (0xFF, 0xAA, 0x00),
            Gray => (0xAA, 0xAA, 0xAA),
            DarkGray => (0x55, 0x55, 0x55),
            Blue => (0x55, 0x55, 0xFF),
            Green => (0x55, 0xFF, 0x55),
            Aqua => (0x55, 0xFF, 0xFF),
            Red => (0xFF, 0x55, 0x55),
            LightPurple => (0xFF, 0x55, 0xFF),
            Yellow => (0xFF, 0xFF, 0x55),
            White => (0xFF, 0xFF, 0xFF),
        }
    }
}

/// The color of a segment. `Default` is what `&r` and the start of every line
/// select; it renders as white.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorValue {
    #[default]
    Default,
    Named(NamedColor),
}

impl ColorValue {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            ColorValue::Default => NamedColor::White.rgb(),
            ColorValue::Named(color) => color.rgb(),
        }
    }

    /// `#RRGGBB`
    pub fn hex(self) -> String {
        let (r, g, b) = self.rgb();
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }
}

impl From<NamedColor> for ColorValue {
    fn from(color: NamedColor) -> Self {
        ColorValue::Named(color)
    }
}

/// The character following an escape prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupCode {
    Color(NamedColor),
    Bold,
    Italic,
    Reset,
    /// Obfuscated (`k`), strikethrough (`m`) and underline (`n`) are consumed
    /// but have no visible effect.
    Inert(char),
}

impl MarkupCode {
    pub fn parse(code: char) -> Option<MarkupCode> {
        Some(match code {
            'l' => MarkupCode::Bold,
            'o' => MarkupCode::Italic,
            'r' => MarkupCode::Reset,
            'k' | 'm' | 'n' => MarkupCode::Inert(code),
            _ => MarkupCode::Color(NamedColor::from_code(code)?),
        })
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StyledSegment {
    pub text: String,
    pub color: ColorValue,
    pub bold: bool,
    pub italic: bool,
    pub link: Option<String>,
}

impl StyledSegment {
    pub fn is_text_only(&self) -> bool {
        !self.bold && !self.italic && self.color == ColorValue::Default && self.link.is_none()
    }
}

impl<S> From<S> for StyledSegment
where
    S: Into<String>,
{
    fn from(value: S) -> Self {
        StyledSegment {
            text: value.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(StyledSegment),
    /// Separates two lines of the input.
    LineBreak,
}

impl Segment {
    pub fn as_text(&self) -> Option<&StyledSegment> {
        match self {
            Segment::Text(segment) => Some(segment),
            Segment::LineBreak => None,
        }
    }
}

/// Style state while scanning a single line.
#[derive(Debug, Default, Clone, Copy)]
struct ParseState {
    color: ColorValue,
    bold: bool,
    italic: bool,
}

impl ParseState {
    fn apply(&mut self, code: MarkupCode) {
        match code {
            MarkupCode::Color(color) => self.color = ColorValue::Named(color),
            MarkupCode::Bold => self.bold = true,
            MarkupCode::Italic => self.italic = true,
            MarkupCode::Reset => *self = ParseState::default(),
            MarkupCode::Inert(_) => {}
        }
    }

    fn segment(&self, text: &str, link: Option<String>) -> StyledSegment {
        StyledSegment {
            text: text.to_owned(),
            color: self.color,
            bold: self.bold,
            italic: self.italic,
            link,
        }
    }

    fn push_run(&self, text: &str, out: &mut Vec<Segment>) {
        if !text.is_empty() {
            out.push(Segment::Text(self.segment(text, None)));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Detect URLs and emit them as clickable segments.
    pub links: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions { links: true }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Formatter {
    options: FormatOptions,
}

impl Formatter {
    pub const fn new(options: FormatOptions) -> Self {
        Formatter { options }
    }

    /// Splits `text` into styled segments. Every line starts with the default
    /// style, and lines are separated by [`Segment::LineBreak`]. Empty input
    /// produces no segments.
    pub fn format(&self, text: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                segments.push(Segment::LineBreak);
            }
            self.format_line(line, &mut segments);
        }
        segments
    }

    pub fn format_opt(&self, text: Option<&str>) -> Vec<Segment> {
        self.format(text.unwrap_or_default())
    }

    fn format_line(&self, line: &str, out: &mut Vec<Segment>) {
        let urls = if self.options.links {
            url_spans(line)
        } else {
            Vec::new()
        };
        let mut urls = urls.into_iter().peekable();
        let mut state = ParseState::default();
        let mut run_start = 0;

        let mut chars = line.char_indices().peekable();
        while let Some((pos, ch)) = chars.next() {
            // Markup inside a URL is part of the URL.
            if let Some(url) = urls.next_if(|url| url.start == pos) {
                state.push_run(&line[run_start..pos], out);
                let text = &line[url.clone()];
                out.push(Segment::Text(state.segment(text, Some(link_target(text)))));
                while chars.next_if(|&(i, _)| i < url.end).is_some() {}
                run_start = url.end;
                continue;
            }

            if !is_escape(ch) {
                continue;
            }
            let Some(&(code_pos, code_ch)) = chars.peek() else {
                continue;
            };
            if let Some(code) = MarkupCode::parse(code_ch) {
                chars.next();
                state.push_run(&line[run_start..pos], out);
                state.apply(code);
                run_start = code_pos + code_ch.len_utf8();
            }
        }
        state.push_run(&line[run_start..], out);
    }
}

/// Byte ranges of the URLs in `line`, with trailing sentence punctuation
/// left outside the range. A prefix with nothing after it is not a URL.
/// Prefixes match ASCII case-insensitively.
pub fn url_spans(line: &str) -> Vec<Range<usize>> {
    URL_REGEX
        .captures_iter(line)
        .filter_map(|caps| {
            let found = caps.get(0)?;
            let body_start = caps.get(1)?.end();
            let body = line[body_start..found.end()].trim_end_matches(is_trailing_punctuation);
            (!body.is_empty()).then(|| found.start()..body_start + body.len())
        })
        .collect()
}

fn link_target(url: &str) -> String {
    let has_www = url
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("www."));
    if has_www {
        format!("https://{}", url)
    } else {
        url.to_owned()
    }
}

/// Formats `text` with link detection enabled.
pub fn format(text: &str) -> Vec<Segment> {
    Formatter::new(FormatOptions { links: true }).format(text)
}

/// Formats `text` with color codes only; URLs stay plain text.
pub fn format_plain(text: &str) -> Vec<Segment> {
    Formatter::new(FormatOptions { links: false }).format(text)
}

/// Removes every color and style code, leaving the visible text. Used where
/// there is nowhere to render styling, like log output.
pub fn strip_color_codes(text: &str) -> String {
    CODE_REGEX.replace_all(text, "").into_owned()
}
