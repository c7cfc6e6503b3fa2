use crate::{ColorValue, Segment, StyledSegment};
use owo_colors::{OwoColorize, Style};
use serde::Serialize;

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "snake_case")]
enum ClickEventType {
    OpenUrl,
}

#[derive(Serialize, Debug, Clone)]
struct ClickEvent {
    action: ClickEventType,
    value: String,
}

/// This is only used for `ChatComponent` serialize
#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(field: &bool) -> bool {
    !*field
}

/// Wire form of a segment in the JSON chat format.
#[derive(Serialize, Default, Debug, Clone)]
struct ChatComponent {
    text: String,
    #[serde(skip_serializing_if = "is_false")]
    bold: bool,
    #[serde(skip_serializing_if = "is_false")]
    italic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "clickEvent")]
    click_event: Option<ClickEvent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    extra: Vec<ChatComponent>,
}

impl From<&StyledSegment> for ChatComponent {
    fn from(segment: &StyledSegment) -> Self {
        ChatComponent {
            text: segment.text.clone(),
            bold: segment.bold,
            italic: segment.italic,
            color: match segment.color {
                ColorValue::Default => None,
                color => Some(color.hex()),
            },
            click_event: segment.link.as_ref().map(|link| ClickEvent {
                action: ClickEventType::OpenUrl,
                value: link.clone(),
            }),
            extra: Vec::new(),
        }
    }
}

impl From<&Segment> for ChatComponent {
    fn from(segment: &Segment) -> Self {
        match segment {
            Segment::Text(segment) => segment.into(),
            Segment::LineBreak => ChatComponent {
                text: "\n".to_string(),
                ..Default::default()
            },
        }
    }
}

impl StyledSegment {
    pub fn to_chat_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&ChatComponent::from(self))
    }
}

/// Encodes `segments` as a single JSON chat component: an empty root whose
/// `extra` holds one component per segment.
pub fn encode_json(segments: &[Segment]) -> serde_json::Result<String> {
    let root = ChatComponent {
        extra: segments.iter().map(ChatComponent::from).collect(),
        ..Default::default()
    };
    serde_json::to_string(&root)
}

/// Renders `segments` for a terminal using 24-bit color escapes. Links are
/// underlined.
pub fn to_ansi(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        let segment = match segment {
            Segment::Text(segment) => segment,
            Segment::LineBreak => {
                out.push('\n');
                continue;
            }
        };
        if segment.is_text_only() {
            out.push_str(&segment.text);
            continue;
        }

        let mut style = Style::new();
        if let ColorValue::Named(color) = segment.color {
            let (r, g, b) = color.rgb();
            style = style.truecolor(r, g, b);
        }
        if segment.bold {
            style = style.bold();
        }
        if segment.italic {
            style = style.italic();
        }
        if segment.link.is_some() {
            style = style.underline();
        }
        out.push_str(&segment.text.style(style).to_string());
    }
    out
}

/// The text a reader sees, with line breaks as `\n`.
pub fn visible_text(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Text(segment) => segment.text.as_str(),
            Segment::LineBreak => "\n",
        })
        .collect()
}
