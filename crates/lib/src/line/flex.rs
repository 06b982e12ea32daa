//! Flex message layout types (bubble, carousel, components) as the LINE API expects them.

use serde::Serialize;

/// Carousel container: up to 12 bubbles shown side by side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Carousel {
    #[serde(rename = "type")]
    pub typ: String,
    pub contents: Vec<Bubble>,
}

impl Carousel {
    pub fn new(contents: Vec<Bubble>) -> Self {
        Self {
            typ: "carousel".to_string(),
            contents,
        }
    }
}

/// Single card: hero image, body, footer, optional section styles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bubble {
    #[serde(rename = "type")]
    pub typ: String,
    pub size: String,
    pub hero: FlexComponent,
    pub body: FlexComponent,
    pub footer: FlexComponent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles: Option<BubbleStyles>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleStyles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<SectionStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<SectionStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionStyle {
    pub background_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FlexComponent {
    Image {
        url: String,
        size: String,
        #[serde(rename = "aspectRatio")]
        aspect_ratio: String,
        #[serde(rename = "aspectMode")]
        aspect_mode: String,
    },
    #[serde(rename = "box")]
    Layout {
        layout: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        spacing: Option<String>,
        contents: Vec<FlexComponent>,
    },
    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        weight: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        wrap: Option<bool>,
    },
    Separator {
        #[serde(skip_serializing_if = "Option::is_none")]
        margin: Option<String>,
    },
    Button {
        style: String,
        color: String,
        action: Action,
    },
}

/// Tap action for buttons and quick-reply chips.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    /// Open a URL.
    Uri { label: String, uri: String },
    /// Send `text` as if the user typed it.
    Message { label: String, text: String },
}
