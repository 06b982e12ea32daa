//! Card composition: one catalog item -> one flex bubble.

use crate::catalog::CatalogItem;
use crate::config::FeatureFlags;
use crate::line::{Action, Bubble, BubbleStyles, FlexComponent, SectionStyle};

/// Render-ready card for one course.
pub type ReplyCard = Bubble;

pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/640x360?text=No+Image";
pub const DEFAULT_LINK_URL: &str = "https://your-default-link.com";
pub const ENROLL_LABEL: &str = "สมัครคอร์ส";

const TITLE_COLOR_THEMED: &str = "#C1440E";
const TITLE_COLOR_PLAIN: &str = "#000000";
const DESCRIPTION_COLOR: &str = "#555555";
const PRICE_COLOR: &str = "#008080";
const BUTTON_COLOR: &str = "#FFA07A";
const BODY_BACKGROUND: &str = "#FFF8F0";
const FOOTER_BACKGROUND: &str = "#FFF0E0";

/// Price line shown under the description.
pub fn price_line(price: &str) -> String {
    format!("💰 ราคา: {} บาท", price)
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// Builds cards; theming comes from the feature flags given at construction.
#[derive(Debug, Clone, Copy)]
pub struct CardComposer {
    themed: bool,
}

impl CardComposer {
    pub fn new(flags: &FeatureFlags) -> Self {
        Self {
            themed: flags.themed_cards,
        }
    }

    pub fn compose(&self, item: &CatalogItem) -> ReplyCard {
        let hero = FlexComponent::Image {
            url: or_default(&item.image_url, PLACEHOLDER_IMAGE_URL).to_string(),
            size: "full".to_string(),
            aspect_ratio: "16:9".to_string(),
            aspect_mode: "cover".to_string(),
        };

        let title_color = if self.themed {
            TITLE_COLOR_THEMED
        } else {
            TITLE_COLOR_PLAIN
        };
        let body = FlexComponent::Layout {
            layout: "vertical".to_string(),
            spacing: Some("md".to_string()),
            contents: vec![
                FlexComponent::Text {
                    text: item.title.clone(),
                    weight: Some("bold".to_string()),
                    size: Some("xl".to_string()),
                    color: Some(title_color.to_string()),
                    wrap: Some(true),
                },
                FlexComponent::Text {
                    text: item.description.clone(),
                    weight: None,
                    size: Some("sm".to_string()),
                    color: Some(DESCRIPTION_COLOR.to_string()),
                    wrap: Some(true),
                },
                FlexComponent::Separator {
                    margin: Some("md".to_string()),
                },
                FlexComponent::Text {
                    text: price_line(&item.price),
                    weight: Some("bold".to_string()),
                    size: Some("md".to_string()),
                    color: Some(PRICE_COLOR.to_string()),
                    wrap: None,
                },
            ],
        };

        let footer = FlexComponent::Layout {
            layout: "vertical".to_string(),
            spacing: None,
            contents: vec![FlexComponent::Button {
                style: "primary".to_string(),
                color: BUTTON_COLOR.to_string(),
                action: Action::Uri {
                    label: ENROLL_LABEL.to_string(),
                    uri: or_default(&item.link, DEFAULT_LINK_URL).to_string(),
                },
            }],
        };

        let styles = self.themed.then(|| BubbleStyles {
            body: Some(SectionStyle {
                background_color: BODY_BACKGROUND.to_string(),
            }),
            footer: Some(SectionStyle {
                background_color: FOOTER_BACKGROUND.to_string(),
            }),
        });

        Bubble {
            typ: "bubble".to_string(),
            size: "mega".to_string(),
            hero,
            body,
            footer,
            styles,
        }
    }
}
