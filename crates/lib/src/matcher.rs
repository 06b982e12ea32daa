//! Intent matching: decide how to answer a user's text given the active catalog.
//!
//! Decision order, first hit wins:
//! 1. list-all trigger anywhere in the text;
//! 2. category search (`หมวดหมู่ <name>`), when enabled;
//! 3. keyword/title match, fuzzy when enabled, plain substring otherwise;
//! 4. not found, with or without quick-reply chips.

use crate::catalog::CatalogItem;
use crate::config::FeatureFlags;

/// Text that lists every active course.
pub const LIST_ALL_TRIGGER: &str = "ดูคอร์สทั้งหมด";

/// Prefix for category search; the rest of the text is the category query.
pub const CATEGORY_TRIGGER: &str = "หมวดหมู่";

pub const EMPTY_CATALOG_TEXT: &str = "ขณะนี้ยังไม่มีคอร์สที่เปิดสอนค่ะ";

pub const CATEGORY_MISSING_TEXT: &str =
    "กรุณาระบุหมวดหมู่ที่ต้องการค้นหา เช่น \"หมวดหมู่ เบเกอรี่\"";

/// Outcome of matching one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Reply with cards for these items (store order).
    ShowItems(Vec<CatalogItem>),
    /// Reply with this text.
    Prompt(String),
    /// Nothing matched; offer suggestion chips.
    NotFoundWithQuickReply,
    /// Nothing matched; plain text.
    NotFoundPlain,
}

/// Whitespace-insensitive, case-insensitive, bidirectional substring test.
///
/// `"bread"` matches `"Bread Baking"` and `"baking class"` matches `"baking"`, but `"bred"`
/// does not match `"bread"`: this is containment, not edit distance.
pub fn fuzzy_match(input: &str, target: &str) -> bool {
    let i = squash(input);
    let t = squash(target);
    t.contains(&i) || i.contains(&t)
}

fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

fn category_not_found_text(category: &str) -> String {
    format!("ไม่พบคอร์สในหมวดหมู่ \"{}\"", category)
}

/// Stateless matcher configured with the process feature flags.
#[derive(Debug, Clone, Copy)]
pub struct IntentMatcher {
    flags: FeatureFlags,
}

impl IntentMatcher {
    pub fn new(flags: FeatureFlags) -> Self {
        Self { flags }
    }

    /// Classify lowercase user text against the active catalog.
    pub fn classify(&self, text: &str, catalog: &[CatalogItem]) -> Intent {
        if text.contains(LIST_ALL_TRIGGER) {
            if catalog.is_empty() {
                return Intent::Prompt(EMPTY_CATALOG_TEXT.to_string());
            }
            return Intent::ShowItems(catalog.to_vec());
        }

        if self.flags.category_search && text.starts_with(CATEGORY_TRIGGER) {
            return self.by_category(text, catalog);
        }

        let matched: Vec<CatalogItem> = catalog
            .iter()
            .filter(|item| self.item_matches(text, item))
            .cloned()
            .collect();
        if !matched.is_empty() {
            return Intent::ShowItems(matched);
        }

        if self.flags.quick_reply {
            Intent::NotFoundWithQuickReply
        } else {
            Intent::NotFoundPlain
        }
    }

    /// `หมวดหมู่ <words...>`: words after the first space, joined and trimmed, are the query.
    /// Without a space there is no argument; a blank argument searches for "" and so lists
    /// every course.
    fn by_category(&self, text: &str, catalog: &[CatalogItem]) -> Intent {
        let Some((_, rest)) = text.split_once(' ') else {
            return Intent::Prompt(CATEGORY_MISSING_TEXT.to_string());
        };
        let query = rest.trim().to_lowercase();
        let filtered: Vec<CatalogItem> = catalog
            .iter()
            .filter(|item| item.category.to_lowercase().contains(&query))
            .cloned()
            .collect();
        if filtered.is_empty() {
            Intent::Prompt(category_not_found_text(&query))
        } else {
            Intent::ShowItems(filtered)
        }
    }

    fn item_matches(&self, text: &str, item: &CatalogItem) -> bool {
        let title = item.title.to_lowercase();
        if self.flags.fuzzy_search {
            // A blank tag or title is contained in every message, so it always matches.
            item.keyword_tags().any(|tag| fuzzy_match(text, tag)) || fuzzy_match(text, &title)
        } else {
            item.keywords.to_lowercase().contains(text) || title.contains(text)
        }
    }
}
