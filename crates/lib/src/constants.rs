//! # Shared Constants
//!
//! This module provides a centralized location for the fixed vocabularies and
//! keyword tables the pipeline relies on. They are process-wide immutable
//! constants, so concurrent pipeline runs can share them freely.

/// The closed set of attribute names the extractor is allowed to emit.
/// Anything outside this list is dropped regardless of confidence.
pub const EXTRACTABLE_ATTRIBUTES: &[&str] = &[
    "color",
    "material",
    "style",
    "occasion",
    "season",
    "fit",
    "size_type",
    "pattern",
    "gender",
    "age_group",
];

/// Currency markers stripped before a price string is parsed.
pub const CURRENCY_SYMBOLS: &[&str] = &["$", "USD", "EUR", "GBP", "CAD", "AUD"];

/// Colors recognized by the rule-based extractor and query parser,
/// scanned in order; the first match wins.
pub const COLOR_KEYWORDS: &[&str] = &[
    "red", "blue", "green", "black", "white", "pink", "yellow", "purple", "orange", "brown",
    "gray", "grey", "navy", "beige",
];

/// Materials recognized by the rule-based extractor, scanned in order.
pub const MATERIAL_KEYWORDS: &[&str] = &[
    "cotton",
    "leather",
    "silk",
    "wool",
    "polyester",
    "linen",
    "denim",
    "velvet",
    "suede",
    "nylon",
    "cashmere",
];

/// Product categories the rule-based query parser recognizes.
pub const CATEGORY_KEYWORDS: &[&str] = &[
    "shoes", "dress", "shirt", "pants", "jacket", "bag", "watch", "jewelry",
];

/// Gender cue words for the query parser. Precedence is women, men, kids.
pub const WOMEN_KEYWORDS: &[&str] = &[
    "women",
    "womens",
    "woman",
    "ladies",
    "her",
    "girlfriend",
    "wife",
];
pub const MEN_KEYWORDS: &[&str] = &["men", "mens", "man", "guys", "him", "boyfriend", "husband"];
pub const KIDS_KEYWORDS: &[&str] = &["kids", "children", "child", "boys", "girls"];

/// Minimum model-reported confidence accepted by default.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Rule-based extraction confidences. Deliberately conservative constants:
/// keyword hits carry less signal than a model judgement.
pub const RULE_COLOR_CONFIDENCE: f64 = 0.7;
pub const RULE_MATERIAL_CONFIDENCE: f64 = 0.75;
pub const RULE_GENDER_CONFIDENCE: f64 = 0.9;

/// Maximum description length forwarded to the model prompt.
pub const PROMPT_DESCRIPTION_LIMIT: usize = 1000;

/// Maximum description length rendered into embedding text.
pub const EMBEDDING_DESCRIPTION_LIMIT: usize = 500;

/// Length of the short description derived from a long description.
pub const SHORT_DESCRIPTION_LIMIT: usize = 200;

/// Maximum number of tags rendered into embedding text.
pub const EMBEDDING_TAG_LIMIT: usize = 5;

/// How often the progress callback fires during normalization.
pub const PROGRESS_INTERVAL: usize = 10;
