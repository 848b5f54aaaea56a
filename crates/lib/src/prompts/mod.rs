//! # Prompt Templates
//!
//! All prompts sent to an AI provider live here. User prompts use
//! `{placeholder}` markers filled in by simple string replacement at the
//! call site; the structured output schema is spelled out inline so the
//! model has no room to improvise.

/// The system prompt for attribute extraction.
pub const ATTRIBUTE_EXTRACTION_SYSTEM_PROMPT: &str =
    "You are a product attribute extractor. Return only valid JSON.";

/// The user prompt for attribute extraction.
/// Placeholders: {name}, {description}, {categories}, {brand}
pub const ATTRIBUTE_EXTRACTION_USER_PROMPT: &str = r#"Given a product's name and description, extract structured attributes.

RULES:
1. Only extract attributes you are confident about (confidence >= 0.7)
2. If unsure, do NOT include the attribute
3. Use simple, lowercase values (e.g., "blue" not "Navy Blue")
4. For multi-value attributes like color, pick the PRIMARY one
5. Return ONLY valid JSON, no markdown or explanation

Product Name: {name}
Product Description: {description}
Categories: {categories}
Brand: {brand}

Extract these attributes (only if confident):
- color: primary color of the product
- material: main material (cotton, leather, silk, etc.)
- style: style category (casual, formal, bohemian, minimalist, etc.)
- occasion: when to use (everyday, party, wedding, work, sport, etc.)
- season: seasonality (spring, summer, fall, winter, all-season)
- fit: fit type for clothing (slim, regular, loose, oversized)
- size_type: sizing category (petite, regular, plus, tall)
- pattern: pattern type (solid, striped, floral, geometric, etc.)
- gender: target gender (men, women, unisex, kids)
- age_group: target age (baby, kids, teens, adults, seniors)

Return JSON in this exact format:
{
  "attributes": [
    {"name": "color", "value": "blue", "confidence": 0.95},
    {"name": "material", "value": "cotton", "confidence": 0.85}
  ]
}

If no attributes can be confidently extracted, return:
{"attributes": []}
"#;

/// The system prompt for search query analysis.
pub const QUERY_ANALYSIS_SYSTEM_PROMPT: &str =
    "You extract search constraints from retail queries. Return only JSON.";

/// The user prompt for search query analysis.
/// Placeholder: {query}
pub const QUERY_ANALYSIS_USER_PROMPT: &str = r#"You are a search query analyzer for a retail product search engine. Given a user's natural language query, extract structured constraints.

RULES:
1. Only extract constraints that are EXPLICITLY stated or strongly implied
2. If unsure about a constraint, do NOT include it
3. Return ONLY valid JSON, no explanation

User Query: {query}

Extract these constraints (only if present):
- budget_max: maximum price in USD (number or null)
- budget_min: minimum price in USD (number or null)
- category: product category if mentioned (string or null)
- brand: specific brand if mentioned (string or null)
- color: color preference if mentioned (string or null)
- material: material preference if mentioned (string or null)
- style: style preference (casual, formal, etc.) (string or null)
- occasion: occasion if mentioned (party, work, etc.) (string or null)
- gender: target gender if mentioned (men, women, unisex, kids) (string or null)
- search_intent: the core search intent without constraints (string)

Examples:
- "blue dress under $50" -> {"budget_max": 50, "color": "blue", "category": "dress", "search_intent": "dress"}
- "comfortable running shoes" -> {"category": "shoes", "style": "athletic", "search_intent": "comfortable running shoes"}
- "gift for mom" -> {"occasion": "gift", "search_intent": "gift for mom"}

Return JSON:
"#;

/// Strips a markdown code fence from a model response, if present.
///
/// Models regularly wrap JSON in ```json fences despite being told not to;
/// parsing should see the payload either way.
pub fn strip_code_fences(response: &str) -> &str {
    let trimmed = response.trim();
    let without_prefix = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_prefix
        .strip_suffix("```")
        .unwrap_or(without_prefix)
        .trim()
}
