//! Memory profile builder.
//!
//! Renders a business record into the fixed-section plain-text profile that
//! is stored on each agent and embedded into system prompts. Pure and
//! deterministic: the same business always renders to the same bytes.

use serde_json::Value;

use smartbiz_types::business::Business;

const NOT_SPECIFIED: &str = "Not specified";

const INSTRUCTIONS: &str = "\
- Present work as already done: say \"Here is...\" or \"I've created...\", never \"I'll create...\"
- When asked for tasks or plans, list them as clear, numbered action items
- Keep descriptions concise and specific to this business
- Use the brand voice above in every reply";

/// Render the memory profile for `business`.
pub fn build_memory_profile(business: &Business) -> String {
    let colors = render_map(business.brand_colors.as_ref());
    let social = render_map(business.social_links.as_ref());
    let goals = render_list(business.goals.as_ref());

    format!(
        "BUSINESS IDENTITY:\n\
         - Name: {name}\n\
         - Industry: {industry}\n\
         - Description: {description}\n\
         \n\
         TARGET AUDIENCE:\n\
         {audience}\n\
         \n\
         BRAND VOICE & TONE:\n\
         {tone}\n\
         \n\
         BRAND COLORS:\n\
         {colors}\n\
         \n\
         SOCIAL MEDIA PRESENCE:\n\
         {social}\n\
         \n\
         BUSINESS GOALS:\n\
         {goals}\n\
         \n\
         IMPORTANT INSTRUCTIONS:\n\
         {INSTRUCTIONS}",
        name = or_not_specified(Some(business.name.as_str())),
        industry = or_not_specified(business.industry.as_deref()),
        description = or_not_specified(business.description.as_deref()),
        audience = or_not_specified(business.target_audience.as_deref()),
        tone = or_not_specified(business.brand_tone.as_deref()),
    )
}

fn or_not_specified(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => NOT_SPECIFIED,
    }
}

/// Decode a value that may itself be a JSON-encoded string.
///
/// Strings that are not valid JSON are returned unchanged.
pub(crate) fn parse_lenient(value: Option<&Value>) -> Value {
    match value {
        Some(Value::String(raw)) => serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone())),
        Some(other) => other.clone(),
        None => Value::Null,
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `- key: value` per entry in key order; anything but an object is empty.
fn render_map(value: Option<&Value>) -> String {
    let lines: Vec<String> = match parse_lenient(value) {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            entries
                .into_iter()
                .map(|(k, v)| format!("- {k}: {}", render_scalar(v)))
                .collect()
        }
        _ => Vec::new(),
    };
    join_or_not_specified(lines)
}

/// `- item` per element in list order; anything but an array is empty.
fn render_list(value: Option<&Value>) -> String {
    let lines: Vec<String> = match parse_lenient(value) {
        Value::Array(items) => items.iter().map(|v| format!("- {}", render_scalar(v))).collect(),
        _ => Vec::new(),
    };
    join_or_not_specified(lines)
}

fn join_or_not_specified(lines: Vec<String>) -> String {
    if lines.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use smartbiz_types::business::BusinessPatch;

    fn business(patch: BusinessPatch) -> Business {
        Business::from_patch(patch)
    }

    #[test]
    fn test_empty_business_uses_not_specified_everywhere() {
        let profile = build_memory_profile(&business(BusinessPatch::default()));

        assert!(profile.starts_with("BUSINESS IDENTITY:\n- Name: Not specified\n"));
        assert!(profile.contains("TARGET AUDIENCE:\nNot specified\n"));
        assert!(profile.contains("BRAND VOICE & TONE:\nNot specified\n"));
        assert!(profile.contains("BRAND COLORS:\nNot specified\n"));
        assert!(profile.contains("SOCIAL MEDIA PRESENCE:\nNot specified\n"));
        assert!(profile.contains("BUSINESS GOALS:\nNot specified\n"));
        assert!(profile.contains("IMPORTANT INSTRUCTIONS:\n- Present work as already done"));
    }

    #[test]
    fn test_full_profile_renders_sections_in_order() {
        let profile = build_memory_profile(&business(BusinessPatch {
            name: Some("Bean There".into()),
            industry: Some("Coffee".into()),
            description: Some("Neighborhood roastery".into()),
            target_audience: Some("Remote workers".into()),
            brand_tone: Some("warm".into()),
            brand_colors: Some(json!({"secondary": "#fff", "primary": "#3b2f2f"})),
            social_links: Some(json!({"instagram": "@beanthere"})),
            goals: Some(json!(["Grow subscriptions", "Open a second shop"])),
            ..Default::default()
        }));

        let identity = profile.find("BUSINESS IDENTITY").unwrap();
        let colors = profile.find("BRAND COLORS").unwrap();
        let goals = profile.find("BUSINESS GOALS").unwrap();
        assert!(identity < colors && colors < goals);

        assert!(profile.contains("- Industry: Coffee"));
        assert!(profile.contains("BRAND COLORS:\n- primary: #3b2f2f\n- secondary: #fff\n"));
        assert!(profile.contains("- instagram: @beanthere"));
        assert!(profile.contains("BUSINESS GOALS:\n- Grow subscriptions\n- Open a second shop\n"));
    }

    #[test]
    fn test_json_encoded_strings_are_decoded() {
        let profile = build_memory_profile(&business(BusinessPatch {
            name: Some("Acme".into()),
            brand_colors: Some(json!("{\"primary\":\"red\"}")),
            goals: Some(json!("[\"Launch\"]")),
            ..Default::default()
        }));

        assert!(profile.contains("BRAND COLORS:\n- primary: red\n"));
        assert!(profile.contains("BUSINESS GOALS:\n- Launch\n"));
    }

    #[test]
    fn test_malformed_json_never_panics() {
        let profile = build_memory_profile(&business(BusinessPatch {
            name: Some("Acme".into()),
            social_links: Some(json!("{not json")),
            goals: Some(json!("grow fast")),
            brand_colors: Some(json!(42)),
            ..Default::default()
        }));

        assert!(profile.contains("SOCIAL MEDIA PRESENCE:\nNot specified\n"));
        assert!(profile.contains("BUSINESS GOALS:\nNot specified\n"));
        assert!(profile.contains("BRAND COLORS:\nNot specified\n"));
    }

    #[test]
    fn test_non_string_values_render_as_json() {
        let profile = build_memory_profile(&business(BusinessPatch {
            social_links: Some(json!({"followers": 1200})),
            goals: Some(json!([{"q": 1}])),
            ..Default::default()
        }));

        assert!(profile.contains("- followers: 1200"));
        assert!(profile.contains("- {\"q\":1}"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let b = business(BusinessPatch {
            name: Some("Acme".into()),
            brand_colors: Some(json!({"z": "1", "a": "2", "m": "3"})),
            ..Default::default()
        });
        assert_eq!(build_memory_profile(&b), build_memory_profile(&b.clone()));
    }

    #[test]
    fn test_parse_lenient_keeps_raw_string() {
        assert_eq!(parse_lenient(Some(&json!("plain"))), json!("plain"));
        assert_eq!(parse_lenient(Some(&json!("[1,2]"))), json!([1, 2]));
        assert_eq!(parse_lenient(None), Value::Null);
    }
}
