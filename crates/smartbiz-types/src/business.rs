use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

uuid_id!(
    /// Unique identifier for a business profile.
    BusinessId
);

/// A business profile that one or more agents act for.
///
/// `social_links`, `brand_colors` and `goals` are free-form JSON. Older
/// records may carry them as JSON-encoded strings rather than objects or
/// arrays; consumers must tolerate both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: BusinessId,
    pub name: String,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub target_audience: Option<String>,
    pub brand_tone: Option<String>,
    pub social_links: Option<serde_json::Value>,
    pub brand_colors: Option<serde_json::Value>,
    pub goals: Option<serde_json::Value>,
    pub owner_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating or updating a business.
///
/// On update, `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessPatch {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub target_audience: Option<String>,
    pub brand_tone: Option<String>,
    pub social_links: Option<serde_json::Value>,
    pub brand_colors: Option<serde_json::Value>,
    pub goals: Option<serde_json::Value>,
    pub owner_id: Option<String>,
}

impl Business {
    /// Build a new business from a patch. `name` defaults to empty.
    pub fn from_patch(patch: BusinessPatch) -> Self {
        let now = Utc::now();
        Self {
            id: BusinessId::new(),
            name: patch.name.unwrap_or_default(),
            industry: patch.industry,
            description: patch.description,
            target_audience: patch.target_audience,
            brand_tone: patch.brand_tone,
            social_links: patch.social_links,
            brand_colors: patch.brand_colors,
            goals: patch.goals,
            owner_id: patch.owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply the non-empty fields of `patch` and bump `updated_at`.
    pub fn apply(&mut self, patch: BusinessPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if patch.industry.is_some() {
            self.industry = patch.industry;
        }
        if patch.description.is_some() {
            self.description = patch.description;
        }
        if patch.target_audience.is_some() {
            self.target_audience = patch.target_audience;
        }
        if patch.brand_tone.is_some() {
            self.brand_tone = patch.brand_tone;
        }
        if patch.social_links.is_some() {
            self.social_links = patch.social_links;
        }
        if patch.brand_colors.is_some() {
            self.brand_colors = patch.brand_colors;
        }
        if patch.goals.is_some() {
            self.goals = patch.goals;
        }
        if patch.owner_id.is_some() {
            self.owner_id = patch.owner_id;
        }
        self.updated_at = Utc::now();
    }
}
