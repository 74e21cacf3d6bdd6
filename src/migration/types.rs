use serde::{Deserialize, Serialize};

/// Body of `POST /api/check`
#[derive(Debug, Default, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub address: Option<String>,
}

/// Body of `POST /api/submit`
#[derive(Debug, Default, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CheckResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migrated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckResponse {
    pub fn not_migrated() -> Self {
        Self {
            success: true,
            migrated: Some(false),
            experience: None,
            error: None,
        }
    }

    pub fn migrated(experience: f64) -> Self {
        Self {
            success: true,
            migrated: Some(true),
            experience: Some(experience),
            error: None,
        }
    }

    pub fn missing_address() -> Self {
        Self {
            success: false,
            migrated: None,
            experience: None,
            error: Some("missing address".to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitResponse {
    pub fn committed(experience: f64) -> Self {
        Self {
            success: true,
            experience: Some(experience),
            error: None,
        }
    }
}
