use serde::{Deserialize, Serialize};

/// Everything the layout engine needs to render one portfolio.
/// Built fresh by the collector on every export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRecord {
    pub personal: PersonalInfo,
    pub skills: Skills,
    pub education: Vec<EducationEntry>,
    pub work_experience: Vec<WorkEntry>,
    pub projects: Vec<ProjectEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub contact: String,
    /// `data:<mime>;base64,<payload>` URI, or empty when no photo was chosen.
    pub photo: String,
    pub bio: String,
}

/// Comma-separated skill lists, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    pub soft: String,
    pub technical: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub year: String,
    pub grade: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkEntry {
    pub company: String,
    pub duration: String,
    pub responsibilities: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    pub link: Option<String>,
}
