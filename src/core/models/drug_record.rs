use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugRecord {
    pub item_name: String,
    pub efficacy: String,
    pub usage_method: String,
}

/// What happened when one lookup candidate was sent to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupOutcome {
    Found { record: DrugRecord },
    NotFound,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateLookup {
    pub candidate: String,
    pub outcome: LookupOutcome,
}
