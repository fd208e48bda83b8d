use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct SchoolListResponse {
    pub school_list: Value,
    pub last_modified: Option<String>,
}

impl Default for SchoolListResponse {
    fn default() -> Self {
        Self {
            school_list: Value::Array(Vec::new()),
            last_modified: None,
        }
    }
}

/// `PUT /api/schools` body. An explicit `null` counts as missing.
#[derive(Debug, Deserialize)]
pub struct UpdateSchoolListRequest {
    pub school_list: Option<Value>,
    pub last_modified: Option<String>,
}
