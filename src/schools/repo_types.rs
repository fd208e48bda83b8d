use sqlx::FromRow;

/// Row of `user_schools`. At most one per user.
#[derive(Debug, Clone, FromRow)]
pub struct SchoolListRecord {
    pub user_id: i64,
    pub school_list: String,           // serialized JSON, stored as-is
    pub last_modified: Option<String>, // client timestamp, never interpreted
}

impl SchoolListRecord {
    pub fn school_list_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.school_list)
    }
}
