use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Entity {
    pub id: i64,
    pub name: String,
}
