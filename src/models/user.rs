use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub emp_id: String,   // ⇔ users.emp_id (natural key, UNIQUE)
    pub username: String, // ⇔ users.username
}
