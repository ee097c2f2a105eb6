use sqlx::FromRow;

/// Role granting write access to the catalogue.
pub const ADMINISTRATOR: &str = "Administrator";
/// Role assigned to self-registered accounts.
pub const CUSTOMER: &str = "Customer";

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String, // bcrypt hash, never serialized
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl NewUser {
    pub fn into_user(self, id: i32) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Role {
    pub id: i32,
    pub name: String,
}
