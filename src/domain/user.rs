use serde::{Deserialize, Serialize};

use crate::domain::types::{NonEmptyString, UserEmail, UserId};

/// User account as listed in the admin directory.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub role: String,
    pub status: i32,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Payload for `POST /signUp`.
#[derive(Clone, Debug, Serialize)]
pub struct NewUser {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    #[must_use]
    pub fn new(
        name: NonEmptyString,
        surname: NonEmptyString,
        email: UserEmail,
        password: String,
    ) -> Self {
        Self {
            name: name.into_inner(),
            surname: surname.into_inner(),
            email: email.into_inner(),
            password,
        }
    }
}

/// Form-encoded credentials sent to `POST /login`.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}
