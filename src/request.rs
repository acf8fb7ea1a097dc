//! Typed form payloads. Missing fields deserialize as empty strings so they are
//! reported through validation instead of a rejected request.

use serde::Deserialize;

use crate::error::ValidationError;

#[derive(Debug, Deserialize)]
pub struct RegisterUser {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginUser {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

fn required(name: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(ValidationError::MissingField(name))
    } else {
        Ok(())
    }
}

impl RegisterUser {
    pub fn validate(self) -> Result<NewUser, ValidationError> {
        let username = self.username.trim().to_string();
        let email = self.email.trim().to_string();
        required("username", &username)?;
        required("email", &email)?;
        // Passwords are taken verbatim, whitespace included.
        required("password", &self.password)?;
        Ok(NewUser {
            username,
            email,
            password: self.password,
        })
    }
}

impl LoginUser {
    pub fn validate(self) -> Result<Credentials, ValidationError> {
        let username = self.username.trim().to_string();
        required("username", &username)?;
        required("password", &self.password)?;
        Ok(Credentials {
            username,
            password: self.password,
        })
    }
}

impl NoteForm {
    pub fn validate(self) -> Result<NoteDraft, ValidationError> {
        let title = self.title.trim();
        let content = self.content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(ValidationError::EmptyNote);
        }
        Ok(NoteDraft {
            title: title.to_string(),
            content: content.to_string(),
        })
    }
}
