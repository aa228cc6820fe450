//! Identity and form types shared by the login and signup flows. Passwords are
//! only ever held as [`SecretString`]; nothing in this module can print them.

use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Authenticated identity as returned by the remote procedures.
#[derive(ToSchema, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,
}

impl UserRecord {
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}

/// Identifiers are opaque; integer keys are read as their decimal text.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(id) => Ok(id),
        serde_json::Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Trim and lowercase an email before it leaves the process.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Ephemeral login input. Lives only for the duration of one call.
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(email: &str, password: SecretString) -> Self {
        Self {
            email: normalize_email(email),
            password,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Raw signup input as typed into the form.
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: SecretString,
}

impl SignupForm {
    /// Trim every field, lowercase the email and turn a blank phone into `None`.
    #[must_use]
    pub fn normalized(self) -> Self {
        let phone = self
            .phone
            .map(|phone| phone.trim().to_string())
            .filter(|phone| !phone.is_empty());

        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: normalize_email(&self.email),
            phone,
            password: self.password,
        }
    }
}

impl std::fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupForm")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Alice@Example.COM "), "alice@example.com");
        assert_eq!(normalize_email("\tBOB@x.io\n"), "bob@x.io");
    }

    #[test]
    fn user_record_accepts_null_columns() -> Result<(), serde_json::Error> {
        let user: UserRecord = serde_json::from_value(json!({
            "id": "u-1",
            "first_name": null,
            "last_name": "Doe",
            "email": "jane@example.com",
            "phone": null,
            "created_at": "2024-05-01T10:00:00Z"
        }))?;

        assert_eq!(user.first_name, "");
        assert_eq!(user.phone, None);
        assert_eq!(user.display_name(), "Doe");
        Ok(())
    }

    #[test]
    fn signup_form_normalizes_fields() {
        let form = SignupForm {
            first_name: "  Jane ".to_string(),
            last_name: " Doe".to_string(),
            email: " Jane@Example.com ".to_string(),
            phone: Some("   ".to_string()),
            password: SecretString::from("  keep spaces  "),
        }
        .normalized();

        assert_eq!(form.first_name, "Jane");
        assert_eq!(form.last_name, "Doe");
        assert_eq!(form.email, "jane@example.com");
        assert_eq!(form.phone, None);
    }

    #[test]
    fn debug_output_redacts_passwords() {
        let credentials = Credentials::new("a@b.co", SecretString::from("hunter2"));
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("***"));
    }
}
