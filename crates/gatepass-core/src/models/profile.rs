use serde::{Deserialize, Serialize};

use crate::utils::format_date;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "customerName", default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(rename = "phoneNumber", default, deserialize_with = "super::deserialize_string_or_number")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

impl Profile {
    /// Apply an update response on top of the profile already shown.
    ///
    /// The update endpoint may echo back only some fields. Anything it
    /// leaves out, empty, or zero keeps its previous value.
    pub fn merged_with(self, update: Profile) -> Profile {
        Profile {
            id: update.id.filter(|id| *id != 0).or(self.id),
            customer_name: present(update.customer_name).or(self.customer_name),
            age: update.age.filter(|age| *age != 0).or(self.age),
            phone_number: present(update.phone_number).or(self.phone_number),
            email: present(update.email).or(self.email),
            username: present(update.username).or(self.username),
            created_at: present(update.created_at).or(self.created_at),
        }
    }

    pub fn display_name(&self) -> &str {
        self.customer_name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or("Unknown")
    }

    pub fn member_since(&self) -> String {
        format_date(self.created_at.as_deref())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateProfileRequest<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_profile() {
        let profile: Profile = serde_json::from_value(json!({
            "id": 7,
            "customerName": "Alice Nguyen",
            "age": 30,
            "phoneNumber": 912345678,
            "email": "alice@example.com",
            "username": "alice",
            "createdAt": "2024-03-05T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(profile.id, Some(7));
        assert_eq!(profile.phone_number.as_deref(), Some("912345678"));
        assert_eq!(profile.display_name(), "Alice Nguyen");
        assert_eq!(profile.member_since(), "05/03/2024");
    }

    #[test]
    fn test_missing_fields_default() {
        let profile: Profile = serde_json::from_value(json!({"username": "alice"})).unwrap();
        assert_eq!(profile.customer_name, None);
        assert_eq!(profile.display_name(), "alice");
        assert_eq!(profile.member_since(), "Unknown");
    }

    #[test]
    fn test_merged_with_keeps_previous_values() {
        let before = Profile {
            id: Some(1),
            customer_name: Some("Alice".into()),
            phone_number: Some("0900".into()),
            email: Some("alice@example.com".into()),
            ..Default::default()
        };
        let update = Profile {
            customer_name: Some("Alice N".into()),
            ..Default::default()
        };
        let merged = before.merged_with(update);
        assert_eq!(merged.customer_name.as_deref(), Some("Alice N"));
        assert_eq!(merged.phone_number.as_deref(), Some("0900"));
        assert_eq!(merged.email.as_deref(), Some("alice@example.com"));
        assert_eq!(merged.id, Some(1));
    }

    #[test]
    fn test_merged_with_ignores_blank_and_zero() {
        let before = Profile {
            id: Some(7),
            customer_name: Some("Alice".into()),
            age: Some(30),
            phone_number: Some("0900".into()),
            ..Default::default()
        };
        let update: Profile = serde_json::from_value(json!({
            "id": 0,
            "customerName": "",
            "age": 0,
            "phoneNumber": "0911",
            "email": ""
        }))
        .unwrap();
        let merged = before.merged_with(update);
        assert_eq!(merged.id, Some(7));
        assert_eq!(merged.customer_name.as_deref(), Some("Alice"));
        assert_eq!(merged.age, Some(30));
        assert_eq!(merged.phone_number.as_deref(), Some("0911"));
        assert_eq!(merged.email, None);
    }

    #[test]
    fn test_update_request_omits_missing_age() {
        let body = serde_json::to_value(UpdateProfileRequest { name: "A", phone: "1", age: None }).unwrap();
        assert_eq!(body, json!({"name": "A", "phone": "1"}));
        let body = serde_json::to_value(UpdateProfileRequest { name: "A", phone: "1", age: Some(30) }).unwrap();
        assert_eq!(body, json!({"name": "A", "phone": "1", "age": 30}));
    }
}
