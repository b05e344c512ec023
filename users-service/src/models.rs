//! User entity and its wire projections
//!
//! The stored record is [`UserEntity`]. Callers never see or send it directly;
//! they exchange one of three projections instead:
//!
//! - [`CreateUser`]: body of `POST /users`
//! - [`UpdateUser`]: body of `PUT /users/{id}` and the target of `PATCH /users/{id}`
//! - [`UserView`]: body of `GET /users/{id}` and of each list item

use serde::{Deserialize, Serialize};

use crate::ids::UserId;
use crate::validation::{self, ValidationErrors, ValidationProfile};

/// Authoritative user record owned by the repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEntity {
    pub id: UserId,
    pub login: String,
    pub first_name: String,
    pub last_name: String,
}

impl UserEntity {
    pub fn new(
        id: UserId,
        login: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            login: login.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Overwrite every editable field from an update projection, keeping the id
    pub fn apply(&mut self, update: UpdateUser) {
        self.login = update.login;
        self.first_name = update.first_name;
        self.last_name = update.last_name;
    }
}

/// Payload for creating a user
///
/// Missing fields deserialize as empty so that they are reported by
/// validation rather than rejected by the JSON parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateUser {
    pub login: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl CreateUser {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            first_name: None,
            last_name: None,
        }
    }

    #[must_use]
    pub fn with_names(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self.last_name = Some(last_name.into());
        self
    }

    pub fn validate(&self, profile: ValidationProfile) -> ValidationErrors {
        validation::validate(
            profile,
            &self.login,
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default(),
        )
    }

    /// Build an entity with a nil id; the repository assigns the real one on insert
    pub fn into_entity(self) -> UserEntity {
        UserEntity {
            id: UserId::nil(),
            login: self.login,
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
        }
    }
}

/// Full editable projection of a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateUser {
    pub login: String,
    pub first_name: String,
    pub last_name: String,
}

impl UpdateUser {
    pub fn new(
        login: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            login: login.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Update payloads are always checked with the full profile
    pub fn validate(&self) -> ValidationErrors {
        validation::validate_full(&self.login, &self.first_name, &self.last_name)
    }

    pub fn into_entity(self, id: UserId) -> UserEntity {
        UserEntity {
            id,
            login: self.login,
            first_name: self.first_name,
            last_name: self.last_name,
        }
    }
}

impl From<&UserEntity> for UpdateUser {
    fn from(user: &UserEntity) -> Self {
        Self {
            login: user.login.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

/// Read projection returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub login: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<UserEntity> for UserView {
    fn from(user: UserEntity) -> Self {
        Self {
            id: user.id,
            login: user.login,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{FIRST_NAME, LAST_NAME, LOGIN};

    #[test]
    fn test_create_user_deserializes_minimal_payload() {
        let create: CreateUser = serde_json::from_str(r#"{"login":"johndoe375"}"#).unwrap();
        assert_eq!(create, CreateUser::new("johndoe375"));
    }

    #[test]
    fn test_create_user_missing_login_is_a_validation_error() {
        let create: CreateUser = serde_json::from_str("{}").unwrap();
        let errors = create.validate(ValidationProfile::Minimal);
        assert_eq!(errors.messages(LOGIN).len(), 1);
    }

    #[test]
    fn test_create_user_full_profile_requires_names() {
        let create = CreateUser::new("jdoe");
        let errors = create.validate(ValidationProfile::Full);
        assert_eq!(errors.messages(FIRST_NAME).len(), 1);
        assert_eq!(errors.messages(LAST_NAME).len(), 1);

        let create = CreateUser::new("jdoe").with_names("John", "Doe");
        assert!(!create.validate(ValidationProfile::Full).has_errors());
    }

    #[test]
    fn test_create_user_into_entity_has_nil_id() {
        let entity = CreateUser::new("jdoe").with_names("John", "Doe").into_entity();
        assert!(entity.id.is_nil());
        assert_eq!(entity.login, "jdoe");
        assert_eq!(entity.first_name, "John");
        assert_eq!(entity.last_name, "Doe");
    }

    #[test]
    fn test_create_user_without_names_stores_empty_names() {
        let entity = CreateUser::new("jdoe").into_entity();
        assert_eq!(entity.first_name, "");
        assert_eq!(entity.last_name, "");
    }

    #[test]
    fn test_update_projection_from_entity() {
        let entity = UserEntity::new(UserId::new(), "jdoe", "John", "Doe");
        let update = UpdateUser::from(&entity);
        assert_eq!(update, UpdateUser::new("jdoe", "John", "Doe"));
    }

    #[test]
    fn test_apply_keeps_id() {
        let id = UserId::new();
        let mut entity = UserEntity::new(id, "jdoe", "John", "Doe");
        entity.apply(UpdateUser::new("jsmith", "Jane", "Smith"));
        assert_eq!(entity, UserEntity::new(id, "jsmith", "Jane", "Smith"));
    }

    #[test]
    fn test_view_uses_camel_case() {
        let id: UserId = "6f1c1f0e-1d8b-4a0c-9f5e-0a4c1b2d3e4f".parse().unwrap();
        let view = UserView::from(UserEntity::new(id, "jdoe", "John", "Doe"));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "6f1c1f0e-1d8b-4a0c-9f5e-0a4c1b2d3e4f",
                "login": "jdoe",
                "firstName": "John",
                "lastName": "Doe",
            })
        );
    }
}
