//! User directory endpoints: list/search, create, delete.
//!
//! The listing is an in-memory roster seeded with demo records. Creation
//! validates the form, writes the profile through the provider, then mirrors
//! the row into the roster so the listing reflects it immediately. Deletion
//! only touches the roster.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use utoipa::{IntoParams, ToSchema};

use crate::api::handlers::auth::types::ErrorResponse;
use crate::api::validation::{validate_user_form, UserForm};
use crate::provider::types::Role;
use crate::provider::Client;

/// A row in the user directory.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone)]
pub struct UserProfile {
    pub id: i64,
    pub created_at: String,
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
    pub designation: String,
}

#[derive(IntoParams, Deserialize, Debug, Clone, Default)]
pub struct SearchQuery {
    /// Case-insensitive match against name, email, and designation.
    pub search: Option<String>,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct CreateUserResponse {
    pub success: String,
    pub data: UserProfile,
}

/// In-memory user roster, newest first.
#[derive(Debug)]
pub struct Directory {
    users: RwLock<Vec<UserProfile>>,
    next_id: AtomicI64,
}

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}

impl Directory {
    #[must_use]
    pub fn new() -> Self {
        let seeded = seed_profiles();
        let next_id = seeded.iter().map(|user| user.id).max().unwrap_or(0) + 1;
        Self {
            users: RwLock::new(seeded),
            next_id: AtomicI64::new(next_id),
        }
    }

    pub async fn list(&self, search: Option<&str>) -> Vec<UserProfile> {
        let users = self.users.read().await;
        match search.map(str::trim).filter(|term| !term.is_empty()) {
            Some(term) => users
                .iter()
                .filter(|user| matches_search(user, term))
                .cloned()
                .collect(),
            None => users.clone(),
        }
    }

    /// Prepend a new row, assigning the next id.
    pub async fn insert(&self, form: ProfileFields) -> UserProfile {
        let user = UserProfile {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            created_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            full_name: form.full_name,
            email: form.email,
            phone: form.phone,
            role: form.role,
            designation: form.designation,
        };

        self.users.write().await.insert(0, user.clone());
        user
    }

    /// Remove a row. Returns whether it existed.
    pub async fn remove(&self, id: i64) -> bool {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|user| user.id != id);
        users.len() != before
    }
}

/// Validated profile fields headed for the roster.
#[derive(Debug, Clone)]
pub struct ProfileFields {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub designation: String,
}

fn matches_search(user: &UserProfile, term: &str) -> bool {
    let term = term.to_lowercase();
    user.full_name.to_lowercase().contains(&term)
        || user.email.to_lowercase().contains(&term)
        || user.designation.to_lowercase().contains(&term)
}

fn seed_profiles() -> Vec<UserProfile> {
    vec![
        UserProfile {
            id: 1,
            created_at: "2024-01-15T10:30:00Z".to_string(),
            full_name: "John Doe".to_string(),
            email: "john.doe@company.com".to_string(),
            phone: Some("12345678901".to_string()),
            role: Role::Admin,
            designation: "Senior Developer".to_string(),
        },
        UserProfile {
            id: 2,
            created_at: "2024-01-16T14:20:00Z".to_string(),
            full_name: "Jane Smith".to_string(),
            email: "jane.smith@company.com".to_string(),
            phone: Some("12345678902".to_string()),
            role: Role::Manager,
            designation: "Project Manager".to_string(),
        },
        UserProfile {
            id: 3,
            created_at: "2024-01-17T09:15:00Z".to_string(),
            full_name: "Mike Johnson".to_string(),
            email: "mike.johnson@company.com".to_string(),
            phone: Some("12345678903".to_string()),
            role: Role::User,
            designation: "UI Designer".to_string(),
        },
        UserProfile {
            id: 4,
            created_at: "2024-01-18T16:45:00Z".to_string(),
            full_name: "Sarah Wilson".to_string(),
            email: "sarah.wilson@company.com".to_string(),
            phone: Some("12345678904".to_string()),
            role: Role::User,
            designation: "QA Engineer".to_string(),
        },
    ]
}

/// List the directory, optionally filtered.
#[utoipa::path(
    get,
    path = "/v1/users",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching users, newest first", body = [UserProfile]),
    ),
    tag = "users"
)]
#[instrument(skip(directory))]
pub async fn list_users(
    Extension(directory): Extension<Arc<Directory>>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    Json(directory.list(query.search.as_deref()).await)
}

/// Create a user: validate, write the profile through the provider, and
/// mirror it into the roster.
#[utoipa::path(
    post,
    path = "/v1/users",
    request_body = UserForm,
    responses(
        (status = 201, description = "User created", body = CreateUserResponse),
        (status = 400, description = "Provider rejected the profile", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::api::validation::ValidationErrors),
    ),
    tag = "users"
)]
#[instrument(skip(directory, client, payload))]
pub async fn create_user(
    Extension(directory): Extension<Arc<Directory>>,
    Extension(client): Extension<Arc<Client>>,
    payload: Option<Json<UserForm>>,
) -> impl IntoResponse {
    let Some(Json(form)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    let profile = match validate_user_form(&form) {
        Ok(profile) => profile,
        Err(errors) => return errors.into_response(),
    };

    if let Err(error) = client.insert_profile(&profile).await {
        debug!("profile insert rejected: {}", error);

        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(error.to_string())),
        )
            .into_response();
    }

    let user = directory
        .insert(ProfileFields {
            full_name: profile.full_name,
            email: profile.email,
            phone: profile.phone,
            role: profile.role,
            designation: profile.designation,
        })
        .await;

    (
        StatusCode::CREATED,
        Json(CreateUserResponse {
            success: "User created successfully!".to_string(),
            data: user,
        }),
    )
        .into_response()
}

/// Remove a user from the roster. Does not touch provider accounts.
#[utoipa::path(
    delete,
    path = "/v1/users/{id}",
    params(("id" = i64, Path, description = "Directory row id")),
    responses(
        (status = 204, description = "User removed"),
        (status = 404, description = "No such user"),
    ),
    tag = "users"
)]
#[instrument(skip(directory))]
pub async fn delete_user(
    Extension(directory): Extension<Arc<Directory>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    if directory.remove(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::test_support::provider_client;
    use serde_json::json;

    fn fields(name: &str, email: &str, designation: &str) -> ProfileFields {
        ProfileFields {
            full_name: name.to_string(),
            email: email.to_string(),
            phone: None,
            role: Role::User,
            designation: designation.to_string(),
        }
    }

    #[tokio::test]
    async fn directory_starts_with_seeded_roster() {
        let directory = Directory::new();
        let users = directory.list(None).await;
        assert_eq!(users.len(), 4);
        assert_eq!(users[0].full_name, "John Doe");
    }

    #[tokio::test]
    async fn search_matches_name_email_and_designation_case_insensitively() {
        let directory = Directory::new();

        let by_name = directory.list(Some("jane")).await;
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].full_name, "Jane Smith");

        let by_email = directory.list(Some("MIKE.JOHNSON@")).await;
        assert_eq!(by_email.len(), 1);

        let by_designation = directory.list(Some("engineer")).await;
        assert_eq!(by_designation.len(), 1);
        assert_eq!(by_designation[0].full_name, "Sarah Wilson");

        assert!(directory.list(Some("nobody")).await.is_empty());
    }

    #[tokio::test]
    async fn blank_search_lists_everyone() {
        let directory = Directory::new();
        assert_eq!(directory.list(Some("   ")).await.len(), 4);
    }

    #[tokio::test]
    async fn insert_prepends_with_fresh_id() {
        let directory = Directory::new();
        let user = directory
            .insert(fields("Alice Doe", "alice@company.com", "Engineer"))
            .await;
        assert_eq!(user.id, 5);

        let users = directory.list(None).await;
        assert_eq!(users.len(), 5);
        assert_eq!(users[0].id, 5);
    }

    #[tokio::test]
    async fn remove_only_touches_the_matching_row() {
        let directory = Directory::new();
        assert!(directory.remove(2).await);
        assert!(!directory.remove(2).await);
        assert_eq!(directory.list(None).await.len(), 3);
    }

    #[tokio::test]
    async fn create_user_rejects_invalid_form_before_any_request() {
        let request: UserForm = serde_json::from_value(json!({
            "full_name": "",
            "email": "broken",
            "designation": ""
        }))
        .expect("request");

        let response = create_user(
            Extension(Arc::new(Directory::new())),
            Extension(provider_client()),
            Some(Json(request)),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn delete_unknown_user_is_not_found() {
        let response = delete_user(Extension(Arc::new(Directory::new())), Path(99))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
