//! User domain models and DTOs.
//!
//! Identities, their customer records and the payloads of the user
//! administration endpoints.

use crate::ids::{CustomerId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storehub_core::{PaginationMeta, PaginationParams, Role};
use utoipa::ToSchema;
use validator::Validate;

/// An identity stored in `users`.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// What the login flow needs to verify a credential pair.
#[derive(FromRow, Debug, Clone)]
pub struct UserCredentials {
    pub id: UserId,
    #[sqlx(rename = "password")]
    pub password_hash: String,
    pub active: bool,
}

/// The customer record owned by a client identity.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Customer {
    pub id: CustomerId,
    pub user_id: Option<UserId>,
    pub code: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Customer {
    /// Customer code derived from the owning identity, e.g. `CUS-000042`.
    pub fn code_for(user_id: UserId) -> String {
        format!("CUS-{:06}", user_id.get())
    }
}

/// Input for creating a client identity together with its customer record.
#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
}

/// A user together with its role keys and, for clients, its customer record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserWithRoles {
    #[serde(flatten)]
    pub user: User,
    #[schema(value_type = Vec<String>)]
    pub roles: Vec<Role>,
    pub customer: Option<Customer>,
}

/// DTO for updating a user's profile fields. Absent fields are left as-is;
/// an empty `phone` clears it.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusDto {
    pub active: bool,
}

/// Replaces the full role set of a user.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AssignRolesDto {
    #[validate(length(min = 1, message = "At least one role is required."))]
    #[schema(value_type = Vec<String>, example = json!(["employee"]))]
    pub roles: Vec<Role>,
}

/// Query parameters for listing users.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UserFilterParams {
    /// Case-insensitive match against name or email
    pub search: Option<String>,
    /// Only users holding this role key
    pub role: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginatedUsersResponse {
    pub data: Vec<UserWithRoles>,
    pub meta: PaginationMeta,
}
