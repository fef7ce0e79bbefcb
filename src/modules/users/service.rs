use anyhow::anyhow;
use storehub_core::{AppError, Role};
use storehub_models::{
    PaginatedUsersResponse, UpdateUserDto, User, UserFilterParams, UserId, UserWithRoles,
};
use tracing::{info, instrument};

use crate::store::UserRepository;

pub const CANNOT_DEACTIVATE_SELF: &str = "You cannot deactivate your own account.";
pub const CANNOT_DELETE_SELF: &str = "You cannot delete your own account.";

fn user_not_found() -> AppError {
    AppError::not_found(anyhow!("User not found"))
}

pub struct UserService;

impl UserService {
    #[instrument(skip(repo))]
    pub async fn list_users(
        repo: &dyn UserRepository,
        filter: &UserFilterParams,
    ) -> Result<PaginatedUsersResponse, AppError> {
        repo.list_users(filter).await
    }

    #[instrument(skip(repo))]
    pub async fn get_user(repo: &dyn UserRepository, id: UserId) -> Result<UserWithRoles, AppError> {
        repo.find_user(id).await?.ok_or_else(user_not_found)
    }

    /// A taken email surfaces as the repository's 409.
    #[instrument(skip(repo, dto))]
    pub async fn update_user(
        repo: &dyn UserRepository,
        id: UserId,
        dto: UpdateUserDto,
    ) -> Result<User, AppError> {
        let dto = UpdateUserDto {
            phone: dto.phone.map(|p| p.trim().to_string()),
            email: dto.email.map(|e| e.trim().to_lowercase()),
            ..dto
        };
        repo.update_user(id, dto).await?.ok_or_else(user_not_found)
    }

    #[instrument(skip(repo))]
    pub async fn set_status(
        repo: &dyn UserRepository,
        actor: UserId,
        id: UserId,
        active: bool,
    ) -> Result<User, AppError> {
        if actor == id && !active {
            return Err(AppError::unprocessable(anyhow!(CANNOT_DEACTIVATE_SELF)));
        }

        let user = repo.set_active(id, active).await?.ok_or_else(user_not_found)?;
        info!(user_id = %id, active, "User status changed");
        Ok(user)
    }

    #[instrument(skip(repo))]
    pub async fn delete_user(
        repo: &dyn UserRepository,
        actor: UserId,
        id: UserId,
    ) -> Result<(), AppError> {
        if actor == id {
            return Err(AppError::unprocessable(anyhow!(CANNOT_DELETE_SELF)));
        }

        if !repo.delete_user(id).await? {
            return Err(user_not_found());
        }
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Replaces the user's roles and returns the refreshed user.
    #[instrument(skip(repo))]
    pub async fn assign_roles(
        repo: &dyn UserRepository,
        id: UserId,
        roles: &[Role],
    ) -> Result<UserWithRoles, AppError> {
        repo.assign_roles(id, roles).await?.ok_or_else(user_not_found)?;
        info!(user_id = %id, ?roles, "User roles replaced");
        Self::get_user(repo, id).await
    }
}
