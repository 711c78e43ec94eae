//! Services for the admin user directory.

use crate::domain::types::UserId;
use crate::domain::user::User;
use crate::pagination::Envelope;
use crate::repository::{ListQuery, UserFilters, UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult};

/// Full name of the logged-in user.
pub async fn current_user_name<R>(repo: &R) -> ServiceResult<String>
where
    R: UserReader + ?Sized,
{
    repo.current_user_name().await.map_err(ServiceError::from)
}

pub async fn list_users<R>(repo: &R, query: &ListQuery<UserFilters>) -> ServiceResult<Envelope<User>>
where
    R: UserReader + ?Sized,
{
    repo.list_users(query).await.map_err(ServiceError::from)
}

/// Deactivates a user account and returns the server's acknowledgement.
pub async fn delete_user<R>(repo: &R, user_id: i32) -> ServiceResult<String>
where
    R: UserWriter + ?Sized,
{
    let user_id = UserId::new(user_id)?;

    let message = repo.delete_user(user_id).await.map_err(|err| {
        log::error!("Failed to delete user {user_id}: {err}");
        err
    })?;

    Ok(message)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::api::errors::ApiError;
    use crate::repository::mock::MockRepository;

    #[tokio::test]
    async fn expired_session_is_unauthorized() {
        let mut repo = MockRepository::new();
        repo.expect_current_user_name().returning(|| {
            Err(ApiError::Unauthorized {
                message: "Could not validate credentials".to_string(),
            })
        });

        assert!(matches!(
            current_user_name(&repo).await,
            Err(ServiceError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn delete_user_validates_id() {
        let mut repo = MockRepository::new();
        repo.expect_delete_user().times(0);

        assert!(matches!(
            delete_user(&repo, -3).await,
            Err(ServiceError::TypeConstraint(_))
        ));
    }

    #[tokio::test]
    async fn delete_user_returns_message() {
        let mut repo = MockRepository::new();
        repo.expect_delete_user()
            .withf(|id| id.get() == 8)
            .returning(|_| Ok("User deactivated".to_string()));

        assert_eq!(delete_user(&repo, 8).await.unwrap(), "User deactivated");
    }
}
