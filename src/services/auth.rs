use crate::domain::user::{Credentials, NewUser};
use crate::forms::auth::{LoginForm, SignupForm};
use crate::repository::AuthGateway;
use crate::services::{ServiceError, ServiceResult};

/// Exchanges credentials for a token. The repository stores it in the session.
pub async fn login<R>(repo: &R, form: LoginForm) -> ServiceResult<()>
where
    R: AuthGateway + ?Sized,
{
    let credentials = Credentials::try_from(form)?;

    repo.login(&credentials).await.map_err(|err| {
        log::error!("Login failed for {}: {err}", credentials.username);
        err
    })?;

    Ok(())
}

pub async fn logout<R>(repo: &R) -> ServiceResult<()>
where
    R: AuthGateway + ?Sized,
{
    repo.logout().await.map_err(ServiceError::from)
}

/// Registers a new account and returns the server's acknowledgement.
pub async fn sign_up<R>(repo: &R, form: SignupForm) -> ServiceResult<String>
where
    R: AuthGateway + ?Sized,
{
    let new_user = NewUser::try_from(form)?;

    let message = repo.sign_up(&new_user).await.map_err(|err| {
        log::error!("Sign-up failed for {}: {err}", new_user.email);
        err
    })?;

    Ok(message)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::api::errors::ApiError;
    use crate::dto::auth::TokenResponse;
    use crate::repository::mock::MockRepository;

    #[tokio::test]
    async fn bad_credentials_keep_server_message() {
        let mut repo = MockRepository::new();
        repo.expect_login()
            .withf(|credentials| credentials.username == "ana")
            .returning(|_| {
                Err(ApiError::Status {
                    status: 400,
                    message: "Incorrect username or password".to_string(),
                })
            });

        let form = LoginForm {
            username: "ana".to_string(),
            password: "mala".to_string(),
        };

        let err = login(&repo, form).await.unwrap_err();
        assert_eq!(err.to_string(), "Incorrect username or password");
    }

    #[tokio::test]
    async fn login_succeeds() {
        let mut repo = MockRepository::new();
        repo.expect_login().times(1).returning(|_| {
            Ok(TokenResponse {
                access_token: "tok".to_string(),
                token_type: "bearer".to_string(),
            })
        });

        let form = LoginForm {
            username: "ana".to_string(),
            password: "buena".to_string(),
        };

        login(&repo, form).await.unwrap();
    }

    #[tokio::test]
    async fn signup_rejects_invalid_email_locally() {
        let mut repo = MockRepository::new();
        repo.expect_sign_up().times(0);

        let form = SignupForm {
            name: "Ana".to_string(),
            surname: "Pérez".to_string(),
            email: "no-es-un-email".to_string(),
            password: "secreto123".to_string(),
        };

        assert!(matches!(
            sign_up(&repo, form).await,
            Err(ServiceError::Form(_))
        ));
    }
}
