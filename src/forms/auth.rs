//! Login and sign-up forms.

use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{NonEmptyString, UserEmail};
use crate::domain::user::{Credentials, NewUser};
use crate::forms::FormError;

#[derive(Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl TryFrom<LoginForm> for Credentials {
    type Error = FormError;

    fn try_from(form: LoginForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Credentials {
            username: form.username.trim().to_string(),
            password: form.password,
        })
    }
}

#[derive(Deserialize, Validate)]
/// Form data for creating an account. Length limits follow the server's
/// column sizes.
pub struct SignupForm {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub surname: String,
    #[validate(email, length(max = 100))]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

impl TryFrom<SignupForm> for NewUser {
    type Error = FormError;

    fn try_from(form: SignupForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let name = NonEmptyString::new(form.name).map_err(|_| FormError::Required("name"))?;
        let surname =
            NonEmptyString::new(form.surname).map_err(|_| FormError::Required("surname"))?;
        let email = UserEmail::new(form.email).map_err(|_| FormError::InvalidEmail)?;

        Ok(NewUser::new(name, surname, email, form.password))
    }
}
