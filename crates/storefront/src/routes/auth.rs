//! Authentication route handlers.
//!
//! Handles login, registration and logout against the local user table.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use jungle_core::ValidationErrors;

use super::NavContext;
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, NewUser};
use crate::services::auth::RegistrationError;
use crate::state::AppState;

/// Shown for any failed login; never says which factor was wrong.
pub const LOGIN_FAILED_MESSAGE: &str = "Invalid email or password";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
///
/// Not `Debug`, so the password cannot end up in logs.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Registration form data.
#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub password_confirmation: Option<String>,
}

impl From<RegisterForm> for NewUser {
    fn from(form: RegisterForm) -> Self {
        Self {
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            password: SecretString::from(form.password),
            password_confirmation: form.password_confirmation.map(SecretString::from),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub nav: NavContext,
    pub error: Option<String>,
    pub email: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub nav: NavContext,
    pub errors: Vec<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(session: Session) -> impl IntoResponse {
    LoginTemplate {
        nav: NavContext::from_session(&session).await,
        error: None,
        email: String::new(),
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let user = state
        .authenticator()
        .authenticate_with_credentials(&form.email, &form.password)
        .await?;

    let Some(user) = user else {
        tracing::info!("login rejected");
        let page = LoginTemplate {
            nav: NavContext::from_session(&session).await,
            error: Some(LOGIN_FAILED_MESSAGE.to_string()),
            email: form.email,
        };
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    };

    set_current_user(&session, &CurrentUser::from(&user)).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Redirect::to("/").into_response())
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(session: Session) -> impl IntoResponse {
    RegisterTemplate {
        nav: NavContext::from_session(&session).await,
        errors: Vec::new(),
        first_name: String::new(),
        last_name: String::new(),
        email: String::new(),
    }
}

/// Handle registration form submission.
///
/// On success the new user is logged in. Validation failures re-render the
/// form with every message and status 422.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let new_user = NewUser::from(form);

    match state.authenticator().register(&new_user).await {
        Ok(user) => {
            set_current_user(&session, &CurrentUser::from(&user)).await?;
            set_sentry_user(&user.id, Some(user.email.as_str()));
            Ok(Redirect::to("/").into_response())
        }
        Err(RegistrationError::Invalid(errors)) => {
            Ok(registration_failed(&session, new_user, &errors).await)
        }
        Err(RegistrationError::Auth(e)) => Err(e.into()),
    }
}

async fn registration_failed(
    session: &Session,
    input: NewUser,
    errors: &ValidationErrors,
) -> Response {
    let page = RegisterTemplate {
        nav: NavContext::from_session(session).await,
        errors: errors.full_messages(),
        first_name: input.first_name,
        last_name: input.last_name,
        email: input.email,
    };
    (StatusCode::UNPROCESSABLE_ENTITY, page).into_response()
}

// =============================================================================
// Logout
// =============================================================================

/// Log out. The cart stays with the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Response> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/").into_response())
}
