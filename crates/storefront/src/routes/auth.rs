//! Authentication route handlers.
//!
//! Standalone login and register pages plus the combined
//! `/login_register/` page, whose single form posts an `action` field to
//! pick the branch.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::routes::MessageQuery;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Combined login/register form data.
#[derive(Debug, Deserialize)]
pub struct LoginRegisterForm {
    /// Either "login" or "register".
    pub action: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Combined login/register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login_register.html")]
pub struct LoginRegisterTemplate {
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error_text(),
        success: query.success_text(),
    }
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    login_to(&state, &session, &form.email, &form.password, "/login/").await
}

/// Authenticate and establish a session, redirecting back to `error_path`
/// with a notice code on failure.
async fn login_to(
    state: &AppState,
    session: &Session,
    email: &str,
    password: &str,
    error_path: &str,
) -> Response {
    let user = match AuthService::new(state.pool())
        .login_with_password(email, password)
        .await
    {
        Ok(user) => user,
        Err(AuthError::Repository(e)) => {
            tracing::error!(error = %e, "login lookup failed");
            return Redirect::to(&format!("{error_path}?error=session")).into_response();
        }
        Err(e) => {
            tracing::warn!(error = %e, "login failed");
            return Redirect::to(&format!("{error_path}?error=credentials")).into_response();
        }
    };

    establish_session(session, &user).await
}

/// Store the logged-in user in the session and redirect to the catalog.
async fn establish_session(session: &Session, user: &User) -> Response {
    let current = CurrentUser {
        id: user.id,
        email: user.email.clone(),
    };

    if let Err(e) = set_current_user(session, &current).await {
        tracing::error!(error = %e, "failed to set session");
        return Redirect::to("/login/?error=session").into_response();
    }

    set_sentry_user(&user.id, Some(user.email.as_str()));

    Redirect::to("/products/").into_response()
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate {
        error: query.error_text(),
        success: query.success_text(),
    }
}

/// Handle registration form submission.
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    register_to(
        &state,
        &form.email,
        &form.password,
        &form.password_confirm,
        "/register/",
    )
    .await
}

/// Register a new account, redirecting back to `error_path` with a notice
/// code on failure and to the login page on success.
async fn register_to(
    state: &AppState,
    email: &str,
    password: &str,
    password_confirm: &str,
    error_path: &str,
) -> Response {
    if password != password_confirm {
        return Redirect::to(&format!("{error_path}?error=password_mismatch")).into_response();
    }

    match AuthService::new(state.pool())
        .register_with_password(email, password)
        .await
    {
        Ok(_) => Redirect::to("/login/?success=registered").into_response(),
        Err(AuthError::InvalidEmail(_)) => {
            Redirect::to(&format!("{error_path}?error=email_invalid")).into_response()
        }
        Err(AuthError::UserAlreadyExists) => {
            Redirect::to(&format!("{error_path}?error=email_taken")).into_response()
        }
        Err(AuthError::WeakPassword(_)) => {
            Redirect::to(&format!("{error_path}?error=weak_password")).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "registration failed");
            Redirect::to(&format!("{error_path}?error=session")).into_response()
        }
    }
}

// =============================================================================
// Combined Login/Register Page
// =============================================================================

/// Display the combined login/register page.
pub async fn login_register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginRegisterTemplate {
        error: query.error_text(),
        success: query.success_text(),
    }
}

/// Handle the combined form; the `action` field picks the branch.
pub async fn login_register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginRegisterForm>,
) -> Response {
    match form.action.as_str() {
        "register" => {
            register_to(
                &state,
                &form.email,
                &form.password,
                &form.password_confirm,
                "/login_register/",
            )
            .await
        }
        _ => {
            login_to(
                &state,
                &session,
                &form.email,
                &form.password,
                "/login_register/",
            )
            .await
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Log the user out and redirect to the login page.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!(error = %e, "failed to clear session");
    }

    clear_sentry_user();

    Redirect::to("/login/").into_response()
}
