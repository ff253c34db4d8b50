//! Account route handlers: profile, address, and account deletion.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use orchard_core::Email;
use serde::Deserialize;
use tower_sessions::Session;

use crate::db::{RepositoryError, UserRepository};
use crate::error::{AppError, Result, clear_sentry_user};
use crate::forms::AddressForm;
use crate::middleware::{RequireAuth, set_current_user};
use crate::models::{Address, CurrentUser, User};
use crate::routes::MessageQuery;
use crate::state::AppState;

/// Profile update form data: name, email, and the full address.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub street_address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub zip_code: String,
}

impl ProfileForm {
    /// The address portion of the submission.
    fn address(&self) -> AddressForm {
        AddressForm {
            street_address: self.street_address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
            zip_code: self.zip_code.clone(),
        }
    }
}

/// Account page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/show.html")]
pub struct AccountTemplate {
    pub user: User,
    pub address: Option<Address>,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Delete-account confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/delete.html")]
pub struct DeleteAccountTemplate {
    pub user: CurrentUser,
}

/// Display the account page with profile and address forms.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let users = UserRepository::new(state.pool());

    let user = users
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_owned()))?;
    let address = users.get_address(current.id).await?;

    Ok(AccountTemplate {
        user,
        address,
        error: query.error_text(),
        success: query.success_text(),
    })
}

/// Update the user's name, email, and address in one submission.
///
/// The address must be complete here; the standalone add-address form is
/// the lenient path.
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> Result<Response> {
    let Ok(address) = form.address().validate() else {
        return Ok(Redirect::to("/user/?error=address_incomplete").into_response());
    };

    let Ok(email) = Email::parse(&form.email) else {
        return Ok(Redirect::to("/user/?error=email_invalid").into_response());
    };

    let users = UserRepository::new(state.pool());

    match users
        .update_profile(
            current.id,
            form.first_name.trim(),
            form.last_name.trim(),
            &email,
        )
        .await
    {
        Ok(()) => {}
        Err(RepositoryError::Conflict(_)) => {
            return Ok(Redirect::to("/user/?error=email_taken").into_response());
        }
        Err(e) => return Err(e.into()),
    }

    users.upsert_address(current.id, &address).await?;

    // Keep the session in sync with the possibly-changed email
    let refreshed = CurrentUser {
        id: current.id,
        email,
    };
    if let Err(e) = set_current_user(&session, &refreshed).await {
        tracing::error!(error = %e, "failed to refresh session after profile update");
    }

    Ok(Redirect::to("/user/?success=profile_updated").into_response())
}

/// Save the address form as-is.
///
/// Unlike the profile update, this path performs no completeness check and
/// accepts partial addresses.
pub async fn add_address(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Form(form): Form<AddressForm>,
) -> Result<Response> {
    UserRepository::new(state.pool())
        .upsert_address(current.id, &form.into_fields())
        .await?;

    Ok(Redirect::to("/user/?success=address_saved").into_response())
}

/// Display the delete-account confirmation page.
pub async fn delete_page(RequireAuth(user): RequireAuth) -> impl IntoResponse {
    DeleteAccountTemplate { user }
}

/// Delete the account and everything hanging off it, then end the session.
pub async fn delete_account(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    session: Session,
) -> Result<Response> {
    UserRepository::new(state.pool()).delete(current.id).await?;

    if let Err(e) = session.flush().await {
        tracing::error!(error = %e, "failed to flush session after account deletion");
    }

    clear_sentry_user();

    tracing::info!(user_id = %current.id, "account deleted");

    Ok(Redirect::to("/login_register/?success=account_deleted").into_response())
}
