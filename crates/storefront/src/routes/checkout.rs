//! Checkout route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, Order};
use crate::services::checkout::{CheckoutError, CheckoutService, DraftLine};
use crate::{filters, state::AppState};

/// Order confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/complete.html")]
pub struct PurchaseCompleteTemplate {
    pub user: CurrentUser,
    pub order: Order,
    pub lines: Vec<DraftLine>,
}

/// Convert the user's cart into an order.
///
/// On success the confirmation page is rendered and a confirmation email
/// is sent best-effort: a delivery failure is logged, never surfaced, and
/// never undoes the purchase.
pub async fn purchase(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    let completed = match CheckoutService::new(state.pool()).purchase(user.id).await {
        Ok(completed) => completed,
        Err(CheckoutError::EmptyCart) => {
            return Ok(Redirect::to("/cart/?error=empty").into_response());
        }
        Err(CheckoutError::CartChanged) => {
            return Ok(Redirect::to("/cart/?error=changed").into_response());
        }
        Err(CheckoutError::Repository(e)) => return Err(e.into()),
    };

    if let Err(e) = state
        .mailer()
        .send_order_confirmation(&user.email, &completed.order, &completed.lines)
        .await
    {
        tracing::warn!(
            order_id = %completed.order.id,
            error = %e,
            "order confirmation email failed"
        );
    }

    Ok(PurchaseCompleteTemplate {
        user,
        order: completed.order,
        lines: completed.lines,
    }
    .into_response())
}
