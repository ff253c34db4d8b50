//! Email service for transactional mail.
//!
//! Uses SMTP via lettre for delivery with an Askama plain-text template
//! for the order-confirmation body. Checkout treats delivery as
//! best-effort: the caller logs failures and carries on.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use orchard_core::Email;
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;
use crate::models::Order;
use crate::services::checkout::DraftLine;

/// Subject line for the checkout confirmation email.
pub const ORDER_CONFIRMATION_SUBJECT: &str = "Order Confirmation";

/// Plain text template for the order confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.txt")]
struct OrderConfirmationText<'a> {
    order: &'a Order,
    lines: &'a [DraftLine],
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send an order confirmation email to the purchasing user.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to send or the template fails to
    /// render.
    pub async fn send_order_confirmation(
        &self,
        to: &Email,
        order: &Order,
        lines: &[DraftLine],
    ) -> Result<(), EmailError> {
        let body = OrderConfirmationText { order, lines }.render()?;
        self.send_text_email(to.as_str(), ORDER_CONFIRMATION_SUBJECT, body)
            .await
    }

    /// Send a plain-text email.
    async fn send_text_email(
        &self,
        to: &str,
        subject: &str,
        body: String,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use orchard_core::{OrderId, ProductId, UserId};
    use rust_decimal::dec;

    #[test]
    fn test_order_confirmation_body() {
        let order = Order {
            id: OrderId::new(17),
            user_id: UserId::new(1),
            total_amount: dec!(250),
            created_at: Utc::now(),
        };
        let lines = vec![
            DraftLine {
                product_id: ProductId::new(1),
                name: "Red Shoe".to_owned(),
                quantity: 2,
                total_price: dec!(200),
            },
            DraftLine {
                product_id: ProductId::new(2),
                name: "Blue Hat".to_owned(),
                quantity: 1,
                total_price: dec!(50),
            },
        ];

        let body = OrderConfirmationText {
            order: &order,
            lines: &lines,
        }
        .render()
        .expect("template renders");

        assert!(body.contains("Thank you for your purchase!"));
        assert!(body.contains("Your order total is: 250"));
        assert!(body.contains("Red Shoe (Quantity: 2) - 200"));
        assert!(body.contains("Blue Hat (Quantity: 1) - 50"));
    }
}
