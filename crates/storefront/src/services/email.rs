//! Transactional order emails over SMTP.
//!
//! Delivery is best-effort: checkout and cancellation succeed even when the
//! email cannot be sent, so callers log failures instead of propagating them.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;
use crate::models::Order;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// SMTP mailer for order notifications.
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl Mailer {
    /// Create a mailer from SMTP configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the relay hostname is invalid.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_owned(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
        })
    }

    /// Send the order confirmation after a verified payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be built or sent.
    pub async fn send_order_confirmation(&self, order: &Order) -> Result<(), EmailError> {
        let subject = format!("Your Aroura order is confirmed ({})", order.razorpay_order_id);
        let body = render_confirmation(order);
        self.send_plain(order.shipping.email.as_str(), &subject, &body)
            .await
    }

    /// Send the cancellation notice after an order is cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be built or sent.
    pub async fn send_order_cancelled(&self, order: &Order) -> Result<(), EmailError> {
        let subject = format!("Your Aroura order was cancelled ({})", order.razorpay_order_id);
        let body = render_cancellation(order);
        self.send_plain(order.shipping.email.as_str(), &subject, &body)
            .await
    }

    async fn send_plain(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_owned()))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_owned())?;

        self.transport.send(message).await?;

        tracing::info!(to = %to, subject = %subject, "email sent");
        Ok(())
    }
}

fn render_confirmation(order: &Order) -> String {
    let mut body = format!(
        "Hi {},\n\nThank you for your order. Here is what you bought:\n\n",
        order.shipping.full_name
    );
    for line in &order.items {
        body.push_str(&format!(
            "  {} x{} ({}) - {}\n",
            line.product.name,
            line.quantity,
            line.selected_size.as_str(),
            line.line_total().display()
        ));
    }
    body.push_str(&format!(
        "\nTotal: {}\n\nYour digital downloads will arrive in a separate email shortly.\n\n- Aroura\n",
        order.total.display()
    ));
    body
}

fn render_cancellation(order: &Order) -> String {
    format!(
        "Hi {},\n\nYour order {} has been cancelled. If you were charged, the \
         refund will reach you within 5-7 business days.\n\n- Aroura\n",
        order.shipping.full_name, order.razorpay_order_id
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use aroura_core::{
        AddToCart, Cart, Email, OrderId, OrderStatus, Price, PrintSize, ProductId,
        ProductSnapshot,
    };
    use chrono::Utc;
    use rust_decimal::Decimal;

    use crate::models::ShippingInfo;

    fn sample_order() -> Order {
        let mut cart = Cart::default();
        cart.add(
            ProductSnapshot {
                id: ProductId::new(3),
                name: "Tea Garden Morning".to_owned(),
                category: "digital".to_owned(),
                image: "/images/products/tea-garden-morning.webp".to_owned(),
                price: Price::new(Decimal::new(99_900, 2)),
            },
            AddToCart {
                quantity: 2,
                ..AddToCart::default()
            },
        );
        Order {
            id: OrderId::generate(),
            items: cart.lines().to_vec(),
            total: Price::new(Decimal::new(199_800, 2)),
            shipping: ShippingInfo {
                full_name: "Priya Sharma".to_owned(),
                address: "14 MG Road, Bengaluru".to_owned(),
                phone: "+91 98765 43210".to_owned(),
                email: Email::parse("priya@example.com").unwrap(),
            },
            razorpay_order_id: "order_Nabc123XYZ".to_owned(),
            status: OrderStatus::Completed,
            created_at: Utc::now(),
            cancelled_at: None,
        }
    }

    #[test]
    fn confirmation_lists_items_and_total() {
        let body = render_confirmation(&sample_order());
        assert!(body.contains("Tea Garden Morning x2"));
        assert!(body.contains("₹1998.00"));
        assert!(body.contains(PrintSize::default().as_str()));
    }

    #[test]
    fn cancellation_names_the_gateway_order() {
        let body = render_cancellation(&sample_order());
        assert!(body.contains("order_Nabc123XYZ"));
    }
}
