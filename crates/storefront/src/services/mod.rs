//! External service integrations.
//!
//! - [`razorpay`] - payment gateway client and signature verification
//! - [`email`] - transactional order emails over SMTP

pub mod email;
pub mod razorpay;
