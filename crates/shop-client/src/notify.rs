//! User-facing notifications (the page's toasts).

use tracing::{info, warn};

pub const ADDED_TO_CART: &str = "Product added to cart!";
pub const REMOVED_FROM_CART: &str = "Product removed from cart!";
pub const MESSAGE_SENT: &str = "Message sent successfully!";
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Shows short messages to the shopper.
///
/// Callers only ever pass the fixed texts above or
/// `ShopError::public_message`, never raw error detail.
pub trait Notifier: Send + Sync {
    fn success(&self, text: &str);
    fn error(&self, text: &str);
}

/// Notifier that writes to the log; used when no UI is attached
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, text: &str) {
        info!(notice = text, "success");
    }

    fn error(&self, text: &str) {
        warn!(notice = text, "failure");
    }
}
