//! # Storefront Session
//!
//! Everything one browsing tab owns: the catalog it shows, its cart, the
//! checkout handoff and the contact form. Mutation only happens through the
//! methods below.

use crate::checkout::{CheckoutClient, HttpCheckoutBackend, Redirector};
use crate::config::ClientConfig;
use crate::contact::{ContactForm, ContactRelayClient, EmailJsRelay};
use crate::notify::{Notifier, ADDED_TO_CART, REMOVED_FROM_CART};
use shop_core::{
    Cart, CheckoutSessionResponse, Price, Product, ProductCatalog, ShopError, ShopResult,
};
use std::sync::Arc;
use tracing::debug;

pub struct Storefront {
    catalog: Arc<ProductCatalog>,
    cart: Cart,
    checkout: CheckoutClient,
    contact: ContactRelayClient,
    contact_form: ContactForm,
    notifier: Arc<dyn Notifier>,
}

impl Storefront {
    pub fn new(
        catalog: Arc<ProductCatalog>,
        checkout: CheckoutClient,
        contact: ContactRelayClient,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            cart: Cart::new(catalog.currency()),
            catalog,
            checkout,
            contact,
            contact_form: ContactForm::default(),
            notifier,
        }
    }

    /// Wire the session to the HTTP checkout endpoint and EmailJS
    pub fn from_config(
        config: &ClientConfig,
        catalog: Arc<ProductCatalog>,
        redirector: Arc<dyn Redirector>,
        notifier: Arc<dyn Notifier>,
    ) -> ShopResult<Self> {
        let backend = HttpCheckoutBackend::new(&config.checkout_endpoint, config.timeout)?;
        let relay = EmailJsRelay::new(config.emailjs.clone(), config.timeout)?;

        Ok(Self::new(
            catalog,
            CheckoutClient::new(Arc::new(backend), redirector, notifier.clone()),
            ContactRelayClient::new(Arc::new(relay), notifier.clone()),
            notifier,
        ))
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn total(&self) -> Price {
        self.cart.total()
    }

    pub fn is_processing(&self) -> bool {
        self.checkout.is_processing()
    }

    /// Put one unit of a catalog product at the end of the cart
    pub fn add_to_cart(&mut self, product_id: u32) -> ShopResult<()> {
        let product = self
            .catalog
            .get(product_id)
            .ok_or(ShopError::ProductNotFound { product_id })?;
        self.cart.add(product);
        debug!("Added product {} ({} entries)", product_id, self.cart.len());
        self.notifier.success(ADDED_TO_CART);
        Ok(())
    }

    /// Remove the entry currently shown at `index`
    pub fn remove_from_cart(&mut self, index: usize) -> ShopResult<Product> {
        match self.cart.remove_at(index) {
            Ok(product) => {
                self.notifier.success(REMOVED_FROM_CART);
                Ok(product)
            }
            Err(e) => {
                self.notifier.error(e.public_message());
                Err(e)
            }
        }
    }

    pub async fn checkout(&self) -> ShopResult<CheckoutSessionResponse> {
        self.checkout.checkout(&self.cart).await
    }

    pub fn contact_form(&self) -> &ContactForm {
        &self.contact_form
    }

    pub fn contact_form_mut(&mut self) -> &mut ContactForm {
        &mut self.contact_form
    }

    pub async fn submit_contact(&mut self) -> ShopResult<()> {
        self.contact.submit(&mut self.contact_form).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{session, FlakyRelay, RecordingNotifier, RecordingRedirector, ScriptedBackend};

    struct Harness {
        store: Storefront,
        backend: Arc<ScriptedBackend>,
        notifier: Arc<RecordingNotifier>,
    }

    fn harness(outcomes: Vec<ShopResult<CheckoutSessionResponse>>) -> Harness {
        let backend = Arc::new(ScriptedBackend::new(outcomes));
        let notifier = Arc::new(RecordingNotifier::default());
        let store = Storefront::new(
            Arc::new(ProductCatalog::builtin()),
            CheckoutClient::new(
                backend.clone(),
                Arc::new(RecordingRedirector::default()),
                notifier.clone(),
            ),
            ContactRelayClient::new(Arc::new(FlakyRelay::default()), notifier.clone()),
            notifier.clone(),
        );
        Harness {
            store,
            backend,
            notifier,
        }
    }

    #[test]
    fn test_add_and_remove() {
        let Harness {
            mut store,
            notifier,
            ..
        } = harness(vec![]);

        store.add_to_cart(1).unwrap();
        store.add_to_cart(3).unwrap();
        store.add_to_cart(1).unwrap();
        assert_eq!(store.total().amount, 29999 + 44999 + 29999);

        let removed = store.remove_from_cart(1).unwrap();
        assert_eq!(removed.id, 3);
        assert_eq!(store.total().amount, 59998);
        assert_eq!(notifier.successes().len(), 4);

        assert!(matches!(
            store.add_to_cart(42),
            Err(ShopError::ProductNotFound { product_id: 42 })
        ));
        assert!(matches!(
            store.remove_from_cart(2),
            Err(ShopError::OutOfRange { .. })
        ));
        assert_eq!(store.cart().len(), 2);
        assert_eq!(notifier.errors().len(), 1);
    }

    #[tokio::test]
    async fn test_checkout_through_session() {
        let Harness {
            mut store, backend, ..
        } = harness(vec![Ok(session("cs_test_9"))]);

        assert!(matches!(store.checkout().await, Err(ShopError::EmptyCart)));
        assert_eq!(backend.calls(), 0);

        store.add_to_cart(6).unwrap();
        let result = store.checkout().await.unwrap();
        assert_eq!(result.id, "cs_test_9");
        assert_eq!(backend.calls(), 1);
        assert!(!store.is_processing());

        // The cart survives the handoff; it ends with the session
        assert_eq!(store.cart().len(), 1);
    }

    #[tokio::test]
    async fn test_contact_through_session() {
        let Harness { mut store, .. } = harness(vec![]);

        let form = store.contact_form_mut();
        form.name = "Elira".into();
        form.email = "elira@example.com".into();
        form.message = "A bëni instalime në Durrës?".into();

        store.submit_contact().await.unwrap();
        assert_eq!(*store.contact_form(), ContactForm::default());
    }
}
