//! Ports - interfaces for external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the registration core and the outside world. Adapters implement them.
//!
//! - `EventStore` / `RegistrationStore` - catalog and registration
//!   persistence; the registration store owns the (event, email)
//!   uniqueness constraint
//! - `PaymentGateway` - external order creation and capture verification
//! - `IdentityProvider` - resolves forwarded identity claims into a
//!   profile; the core never reads ambient session state
//! - `RegistrationNotifier` - committed-registration hook for callers
//!   that want to invalidate caches

mod event_store;
mod identity_provider;
mod payment_gateway;
mod registration_notifier;
mod registration_store;

pub use event_store::EventStore;
pub use identity_provider::{IdentityClaims, IdentityProvider, UserProfile};
pub use payment_gateway::{
    CapturedPayment, CheckoutDescriptor, CheckoutPrefill, CreateOrderRequest, GatewayError,
    GatewayErrorCode, PaymentGateway, PaymentOrder,
};
pub use registration_notifier::RegistrationNotifier;
pub use registration_store::{RegistrationStore, RegistrationStoreError};
