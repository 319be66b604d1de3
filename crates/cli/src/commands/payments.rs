//! Restore the default payment methods.

use tracing::info;

use pampa_core::payment::default_payment_methods;
use pampa_core::store::{DocumentStore, collections};

/// Overwrite the payment-method documents with the defaults: bank
/// transfer enabled, gateway disabled and unconfigured.
///
/// # Errors
///
/// Returns an error if the backend cannot be reached or a write fails.
pub async fn reset() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let store = pampa_backend::store_from_env().await?;

    for (id, method) in default_payment_methods() {
        store
            .upsert(
                collections::PAYMENT_METHODS,
                &id,
                serde_json::to_value(&method)?,
            )
            .await?;
        info!(id, name = %method.name, enabled = method.enabled, "Payment method reset");
    }

    info!("Payment methods restored to defaults");
    Ok(())
}
