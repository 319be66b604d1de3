//! Payment method configuration documents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::PaymentKind;

/// Document id of the bank-transfer method, the only one enabled by
/// default. Orders without an explicit method fall back to it.
pub const DEFAULT_PAYMENT_METHOD: &str = "transfer";

/// An admin-managed payment method from the `payment_methods`
/// collection.
///
/// `config` is free-form (bank name, CBU, alias, gateway keys...); the
/// admin UI edits it as key/value pairs and the storefront only shows
/// the instructions, so nothing stronger than a string map is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub name: String,
    pub enabled: bool,
    pub kind: PaymentKind,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
}

/// The methods seeded when the collection is empty: bank transfer
/// enabled, gateway present but disabled until configured.
#[must_use]
pub fn default_payment_methods() -> Vec<(String, PaymentMethod)> {
    vec![
        (
            DEFAULT_PAYMENT_METHOD.to_owned(),
            PaymentMethod {
                name: "Transferencia Bancaria".to_owned(),
                enabled: true,
                kind: PaymentKind::BankTransfer,
                config: BTreeMap::from([
                    ("bank_name".to_owned(), String::new()),
                    ("account_number".to_owned(), String::new()),
                    ("cbu".to_owned(), String::new()),
                    ("alias".to_owned(), String::new()),
                    (
                        "instructions".to_owned(),
                        "Realizá la transferencia y enviá el comprobante".to_owned(),
                    ),
                ]),
            },
        ),
        (
            "mercadopago".to_owned(),
            PaymentMethod {
                name: "MercadoPago".to_owned(),
                enabled: false,
                kind: PaymentKind::Gateway,
                config: BTreeMap::from([
                    ("access_token".to_owned(), String::new()),
                    ("public_key".to_owned(), String::new()),
                    ("webhook_url".to_owned(), String::new()),
                ]),
            },
        ),
    ]
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let methods = default_payment_methods();
        assert_eq!(methods.len(), 2);

        let (id, transfer) = &methods[0];
        assert_eq!(id, DEFAULT_PAYMENT_METHOD);
        assert!(transfer.enabled);
        assert_eq!(transfer.kind, PaymentKind::BankTransfer);

        let (_, gateway) = &methods[1];
        assert!(!gateway.enabled);
        assert_eq!(gateway.kind, PaymentKind::Gateway);
    }
}
