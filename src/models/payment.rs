use serde::{Deserialize, Serialize};

/// Collection the payment-verification process writes to.
pub const PAYMENT_COLLECTION: &str = "ClientPayment";

/// A payment observed on chain. `address` and `block` are each unique across
/// the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub address: String,
    pub block: u64,
    pub quantity: f64,
    /// Recorded by the verification process; stored as-is.
    #[serde(rename = "checkingFromFunc")]
    pub checking_from_func: i64,
}
