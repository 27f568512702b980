pub mod client;
pub mod payment;

pub use client::{AccountSummary, SolanaRpc};
pub use payment::{
    inspect_token_transfer, PaymentCheck, PaymentError, PaymentVerdict, PaymentVerifier,
    SolanaPaymentVerifier, TransferInspection,
};
