// Responsible for all communication with the Solana cluster.
//
// The service never signs anything: it only reads accounts and confirmed transactions.

use serde_json::{json, Value as JsonValue};
use solana_client::client_error::ClientError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_request::RpcRequest;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Signature};
use tracing::debug;

/// What preflight needs to know about an on-chain account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    pub owner: Pubkey,
    pub executable: bool,
    pub lamports: u64,
    pub data_len: usize,
}

/// Thin wrapper around the nonblocking RPC client at `confirmed` commitment.
pub struct SolanaRpc {
    client: RpcClient,
}

impl SolanaRpc {
    pub fn new(rpc_url: String) -> Self {
        Self {
            client: RpcClient::new_with_commitment(rpc_url, CommitmentConfig::confirmed()),
        }
    }

    pub fn url(&self) -> String {
        self.client.url()
    }

    pub async fn version(&self) -> Result<String, ClientError> {
        Ok(self.client.get_version().await?.solana_core)
    }

    /// Returns `None` when the account does not exist.
    pub async fn account_summary(&self, pubkey: &Pubkey) -> Result<Option<AccountSummary>, ClientError> {
        let response = self
            .client
            .get_account_with_commitment(pubkey, CommitmentConfig::confirmed())
            .await?;
        Ok(response.value.map(|account| AccountSummary {
            owner: account.owner,
            executable: account.executable,
            lamports: account.lamports,
            data_len: account.data.len(),
        }))
    }

    /// Fetches a confirmed transaction with `jsonParsed` encoding.
    ///
    /// The raw JSON is returned so token balances can be inspected without depending on
    /// the transaction-status type tree. `None` when the cluster does not know the signature.
    pub async fn parsed_transaction(&self, signature: &Signature) -> Result<Option<JsonValue>, ClientError> {
        debug!(%signature, "getTransaction");
        let params = json!([
            signature.to_string(),
            {
                "encoding": "jsonParsed",
                "commitment": "confirmed",
                "maxSupportedTransactionVersion": 0
            }
        ]);
        let tx: JsonValue = self.client.send(RpcRequest::GetTransaction, params).await?;
        Ok(if tx.is_null() { None } else { Some(tx) })
    }
}
