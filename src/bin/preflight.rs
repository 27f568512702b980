use anyhow::Context;
use fulcanellie_staking_api::infra::config::{self, ServerSettings};
use fulcanellie_staking_api::solana::SolanaRpc;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

const TOKEN_PROGRAMS: &[&str] = &[
    "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA",
    "TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb",
];

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Reads the staking configuration from env vars:\n\
           STAKING_PROGRAM_ID, MINT_ADDRESS, ZOO_STORE_WALLET (optional SOLANA_NETWORK)\n\
         or from ./staking-config.json, then checks the accounts on the cluster.\n\
         Optional: SOLANA_RPC_URL\n"
    );
    std::process::exit(2);
}

fn pubkey(field: &str, value: &str) -> anyhow::Result<Pubkey> {
    Pubkey::from_str(value).map_err(|e| anyhow::anyhow!("{} is not a valid pubkey ({:?}): {}", field, value, e))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let staking_config = config::resolve()?;
    let settings = ServerSettings::from_env()?;
    let rpc_url = settings.rpc_url_for(&staking_config.network);

    println!("> Preflight:");
    println!("  network={}", staking_config.network);
    if !staking_config.network.is_recognized() {
        eprintln!("  Warning: unrecognized network, using the devnet endpoint.");
    }
    println!("  programId={}", staking_config.program_id);
    println!("  mintAddress={}", staking_config.mint_address);
    println!("  zooStoreWallet={}", staking_config.zoo_store_wallet);
    println!("  rpc={}", rpc_url);

    let program_id = pubkey("programId", &staking_config.program_id)?;
    let mint = pubkey("mintAddress", &staking_config.mint_address)?;
    let store_wallet = pubkey("zooStoreWallet", &staking_config.zoo_store_wallet)?;

    let rpc = SolanaRpc::new(rpc_url);

    // Basic RPC connectivity
    let version = rpc.version().await.context("RPC endpoint unreachable")?;
    println!("  RPC version: {}", version);

    // Program account existence
    match rpc.account_summary(&program_id).await? {
        Some(program) if program.executable => println!("  Program account is deployed + executable."),
        Some(_) => eprintln!("  Warning: program account exists but is not marked executable."),
        None => return Err(anyhow::anyhow!("Program account not found on cluster: {}", program_id)),
    }

    // Mint must be owned by a token program
    let mint_account = rpc
        .account_summary(&mint)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Mint account not found on cluster: {}", mint))?;
    let mint_owner = mint_account.owner.to_string();
    if !TOKEN_PROGRAMS.contains(&mint_owner.as_str()) {
        return Err(anyhow::anyhow!(
            "Mint {} is owned by {}, not a token program",
            mint,
            mint_owner
        ));
    }
    println!("  Mint account is a token mint (owner {}).", mint_owner);

    // Store wallet may legitimately be unfunded; only warn.
    match rpc.account_summary(&store_wallet).await? {
        Some(wallet) => println!("  Store wallet balance: {} lamports", wallet.lamports),
        None => eprintln!("  Warning: store wallet {} has no on-chain account yet.", store_wallet),
    }

    println!("> Preflight OK.");
    Ok(())
}
