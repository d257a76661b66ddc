//! CLI commands for the ledger
//!
//! Implements the command handlers behind the `erupee` binary.

use crate::core::{HistoryEntry, Ledger, LedgerConfig, LedgerError, SharedLedger};
use crate::mining::MiningControl;
use serde::Serialize;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Short form of an address for display
fn short(address: &str) -> &str {
    &address[..address.len().min(12)]
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct BalanceReport<'a> {
    label: &'a str,
    address: &'a str,
    balance: u64,
}

fn print_balances(ledger: &Ledger, accounts: &[(&str, &str)], json: bool) -> CliResult<()> {
    let mut reports = Vec::with_capacity(accounts.len());
    for &(label, address) in accounts {
        reports.push(BalanceReport {
            label,
            address,
            balance: ledger.get_balance(address)?,
        });
    }

    if json {
        return print_json(&reports);
    }

    for report in &reports {
        println!("   {:<10} {:>6} eRupee", report.label, report.balance);
    }
    Ok(())
}

fn print_history(history: &[HistoryEntry], json: bool) -> CliResult<()> {
    if json {
        return print_json(&history);
    }

    if history.is_empty() {
        println!("   (no confirmed transfers)");
    }
    for entry in history {
        println!(
            "   #{} {:?} {} eRupee ({} coins) counterparty {}",
            entry.block_index,
            entry.kind,
            entry.amount,
            entry.coins.len(),
            short(&entry.counterparty)
        );
    }
    Ok(())
}

/// Send and report whether the ledger accepted the transfer
fn transfer(ledger: &mut Ledger, from: &str, to: &str, amount: u64) {
    match ledger.try_add_transaction(from, to, amount) {
        Ok(()) => println!("   ✅ Queued {} eRupee {} → {}", amount, short(from), short(to)),
        Err(e) => println!("   ❌ Transfer of {} eRupee declined: {}", amount, e),
    }
}

/// Run the scripted demonstration session
pub fn cmd_demo(config: LedgerConfig, warmup_blocks: u32, json: bool) -> CliResult<()> {
    println!("⛓️  Creating ledger (difficulty {})...", config.difficulty);
    let mut ledger = Ledger::new(config)?;

    let account1 = ledger.create_account();
    let account2 = ledger.create_account();
    let miner = ledger.create_account();

    println!("\n🔐 Accounts");
    println!("   Account 1: {}", account1);
    println!("   Account 2: {}", account2);
    println!("   Miner:     {}", miner);

    println!("\n⛏️  Mining {} warm-up block(s)...", warmup_blocks);
    for _ in 0..warmup_blocks {
        let block = ledger.mine_pending_transactions(&miner)?;
        println!("   Block {} | {}", block.index, &block.hash[..16]);
    }

    println!("\n📤 Miner → Account 1");
    transfer(&mut ledger, &miner, &account1, 30);
    ledger.mine_pending_transactions(&miner)?;

    let labelled = [
        ("miner", miner.as_str()),
        ("account1", account1.as_str()),
        ("account2", account2.as_str()),
    ];

    println!("\n💰 Balances");
    print_balances(&ledger, &labelled, json)?;

    println!("\n📤 Account 1 → Account 2");
    transfer(&mut ledger, &account1, &account2, 20);
    ledger.mine_pending_transactions(&miner)?;

    println!("\n💰 Updated balances");
    print_balances(&ledger, &labelled, json)?;

    println!("\n📜 Account 1 history");
    print_history(&ledger.get_transaction_history(&account1)?, json)?;

    println!("\n🪙 Account 2 coins");
    for (denomination, serials) in ledger.get_coins_by_denomination(&account2)? {
        if !serials.is_empty() {
            println!("   {:>3} × {}", denomination, serials.len());
        }
    }

    cmd_validate(&ledger)
}

/// Mine `count` blocks through the shared handle; Ctrl+C cancels the current block
pub async fn cmd_mine(config: LedgerConfig, count: u32, json: bool) -> CliResult<()> {
    let max_attempts = config.max_mining_attempts;
    let shared = SharedLedger::new(Ledger::new(config)?);
    let miner = shared.create_account().await;

    let control = MiningControl::bounded_by(max_attempts);
    let cancel = control.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n📴 Cancelling mining...");
            cancel.cancel();
        }
    });

    println!("⛏️  Mining {} block(s) for {}", count, miner);

    let mut results = Vec::new();
    for _ in 0..count {
        match shared
            .mine_pending_transactions(&miner, control.clone())
            .await
        {
            Ok(stats) => {
                if !json {
                    println!("\n   Block {} mined!", stats.block_index);
                    println!("   ├─ Hash: {}", &stats.block_hash[..16]);
                    println!("   ├─ Time: {}ms", stats.time_ms);
                    println!("   ├─ Attempts: {}", stats.hash_attempts);
                    println!("   └─ Hash rate: {:.2} H/s", stats.hash_rate);
                }
                results.push(stats);
            }
            Err(LedgerError::Mining(e)) => {
                println!("\n⚠️  Stopped: {}", e);
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    if json {
        print_json(&results)?;
    }

    let balance = shared.get_balance(&miner).await?;
    println!("\n💰 Miner balance: {} eRupee", balance);
    println!(
        "🔍 Chain valid: {}",
        if shared.is_chain_valid().await { "yes" } else { "no" }
    );

    Ok(())
}

/// Validate the ledger's chain
pub fn cmd_validate(ledger: &Ledger) -> CliResult<()> {
    println!("\n🔍 Validating chain...");

    match ledger.validate_chain() {
        Ok(()) => {
            println!("✅ Chain is valid!");
            println!("   {} blocks verified", ledger.blocks().len());
            Ok(())
        }
        Err(e) => {
            println!("❌ Chain validation FAILED!");
            Err(LedgerError::from(e).into())
        }
    }
}
