//! CLI command implementations.

use clap::{Parser, Subcommand};
use colored::Colorize;
use kalina_governance::{
    Credential, Dao, DaoConfig, IdentityResolver, QuorumConfig, VoteDirection,
};
use kalina_types::{Address, Amount};
use std::path::PathBuf;

use crate::config::KalinaConfig;
use crate::output::*;

/// Main CLI.
#[derive(Parser)]
#[command(name = "kalina")]
#[command(about = "Kalina DAO governance ledger")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Data directory (overrides the config file)
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Tracing filter, e.g. "info" or "kalina_governance=debug"
    #[arg(long, global = true)]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Seed a fresh ledger with a quorum threshold and treasury balance
    Init {
        /// Quorum threshold ("for" votes must strictly exceed this)
        #[arg(long, default_value_t = 1)]
        threshold: u64,

        /// Initial treasury balance in base units
        #[arg(long, default_value_t = 0)]
        balance: Amount,
    },

    /// Create a proposal
    Propose {
        /// Proposer identity (kln1... or 0x...)
        #[arg(long)]
        proposer: String,

        /// Short proposal name
        #[arg(long)]
        name: String,

        /// Free-text description
        #[arg(long, default_value = "")]
        description: String,

        /// Disbursement recipient (kln1... or 0x...)
        #[arg(long)]
        recipient: String,

        /// Requested amount in base units
        #[arg(long)]
        amount: Amount,
    },

    /// Cast a vote on a proposal
    Vote {
        /// Proposal id
        id: u64,

        /// Voter identity (kln1... or 0x...)
        #[arg(long)]
        voter: String,

        /// Vote against instead of for
        #[arg(long)]
        against: bool,
    },

    /// Finalize an eligible proposal and disburse its amount
    Finalize {
        /// Proposal id
        id: u64,
    },

    /// Credit the treasury
    Deposit {
        /// Amount in base units
        amount: Amount,
    },

    /// List all proposals with live tallies
    List,

    /// Show one proposal in detail
    Show {
        /// Proposal id
        id: u64,
    },

    /// Show a voter's ballots across all proposals
    Status {
        /// Voter identity (kln1... or 0x...)
        voter: String,
    },
}

fn open_dao(cfg: &KalinaConfig) -> anyhow::Result<Dao> {
    tracing::debug!(data_dir = %cfg.data_dir.display(), "opening governance ledger");
    let dao_config = DaoConfig {
        quorum: QuorumConfig::new(cfg.quorum_threshold),
        initial_balance: 0,
    };
    Ok(Dao::open(dao_config, &cfg.data_dir)?)
}

fn resolve(credential: &str) -> anyhow::Result<Address> {
    Ok(IdentityResolver::new().resolve(&Credential::Encoded(credential.to_string()))?)
}

/// Execute a command against the configured data directory.
pub fn execute(command: Commands, cfg: &KalinaConfig) -> anyhow::Result<()> {
    match command {
        Commands::Init { threshold, balance } => {
            let mut cfg = cfg.clone();
            cfg.quorum_threshold = threshold;
            cfg.save()?;

            let existed = Dao::ledger_exists(&cfg.data_dir);
            let dao = Dao::open(
                DaoConfig {
                    quorum: QuorumConfig::new(threshold),
                    initial_balance: balance,
                },
                &cfg.data_dir,
            )?;

            if existed {
                tracing::warn!(
                    data_dir = %cfg.data_dir.display(),
                    "init on an existing ledger, threshold and balance ignored"
                );
                println!(
                    "{} existing ledger found at {}, threshold and balance settings unchanged",
                    "note:".yellow().bold(),
                    cfg.data_dir.display()
                );
            }
            print_success(&format!(
                "ledger ready at {} (threshold {}, balance {})",
                cfg.data_dir.display(),
                dao.quorum_threshold(),
                format_kln(dao.treasury_balance()),
            ));
        }

        Commands::Propose { proposer, name, description, recipient, amount } => {
            let dao = open_dao(cfg)?;
            let proposer = resolve(&proposer)?;
            let recipient = resolve(&recipient)?;

            let id = dao.create_proposal(proposer, name, description, recipient, amount)?;
            print_success(&format!("created proposal {id}"));
        }

        Commands::Vote { id, voter, against } => {
            let dao = open_dao(cfg)?;
            let voter = resolve(&voter)?;
            let direction = if against { VoteDirection::Against } else { VoteDirection::For };

            dao.cast_vote(voter, id, direction)?;
            print_success(&format!("vote recorded on proposal {id}"));
        }

        Commands::Finalize { id } => {
            let dao = open_dao(cfg)?;
            dao.finalize(id)?;

            let view = dao
                .snapshot()
                .proposals
                .into_iter()
                .find(|p| p.id == id);
            match view {
                Some(view) => print_success(&format!(
                    "proposal {id} finalized, {} disbursed to {}",
                    format_kln(view.amount),
                    view.recipient
                )),
                None => print_success(&format!("proposal {id} finalized")),
            }
        }

        Commands::Deposit { amount } => {
            let dao = open_dao(cfg)?;
            dao.deposit(amount)?;
            print_success(&format!(
                "deposited {}, balance now {}",
                format_kln(amount),
                format_kln(dao.treasury_balance())
            ));
        }

        Commands::List => {
            let dao = open_dao(cfg)?;
            print_snapshot(&dao.snapshot());
        }

        Commands::Show { id } => {
            let dao = open_dao(cfg)?;
            let snapshot = dao.snapshot();
            let view = snapshot
                .proposals
                .iter()
                .find(|p| p.id == id)
                .ok_or_else(|| anyhow::anyhow!("proposal {id} not found"))?;
            print_proposal(view);
        }

        Commands::Status { voter } => {
            let dao = open_dao(cfg)?;
            let voter = resolve(&voter)?;
            let status = dao.voter_status(voter);

            if status.ballots.is_empty() {
                println!("{voter} has not voted on any proposal.");
            } else {
                for ballot in status.ballots {
                    let direction = match ballot.direction {
                        VoteDirection::For => "for",
                        VoteDirection::Against => "against",
                    };
                    println!("proposal {}: voted {}", ballot.proposal, direction);
                }
            }
        }
    }

    Ok(())
}
