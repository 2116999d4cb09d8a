//! Output formatting utilities.
//!
//! Pretty printing for CLI commands.

use colored::Colorize;
use kalina_governance::{DaoSnapshot, ProposalStatus, ProposalView};
use kalina_types::amount::UNITS_PER_KLN;
use kalina_types::{Address, Amount};
use tabled::{Table, Tabled};

/// Format address for display (shortened Bech32m).
pub fn format_address(addr: &Address) -> String {
    let s = addr.to_string();
    if s.len() > 16 {
        format!("{}...{}", &s[..10], &s[s.len() - 6..])
    } else {
        s
    }
}

/// Format an amount as KLN.
pub fn format_kln(value: Amount) -> String {
    let kln = value as f64 / UNITS_PER_KLN as f64;
    if kln >= 0.001 {
        format!("{:.4} KLN", kln)
    } else {
        format!("{} units", value)
    }
}

fn format_status(status: ProposalStatus) -> String {
    match status {
        ProposalStatus::Open => "In Progress".to_string(),
        ProposalStatus::Finalized => "Approved".to_string(),
    }
}

#[derive(Tabled)]
struct ProposalRow {
    #[tabled(rename = "#")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Recipient")]
    recipient: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "For")]
    votes_for: u64,
    #[tabled(rename = "Against")]
    votes_against: u64,
    #[tabled(rename = "Eligible")]
    eligible: String,
}

fn proposal_row(view: &ProposalView) -> ProposalRow {
    ProposalRow {
        id: view.id,
        name: view.name.clone(),
        recipient: format_address(&view.recipient),
        amount: format_kln(view.amount),
        status: format_status(view.status),
        votes_for: view.votes_for,
        votes_against: view.votes_against,
        eligible: if view.eligible { "yes".to_string() } else { String::new() },
    }
}

/// Print the proposal table plus quorum and treasury lines.
pub fn print_snapshot(snapshot: &DaoSnapshot) {
    println!("{} {}", "Quorum threshold:".bold(), snapshot.quorum_threshold);
    println!(
        "{} {}",
        "Treasury balance:".bold(),
        format_kln(snapshot.treasury_balance)
    );
    println!();

    if snapshot.proposals.is_empty() {
        println!("No proposals yet.");
        return;
    }

    let rows: Vec<ProposalRow> = snapshot.proposals.iter().map(proposal_row).collect();
    println!("{}", Table::new(rows));
}

/// Print one proposal in long form.
pub fn print_proposal(view: &ProposalView) {
    println!("{} {}", "Proposal".bold(), view.id);
    println!("  Name:        {}", view.name);
    if !view.description.is_empty() {
        println!("  Description: {}", view.description);
    }
    println!("  Proposer:    {}", view.proposer);
    println!("  Recipient:   {}", view.recipient);
    println!("  Amount:      {}", format_kln(view.amount));
    println!("  Status:      {}", format_status(view.status));
    println!("  Votes:       {} for / {} against", view.votes_for, view.votes_against);
    println!("  Recipient received so far: {}", format_kln(view.recipient_received));
}

/// Print success message.
pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}
