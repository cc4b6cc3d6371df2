//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Announce the account a selection settled on.
pub fn selected(account: &str) {
    println!("{} {}", style(">>>>>>>").cyan().bold(), style(account).bold());
}

/// One row of the `ls` table.
pub struct AccountRow {
    pub name: String,
    /// `None` for rows that are themselves backups.
    pub backups: Option<usize>,
}

/// Print a table of accounts (Account, Backups).
pub fn print_accounts_table(rows: &[AccountRow]) {
    if rows.is_empty() {
        info("No matching accounts.");
        tip("Run `passvault add <ACCOUNT>` to add one.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Account", "Backups"]);

    for row in rows {
        table.add_row(vec![
            row.name.clone(),
            row.backups.map_or_else(|| "-".to_string(), |n| n.to_string()),
        ]);
    }

    println!("{table}");
}
