//! Reset command implementation.

use std::io::{self, Write};

use anyhow::Result;

use tirta_core::HistoryStore;

use crate::config::Config;

pub fn cmd_reset(config: &Config, yes: bool) -> Result<()> {
    let mut store = HistoryStore::open(config.history_options());

    if store.is_empty() {
        println!("History is already empty.");
        return Ok(());
    }

    if !yes {
        print!(
            "Delete {} stored readings from {}? [y/N] ",
            store.len(),
            config.history_path().display()
        );
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            println!("Aborted.");
            return Ok(());
        }
    }

    let count = store.len();
    store.clear();
    println!("Cleared {} readings.", count);
    Ok(())
}
