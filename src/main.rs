//! elective: resolve a program's configuration from its schema and print it

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    cli::run()
}
