//! CLI command execution

use super::commands::{Cli, Commands};
use crate::base::BaseManager;
use crate::config::AirtableConfig;
use crate::error::Result;

/// Executes CLI commands against the configured connection
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a runner for parsed arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the selected command
    pub async fn run(&self) -> Result<()> {
        // pick up a local .env before reading the environment
        dotenvy::dotenv().ok();
        let config = AirtableConfig::from_env()?;
        let manager = BaseManager::new(config.clone())?;

        match &self.cli.command {
            Commands::Check => {
                let bases = manager.list_bases().await?;
                println!("✓ credentials accepted, {} base(s) accessible", bases.len());
            }
            Commands::Bases => {
                let bases = manager.list_bases().await?;
                println!("{} base(s):", bases.len());
                for base in bases {
                    let level = base.permission_level.as_deref().unwrap_or("unknown");
                    println!("  {} {} ({level})", base.id, base.name);
                }
            }
            Commands::Schema { base } => {
                let base_id = base.as_deref().unwrap_or_else(|| config.base_id());
                let tables = manager.get_base_schema(base_id).await?;
                println!("{} table(s) in {base_id}:", tables.len());
                for table in tables {
                    println!("  {} ({} fields)", table.name, table.fields.len());
                    for field in table.fields {
                        println!("    {} : {}", field.name, field.field_type);
                    }
                }
            }
        }

        Ok(())
    }
}
