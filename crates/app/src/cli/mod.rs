use std::io;

use clap::{Args, Parser, Subcommand};
use partlist::{
    parts::{PartDraft, PartId},
    render,
};
use partlist_app::{config::AppConfig, context::AppContext, coordinator::CoordinatorError};

mod add;
mod delete;
mod edit;
mod export;
mod list;

#[derive(Debug, Parser)]
#[command(name = "partlist", about = "Bill of materials client", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the parts outline
    List,

    /// Add a part
    Add(add::AddPartArgs),

    /// Change a part's attributes or parent
    Edit(edit::EditPartArgs),

    /// Delete a part without children
    Delete(delete::DeletePartArgs),

    /// Download the parts as a spreadsheet or document
    Export(export::ExportArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let ctx = AppContext::from_config(&self.config.store)
            .map_err(|error| format!("failed to start: {error}"))?;

        match self.command {
            Commands::List => list::run(&ctx).await,
            Commands::Add(args) => add::run(args, &ctx).await,
            Commands::Edit(args) => edit::run(args, &ctx).await,
            Commands::Delete(args) => delete::run(args, &ctx).await,
            Commands::Export(args) => export::run(args, &ctx).await,
        }
    }
}

/// Attributes entered for a new part.
#[derive(Debug, Args)]
pub(crate) struct PartArgs {
    /// Part name
    #[arg(long)]
    name: String,

    /// Unit price in whole currency units
    #[arg(long, allow_negative_numbers = true)]
    price: i64,

    /// Quantity, at least 1
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    quantity: i64,

    /// ID of the parent part; omit for a top-level part
    #[arg(long)]
    parent: Option<u64>,
}

impl From<PartArgs> for PartDraft {
    fn from(args: PartArgs) -> Self {
        Self {
            name: args.name,
            unit_price: args.price,
            quantity: args.quantity,
            parent_id: args.parent.map(PartId::new),
        }
    }
}

/// Print the held tree after a successful reload.
fn print_outline(ctx: &AppContext) -> Result<(), String> {
    let snapshot = ctx.coordinator.snapshot();

    if snapshot.tree.is_empty() {
        println!("no parts");

        return Ok(());
    }

    render::write_to(io::stdout().lock(), &snapshot.tree, ctx.currency)
        .map_err(|error| format!("failed to print parts: {error}"))
}

fn describe(error: &CoordinatorError) -> String {
    match error {
        CoordinatorError::Reconcile(source) => format!("{error}: {source}"),
        _ => error.to_string(),
    }
}
