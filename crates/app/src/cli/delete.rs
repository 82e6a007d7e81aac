use clap::Args;
use partlist::parts::PartId;
use partlist_app::context::AppContext;

use super::{describe, print_outline};

#[derive(Debug, Args)]
pub(crate) struct DeletePartArgs {
    /// ID of the part to delete
    id: u64,
}

pub(crate) async fn run(args: DeletePartArgs, ctx: &AppContext) -> Result<(), String> {
    ctx.coordinator
        .delete(PartId::new(args.id))
        .await
        .map_err(|error| format!("failed to delete part {}: {}", args.id, describe(&error)))?;

    print_outline(ctx)
}
