use clap::Args;
use partlist_app::context::AppContext;

use super::{PartArgs, describe, print_outline};

#[derive(Debug, Args)]
pub(crate) struct AddPartArgs {
    #[command(flatten)]
    part: PartArgs,
}

pub(crate) async fn run(args: AddPartArgs, ctx: &AppContext) -> Result<(), String> {
    let created = ctx
        .coordinator
        .create(args.part.into())
        .await
        .map_err(|error| format!("failed to add part: {}", describe(&error)))?;

    if let Some(id) = created.id {
        println!("part_id: {id}");
    }

    print_outline(ctx)
}
