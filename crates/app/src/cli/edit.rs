use clap::Args;
use partlist::parts::{Part, PartDraft, PartId};
use partlist_app::context::AppContext;

use super::{describe, print_outline};

/// Fields left out keep the part's current value.
#[derive(Debug, Args)]
pub(crate) struct EditPartArgs {
    /// ID of the part to change
    id: u64,

    /// New name
    #[arg(long)]
    name: Option<String>,

    /// New unit price in whole currency units
    #[arg(long, allow_negative_numbers = true)]
    price: Option<i64>,

    /// New quantity, at least 1
    #[arg(long, allow_negative_numbers = true)]
    quantity: Option<i64>,

    /// Move the part under this parent
    #[arg(long, conflicts_with = "root")]
    parent: Option<u64>,

    /// Move the part to the top level
    #[arg(long)]
    root: bool,
}

impl EditPartArgs {
    /// Merge the given fields over the part as currently stored.
    fn draft(self, current: &Part) -> PartDraft {
        let parent_id = if self.root {
            None
        } else {
            self.parent.map(PartId::new).or(current.parent_id)
        };

        PartDraft {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            unit_price: self
                .price
                .unwrap_or_else(|| i64::try_from(current.unit_price).unwrap_or(i64::MAX)),
            quantity: self
                .quantity
                .unwrap_or_else(|| i64::from(current.quantity)),
            parent_id,
        }
    }
}

pub(crate) async fn run(args: EditPartArgs, ctx: &AppContext) -> Result<(), String> {
    let id = PartId::new(args.id);

    let snapshot = ctx
        .coordinator
        .refresh()
        .await
        .map_err(|error| format!("failed to load parts: {}", describe(&error)))?;

    let current = snapshot
        .tree
        .find(id)
        .and_then(|key| snapshot.tree.get(key))
        .map(|node| node.part().clone())
        .ok_or_else(|| format!("part {id} not found"))?;

    ctx.coordinator
        .update(id, args.draft(&current))
        .await
        .map_err(|error| format!("failed to edit part {id}: {}", describe(&error)))?;

    print_outline(ctx)
}
