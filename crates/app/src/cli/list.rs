use partlist_app::context::AppContext;

use super::{describe, print_outline};

pub(crate) async fn run(ctx: &AppContext) -> Result<(), String> {
    ctx.coordinator
        .refresh()
        .await
        .map_err(|error| format!("failed to load parts: {}", describe(&error)))?;

    print_outline(ctx)
}
