use std::path::PathBuf;

use clap::Args;
use partlist_app::{context::AppContext, coordinator::Export, store::ExportFormat};

use super::describe;

#[derive(Debug, Args)]
pub(crate) struct ExportArgs {
    /// Document format
    #[arg(value_enum)]
    format: ExportFormat,

    /// Where to write the document; defaults to `parts.xlsx` or `parts.pdf`
    #[arg(long)]
    out: Option<PathBuf>,
}

pub(crate) async fn run(args: ExportArgs, ctx: &AppContext) -> Result<(), String> {
    let export = ctx
        .coordinator
        .export(args.format)
        .await
        .map_err(|error| format!("failed to export parts: {}", describe(&error)))?;

    let path = save(&export, args.out).await?;

    println!("saved: {}", path.display());

    Ok(())
}

async fn save(export: &Export, out: Option<PathBuf>) -> Result<PathBuf, String> {
    let path = out.unwrap_or_else(|| PathBuf::from(export.file_name()));

    tokio::fs::write(&path, &export.bytes)
        .await
        .map_err(|error| format!("failed to write {}: {error}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn writes_bytes_to_the_given_path() -> TestResult {
        let dir = tempfile::tempdir()?;
        let target = dir.path().join("bom.pdf");

        let export = Export {
            format: ExportFormat::Pdf,
            bytes: b"%PDF-1.4".to_vec(),
        };

        let path = save(&export, Some(target.clone())).await?;

        assert_eq!(path, target);
        assert_eq!(tokio::fs::read(&target).await?, b"%PDF-1.4".to_vec());

        Ok(())
    }

    #[tokio::test]
    async fn missing_directory_is_reported() -> TestResult {
        let dir = tempfile::tempdir()?;
        let target = dir.path().join("missing").join("parts.xlsx");

        let export = Export {
            format: ExportFormat::Excel,
            bytes: Vec::new(),
        };

        let error = save(&export, Some(target))
            .await
            .err()
            .ok_or("write succeeded")?;

        assert!(error.starts_with("failed to write"));

        Ok(())
    }
}
