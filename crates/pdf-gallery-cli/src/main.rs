use anyhow::{Context, Result};
use pdf_gallery::GalleryOptions;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = GalleryOptions::default();
    let report = pdf_gallery::run(&options).await.with_context(|| {
        format!(
            "Failed to build gallery from {}",
            options.source_dir.display()
        )
    })?;

    println!(
        "Generated {} pages from {} images ({} reduced, {} skipped) → {}",
        report.pages,
        report.normalized,
        report.reduced,
        report.skipped.len(),
        report.output_path.display()
    );

    Ok(())
}
