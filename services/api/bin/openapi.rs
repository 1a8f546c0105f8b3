use clap::Parser;
use mind_search_api::router::ApiDoc;
use std::path::PathBuf;
use utoipa::OpenApi;

/// Writes the OpenAPI document of the HTTP endpoints.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Destination file.
    #[arg(default_value = "openapi.json")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let spec_json = ApiDoc::openapi().to_pretty_json()?;
    std::fs::write(&args.output, spec_json)?;
    println!("Wrote {}", args.output.display());
    Ok(())
}
