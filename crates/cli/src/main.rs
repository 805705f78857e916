use anyhow::Context;
use attribs_cli::config::Config;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    attribs_observability::init();

    let config = Config::parse();
    tracing::debug!(?config, "starting");

    let source = std::fs::read_to_string(&config.path)
        .with_context(|| format!("failed to read {}", config.path.display()))?;
    let object = attribs_cli::document::load(&source)?;

    println!("{}", attribs_cli::render(&object, &config)?);
    Ok(())
}
