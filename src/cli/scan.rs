use crate::cli::commands::{CardArgs, EndpointArgs};
use crate::cli::{output, serve};
use crate::db::Database;
use crate::engine::ScanEngine;
use crate::errors::VigilError;

pub async fn handle_card(args: CardArgs) -> Result<(), VigilError> {
    let json_content = match &args.file {
        Some(path) => Some(tokio::fs::read_to_string(path).await?),
        None => None,
    };
    if args.url.is_none() && json_content.is_none() {
        return Err(VigilError::Validation(
            "Provide an agent card URL or --file".into(),
        ));
    }

    let config = serve::load_config(args.config.as_deref()).await?;
    let engine = ScanEngine::new(config, Database::new(&args.db)?)?;

    let result = engine
        .scan_card(args.url.as_deref(), json_content.as_deref())
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        output::print_result(&result);
    }
    Ok(())
}

pub async fn handle_endpoint(args: EndpointArgs) -> Result<(), VigilError> {
    let config = serve::load_config(args.config.as_deref()).await?;
    let engine = ScanEngine::new(config, Database::new(&args.db)?)?;

    let result = engine.scan_endpoint(Some(&args.url)).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        output::print_result(&result);
    }
    Ok(())
}
