use super::commands::ValidateArgs;
use crate::errors::SnareError;

pub async fn handle_validate(args: ValidateArgs) -> Result<(), SnareError> {
    let (_config, registry) =
        super::load_harness(args.config.as_deref(), args.cases.as_deref()).await?;

    println!(
        "Configuration is valid; catalogue holds {} case(s)",
        registry.len()
    );
    Ok(())
}
