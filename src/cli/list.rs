use console::style;
use serde_json::json;

use super::commands::ListArgs;
use crate::errors::SnareError;

pub async fn handle_list(args: ListArgs) -> Result<(), SnareError> {
    let (_config, registry) = super::load_harness(None, args.cases.as_deref()).await?;

    if args.json {
        let cases: Vec<serde_json::Value> = registry
            .all()
            .iter()
            .map(|case| {
                json!({
                    "id": case.id,
                    "class": case.class.as_str(),
                    "description": case.description.trim(),
                    "isolation": case.isolation.as_str(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json!({ "cases": cases }))?);
        return Ok(());
    }

    for case in registry.all() {
        println!(
            "{:<24} {:<20} {}",
            style(&case.id).cyan().bold(),
            style(case.class.as_str()).yellow(),
            case.description.trim()
        );
    }
    println!("\n{} case(s)", registry.len());

    Ok(())
}
