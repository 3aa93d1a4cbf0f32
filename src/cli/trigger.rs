use console::style;
use serde_json::json;

use super::commands::TriggerArgs;
use crate::dispatch::Dispatcher;
use crate::errors::SnareError;

pub async fn handle_trigger(args: TriggerArgs) -> Result<(), SnareError> {
    let (config, registry) =
        super::load_harness(args.config.as_deref(), args.cases.as_deref()).await?;
    let dispatcher = Dispatcher::from_config(&config, registry);

    let verdict = dispatcher.trigger(&args.case, args.input.as_bytes()).await?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "run_id": verdict.run_id,
                "case_id": verdict.case_id,
                "triggered": verdict.triggered,
                "raw_output": verdict.raw_output,
                "oracle_note": verdict.oracle_note,
            }))?
        );
        return Ok(());
    }

    let marker = if verdict.triggered {
        style("TRIGGERED").red().bold()
    } else {
        style("not triggered").green()
    };
    println!("run {} / {}: {}", verdict.run_id, verdict.case_id, marker);
    println!("oracle: {}", verdict.oracle_note);
    if !verdict.raw_output.is_empty() {
        println!("--- raw output ---");
        println!("{}", verdict.raw_output.trim_end());
    }

    Ok(())
}
