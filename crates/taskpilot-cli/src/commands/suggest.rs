//! Slot suggestion command.

use clap::Args;
use taskpilot_core::{Config, Engine, Task};

use super::{read_json, runtime};

#[derive(Args)]
pub struct SuggestArgs {
    /// JSON task: inline, a file path, or `-` for stdin
    task: String,
    /// JSON array of already scheduled tasks
    #[arg(long)]
    schedule: Option<String>,
}

pub fn run(args: SuggestArgs) -> Result<(), Box<dyn std::error::Error>> {
    let task: Task = read_json(&args.task)?;
    let schedule: Vec<Task> = match args.schedule.as_deref() {
        Some(schedule) => read_json(schedule)?,
        None => Vec::new(),
    };

    let config = Config::load()?;
    let engine = Engine::from_config(&config.scheduler);
    match runtime()?.block_on(engine.suggest_time_slot(&task, &schedule)) {
        Some(slot) => println!("{}", slot.to_rfc3339()),
        None => println!("null"),
    }
    Ok(())
}
