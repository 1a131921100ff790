//! Task ranking command.

use clap::Args;
use taskpilot_core::{Config, Engine, Task, UserPreferences};

use super::{read_json, runtime};

#[derive(Args)]
pub struct PrioritizeArgs {
    /// JSON array of tasks: inline, a file path, or `-` for stdin
    tasks: String,
    /// JSON object of user preferences
    #[arg(long)]
    preferences: Option<String>,
}

pub fn run(args: PrioritizeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let tasks: Vec<Task> = read_json(&args.tasks)?;
    let preferences: UserPreferences = match args.preferences.as_deref() {
        Some(prefs) => read_json(prefs)?,
        None => UserPreferences::new(),
    };

    let config = Config::load()?;
    let engine = Engine::from_config(&config.scheduler);
    let ranked = runtime()?.block_on(engine.prioritize(tasks, &preferences));

    println!("{}", serde_json::to_string_pretty(&ranked)?);
    Ok(())
}
