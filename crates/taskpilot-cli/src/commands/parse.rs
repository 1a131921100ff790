//! Task extraction command.

use chrono::Utc;
use clap::Args;
use taskpilot_core::{Config, Task, TaskExtractor};

#[derive(Args)]
pub struct ParseArgs {
    /// Task text; multiple words are joined with spaces
    #[arg(required = true)]
    text: Vec<String>,
    /// Promote the draft to a task owned by this user
    #[arg(long)]
    user: Option<String>,
}

pub fn run(args: ParseArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let extractor = TaskExtractor::with_defaults(config.extractor)?;

    let now = Utc::now();
    let draft = extractor.parse_task_at(&args.text.join(" "), now)?;

    let json = match args.user {
        Some(user) => serde_json::to_string_pretty(&Task::from_draft(draft, user, now))?,
        None => serde_json::to_string_pretty(&draft)?,
    };
    println!("{json}");
    Ok(())
}
