pub mod config;
pub mod parse;
pub mod prioritize;
pub mod suggest;

use serde::de::DeserializeOwned;
use std::io::Read;

/// Read a JSON argument: `-` for stdin, inline JSON, or a file path.
pub fn read_json<T: DeserializeOwned>(arg: &str) -> Result<T, Box<dyn std::error::Error>> {
    let content = if arg == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else if arg.trim_start().starts_with(['[', '{']) {
        arg.to_string()
    } else {
        std::fs::read_to_string(arg).map_err(|e| format!("cannot read {arg}: {e}"))?
    };

    Ok(serde_json::from_str(&content)?)
}

/// Single-threaded runtime for driving the async engine.
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}
