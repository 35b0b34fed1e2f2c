use std::env;
use std::error;

use reqwest::Url;
use serde_json::Value;

/// Exits non-zero unless the given health endpoint reports `healthy`.
fn main() -> Result<(), Box<dyn error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err("Missing URL argument".into());
    }

    let url = Url::parse(&args[1])?;

    let response = reqwest::blocking::get(url)?;
    if !response.status().is_success() {
        return Err(format!("Request failed with status {}", response.status()).into());
    }

    let body: Value = response.json()?;
    match body.get("status").and_then(Value::as_str) {
        Some("healthy") => Ok(()),
        other => Err(format!("Service reported status {:?}", other).into()),
    }
}
