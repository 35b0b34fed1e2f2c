use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use clap::Subcommand;
use clap_serde_derive::ClapSerde;
use serde_json::{json, Value};

use crop_price_runner::api::response::AiSuggestionData;
use crop_price_runner::config::{Config, DEFAULT_CONFIG_FILE};
use crop_price_runner::generation::GeminiClient;
use crop_price_runner::pricing::{format_price, PriceAdvisor, PriceQuery, PriceRange};
use crop_price_runner::telemetry::init_telemetry;

const DEMO_CASES: [(&str, &str); 8] = [
    ("Tomato", "Mumbai, Maharashtra"),
    ("Wheat", "Punjab, India"),
    ("Rice", "Karnataka, India"),
    ("Potato", "Uttar Pradesh, India"),
    ("Onion", "Maharashtra, India"),
    ("Mango", "Andhra Pradesh, India"),
    ("Apple", "Himachal Pradesh, India"),
    ("Milk", "Gujarat, India"),
];

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env, default_value = DEFAULT_CONFIG_FILE)]
    config_file: String,

    #[command(flatten)]
    opt_config: <Config as ClapSerde>::Opt,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the model for a price range without going through the server
    Suggest {
        /// Name of the crop
        #[clap(long)]
        crop: String,

        /// Location the crop is sold in
        #[clap(long)]
        location: String,
    },
    /// Send the demo crops to a running server
    Demo {
        /// Base URL of the server
        #[clap(short, long, default_value = "http://localhost:5000")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::load(&args.config_file, args.opt_config)?;

    match args.cmd {
        Commands::Suggest { crop, location } => {
            init_telemetry(&config)?;
            suggest(&config, PriceQuery::new(crop, location)).await
        }
        Commands::Demo { url } => demo(&url).await,
    }
}

async fn suggest(config: &Config, query: PriceQuery) -> Result<()> {
    let advisor = PriceAdvisor::new(Arc::new(GeminiClient::from_config(config)?));
    let range = advisor.suggest(&query).await?;

    println!("{}", render_suggestion(query, range));
    Ok(())
}

fn render_suggestion(query: PriceQuery, range: PriceRange) -> String {
    let heading = format!("Price range for {query}:");
    let data = AiSuggestionData::new(query, range);
    format!(
        "{heading}\n  min ₹{}, max ₹{} per kg\n  {}",
        format_price(data.min_price),
        format_price(data.max_price),
        data.display_text
    )
}

async fn demo(base_url: &str) -> Result<()> {
    let client = reqwest::Client::new();
    let endpoint = format!("{}/api/ai-price-suggestion", base_url.trim_end_matches('/'));
    let mut failures = 0;

    for (index, (crop, location)) in DEMO_CASES.iter().enumerate() {
        println!("Test case {}: {crop} in {location}", index + 1);

        let response = client
            .post(&endpoint)
            .json(&json!({ "crop": crop, "location": location }))
            .send()
            .await?;
        let status = response.status();
        let body: Value = response.json().await?;

        if !status.is_success() {
            failures += 1;
            println!("  HTTP error {status}: {body}");
        } else if body["success"] == true {
            let data = &body["data"];
            println!("  Suggested price: {}", data["placeholder_text"]);
            println!("  {}", data["display_text"]);
        } else {
            failures += 1;
            println!("  API returned error: {}", body["message"]);
        }
    }

    if failures > 0 {
        bail!("{failures} of {} demo cases failed", DEMO_CASES.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestion_uses_api_display_text() {
        let range = PriceRange::new(10.0, 10.25).unwrap();
        let text = render_suggestion(PriceQuery::new("Onion", "Nashik"), range);

        assert_eq!(
            text,
            "Price range for Onion in Nashik:\n  min ₹10.0, max ₹10.25 per kg\n  \
             AI Suggestion: ₹10.12/kg (Range: ₹10.0-₹10.25/kg)"
        );
    }
}
