//! CLI: synthesize speech from text via the Hamsa realtime API.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use rust_hamsa::{TtsClient, TtsConfig, REALTIME_ENDPOINT};

#[derive(Parser, Debug)]
#[command(
    name = "hamsa-tts",
    about = "Synthesize speech from text via the Hamsa realtime API",
    after_help = "Example: hamsa-tts \"مرحبا بالعالم\" output.wav ar"
)]
struct Args {
    /// Text to synthesize (max 2000 characters)
    text: String,

    /// Output file path for the audio
    #[arg(default_value = "output.wav")]
    output: PathBuf,

    /// Language code
    #[arg(default_value = "ar")]
    language: String,
}

fn api_key_from_env() -> Option<String> {
    match std::env::var("HAMSA_API_KEY") {
        Ok(key) if !key.is_empty() && key != "your_api_key_here" => Some(key),
        _ => None,
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let api_key = match api_key_from_env() {
        Some(key) => key,
        None => {
            eprintln!("Error: Set HAMSA_API_KEY in your environment or .env file");
            process::exit(1);
        }
    };

    let mut config = TtsConfig::new(REALTIME_ENDPOINT.to_string(), api_key);
    config.language_id = args.language;

    let client = TtsClient::new(config);
    match client.synthesize_to_file(&args.text, &args.output).await {
        Ok(Some(bytes)) => {
            println!("Audio saved to: {} ({bytes} bytes)", args.output.display());
        }
        Ok(None) => {
            println!("No audio received, nothing written");
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
