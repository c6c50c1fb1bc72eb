//! CLI: transcribe an audio file via the Hamsa realtime API.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use rust_hamsa::{SttClient, SttConfig, SttEvent, REALTIME_ENDPOINT};

#[derive(Parser, Debug)]
#[command(
    name = "hamsa-stt",
    about = "Transcribe an audio file via the Hamsa realtime API",
    after_help = "Example: hamsa-stt recording.wav ar"
)]
struct Args {
    /// Path to an audio file (WAV, MP3, ...)
    audio_file: PathBuf,

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

    if !args.audio_file.exists() {
        eprintln!("Error: File not found: {}", args.audio_file.display());
        process::exit(1);
    }

    let mut config = SttConfig::new(REALTIME_ENDPOINT.to_string(), api_key);
    config.language = args.language;

    let client = SttClient::new(config);
    if let Err(e) = client.transcribe_file(&args.audio_file).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
    println!("Audio sent, waiting for transcription...");

    loop {
        match client.next_event().await {
            Ok(SttEvent::Transcript(text)) => println!("Transcription: {text}"),
            Ok(SttEvent::Info(message)) => println!("Info: {message}"),
            Ok(SttEvent::Error(message)) => eprintln!("Error: {message}"),
            Ok(SttEvent::Message(value)) => println!("Response: {value}"),
            Ok(SttEvent::Ping | SttEvent::Pong) => {}
            Ok(SttEvent::Closed { code, reason }) => {
                println!(
                    "Connection closed (code: {}, reason: {reason})",
                    code.map_or_else(|| "none".to_string(), |c| c.to_string())
                );
                break;
            }
            Err(e) => {
                eprintln!("WebSocket error: {e}");
                break;
            }
        }
    }

    client.shutdown().await;
}
