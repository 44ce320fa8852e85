use std::io::Read;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use phonoscribe::{Engine, EngineConfig, Mode, Resolution};

#[derive(Parser, Debug)]
#[command(name = "phonoscribe")]
#[command(about = "Resolve English text to IPA transcriptions")]
struct Params {
    /// Text to resolve. Reads stdin when omitted.
    text: Option<String>,

    /// Resolution mode.
    #[arg(short = 'M', long = "mode", value_enum, default_value_t = Mode::Cmu)]
    mode: Mode,

    /// Path to the pronunciation dictionary file (downloaded if missing).
    #[arg(short = 'd', long = "dict", default_value = "./data/cmudict-0.7b")]
    dict_path: PathBuf,

    /// Directory for per-word lookup records.
    #[arg(long = "cache-dir", default_value = "./data/lookup-cache")]
    cache_dir: PathBuf,

    /// Directory for materialized pronunciation audio.
    #[arg(long = "audio-dir", default_value = "./data/audio-cache")]
    audio_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    phonoscribe::init_logging();

    let params = Params::parse();

    let text = match params.text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let engine = Engine::new(EngineConfig {
        dict_path: params.dict_path,
        cache_dir: params.cache_dir,
        audio_dir: params.audio_dir,
    })
    .await?;

    match engine.resolve(&text, params.mode).await? {
        Resolution::Transcription(resolved) => println!("{}", resolved.ipa),
        Resolution::Lookup(lookup) => {
            println!("{}", serde_json::to_string_pretty(&lookup)?)
        }
    }

    Ok(())
}
