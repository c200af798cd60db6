//! # chatlens CLI
//!
//! Command-line interface for the chatlens library.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use chatlens::insight::OpenAiInsightGenerator;
use chatlens::transcribe::OpenAiTranscriber;
use chatlens::{Analyzer, ChatlensError, LinguisticConfig};

/// Analyze an exported chat archive.
#[derive(Parser)]
#[command(name = "chatlens", version, about)]
struct Args {
    /// Path to the exported chat ZIP archive
    input: PathBuf,

    /// Write the full result as JSON to this path instead of a summary
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Transcribe voice notes bundled in the archive
    #[arg(long)]
    transcribe: bool,

    /// Generate an LLM narrative from the statistics
    #[arg(long)]
    insights: bool,

    /// Backend for transcription and insights
    #[arg(long, value_enum, default_value_t = Provider::Openai)]
    provider: Provider,

    /// API key for the OpenAI provider (falls back to OPENAI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Base URL for the Ollama provider
    #[arg(long, default_value = "http://localhost:11434/v1")]
    base_url: String,

    /// Override the insight model name
    #[arg(long)]
    model: Option<String>,

    /// How many top words to rank
    #[arg(long, default_value_t = 20)]
    top_words: usize,

    /// Ceiling on the insight round-trip, in seconds
    #[arg(long, default_value_t = 60)]
    insight_timeout: u64,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Provider {
    Openai,
    Ollama,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

#[tokio::main]
async fn run() -> Result<(), ChatlensError> {
    let args = Args::parse();
    let total_start = Instant::now();

    println!("💬 chatlens v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", args.input.display());
    if let Some(ref output) = args.output {
        println!("💾 Output:  {}", output.display());
    }

    let mut analyzer = Analyzer::new()
        .with_linguistic_config(LinguisticConfig::new().with_top_n(args.top_words))
        .with_insight_timeout(Duration::from_secs(args.insight_timeout));

    if args.transcribe {
        println!("🎙️  Voice notes: transcribing via {}", args.provider.label());
        analyzer = analyzer.with_transcriber(Arc::new(build_transcriber(&args)?));
    }
    if args.insights {
        println!("✨ Insights: enabled via {}", args.provider.label());
        analyzer = analyzer.with_insight_generator(Arc::new(build_insight_generator(&args)?));
    }
    println!();

    println!("⏳ Analyzing archive...");
    let bytes = std::fs::read(&args.input)?;
    let result = analyzer.analyze(&bytes).await?;
    let total_time = total_start.elapsed();

    if let Some(ref output) = args.output {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(output, json)?;
        println!("✅ Done! Result saved to {}", output.display());
    } else {
        print_summary(&result);
    }

    println!();
    println!("⚡ Analyzed in {:.2}s", total_time.as_secs_f64());

    Ok(())
}

impl Provider {
    fn label(self) -> &'static str {
        match self {
            Provider::Openai => "OpenAI",
            Provider::Ollama => "Ollama",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // must round-trip through ValueEnum parsing
        let value = match self {
            Provider::Openai => "openai",
            Provider::Ollama => "ollama",
        };
        f.write_str(value)
    }
}

/// Resolves the API key from the flag or the environment.
fn resolve_api_key(args: &Args) -> Result<String, ChatlensError> {
    args.api_key
        .clone()
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .ok_or_else(|| {
            ChatlensError::insight("the OpenAI provider needs --api-key or OPENAI_API_KEY")
        })
}

fn build_transcriber(args: &Args) -> Result<OpenAiTranscriber, ChatlensError> {
    match args.provider {
        Provider::Openai => Ok(OpenAiTranscriber::new(resolve_api_key(args)?)),
        Provider::Ollama => Ok(OpenAiTranscriber::new(String::new()).with_base_url(&args.base_url)),
    }
}

fn build_insight_generator(args: &Args) -> Result<OpenAiInsightGenerator, ChatlensError> {
    let generator = match args.provider {
        Provider::Openai => OpenAiInsightGenerator::new(resolve_api_key(args)?),
        Provider::Ollama => OpenAiInsightGenerator::ollama(&args.base_url),
    };
    Ok(match &args.model {
        Some(model) => generator.with_model(model),
        None => generator,
    })
}

fn print_summary(result: &chatlens::AnalysisResult) {
    println!();
    println!("📊 Summary:");
    println!("   Messages:  {}", result.basic.total_messages);
    println!("   Words:     {}", result.basic.total_words);
    println!("   Duration:  {} days", result.basic.chat_duration_days);
    for (sender, count) in &result.basic.messages_per_user {
        println!("   {}: {} messages", sender, count);
    }

    if let Some(hour) = result.temporal.most_active_hour {
        println!();
        println!("🕒 Most active:");
        println!("   Hour:      {:02}:00", hour);
        if let Some(ref weekday) = result.temporal.most_active_weekday {
            println!("   Weekday:   {}", weekday);
        }
        if let Some(date) = result.temporal.most_active_date {
            println!("   Date:      {}", date);
        }
    }

    if !result.linguistic.top_words.is_empty() {
        println!();
        println!("🔤 Top words:");
        for entry in result.linguistic.top_words.iter().take(10) {
            println!("   {:<16} {}", entry.word, entry.count);
        }
    }

    if let Some(ref transcriptions) = result.transcriptions {
        println!();
        println!("🎙️  Transcribed {} voice notes", transcriptions.len());
        for record in transcriptions {
            println!("   [{}] {}: {}", record.timestamp.format("%Y-%m-%d %H:%M"), record.sender, record.text);
        }
    }

    if let Some(ref insight) = result.insight {
        println!();
        println!("✨ Insight:");
        println!("{}", insight);
    }
}
