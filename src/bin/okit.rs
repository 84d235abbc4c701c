//! okit - ollama-kit CLI client
//!
//! Talks to an Ollama server directly; streaming commands print fragments as
//! they arrive.

use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use futures_util::StreamExt;
use ollama_kit::{
    ChatMessage, ChatRequest, ClientConfig, CopyModelRequest, DeleteModelRequest,
    EmbeddingsRequest, GenerateRequest, ModelInfoRequest, OllamaKit, PullModelRequest,
};

/// Ollama command-line client
#[derive(Parser)]
#[command(name = "okit")]
#[command(version = ollama_kit::PKG_VERSION)]
#[command(about = "Ollama API client")]
struct Args {
    /// Server base URL (overrides config file and OLLAMA_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bearer token (overrides config file and OLLAMA_API_KEY)
    #[arg(long)]
    token: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check whether the server answers
    Reachable,

    /// List local models
    Models,

    /// Show model metadata
    Show {
        /// Model name
        model: String,
    },

    /// Generate a completion for a prompt
    Generate {
        /// Prompt (or omit to read from stdin)
        prompt: Option<String>,
        /// Model to use
        #[arg(short, long)]
        model: String,
        /// System prompt
        #[arg(short, long)]
        system: Option<String>,
    },

    /// Send a single user message
    Chat {
        /// User message (or omit to read from stdin)
        message: Option<String>,
        /// Model to use
        #[arg(short, long)]
        model: String,
        /// Sampling temperature
        #[arg(short, long)]
        temperature: Option<f32>,
    },

    /// Copy a model under a new name
    Copy { source: String, destination: String },

    /// Delete a local model
    Delete { model: String },

    /// Download a model from the library
    Pull {
        model: String,
        /// Allow insecure connections to the library
        #[arg(long)]
        insecure: bool,
    },

    /// Compute an embedding for text
    Embed {
        /// Text to embed (or omit to read from stdin)
        text: Option<String>,
        /// Model to use
        #[arg(short, long)]
        model: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // default: warn for CLI; override with RUST_LOG
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    tracing::debug!(version = %ollama_kit::version::version_string(), "okit starting");

    let mut config = ClientConfig::load(args.config.as_deref())?.with_env();
    if let Some(host) = args.host {
        config.base_url = host;
    }
    if let Some(token) = args.token {
        config.bearer_token = Some(token);
    }
    let client = OllamaKit::from_config(&config)?;

    match args.command {
        Command::Reachable => {
            if client.reachable().await {
                println!("{} is reachable", client.base_url());
            } else {
                println!("{} is not reachable", client.base_url());
                std::process::exit(1);
            }
        }

        Command::Models => {
            let list = client.models().await?;
            if list.models.is_empty() {
                println!("no models available");
            }
            for model in list.models {
                println!(
                    "{:<40} {:>10}  {}",
                    model.name,
                    format_size(model.size),
                    model.modified_at.format("%Y-%m-%d %H:%M")
                );
            }
        }

        Command::Show { model } => {
            let info = client.model_info(&ModelInfoRequest::new(model)).await?;
            if let Some(details) = &info.details {
                if let Some(family) = &details.family {
                    println!("family:       {family}");
                }
                if let Some(size) = &details.parameter_size {
                    println!("parameters:   {size}");
                }
                if let Some(quant) = &details.quantization_level {
                    println!("quantization: {quant}");
                }
            }
            if !info.parameters.is_empty() {
                println!("\nparameters:\n{}", info.parameters.trim_end());
            }
            if !info.template.is_empty() {
                println!("\ntemplate:\n{}", info.template.trim_end());
            }
        }

        Command::Generate {
            prompt,
            model,
            system,
        } => {
            let prompt = resolve_text(prompt, "generate")?;
            let mut request = GenerateRequest::new(model, prompt);
            if let Some(system) = system {
                request = request.system(system);
            }
            let mut stream = client.generate(&request);
            let mut stdout = io::stdout();
            while let Some(fragment) = stream.next().await {
                write!(stdout, "{}", fragment?.response)?;
                stdout.flush()?;
            }
            writeln!(stdout)?;
        }

        Command::Chat {
            message,
            model,
            temperature,
        } => {
            let message = resolve_text(message, "chat")?;
            let request = ChatRequest::new(model, vec![ChatMessage::user(message)])
                .with_options(|options| options.temperature = temperature);
            let mut stream = client.chat(&request);
            let mut stdout = io::stdout();
            while let Some(reply) = stream.next().await {
                write!(stdout, "{}", reply?.content())?;
                stdout.flush()?;
            }
            writeln!(stdout)?;
        }

        Command::Copy {
            source,
            destination,
        } => {
            client
                .copy_model(&CopyModelRequest::new(&source, &destination))
                .await?;
            println!("copied {source} to {destination}");
        }

        Command::Delete { model } => {
            client
                .delete_model(&DeleteModelRequest::new(&model))
                .await?;
            println!("deleted {model}");
        }

        Command::Pull { model, insecure } => {
            let mut stream = client.pull_model(&PullModelRequest::new(model).insecure(insecure));
            while let Some(update) = stream.next().await {
                let update = update?;
                match update.progress() {
                    Some(fraction) => println!("{} {:>5.1}%", update.status, fraction * 100.0),
                    None => println!("{}", update.status),
                }
            }
        }

        Command::Embed { text, model } => {
            let text = resolve_text(text, "embed")?;
            let response = client
                .embeddings(&EmbeddingsRequest::new(model, text))
                .await?;
            let values = response.embedding.unwrap_or_default();
            println!("dimensions: {}", values.len());
            println!(
                "values: [{:.4}, {:.4}, ... ({} total)]",
                values.first().unwrap_or(&0.0),
                values.get(1).unwrap_or(&0.0),
                values.len()
            );
        }
    }

    Ok(())
}

/// Resolve text input from an optional CLI argument and/or stdin.
///
/// - arg only → arg
/// - stdin only → stdin
/// - both → `"{arg}\n\n{stdin}"`
/// - neither → error
fn resolve_text(arg: Option<String>, command: &str) -> Result<String, Box<dyn std::error::Error>> {
    let stdin_text = if io::stdin().is_terminal() {
        None
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim().to_string();
        (!trimmed.is_empty()).then_some(trimmed)
    };

    match (arg, stdin_text) {
        (Some(a), Some(s)) => Ok(format!("{a}\n\n{s}")),
        (Some(a), None) => Ok(a),
        (None, Some(s)) => Ok(s),
        (None, None) => {
            Err(format!("{command}: no input provided (pass text as argument or via stdin)").into())
        }
    }
}

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
