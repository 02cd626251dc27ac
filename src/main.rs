use clap::{Parser, Subcommand};
use doc_qa::{
    agents::{DocumentInput, DocumentQaAgent},
    config::Config,
    routes::create_router,
    utils::init_logger,
    AppState,
};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "doc-qa")]
#[command(about = "Ask questions about PDF, Word, Excel, PowerPoint and text documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server (default)
    Serve {
        /// Bind address (overrides HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Answer one question about a document and exit
    Ask {
        /// Question to ask
        #[arg(short, long)]
        question: String,

        /// Document to read
        #[arg(short, long, conflicts_with = "content")]
        file: Option<PathBuf>,

        /// Already extracted document text
        #[arg(short, long)]
        content: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    match cli.command.unwrap_or(Commands::Serve { host: None, port: None }) {
        Commands::Serve { host, port } => serve(config, host, port).await,
        Commands::Ask { question, file, content } => ask(&config, &question, file, content).await,
    }
}

async fn serve(mut config: Config, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if config.llm.active_api_key().is_none() {
        tracing::warn!("GROQ_API_KEY not set; questions will be answered with a setup hint");
    }

    let host = config.server.host.clone();
    let port = config.server.port;
    let state = AppState::new(config);
    let app = create_router(state);

    let listener = bind_listener(&host, port).await?;
    info!("Server listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

/// Accepts IP literals and resolvable hostnames such as `localhost`
async fn bind_listener(host: &str, port: u16) -> std::io::Result<TcpListener> {
    TcpListener::bind((host, port)).await
}

async fn ask(config: &Config, question: &str, file: Option<PathBuf>, content: Option<String>) -> anyhow::Result<()> {
    let input = match (file, content) {
        (Some(path), _) => {
            if !path.exists() {
                anyhow::bail!("File not found: {}", path.display());
            }
            DocumentInput::File(path)
        }
        (None, Some(text)) => DocumentInput::Text(text),
        (None, None) => anyhow::bail!("Either --file or --content is required"),
    };

    let agent = DocumentQaAgent::new(config);
    let answer = agent.run(question, input).await;

    let ruler = "=".repeat(50);
    println!("\n{ruler}");
    println!("Question: {question}");
    println!("{ruler}");
    println!("{answer}");
    println!("{ruler}\n");

    Ok(())
}
