//! Showcase - presentation controller and generation client.
//!
//! # Usage
//!
//! ```bash
//! showcase text "Summarise haptic feedback research"
//! showcase image "A VR headset on a desk" --size 1024x1024
//! showcase visuals --paper paper.json
//! showcase theme haptics "virtual reality"
//! showcase demo
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

use showcase::app::App;
use showcase::config::{
    clear_config_flags, global_config_path, load_layered_flags, parse_flag_tokens,
    save_config_flags, ConfigFlags,
};
use showcase::demo::{build_sample_page, VisitHost};
use showcase::dom::Document;
use showcase::generation::{api_key_from_env, GenerationClient, ImageOptions, TextOptions};
use showcase::paper::PaperData;
use showcase::visuals::ResearchTheme;

const DEMO_VIEWPORT_HEIGHT: f64 = 800.0;
const DEMO_SECTIONS: usize = 2;

/// Portfolio presentation controller and generation API client
#[derive(Parser, Debug)]
#[command(name = "showcase", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// API key (defaults to OPENAI_API_KEY; never saved)
    #[arg(long, global = true, value_name = "KEY")]
    api_key: Option<String>,

    /// Base URL of the generation API
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Default model for text generation
    #[arg(long, global = true, value_name = "MODEL")]
    text_model: Option<String>,

    /// Default model for image generation
    #[arg(long, global = true, value_name = "MODEL")]
    image_model: Option<String>,

    /// Delay before a closed modal is removed
    #[arg(long, global = true, value_name = "MS")]
    close_delay_ms: Option<u64>,

    /// Simulate a host without intersection observers
    #[arg(long, global = true)]
    no_intersection: bool,

    /// Save current command-line flags as defaults
    #[arg(long, global = true)]
    save: bool,

    /// Clear saved defaults
    #[arg(long, global = true)]
    clear: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate images from a prompt
    Image {
        prompt: String,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        quality: Option<String>,
        #[arg(long)]
        count: Option<u32>,
    },
    /// Generate a chat completion for a prompt
    Text {
        prompt: String,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        max_tokens: Option<u32>,
        #[arg(long)]
        temperature: Option<f64>,
    },
    /// Ask for presentation ideas for a research paper
    Visuals {
        /// JSON file with `title`, `abstract` and optional `keywords`
        #[arg(long, value_name = "FILE", conflicts_with_all = ["title", "abstract_text"])]
        paper: Option<PathBuf>,
        #[arg(long, required_unless_present = "paper")]
        title: Option<String>,
        #[arg(long = "abstract", required_unless_present = "paper")]
        abstract_text: Option<String>,
        #[arg(long = "keyword")]
        keywords: Vec<String>,
    },
    /// Print the research theme and icon for a keyword list
    Theme { keywords: Vec<String> },
    /// Run a scripted visit over a sample page and print the resulting HTML
    Demo,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        load_layered_flags()?
    };
    let effective = file_flags.union(&cli_flags);

    let Some(command) = cli.command else {
        return Ok(());
    };
    let api_key = cli.api_key.or_else(api_key_from_env);
    let client = GenerationClient::from_config(effective.client_config(api_key));

    match command {
        Command::Image {
            prompt,
            model,
            size,
            quality,
            count,
        } => {
            let options = ImageOptions {
                model: model.or_else(|| effective.image_model.clone()),
                size,
                quality,
                count,
            };
            let result = client.generate_image(&prompt, &options).await?;
            print_json(&result)
        }
        Command::Text {
            prompt,
            model,
            max_tokens,
            temperature,
        } => {
            let options = TextOptions {
                model: model.or_else(|| effective.text_model.clone()),
                max_tokens,
                temperature,
            };
            let result = client.generate_text(&prompt, &options).await?;
            print_json(&result)
        }
        Command::Visuals {
            paper,
            title,
            abstract_text,
            keywords,
        } => {
            let paper = match paper {
                Some(path) => read_paper(&path)?,
                None => {
                    let paper = PaperData::new(
                        title.unwrap_or_default(),
                        abstract_text.unwrap_or_default(),
                    );
                    if keywords.is_empty() {
                        paper
                    } else {
                        paper.with_keywords(keywords)
                    }
                }
            };
            let result = client.generate_research_visuals(&paper).await?;
            print_json(&result)
        }
        Command::Theme { keywords } => {
            let theme = ResearchTheme::detect(&keywords);
            println!("{theme}\t{}", theme.icon());
            Ok(())
        }
        Command::Demo => {
            run_demo(&effective);
            Ok(())
        }
    }
}

fn read_paper(path: &Path) -> Result<PaperData> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read paper {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse paper {}", path.display()))
}

fn print_json(value: &Value) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value).context("Failed to format response")?;
    println!("{pretty}");
    Ok(())
}

fn run_demo(flags: &ConfigFlags) {
    let mut document = Document::new().with_capabilities(flags.host_capabilities());
    let page = build_sample_page(&mut document, DEMO_SECTIONS);

    let app = App::new(DEMO_VIEWPORT_HEIGHT).with_options(flags.controller_options());
    let model = app.attach(document);
    let mut host = VisitHost::new(&page, model.now(), app.options().close_delay);
    let model = app.run(model, &mut host);

    println!("{}", model.document.to_html(model.document.body()));
}
