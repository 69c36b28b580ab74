//! snaptag CLI - batch keyword generation for images.

mod keys;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use snaptag_core::config::resolve_env_var;
use snaptag_core::{
    language, provider, BatchOptions, BatchRunner, Config, FileDiscovery, ImageReport,
    KeywordGenerator, KeywordStore,
};
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Parser)]
#[command(name = "snaptag")]
#[command(author, version, about = "Generate keywords for images using vision LLMs")]
struct Cli {
    /// Image file or directory to process
    input: PathBuf,

    /// Directory to save keyword files
    #[arg(short, long)]
    output_dir: PathBuf,

    /// Model identifier (e.g. llava, lmstudio:qwen2-vl, gpt-4o, gemini-1.5-pro).
    /// Defaults to the model from the previous run.
    #[arg(short, long)]
    model: Option<String>,

    /// Languages for keyword generation (e.g. en dk vi)
    #[arg(short, long, num_args = 1.., default_values = ["en"])]
    languages: Vec<String>,

    /// Append to existing keyword files instead of replacing them
    #[arg(short, long)]
    append: bool,

    /// Embed generated keywords into the images' own metadata
    #[arg(long)]
    embed: bool,

    /// Restrict embedding to these languages (defaults to all requested)
    #[arg(long, num_args = 1.., requires = "embed")]
    embed_languages: Option<Vec<String>>,

    /// OpenAI API key (saved to config for future runs)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_key: Option<String>,

    /// Google AI API key (saved to config for future runs)
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    google_key: Option<String>,

    /// Number of images processed concurrently (default from config)
    #[arg(short, long)]
    parallel: Option<usize>,

    /// Path to config file (default: platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(Config::default_path);

    // Load configuration (fall back to defaults on error)
    let mut config = if config_path.exists() {
        Config::load_from(&config_path).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config: {e}. Using defaults.");
            Config::default()
        })
    } else {
        Config::default()
    };

    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    // Keys given on the command line win over the config file, and are
    // persisted so the next run doesn't need them again.
    if let Some(key) = &cli.openai_key {
        config.llm.openai_api_key = key.clone();
        if let Err(e) = keys::save_api_key(&config_path, "openai", key) {
            tracing::warn!("Could not persist OpenAI key: {e}");
        }
    }
    if let Some(key) = &cli.google_key {
        config.llm.google_api_key = key.clone();
        if let Err(e) = keys::save_api_key(&config_path, "google", key) {
            tracing::warn!("Could not persist Google key: {e}");
        }
    }

    let model_id = cli
        .model
        .clone()
        .unwrap_or_else(|| config.llm.last_model.clone());
    if model_id != config.llm.last_model {
        if let Err(e) = keys::save_last_model(&config_path, &model_id) {
            tracing::warn!("Could not persist model choice: {e}");
        }
    }

    for lang in &cli.languages {
        if !language::is_supported(lang) {
            tracing::warn!(
                "Language '{lang}' has no display name; translation prompts may be degraded"
            );
        }
    }

    // Resolve provider and build the wire client
    let provider_cfg = provider::resolve(&model_id, &config.llm);
    tracing::info!(
        model = %provider_cfg.model,
        kind = ?provider_cfg.kind,
        endpoint = %provider_cfg.endpoint,
        "Resolved provider"
    );

    let token = match provider_cfg.kind.token_name() {
        Some("openai") => resolve_env_var(&config.llm.openai_api_key),
        Some("google") => resolve_env_var(&config.llm.google_api_key),
        _ => None,
    };
    let model = provider::create_model(&provider_cfg, token.as_deref())
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    // Discover input images
    let input = expand_path(&cli.input);
    let discovery = FileDiscovery::new(config.processing.clone());
    let images = discovery.discover(&input);
    if images.is_empty() {
        anyhow::bail!("No supported images found at {}", input.display());
    }
    println!("Found {} image(s) to process", images.len());

    let output_dir = expand_path(&cli.output_dir);
    let store = KeywordStore::new(&output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let generator = KeywordGenerator::new(model, config.llm.max_tokens);
    let options = BatchOptions {
        parallel: cli.parallel.unwrap_or(config.processing.parallel_workers),
        languages: cli.languages.clone(),
        append: cli.append,
        embed_languages: if cli.embed {
            Some(
                cli.embed_languages
                    .clone()
                    .unwrap_or_else(|| cli.languages.clone()),
            )
        } else {
            None
        },
    };
    let runner = BatchRunner::new(generator, store, options);

    let progress = create_progress_bar(images.len() as u64);
    let printer = ReportPrinter {
        progress: progress.clone(),
        quiet: cli.json_logs,
        languages: cli.languages.clone(),
        failures: Mutex::new(Vec::new()),
    };
    let printer = std::sync::Arc::new(printer);
    let printer_cb = printer.clone();

    let (succeeded, failed) = runner
        .run(&images, move |report| printer_cb.print(report))
        .await;

    progress.finish_and_clear();

    println!("\nDone: {succeeded} succeeded, {failed} failed");
    for line in printer.failures.lock().unwrap_or_else(|p| p.into_inner()).iter() {
        println!("  {line}");
    }

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Streams per-image results under the progress bar as they complete.
struct ReportPrinter {
    progress: ProgressBar,
    quiet: bool,
    languages: Vec<String>,
    failures: Mutex<Vec<String>>,
}

impl ReportPrinter {
    fn print(&self, report: ImageReport) {
        self.progress.inc(1);
        let name = report.path.display();
        if !self.quiet {
            self.progress.println(format!("Processing: {name}"));
            for lang in &self.languages {
                if let Some(kws) = report.keywords.get(lang) {
                    self.progress
                        .println(format!("  keywords ({lang}): {}", kws.join(", ")));
                }
            }
            if let Some(embedded) = report.embedded {
                if !embedded {
                    self.progress
                        .println(format!("  embed skipped (unsupported format): {name}"));
                }
            }
        }
        if !report.is_success() {
            let mut failures = self.failures.lock().unwrap_or_else(|p| p.into_inner());
            if report.errors.is_empty() {
                failures.push(format!("{name}: embedding failed"));
            } else {
                failures.push(format!("{name}: {}", report.errors.join("; ")));
            }
        }
    }
}

/// Expand ~ and environment variables in user-supplied paths.
fn expand_path(path: &std::path::Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).into_owned())
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_cli_parses_minimal() {
        let cli = Cli::try_parse_from(["snaptag", "./photos", "--output-dir", "./out"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("./photos"));
        assert_eq!(cli.languages, vec!["en"]);
        assert!(!cli.append);
        assert!(cli.model.is_none());
    }

    #[test]
    fn test_cli_parses_full() {
        let cli = Cli::try_parse_from([
            "snaptag",
            "./photos",
            "-o",
            "./out",
            "-m",
            "lmstudio:qwen2-vl",
            "-l",
            "en",
            "dk",
            "vi",
            "--append",
            "--embed",
            "--embed-languages",
            "en",
            "--parallel",
            "4",
        ])
        .unwrap();
        assert_eq!(cli.languages, vec!["en", "dk", "vi"]);
        assert!(cli.append);
        assert!(cli.embed);
        assert_eq!(cli.embed_languages, Some(vec!["en".to_string()]));
        assert_eq!(cli.parallel, Some(4));
    }

    #[test]
    fn test_embed_languages_requires_embed() {
        let result =
            Cli::try_parse_from(["snaptag", "./p", "-o", "./out", "--embed-languages", "en"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_expand_path_plain() {
        assert_eq!(expand_path(Path::new("/a/b")), PathBuf::from("/a/b"));
    }
}
