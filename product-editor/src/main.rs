//! catalog-admin: command line front end for the product editor
//!
//! ```text
//! catalog-admin categories
//! catalog-admin submit --draft draft.json --thumbnail mug.png --generate-description
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use product_editor::config::AdminConfig;
use product_editor::error::{exit_status, report};
use product_editor::logger;
use product_editor::{
    EditorConfig, EditorServices, LogNavigator, MediaFile, NavigationPolicy, ProductDraft,
    ProductEditor, Submission,
};

#[derive(Parser, Debug)]
#[command(name = "catalog-admin", version, about = "Catalog admin product tools")]
struct Cli {
    /// Catalog API base URL (overrides CATALOG_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Bearer token (overrides CATALOG_API_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the flattened category tree
    Categories {
        /// Per-level indentation
        #[arg(long, default_value = "  ")]
        indent: String,
    },
    /// Validate a product draft and create or update it
    Submit {
        /// JSON object with the product fields; `_id` selects update
        #[arg(long)]
        draft: PathBuf,

        /// Image to upload and attach as thumbnail
        #[arg(long)]
        thumbnail: Option<PathBuf>,

        /// Ask the assistant for a description before submitting
        #[arg(long)]
        generate_description: bool,

        /// Do not wait for the save before reporting navigation
        #[arg(long)]
        no_wait: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let app = report(err);
            tracing::error!(
                code = %app.code,
                category = app.code.category().name(),
                status = %app.http_status(),
                "{}",
                app.message
            );
            eprintln!("error[{}]: {}", app.code, app.message);
            if let Some(details) = &app.details {
                for (key, value) in details {
                    eprintln!("  {}: {}", key, value);
                }
            }
            ExitCode::from(exit_status(&app))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AdminConfig::from_env();
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if let Some(token) = cli.token {
        config.api_token = Some(token);
    }

    logger::init_logger_with_file(&config.log_level, config.log_json, config.log_dir.as_deref())?;
    tracing::debug!(api_url = %config.api_url, "Starting catalog-admin");

    let client = config
        .client_config()
        .build_client()
        .context("invalid client configuration")?;
    let navigator = Arc::new(LogNavigator::new());
    let services = EditorServices::from_client(client, navigator.clone());

    match cli.command {
        Command::Categories { indent } => {
            let editor = ProductEditor::new(
                EditorConfig::default().with_indent_unit(indent),
                services,
                Arc::new(ProductDraft::empty()),
            );
            editor.refresh_categories().await?;
            for option in editor.category_options() {
                println!("{}\t{}", option.value, option.label);
            }
        }
        Command::Submit {
            draft,
            thumbnail,
            generate_description,
            no_wait,
        } => {
            let text = tokio::fs::read_to_string(&draft)
                .await
                .with_context(|| format!("failed to read {}", draft.display()))?;
            let initial: ProductDraft = serde_json::from_str(&text)
                .with_context(|| format!("{} is not a JSON object", draft.display()))?;

            let policy = if no_wait {
                NavigationPolicy::AfterDispatch
            } else {
                NavigationPolicy::AfterConfirmation
            };
            let editor = ProductEditor::mount(
                EditorConfig::default().with_navigation(policy),
                services,
                Arc::new(initial),
            )
            .await;

            if let Some(path) = thumbnail {
                let file = MediaFile::from_path(&path)
                    .await
                    .with_context(|| format!("failed to read {}", path.display()))?;
                editor.select_thumbnail(file)?;

                let mut progress = editor.subscribe_progress();
                let watcher = tokio::spawn(async move {
                    while progress.changed().await.is_ok() {
                        let value = *progress.borrow_and_update();
                        if value > 0 {
                            tracing::info!(progress = value, "Upload progress");
                        }
                    }
                });
                let uploaded = editor.upload_thumbnail().await;
                watcher.abort();
                let reference = uploaded?;
                println!("thumbnail: {}", reference);
            }

            if generate_description {
                let description = editor.generate_description().await?;
                println!("description: {}", description);
            }

            println!("{}...", editor.submit_label());
            let saved = match editor.submit().await? {
                Submission::Confirmed(saved) => saved,
                Submission::InFlight(handle) => handle.await??,
            };
            if let Some(product) = saved {
                println!("{}", serde_json::to_string_pretty(&product)?);
            }
            if let Some(route) = navigator.last() {
                println!("next: {}", route);
            }
        }
    }

    Ok(())
}
