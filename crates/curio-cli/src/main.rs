//! Curio CLI: installs a fresh database and ingests files into storage.
//!
//! Configuration comes from the environment (and `.env`); see
//! `curio_core::Config::from_env`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use curio_cli::{init_tracing, render_result, InstallOptions};
use curio_core::Config;
use curio_install::{InstallContext, InstallationManager};
use curio_media::{FileServices, ImageThumbnailManager, StorableFile};
use curio_storage::create_file_store;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "curio", about = "Curio installer and file ingestion")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install Curio into an empty database
    Install {
        /// Display name of the first administrator
        #[arg(long)]
        admin_name: String,
        /// Email address of the first administrator
        #[arg(long)]
        admin_email: String,
        /// Password of the first administrator
        #[arg(long)]
        admin_password: String,
        /// Installation title
        #[arg(long)]
        title: String,
        /// Installation time zone
        #[arg(long, default_value = "UTC")]
        time_zone: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Store a local file and its thumbnails
    Ingest {
        /// Path to the file to ingest
        file: PathBuf,
        /// Original filename, if different from the file's own name
        #[arg(long)]
        name: Option<String>,
        /// Skip thumbnail generation
        #[arg(long)]
        no_thumbnails: bool,
    },
}

#[derive(Serialize)]
struct IngestOutput {
    storage_id: String,
    storage_path: String,
    uri: String,
    media_type: String,
    thumbnails: bool,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

async fn install(config: Config, options: InstallOptions, json: bool) -> anyhow::Result<ExitCode> {
    let pool = curio_db::connect_lazy(&config)?;
    let context = Arc::new(InstallContext::new(Arc::new(config), pool));

    let mut manager = InstallationManager::with_default_tasks(context)?;
    for (id, vars) in options.task_vars() {
        manager.register_vars(id, vars);
    }

    let result = manager.install().await;

    if json {
        print_json(&result)?;
    } else {
        println!("{}", render_result(&result));
    }

    Ok(if result.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

async fn ingest(
    config: Config,
    file: &Path,
    name: Option<String>,
    no_thumbnails: bool,
) -> anyhow::Result<()> {
    let original_name = match name {
        Some(name) => name,
        None => file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .context("The file path has no file name; pass --name")?,
    };

    let store = create_file_store(&config)
        .await
        .context("Failed to initialize storage")?;
    let thumbnails = Arc::new(ImageThumbnailManager::new(
        store.clone(),
        config.thumbnail_sizes,
        &config.temp_dir,
    ));
    let services = FileServices {
        store: store.clone(),
        thumbnails,
        media_types: Arc::new(config.media_type_map()?),
    };

    let mut storable = StorableFile::new(services, &config.temp_dir);
    let outcome = store_file(&mut storable, file, &original_name, no_thumbnails).await;
    storable.delete().context("Failed to delete the temporary copy")?;
    let (storage_path, media_type, thumbnails) = outcome?;

    print_json(&IngestOutput {
        storage_id: storable.storage_base_name(),
        uri: store.uri(&storage_path),
        storage_path,
        media_type,
        thumbnails,
    })
}

async fn store_file(
    storable: &mut StorableFile,
    file: &Path,
    original_name: &str,
    no_thumbnails: bool,
) -> anyhow::Result<(String, String, bool)> {
    storable
        .copy_from(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let media_type = storable.media_type().await?;
    let storage_path = storable.store_original(original_name).await?;
    let thumbnails = if no_thumbnails {
        false
    } else {
        storable.store_thumbnails().await?
    };
    Ok((storage_path, media_type, thumbnails))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate()?;

    match cli.command {
        Commands::Install {
            admin_name,
            admin_email,
            admin_password,
            title,
            time_zone,
            json,
        } => {
            let options = InstallOptions {
                admin_name,
                admin_email,
                admin_password,
                title,
                time_zone,
            };
            install(config, options, json).await
        }
        Commands::Ingest {
            file,
            name,
            no_thumbnails,
        } => {
            ingest(config, &file, name, no_thumbnails).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
