use anyhow::{bail, Context, Result}; // Use anyhow for easy error handling in the binary
use arboard::Clipboard;
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use drivetree_lib::{
    archive_first_file, list_tree, render, ArchiveOutcome, DriveClient, ExportClient,
    StorageClient,
};
use log::{debug, info, warn, LevelFilter};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

mod config_loader;

use config_loader::{build_run_settings, RunSettings};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Lists a cloud drive as a folder tree, uploads, deletes and archives files.",
    long_about = "Drivetree fetches up to one page (1000 items) of your Drive listing, rebuilds the folder tree from each file's parent ids, and prints it folders-first.\n\nIt needs an OAuth access token with Drive scope, passed via --token or DRIVETREE_ACCESS_TOKEN. Listing can also run offline against a saved files.list response with `list --from-json`."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// OAuth access token used as a bearer token for Drive API calls.
    #[arg(long, global = true, env = "DRIVETREE_ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Use a specific config file (applied after the global config).
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,

    /// Skip loading any config files.
    #[arg(long, global = true)]
    no_config: bool,

    /// Override the Drive API base URL.
    #[arg(long, value_name = "URL", global = true)]
    api_base: Option<String>,

    /// Number of items fetched per listing (1-1000).
    #[arg(long, value_name = "N", global = true)]
    page_size: Option<u32>,

    /// Enable verbose output. Use -v for info, -vv for debug, -vvv for trace.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the drive as an indented folder tree.
    List {
        /// Read a saved files.list JSON response instead of calling the API.
        #[arg(long, value_name = "FILE")]
        from_json: Option<PathBuf>,

        /// Write the tree to a file instead of stdout.
        #[arg(short = 'o', long, conflicts_with = "clipboard")]
        output: Option<PathBuf>,

        /// Copy the tree to the system clipboard instead of stdout or a file.
        #[arg(short = 'c', long, conflicts_with = "output")]
        clipboard: bool,

        /// Maximum number of name characters shown per line.
        #[arg(long, value_name = "N")]
        name_width: Option<usize>,

        /// Sort names case-insensitively within folders and files.
        #[arg(long)]
        ignore_case: bool,
    },

    /// Upload a local file to the root of the drive.
    Upload {
        path: PathBuf,

        /// MIME type sent with the upload.
        #[arg(long, default_value = "application/octet-stream")]
        mime: String,
    },

    /// Delete a file by id.
    Delete {
        file_id: String,

        /// Do not ask for confirmation.
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Move the first file that has a parent folder into the archive folder.
    Archive {
        /// Name of the root-level archive folder.
        #[arg(long, value_name = "NAME")]
        folder: Option<String>,
    },

    /// Show the signed-in user.
    Whoami,
}

#[cfg(test)]
impl Cli {
    /// A `whoami` invocation with every global option left unset.
    fn test_default() -> Self {
        Self {
            command: Command::Whoami,
            token: None,
            config_path: None,
            no_config: false,
            api_base: None,
            page_size: None,
            verbose: 0,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // --- Initialize Logging ---
    let log_level = match cli.verbose {
        0 => LevelFilter::Warn,  // Default: Show warnings and errors
        1 => LevelFilter::Info,  // -v: Show info, warnings, errors
        2 => LevelFilter::Debug, // -vv: Show debug, info, warnings, errors
        _ => LevelFilter::Trace, // -vvv and more: Show everything
    };

    env_logger::Builder::new().filter_level(log_level).init();

    info!("Log level set to: {}", log_level);
    debug!("Parsed command: {:?}", cli.command);

    let settings = build_run_settings(&cli)?;

    match &cli.command {
        Command::List {
            from_json,
            output,
            clipboard,
            ..
        } => {
            let client: Box<dyn StorageClient> = match from_json {
                Some(path) => Box::new(ExportClient::new(path)),
                None => Box::new(drive_client(&settings)?),
            };
            run_list(client.as_ref(), &settings, output.as_ref(), *clipboard)
        }
        Command::Upload { path, mime } => {
            let client = drive_client(&settings)?;
            let uploaded = client
                .upload_file(path, mime)
                .with_context(|| format!("Failed to upload {:?}", path))?;
            println!(
                "Successfully uploaded! Name: {} | ID: {}",
                uploaded.name, uploaded.id
            );
            Ok(())
        }
        Command::Delete { file_id, yes } => {
            let file_id = file_id.trim();
            if file_id.is_empty() {
                bail!("Please provide a non-empty file ID");
            }
            if !*yes && !confirm_delete(file_id)? {
                info!("Deletion of {} cancelled", file_id);
                return Ok(());
            }
            let client = drive_client(&settings)?;
            client
                .delete_file(file_id)
                .with_context(|| format!("Failed to delete file {}", file_id))?;
            println!("Successfully deleted file {}", file_id);
            Ok(())
        }
        Command::Archive { .. } => {
            let client = drive_client(&settings)?;
            let outcome = archive_first_file(
                &client,
                &settings.config.archive_folder,
                settings.config.page_size,
            )
            .context("Archive run failed")?;
            report_archive(&outcome, &settings.config.archive_folder);
            Ok(())
        }
        Command::Whoami => {
            let client = drive_client(&settings)?;
            let user = client.current_user().context("Failed to fetch user info")?;
            println!("Logged in as: {}", user.as_deref().unwrap_or("Unknown User"));
            Ok(())
        }
    }
}

fn drive_client(settings: &RunSettings) -> Result<DriveClient> {
    let Some(token) = settings.token.as_deref() else {
        bail!("No access token. Pass --token or set DRIVETREE_ACCESS_TOKEN.");
    };
    DriveClient::new(&settings.config, token).context("Failed to set up the Drive client")
}

fn run_list(
    client: &dyn StorageClient,
    settings: &RunSettings,
    output: Option<&PathBuf>,
    clipboard: bool,
) -> Result<()> {
    let forest = list_tree(client, &settings.config);

    let mut tree_text = String::new();
    for line in render(&forest, settings.config.render) {
        tree_text.push_str(&line.to_string());
        tree_text.push('\n');
    }

    if tree_text.is_empty() {
        warn!("Nothing to display: no files found or error during fetch.");
        return Ok(());
    }

    // --- Handle Output ---
    if clipboard {
        info!("Copying tree to clipboard...");
        let mut clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        clipboard
            .set_text(tree_text)
            .context("Failed to copy tree to clipboard")?;
        info!("Successfully copied tree to clipboard.");
    } else if let Some(output_path) = output {
        info!("Writing tree to file: {:?}", output_path);
        let mut file = File::create(output_path)
            .with_context(|| format!("Failed to create output file: {:?}", output_path))?;
        file.write_all(tree_text.as_bytes())
            .with_context(|| format!("Failed to write tree to file: {:?}", output_path))?;
        info!("Successfully wrote tree to {:?}", output_path);
    } else {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(tree_text.as_bytes())
            .context("Failed to write tree to stdout")?;
        stdout.flush().context("Failed to flush stdout")?;
    }

    Ok(())
}

fn confirm_delete(file_id: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(format!("Are you sure you want to delete file ID: {}?", file_id))
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

fn report_archive(outcome: &ArchiveOutcome, folder_name: &str) {
    match outcome {
        ArchiveOutcome::NoCandidate => {
            println!("No suitable file found to archive. Please upload a file first.");
        }
        ArchiveOutcome::AlreadyArchived { file_name, .. } => {
            println!(
                "'{}' is already in the target folder ({}). Skipping move.",
                file_name, folder_name
            );
        }
        ArchiveOutcome::Moved {
            file_id,
            file_name,
            folder_id,
            previous_parents,
        } => {
            debug!("Removed previous parents of {}: {:?}", file_id, previous_parents);
            println!(
                "Moved '{}' into {} (folder ID: {})",
                file_name, folder_name, folder_id
            );
        }
    }
}
