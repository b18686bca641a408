use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use services::{AppServices, Clock, ResetConfirmation};
use tracing_subscriber::EnvFilter;
use workbook_core::model::{ComponentId, FieldUpdate, ImageData, ImageError, SystemId, TextField};
use workbook_core::snapshot::EXPORT_FILE_NAME;

mod render;

#[derive(Parser)]
#[command(name = "brake-workbook")]
#[command(about = "Photograph and describe brake components, and track what is done")]
struct Cli {
    /// SQLite database holding saved progress
    #[arg(
        long,
        env = "WORKBOOK_DB_URL",
        default_value = "sqlite://workbook.sqlite3",
        global = true
    )]
    db: String,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List components with their completion marks
    List {
        /// Only this system (disc or drum)
        #[arg(long)]
        system: Option<SystemId>,
    },
    /// Show notes, photo status, and hints for one component
    Show { system: SystemId, component: String },
    /// Write a note field (visual, function, or operation)
    Set {
        system: SystemId,
        component: String,
        field: TextField,
        text: String,
    },
    /// Attach a photo from an image file or a `data:` URL
    Image {
        system: SystemId,
        component: String,
        #[arg(value_parser = parse_photo)]
        photo: Photo,
    },
    /// Remove the photo from a component
    RemoveImage { system: SystemId, component: String },
    /// Fill empty note fields from the reference text (needs a photo)
    Autofill { system: SystemId, component: String },
    /// Per-system progress summary
    Progress,
    /// Write all progress to a JSON file
    Export {
        #[arg(long, default_value = EXPORT_FILE_NAME)]
        out: PathBuf,
    },
    /// Delete all progress
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Photo argument of `image`: a file to read, or a pasted data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Photo {
    File(PathBuf),
    Embedded(ImageData),
}

fn parse_photo(raw: &str) -> Result<Photo, ImageError> {
    if raw.starts_with("data:") {
        ImageData::from_data_url(raw).map(Photo::Embedded)
    } else if raw.trim().is_empty() {
        Err(ImageError::Empty)
    } else {
        Ok(Photo::File(PathBuf::from(raw)))
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let db_url = normalize_sqlite_url(&cli.db);
    prepare_sqlite_file(&db_url)?;
    tracing::info!(db = %db_url, "opening progress database");
    let services = AppServices::new_sqlite(&db_url, Clock::system())
        .await
        .with_context(|| format!("opening {db_url}"))?;
    let progress = services.progress();
    let mut out = io::stdout().lock();

    match cli.command {
        Command::List { system } => {
            let systems = system.map_or_else(|| SystemId::ALL.to_vec(), |s| vec![s]);
            for system in systems {
                let summary = progress.progress(system).await;
                let store = progress.snapshot().await;
                render::system_listing(&mut out, progress.catalog(), &store, &summary)?;
            }
        }
        Command::Show { system, component } => {
            let component = ComponentId::new(component);
            let definition = progress
                .catalog()
                .definition(system, &component)
                .with_context(|| format!("no component `{component}` in the {system} system"))?;
            let record = progress.get(system, &component).await;
            render::component_detail(&mut out, definition, &record)?;
        }
        Command::Set {
            system,
            component,
            field,
            text,
        } => {
            let record = progress
                .set_text(system, &ComponentId::new(component), field, text)
                .await?;
            render::status_line(&mut out, &record)?;
        }
        Command::Image {
            system,
            component,
            photo,
        } => {
            let component = ComponentId::new(component);
            let record = match photo {
                Photo::File(path) => {
                    progress
                        .attach_image_file(system, &component, &path)
                        .await?
                }
                Photo::Embedded(image) => {
                    progress
                        .update(system, &component, FieldUpdate::Image(Some(image)))
                        .await?
                }
            };
            render::status_line(&mut out, &record)?;
        }
        Command::RemoveImage { system, component } => {
            let record = progress
                .remove_image(system, &ComponentId::new(component))
                .await?;
            render::status_line(&mut out, &record)?;
        }
        Command::Autofill { system, component } => {
            let component = ComponentId::new(component);
            let before = progress.get(system, &component).await;
            let record = progress.auto_fill(system, &component).await?;
            let filled: Vec<&str> = TextField::ALL
                .iter()
                .filter(|field| before.text(**field).is_empty())
                .map(|field| field.label())
                .collect();
            if filled.is_empty() {
                writeln!(out, "nothing to fill; all notes already written")?;
            } else {
                writeln!(out, "filled: {}", filled.join(", "))?;
            }
            render::status_line(&mut out, &record)?;
        }
        Command::Progress => {
            for summary in progress.overview().await {
                render::summary_line(&mut out, &summary)?;
            }
        }
        Command::Export { out: path } => {
            let written = progress.export_to_file(&path).await?;
            writeln!(out, "exported to {}", written.display())?;
        }
        Command::Reset { yes } => {
            let confirmation = if yes {
                Some(ResetConfirmation::assume_yes())
            } else {
                ask_reset_confirmation()?
            };
            match confirmation {
                Some(confirmed) => {
                    progress.reset(confirmed).await?;
                    writeln!(out, "progress reset")?;
                }
                None => writeln!(out, "reset cancelled")?,
            }
        }
    }

    Ok(())
}

fn ask_reset_confirmation() -> io::Result<Option<ResetConfirmation>> {
    let mut stderr = io::stderr();
    write!(stderr, "{} [y/N] ", ResetConfirmation::PROMPT)?;
    stderr.flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(ResetConfirmation::from_answer(&answer))
}

fn normalize_sqlite_url(raw: &str) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw.to_string();
    }

    let trimmed = raw.trim();
    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> anyhow::Result<()> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .with_context(|| format!("invalid --db value: {db_url}"))?;
    let path = path.split('?').next().unwrap_or(path);
    anyhow::ensure!(!path.is_empty(), "invalid --db value: {db_url}");

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("error: {err:#}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_url_is_untouched() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
    }

    #[test]
    fn relative_path_becomes_absolute_url() {
        let url = normalize_sqlite_url("sqlite:data/progress.sqlite3");
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/progress.sqlite3"));
    }

    #[test]
    fn cli_parses_set_command() {
        let cli = Cli::try_parse_from([
            "brake-workbook",
            "set",
            "disc",
            "brake-disc",
            "function",
            "it stops the car",
        ])
        .unwrap();
        match cli.command {
            Command::Set {
                system,
                component,
                field,
                text,
            } => {
                assert_eq!(system, SystemId::Disc);
                assert_eq!(component, "brake-disc");
                assert_eq!(field, TextField::Function);
                assert_eq!(text, "it stops the car");
            }
            _ => panic!("expected set"),
        }
    }

    #[test]
    fn cli_rejects_unknown_system() {
        assert!(Cli::try_parse_from(["brake-workbook", "show", "abs", "pump"]).is_err());
    }

    #[test]
    fn photo_argument_accepts_path_or_data_url() {
        assert_eq!(
            parse_photo("shots/caliper.png"),
            Ok(Photo::File(PathBuf::from("shots/caliper.png")))
        );
        match parse_photo("data:image/png;base64,YWJj") {
            Ok(Photo::Embedded(image)) => assert_eq!(image.media_type(), Some("image/png")),
            other => panic!("expected embedded photo, got {other:?}"),
        }
        assert_eq!(parse_photo(""), Err(ImageError::Empty));
    }

    #[test]
    fn cli_rejects_blank_photo() {
        let parsed = Cli::try_parse_from(["brake-workbook", "image", "disc", "brake-disc", " "]);
        assert!(parsed.is_err());
    }

    #[test]
    fn export_defaults_to_standard_file_name() {
        let cli = Cli::try_parse_from(["brake-workbook", "export"]).unwrap();
        match cli.command {
            Command::Export { out } => assert_eq!(out, PathBuf::from(EXPORT_FILE_NAME)),
            _ => panic!("expected export"),
        }
    }
}
