use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, BankService, Clock, PreferencesService, QuizService, parse_bank};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::vm::BANK_EXPORT_FILE;
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://qcm.sqlite3";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingFile { command: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidExportDir { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingFile { command } => write!(f, "{command} requires a file path"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidExportDir { raw } => write!(f, "invalid --export-dir value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
    export_dir: PathBuf,
}

impl UiApp for DesktopApp {
    fn bank(&self) -> Arc<BankService> {
        self.services.bank()
    }

    fn preferences(&self) -> Arc<PreferencesService> {
        self.services.preferences()
    }

    fn quiz(&self) -> QuizService {
        self.services.quiz()
    }

    fn export_dir(&self) -> PathBuf {
        self.export_dir.clone()
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  qcm ui          [--db <sqlite_url>] [--export-dir <dir>]");
    eprintln!("  qcm import      <bank.json> [--db <sqlite_url>]");
    eprintln!("  qcm export-bank [<out.json>] [--db <sqlite_url>] [--export-dir <dir>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --export-dir <current directory>");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QCM_DB_URL, QCM_EXPORT_DIR, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Import,
    ExportBank,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "import" => Some(Self::Import),
            "export-bank" => Some(Self::ExportBank),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    export_dir: PathBuf,
    /// Input for `import`, optional output for `export-bank`.
    file: Option<PathBuf>,
}

impl Args {
    fn parse(cmd: Command, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QCM_DB_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut export_dir = std::env::var("QCM_EXPORT_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(current_dir, PathBuf::from);
        let mut file = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--export-dir" => {
                    let value = require_value(args, "--export-dir")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidExportDir { raw: value });
                    }
                    export_dir = PathBuf::from(value);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if !arg.starts_with("--") && cmd != Command::Ui && file.is_none() => {
                    file = Some(PathBuf::from(arg));
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if cmd == Command::Import && file.is_none() {
            return Err(ArgsError::MissingFile { command: "import" });
        }

        Ok(Self {
            db_url,
            export_dir,
            file,
        })
    }
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        current_dir().join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(cmd, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite here so core/services stay storage-agnostic.
    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url, Clock::system()).await?;
    info!(db = %parsed.db_url, ?cmd, "storage ready");

    match cmd {
        Command::Ui => {
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                services,
                export_dir: parsed.export_dir,
            });
            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Entraînement QCM")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Import => {
            let path = parsed
                .file
                .ok_or(ArgsError::MissingFile { command: "import" })?;
            let raw = std::fs::read_to_string(&path)?;
            // `persist` reports storage failures instead of logging them.
            let bank = parse_bank(&raw)?;
            services.bank().persist(&bank).await?;
            println!("imported {} questions from {}", bank.len(), path.display());
            Ok(())
        }
        Command::ExportBank => {
            let bank_service = services.bank();
            let bank = bank_service.load().await?;
            let json = bank_service.export_json(&bank)?;
            let out = parsed
                .file
                .unwrap_or_else(|| parsed.export_dir.join(BANK_EXPORT_FILE));
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&out, json)?;
            println!("exported {} questions to {}", bank.len(), out.display());
            Ok(())
        }
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

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
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(cmd: Command, raw: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = raw.iter().map(|s| (*s).to_string());
        Args::parse(cmd, &mut iter)
    }

    #[test]
    fn relative_sqlite_paths_become_absolute() {
        let url = normalize_sqlite_url("sqlite:data/qcm.sqlite3".into());
        assert!(url.starts_with("sqlite:///"), "{url}");
        assert!(url.ends_with("data/qcm.sqlite3"));
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
    }

    #[test]
    fn import_requires_a_file() {
        let err = parse(Command::Import, &["--db", "sqlite::memory:"]).err();
        assert!(matches!(err, Some(ArgsError::MissingFile { command: "import" })));

        let args = parse(Command::Import, &["bank.json", "--db", "sqlite::memory:"]).unwrap();
        assert_eq!(args.file, Some(PathBuf::from("bank.json")));
        assert_eq!(args.db_url, "sqlite::memory:");
    }

    #[test]
    fn ui_rejects_positional_arguments() {
        let err = parse(Command::Ui, &["stray"]).err();
        assert!(matches!(err, Some(ArgsError::UnknownArg(arg)) if arg == "stray"));
        let err = parse(Command::Ui, &["--export-dir"]).err();
        assert!(matches!(err, Some(ArgsError::MissingValue { flag: "--export-dir" })));
    }
}
