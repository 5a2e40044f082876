use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use exam_core::model::TestId;
use services::{
    CatalogFilter, CatalogService, Clock, FullscreenError, FullscreenPresenter,
    SessionLoopService,
};
use storage::{FixtureSet, Storage};
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

const DEFAULT_LOG_FILTER: &str = "services=info,app=info";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidTestId { raw: String },
    InvalidFixturesDir { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTestId { raw } => write!(f, "invalid --test-id value: {raw:?}"),
            ArgsError::InvalidFixturesDir { raw } => {
                write!(f, "invalid --fixtures value: {raw:?} is not a directory")
            }
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

/// Fullscreen backed by the desktop window.
struct DesktopFullscreen;

impl FullscreenPresenter for DesktopFullscreen {
    fn enter_fullscreen(&self) -> Result<(), FullscreenError> {
        let window = dioxus::desktop::window();
        window.set_fullscreen(true);
        if window.window.fullscreen().is_none() {
            return Err(FullscreenError("window manager refused fullscreen".into()));
        }
        Ok(())
    }

    fn exit_fullscreen(&self) {
        dioxus::desktop::window().set_fullscreen(false);
    }
}

struct DesktopApp {
    session_loop: Arc<SessionLoopService>,
    catalog: Arc<CatalogService>,
    initial_test: Option<TestId>,
}

impl UiApp for DesktopApp {
    fn session_loop(&self) -> Arc<SessionLoopService> {
        Arc::clone(&self.session_loop)
    }

    fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    fn fullscreen(&self) -> Arc<dyn FullscreenPresenter> {
        Arc::new(DesktopFullscreen)
    }

    fn initial_test(&self) -> Option<TestId> {
        self.initial_test.clone()
    }
}

struct Args {
    fixtures_dir: Option<PathBuf>,
    test_id: Option<TestId>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui    [--fixtures <dir>] [--test-id <id>]");
    eprintln!("  cargo run -p app -- check [--fixtures <dir>] [--test-id <id>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  fixtures bundled in the binary, catalog opens on launch");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  EXAM_FIXTURES_DIR, EXAM_TEST_ID, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Check,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "check" => Some(Self::Check),
            _ => None,
        }
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut fixtures_dir = std::env::var("EXAM_FIXTURES_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let mut test_id = std::env::var("EXAM_TEST_ID")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(TestId::new);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--fixtures" => {
                    let value = require_value(args, "--fixtures")?;
                    let path = PathBuf::from(&value);
                    if !path.is_dir() {
                        return Err(ArgsError::InvalidFixturesDir { raw: value });
                    }
                    fixtures_dir = Some(path);
                }
                "--test-id" => {
                    let value = require_value(args, "--test-id")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidTestId { raw: value });
                    }
                    test_id = Some(TestId::new(value.trim()));
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            fixtures_dir,
            test_id,
        })
    }
}

fn load_fixtures(dir: Option<&PathBuf>) -> Result<FixtureSet, Box<dyn std::error::Error>> {
    let fixtures = match dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "loading fixtures");
            FixtureSet::from_dir(dir)?
        }
        None => FixtureSet::bundled()?,
    };
    Ok(fixtures)
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn check(
    fixtures: &FixtureSet,
    catalog: &CatalogService,
    test_id: Option<&TestId>,
) -> Result<(), Box<dyn std::error::Error>> {
    let tests = catalog.list(&CatalogFilter::default()).await?;
    println!(
        "fixtures ok: {} tests, {} questions",
        tests.len(),
        fixtures.question_count()
    );
    for test in &tests {
        let loaded = fixtures.questions.get(test.id()).map_or(0, Vec::len);
        println!(
            "  {:<16} {:<36} {:>3} min  {}/{} questions",
            test.id().as_str(),
            test.title(),
            test.duration_minutes(),
            loaded,
            test.total_questions()
        );
        if loaded == 0 {
            tracing::warn!(test_id = %test.id(), "test has no questions and cannot be started");
        }
    }
    if let Some(test_id) = test_id {
        let test = catalog.get(test_id).await?;
        println!("test {test_id} found: {}", test.title());
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

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
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing();

    let fixtures = load_fixtures(parsed.fixtures_dir.as_ref())?;
    let storage = Storage::from_fixtures(fixtures.clone());
    let catalog = Arc::new(CatalogService::new(Arc::clone(&storage.tests)));

    match cmd {
        Command::Check => check(&fixtures, &catalog, parsed.test_id.as_ref()).await,
        Command::Ui => {
            if let Some(test_id) = parsed.test_id.as_ref() {
                catalog.get(test_id).await?;
            }

            let session_loop = Arc::new(SessionLoopService::new(
                Clock::default_clock(),
                Arc::clone(&storage.tests),
                Arc::clone(&storage.questions),
            ));
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                session_loop,
                catalog,
                initial_test: parsed.test_id,
            });
            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Mock Tests")
                    .with_always_on_top(false),
            );

            tracing::info!("launching desktop shell");
            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
