use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use eyre::Result;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::debug;
use workoutlog::terminal::{CliPosition, StdinConfirmation, TerminalList, TerminalMap};
use workoutlog::{Activity, AppContext, Config, DeleteAll, SqliteStore, WorkoutError, WorkoutInput};

type App = AppContext<SqliteStore, TerminalMap, TerminalList>;

#[derive(Parser)]
#[command(name = "workoutlog")]
#[command(about = "WorkoutLog - record running and cycling workouts on a map")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to the store directory (default: current directory)
    #[arg(short, long, default_value = ".")]
    store_path: PathBuf,

    /// Config file (default: <config dir>/workoutlog/config.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Action(Action),

    /// Read commands from stdin until `quit`; sort state is kept between commands
    Session,
}

#[derive(Subcommand)]
enum Action {
    /// Record a new workout
    Add {
        #[command(subcommand)]
        workout: AddWorkout,
    },

    /// Show all workouts, newest first
    List,

    /// Center the map on a workout
    Show { id: String },

    /// Edit a workout's measurements; omitted values stay as they are
    Update {
        id: String,
        #[arg(long)]
        distance: Option<f64>,
        #[arg(long)]
        duration: Option<f64>,
        /// New cadence (running workouts)
        #[arg(long)]
        cadence: Option<f64>,
        /// New elevation gain (cycling workouts)
        #[arg(long, allow_negative_numbers = true)]
        elevation: Option<f64>,
    },

    /// Delete a workout
    Delete { id: String },

    /// Delete every workout
    Clear {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Cycle the list order: cycling first, running first, original
    Sort,
}

#[derive(Subcommand)]
enum AddWorkout {
    /// A run: distance (km), duration (min), cadence (steps/min)
    Running {
        #[arg(long)]
        distance: f64,
        #[arg(long)]
        duration: f64,
        #[arg(long)]
        cadence: f64,
        #[command(flatten)]
        at: Coords,
    },

    /// A ride: distance (km), duration (min), elevation gain (m)
    Cycling {
        #[arg(long)]
        distance: f64,
        #[arg(long)]
        duration: f64,
        #[arg(long, allow_negative_numbers = true)]
        elevation: f64,
        #[command(flatten)]
        at: Coords,
    },
}

#[derive(Args)]
struct Coords {
    /// Latitude of the workout (default: configured home)
    #[arg(long, allow_negative_numbers = true, requires = "lng")]
    lat: Option<f64>,

    /// Longitude of the workout (default: configured home)
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    lng: Option<f64>,
}

#[derive(Parser)]
#[command(name = "workoutlog", no_binary_name = true)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand)]
enum SessionCommand {
    #[command(flatten)]
    Action(Action),

    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let config = Config::load(cli.config.as_deref())?;
    let store = SqliteStore::open(&cli.store_path)?;
    let mut app: App = AppContext::start(config, store, TerminalMap::new(), TerminalList::new());

    match cli.command {
        Commands::Action(action) => run_action(&mut app, action)?,
        Commands::Session => run_session(&mut app)?,
    }

    Ok(())
}

fn run_session(app: &mut App) -> Result<()> {
    println!("{}", "WorkoutLog session - type `help` for commands, `quit` to leave".dimmed());

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        let parsed = match SessionLine::try_parse_from(words) {
            Ok(p) => p,
            Err(e) => {
                // Help and parse errors are both reported here
                let _ = e.print();
                continue;
            }
        };

        match parsed.command {
            SessionCommand::Quit => break,
            SessionCommand::Action(action) => {
                if let Err(e) = run_action(app, action) {
                    eprintln!("{}", e.to_string().red());
                }
            }
        }
    }

    Ok(())
}

fn run_action(app: &mut App, action: Action) -> Result<(), WorkoutError> {
    match action {
        Action::Add { workout } => {
            let (input, at) = match workout {
                AddWorkout::Running {
                    distance,
                    duration,
                    cadence,
                    at,
                } => (
                    WorkoutInput::Running {
                        distance_km: distance,
                        duration_min: duration,
                        cadence_spm: cadence,
                    },
                    at,
                ),
                AddWorkout::Cycling {
                    distance,
                    duration,
                    elevation,
                    at,
                } => (
                    WorkoutInput::Cycling {
                        distance_km: distance,
                        duration_min: duration,
                        elevation_gain_m: elevation,
                    },
                    at,
                ),
            };

            debug!(kind = %input.kind(), "Adding workout");
            let mut provider = CliPosition::new(at.lat, at.lng, app.config().home);
            let workout = app.new_workout(&mut provider, input)?;
            println!("{}", "Workout recorded".green());
            app.list().print_item(workout.id());
        }
        Action::List => app.list().print(),
        Action::Show { id } => {
            if app.focus(&id).is_some() {
                app.list().print_item(&id);
            }
        }
        Action::Update {
            id,
            distance,
            duration,
            cadence,
            elevation,
        } => {
            let Some(current) = app.collection().find_by_id(&id).cloned() else {
                debug!(id = %id, "update: no such workout");
                return Ok(());
            };

            let kind_value = match current.activity() {
                Activity::Running { cadence_spm } => cadence.unwrap_or(cadence_spm),
                Activity::Cycling { elevation_gain_m } => elevation.unwrap_or(elevation_gain_m),
            };

            let updated = app.update(
                &id,
                distance.unwrap_or(current.distance_km()),
                duration.unwrap_or(current.duration_min()),
                kind_value,
            )?;
            if updated.is_some() {
                println!("{}", "Workout updated".green());
                app.list().print_item(&id);
            }
        }
        Action::Delete { id } => {
            if let Some(removed) = app.delete(&id) {
                println!("Deleted {}", removed.description());
            }
        }
        Action::Clear { yes } => match app.delete_all(&mut StdinConfirmation::new(yes)) {
            DeleteAll::Reloaded => println!("{}", "All workouts deleted".green()),
            DeleteAll::Cancelled => println!("Nothing deleted"),
        },
        Action::Sort => {
            let mode = app.sort();
            println!("{}", format!("Sorted: {}", mode).dimmed());
            app.list().print();
        }
    }

    Ok(())
}
