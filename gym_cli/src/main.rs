use clap::{Args, Parser, Subcommand};
use gym_core::config::preferences_path;
use gym_core::progress::exercise_position;
use gym_core::rest::RestBand;
use gym_core::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Sender};
use std::thread;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "gymwiz")]
#[command(about = "Gym machine workout planner and session timer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct ProfileArgs {
    /// Age in years
    #[arg(long)]
    age: u32,

    /// Body weight in kg
    #[arg(long)]
    weight: f64,

    /// Experience level (beginner, intermediate, advanced)
    #[arg(long, default_value = "beginner")]
    experience: Experience,

    /// Training goal (lose_weight, muscle_gain, maintain)
    #[arg(long, default_value = "maintain")]
    goal: Goal,

    /// Machine ids in workout order (repeat or comma-separate)
    #[arg(long = "machine", short = 'm', required = true, value_delimiter = ',')]
    machines: Vec<String>,
}

impl ProfileArgs {
    fn profile(&self) -> UserProfile {
        UserProfile {
            age: self.age,
            weight_kg: self.weight,
            experience: self.experience,
            goal: self.goal,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the available machines
    Machines,

    /// Generate a workout plan without starting it
    Plan {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage per-machine rest-time overrides
    Rest {
        #[command(subcommand)]
        action: RestAction,
    },

    /// Generate a plan and run the workout session
    Start {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Auto-complete (for testing) - complete every set and let rests run out
        #[arg(long)]
        auto_complete: bool,
    },
}

#[derive(Subcommand)]
enum RestAction {
    /// Show stored overrides
    Show,

    /// Set the rest time for a machine
    Set { machine: String, seconds: u32 },

    /// Remove the override for a machine
    Reset { machine: String },

    /// Show the recommended rest for a machine and goal
    Recommend {
        machine: String,

        #[arg(long, default_value = "maintain")]
        goal: Goal,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    gym_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_or_default(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let mut store = JsonFileStore::new(preferences_path(&data_dir));

    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    match cli.command {
        Commands::Machines => cmd_machines(catalog),
        Commands::Plan { profile, json } => cmd_plan(catalog, &store, &profile, json),
        Commands::Rest { action } => cmd_rest(catalog, &mut store, action),
        Commands::Start {
            profile,
            auto_complete,
        } => cmd_start(catalog, &store, &profile, auto_complete, &config),
    }
}

fn cmd_machines(catalog: &Catalog) -> Result<()> {
    println!("{:<16} {:<16} {:<12} {:>10} {:>6}", "ID", "NAME", "PART", "WEIGHT", "REST");
    for machine in catalog.machines() {
        println!(
            "{:<16} {:<16} {:<12} {:>10} {:>6}",
            machine.id,
            machine.name,
            machine.body_part,
            format!(
                "{}-{}kg",
                machine.weight_range.min, machine.weight_range.max
            ),
            format_clock(machine.default_rest_time_seconds as u64)
        );
    }
    Ok(())
}

fn build_plan(
    catalog: &Catalog,
    store: &JsonFileStore,
    args: &ProfileArgs,
) -> Result<Vec<WorkoutPlanEntry>> {
    let overrides = RestTimeOverrides::load(store)?;
    generate_plan(
        catalog,
        &args.profile(),
        args.machines.as_slice(),
        Some(&overrides),
    )
}

fn cmd_plan(
    catalog: &Catalog,
    store: &JsonFileStore,
    args: &ProfileArgs,
    json: bool,
) -> Result<()> {
    let plan = build_plan(catalog, store, args)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        display_plan(&plan);
    }
    Ok(())
}

fn cmd_rest(catalog: &Catalog, store: &mut JsonFileStore, action: RestAction) -> Result<()> {
    match action {
        RestAction::Show => {
            let overrides = RestTimeOverrides::load(store)?;
            if overrides.is_empty() {
                println!("No rest-time overrides set.");
            }
            for (machine_id, seconds) in overrides.iter() {
                println!("  {:<16} {}", machine_id, format_clock(seconds as u64));
            }
        }

        RestAction::Set { machine, seconds } => {
            if !catalog.contains(&machine) {
                return Err(Error::UnknownMachine(machine));
            }
            RestTimeOverrides::update(store, |o| o.set(machine.clone(), seconds))?;
            println!(
                "✓ Rest time for {} set to {} ({})",
                machine,
                format_clock(seconds as u64),
                RestBand::classify(seconds).label()
            );
        }

        RestAction::Reset { machine } => {
            let mut removed = None;
            RestTimeOverrides::update(store, |o| {
                removed = o.remove(&machine);
                Ok(())
            })?;
            match removed {
                Some(_) => println!("✓ Rest time for {} reset to default", machine),
                None => println!("No override stored for {}", machine),
            }
        }

        RestAction::Recommend { machine, goal } => {
            let seconds = recommended_rest_time(catalog, &machine, goal)?;
            println!(
                "Recommended rest for {} ({}): {} ({})",
                machine,
                goal,
                format_clock(seconds as u64),
                RestBand::classify(seconds).label()
            );
        }
    }
    Ok(())
}

fn cmd_start(
    catalog: &Catalog,
    store: &JsonFileStore,
    args: &ProfileArgs,
    auto_complete: bool,
    config: &Config,
) -> Result<()> {
    let plan = build_plan(catalog, store, args)?;
    display_plan(&plan);

    let session = create_session(plan)?
        .with_inter_exercise_rest(config.session.inter_exercise_rest_seconds)?;

    let session = if auto_complete {
        run_auto(session)?
    } else {
        match run_interactive(session, Duration::from_millis(config.session.tick_millis))? {
            Some(session) => session,
            None => {
                println!("\nWorkout abandoned.");
                return Ok(());
            }
        }
    };

    display_summary(&session);
    Ok(())
}

/// Complete every set, letting each rest run down tick by tick
fn run_auto(mut session: WorkoutSession) -> Result<WorkoutSession> {
    display_exercise(&session);
    while !session.is_completed() {
        if session.is_resting() {
            session = session.tick();
            if !session.is_resting() {
                display_exercise(&session);
            }
        } else {
            session = session.complete_set()?;
            display_after_set(&session);
        }
    }
    Ok(session)
}

enum Event {
    Tick,
    Input(String),
    InputClosed,
}

fn spawn_scheduler(tx: Sender<Event>, period: Duration) {
    thread::spawn(move || loop {
        thread::sleep(period);
        if tx.send(Event::Tick).is_err() {
            break;
        }
    });
}

fn spawn_input_reader(tx: Sender<Event>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(Event::Input(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Event::InputClosed);
    });
}

/// Run the session from keyboard input; `None` if the user abandons it
fn run_interactive(
    mut session: WorkoutSession,
    period: Duration,
) -> Result<Option<WorkoutSession>> {
    let (tx, rx) = channel();
    spawn_scheduler(tx.clone(), period);
    spawn_input_reader(tx);

    display_exercise(&session);
    prompt(&session)?;

    for event in rx {
        match event {
            Event::Tick => {
                let was_resting = session.is_resting();
                session = session.tick();
                if was_resting && !session.is_resting() {
                    println!("\n  Rest over!");
                    display_exercise(&session);
                    prompt(&session)?;
                } else if session.is_resting() && !session.is_paused() {
                    print!(
                        "\r  Resting: {} ",
                        format_clock(session.rest_remaining_seconds() as u64)
                    );
                    io::stdout().flush()?;
                }
            }

            Event::Input(line) => {
                match line.trim().to_lowercase().as_str() {
                    "q" => return Ok(None),
                    "p" => {
                        session = session.toggle_pause()?;
                        if session.is_paused() {
                            println!("  ⏸ Paused. 'p' + Enter to resume.");
                        } else {
                            println!("  ▶ Resumed.");
                        }
                    }
                    "s" if session.is_resting() => {
                        session = session.skip_rest()?;
                        display_exercise(&session);
                    }
                    "s" => println!("  Not resting."),
                    "" if session.is_paused() => {
                        println!("  Paused - resume with 'p' first.");
                    }
                    "" if session.is_resting() => {
                        println!("  Still resting - 's' + Enter to skip.");
                    }
                    "" => {
                        session = session.complete_set()?;
                        display_after_set(&session);
                        if session.is_completed() {
                            return Ok(Some(session));
                        }
                        if !session.is_resting() {
                            display_exercise(&session);
                        }
                    }
                    other => println!("  Unknown command '{}'", other),
                }
                prompt(&session)?;
            }

            Event::InputClosed => return Ok(None),
        }
    }

    Ok(None)
}

fn display_plan(plan: &[WorkoutPlanEntry]) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  WORKOUT PLAN");
    println!("╰─────────────────────────────────────────╯");
    println!();

    for (i, entry) in plan.iter().enumerate() {
        println!("  {}. {} ({})", i + 1, entry.machine_name, entry.body_part);
        println!(
            "     → {}kg × {} reps × {} sets, rest {}",
            entry.weight_kg,
            entry.reps,
            entry.sets,
            format_clock(entry.rest_time_seconds as u64)
        );
    }

    println!();
    println!(
        "  Estimated time: ~{} min",
        estimate_duration_minutes(plan)
    );
    println!();
}

fn display_exercise(session: &WorkoutSession) {
    let entry = session.current_exercise();
    let (position, total) = exercise_position(session);
    println!("─────────────────────────────────────────");
    println!(
        "  Exercise {}/{}: {} ({})",
        position, total, entry.machine_name, entry.body_part
    );
    println!(
        "  Set {}/{}: {}kg × {} reps",
        session.current_set(),
        entry.sets,
        entry.weight_kg,
        entry.reps
    );
}

fn display_after_set(session: &WorkoutSession) {
    let progress = compute_progress(session);
    println!(
        "  ✓ Set done. Progress: {}/{} sets ({}%)",
        progress.completed_sets, progress.total_sets, progress.percentage
    );

    match session.rest_kind() {
        Some(RestKind::BetweenSets) => println!(
            "  Rest {} before the next set",
            format_clock(session.rest_remaining_seconds() as u64)
        ),
        Some(RestKind::BetweenExercises) => println!(
            "  Rest {} - next up: {}",
            format_clock(session.rest_remaining_seconds() as u64),
            session.current_exercise().machine_name
        ),
        None => {}
    }
}

fn display_summary(session: &WorkoutSession) {
    let progress = compute_progress(session);
    println!("\n✓ Workout complete!");
    println!("  Sets completed: {}", progress.completed_sets);
    println!("  Total time: {}", format_clock(session.elapsed_seconds()));
    tracing::info!("Session {} finished", session.id());
}

fn prompt(session: &WorkoutSession) -> Result<()> {
    if session.is_resting() {
        println!("  's' + Enter to skip rest, 'p' to pause, 'q' to quit");
    } else {
        println!("  Enter when the set is done, 'p' to pause, 'q' to quit");
    }
    print!("> ");
    io::stdout().flush()?;
    Ok(())
}
