//! studyplan CLI: study tasks, progress and calendar over a remote task store.

mod render;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use studyplan_core::app::{Planner, PlannerBuilder, SkipReason, WriteOutcome};
use studyplan_core::config::Config;
use studyplan_core::domain::legacy::{LEGACY_SNAPSHOT_KEY, parse_snapshot};
use studyplan_core::domain::{Category, NewTask, Priority, Subject, TaskDate, TaskId};
use studyplan_core::engine::{CategoryFilter, YearMonth};

#[derive(Parser)]
#[command(name = "studyplan", version, about = "Study planner")]
struct Cli {
    /// Configuration file (TOML). Missing file means defaults.
    #[arg(long, global = true, env = "STUDYPLAN_CONFIG", default_value = "studyplan.toml")]
    config: PathBuf,

    /// Owner id issued by the identity provider.
    #[arg(long, global = true)]
    owner: Option<String>,

    /// Session token for the task store.
    #[arg(long, global = true)]
    token: Option<String>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Today's tasks, completion ratios and the focus task.
    Dashboard,

    /// List tasks grouped by category, sorted by date.
    List {
        /// all, theory or exercise.
        #[arg(long, default_value = "all")]
        filter: CategoryFilter,
    },

    /// Create a task.
    Add {
        title: String,

        /// Due date, YYYY-MM-DD.
        #[arg(long)]
        date: String,

        #[arg(long, default_value = "theory")]
        category: Category,

        #[arg(long, default_value = "medium")]
        priority: Priority,

        #[arg(long)]
        subject: Option<String>,
    },

    /// Flip a task between open and completed.
    Toggle { id: String },

    /// Delete a task.
    Delete {
        id: String,

        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Completion statistics overall, per category and for today.
    Progress,

    /// Month view. Defaults to the current month.
    Calendar {
        #[arg(long)]
        year: Option<i32>,

        /// 1-12.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },

    /// Copy tasks from an exported local snapshot into the store.
    ImportLegacy {
        /// JSON array saved under the old local storage key.
        file: PathBuf,
    },
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(&cli.config).into_diagnostic()?.with_env();
    if let Some(owner) = &cli.owner {
        config.session.owner = Some(owner.clone());
    }
    if let Some(token) = &cli.token {
        config.session.token = Some(token.clone());
    }
    Ok(config)
}

fn applied<T>(outcome: WriteOutcome<T>) -> Result<T> {
    match outcome {
        WriteOutcome::Applied(value) => Ok(value),
        WriteOutcome::Skipped(SkipReason::Unauthenticated) => miette::bail!(
            "not signed in: pass --owner and --token (or set STUDYPLAN_OWNER / STUDYPLAN_TOKEN)"
        ),
        WriteOutcome::Skipped(SkipReason::Invalid(reason)) => {
            miette::bail!("task rejected: {reason}")
        }
        WriteOutcome::Skipped(SkipReason::UnknownTask(id)) => miette::bail!("no task with id {id}"),
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush().into_diagnostic()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer).into_diagnostic()?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

async fn run(command: Commands, planner: &Planner, as_json: bool) -> Result<()> {
    match command {
        Commands::Dashboard => {
            let snap = planner.snapshot().await;
            let view = snap.dashboard();
            if as_json {
                return render::json(&view);
            }
            render::dashboard(&view);
        }

        Commands::List { filter } => {
            let snap = planner.snapshot().await;
            let view = snap.schedule(filter);
            if as_json {
                return render::json(&view);
            }
            render::schedule(&view, snap.reference());
        }

        Commands::Add {
            title,
            date,
            category,
            priority,
            subject,
        } => {
            let request = NewTask::new(title, TaskDate::raw(date))
                .category(category)
                .priority(priority)
                .subject(subject.map(Subject::new).unwrap_or_default());
            let created = applied(planner.create(request).await.into_diagnostic()?)?;
            if as_json {
                return render::json(&created);
            }
            let snap = planner.snapshot().await;
            println!("Added {}", render::task_line(&created, snap.reference()));
        }

        Commands::Toggle { id } => {
            let id = TaskId::new(id);
            let completed = applied(planner.toggle(&id).await.into_diagnostic()?)?;
            if as_json {
                return render::json(&serde_json::json!({ "id": id, "completed": completed }));
            }
            let state = if completed { "completed" } else { "open" };
            println!("Task #{id} is now {state}");
        }

        Commands::Delete { id, yes } => {
            let id = TaskId::new(id);
            if !yes {
                let snap = planner.snapshot().await;
                let label = snap
                    .find(&id)
                    .map(|t| format!("'{}'", t.title))
                    .unwrap_or_else(|| format!("#{id}"));
                if !confirm(&format!("Delete {label}?"))? {
                    println!("Cancelled");
                    return Ok(());
                }
            }
            applied(planner.delete(&id).await.into_diagnostic()?)?;
            if as_json {
                return render::json(&serde_json::json!({ "id": id, "deleted": true }));
            }
            println!("Deleted #{id}");
        }

        Commands::Progress => {
            let report = planner.snapshot().await.progress();
            if as_json {
                return render::json(&report);
            }
            render::progress(&report);
        }

        Commands::Calendar { year, month } => {
            let snap = planner.snapshot().await;
            let current = snap.current_month();
            let target = YearMonth::new(
                year.unwrap_or(current.year),
                month.map(|m| m - 1).unwrap_or(current.month),
            );
            let grid = snap.calendar(target);
            if as_json {
                return render::json(&grid);
            }
            render::calendar(&grid, snap.reference());
        }

        Commands::ImportLegacy { file } => {
            let content = std::fs::read_to_string(&file).into_diagnostic()?;
            let import = parse_snapshot(&content).into_diagnostic()?;
            debug!(
                key = LEGACY_SNAPSHOT_KEY,
                entries = import.entries.len(),
                rejected = import.rejected.len(),
                "parsed legacy snapshot"
            );
            let report = planner.import_legacy(import).await.into_diagnostic()?;
            if as_json {
                return render::json(&report);
            }
            render::import_report(&report);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.filter)),
        )
        .init();

    let planner = PlannerBuilder::from_config(&config)
        .into_diagnostic()?
        .build()
        .into_diagnostic()?;
    if planner.owner().is_none() {
        warn!("no owner configured, running signed out");
    }
    planner.refresh().await.into_diagnostic()?;

    run(cli.command, &planner, cli.json).await
}
