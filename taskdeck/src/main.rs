//! TaskDeck client CLI -- exercises the task store from the terminal.
//!
//! Each invocation runs one store operation to completion: the remote task
//! service is tried first and the on-device fallback blob answers when it
//! is unreachable. The refreshed collection is printed after mutations.
//!
//! # Usage
//!
//! ```bash
//! taskdeck                 # dashboard: recent tasks plus statistics
//! taskdeck add "Buy milk" --priority low --category shopping
//! taskdeck list --category shopping
//! taskdeck toggle <id>
//! taskdeck delete <id> --yes
//! taskdeck stats
//! ```

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::Parser;

use taskdeck::api::RemoteApi;
use taskdeck::config::{ClientCliArgs, ClientConfig};
use taskdeck::fallback::FallbackStore;
use taskdeck::store::{ActiveView, StoreError, TaskStore};
use taskdeck_proto::stats::TaskStats;
use taskdeck_proto::task::{Category, NewTask, Priority, Task, TaskId, TaskPatch};

#[derive(clap::Parser, Debug)]
#[command(version, about = "TaskDeck task tracker")]
struct Cli {
    #[command(flatten)]
    config: ClientCliArgs,

    /// With no subcommand, shows the dashboard: recent tasks plus stats.
    #[command(subcommand)]
    command: Option<Command>,
}

/// How many tasks the dashboard shows.
const DASHBOARD_RECENT: usize = 5;

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// List tasks, optionally narrowed by category or priority.
    List {
        /// Only tasks in this category.
        #[arg(long)]
        category: Option<Category>,
        /// Only tasks at this priority.
        #[arg(long)]
        priority: Option<Priority>,
    },
    /// Add a task.
    Add {
        /// Task title.
        title: String,
        /// Free-form detail.
        #[arg(long)]
        description: Option<String>,
        /// Task priority.
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Task category.
        #[arg(long, default_value = "other")]
        category: Category,
        /// Due date, as YYYY-MM-DD or RFC3339.
        #[arg(long)]
        deadline: Option<String>,
    },
    /// Update fields of an existing task.
    Update {
        /// Id of the task to update.
        id: TaskId,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        /// New description.
        #[arg(long)]
        description: Option<String>,
        /// New priority.
        #[arg(long)]
        priority: Option<Priority>,
        /// New category.
        #[arg(long)]
        category: Option<Category>,
        /// New completion flag.
        #[arg(long)]
        completed: Option<bool>,
        /// New due date, as YYYY-MM-DD or RFC3339.
        #[arg(long)]
        deadline: Option<String>,
    },
    /// Flip a task between pending and completed.
    Toggle {
        /// Id of the task to toggle.
        id: TaskId,
    },
    /// Delete a task permanently. Requires `--yes`.
    Delete {
        /// Id of the task to delete.
        id: TaskId,
        /// Confirm the deletion; there is no undo.
        #[arg(long)]
        yes: bool,
    },
    /// Show aggregate statistics.
    Stats,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ClientConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let api = match RemoteApi::new(&config.api_url, config.request_timeout) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("Error building API client: {e}");
            std::process::exit(1);
        }
    };
    let mut store = TaskStore::new(api, FallbackStore::new(config.fallback_path));

    if let Err(e) = run(cli.command, &mut store).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Executes one subcommand against the store; no subcommand means the
/// dashboard.
async fn run(command: Option<Command>, store: &mut TaskStore) -> Result<(), StoreError> {
    let Some(command) = command else {
        store.set_view(ActiveView::Dashboard);
        store.load().await;
        let tasks = store.tasks();
        print_tasks(&tasks[..tasks.len().min(DASHBOARD_RECENT)]);
        print_stats(&store.stats().await);
        return Ok(());
    };

    match command {
        Command::List { category, priority } => {
            store.set_view(ActiveView::AllTasks);
            store.load().await;
            match (category, priority) {
                (Some(category), _) => print_task_refs(&store.tasks_by_category(category)),
                (None, Some(priority)) => print_task_refs(&store.tasks_by_priority(priority)),
                (None, None) => print_tasks(store.tasks()),
            }
        }
        Command::Add {
            title,
            description,
            priority,
            category,
            deadline,
        } => {
            let deadline = parse_deadline(deadline.as_deref())?;
            let task = store
                .add(NewTask {
                    title,
                    description,
                    priority,
                    category,
                    completed: false,
                    deadline,
                })
                .await?;
            println!("Added {}", task.id);
            print_tasks(store.tasks());
        }
        Command::Update {
            id,
            title,
            description,
            priority,
            category,
            completed,
            deadline,
        } => {
            let deadline = parse_deadline(deadline.as_deref())?;
            let task = store
                .update(
                    id,
                    TaskPatch {
                        title,
                        description,
                        priority,
                        category,
                        completed,
                        status: None,
                        deadline,
                    },
                )
                .await?;
            println!("Updated {}", task.id);
            print_tasks(store.tasks());
        }
        Command::Toggle { id } => {
            let task = store.toggle(id).await?;
            println!("{} is now {}", task.id, task.status);
            print_tasks(store.tasks());
        }
        Command::Delete { id, yes } => {
            // Deletion is irreversible; refuse to act without the explicit
            // confirmation flag.
            if !yes {
                return Err(StoreError::Validation(
                    "deletion is permanent; pass --yes to confirm".to_string(),
                ));
            }
            store.delete(id).await?;
            println!("Deleted {id}");
            print_tasks(store.tasks());
        }
        Command::Stats => {
            print_stats(&store.stats().await);
        }
    }
    Ok(())
}

/// Parses a deadline given as YYYY-MM-DD (midnight UTC) or full RFC3339.
fn parse_deadline(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, StoreError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Some(date.and_time(NaiveTime::MIN).and_utc()));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(|e| StoreError::Validation(format!("invalid deadline '{raw}': {e}")))
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }
    for task in tasks {
        print_task(task);
    }
}

fn print_task_refs(tasks: &[&Task]) {
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }
    for task in tasks {
        print_task(task);
    }
}

fn print_task(task: &Task) {
    let mark = if task.completed { 'x' } else { ' ' };
    let deadline = task
        .deadline
        .map(|d| format!("  due {}", d.format("%Y-%m-%d")))
        .unwrap_or_default();
    println!(
        "[{mark}] {}  ({}, {}){deadline}  {}",
        task.title, task.priority, task.category, task.id
    );
}

fn print_stats(stats: &TaskStats) {
    println!("Total:         {}", stats.total_tasks);
    println!("Completed:     {}", stats.completed_tasks);
    println!("Pending:       {}", stats.pending_tasks);
    println!("High priority: {}", stats.high_priority_tasks);
    if !stats.category_stats.is_empty() {
        println!("By category:");
        for bucket in &stats.category_stats {
            println!("  {}: {}", bucket.category, bucket.count);
        }
    }
    if !stats.priority_stats.is_empty() {
        println!("By priority:");
        for bucket in &stats.priority_stats {
            println!("  {}: {}", bucket.priority, bucket.count);
        }
    }
}
