//! Task management commands for CLI.

use clap::Subcommand;
use focusquest_core::storage::Database;
use focusquest_core::Task;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Create {
        /// Owning account ID
        account_id: String,
        /// Task title
        title: String,
        /// Estimated work intervals to finish the task (1-20)
        #[arg(long, default_value = "1")]
        estimated_intervals: u32,
    },
    /// List an account's tasks
    List {
        /// Account ID
        account_id: String,
        /// Filter by status (pending, in_progress, completed)
        #[arg(long)]
        status: Option<String>,
    },
    /// Get task details
    Get {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        TaskAction::Create {
            account_id,
            title,
            estimated_intervals,
        } => {
            let task = Task::new(
                Uuid::new_v4().to_string(),
                account_id,
                title,
                estimated_intervals,
            )?;
            db.create_task(&task)?;
            println!("Task created: {}", task.id);
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List { account_id, status } => {
            let all_tasks = db.list_tasks(&account_id)?;
            let filtered: Vec<_> = all_tasks
                .into_iter()
                .filter(|task| match status {
                    Some(ref s) => task.status.as_str() == s.as_str(),
                    None => true,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&filtered)?);
        }
        TaskAction::Get { id } => {
            let task = db
                .find_task(&id)?
                .ok_or_else(|| format!("task not found: {id}"))?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Delete { id } => {
            if db.delete_task(&id)? {
                println!("Task deleted: {id}");
            } else {
                eprintln!("task not found: {id}");
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
