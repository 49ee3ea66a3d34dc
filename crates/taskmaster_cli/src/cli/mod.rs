use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "taskmaster", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: taskmaster add "Buy milk"
    Add {
        text: Option<String>,
    },
    /// Toggle a task between pending and completed
    ///
    /// Example: taskmaster toggle task-1754500000000
    Toggle {
        id: String,
    },
    /// Delete a task
    ///
    /// Example: taskmaster delete task-1754500000000
    Delete {
        id: String,
    },
    /// Delete every completed task (asks for confirmation)
    ///
    /// Example: taskmaster clear
    /// Example: taskmaster clear --yes
    /// Example: taskmaster clear --all --yes
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
        /// Delete every task, pending ones included
        #[arg(long)]
        all: bool,
    },
    /// List all tasks
    ///
    /// Example: taskmaster list
    List,
    /// Show task counts
    ///
    /// Example: taskmaster stats
    Stats,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_add_with_json_flag() {
        let cli = Cli::try_parse_from(["taskmaster", "add", "Buy milk", "--json"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Command::Add { text } => assert_eq!(text.as_deref(), Some("Buy milk")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_clear_flags() {
        let cli = Cli::try_parse_from(["taskmaster", "clear", "--yes", "--all"]).unwrap();
        match cli.command {
            Command::Clear { yes, all } => {
                assert!(yes);
                assert!(all);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
