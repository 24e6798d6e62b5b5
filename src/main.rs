use anyhow::Result;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use minus::Pager;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use twig::areas::repository::Repository;
use twig::artifacts::core::PagerWriter;
use twig::errors::RepositoryError;

/// Environment variable holding the tracing filter directive
const LOG_ENV: &str = "TWIG_LOG";

#[derive(Parser)]
#[command(
    name = "twig",
    version = "0.1.0",
    about = "A minimal local version-control system",
    long_about = "twig snapshots a working directory into content-addressed commits, \
    keeps a linear history per branch, and moves the working directory between them.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(
        short = 'C',
        global = true,
        value_name = "PATH",
        help = "Run as if twig was started in <PATH>"
    )]
    directory: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command creates a repository in the current directory with a single \
        root commit on the master branch."
    )]
    Init,
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1, help = "The file to stage")]
        file: String,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command records the staged additions and removals as a new commit \
        on the active branch."
    )]
    Commit {
        #[arg(index = 1, help = "The commit message")]
        message: Option<String>,
    },
    #[command(name = "rm", about = "Unstage a file or stage its removal")]
    Rm {
        #[arg(index = 1, help = "The file to remove")]
        file: String,
    },
    #[command(name = "log", about = "Show the history of the active branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of commits with the given message")]
    Find {
        #[arg(index = 1, help = "The exact commit message")]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged changes and working tree status")]
    Status,
    #[command(name = "branch", about = "Create a branch at the active head")]
    Branch {
        #[arg(index = 1, help = "The name of the new branch")]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch pointer")]
    RmBranch {
        #[arg(index = 1, help = "The branch to delete")]
        name: String,
    },
    #[command(
        name = "checkout",
        about = "Restore a file or switch branches",
        long_about = "checkout -- <file> restores a file from the active head, \
        checkout <commit> -- <file> restores it from another commit, \
        and checkout <branch> switches to a branch."
    )]
    Checkout {
        #[arg(index = 1, help = "A branch name, or a commit id when a file is given")]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "The file to restore")]
        file: Option<String>,
    },
    #[command(name = "reset", about = "Move the active branch to a commit")]
    Reset {
        #[arg(index = 1, help = "The commit id (may be abbreviated)")]
        commit_id: String,
    },
}

impl Commands {
    fn is_pageable(&self) -> bool {
        matches!(self, Commands::Log | Commands::GlobalLog)
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => match RepositoryError::from_anyhow(&error) {
            Some(user_error) => {
                println!("{}", user_error);
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("error: {:#}", error);
                ExitCode::FAILURE
            }
        },
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let path = match cli.directory {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let pager = (cli.command.is_pageable() && PagerWriter::is_enabled()).then(Pager::new);
    let writer: Box<dyn Write> = match &pager {
        Some(pager) => Box::new(PagerWriter::new(pager.clone())),
        None => Box::new(std::io::stdout()),
    };
    let repository = Repository::new(&path, writer)?;

    let _lock = match cli.command {
        Commands::Init => None,
        _ => {
            repository.ensure_initialized()?;
            Some(repository.lock()?)
        }
    };

    match cli.command {
        Commands::Init => repository.init()?,
        Commands::Add { file } => repository.add(&file)?,
        Commands::Commit { message } => repository.commit(&message.unwrap_or_default())?,
        Commands::Rm { file } => repository.rm(&file)?,
        Commands::Log => repository.log()?,
        Commands::GlobalLog => repository.global_log()?,
        Commands::Find { message } => repository.find(&message)?,
        Commands::Status => repository.status()?,
        Commands::Branch { name } => repository.branch(&name)?,
        Commands::RmBranch { name } => repository.rm_branch(&name)?,
        Commands::Checkout { target, file } => match (target, file) {
            (None, Some(file)) => repository.checkout_file(&file)?,
            (Some(commit_id), Some(file)) => repository.checkout_file_at(&commit_id, &file)?,
            (Some(branch), None) => repository.checkout_branch(&branch)?,
            (None, None) => anyhow::bail!(RepositoryError::BadArguments),
        },
        Commands::Reset { commit_id } => repository.reset(&commit_id)?,
    }

    repository.writer().flush()?;

    if let Some(pager) = pager {
        minus::page_all(pager)?;
    }

    Ok(())
}
