use anyhow::Result;
use bitlet::areas::repository::Repository;
use bitlet::artifacts::core::PagerWriter;
use bitlet::config::{Config, LOG_ENV};
use bitlet::errors::{BitletError, kind_of};
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bitlet",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A miniature version-control system",
    long_about = "Bitlet keeps content-addressed snapshots of a flat working directory, \
    with branches, three-way merges and push/fetch/pull between repositories \
    on the same file system.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command creates the .bitlet directory, the initial commit and the master branch \
        in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(name = "add", about = "Stage files for the next commit")]
    Add {
        #[arg(index = 1, required = true, help = "The files to stage")]
        files: Vec<String>,
    },
    #[command(
        name = "rm",
        about = "Unstage a file, or schedule a tracked file for removal",
        long_about = "This command unstages a pending addition. If the file is tracked by the current commit, \
        it is also scheduled for removal and deleted from the working directory."
    )]
    Rm {
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command freezes the staging area into a new commit on the current branch."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(name = "log", about = "Show the history of the current branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of the commits with a matching message")]
    Find {
        #[arg(index = 1)]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged files and working tree changes")]
    Status,
    #[command(
        name = "checkout",
        about = "Switch branches or restore a file",
        long_about = "checkout <branch> switches branches, checkout -- <file> restores a file from the \
        head commit and checkout <commit> -- <file> restores it from the given commit."
    )]
    Checkout {
        #[arg(index = 1, help = "Branch name, or commit id when a file follows")]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "The file to restore")]
        file: Option<String>,
    },
    #[command(name = "branch", about = "Create a branch at the current head")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "reset", about = "Move the current branch to a commit and restore its files")]
    Reset {
        #[arg(index = 1)]
        commit: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current one")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
    #[command(name = "add-remote", about = "Register another repository")]
    AddRemote {
        #[arg(index = 1)]
        name: String,
        #[arg(index = 2, help = "Path to the other repository's .bitlet directory")]
        path: String,
    },
    #[command(name = "rm-remote", about = "Forget a registered repository")]
    RmRemote {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "push", about = "Send the current branch to a remote branch")]
    Push {
        #[arg(index = 1)]
        remote: String,
        #[arg(index = 2)]
        branch: String,
    },
    #[command(name = "fetch", about = "Copy a remote branch into <remote>-<branch>")]
    Fetch {
        #[arg(index = 1)]
        remote: String,
        #[arg(index = 2)]
        branch: String,
    },
    #[command(name = "pull", about = "Fetch a remote branch and merge it")]
    Pull {
        #[arg(index = 1)]
        remote: String,
        #[arg(index = 2)]
        branch: String,
    },
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "This command prints the content of an object in the repository. \
        It requires the SHA of the object to be specified."
    )]
    CatFile {
        #[arg(short = 'p', long, help = "The object SHA to print")]
        sha: String,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file and optionally write it to the object database"
    )]
    HashObject {
        #[arg(short, long, required = false, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report(&error);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    let config = Config::from_env()?;
    let pwd = std::env::current_dir()?;

    match command {
        Commands::Init { path } => {
            let path = path.map(PathBuf::from).unwrap_or_else(|| pwd.clone());
            std::fs::create_dir_all(&path)?;

            open(&path, config)?.init()
        }
        Commands::Add { files } => open(&pwd, config)?.add(&files),
        Commands::Rm { file } => open(&pwd, config)?.rm(&file),
        Commands::Commit { message } => open(&pwd, config)?.commit(&message),
        Commands::Log => paged(&pwd, config, Repository::log),
        Commands::GlobalLog => paged(&pwd, config, Repository::global_log),
        Commands::Find { message } => open(&pwd, config)?.find(&message),
        Commands::Status => open(&pwd, config)?.status(),
        Commands::Checkout { target, file } => {
            let repository = open(&pwd, config)?;

            match (target, file) {
                (None, Some(file)) => repository.checkout_file(&file),
                (Some(commit), Some(file)) => repository.checkout_commit_file(&commit, &file),
                (Some(branch), None) => repository.checkout_branch(&branch),
                (None, None) => Err(anyhow::anyhow!("Incorrect operands.")),
            }
        }
        Commands::Branch { name } => open(&pwd, config)?.branch(&name),
        Commands::RmBranch { name } => open(&pwd, config)?.rm_branch(&name),
        Commands::Reset { commit } => open(&pwd, config)?.reset(&commit),
        Commands::Merge { branch } => open(&pwd, config)?.merge(&branch).map(|_| ()),
        Commands::AddRemote { name, path } => open(&pwd, config)?.add_remote(&name, &path),
        Commands::RmRemote { name } => open(&pwd, config)?.rm_remote(&name),
        Commands::Push { remote, branch } => open(&pwd, config)?.push(&remote, &branch),
        Commands::Fetch { remote, branch } => open(&pwd, config)?.fetch(&remote, &branch),
        Commands::Pull { remote, branch } => {
            open(&pwd, config)?.pull(&remote, &branch).map(|_| ())
        }
        Commands::CatFile { sha } => open(&pwd, config)?.cat_file(&sha),
        Commands::HashObject { write, file } => open(&pwd, config)?.hash_object(&file, write),
    }
}

fn open(path: &Path, config: Config) -> Result<Repository> {
    Ok(Repository::new(&path.to_string_lossy(), Box::new(std::io::stdout()))?.with_config(config))
}

/// Run a command whose output may be long, through the pager when stdout is
/// a terminal.
fn paged(path: &Path, config: Config, command: fn(&Repository) -> Result<()>) -> Result<()> {
    if config.no_pager() || !std::io::stdout().is_terminal() {
        return command(&open(path, config)?);
    }

    let writer = PagerWriter::new(minus::Pager::new());
    let repository =
        Repository::new(&path.to_string_lossy(), Box::new(writer.clone()))?.with_config(config);
    command(&repository)?;
    drop(repository);

    writer.page()
}

fn report(error: &anyhow::Error) {
    match kind_of(error) {
        Some(BitletError::UntrackedFileConflict(paths)) => {
            eprintln!("{}", BitletError::UntrackedFileConflict(paths.clone()));
            for path in paths {
                eprintln!("    {path}");
            }
        }
        Some(kind) => eprintln!("{kind}"),
        None => eprintln!("{error:#}"),
    }
}
