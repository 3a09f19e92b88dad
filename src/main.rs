use anyhow::Result;
use clap::{Parser, Subcommand};

use claude_vault::cli::{check, hook, list, search, session, show, stats, sync};
use claude_vault::config::Config;
use claude_vault::store::Store;

#[derive(Parser)]
#[command(name = "claude-vault")]
#[command(about = "Archive and search Claude Code session history")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "vault.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Record one hook event from stdin (wired into Claude Code's hooks)
    Hook {
        /// Skip the transcript sync normally triggered on SessionEnd
        #[arg(long)]
        no_sync: bool,
    },

    /// Recover untracked sessions and pull new transcript lines into the vault
    Sync {
        /// Sync a single session (ID or prefix)
        #[arg(short, long)]
        session: Option<String>,

        /// Sync only sessions whose project name matches
        #[arg(short, long)]
        project: Option<String>,

        /// Skip the orphan recovery pass
        #[arg(long)]
        no_recover: bool,
    },

    /// Verify content and search-index tables agree
    Check,

    /// Full-text search over events and transcripts
    Search {
        /// Search query
        query: String,

        /// Maximum results per section
        #[arg(short, long, default_value_t = 20)]
        limit: i64,

        /// Restrict to one session (ID or prefix)
        #[arg(short, long)]
        session: Option<String>,

        /// Restrict events to one type (e.g. UserPromptSubmit)
        #[arg(short = 't', long)]
        event_type: Option<String>,

        /// Search events only
        #[arg(long, conflicts_with = "transcripts_only")]
        events_only: bool,

        /// Search transcripts only
        #[arg(long)]
        transcripts_only: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List sessions
    Sessions {
        /// Filter by project name
        #[arg(short, long)]
        project: Option<String>,

        /// Maximum sessions to list
        #[arg(short, long, default_value_t = 50)]
        limit: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one session's events and transcript
    Show {
        /// Session ID (or prefix)
        session: String,

        /// Only show user prompts
        #[arg(long, conflicts_with = "tools_only")]
        prompts_only: bool,

        /// Only show tool events
        #[arg(long)]
        tools_only: bool,

        /// Maximum events to show
        #[arg(short, long, default_value_t = 200)]
        limit: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show vault statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Give a session a custom name
    Rename {
        /// Session ID (or prefix)
        session: String,
        /// New name
        name: String,
    },

    /// Delete a session and all its data
    Delete {
        /// Session ID (or prefix)
        session: String,
        /// Actually delete (without this, prints what would be removed)
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config).unwrap_or_default();

    // The hook path never propagates errors: the host treats a nonzero exit
    // as a hook failure, and archival must not break a live session.
    if let Commands::Hook { no_sync } = &cli.command {
        hook::run(&config, *no_sync);
        return Ok(());
    }

    let mut store = Store::open(&config.database_path())?;

    match cli.command {
        Commands::Hook { .. } => unreachable!(),
        Commands::Sync {
            session,
            project,
            no_recover,
        } => {
            sync::run(&mut store, &config, session, project, no_recover)?;
        }
        Commands::Check => {
            check::run(&store, &config)?;
        }
        Commands::Search {
            query,
            limit,
            session,
            event_type,
            events_only,
            transcripts_only,
            json,
        } => {
            search::run(
                &store,
                &search::SearchArgs {
                    query,
                    limit,
                    session,
                    event_type,
                    events_only,
                    transcripts_only,
                    json,
                },
            )?;
        }
        Commands::Sessions {
            project,
            limit,
            json,
        } => {
            list::run(&store, project, limit, json)?;
        }
        Commands::Show {
            session,
            prompts_only,
            tools_only,
            limit,
            json,
        } => {
            show::run(
                &store,
                &show::ShowArgs {
                    session,
                    prompts_only,
                    tools_only,
                    limit,
                    json,
                },
            )?;
        }
        Commands::Stats { json } => {
            stats::run(&store, &config, json)?;
        }
        Commands::Rename { session, name } => {
            session::rename(&mut store, &session, &name)?;
        }
        Commands::Delete { session, force } => {
            session::delete(&mut store, &session, force)?;
        }
    }

    Ok(())
}
