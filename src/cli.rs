use clap::{Parser, Subcommand};
use color_eyre::eyre::{self, eyre};

use crate::api::DirectoryClient;
use crate::api::types::UserSummary;
use crate::auth::credentials::load_session;
use crate::config::{AppConfig, load_config};
use crate::directory::controller::DirectoryController;
use crate::directory::listing::QueryContext;
use crate::directory::resolver::resolve_follow_status;
use crate::profile::ProfileCache;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "recipeshare-people",
    about = "TUI and CLI for finding and following people on RecipeShare"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand)]
pub enum CliCommand {
    /// Launch the interactive TUI (default)
    Tui,
    /// List the user directory (JSONL)
    Browse {
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Search users by name or handle (JSONL)
    Search {
        /// Search query
        query: String,
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Follow a user by id
    Follow {
        user_id: String,
    },
    /// Unfollow a user by id
    Unfollow {
        user_id: String,
    },
    /// Fetch your own profile and refresh the local cache (JSONL)
    Profile,
    /// Forget the locally cached profile
    Logout,
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

/// Print one user per line with the actor's relationship to them.
fn print_users(users: &[UserSummary], controller: &DirectoryController) -> eyre::Result<()> {
    for user in users {
        let line = serde_json::to_string(&serde_json::json!({
            "user": user,
            "avatar": user.avatar(),
            "isFollowing": controller.is_following(&user.id),
        }))?;
        println!("{line}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Client construction (shared with main.rs TUI path)
// ---------------------------------------------------------------------------

/// Build an authenticated `DirectoryClient` from env credentials + config.
/// Returns an error if no session is found.
pub fn build_api_client(config: &AppConfig) -> eyre::Result<DirectoryClient> {
    let session = load_session()?;
    Ok(DirectoryClient::new(config, Some(session))?)
}

// ---------------------------------------------------------------------------
// Command execution
// ---------------------------------------------------------------------------

pub async fn run_command(cmd: CliCommand) -> eyre::Result<()> {
    let config = load_config();

    if let CliCommand::Logout = cmd {
        let cache = ProfileCache::default_location();
        cache.clear()?;
        println!("Cleared cached profile at {}", cache.path().display());
        return Ok(());
    }

    let client = build_api_client(&config)?;
    let actor_id = client.session().map(|s| s.user_id.clone());

    match cmd {
        CliCommand::Tui | CliCommand::Logout => {
            unreachable!("tui and logout are handled before building a client")
        }

        CliCommand::Browse { page } => {
            list_page(&client, actor_id, config.page_size, QueryContext::Browse, page).await?;
        }

        CliCommand::Search { query, page } => {
            let context = QueryContext::from_query(&query);
            if context == QueryContext::Browse {
                return Err(eyre!("search query is empty"));
            }
            list_page(&client, actor_id, config.page_size, context, page).await?;
        }

        CliCommand::Follow { user_id } => {
            ensure_not_self(actor_id.as_deref(), &user_id)?;
            client.follow(&user_id).await.map_err(|e| eyre!("{e}"))?;
            let line = serde_json::to_string(&serde_json::json!({
                "userId": user_id,
                "isFollowing": true,
            }))?;
            println!("{line}");
        }

        CliCommand::Unfollow { user_id } => {
            ensure_not_self(actor_id.as_deref(), &user_id)?;
            client.unfollow(&user_id).await.map_err(|e| eyre!("{e}"))?;
            let line = serde_json::to_string(&serde_json::json!({
                "userId": user_id,
                "isFollowing": false,
            }))?;
            println!("{line}");
        }

        CliCommand::Profile => {
            let profile = client.get_profile().await.map_err(|e| eyre!("{e}"))?;
            let cache = ProfileCache::default_location();
            if let Err(e) = cache.save(&profile) {
                tracing::warn!("failed to cache profile: {e}");
            }
            let line = serde_json::to_string(&serde_json::json!({
                "profile": profile,
                "avatar": profile.avatar(),
            }))?;
            println!("{line}");
        }
    }

    Ok(())
}

/// Fetch one page through the same pipeline the TUI uses and print it.
async fn list_page(
    client: &DirectoryClient,
    actor_id: Option<String>,
    page_size: u32,
    context: QueryContext,
    page: u32,
) -> eyre::Result<()> {
    let mut controller = DirectoryController::new(actor_id, page_size);
    let request = controller
        .begin_page(context, page)
        .ok_or_else(|| eyre!("not signed in"))?;

    let result = request.execute(client).await.map_err(|e| eyre!("{e}"))?;
    let ids = controller
        .apply_page(&request, Ok(result))
        .unwrap_or_default();

    let flags = resolve_follow_status(client, &ids).await;
    controller.merge_flags(flags);

    let listing = controller.listing();
    print_users(&listing.items, &controller)?;
    let line = serde_json::to_string(&serde_json::json!({
        "page": listing.current_page,
        "hasMore": listing.has_more,
    }))?;
    println!("{line}");
    Ok(())
}

fn ensure_not_self(actor_id: Option<&str>, user_id: &str) -> eyre::Result<()> {
    if actor_id == Some(user_id) {
        return Err(eyre!("you cannot follow or unfollow yourself"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
