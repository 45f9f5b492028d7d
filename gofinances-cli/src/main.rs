use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use gofinances_core::{CATEGORIES, CategoryTotalView, NewTransaction, YearMonth};
use gofinances_store::{Dashboard, FileStore, TransactionRepository};
use serde::Serialize;
use std::path::Path;

mod config;
mod logging;
mod output;
mod state;

use config::Config;
use state::{Session, User};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GOFINANCES_BUILD_SHA"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "gofinances", version = VERSION, about = "Track income and expenses per user")]
struct Cli {
    /// Act as this user id instead of the signed-in one
    #[arg(long, global = true)]
    user: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in as a user (stored in ~/.gofinances/profile.json)
    Login {
        #[arg(long)]
        id: String,

        #[arg(long)]
        name: String,

        /// Avatar URL
        #[arg(long)]
        photo: Option<String>,
    },

    /// Sign out the current user
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Register a transaction
    Add {
        #[arg(long)]
        name: String,

        /// e.g. 1234.56 or 1.234,56
        #[arg(long, allow_hyphen_values = true)]
        amount: String,

        /// positive|negative (or up|down)
        #[arg(long = "type")]
        kind: String,

        /// Category key, see `gofinances categories`
        #[arg(long)]
        category: String,
    },

    /// List transactions
    List,

    /// Totals, last transaction dates and the transaction list
    Dashboard,

    /// Expenses by category
    Resume {
        /// Only this month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },

    /// Delete every transaction of the current user
    Clear,

    /// Show the categories available to `add`
    Categories,

    /// Config file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.gofinances/config.toml with defaults (if missing)
    Init,

    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let home = state::ensure_gofinances_home()?;
    let cfg = config::load_config(&home)?;
    logging::init_logging(&cfg.log.level)?;

    match cli.command {
        Command::Login { id, name, photo } => {
            let id = id.trim().to_string();
            if id.is_empty() {
                bail!("--id must not be empty");
            }
            let session = Session {
                user: User { id, name, photo },
                signed_in_at_utc: chrono::Utc::now().to_rfc3339(),
            };
            state::write_session(&home, &session)?;
            tracing::info!(user = %session.user.id, "signed in");
            println!("Signed in as {} ({})", session.user.name, session.user.id);
        }

        Command::Logout => match state::sign_out(&home)? {
            Some(user) => println!("Signed out {} ({})", user.name, user.id),
            None => println!("Nobody is signed in"),
        },

        Command::Whoami => {
            let user = current_user(&home, cli.user.as_deref())?;
            print_or_json(cli.json, &user, || {
                let photo = user.photo.as_deref().unwrap_or("-");
                format!("{} ({})\nphoto: {}\n", user.name, user.id, photo)
            })?;
        }

        Command::Add {
            name,
            amount,
            kind,
            category,
        } => {
            let user = current_user(&home, cli.user.as_deref())?;
            let form = NewTransaction {
                name,
                amount,
                kind,
                category_key: category,
            };
            let tx = form.validate(chrono::Utc::now())?;
            let mut dash = open_dashboard(&home, &cfg, &user)?;
            let snap = dash.add(&tx).context("saving transaction")?;
            if cli.json {
                print_json(&snap.highlight)?;
            } else {
                println!("Added {} ({})", tx.name, tx.id);
                println!("Total: {}", snap.highlight.total.amount);
            }
        }

        Command::List => {
            let user = current_user(&home, cli.user.as_deref())?;
            let snap = open_dashboard(&home, &cfg, &user)?.refresh()?;
            print_or_json(cli.json, &snap.transactions, || output::render_list(&snap))?;
        }

        Command::Dashboard => {
            let user = current_user(&home, cli.user.as_deref())?;
            let snap = open_dashboard(&home, &cfg, &user)?.refresh()?;
            print_or_json(cli.json, &snap.highlight, || output::render_dashboard(&user, &snap))?;
        }

        Command::Resume { month } => {
            let user = current_user(&home, cli.user.as_deref())?;
            let month = month.as_deref().map(str::parse::<YearMonth>).transpose()?;
            let mut dash = open_dashboard(&home, &cfg, &user)?;
            let snap = dash.refresh()?;
            let ctx = dash.context();
            let rows: Vec<CategoryTotalView> = snap
                .expenses_by_category(month, ctx)?
                .iter()
                .map(|row| CategoryTotalView::render(row, ctx))
                .collect();
            print_or_json(cli.json, &rows, || output::render_resume(&rows))?;
        }

        Command::Clear => {
            let user = current_user(&home, cli.user.as_deref())?;
            let mut dash = open_dashboard(&home, &cfg, &user)?;
            let snap = dash.clear_all().context("clearing transactions")?;
            print_or_json(cli.json, &snap.highlight, || {
                format!("Cleared all transactions of {}\n", user.id)
            })?;
        }

        Command::Categories => {
            print_or_json(cli.json, &CATEGORIES, || output::render_categories(&CATEGORIES))?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => {
                let p = config::config_path(&home);
                if config::init_config(&home)? {
                    println!("Wrote {}", p.display());
                } else {
                    println!("Config already exists: {}", p.display());
                }
            }
            ConfigCommand::Show => {
                let s = toml::to_string_pretty(&cfg).context("serialize config")?;
                println!("# {}", config::config_path(&home).display());
                println!("{}", s.trim());
            }
        },
    }

    Ok(())
}

/// `--user` wins; otherwise the signed-in session
fn current_user(home: &Path, override_id: Option<&str>) -> Result<User> {
    let session = state::read_session(home)?;
    match (override_id, session) {
        (Some(id), Some(s)) if s.user.id == id => Ok(s.user),
        (Some(id), _) => Ok(User {
            id: id.to_string(),
            name: id.to_string(),
            photo: None,
        }),
        (None, Some(s)) => Ok(s.user),
        (None, None) => bail!("Not signed in. Run: gofinances login --id <id> --name <name>"),
    }
}

fn open_dashboard(home: &Path, cfg: &Config, user: &User) -> Result<Dashboard<FileStore>> {
    let ctx = cfg.display_context()?;
    let store = FileStore::new(cfg.data_dir(home));
    let repo = TransactionRepository::new(store, &user.id, ctx.tz).with_policy(cfg.storage.malformed);
    Ok(Dashboard::new(repo, ctx))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_or_json<T: Serialize + ?Sized>(
    json: bool,
    value: &T,
    text: impl FnOnce() -> String,
) -> Result<()> {
    if json {
        print_json(value)
    } else {
        print!("{}", text());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_carries_build_sha() {
        let sha = env!("GOFINANCES_BUILD_SHA");
        assert!(!sha.is_empty());
        assert_eq!(VERSION, format!("{} ({sha})", env!("CARGO_PKG_VERSION")));
    }
}
