use clap::{Args, Parser, Subcommand};

pub mod add;
pub mod auth;
pub mod browse;
pub mod config;
pub mod display;
pub mod form;
pub mod list;
pub mod show;
pub mod ui;
pub mod update;

pub use add::run_add;
pub use auth::{run_login, run_logout, run_register, run_whoami};
pub use browse::run_browse;
pub use config::run_config;
pub use display::print_full_contact;
pub use form::ContactForm;
pub use list::run_list;
pub use show::{run_delete, run_favorite, run_show};
pub use update::run_update;

#[derive(Parser)]
#[command(name = "contactdesk")]
#[command(about = "Contact manager client for the command line")]
#[command(version)]
pub struct Cli {
    /// Log requests and store activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and remember the session
    Login(LoginArgs),
    /// Create a new account
    Register(RegisterArgs),
    /// Sign out and forget the session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List contacts with pagination
    List(ListArgs),
    /// Browse contacts interactively with live search
    Browse(BrowseArgs),
    /// Show full details for a contact
    Show(IdArgs),
    /// Add a new contact
    Add(AddArgs),
    /// Edit an existing contact
    Update(UpdateArgs),
    /// Delete a contact
    Delete(DeleteArgs),
    /// Toggle a contact's favorite flag
    Favorite(IdArgs),
    /// Show or change the API settings
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct LoginArgs {
    #[arg(short, long)]
    pub email: Option<String>,
    /// Prompted for when omitted
    #[arg(short, long)]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(short, long)]
    pub email: Option<String>,
    #[arg(short, long)]
    pub password: Option<String>,
    #[arg(short, long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(short, long, default_value = "1")]
    pub page: u32,
    #[arg(short, long)]
    pub limit: Option<u32>,
    /// Match name, phone, email or company
    #[arg(short, long)]
    pub search: Option<String>,
    /// name, created or updated
    #[arg(long)]
    pub sort: Option<String>,
    /// asc or desc
    #[arg(short, long)]
    pub order: Option<String>,
    /// Comma-separated; contacts must carry all of them
    #[arg(short, long)]
    pub tags: Option<String>,
    /// Only favorites
    #[arg(short, long)]
    pub favorites: bool,
}

#[derive(Args)]
pub struct BrowseArgs {
    /// Start with this search term
    #[arg(short, long)]
    pub search: Option<String>,
    /// Start with only favorites shown
    #[arg(short, long)]
    pub favorites: bool,
}

#[derive(Args)]
pub struct IdArgs {
    pub id: String,
}

#[derive(Args)]
pub struct ContactFields {
    #[arg(short, long)]
    pub name: Option<String>,
    #[arg(short, long)]
    pub phone: Option<String>,
    #[arg(short, long)]
    pub email: Option<String>,
    #[arg(short, long)]
    pub company: Option<String>,
    #[arg(short, long)]
    pub address: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    /// Comma-separated
    #[arg(short, long)]
    pub tags: Option<String>,
}

impl From<ContactFields> for ContactForm {
    fn from(f: ContactFields) -> Self {
        ContactForm {
            name: f.name,
            phone: f.phone,
            email: f.email,
            company: f.company,
            address: f.address,
            notes: f.notes,
            tags: f.tags,
        }
    }
}

#[derive(Args)]
pub struct AddArgs {
    #[command(flatten)]
    pub fields: ContactFields,
    /// Mark as favorite
    #[arg(short, long)]
    pub favorite: bool,
}

#[derive(Args)]
pub struct UpdateArgs {
    pub id: String,
    #[command(flatten)]
    pub fields: ContactFields,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub id: String,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Base URL of the contacts API, e.g. http://localhost:3000/api
    #[arg(long)]
    pub api_url: Option<String>,
    #[arg(long)]
    pub page_size: Option<u32>,
    /// Forget saved settings
    #[arg(long)]
    pub reset: bool,
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
    fn test_parse_add() {
        let cli = Cli::parse_from([
            "contactdesk", "add", "-n", "Alice", "-p", "13800138000", "-t", "work", "-f",
        ]);
        match cli.command {
            Some(Commands::Add(args)) => {
                assert!(args.favorite);
                let form = ContactForm::from(args.fields);
                assert_eq!(form.name.as_deref(), Some("Alice"));
                assert_eq!(form.tags.as_deref(), Some("work"));
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_list() {
        let cli = Cli::parse_from(["contactdesk", "-v", "list", "--sort", "name", "-f"]);
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::List(args)) => {
                assert_eq!(args.page, 1);
                assert_eq!(args.sort.as_deref(), Some("name"));
                assert!(args.favorites);
            }
            _ => panic!("expected list"),
        }
    }
}
