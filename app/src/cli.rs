//! Command-line definition

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "shopfront", version, about = "Storefront and back-office client")]
pub struct Cli {
    /// Tab scope to act in; each scope keeps its own sign-in
    #[arg(long = "tab", global = true, value_name = "SCOPE")]
    pub tab: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Image reference helpers
    #[command(subcommand)]
    Image(ImageCommand),

    /// Open or close a tab scope
    #[command(subcommand)]
    Tab(TabCommand),

    /// Sign in to the current tab; the password is read from stdin
    Login(LoginArgs),

    /// Show who the current tab is signed in as
    Whoami,

    /// Sign the current tab out
    Logout,

    #[command(subcommand)]
    Products(ProductCommand),

    #[command(subcommand)]
    Categories(CategoryCommand),

    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Debug, Subcommand)]
pub enum ImageCommand {
    /// Display URL for a stored image reference
    Resolve {
        reference: Option<String>,
        /// Print how the reference was classified
        #[arg(long)]
        explain: bool,
    },
    /// Storage form of a pasted link
    Canonical { link: String },
}

#[derive(Debug, Subcommand)]
pub enum TabCommand {
    /// Allocate a fresh scope and print its id
    Open,
    /// Purge the scope given with --tab
    Close,
}

/// The password is read from stdin, never from the command line
#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,
}

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
        /// Include hidden products (administrators only)
        #[arg(long)]
        all: bool,
    },
    Show { id: String },
    Create(ProductArgs),
    Update {
        id: String,
        #[command(flatten)]
        fields: ProductArgs,
    },
    Toggle { id: String },
    Delete { id: String },
}

#[derive(Debug, Args)]
pub struct ProductArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub price: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long = "category")]
    pub category_id: Option<String>,
    /// Image link; drive share links are stored in canonical form
    #[arg(long)]
    pub image: Option<String>,
    #[arg(long)]
    pub hidden: bool,
}

#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    List,
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    Delete { id: String },
    /// Create the backend's default categories
    Seed,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    Show,
    /// Print settings whenever they change, until interrupted
    Watch,
    /// Change individual settings (administrators only)
    Update(SettingsArgs),
}

/// Only the fields given are changed
#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[arg(long)]
    pub site_name: Option<String>,
    #[arg(long)]
    pub tagline: Option<String>,
    #[arg(long)]
    pub contact_email: Option<String>,
    #[arg(long)]
    pub contact_phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    /// Drive share links are stored in canonical form
    #[arg(long)]
    pub hero_image: Option<String>,
    #[arg(long)]
    pub logo_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_tab_flag() {
        let cli = Cli::parse_from(["shopfront", "whoami", "--tab", "t-1"]);
        assert_eq!(cli.tab.as_deref(), Some("t-1"));
        assert!(matches!(cli.command, Command::Whoami));
    }

    #[test]
    fn test_product_create_args() {
        let cli = Cli::parse_from([
            "shopfront",
            "products",
            "create",
            "--name",
            "Mug",
            "--price",
            "8.50",
            "--image",
            "https://drive.google.com/file/d/abc/view",
        ]);
        match cli.command {
            Command::Products(ProductCommand::Create(args)) => {
                assert_eq!(args.name, "Mug");
                assert_eq!(args.price, "8.50");
                assert!(!args.hidden);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_login_has_no_password_flag() {
        let cli = Cli::parse_from(["shopfront", "login", "--email", "a@b.c"]);
        assert!(matches!(cli.command, Command::Login(ref args) if args.email == "a@b.c"));

        let result =
            Cli::try_parse_from(["shopfront", "login", "--email", "a@b.c", "--password", "pw"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_update_args() {
        let cli = Cli::parse_from(["shopfront", "settings", "update", "--tagline", "Fresh daily"]);
        match cli.command {
            Command::Settings(SettingsCommand::Update(args)) => {
                assert_eq!(args.tagline.as_deref(), Some("Fresh daily"));
                assert!(args.site_name.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_image_resolve_reference_optional() {
        let cli = Cli::parse_from(["shopfront", "image", "resolve"]);
        assert!(matches!(
            cli.command,
            Command::Image(ImageCommand::Resolve { reference: None, .. })
        ));
    }
}
