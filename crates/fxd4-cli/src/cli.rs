use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output logs as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set proxy
    #[arg(required = false, long, short = 'P', global = true)]
    pub proxy: Option<String>,

    /// Set request headers
    #[arg(required = false, long, short = 'H', global = true)]
    pub header: Option<Vec<String>>,

    /// Set user agent
    #[arg(required = false, long, short = 'A', global = true)]
    pub user_agent: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the effective configuration with secrets redacted
    Config,

    /// Register a new account
    #[command(arg_required_else_help = true)]
    Register {
        /// Display name stored as `full_name` in the user metadata
        #[arg(required = true, long)]
        name: String,

        #[arg(required = true, long)]
        email: String,

        #[arg(required = true, long)]
        password: String,

        /// Defaults to the password
        #[arg(required = false, long)]
        password_confirmation: Option<String>,
    },

    /// Sign in and print the session cookie
    #[command(arg_required_else_help = true)]
    Login {
        #[arg(required = true, long)]
        email: String,

        #[arg(required = true, long)]
        password: String,
    },

    /// Revoke a session and print the cookie that clears it
    Logout {
        /// Access token of the session to revoke
        #[arg(required = false, long, short)]
        session: Option<String>,
    },

    /// Show the user behind a session token
    #[command(arg_required_else_help = true)]
    Whoami {
        /// Access token of the session
        #[arg(required = true, long, short)]
        session: String,
    },

    /// Fetch rows from a table
    #[command(arg_required_else_help = true)]
    #[clap(name = "query", visible_alias = "q")]
    Query(QueryArgs),

    /// Fetch a single row by id (or by another column)
    #[command(arg_required_else_help = true)]
    Find {
        table: String,

        value: String,

        /// Column to match instead of `id`
        #[arg(required = false, long)]
        by: Option<String>,
    },

    /// Insert a row from a JSON object
    #[command(arg_required_else_help = true)]
    Create {
        table: String,

        /// JSON object with the column values
        payload: String,
    },

    /// Update the row with the given id from a JSON object
    #[command(arg_required_else_help = true)]
    Update {
        table: String,

        id: String,

        /// JSON object with the changed column values
        payload: String,
    },

    /// Delete the row with the given id
    #[command(arg_required_else_help = true)]
    #[clap(name = "delete", visible_alias = "rm")]
    Delete { table: String, id: String },
}

#[derive(ClapArgs, Debug, Default)]
pub struct QueryArgs {
    pub table: String,

    /// Equality filter, `column=value`
    #[arg(required = false, long = "where", short = 'w')]
    pub filters: Vec<String>,

    /// Membership filter, `column=a,b,c`
    #[arg(required = false, long = "in")]
    pub in_filters: Vec<String>,

    /// Raw disjunction, e.g. `name.eq.a,name.eq.b`
    #[arg(required = false, long = "or")]
    pub or_filters: Vec<String>,

    /// Sort column, `column` or `column:desc`
    #[arg(required = false, long, short)]
    pub order: Vec<String>,

    /// Put nulls first in every ordering
    #[arg(required = false, long)]
    pub nulls_first: bool,

    /// Limit number of rows
    #[arg(required = false, long, short)]
    pub limit: Option<u32>,

    /// Return only the first matching row
    #[arg(required = false, long)]
    pub first: bool,
}
