use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pos-cli", version, about = "POS backend administration")]
pub struct Cli {
    /// MySQL connection URL.
    #[arg(long, global = true, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the version.
    Version,

    /// Apply embedded database migrations.
    Migrate,

    /// Create a user and print the generated password.
    CreateUser {
        #[arg(long)]
        name: String,

        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        /// Role name, e.g. "Super Admin" or "Admin".
        #[arg(long)]
        role: String,

        /// Recorded as the creating operator.
        #[arg(long, default_value = "system")]
        created_by: String,
    },
}
