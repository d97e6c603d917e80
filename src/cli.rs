use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP daemon
    Serve {
        /// Listen port. Overrides the config file and the PORT env var.
        #[clap(short, long)]
        port: Option<u16>,
    },

    /// Rank catalog products against a query
    Suggest {
        query: String,

        /// Rank products from this JSON file instead of the default catalog
        #[clap(long)]
        catalog: Option<String>,
    },

    /// Match a conversation summary against the nudge themes
    Nudge { summary: String },

    /// Translate Hindi text to English
    Translate { text: String },
}
