//! Profiles command - inspect and export institution profiles.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use stmt_core::InstitutionProfile;

/// Arguments for the profiles command.
#[derive(Args)]
pub struct ProfilesArgs {
    #[command(subcommand)]
    command: ProfilesCommand,
}

#[derive(Subcommand)]
enum ProfilesCommand {
    /// List the built-in profiles
    List,

    /// Show a profile as JSON
    Show {
        /// Profile name
        name: String,
    },

    /// Export a profile to a JSON file, as a starting point for a
    /// custom layout
    Export {
        /// Profile name
        name: String,

        /// Output path
        #[arg(short, long)]
        output: PathBuf,
    },
}

const BUILT_IN: [(&str, &str); 6] = [
    ("generic", "Date/Transaction columns, no institution specifics"),
    ("everyday", "Everyday transaction account with DR/CR balances"),
    ("passbook", "Passbook savings account with signed +/- columns"),
    ("offset-home-loan", "Offset home loan with dot-leader columns"),
    ("home-loan", "Standalone home loan statement with section summaries"),
    ("credit-card", "Credit card statement keyed by card number"),
];

pub async fn run(args: ProfilesArgs) -> anyhow::Result<()> {
    match args.command {
        ProfilesCommand::List => {
            for (name, description) in BUILT_IN {
                println!("{:20} {}", style(name).cyan(), description);
            }
            Ok(())
        }
        ProfilesCommand::Show { name } => {
            let profile = InstitutionProfile::named(&name)?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
            Ok(())
        }
        ProfilesCommand::Export { name, output } => {
            let profile = InstitutionProfile::named(&name)?;
            profile.save(&output)?;
            println!("{} Profile written to {}", style("✓").green(), output.display());
            Ok(())
        }
    }
}
