use crate::config::ReleaseSection;
use crate::credentials::store::DEFAULT_CREDENTIALS_FILE;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ebrelease",
    about = "Elastic Beanstalk Releaser - switch an environment to an uploaded application version",
    version
)]
pub struct Cli {
    /// Path to the release configuration file (defaults to ./ebrelease.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path to the credential store
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        env = "EBRELEASE_CREDENTIALS",
        default_value = DEFAULT_CREDENTIALS_FILE
    )]
    pub credentials: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Update the environment to the given application version
    Release {
        #[command(flatten)]
        target: ReleaseArgs,

        /// Extra variable for version label expansion (repeatable)
        #[arg(long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,
    },

    /// Check the release configuration without touching the environment
    Validate {
        #[command(flatten)]
        target: ReleaseArgs,

        /// Also verify the credential against AWS IAM
        #[arg(long)]
        check_credential: bool,
    },

    /// List the values accepted by the release configuration
    List {
        #[command(subcommand)]
        what: ListTarget,

        /// Print options as a JSON array
        #[arg(long, global = true)]
        json: bool,
    },
}

/// Release fields; each one overrides the `[release]` table of the config file.
#[derive(Args, Debug, Default, Clone)]
pub struct ReleaseArgs {
    /// Credential id in the credential store
    #[arg(long)]
    pub credential_id: Option<String>,

    /// AWS region code (e.g. eu-west-1)
    #[arg(long)]
    pub region: Option<String>,

    /// Elastic Beanstalk application name
    #[arg(long = "application")]
    pub application_name: Option<String>,

    /// Target environment id (e.g. e-abc123)
    #[arg(long)]
    pub environment_id: Option<String>,

    /// Version label, may reference variables as $NAME or ${NAME}
    #[arg(long)]
    pub version_label: Option<String>,
}

impl From<ReleaseArgs> for ReleaseSection {
    fn from(args: ReleaseArgs) -> Self {
        ReleaseSection {
            credential_id: args.credential_id,
            region: args.region,
            application_name: args.application_name,
            environment_id: args.environment_id,
            version_label: args.version_label,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ListTarget {
    /// All known AWS regions
    Regions,

    /// Credentials in the credential store
    Credentials,

    /// Applications visible to a credential in a region
    Applications {
        #[arg(long)]
        credential_id: Option<String>,

        #[arg(long)]
        region: Option<String>,
    },

    /// Environments of an application
    Environments {
        #[arg(long)]
        credential_id: Option<String>,

        #[arg(long)]
        region: Option<String>,

        #[arg(long = "application")]
        application_name: Option<String>,
    },
}
