use std::{io, io::Write, path::PathBuf};

use akv_keygen_workflow::KeyGenerationOptions;
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::{command::run_generate, config::Config, error, shadow};

#[derive(Debug, Parser)]
#[command(author,
    version,
    long_version = shadow::CLAP_LONG_VERSION,
    about,
    long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(
        long = "config",
        short = 'c',
        env = "AKV_KEYGEN_CONFIG_FILE_PATH",
        global = true,
        help = "Specify a configuration file"
    )]
    config_file_path: Option<PathBuf>,

    #[clap(
        long = "log-filters",
        env = "AKV_KEYGEN_LOG",
        global = true,
        help = "Override log filter directives, e.g. `debug`"
    )]
    log_filters: Option<String>,

    #[clap(long, short = 'q', global = true, help = "Only log errors")]
    quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[clap(about = "Print version information")]
    Version,

    #[clap(about = "Output shell completion code for the specified shell (bash, zsh, fish)")]
    Completion { shell: Shell },

    #[clap(about = "Output default configuration")]
    DefaultConfig,

    #[clap(about = "Generate an encryption key and key version and store them in Azure Key Vault")]
    #[command(visible_alias = "run")]
    Generate(GenerateArgs),
}

#[derive(Clone, Debug, Args)]
pub struct GenerateArgs {
    #[arg(short = 's', long, help = "Subscription id")]
    pub subscription_id: String,

    #[arg(short = 'r', long, help = "Name of the resource group")]
    pub resource_group: String,

    #[arg(short = 'l', long, help = "Location of the key vault")]
    pub location: String,

    #[arg(short = 'v', long, help = "Name of the key vault")]
    pub vault_name: String,

    #[arg(
        short = 'k',
        long,
        help = "Name of the key, 'secret--encryption--symmetricKey' unless configured otherwise"
    )]
    pub key_name: Option<String>,

    #[arg(
        short = 'y',
        long,
        help = "Name of the key version, 'secret--encryption--symmetricKeyVersion' unless \
                configured otherwise"
    )]
    pub key_version_name: Option<String>,

    #[arg(
        short = 'e',
        long,
        value_name = "YYYY-MM-DD",
        help = "Expiration date of the key, 90 days from today unless specified"
    )]
    pub expiration: Option<String>,

    #[arg(
        short = 't',
        long,
        value_name = "KEY=VALUE,...",
        help = "Tags added to both secrets, 'user=<login name>' unless specified"
    )]
    pub tags: Option<String>,

    #[arg(
        short = 'd',
        long,
        alias = "dry_run",
        value_name = "BOOL",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true",
        help = "Log what would be created without touching the key vault; pass `--dry-run=false` \
                to write the secrets"
    )]
    pub dry_run: bool,
}

impl From<GenerateArgs> for KeyGenerationOptions {
    fn from(
        GenerateArgs {
            subscription_id,
            resource_group,
            location,
            vault_name,
            key_name,
            key_version_name,
            expiration,
            tags,
            dry_run,
        }: GenerateArgs,
    ) -> Self {
        Self {
            subscription_id,
            resource_group,
            location,
            vault_name,
            key_name,
            key_version_name,
            expiration,
            tags,
            dry_run,
        }
    }
}

impl Cli {
    pub fn run(self) -> Result<(), Box<error::Error>> {
        match self.command {
            Command::Version => {
                io::stdout()
                    .write_all(Self::command().render_long_version().as_bytes())
                    .expect("failed to write to stdout");
            }
            Command::Completion { shell } => {
                let mut command = Self::command();
                let bin_name = command.get_name().to_string();
                clap_complete::generate(shell, &mut command, bin_name, &mut io::stdout());
            }
            Command::DefaultConfig => {
                let config_text =
                    serde_yaml::to_string(&Config::default()).expect("`Config` is serializable");
                io::stdout().write_all(config_text.as_bytes()).expect("failed to write to stdout");
            }
            Command::Generate(ref args) => {
                let config = self.load_config()?;
                let _ = run_generate(config, args.clone().into())?;
            }
        }

        Ok(())
    }

    #[allow(clippy::result_large_err)]
    fn load_config(&self) -> Result<Config, error::Error> {
        let mut config = Config::load_or_default(self.config_file_path.as_deref())?;

        if let Some(log_filters) = &self.log_filters {
            config.log = config.log.with_log_filters(log_filters.as_str());
        }
        if self.quiet {
            config.log = config.log.quiet();
        }

        Ok(config)
    }
}
