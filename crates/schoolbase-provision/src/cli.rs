use clap::{Parser, ValueEnum};
use schoolbase_provision::{Backend, ProvisionConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "schoolbase-provision",
    about = "Create and seed the school management tables",
    version
)]
pub struct Cli {
    /// RON configuration file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Store endpoint URL (overrides DYNAMODB_ENDPOINT)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Region name (overrides DYNAMODB_REGION)
    #[arg(long)]
    pub region: Option<String>,

    /// Store to provision
    #[arg(long, value_enum)]
    pub backend: Option<BackendArg>,

    /// Database file for the local backend (in-memory when omitted)
    #[arg(long)]
    pub local_path: Option<PathBuf>,

    /// Catalog file or directory replacing the built-in school tables
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Delete the managed tables before provisioning
    #[arg(long)]
    pub reset: bool,

    /// Show informational logs
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all logs
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum BackendArg {
    Dynamo,
    Local,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Dynamo => Backend::Dynamo,
            BackendArg::Local => Backend::Local,
        }
    }
}

impl Cli {
    /// Layer command-line flags over a loaded configuration
    pub fn apply(&self, config: &mut ProvisionConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.dynamodb.endpoint = Some(endpoint.clone());
        }
        if let Some(region) = &self.region {
            config.dynamodb.region = region.clone();
        }
        if let Some(backend) = self.backend {
            config.backend = backend.into();
        }
        if let Some(path) = &self.local_path {
            config.local_path = Some(path.clone());
        }
        if let Some(path) = &self.catalog {
            config.catalog = Some(path.clone());
        }
        if self.reset {
            config.reset = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments() {
        let cli = Cli::try_parse_from(["schoolbase-provision"]).unwrap();
        let mut config = ProvisionConfig::default();
        cli.apply(&mut config);
        assert_eq!(config, ProvisionConfig::default());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "schoolbase-provision",
            "--endpoint",
            "http://dynamo:8000",
            "--backend",
            "local",
            "--reset",
        ])
        .unwrap();
        let mut config = ProvisionConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.dynamodb.endpoint.as_deref(), Some("http://dynamo:8000"));
        assert_eq!(config.backend, Backend::Local);
        assert!(config.reset);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["schoolbase-provision", "-v", "-q"]).is_err());
    }
}
