//! Argument parsing and the latest-tag command.
//!
//! Every setting can be given as a flag or through its environment variable;
//! flags take precedence.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tracing::info;

use tagscout_registry::config::{env, require};
use tagscout_registry::{Credentials, RegistryClient, RegistryConfig, RegistryError};

/// Tagscout - print the most recently created tag of a registry repository
#[derive(Parser)]
#[command(name = "tagscout")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Token realm URL [default: https://container-registry.oracle.com/auth]
    #[arg(long, env = env::REALM)]
    pub realm: Option<String>,

    /// Token service name [default: Oracle Registry]
    #[arg(long, env = env::SERVICE)]
    pub service: Option<String>,

    /// Registry host or base URL [default: container-registry.oracle.com]
    #[arg(long, env = env::REGISTRY)]
    pub registry: Option<String>,

    /// Repository path (e.g., `os/oraclelinux`)
    #[arg(long, env = env::REPOSITORY)]
    pub repository: Option<String>,

    /// Username for the token exchange
    #[arg(short, long, env = env::USERNAME)]
    pub username: Option<String>,

    /// Password for the token exchange
    #[arg(long, env = env::PASSWORD, hide_env_values = true)]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[arg(
        long,
        env = env::TIMEOUT,
        default_value = "30",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,
}

impl Cli {
    /// Builds the registry configuration, checking required settings.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::MissingConfig`] for the first required
    /// setting that is absent or empty.
    pub fn to_config(&self) -> Result<RegistryConfig, RegistryError> {
        let repository = require(env::REPOSITORY, self.repository.clone())?;
        let username = require(env::USERNAME, self.username.clone())?;
        let password = require(env::PASSWORD, self.password.clone())?;

        let mut config = RegistryConfig::new(repository, Credentials::new(username, password))
            .with_timeout(Duration::from_secs(self.timeout));

        if let Some(realm) = non_empty(self.realm.as_deref()) {
            config = config.with_realm(realm);
        }
        if let Some(service) = non_empty(self.service.as_deref()) {
            config = config.with_service(service);
        }
        if let Some(registry) = non_empty(self.registry.as_deref()) {
            config = config.with_registry(registry);
        }

        Ok(config)
    }
}

/// Process exit code for an argument error.
///
/// Help and version requests succeed; every rejected argument is a fatal
/// configuration error and exits with 1.
#[must_use]
pub fn exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Resolves the latest tag and prints it as JSON on stdout.
///
/// Configuration is validated before any request is made.
///
/// # Errors
///
/// Returns an error if:
/// - A required setting is missing
/// - The token exchange fails
/// - The repository has no tags or no tag with a digest
/// - Any registry request fails
pub fn run(cli: &Cli) -> Result<()> {
    let config = cli.to_config()?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create async runtime")?;
    let output = rt.block_on(run_async(config))?;

    println!("{output}");
    Ok(())
}

async fn run_async(config: RegistryConfig) -> Result<String> {
    let client = RegistryClient::new(config).context("Failed to create registry client")?;
    info!(
        registry = %client.config().base_url(),
        repository = %client.config().repository,
        "Resolving latest tag"
    );

    let report = client
        .find_latest()
        .await
        .context("Failed to resolve latest tag")?;

    report.to_json().context("Failed to serialize result")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cli() -> Cli {
        Cli {
            realm: None,
            service: None,
            registry: None,
            repository: Some("os/oraclelinux".to_string()),
            username: Some("user".to_string()),
            password: Some("pass".to_string()),
            timeout: 30,
        }
    }

    #[test]
    fn test_to_config_defaults() {
        let config = base_cli().to_config().unwrap();
        assert_eq!(config.repository, "os/oraclelinux");
        assert_eq!(config.realm, "https://container-registry.oracle.com/auth");
        assert_eq!(config.service, "Oracle Registry");
        assert_eq!(config.base_url(), "https://container-registry.oracle.com");
        assert_eq!(config.credentials, Credentials::new("user", "pass"));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_to_config_overrides() {
        let cli = Cli {
            realm: Some("https://auth.example.com/token".to_string()),
            service: Some("example".to_string()),
            registry: Some("registry.example.com".to_string()),
            timeout: 5,
            ..base_cli()
        };

        let config = cli.to_config().unwrap();
        assert_eq!(config.realm, "https://auth.example.com/token");
        assert_eq!(config.service, "example");
        assert_eq!(config.base_url(), "https://registry.example.com");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_to_config_empty_optional_uses_default() {
        let cli = Cli {
            registry: Some(String::new()),
            ..base_cli()
        };
        let config = cli.to_config().unwrap();
        assert_eq!(config.registry, "container-registry.oracle.com");
    }

    #[test]
    fn test_missing_repository() {
        let cli = Cli {
            repository: None,
            ..base_cli()
        };
        let err = cli.to_config().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Environment variable BASE_IMAGE_REPOSITORY is required"
        );
    }

    #[test]
    fn test_missing_credentials() {
        let cli = Cli {
            username: Some(String::new()),
            ..base_cli()
        };
        assert!(matches!(
            cli.to_config(),
            Err(RegistryError::MissingConfig { name: "OCR_USERNAME" })
        ));

        let cli = Cli {
            password: None,
            ..base_cli()
        };
        assert!(matches!(
            cli.to_config(),
            Err(RegistryError::MissingConfig { name: "OCR_PASSWORD" })
        ));
    }

    #[test]
    fn test_run_fails_before_network_without_repository() {
        let cli = Cli {
            repository: None,
            registry: Some("http://127.0.0.1:9".to_string()),
            ..base_cli()
        };

        let err = run(&cli).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RegistryError>(),
            Some(RegistryError::MissingConfig {
                name: "BASE_IMAGE_REPOSITORY"
            })
        ));
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "tagscout",
            "--repository",
            "team/app",
            "--username",
            "user",
            "--password",
            "pass",
            "--timeout",
            "10",
        ])
        .unwrap();

        assert_eq!(cli.repository.as_deref(), Some("team/app"));
        assert_eq!(cli.timeout, 10);
    }

    fn parse(extra: &[&str]) -> Result<Cli, clap::Error> {
        let mut args = vec![
            "tagscout",
            "--repository",
            "team/app",
            "--username",
            "user",
            "--password",
            "pass",
        ];
        args.extend_from_slice(extra);
        Cli::try_parse_from(args)
    }

    #[test]
    fn test_invalid_timeout_exits_with_one() {
        let err = parse(&["--timeout", "abc"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert_eq!(exit_code(&err), 1);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = parse(&["--timeout", "0"]).err().unwrap();
        assert_eq!(exit_code(&err), 1);
    }

    #[test]
    fn test_unknown_flag_exits_with_one() {
        let err = parse(&["--bogus"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        assert_eq!(exit_code(&err), 1);
    }

    #[test]
    fn test_help_names_environment_variables() {
        use clap::CommandFactory;

        let help = Cli::command().render_help().to_string();
        for name in [
            env::REALM,
            env::SERVICE,
            env::REGISTRY,
            env::REPOSITORY,
            env::USERNAME,
            env::PASSWORD,
            env::TIMEOUT,
        ] {
            assert!(help.contains(name), "help is missing {name}");
        }
    }

    #[test]
    fn test_help_and_version_exit_with_zero() {
        let help = parse(&["--help"]).err().unwrap();
        assert_eq!(help.kind(), ErrorKind::DisplayHelp);
        assert_eq!(exit_code(&help), 0);

        let version = parse(&["--version"]).err().unwrap();
        assert_eq!(version.kind(), ErrorKind::DisplayVersion);
        assert_eq!(exit_code(&version), 0);
    }
}
