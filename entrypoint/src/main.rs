mod config;

use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::Command;

use secrecy::ExposeSecret;

use sluis_shared::{inject, KvClient};

use config::Config;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // load .env into environment vars, ignore if not found
    match dotenvy::dotenv().map(|_| ()) {
        Err(err) if err.not_found() => eprintln!("warn: no .env file found"),
        Err(err) => eprintln!("warn: error loading env vars: {}", err),
        Ok(()) => (),
    };

    // set-up logging
    tracing_subscriber::fmt::init();

    // create config from environment vars
    let config = Config::from_env()?;

    // file-based secrets mounted by the orchestrator
    if let Some(dir) = &config.secrets_dir {
        let dir = Path::new(dir);

        if dir.is_dir() {
            tracing::info!("injecting env vars from {}...", dir.display());

            for name in inject::inject_dir(dir)? {
                tracing::info!("  - {}", name);
            }
        } else {
            tracing::warn!("secrets dir {} not found, skipping", dir.display());
        }
    }

    // fetch the store secret and export the requested field
    let client = KvClient::new(
        config.vault_addr.clone(),
        config.vault_token.clone(),
        config.vault_mount.clone(),
    )?;
    let secret = client.get(&config.vault_secret)?;
    let value = secret.field(&config.vault_field)?;

    std::env::set_var(&config.target_var, value.expose_secret());
    tracing::info!(
        "exported {} from field '{}' of secret '{}'",
        config.target_var,
        config.vault_field,
        config.vault_secret
    );

    // run the pre-command, migrations and the like, before handing off
    if let Some(line) = &config.pre_command {
        run_pre_command(line)?;
    }

    // hand off to the container's main command
    let args = std::env::args().skip(1).collect::<Vec<String>>();
    let Some((cmd, args)) = args.split_first() else {
        eprintln!("usage: sluis <command> [args...]");
        std::process::exit(64);
    };

    tracing::info!("handing off to {}", cmd);
    let err = Command::new(cmd).args(args).exec();

    // exec only returns on failure
    tracing::error!("error starting command {}: {}", cmd, err);
    std::process::exit(126)
}

fn run_pre_command(line: &str) -> Result<(), Box<dyn std::error::Error>> {
    let Some((cmd, args)) = split_command(line) else {
        return Err("pre_command is empty".into());
    };

    tracing::info!("running pre-command: {}", line);
    let status = Command::new(cmd).args(args).status()?;

    if !status.success() {
        tracing::error!("pre-command exited with {}", status);
        std::process::exit(status.code().unwrap_or(1));
    }

    Ok(())
}

// whitespace-split argv, quoting isn't supported, wrap anything fancier
// in a script
fn split_command(line: &str) -> Option<(String, Vec<String>)> {
    let mut parts = line.split_whitespace().map(String::from);
    let cmd = parts.next()?;

    Some((cmd, parts.collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_command_test() {
        assert_eq!(
            split_command("app migrate --step 1"),
            Some((
                "app".to_string(),
                vec!["migrate".to_string(), "--step".to_string(), "1".to_string()]
            ))
        );

        assert_eq!(split_command("app"), Some(("app".to_string(), vec![])));
        assert_eq!(split_command("   "), None);
        assert_eq!(split_command(""), None);
    }
}
