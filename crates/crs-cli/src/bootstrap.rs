use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use crs_config::MirrorConfig;
use crs_gitlab::GitLabClient;
use crs_scores::ExtractOptions;
use crs_walker::{RetryPolicy, WalkOptions};

use crate::cli::{Cli, ExtractArgs};

/// Directory under the mirror root that extracted scores go to.
pub const EXTRACTED_DIR_NAME: &str = "extracted_scores";

/// Load layered configuration, apply CLI overrides and validate the result.
pub fn load_config(cli: &Cli) -> anyhow::Result<MirrorConfig> {
    let config = load_unvalidated(cli)?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Load layered configuration with CLI overrides, for commands that never
/// talk to GitLab and so need no token.
pub fn load_unvalidated(cli: &Cli) -> anyhow::Result<MirrorConfig> {
    let mut config = MirrorConfig::load_with_dotenv(cli.env_file.as_deref())
        .context("failed to load configuration")?;
    apply_overrides(&mut config, cli);
    Ok(config)
}

fn apply_overrides(config: &mut MirrorConfig, cli: &Cli) {
    if let Some(group) = &cli.group {
        config.gitlab.root_group.clone_from(group);
    }
    if let Some(output) = &cli.output {
        config.output.root = output.display().to_string();
    }
    if let Some(git_ref) = &cli.git_ref {
        config.gitlab.git_ref.clone_from(git_ref);
    }
    if let Some(url) = &cli.api_url {
        config.gitlab.api_base_url.clone_from(url);
    }
    if cli.force {
        config.output.overwrite = true;
    }
}

pub fn walk_options(config: &MirrorConfig, dry_run: bool) -> WalkOptions {
    WalkOptions {
        git_ref: config.gitlab.git_ref().map(str::to_string),
        overwrite: config.output.overwrite,
        dry_run,
        extensions: config.output.extensions.clone(),
        retry: RetryPolicy {
            max_attempts: config.retry.max_attempts,
            base_delay: config.retry.base_delay(),
            max_delay: config.retry.max_delay(),
            max_retry_after: config.retry.max_retry_after(),
        },
        ..WalkOptions::new(
            config.gitlab.root_group.clone(),
            PathBuf::from(&config.output.root),
        )
    }
}

/// Extraction reads the mirror root and writes beside it unless told otherwise.
pub fn extract_options(config: &MirrorConfig, args: &ExtractArgs) -> ExtractOptions {
    let mirror_root = PathBuf::from(&config.output.root);
    ExtractOptions::new(
        args.input.clone().unwrap_or_else(|| mirror_root.clone()),
        args.output
            .clone()
            .unwrap_or_else(|| mirror_root.join(EXTRACTED_DIR_NAME)),
    )
}

pub fn client(config: &MirrorConfig) -> anyhow::Result<GitLabClient> {
    GitLabClient::new(
        &config.gitlab.api_base_url,
        &config.gitlab.token,
        config.gitlab.per_page,
        Duration::from_secs(config.gitlab.timeout_secs),
    )
    .context("failed to build GitLab HTTP client")
}
