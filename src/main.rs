use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use git_tag_semver::config::{self, BackendKind};
use git_tag_semver::git::{Git2Backend, GitCli, VcsBackend};
use git_tag_semver::{runner, ui, ReleaseType, RunOutcome, RunSettings, TagSemverHandler};

#[derive(clap::Parser)]
#[command(
    name = "git-tag-semver",
    version,
    about = "Compute the next semantic-version tags (vX, vX.Y, vX.Y.Z) and publish them to a remote"
)]
struct Args {
    #[arg(
        short,
        long,
        env = "INPUT_VERSION",
        help = "Release type: patch, minor or major"
    )]
    release_type: String,

    #[arg(long, env = "INPUT_DRY-RUN", help = "Compute the tags without creating or pushing them")]
    dry_run: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Remote name or URL to read tags from and push to")]
    remote: Option<String>,

    #[arg(long, value_enum, help = "Git implementation to use")]
    backend: Option<BackendKind>,

    #[arg(long, help = "Glob selecting version tags on the remote")]
    tag_pattern: Option<String>,

    #[arg(long, help = "Revision the new tags point at")]
    target: Option<String>,

    #[arg(long, default_value = ".", help = "Path of the git repository")]
    repo: PathBuf,

    #[arg(
        long,
        env = "INPUT_GITHUB-TOKEN",
        hide_env_values = true,
        help = "Token used to push to github.com/<GITHUB_REPOSITORY>"
    )]
    github_token: Option<String>,

    #[arg(long, env = "GITHUB_REPOSITORY", help = "owner/name of the GitHub repository")]
    github_repository: Option<String>,
}

fn main() {
    let args = Args::parse();

    if let Err(err) = run(args) {
        let message = format!("{:#}", err);
        if runner::is_github_actions() {
            runner::set_failed(&message);
        } else {
            ui::display_error(&message);
        }
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    // Validated before anything touches the repository or the remote.
    let release_type: ReleaseType = args.release_type.parse()?;

    let mut config = config::load_config(args.config.as_deref())
        .context("Failed to load configuration")?;

    if let Some(remote) = args.remote {
        config.remote.name = remote;
    }
    let token = args.github_token.filter(|t| !t.is_empty());
    let repository = args.github_repository.filter(|r| !r.is_empty());
    if let (Some(token), Some(repository)) = (token, repository) {
        config.remote.name = config::github_remote_url(&token, &repository);
    }
    if let Some(pattern) = args.tag_pattern {
        config.tags.pattern = pattern;
    }
    if let Some(target) = args.target {
        config.tags.target = target;
    }
    if let Some(backend) = args.backend {
        config.behavior.backend = backend;
    }
    config.behavior.dry_run |= args.dry_run;

    if runner::is_debug() {
        runner::debug(&format!("release type: {}, config: {:?}", release_type, config));
    }

    let settings = RunSettings::from_config(&config);
    let outcome = match config.behavior.backend {
        BackendKind::GitCli => execute(GitCli::new(&args.repo), settings, release_type)?,
        BackendKind::Libgit2 => {
            let backend = Git2Backend::open(&args.repo).with_context(|| {
                format!("Failed to open git repository at {}", args.repo.display())
            })?;
            execute(backend, settings, release_type)?
        }
    };

    ui::display_outcome(&outcome);
    emit_outputs(&outcome)
}

fn execute<B: VcsBackend>(
    backend: B,
    settings: RunSettings,
    release_type: ReleaseType,
) -> Result<RunOutcome> {
    TagSemverHandler::new(backend, settings)
        .run(release_type)
        .with_context(|| format!("Failed to publish {} release tags", release_type))
}

fn emit_outputs(outcome: &RunOutcome) -> Result<()> {
    let outputs = [
        ("tags", serde_json::to_string(&outcome.tags)?),
        ("version", outcome.version.to_string()),
        ("major-tag", outcome.tags.major.clone()),
        ("minor-tag", outcome.tags.minor.clone()),
        ("full-tag", outcome.tags.full.clone()),
        ("published", outcome.published.to_string()),
    ];

    for (name, value) in outputs {
        if runner::is_debug() {
            runner::debug(&format!("setting output {}={}", name, value));
        }
        runner::set_output(name, &value)
            .with_context(|| format!("Failed to set output '{}'", name))?;
    }
    Ok(())
}
