use crate::agents::{DeploymentUpdater, ListOption, OptionLister};
use crate::beanstalk::ClientFactory;
use crate::cli::ListTarget;
use crate::config::{DEFAULT_CONFIG_FILE, ReleaseConfig, ReleaseSection, Validation};
use crate::credentials::{FileCredentialStore, ResolutionContext};
use crate::error::Result;
use crate::iam;
use crate::messages;
use crate::utils::VariableContext;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::Path;
use std::time::Duration;

fn load_config(config_path: Option<&Path>) -> Result<ReleaseConfig> {
    match config_path {
        Some(path) => ReleaseConfig::load(path, true),
        None => ReleaseConfig::load(DEFAULT_CONFIG_FILE, false),
    }
}

/// Execute the release workflow. Returns whether the environment took the version.
pub fn execute_release(
    config_path: Option<&Path>,
    credentials_path: &Path,
    overrides: ReleaseSection,
    vars: &[String],
) -> Result<bool> {
    println!("{}", messages::DISPLAY_NAME.cyan().bold());

    // Step 1: Load and validate configuration
    println!("\n{}", "1. Loading release configuration...".yellow());
    let config = load_config(config_path)?;
    let request = config.release.merged_with(&overrides).to_request();
    request.ensure_valid()?;
    println!("   • application: {}", request.application_name.bright_cyan());
    println!("   • environment: {}", request.environment_id.bright_cyan());
    println!("   • region:      {}", request.region.bright_cyan());
    println!("{}", "✓ Configuration is valid".green());

    // Step 2: Collect the variables of this run
    println!("\n{}", "2. Collecting build variables...".yellow());
    let variables = VariableContext::from_env().with_overrides(vars)?;
    println!(
        "   Version label template: {}",
        request.version_label.dimmed()
    );

    // Step 3: Look up the version and update the environment
    println!("\n{}", "3. Updating environment...".yellow());
    let store = FileCredentialStore::new(credentials_path);
    let factory = ClientFactory::new(&config);
    let updater = DeploymentUpdater::new(&store, &factory)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Contacting Elastic Beanstalk...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let mut out = io::stdout();
    let updated = updater.attempt_update(&request, &variables, &mut out);
    spinner.finish_and_clear();

    if updated? {
        println!(
            "{}",
            format!("✓ Environment {} is updating", request.environment_id).green()
        );
        println!("\n{}", "✨ Release requested successfully!".green().bold());
        Ok(true)
    } else {
        println!(
            "{}",
            format!("✗ Release to environment {} failed", request.environment_id).red()
        );
        Ok(false)
    }
}

/// Execute the validate workflow. Returns whether every check passed.
pub fn execute_validate(
    config_path: Option<&Path>,
    credentials_path: &Path,
    overrides: ReleaseSection,
    check_credential: bool,
) -> Result<bool> {
    println!("{}", "Validating release configuration...".cyan().bold());

    let config = load_config(config_path)?;
    let request = config.release.merged_with(&overrides).to_request();

    let mut all_ok = true;
    println!();
    for (field, result) in request.validate() {
        all_ok &= print_validation(field, &result);
    }

    if check_credential {
        println!("\n{}", "Checking credential against AWS IAM...".yellow());
        let store = FileCredentialStore::new(credentials_path);
        let context = ResolutionContext::from_variables(&VariableContext::from_env());
        let result = iam::check_credential(&store, &request.credential_id, &context, &config);
        all_ok &= print_validation("credential", &result);
    }

    if all_ok {
        println!("\n{}", "✨ Configuration is valid".green().bold());
    } else {
        println!("\n{}", "Configuration has errors".red().bold());
    }
    Ok(all_ok)
}

fn print_validation(field: &str, result: &Validation) -> bool {
    match result {
        Validation::Ok => {
            println!("  {} {}", "✓".green(), field);
            true
        }
        Validation::Error(message) => {
            println!("  {} {}: {}", "✗".red(), field.white().bold(), message.red());
            false
        }
    }
}

/// Execute the list workflow
pub fn execute_list(
    config_path: Option<&Path>,
    credentials_path: &Path,
    target: ListTarget,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let defaults = &config.release;
    let store = FileCredentialStore::new(credentials_path);
    let factory = ClientFactory::new(&config);
    let context = ResolutionContext::from_variables(&VariableContext::from_env());
    let lister = OptionLister::new(&store, &factory, context);

    let pick = |value: Option<String>, fallback: &Option<String>| {
        value.or_else(|| fallback.clone()).unwrap_or_default()
    };

    let options = match target {
        ListTarget::Regions => OptionLister::regions(),
        ListTarget::Credentials => OptionLister::credentials(&store),
        ListTarget::Applications {
            credential_id,
            region,
        } => lister.applications(
            &pick(credential_id, &defaults.credential_id),
            &pick(region, &defaults.region),
        ),
        ListTarget::Environments {
            credential_id,
            region,
            application_name,
        } => lister.environments(
            &pick(credential_id, &defaults.credential_id),
            &pick(region, &defaults.region),
            &pick(application_name, &defaults.application_name),
        ),
    };

    print_options(&options, json)
}

fn print_options(options: &[ListOption], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(options)?);
        return Ok(());
    }

    for option in options {
        println!("{}\t{}", option.label, option.value);
    }
    Ok(())
}
