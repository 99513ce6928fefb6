//! Command dispatch: one function per subcommand.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::service::FlattenRequest;
use crate::application::{ApplicationError, ResultExt, TreeService};
use crate::cli::args::{Cli, Commands, ConfigCommands, IntentKind};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{DomainError, DropIntent};
use crate::tree_traits::TreeNodeConvert;

/// Execute the parsed command line.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, run with --help for usage".into(),
        ));
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let project_dir = cli.project_dir.as_deref().unwrap_or(Path::new("."));
    if let Commands::Config { command } = command {
        return execute_config(command, project_dir);
    }

    let settings = Settings::load(Some(project_dir))?;
    debug!(?settings, "settings loaded");
    let service = TreeService::new(settings);

    match command {
        Commands::Build { file, strict } => cmd_build(&service, file, *strict),
        Commands::Check { file } => cmd_check(&service, file),
        Commands::Flatten {
            file,
            collapse,
            all,
            drag,
            json,
        } => {
            let request = FlattenRequest {
                collapsed: collapse.clone(),
                all: *all,
                drag_root: drag.clone(),
            };
            cmd_flatten(&service, file, &request, *json)
        }
        Commands::Move {
            file,
            dragged,
            target,
            intent,
            output,
        } => cmd_move(&service, file, dragged, target, *intent, output.as_deref()),
        Commands::Show { file } => cmd_show(&service, file),
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}

#[instrument(skip(service))]
fn cmd_build(service: &TreeService, file: &Path, strict: bool) -> CliResult<()> {
    let records = service.records_from_value(service.read_document(file)?)?;
    let roots = service.build(&records, strict)?;
    output::info(&service.render(&service.tree_to_value(&roots))?);
    Ok(())
}

#[instrument(skip(service))]
fn cmd_check(service: &TreeService, file: &Path) -> CliResult<()> {
    let records = service.records_from_value(service.read_document(file)?)?;
    match service.find_cycle(&records) {
        Some(id) => {
            output::failure(&format!("parent links loop through '{id}'"));
            Err(DomainError::CircularDependency { id }.into())
        }
        None => {
            output::success(&format!("no circular dependencies in {} record(s)", records.len()));
            Ok(())
        }
    }
}

#[instrument(skip(service))]
fn cmd_flatten(
    service: &TreeService,
    file: &Path,
    request: &FlattenRequest,
    json: bool,
) -> CliResult<()> {
    let roots = service.tree_from_value(service.read_document(file)?)?;
    let rows = service.flatten(&roots, request)?;
    if json {
        let value = serde_json::to_value(&rows).map_err(ApplicationError::from)?;
        output::info(&service.render(&value)?);
        return Ok(());
    }
    for row in &rows {
        output::info(&output::row_line(row, &service.label(row.id(), row.data)));
    }
    Ok(())
}

#[instrument(skip(service))]
fn cmd_move(
    service: &TreeService,
    file: &Path,
    dragged: &str,
    target: &str,
    intent: IntentKind,
    output_path: Option<&Path>,
) -> CliResult<()> {
    let dragged = service.parse_path(dragged);
    let target = service.parse_path(target);
    if dragged.is_empty() || target.is_empty() {
        return Err(CliError::InvalidArgs(
            "--dragged and --target need at least one id".into(),
        ));
    }
    let intent = match intent {
        IntentKind::Before => DropIntent::Before(target),
        IntentKind::After => DropIntent::After(target),
        IntentKind::Inside => DropIntent::Inside(target),
    };

    let roots = service.tree_from_value(service.read_document(file)?)?;
    let updated = service.apply_drop(&roots, &dragged, &intent)?;
    let value = service.tree_to_value(&updated);

    match output_path {
        Some(path) => {
            service.write_document(path, &value)?;
            let moved = format!("{} -> {}", service.format_path(&dragged), path.display());
            output::action("Moved", &moved);
        }
        None => output::info(&service.render(&value)?),
    }
    Ok(())
}

#[instrument(skip(service))]
fn cmd_show(service: &TreeService, file: &Path) -> CliResult<()> {
    let roots = service.tree_from_value(service.read_document(file)?)?;
    let arena = service.arena(&roots)?;
    let rendered = arena.to_tree_string(|node| service.label(&node.key, &node.data));
    let mut stdout = io::stdout().lock();
    for tree in rendered {
        write!(stdout, "{tree}").with_path_context("write tree", Path::new("-"))?;
    }
    Ok(())
}

fn execute_config(command: &ConfigCommands, project_dir: &Path) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(project_dir))?;
            output::header("Effective configuration");
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            output::header("Config files");
            let global = global_config_path();
            output::detail(&describe_path("global", global.as_deref()));
            let local: PathBuf = local_config_path(project_dir);
            output::detail(&describe_path("local", Some(&local)));
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}

fn describe_path(label: &str, path: Option<&Path>) -> String {
    match path {
        Some(path) if path.exists() => format!("{label}: {}", path.display()),
        Some(path) => format!("{label}: {} (not found)", path.display()),
        None => format!("{label}: (no config directory)"),
    }
}
