use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;

use folio_core::{import_directory, ProjectStore, ProjectStoreConfig, VersionId, DEFAULT_PAGE};
use folio_server::{FolioServer, ServerConfig};

use crate::cli::*;

/// Store root used by the offline commands when `--data-dir` is absent.
const DEFAULT_DATA_DIR: &str = ".folio";

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    let data_dir = cli.data_dir;
    match cli.command {
        Command::Serve(args) => cmd_serve(args, data_dir),
        Command::Import(args) => cmd_import(args, &open_store(data_dir.as_deref())?, format),
        Command::Projects => cmd_projects(&open_store(data_dir.as_deref())?, format),
        Command::Versions(args) => cmd_versions(args, &open_store(data_dir.as_deref())?, format),
        Command::Show(args) => cmd_show(args, &open_store(data_dir.as_deref())?, format),
        Command::Cat(args) => cmd_cat(args, &open_store(data_dir.as_deref())?),
    }
}

fn open_store(data_dir: Option<&Path>) -> anyhow::Result<ProjectStore> {
    let dir = data_dir.unwrap_or(Path::new(DEFAULT_DATA_DIR));
    ProjectStore::open(dir, ProjectStoreConfig::default())
        .with_context(|| format!("cannot open store at {}", dir.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_version(version: Option<&str>) -> anyhow::Result<Option<VersionId>> {
    version
        .map(|v| VersionId::parse(v).with_context(|| format!("invalid version id {v:?}")))
        .transpose()
}

fn cmd_serve(args: ServeArgs, data_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("cannot load config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if data_dir.is_some() {
        config.data_dir = data_dir;
    }
    if let Some(bind) = &args.bind {
        config.bind_addr = bind
            .parse()
            .with_context(|| format!("invalid bind address {bind:?}"))?;
    }

    let server = FolioServer::new(config)?;
    for dir in &args.import {
        let report = import_directory(server.store(), dir)
            .with_context(|| format!("cannot import {}", dir.display()))?;
        tracing::info!(project = %report.project, pages = report.pages, "bootstrapped project");
    }

    println!(
        "{} Folio on {} (projects at *.{})",
        "✓".green().bold(),
        server.config().bind_addr.to_string().bold(),
        server.config().base_domain
    );
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_import(args: ImportArgs, store: &ProjectStore, format: OutputFormat) -> anyhow::Result<()> {
    let mut reports = Vec::with_capacity(args.dirs.len());
    for dir in &args.dirs {
        let report = import_directory(store, dir)
            .with_context(|| format!("cannot import {}", dir.display()))?;
        if format == OutputFormat::Text {
            let verb = if report.created { "Created" } else { "Updated" };
            println!(
                "{} {} {} ({} pages) at {}",
                "✓".green().bold(),
                verb,
                report.project.to_string().bold(),
                report.pages,
                report.version_id.to_string().yellow()
            );
        }
        reports.push(report);
    }
    if format == OutputFormat::Json {
        print_json(&reports)?;
    }
    Ok(())
}

fn cmd_projects(store: &ProjectStore, format: OutputFormat) -> anyhow::Result<()> {
    let projects = store.list_projects()?;
    if format == OutputFormat::Json {
        return print_json(&projects);
    }
    if projects.is_empty() {
        println!("No projects.");
    }
    for project in &projects {
        println!(
            "{}  {}  {}",
            project.name.to_string().bold(),
            project.live_version_id.to_string().yellow(),
            project.created_at.format("%Y-%m-%d %H:%M:%S").to_string().dimmed()
        );
    }
    Ok(())
}

fn cmd_versions(args: VersionsArgs, store: &ProjectStore, format: OutputFormat) -> anyhow::Result<()> {
    let versions = store.list_project_versions(&args.name)?;
    if format == OutputFormat::Json {
        return print_json(&versions);
    }
    for (i, version) in versions.iter().enumerate() {
        let marker = if i == 0 { "(live)".green().to_string() } else { String::new() };
        println!(
            "{}  {}  {}",
            version.id.to_string().yellow().bold(),
            version.created_at.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
            marker
        );
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, store: &ProjectStore, format: OutputFormat) -> anyhow::Result<()> {
    let version = parse_version(args.version.as_deref())?;
    let view = store.get_project(&args.name, version.as_ref())?;
    if format == OutputFormat::Json {
        return print_json(&view);
    }

    let state = if view.is_live() { "live".green() } else { "historical".dimmed() };
    println!(
        "Project {} at {} ({})",
        view.project.name.to_string().bold(),
        view.version.id.to_string().yellow(),
        state
    );
    if let Some(parent) = &view.version.parent_id {
        println!("  Parent: {}", parent.to_string().yellow());
    }
    for page in &view.pages {
        println!("  {}  {}", page.hash.short_hex().cyan(), page.name);
    }
    Ok(())
}

fn cmd_cat(args: CatArgs, store: &ProjectStore) -> anyhow::Result<()> {
    let version = parse_version(args.version.as_deref())?;
    let page = args.page.as_deref().unwrap_or(DEFAULT_PAGE);
    let content = store.page_content(&args.project, page, version.as_ref())?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&content)?;
    stdout.flush()?;
    Ok(())
}
