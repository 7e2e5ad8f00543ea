// SPDX-FileCopyrightText: 2026 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use gitig::{
    catalog::{similar_names, suggestion_hint, Catalog},
    config::Settings,
    document::{DocumentError, IgnoreFile},
    fetch::{LocalSource, RemoteSource, TemplateSource},
    path::settings_file,
    store::TemplateStore,
};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::{fmt::Write as _, path::{Path, PathBuf}, process::exit};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    override_usage = "\n  gitig [options] <command> [<template>]...",
    subcommand_help_heading = "Commands",
    version
)]
struct Cli {
    /// Target ignore file to manage.
    #[arg(
        short,
        long,
        global = true,
        default_value = ".gitignore",
        value_name = "path"
    )]
    file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn run(self) -> Result<()> {
        match self.command {
            Command::Add(opts) => run_add(&self.file, opts, false),
            Command::Create(opts) => run_add(&self.file, opts, true),
            Command::Remove(opts) => run_remove(&self.file, opts),
            Command::Update => run_update(&self.file),
            Command::Clear => run_clear(&self.file),
            Command::List => run_list(&self.file),
            Command::Local(opts) => run_local(opts),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Add templates to the ignore file.
    #[command(override_usage = "gitig add [options] <template>...")]
    Add(AddOptions),

    /// Create a new ignore file, optionally adding templates to it.
    #[command(override_usage = "gitig create [options] [<template>]...")]
    Create(AddOptions),

    /// Remove templates from the ignore file.
    #[command(override_usage = "gitig remove [options] <template>...")]
    Remove(RemoveOptions),

    /// Re-fetch every template in the ignore file.
    #[command(override_usage = "gitig update [options]")]
    Update,

    /// Remove all templates from the ignore file.
    #[command(override_usage = "gitig clear [options]")]
    Clear,

    /// Print a sorted listing of all templates in the ignore file.
    #[command(override_usage = "gitig list [options]")]
    List,

    /// Manage the local template directory setting.
    #[command(override_usage = "gitig local <set|reset|show>")]
    Local(LocalOptions),
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct AddOptions {
    /// Template identifiers to add or update.
    #[arg(value_name = "template")]
    templates: Vec<String>,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct RemoveOptions {
    /// Template identifiers to remove.
    #[arg(required = true, value_name = "template")]
    templates: Vec<String>,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct LocalOptions {
    #[command(subcommand)]
    action: LocalAction,
}

#[derive(Debug, Clone, Subcommand)]
enum LocalAction {
    /// Set a local directory to fetch templates from.
    Set {
        /// Directory containing a clone of the template repository.
        #[arg(value_name = "directory")]
        directory: PathBuf,
    },

    /// Reset the local directory so fetches go upstream again.
    Reset,

    /// Show the current local directory setting.
    Show,
}

fn main() {
    let layer = fmt::layer().compact();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    tracing_subscriber::registry().with(layer).with(filter).init();

    if let Err(error) = run() {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

fn run() -> Result<()> {
    Cli::parse().run()
}

fn run_add(file: &Path, opts: AddOptions, create: bool) -> Result<()> {
    if !create && opts.templates.is_empty() {
        return Err(anyhow!("no templates provided"));
    }

    let settings = Settings::load(settings_file()?)?;
    let (catalog, source) = template_context(&settings)?;

    if create || !file.exists() {
        std::fs::write(file, "")?;
        println!("{} created", file.display());
    }

    let document = load_document(file, &catalog)?;
    let mut store = TemplateStore::new(document, &catalog, source);
    for name in &opts.templates {
        store.add(name)?;
    }

    print_outcomes(&store);
    store.into_document().save(file, &catalog)?;

    Ok(())
}

fn run_remove(file: &Path, opts: RemoveOptions) -> Result<()> {
    let settings = Settings::load(settings_file()?)?;
    let (catalog, source) = template_context(&settings)?;

    let document = load_document(file, &catalog)?;
    let mut store = TemplateStore::new(document, &catalog, source);
    for name in &opts.templates {
        store.remove(name)?;
    }

    print_outcomes(&store);
    store.into_document().save(file, &catalog)?;

    Ok(())
}

fn run_update(file: &Path) -> Result<()> {
    let settings = Settings::load(settings_file()?)?;
    let (catalog, source) = template_context(&settings)?;

    let document = load_document(file, &catalog)?;
    let mut store = TemplateStore::new(document, &catalog, source);
    store.update()?;

    print_outcomes(&store);
    store.into_document().save(file, &catalog)?;

    Ok(())
}

fn run_clear(file: &Path) -> Result<()> {
    let settings = Settings::load(settings_file()?)?;
    let (catalog, source) = template_context(&settings)?;

    let document = load_document(file, &catalog)?;
    let mut store = TemplateStore::new(document, &catalog, source);
    store.clear();
    println!("file cleared");

    store.into_document().save(file, &catalog)?;

    Ok(())
}

fn run_list(file: &Path) -> Result<()> {
    let settings = Settings::load(settings_file()?)?;
    let (catalog, source) = template_context(&settings)?;

    let document = load_document(file, &catalog)?;
    let store = TemplateStore::new(document, &catalog, source);
    for name in store.list() {
        println!("{name}");
    }

    Ok(())
}

fn run_local(opts: LocalOptions) -> Result<()> {
    let settings_path = settings_file()?;
    let mut settings = Settings::load(&settings_path)?;

    match opts.action {
        LocalAction::Set { directory } => {
            // Scan up front so a bogus directory never gets persisted.
            Catalog::from_directory(&directory)?;
            settings.local_templates = Some(directory.clone());
            settings.save(&settings_path)?;
            println!("local path set to \"{}\"", directory.display());
        }
        LocalAction::Reset => {
            settings.local_templates = None;
            settings.save(&settings_path)?;
            println!("local path reset");
        }
        LocalAction::Show => match &settings.local_templates {
            Some(path) => println!("local path set to \"{}\"", path.display()),
            None => println!("local path is not set"),
        },
    }

    Ok(())
}

/// Pick catalog and fetch source for this run based on persisted settings.
fn template_context(settings: &Settings) -> Result<(Catalog, TemplateSource)> {
    match &settings.local_templates {
        Some(root) => Ok((
            Catalog::from_directory(root)?,
            TemplateSource::Local(LocalSource::new(root)),
        )),
        None => Ok((
            Catalog::builtin(),
            TemplateSource::Remote(RemoteSource::upstream()?),
        )),
    }
}

/// Parse the target file, reporting every unresolvable block in one pass.
fn load_document(file: &Path, catalog: &Catalog) -> Result<IgnoreFile> {
    if !file.exists() {
        return Err(anyhow!("no {} file found", file.display()));
    }

    let document = IgnoreFile::load(file)?;
    if let Err(DocumentError::UnknownTemplates { names }) = document.validate(catalog) {
        let mut message = format!("invalid {} file", file.display());
        for name in &names {
            write!(message, "\nError: unknown template \"{name}\"")?;
            let hint = suggestion_hint(&similar_names(name, catalog.identifiers()));
            if !hint.is_empty() {
                write!(message, "\n{hint}")?;
            }
        }
        return Err(anyhow!(message));
    }

    Ok(document)
}

fn print_outcomes<F: gitig::Fetch>(store: &TemplateStore<'_, F>) {
    for outcome in store.outcomes() {
        println!("{outcome}");
    }
}
