// SPDX-FileCopyrightText: 2026 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Full run cycle against a local template directory.
//!
//! Mirrors what the CLI does per invocation: build catalog and source from a
//! directory, parse the target file, mutate the block set, flush, and parse
//! again on the next run.

use gitig::{Catalog, IgnoreFile, LocalSource, TemplateStore};

use anyhow::Result;
use indoc::indoc;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

/// Local template clone with a link edge C -> C++ and one grouped template.
fn template_dir() -> Result<TempDir> {
    let root = tempfile::tempdir()?;
    fs::write(root.path().join("C.gitignore"), "# c++.gitignore\n*.o\n")?;
    fs::write(root.path().join("C++.gitignore"), "*.obj\n")?;
    fs::write(root.path().join("Python.gitignore"), "__pycache__/\n")?;
    fs::create_dir(root.path().join("Global"))?;
    fs::write(root.path().join("Global/Redis.gitignore"), "*.rdb\n")?;

    Ok(root)
}

#[test]
fn add_then_remove_restores_original_file() -> Result<()> {
    let templates = template_dir()?;
    let workdir = tempfile::tempdir()?;
    let target = workdir.path().join(".gitignore");
    fs::write(&target, "# user notes\n*.swp\n")?;

    // Run one: add C, pulling C++ in through its link line.
    let catalog = Catalog::from_directory(templates.path())?;
    let source = LocalSource::new(templates.path());
    let mut store = TemplateStore::new(IgnoreFile::load(&target)?, &catalog, source);
    store.add("C")?;
    store.into_document().save(&target, &catalog)?;

    let expect = indoc! {r"
        # user notes
        *.swp
        ##gitig-start:C++
        *.obj
        ##gitig-end:C++
        ##gitig-start:C
        # c++.gitignore
        *.o
        ##gitig-end:C
    "};
    assert_eq!(fs::read_to_string(&target)?, expect);

    // Run two: removing C cleans up the C++ block it pulled in.
    let source = LocalSource::new(templates.path());
    let mut store = TemplateStore::new(IgnoreFile::load(&target)?, &catalog, source);
    store.remove("c")?;
    store.into_document().save(&target, &catalog)?;

    assert_eq!(fs::read_to_string(&target)?, "# user notes\n*.swp\n");

    Ok(())
}

#[test]
fn add_twice_across_runs_is_idempotent() -> Result<()> {
    let templates = template_dir()?;
    let workdir = tempfile::tempdir()?;
    let target = workdir.path().join(".gitignore");
    fs::write(&target, "")?;

    let catalog = Catalog::from_directory(templates.path())?;
    for _ in 0..2 {
        let source = LocalSource::new(templates.path());
        let mut store = TemplateStore::new(IgnoreFile::load(&target)?, &catalog, source);
        store.add("python")?;
        store.into_document().save(&target, &catalog)?;
    }

    let expect = indoc! {r"
        ##gitig-start:Python
        __pycache__/
        ##gitig-end:Python
    "};
    assert_eq!(fs::read_to_string(&target)?, expect);

    Ok(())
}

#[test]
fn grouped_template_round_trips_with_canonical_tags() -> Result<()> {
    let templates = template_dir()?;
    let workdir = tempfile::tempdir()?;
    let target = workdir.path().join(".gitignore");
    fs::write(&target, "")?;

    let catalog = Catalog::from_directory(templates.path())?;
    let source = LocalSource::new(templates.path());
    let mut store = TemplateStore::new(IgnoreFile::load(&target)?, &catalog, source);
    store.add("redis")?;
    store.into_document().save(&target, &catalog)?;

    let expect = indoc! {r"
        ##gitig-start:Global/Redis
        *.rdb
        ##gitig-end:Global/Redis
    "};
    assert_eq!(fs::read_to_string(&target)?, expect);

    // A fresh parse keys the block by identifier, not by group path.
    let document = IgnoreFile::load(&target)?;
    assert!(document.contains_block("redis"));
    document.validate(&catalog)?;

    Ok(())
}

#[test]
fn update_refreshes_content_from_changed_templates() -> Result<()> {
    let templates = template_dir()?;
    let workdir = tempfile::tempdir()?;
    let target = workdir.path().join(".gitignore");
    fs::write(&target, "")?;

    let catalog = Catalog::from_directory(templates.path())?;
    let source = LocalSource::new(templates.path());
    let mut store = TemplateStore::new(IgnoreFile::load(&target)?, &catalog, source);
    store.add("python")?;
    store.into_document().save(&target, &catalog)?;

    fs::write(templates.path().join("Python.gitignore"), "__pycache__/\n*.egg-info/\n")?;

    let source = LocalSource::new(templates.path());
    let mut store = TemplateStore::new(IgnoreFile::load(&target)?, &catalog, source);
    store.update()?;
    store.into_document().save(&target, &catalog)?;

    let expect = indoc! {r"
        ##gitig-start:Python
        __pycache__/
        *.egg-info/
        ##gitig-end:Python
    "};
    assert_eq!(fs::read_to_string(&target)?, expect);

    Ok(())
}
