// SPDX-FileCopyrightText: 2026 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Template catalog and name resolution.
//!
//! The __catalog__ maps every template identifier to its canonical path in
//! the upstream template repository. Identifiers are case-insensitive, so the
//! catalog keys them by their lowercase form, while the canonical path keeps
//! the exact casing that the upstream repository expects for fetching, e.g.,
//! `"c++"` resolves to `"C++"`, and `"redis"` resolves to `"Global/Redis"`.
//!
//! The catalog either comes from a builtin table baked into the binary, or
//! gets rebuilt on the fly by scanning a local clone of the template
//! repository for `<name>.gitignore` files. Templates found inside
//! subdirectories keep their directory as a group prefix in the canonical
//! path.
//!
//! # Name Suggestions
//!
//! Typos happen. When an identifier fails to resolve, [`similar_names`]
//! produces a listing of catalog entries that are close to what the user
//! typed. Closeness here is a cheap character-set heuristic inherited from
//! gitig's ancestors, not a proper edit distance. The exact thresholds are
//! load-bearing for behavior parity, so do not swap this out for Levenshtein.

use indexmap::IndexMap;
use regex::Regex;
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::LazyLock,
};
use tracing::debug;

/// Canonical paths of every template the upstream repository ships.
///
/// Lowercase identifiers are derived from the last path component.
const BUILTIN_TEMPLATES: &[&str] = &[
    "Actionscript", "Ada", "Agda", "Android", "AppEngine",
    "AppceleratorTitanium", "ArchLinuxPackages", "Autotools", "C++", "C",
    "CFWheels", "CMake", "CUDA", "CakePHP", "ChefCookbook", "Clojure",
    "CodeIgniter", "CommonLisp", "Composer", "Concrete5", "Coq", "CraftCMS",
    "D", "DM", "Dart", "Delphi", "Drupal", "EPiServer", "Eagle", "Elisp",
    "Elixir", "Elm", "Erlang", "ExpressionEngine", "ExtJs", "Fancy", "Finale",
    "ForceDotCom", "Fortran", "FuelPHP", "GWT", "Gcov", "GitBook", "Go",
    "Gradle", "Grails", "Haskell", "IGORPro", "Idris", "Java", "Jboss",
    "Jekyll", "Joomla", "Julia", "KiCad", "Kohana", "LabVIEW", "Laravel",
    "Leiningen", "LemonStand", "Lilypond", "Lithium", "Lua", "Magento",
    "Maven", "Mercury", "MetaProgrammingSystem", "Nanoc", "Nim", "Node",
    "OCaml", "Objective-C", "Opa", "OpenCart", "OracleForms", "Packer", "Perl",
    "Phalcon", "PlayFramework", "Plone", "Prestashop", "Processing",
    "PureScript", "Python", "Qooxdoo", "Qt", "R", "ROS", "Rails",
    "RhodesRhomobile", "Ruby", "Rust", "SCons", "Sass", "Scala", "Scheme",
    "Scrivener", "Sdcc", "SeamGen", "SketchUp", "Smalltalk", "Stella",
    "SugarCRM", "Swift", "Symfony", "SymphonyCMS", "TeX", "Terraform",
    "Textpattern", "TurboGears2", "Typo3", "Umbraco", "Unity", "UnrealEngine",
    "VVVV", "VisualStudio", "Waf", "WordPress", "Xojo", "Yeoman", "Yii",
    "ZendFramework", "Zephir", "Global/Anjuta", "Global/Ansible",
    "Global/Archives", "Global/Bazaar", "Global/BricxCC", "Global/CVS",
    "Global/Calabash", "Global/Cloud9", "Global/CodeKit", "Global/DartEditor",
    "Global/Dreamweaver", "Global/Dropbox", "Global/Eclipse",
    "Global/EiffelStudio", "Global/Emacs", "Global/Ensime", "Global/Espresso",
    "Global/FlexBuilder", "Global/GPG", "Global/JDeveloper",
    "Global/JetBrains", "Global/KDevelop4", "Global/Kate", "Global/Lazarus",
    "Global/LibreOffice", "Global/Linux", "Global/LyX", "Global/Matlab",
    "Global/Mercurial", "Global/MicrosoftOffice", "Global/ModelSim",
    "Global/Momentics", "Global/MonoDevelop", "Global/NetBeans",
    "Global/Ninja", "Global/NotepadPP", "Global/Otto", "Global/Redcar",
    "Global/Redis", "Global/SBT", "Global/SVN", "Global/SlickEdit",
    "Global/Stata", "Global/SublimeText", "Global/SynopsysVCS", "Global/Tags",
    "Global/TextMate", "Global/TortoiseGit", "Global/Vagrant", "Global/Vim",
    "Global/VirtualEnv", "Global/VisualStudioCode", "Global/WebMethods",
    "Global/Windows", "Global/Xcode", "Global/XilinxISE", "Global/macOS",
];

/// Template file name pattern for local directory scans.
///
/// The identifier is everything before the first dot.
static TEMPLATE_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^.]+)\.gitignore$").expect("invalid template file regex"));

/// Mapping from lowercase template identifier to canonical path.
///
/// Constructed once per run and passed explicitly to whoever needs to
/// resolve template names. Immutable after construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: IndexMap<String, String>,
}

impl Catalog {
    /// Construct catalog from the builtin template table.
    pub fn builtin() -> Self {
        let entries = BUILTIN_TEMPLATES
            .iter()
            .map(|path| (identifier_of(path), (*path).to_string()))
            .collect();

        Self { entries }
    }

    /// Construct catalog by scanning a local template directory.
    ///
    /// Recursively walks `root` looking for files named `<name>.gitignore`.
    /// Files in subdirectories keep the subdirectory as a `/`-separated
    /// group prefix in their canonical path.
    ///
    /// # Errors
    ///
    /// - Return [`CatalogError::ScanDirectory`] if the directory tree cannot
    ///   be traversed.
    /// - Return [`CatalogError::ConflictingTemplate`] if two files normalize
    ///   to the same lowercase identifier.
    pub fn from_directory(root: impl AsRef<Path>) -> Result<Self> {
        let mut entries = IndexMap::new();
        scan_directory(root.as_ref(), "", &mut entries)?;
        debug!("scanned {} templates from local directory", entries.len());

        Ok(Self { entries })
    }

    /// Resolve identifier to its canonical path, case-insensitively.
    pub fn resolve(&self, name: impl AsRef<str>) -> Option<&str> {
        self.entries
            .get(name.as_ref().to_lowercase().as_str())
            .map(String::as_str)
    }

    /// Check if identifier exists in catalog, case-insensitively.
    pub fn contains(&self, name: impl AsRef<str>) -> bool {
        self.entries.contains_key(name.as_ref().to_lowercase().as_str())
    }

    /// Iterate over all lowercase identifiers in the catalog.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of catalog entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if catalog holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn identifier_of(canonical: &str) -> String {
    canonical
        .rsplit('/')
        .next()
        .unwrap_or(canonical)
        .to_lowercase()
}

fn scan_directory(
    dir: &Path,
    group: &str,
    entries: &mut IndexMap<String, String>,
) -> Result<()> {
    let listing = std::fs::read_dir(dir).map_err(|err| CatalogError::ScanDirectory {
        source: err,
        path: dir.to_path_buf(),
    })?;

    for item in listing {
        let item = item.map_err(|err| CatalogError::ScanDirectory {
            source: err,
            path: dir.to_path_buf(),
        })?;
        let file_name = item.file_name().to_string_lossy().into_owned();
        let file_type = item.file_type().map_err(|err| CatalogError::ScanDirectory {
            source: err,
            path: item.path(),
        })?;

        if file_type.is_dir() {
            let subgroup = if group.is_empty() {
                file_name
            } else {
                format!("{group}/{file_name}")
            };
            scan_directory(&item.path(), &subgroup, entries)?;
        } else if let Some(captures) = TEMPLATE_FILE.captures(&file_name) {
            let name = captures.get(1).map_or("", |m| m.as_str());
            let canonical = if group.is_empty() {
                name.to_string()
            } else {
                format!("{group}/{name}")
            };
            let lower = name.to_lowercase();
            if entries.insert(lower.clone(), canonical).is_some() {
                return Err(CatalogError::ConflictingTemplate { name: lower });
            }
        }
    }

    Ok(())
}

/// Find catalog candidates close to a mistyped name.
///
/// Two strings are close iff their lengths differ by at most 2, their
/// distinct character sets differ in size by at most 2, and each side has
/// fewer than 2 distinct characters the other side lacks. This is a cheap
/// heuristic, not edit distance.
pub fn similar_names<'a>(
    name: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    candidates
        .into_iter()
        .filter(|candidate| close_similarity(name, candidate))
        .map(ToString::to_string)
        .collect()
}

fn close_similarity(s1: &str, s2: &str) -> bool {
    if s1.chars().count().abs_diff(s2.chars().count()) > 2 {
        return false;
    }

    let set1: HashSet<char> = s1.chars().collect();
    let set2: HashSet<char> = s2.chars().collect();
    if set1.len().abs_diff(set2.len()) > 2 {
        return false;
    }

    let common = set1.intersection(&set2).count();
    set1.len() - common < 2 && set2.len() - common < 2
}

/// Render "did you mean" hint for a listing of similar names.
///
/// Produces an empty string when there is nothing to suggest.
pub fn suggestion_hint(similar: &[String]) -> String {
    match similar {
        [] => String::new(),
        [only] => format!("Did you mean this?\n\t{only}"),
        many => {
            let mut hint = String::from("Did you mean one of these?");
            for name in many {
                hint.push_str("\n\t");
                hint.push_str(name);
            }
            hint
        }
    }
}

/// Catalog construction error types.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Local template directory cannot be traversed.
    #[error("failed to scan template directory at {:?}", path.display())]
    ScanDirectory {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Two local template files normalize to the same identifier.
    #[error("conflicting \"{name}\" templates in local directory")]
    ConflictingTemplate { name: String },
}

/// Friendly result alias :3
pub type Result<T, E = CatalogError> = std::result::Result<T, E>;
