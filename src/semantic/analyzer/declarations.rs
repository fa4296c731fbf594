//! Defines, categories, assets, metadata and the extends relation.

use std::sync::LazyLock;

use indexmap::IndexSet;
use regex::Regex;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::{Abort, Analyzer, PassResult};
use crate::semantic::diagnostics::Diagnostic;
use crate::syntax::{Define, Meta};

static SEMVER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("Invalid regex pattern"));

impl<'a> Analyzer<'a> {
    pub(super) fn check_defines(&mut self) {
        let ast = self.ast;
        let mut defines: FxHashMap<&str, &Define> = FxHashMap::default();
        for define in &ast.defines {
            if let Some(prev) = defines.get(define.key.as_str()).copied() {
                self.error(
                    &define.pos,
                    format!(
                        "Define '{}' previously defined at {}",
                        define.key, prev.pos
                    ),
                );
            } else {
                defines.insert(define.key.as_str(), define);
            }
        }

        match defines.get("id") {
            Some(id) if id.value.trim().is_empty() => {
                self.error(&id.pos, "Define 'id' cannot be empty");
            }
            Some(_) => {}
            None => self
                .diagnostics
                .add(Diagnostic::global_error("Missing required define '#id: \"\"'")),
        }

        match defines.get("version") {
            Some(version) => {
                if !SEMVER.is_match(&version.value) {
                    self.error(
                        &version.pos,
                        "Define 'version' must be valid semantic versioning without pre-release identifier and build metadata",
                    );
                }
            }
            None if self.options.require_version => self.diagnostics.add(
                Diagnostic::global_error("Missing required define '#version: \"\"'"),
            ),
            None => {}
        }
    }

    pub(super) fn check_categories(&mut self) {
        let ast = self.ast;
        for category in &ast.categories {
            if category.assets.is_empty() && category.meta.is_empty() {
                self.warning(
                    &category.name.pos,
                    format!(
                        "Category '{}' contains no assets or metadata",
                        category.name
                    ),
                );
            }
        }
    }

    pub(super) fn check_assets(&mut self) {
        let ast = self.ast;
        for asset in ast.assets() {
            if let Some(prev) = self.assets.get(&asset.name.name) {
                let message = format!(
                    "Asset '{}' previously defined at {}",
                    asset.name, prev.name.pos
                );
                self.error(&asset.name.pos, message);
            } else {
                self.assets.insert(asset.name.name.clone(), asset);
            }
        }
    }

    /// Metadata kinds must be unique per element. Blocks of the same
    /// category share one metadata list.
    pub(super) fn check_metas(&mut self) {
        let ast = self.ast;
        let mut category_metas: FxHashMap<&SmolStr, Vec<&'a Meta>> = FxHashMap::default();
        for category in &ast.categories {
            let metas = category_metas.entry(&category.name.name).or_default();
            metas.extend(category.meta.iter());
            let metas = metas.clone();
            self.check_meta(metas);

            for asset in &category.assets {
                self.check_meta(asset.meta.iter());
                for step in &asset.attack_steps {
                    self.check_meta(step.meta.iter());
                }
            }
        }
        for association in &ast.associations {
            self.check_meta(association.meta.iter());
        }
    }

    fn check_meta(&mut self, metas: impl IntoIterator<Item = &'a Meta>) {
        let mut seen: FxHashMap<&str, &Meta> = FxHashMap::default();
        for meta in metas {
            match seen.get(meta.kind.as_str()) {
                Some(prev) => {
                    let message = format!(
                        "Metadata '{}' previously defined at {}",
                        meta.kind, prev.pos
                    );
                    self.error(&meta.pos, message);
                }
                None => {
                    seen.insert(meta.kind.as_str(), meta);
                }
            }
        }
    }

    /// Every super-asset must exist.
    pub(super) fn check_extends(&mut self) -> PassResult {
        let mut failed = false;
        let assets: Vec<_> = self.assets.values().copied().collect();
        for asset in assets {
            if let Some(parent) = &asset.parent {
                failed |= self.get_asset(parent).is_none();
            }
        }
        if failed { Err(Abort) } else { Ok(()) }
    }

    /// The extends relation must be acyclic. Only assets that take part in
    /// a cycle are reported, not those that merely extend into one.
    pub(super) fn check_parents(&mut self) -> PassResult {
        let mut failed = false;
        let assets: Vec<_> = self.assets.values().copied().collect();
        for asset in assets {
            if asset.parent.is_none() {
                continue;
            }
            let mut visited: IndexSet<&str> = IndexSet::new();
            let mut current = asset;
            loop {
                if !visited.insert(current.name.as_str()) {
                    if current.name.name == asset.name.name {
                        let mut path: Vec<&str> = visited.iter().copied().collect();
                        path.push(current.name.as_str());
                        let message = format!(
                            "Asset '{}' extends in loop '{}'",
                            asset.name,
                            path.join(" -> ")
                        );
                        self.error(&asset.name.pos, message);
                        failed = true;
                    }
                    break;
                }
                match self.super_asset(current) {
                    Some(parent) => current = parent,
                    None => break,
                }
            }
        }
        if failed { Err(Abort) } else { Ok(()) }
    }

    pub(super) fn check_abstract(&mut self) {
        let assets: Vec<_> = self.assets.values().copied().collect();
        for parent in &assets {
            if !parent.is_abstract {
                continue;
            }
            let extended = assets.iter().any(|a| {
                a.parent
                    .as_ref()
                    .is_some_and(|p| p.name == parent.name.name)
            });
            if !extended {
                self.warning(
                    &parent.name.pos,
                    format!("Asset '{}' is abstract but never extended to", parent.name),
                );
            }
        }
    }
}
