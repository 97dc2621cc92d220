use std::path::PathBuf;

use crate::error::UnitError;

/// Process introspection needed to preload and relocate a program.
pub trait UnitHost {
    /// Location of the file the running program was started from.
    fn program_path(&self) -> anyhow::Result<PathBuf>;

    /// Names of the code units the program references directly.
    fn entry_references(&self) -> anyhow::Result<Vec<String>>;

    /// Load the named unit into the process and return the names of the
    /// units it references.
    fn load(&mut self, name: &str) -> anyhow::Result<Vec<String>>;
}

/// A code unit registered at link time with [`code_unit!`](crate::code_unit).
#[derive(Debug)]
pub struct CodeUnit {
    name: &'static str,
    references: &'static [&'static str],
    loader: Option<fn()>,
}

impl CodeUnit {
    pub const fn new(name: &'static str, references: &'static [&'static str]) -> Self {
        Self {
            name,
            references,
            loader: None,
        }
    }

    /// Run `loader` when the unit is preloaded.
    pub const fn with_loader(mut self, loader: fn()) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn references(&self) -> &'static [&'static str] {
        self.references
    }

    /// Look up a registered unit by name.
    pub fn find(name: &str) -> Option<&'static CodeUnit> {
        inventory::iter::<CodeUnit>
            .into_iter()
            .find(|unit| unit.name == name)
    }
}

inventory::collect!(CodeUnit);

/// Register a code unit with the link-time unit registry.
///
/// ```ignore
/// consolekit_shadow::code_unit!("my-app", references = ["my-app-core"]);
/// consolekit_shadow::code_unit!("my-app-core", references = [], loader = warm_caches);
/// ```
#[macro_export]
macro_rules! code_unit {
    ($name:expr, references = [$($reference:expr),* $(,)?], loader = $loader:expr $(,)?) => {
        $crate::inventory::submit! {
            $crate::CodeUnit::new($name, &[$($reference),*]).with_loader($loader)
        }
    };
    ($name:expr, references = [$($reference:expr),* $(,)?] $(,)?) => {
        $crate::inventory::submit! {
            $crate::CodeUnit::new($name, &[$($reference),*])
        }
    };
}

/// [`UnitHost`] backed by the units registered with [`code_unit!`](crate::code_unit).
///
/// The program itself is the unit named `entry`; its file is the current
/// executable.
#[derive(Debug, Clone)]
pub struct InventoryHost {
    entry: String,
}

impl InventoryHost {
    pub fn new(entry: impl Into<String>) -> Self {
        Self {
            entry: entry.into(),
        }
    }

    fn resolve(name: &str) -> Result<&'static CodeUnit, UnitError> {
        CodeUnit::find(name).ok_or_else(|| UnitError::unresolved(name))
    }
}

impl UnitHost for InventoryHost {
    fn program_path(&self) -> anyhow::Result<PathBuf> {
        Ok(std::env::current_exe()?)
    }

    fn entry_references(&self) -> anyhow::Result<Vec<String>> {
        let entry = Self::resolve(&self.entry)?;
        Ok(entry.references.iter().map(|r| r.to_string()).collect())
    }

    fn load(&mut self, name: &str) -> anyhow::Result<Vec<String>> {
        let unit = Self::resolve(name)?;
        if let Some(loader) = unit.loader {
            loader();
        }
        Ok(unit.references.iter().map(|r| r.to_string()).collect())
    }
}
