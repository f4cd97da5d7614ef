//! Run configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use squash_preproc::MacroSet;
use squash_trim::TrimLevel;

/// How hard to minimize. Each level includes everything below it.
#[derive(
    Copy, Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum MinifyLevel {
    /// Merge only.
    #[default]
    None,
    StripComments,
    CompactWhitespace,
    TrimDeadCode,
    /// Accepted for third-party renamers; built-in processors treat it as
    /// [`MinifyLevel::TrimDeadCode`].
    RenameSymbols,
}

impl MinifyLevel {
    pub const ALL: [MinifyLevel; 5] = [
        MinifyLevel::None,
        MinifyLevel::StripComments,
        MinifyLevel::CompactWhitespace,
        MinifyLevel::TrimDeadCode,
        MinifyLevel::RenameSymbols,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MinifyLevel::None => "none",
            MinifyLevel::StripComments => "strip-comments",
            MinifyLevel::CompactWhitespace => "compact-whitespace",
            MinifyLevel::TrimDeadCode => "trim-dead-code",
            MinifyLevel::RenameSymbols => "rename-symbols",
        }
    }
}

/// Everything a run needs besides its input.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PackConfig {
    pub level: MinifyLevel,
    /// Symbols defined for `#if` evaluation.
    pub symbols: Vec<String>,
    /// Qualified names the runtime calls.
    pub entry_points: Vec<String>,
    /// Type the runtime instantiates. Its constructors are always kept.
    pub entry_container: Option<String>,
    /// Further names to keep regardless of references.
    pub protected: Vec<String>,
    pub trim_level: TrimLevel,
    /// Values for `$NAME$` placeholders.
    pub macros: BTreeMap<String, String>,
    /// Preprocess documents on a thread pool.
    pub parallel: bool,
    pub script_name: String,
    pub readme_name: String,
    pub thumbnail_name: String,
}

impl Default for PackConfig {
    fn default() -> Self {
        PackConfig {
            level: MinifyLevel::default(),
            symbols: Vec::new(),
            entry_points: vec!["Program.Main".to_owned(), "Program.Save".to_owned()],
            entry_container: Some("Program".to_owned()),
            protected: Vec::new(),
            trim_level: TrimLevel::default(),
            macros: BTreeMap::new(),
            parallel: true,
            script_name: "script.cs".to_owned(),
            readme_name: "instructions.readme".to_owned(),
            thumbnail_name: "thumb.png".to_owned(),
        }
    }
}

impl PackConfig {
    pub fn with_level(mut self, level: MinifyLevel) -> Self {
        self.level = level;
        self
    }

    pub fn define(mut self, symbol: impl Into<String>) -> Self {
        self.symbols.push(symbol.into());
        self
    }

    pub fn with_macro(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.macros.insert(name.into(), value.into());
        self
    }

    pub fn macro_set(&self) -> MacroSet {
        self.symbols.iter().cloned().collect()
    }
}
