//! Cell kinds and the header markers that introduce them.

use serde::{Deserialize, Serialize};

/// Cell type named by a `%<name>\n` header marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Markdown,
    Python,
    TypeScript,
    JavaScript,
    Shell,
}

impl CellType {
    /// The name used in header markers and as a code cell language.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.header().line[1..].trim_end_matches('\n')
    }

    /// The header marker for this type.
    #[must_use]
    pub fn header(self) -> &'static HeaderLine {
        HEADERS
            .iter()
            .find(|h| h.cell_type == self)
            .unwrap_or(&HEADERS[0])
    }

    /// Look a type up by its marker name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        HEADERS
            .iter()
            .find(|h| h.cell_type.name() == name)
            .map(|h| h.cell_type)
    }

    /// Returns true for every type except markdown.
    #[must_use]
    pub fn is_code(self) -> bool {
        self != Self::Markdown
    }
}

/// A recognized cell-boundary marker and its exact literal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLine {
    pub cell_type: CellType,
    pub line: &'static str,
}

/// Every marker the parser recognizes. Add a row here to add a cell type.
pub const HEADERS: &[HeaderLine] = &[
    HeaderLine {
        cell_type: CellType::Markdown,
        line: "%markdown\n",
    },
    HeaderLine {
        cell_type: CellType::Python,
        line: "%python\n",
    },
    HeaderLine {
        cell_type: CellType::TypeScript,
        line: "%typescript\n",
    },
    HeaderLine {
        cell_type: CellType::JavaScript,
        line: "%javascript\n",
    },
    HeaderLine {
        cell_type: CellType::Shell,
        line: "%shell\n",
    },
];
