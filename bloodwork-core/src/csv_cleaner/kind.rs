use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Minimum number of marker headers needed to recognise an export.
const MIN_MARKER_HITS: usize = 2;

/// The three knowledge-base exports the cleaner understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CsvKind {
    Sources,
    Tiroirs,
    Questions,
}

impl CsvKind {
    /// Detection order: the first kind with enough markers wins.
    pub const DETECTION_ORDER: [CsvKind; 3] = [CsvKind::Sources, CsvKind::Tiroirs, CsvKind::Questions];

    pub fn name(&self) -> &'static str {
        match self {
            CsvKind::Sources => "Sources",
            CsvKind::Tiroirs => "Tiroirs",
            CsvKind::Questions => "Questions",
        }
    }

    /// Header names characteristic of this export (lower-case).
    pub fn markers(&self) -> &'static [&'static str] {
        match self {
            CsvKind::Sources => &["source", "created by", "created time", "societies"],
            CsvKind::Tiroirs => &["lesson", "annales", "ccb asclepia", "status"],
            CsvKind::Questions => &["question_id", "gdoc", "item", "lisa"],
        }
    }

    /// Columns kept in the cleaned output, in output order.
    pub fn kept_columns(&self) -> &'static [&'static str] {
        match self {
            CsvKind::Sources => &["source", "URL", "books", "knowledges", "societies", "title", "year"],
            CsvKind::Tiroirs => &["lesson", "books", "is_free", "knowledges", "sources", "title"],
            CsvKind::Questions => &[
                "question_id",
                "books",
                "categories",
                "coefficient",
                "collection",
                "count_qrp",
                "is_free",
                "knowledge",
                "lessons",
                "similar",
                "sources",
                "specialty",
                "type",
            ],
        }
    }

    /// Recognise an export from its header row (case-insensitive).
    pub fn detect<S: AsRef<str>>(headers: &[S]) -> Option<CsvKind> {
        let header_set: HashSet<String> = headers
            .iter()
            .map(|h| h.as_ref().to_lowercase())
            .collect();

        Self::DETECTION_ORDER.into_iter().find(|kind| {
            let hits = kind
                .markers()
                .iter()
                .filter(|marker| header_set.contains(**marker))
                .count();
            hits >= MIN_MARKER_HITS
        })
    }
}

impl fmt::Display for CsvKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
