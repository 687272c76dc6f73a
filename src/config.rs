use std::path::PathBuf;

pub const SENTINEL: &str = "Not Available";
pub const RATING_SENTINEL: &str = "Not Rated";

/// Everything a cleaning run needs to know. `Default` matches the catalog
/// export the tool was written for.
#[derive(Debug, Clone)]
pub struct CleanConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Text summary path; a JSON twin is written next to it.
    pub summary: PathBuf,
    /// Column → sentinel substituted for nulls.
    pub fills: Vec<(String, String)>,
    /// Columns trimmed and null-normalized before filling.
    pub text_columns: Vec<String>,
    /// Export artefacts removed when present.
    pub drop_columns: Vec<String>,
    pub preview_rows: usize,
}

impl Default for CleanConfig {
    fn default() -> Self {
        let owned = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            input: PathBuf::from("netflix_titles.csv"),
            output: PathBuf::from("netflix_cleaned.csv"),
            summary: PathBuf::from("cleaning_summary.txt"),
            fills: vec![
                ("director".to_string(), SENTINEL.to_string()),
                ("cast".to_string(), SENTINEL.to_string()),
                ("country".to_string(), SENTINEL.to_string()),
                ("rating".to_string(), RATING_SENTINEL.to_string()),
            ],
            text_columns: owned(&[
                "type",
                "title",
                "director",
                "cast",
                "country",
                "listed_in",
                "rating",
                "description",
            ]),
            drop_columns: owned(&["unnamed_0", "index"]),
            preview_rows: 3,
        }
    }
}

impl CleanConfig {
    pub fn summary_json(&self) -> PathBuf {
        self.summary.with_extension("json")
    }
}
