use crate::analysis::relocation::RelocationSummary;
use crate::error::Result;
use crate::hasher::Method;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;

/// One duplicate under one method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateFinding {
    pub method: Method,
    pub duplicate_alias: String,
    pub duplicate_path: PathBuf,
    pub duplicate_index: usize,
    pub original_alias: String,
    pub original_path: PathBuf,
    pub original_index: usize,
    pub fingerprint: String,
}

/// Duplicate counts for one base folder: rows are methods, columns are the
/// base folder followed by every lower-priority folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMatrix {
    methods: Vec<Method>,
    columns: Vec<String>,
    counts: Vec<Vec<usize>>,
}

impl StatusMatrix {
    pub fn new(methods: &[Method], columns: &[String]) -> Self {
        Self {
            methods: methods.to_vec(),
            columns: columns.to_vec(),
            counts: vec![vec![0; columns.len()]; methods.len()],
        }
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub(crate) fn increment(&mut self, method_idx: usize, column_idx: usize) {
        self.counts[method_idx][column_idx] += 1;
    }

    pub fn get(&self, method: Method, column: &str) -> Option<usize> {
        let m = self.methods.iter().position(|x| *x == method)?;
        let c = self.columns.iter().position(|x| x == column)?;
        Some(self.counts[m][c])
    }

    pub fn row(&self, method: Method) -> Option<&[usize]> {
        let m = self.methods.iter().position(|x| *x == method)?;
        Some(&self.counts[m])
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }
}

struct MatrixRow<'a> {
    columns: &'a [String],
    counts: &'a [usize],
}

impl Serialize for MatrixRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, count) in self.columns.iter().zip(self.counts) {
            map.serialize_entry(column, count)?;
        }
        map.end()
    }
}

/// Serialized as `{ method: { folder alias: count } }`, keeping folder order.
impl Serialize for StatusMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.methods.len()))?;
        for (method, counts) in self.methods.iter().zip(&self.counts) {
            map.serialize_entry(
                method.as_str(),
                &MatrixRow {
                    columns: &self.columns,
                    counts,
                },
            )?;
        }
        map.end()
    }
}

impl fmt::Display for StatusMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_width = self
            .methods
            .iter()
            .map(|m| m.as_str().len())
            .max()
            .unwrap_or(0);
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(c, column)| {
                self.counts
                    .iter()
                    .map(|row| row[c].to_string().len())
                    .chain(std::iter::once(column.chars().count()))
                    .max()
                    .unwrap_or(1)
            })
            .collect();

        write!(f, "{:<width$}", "", width = label_width)?;
        for (column, width) in self.columns.iter().zip(&widths) {
            write!(f, "  {:>width$}", column, width = *width)?;
        }
        writeln!(f)?;

        for (method, row) in self.methods.iter().zip(&self.counts) {
            write!(f, "{:<width$}", method.as_str(), width = label_width)?;
            for (count, width) in row.iter().zip(&widths) {
                write!(f, "  {:>width$}", count, width = *width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FolderReport {
    pub alias: String,
    pub path: PathBuf,
    pub file_count: usize,
    /// Files of this folder flagged as duplicates under at least one method.
    pub duplicate_files: usize,
    /// Duplicates of this folder's files, summed over the matrix.
    pub total: usize,
    pub matrix: StatusMatrix,
}

#[derive(Debug, Clone, Serialize)]
pub struct DuplicateReport {
    pub methods: Vec<Method>,
    pub folders: Vec<FolderReport>,
    pub findings: Vec<DuplicateFinding>,
    pub unreadable: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relocation: Option<RelocationSummary>,
}

impl DuplicateReport {
    pub fn folder(&self, alias: &str) -> Option<&FolderReport> {
        self.folders.iter().find(|f| f.alias == alias)
    }

    pub fn total_duplicates(&self) -> usize {
        self.folders.iter().map(|f| f.total).sum()
    }

    pub fn findings_for(&self, method: Method) -> impl Iterator<Item = &DuplicateFinding> {
        self.findings.iter().filter(move |f| f.method == method)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// One `base_folder,method,target_folder,count` row per matrix cell.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["base_folder", "method", "target_folder", "count"])?;
        for folder in &self.folders {
            for method in folder.matrix.methods() {
                let row = folder.matrix.row(*method).unwrap_or(&[]);
                for (column, count) in folder.matrix.columns().iter().zip(row) {
                    let count = count.to_string();
                    wtr.write_record([
                        folder.alias.as_str(),
                        method.as_str(),
                        column.as_str(),
                        count.as_str(),
                    ])?;
                }
            }
        }
        wtr.flush()?;
        Ok(())
    }
}
