use anyhow::{Result, Context};
use std::fs;
use std::path::Path;

// @module: Word list and frequency file utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Read the word list, one word per line, keeping file order.
    ///
    /// Blank lines are skipped; repeated words are kept.
    pub fn read_word_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        let content = Self::read_to_string(&path)
            .context("Failed to load word list")?;
        Ok(parse_word_list(&content))
    }

    /// Write `word;total` lines in the given order
    pub fn write_frequency_report<P: AsRef<Path>>(path: P, entries: &[(String, u64)]) -> Result<()> {
        Self::write_to_file(&path, &format_frequency_report(entries))
    }
}

// @parses: Word list content
pub fn parse_word_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

// @formats: Frequency table as `word;total` lines
pub fn format_frequency_report(entries: &[(String, u64)]) -> String {
    let mut report = String::new();
    for (word, total) in entries {
        report.push_str(word);
        report.push(';');
        report.push_str(&total.to_string());
        report.push('\n');
    }
    report
}
