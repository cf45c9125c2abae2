//! Interactive resolution of duplicate sets.
//!
//! # Overview
//!
//! For each duplicate set the first-discovered path is kept untouched and
//! every remaining path runs a per-file decision loop: delete, rename, or
//! skip. The loop is a two-state machine (awaiting a choice / resolved)
//! with a deliberate asymmetry between its failure kinds:
//!
//! - invalid choice, invalid rename name, and rename destination
//!   collisions loop back to the prompt;
//! - I/O failures during a delete or rename are terminal for that file
//!   and recorded as a failed outcome, with no retry.
//!
//! Resolutions are independent: there is no rollback, and a failure for
//! one file never aborts the rest of the session.
//!
//! Input and output are injected (`BufRead` / `Write`), so the whole
//! session can be driven by a scripted reader in tests. End of input is
//! treated as "skip everything that is left".

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use bytesize::ByteSize;
use yansi::Paint;

use crate::actions::{delete_file, rename_file};
use crate::duplicates::DuplicateGroup;

/// Terminal outcome for one duplicate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// The file was deleted from the filesystem.
    Deleted,
    /// The file was renamed; holds the new path.
    Renamed(PathBuf),
    /// The operator chose to leave the file in place.
    Skipped,
    /// A delete or rename attempt failed with an I/O error.
    Failed(String),
}

/// Per-session tally of resolution outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionReport {
    /// Files deleted.
    pub deleted: usize,
    /// Files renamed.
    pub renamed: usize,
    /// Files skipped.
    pub skipped: usize,
    /// Files whose action failed with an I/O error.
    pub failed: usize,
    /// Bytes freed by deletions.
    pub bytes_freed: u64,
}

impl SessionReport {
    fn record(&mut self, outcome: &ResolutionOutcome) {
        match outcome {
            ResolutionOutcome::Deleted => self.deleted += 1,
            ResolutionOutcome::Renamed(_) => self.renamed += 1,
            ResolutionOutcome::Skipped => self.skipped += 1,
            ResolutionOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// True when at least one action failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Operator choice for one duplicate file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Delete,
    Rename,
    Skip,
}

impl Choice {
    /// Parse a single-character, case-insensitive choice.
    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "d" => Some(Self::Delete),
            "r" => Some(Self::Rename),
            "s" => Some(Self::Skip),
            _ => None,
        }
    }
}

/// Interactive resolution session over injected input/output streams.
///
/// The resolver reads the mutable filesystem but never mutates the group
/// list it is handed.
#[derive(Debug)]
pub struct Resolver<R, W> {
    input: R,
    output: W,
    /// Set once the input stream reaches end of file.
    eof: bool,
}

impl<R: BufRead, W: Write> Resolver<R, W> {
    /// Create a resolver over the given streams.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            eof: false,
        }
    }

    /// Consume the resolver, returning the output stream.
    ///
    /// Used by tests to inspect what was written.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Read one line, trimming the trailing newline.
    ///
    /// Returns `None` at end of input and remembers it.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        if self.eof {
            return Ok(None);
        }
        let mut line = String::new();
        let n = self.input.read_line(&mut line)?;
        if n == 0 {
            self.eof = true;
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    /// Write a prompt without a newline and read the reply.
    fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        self.read_line()
    }

    /// Write one line of progress output.
    pub fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message)
    }

    /// Prompt for the root directory to scan.
    ///
    /// Returns `None` when the input is closed before a path is supplied.
    pub fn prompt_root(&mut self) -> io::Result<Option<PathBuf>> {
        let reply = self.prompt("Enter the directory to scan: ")?;
        Ok(reply
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .map(PathBuf::from))
    }

    /// Resolve every duplicate set, one file at a time.
    ///
    /// The first path of each group is reported as kept and never acted
    /// on. Returns the session tally.
    pub fn resolve_all(&mut self, groups: &[DuplicateGroup]) -> io::Result<SessionReport> {
        let mut report = SessionReport::default();

        for group in groups {
            writeln!(
                self.output,
                "\n--- Duplicate set ({} files, {} each, digest {}) ---",
                group.len(),
                ByteSize::b(group.size),
                group.digest.dim()
            )?;
            writeln!(self.output, "Keeping: {}", group.kept().display().green())?;

            for path in group.duplicates() {
                let outcome = self.resolve_file(path)?;
                report.record(&outcome);
                if outcome == ResolutionOutcome::Deleted {
                    report.bytes_freed += group.size;
                }
            }
        }

        Ok(report)
    }

    /// Run the decision loop for one duplicate file until it resolves.
    ///
    /// State machine: the loop is the awaiting-choice state; every
    /// `return` is the transition to resolved.
    pub fn resolve_file(&mut self, path: &Path) -> io::Result<ResolutionOutcome> {
        writeln!(self.output, "  Duplicate: {}", path.display())?;

        loop {
            if self.eof {
                writeln!(self.output, "  Skipped (end of input): {}", path.display())?;
                return Ok(ResolutionOutcome::Skipped);
            }

            let reply = self.prompt("  Choose an action: (D)elete, (R)ename, (S)kip: ")?;
            let Some(reply) = reply else {
                continue; // eof now set; handled at the top of the loop
            };

            match Choice::parse(&reply) {
                Some(Choice::Delete) => return self.do_delete(path),
                Some(Choice::Rename) => {
                    if let Some(outcome) = self.do_rename(path)? {
                        return Ok(outcome);
                    }
                    // Recoverable rename problem: fall through and reprompt
                }
                Some(Choice::Skip) => {
                    writeln!(self.output, "  Skipped: {}", path.display())?;
                    return Ok(ResolutionOutcome::Skipped);
                }
                None => {
                    writeln!(self.output, "  Invalid choice. Please try again.")?;
                }
            }
        }
    }

    /// Attempt deletion. One attempt only; failure is terminal.
    fn do_delete(&mut self, path: &Path) -> io::Result<ResolutionOutcome> {
        match delete_file(path) {
            Ok(result) => {
                writeln!(self.output, "  Deleted: {}", result.path.display().red())?;
                Ok(ResolutionOutcome::Deleted)
            }
            Err(e) => {
                writeln!(self.output, "  Error deleting file: {}", e)?;
                log::warn!("Delete failed: {}", e);
                Ok(ResolutionOutcome::Failed(e.to_string()))
            }
        }
    }

    /// Prompt for a new name and attempt the rename.
    ///
    /// Returns `Ok(None)` for recoverable problems (bad name, name
    /// collision) so the caller loops back to the action prompt.
    fn do_rename(&mut self, path: &Path) -> io::Result<Option<ResolutionOutcome>> {
        let Some(name) = self.prompt("  Enter new file name (with extension): ")? else {
            return Ok(None); // eof; outer loop resolves as skipped
        };

        match rename_file(path, &name) {
            Ok(destination) => {
                writeln!(
                    self.output,
                    "  Renamed: {} -> {}",
                    path.display(),
                    destination.display().green()
                )?;
                Ok(Some(ResolutionOutcome::Renamed(destination)))
            }
            Err(e) if e.is_recoverable() => {
                writeln!(self.output, "  {}. Please choose again.", e)?;
                Ok(None)
            }
            Err(e) => {
                writeln!(self.output, "  Error renaming file: {}", e)?;
                log::warn!("Rename failed: {}", e);
                Ok(Some(ResolutionOutcome::Failed(e.to_string())))
            }
        }
    }

    /// Print the end-of-session summary.
    pub fn print_summary(&mut self, report: &SessionReport) -> io::Result<()> {
        writeln!(
            self.output,
            "\nResolution complete: {} deleted ({} freed), {} renamed, {} skipped, {} failed.",
            report.deleted,
            ByteSize::b(report.bytes_freed),
            report.renamed,
            report.skipped,
            report.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    /// Build a resolver fed by scripted input lines.
    fn scripted(lines: &str) -> Resolver<Cursor<Vec<u8>>, Vec<u8>> {
        Resolver::new(Cursor::new(lines.as_bytes().to_vec()), Vec::new())
    }

    fn output_of(resolver: Resolver<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(resolver.into_output()).unwrap()
    }

    #[test]
    fn test_choice_parse() {
        assert_eq!(Choice::parse("d"), Some(Choice::Delete));
        assert_eq!(Choice::parse("D"), Some(Choice::Delete));
        assert_eq!(Choice::parse(" r "), Some(Choice::Rename));
        assert_eq!(Choice::parse("S"), Some(Choice::Skip));
        assert_eq!(Choice::parse(""), None);
        assert_eq!(Choice::parse("x"), None);
        assert_eq!(Choice::parse("delete"), None);
    }

    #[test]
    fn test_skip_leaves_file_alone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dup.txt");
        fs::write(&path, b"content").unwrap();

        let mut resolver = scripted("s\n");
        let outcome = resolver.resolve_file(&path).unwrap();

        assert_eq!(outcome, ResolutionOutcome::Skipped);
        assert!(path.exists());
    }

    #[test]
    fn test_delete_resolves_and_removes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dup.txt");
        fs::write(&path, b"content").unwrap();

        let mut resolver = scripted("d\n");
        let outcome = resolver.resolve_file(&path).unwrap();

        assert_eq!(outcome, ResolutionOutcome::Deleted);
        assert!(!path.exists());
    }

    #[test]
    fn test_delete_failure_is_terminal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("already_gone.txt");

        // One attempt, no reprompt: the single "d" line must be enough.
        let mut resolver = scripted("d\n");
        let outcome = resolver.resolve_file(&path).unwrap();

        assert!(matches!(outcome, ResolutionOutcome::Failed(_)));
    }

    #[test]
    fn test_rename_resolves_with_new_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dup.txt");
        fs::write(&path, b"hello").unwrap();

        let mut resolver = scripted("r\ndup2.txt\n");
        let outcome = resolver.resolve_file(&path).unwrap();

        let expected = dir.path().join("dup2.txt");
        assert_eq!(outcome, ResolutionOutcome::Renamed(expected.clone()));
        assert!(!path.exists());
        assert_eq!(fs::read(&expected).unwrap(), b"hello");
    }

    #[test]
    fn test_invalid_choice_reprompts() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dup.txt");
        fs::write(&path, b"x").unwrap();

        let mut resolver = scripted("q\nbogus\ns\n");
        let outcome = resolver.resolve_file(&path).unwrap();

        assert_eq!(outcome, ResolutionOutcome::Skipped);
        let output = output_of(resolver);
        assert_eq!(output.matches("Invalid choice").count(), 2);
    }

    #[test]
    fn test_empty_rename_name_reprompts_action() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dup.txt");
        fs::write(&path, b"x").unwrap();

        // Empty name loops back to the action prompt, then skip.
        let mut resolver = scripted("r\n   \ns\n");
        let outcome = resolver.resolve_file(&path).unwrap();

        assert_eq!(outcome, ResolutionOutcome::Skipped);
        assert!(path.exists());
    }

    #[test]
    fn test_rename_collision_reprompts_then_succeeds() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dup.txt");
        let taken = dir.path().join("taken.txt");
        fs::write(&path, b"x").unwrap();
        fs::write(&taken, b"occupied").unwrap();

        let mut resolver = scripted("r\ntaken.txt\nr\nfree.txt\n");
        let outcome = resolver.resolve_file(&path).unwrap();

        assert_eq!(
            outcome,
            ResolutionOutcome::Renamed(dir.path().join("free.txt"))
        );
        // The collision target was never touched
        assert_eq!(fs::read(&taken).unwrap(), b"occupied");
    }

    #[test]
    fn test_eof_skips_remaining() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        let c = dir.path().join("c.txt");
        for p in [&a, &b, &c] {
            fs::write(p, b"same").unwrap();
        }

        let group = DuplicateGroup::new("0".repeat(64), 4, vec![a.clone(), b.clone(), c.clone()]);

        // Input closes immediately: both duplicates are skipped.
        let mut resolver = scripted("");
        let report = resolver.resolve_all(std::slice::from_ref(&group)).unwrap();

        assert_eq!(report.skipped, 2);
        assert_eq!(report.deleted, 0);
        assert!(a.exists() && b.exists() && c.exists());
    }

    #[test]
    fn test_resolve_all_keeps_first_path() {
        let dir = tempdir().unwrap();
        let kept = dir.path().join("kept.txt");
        let doomed = dir.path().join("doomed.txt");
        fs::write(&kept, b"same").unwrap();
        fs::write(&doomed, b"same").unwrap();

        let group = DuplicateGroup::new("0".repeat(64), 4, vec![kept.clone(), doomed.clone()]);

        let mut resolver = scripted("d\n");
        let report = resolver.resolve_all(std::slice::from_ref(&group)).unwrap();

        assert_eq!(report.deleted, 1);
        assert_eq!(report.bytes_freed, 4);
        assert!(kept.exists());
        assert!(!doomed.exists());

        let output = output_of(resolver);
        assert!(output.contains("Keeping:"));
        assert!(output.contains("kept.txt"));
    }

    #[test]
    fn test_session_report_record() {
        let mut report = SessionReport::default();
        report.record(&ResolutionOutcome::Deleted);
        report.record(&ResolutionOutcome::Renamed(PathBuf::from("/x")));
        report.record(&ResolutionOutcome::Skipped);
        report.record(&ResolutionOutcome::Failed("boom".into()));

        assert_eq!(report.deleted, 1);
        assert_eq!(report.renamed, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 1);
        assert!(report.has_failures());
    }

    #[test]
    fn test_prompt_root() {
        let mut resolver = scripted("/some/dir\n");
        let root = resolver.prompt_root().unwrap();
        assert_eq!(root, Some(PathBuf::from("/some/dir")));

        let mut resolver = scripted("");
        assert_eq!(resolver.prompt_root().unwrap(), None);

        let mut resolver = scripted("   \n");
        assert_eq!(resolver.prompt_root().unwrap(), None);
    }
}
