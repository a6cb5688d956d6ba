//! Line-driven picker shell
//!
//! Reads one command per line and turns it into dialog actions. Rows are
//! shown one backfill window at a time so metadata is only read for what
//! is printed.

use anyhow::Result;
use app_core::{DialogAction, DialogController, DialogEvent, DialogState, ViewMode};
use app_fs::Entry;
use std::io::{BufRead, Write};

const HELP: &str = "\
Commands:
  ls                 list the current directory
  more               show the next page of the listing
  cd <dir>           change directory (relative to the current one)
  up                 go to the parent directory
  back / fwd         move through the directory history
  refresh            re-read the current directory
  filter [n|glob]    show filters, select filter n, or filter by a glob
  pick <row>...      put the files at these rows into the name field
  open [names]       confirm the name field, or the given names
  yes / no           answer the overwrite question
  cancel             close without a selection
  help               show this text";

#[derive(Debug, PartialEq)]
enum Command {
    Action(DialogAction),
    List,
    More,
    ShowFilters,
    Open(Option<String>),
    Help,
    Empty,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "" => Command::Empty,
        "ls" => Command::List,
        "more" => Command::More,
        "cd" if rest.is_empty() => return Err("cd: missing directory".to_string()),
        "cd" => Command::Action(DialogAction::Navigate(rest.into())),
        "up" => Command::Action(DialogAction::Up),
        "back" => Command::Action(DialogAction::Undo),
        "fwd" => Command::Action(DialogAction::Redo),
        "refresh" => Command::Action(DialogAction::Refresh),
        "filter" if rest.is_empty() => Command::ShowFilters,
        "filter" => match rest.parse::<usize>() {
            Ok(0) => return Err("filter: numbering starts at 1".to_string()),
            Ok(n) => Command::Action(DialogAction::SelectFilter(n - 1)),
            Err(_) => Command::Action(DialogAction::CustomFilter(rest.to_string())),
        },
        "pick" => Command::Action(DialogAction::SelectEntries(parse_rows(rest)?)),
        "open" => Command::Open((!rest.is_empty()).then(|| rest.to_string())),
        "yes" => Command::Action(DialogAction::ResolveOverwrite(true)),
        "no" => Command::Action(DialogAction::ResolveOverwrite(false)),
        "cancel" | "quit" => Command::Action(DialogAction::Cancel),
        "help" | "?" => Command::Help,
        other => return Err(format!("{}: unknown command (try help)", other)),
    };
    Ok(command)
}

/// 1-based row numbers to listing indices
fn parse_rows(text: &str) -> Result<Vec<usize>, String> {
    if text.is_empty() {
        return Err("pick: missing row number".to_string());
    }
    text.split_whitespace()
        .map(|row| match row.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n - 1),
            _ => Err(format!("pick: bad row number {}", row)),
        })
        .collect()
}

/// Interactive session over a reader and a writer
pub struct Shell<R, W> {
    dialog: DialogController,
    input: R,
    output: W,
    view_mode: ViewMode,
    time_format: String,
    next_row: usize,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(
        dialog: DialogController,
        input: R,
        output: W,
        view_mode: ViewMode,
        time_format: String,
    ) -> Self {
        Self {
            dialog,
            input,
            output,
            view_mode,
            time_format,
            next_row: 0,
        }
    }

    /// Read commands until the dialog closes. End of input cancels.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "{} - type help for commands", self.dialog.title())?;
        self.print_location()?;

        let mut line = String::new();
        while self.dialog.is_open() {
            write!(self.output, "{}> ", self.prompt())?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                self.dialog.cancel();
                break;
            }

            match parse_command(&line) {
                Ok(command) => self.execute(command)?,
                Err(message) => writeln!(self.output, "{}", message)?,
            }
        }
        Ok(())
    }

    pub fn into_dialog(self) -> DialogController {
        self.dialog
    }

    fn prompt(&self) -> &'static str {
        match self.dialog.state() {
            DialogState::AwaitingOverwrite(_) => "yes/no",
            _ => self.dialog.options().mode().confirm_label(),
        }
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Empty => {}
            Command::Help => writeln!(self.output, "{}", HELP)?,
            Command::List => self.print_page(true)?,
            Command::More => self.print_page(false)?,
            Command::ShowFilters => self.print_filters()?,
            Command::Open(text) => {
                let text = text.unwrap_or_else(|| self.dialog.file_name_text().to_string());
                self.apply(DialogAction::Confirm(text))?;
            }
            Command::Action(action) => self.apply(action)?,
        }
        Ok(())
    }

    fn apply(&mut self, action: DialogAction) -> Result<()> {
        match self.dialog.dispatch(action) {
            Ok(event) => self.report(event),
            Err(e) => {
                writeln!(self.output, "error: {}", e.user_message())?;
                Ok(())
            }
        }
    }

    fn report(&mut self, event: DialogEvent) -> Result<()> {
        match event {
            DialogEvent::Navigated | DialogEvent::Relisted => self.print_location()?,
            DialogEvent::FilterApplied(glob) => {
                writeln!(self.output, "filter: {}", glob)?;
                self.print_page(true)?;
            }
            DialogEvent::SelectionChanged => {
                writeln!(self.output, "name: {}", self.dialog.file_name_text())?;
            }
            DialogEvent::OverwritePending(path) => {
                writeln!(
                    self.output,
                    "{} already exists.\nDo you want to replace it?",
                    path.display()
                )?;
            }
            DialogEvent::Accepted | DialogEvent::Cancelled | DialogEvent::Ignored => {}
        }
        Ok(())
    }

    fn print_location(&mut self) -> Result<()> {
        writeln!(self.output, "{}", self.dialog.current_dir())?;
        self.print_page(true)
    }

    /// Print one window of rows, from the top or continuing the last one
    fn print_page(&mut self, from_start: bool) -> Result<()> {
        if from_start {
            self.next_row = 0;
        }

        let start = self.next_row;
        let total = self.dialog.listing().len();
        if total == 0 {
            writeln!(self.output, "  (empty)")?;
            return Ok(());
        }
        if start >= total {
            writeln!(self.output, "  (end of listing)")?;
            return Ok(());
        }

        if self.view_mode == ViewMode::Details {
            self.dialog.backfill(start);
        }

        let end = (start + self.dialog.page_size()).min(total);
        for (index, entry) in self.dialog.listing().entries()[start..end].iter().enumerate() {
            let row = format_row(start + index + 1, entry, self.view_mode, &self.time_format);
            writeln!(self.output, "{}", row)?;
        }
        if end < total {
            writeln!(self.output, "  -- {} more, type more --", total - end)?;
        }

        self.next_row = end;
        Ok(())
    }

    fn print_filters(&mut self) -> Result<()> {
        let custom = self.dialog.custom_filter();
        for (index, filter) in self.dialog.filters().iter().enumerate() {
            let marker = if custom.is_none() && index == self.dialog.selected_filter() {
                '*'
            } else {
                ' '
            };
            writeln!(
                self.output,
                "{} {}. {} ({})",
                marker,
                index + 1,
                filter.label,
                filter.pattern_string()
            )?;
        }
        if let Some(glob) = custom {
            writeln!(self.output, "* custom: {}", glob)?;
        }
        Ok(())
    }
}

fn format_row(row: usize, entry: &Entry, view_mode: ViewMode, time_format: &str) -> String {
    let name = if entry.is_dir {
        format!("{}/", entry.name)
    } else {
        entry.name.clone()
    };

    match view_mode {
        ViewMode::List => format!("{:>4}  {}", row, name),
        ViewMode::Details => format!(
            "{:>4}  {:<32} {:<8} {:>10}  {}",
            row,
            name,
            entry.class.label(),
            entry.size_text(),
            entry.modified_text(time_format)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_core::{DialogMode, DialogOptions};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("data")).unwrap();
        std::fs::write(temp.path().join("a.png"), b"png").unwrap();
        temp
    }

    fn run_script(temp: &TempDir, mode: DialogMode, script: &str) -> (DialogController, String) {
        let options = DialogOptions::new(mode)
            .initial_directory(temp.path())
            .filter("Images|*.png|All files|*");
        let dialog = DialogController::new(options).unwrap();

        let mut shell = Shell::new(
            dialog,
            Cursor::new(script.as_bytes().to_vec()),
            Vec::new(),
            ViewMode::Details,
            "%Y-%m-%d".to_string(),
        );
        shell.run().unwrap();

        let output = String::from_utf8(shell.output.clone()).unwrap();
        (shell.into_dialog(), output)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("  "), Ok(Command::Empty));
        assert_eq!(
            parse_command("cd  sub dir \n"),
            Ok(Command::Action(DialogAction::Navigate("sub dir".into())))
        );
        assert_eq!(
            parse_command("filter 2"),
            Ok(Command::Action(DialogAction::SelectFilter(1)))
        );
        assert_eq!(
            parse_command("filter *.hdr"),
            Ok(Command::Action(DialogAction::CustomFilter("*.hdr".into())))
        );
        assert_eq!(
            parse_command("pick 1 3"),
            Ok(Command::Action(DialogAction::SelectEntries(vec![0, 2])))
        );
        assert_eq!(
            parse_command("open \"a b.png\""),
            Ok(Command::Open(Some("\"a b.png\"".into())))
        );
        assert_eq!(parse_command("open"), Ok(Command::Open(None)));
        assert!(parse_command("pick 0").is_err());
        assert!(parse_command("filter 0").is_err());
        assert!(parse_command("cd").is_err());
        assert!(parse_command("frobnicate").is_err());
    }

    #[test]
    fn test_pick_then_open() {
        let temp = fixture();
        let (dialog, output) = run_script(&temp, DialogMode::OpenFile, "pick 2\nopen\n");

        assert!(output.contains("name: a.png"));
        assert_eq!(
            dialog.selection().unwrap().file_name(),
            temp.path().join("a.png")
        );
    }

    #[test]
    fn test_details_rows_show_metadata() {
        let temp = fixture();
        let (_, output) = run_script(&temp, DialogMode::OpenFile, "");
        let row = output.lines().find(|l| l.contains("a.png")).unwrap();
        assert!(row.contains("image"));
        assert!(row.contains("1 KB"));
        assert!(output.lines().any(|l| l.contains("data/")));
    }

    #[test]
    fn test_end_of_input_cancels() {
        let temp = fixture();
        let (dialog, _) = run_script(&temp, DialogMode::OpenFile, "cd data\n");
        assert_eq!(dialog.state(), &DialogState::Cancelled);
        assert_eq!(dialog.current_dir().as_path(), temp.path().join("data"));
    }

    #[test]
    fn test_errors_keep_the_shell_running() {
        let temp = fixture();
        let (dialog, output) = run_script(
            &temp,
            DialogMode::OpenFile,
            "bogus\ncd missing\nopen \"gone.png\"\nopen a.png\n",
        );
        assert!(output.contains("unknown command"));
        assert!(output.contains("error: Directory not found"));
        assert!(output.contains("gone.png not found."));
        assert!(dialog.selection().is_some());
    }

    #[test]
    fn test_overwrite_question() {
        let temp = fixture();
        let (dialog, output) = run_script(
            &temp,
            DialogMode::SaveFile,
            "open a.png\nno\nopen a.png\nyes\n",
        );
        assert_eq!(output.matches("already exists").count(), 2);
        assert!(output.contains("yes/no> "));
        assert_eq!(
            dialog.selection().unwrap().file_name(),
            temp.path().join("a.png")
        );
    }

    #[test]
    fn test_filter_listing_and_custom_glob() {
        let temp = fixture();
        std::fs::write(temp.path().join("notes.txt"), b"text").unwrap();
        let (_, output) = run_script(&temp, DialogMode::OpenFile, "filter\nfilter notes\nfilter\n");

        assert!(output.contains("* 1. Images (*.png)"));
        assert!(output.contains("notes.txt"));
        assert!(output.contains("* custom: notes"));
    }
}
