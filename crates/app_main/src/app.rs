//! Command line and application flow

use crate::render::TextModule;
use crate::shell::Shell;
use anyhow::Result;
use app_core::{AppConfig, DialogController, DialogMode, DialogOptions, SelectionResult, ViewMode};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use view_proto::ViewSession;

#[derive(Parser, Debug)]
#[command(author, version, about = "Pick an image and open it in the viewer.", long_about = None)]
pub struct Cli {
    /// Directory to start in (defaults to the last used one)
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Filters in "Label|*.a;*.b|Label2|*.c" form
    #[arg(long)]
    filter: Option<String>,

    /// 1-based filter selected on open
    #[arg(long, value_name = "N")]
    filter_index: Option<usize>,

    #[arg(long, value_enum, default_value_t = ModeArg::Open)]
    mode: ModeArg,

    /// Allow picking several files at once
    #[arg(long)]
    multi: bool,

    /// Initial content of the file name field
    #[arg(long, value_name = "NAME")]
    file_name: Option<String>,

    /// Extension appended to names typed without one
    #[arg(long, value_name = "EXT")]
    default_ext: Option<String>,

    /// Show size, type and modification time columns
    #[arg(long)]
    details: bool,

    /// Print the selection without opening the viewer
    #[arg(long)]
    no_view: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ModeArg {
    Open,
    Save,
    Folder,
}

impl From<ModeArg> for DialogMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Open => DialogMode::OpenFile,
            ModeArg::Save => DialogMode::SaveFile,
            ModeArg::Folder => DialogMode::SelectFolder,
        }
    }
}

impl Cli {
    /// Configured defaults, overridden by whatever was given on the command line
    fn dialog_options(&self, config: &AppConfig) -> DialogOptions {
        let mut options = DialogOptions::from_config(self.mode.into(), &config.dialog)
            .multiselect(self.multi);

        if let Some(dir) = &self.dir {
            options = options.initial_directory(dir.clone());
        }
        if let Some(filter) = &self.filter {
            options = options.filter(filter.clone()).filter_index(1);
        }
        if let Some(index) = self.filter_index {
            options = options.filter_index(index);
        }
        if let Some(name) = &self.file_name {
            options = options.file_name(name.clone());
        }
        if let Some(ext) = &self.default_ext {
            options = options.default_ext(ext);
        }
        options
    }

    fn view_mode(&self, config: &AppConfig) -> ViewMode {
        if self.details {
            ViewMode::Details
        } else {
            config.dialog.view_mode
        }
    }
}

/// Run the picker, then open the picked image
pub fn run(cli: Cli, mut config: AppConfig) -> Result<()> {
    let dialog = DialogController::new(cli.dialog_options(&config))?;

    let stdin = std::io::stdin();
    let mut shell = Shell::new(
        dialog,
        stdin.lock(),
        std::io::stdout(),
        cli.view_mode(&config),
        config.dialog.effective_time_format().to_string(),
    );
    shell.run()?;
    let dialog = shell.into_dialog();

    let Some(selection) = dialog.selection() else {
        tracing::info!("No selection made");
        return Ok(());
    };

    for path in selection.file_names() {
        println!("{}", path.display());
    }

    if config.view.remember_directory {
        remember_location(&mut config, &dialog, cli.filter.is_none());
    }

    if cli.mode == ModeArg::Open && !cli.no_view {
        open_viewer(selection, &config)?;
    }

    Ok(())
}

/// Store where the dialog ended so the next session starts there
fn remember_location(config: &mut AppConfig, dialog: &DialogController, keep_filter: bool) {
    config.dialog.initial_directory = Some(dialog.current_dir().to_path_buf());
    if keep_filter {
        config.dialog.filter_index = dialog.filter_index();
    }

    if let Err(e) = config.save() {
        tracing::warn!("Failed to save configuration: {}", e);
    }
}

fn open_viewer(selection: &SelectionResult, config: &AppConfig) -> Result<()> {
    let module = TextModule::new(std::io::stdout());
    let mut session = ViewSession::open(module, selection.file_name())?
        .with_wheel_step(config.view.wheel_step);
    session.paint();
    Ok(())
}
