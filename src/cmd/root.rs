use crate::data::{DatepickerConfig, Persistable};
use crate::data::selection::SavedSelection;
use crate::ui::picker_view::{run_app, App};
use crate::ui::{restore_terminal, setup_terminal};
use anyhow::Result;
use chrono::Local;
use tracing::info;

/// Runs the interactive picker. With `resume` the last committed value from
/// selection.json is preselected. On a normal exit the value is saved and
/// printed; Ctrl+C or quitting with nothing picked leaves selection.json
/// untouched.
pub fn run(config: DatepickerConfig, resume: bool) -> Result<()> {
    let initial = if resume {
        SavedSelection::load()?
    } else {
        SavedSelection::default()
    };

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::event::DisableMouseCapture,
            crossterm::terminal::LeaveAlternateScreen
        );
        original_hook(info);
    }));

    let mut terminal = setup_terminal()?;

    let now = Local::now().naive_local();
    let mut app = App::new(config, now, &initial);

    let result = run_app(&mut terminal, &mut app);

    restore_terminal(&mut terminal)?;
    result?;

    if app.aborted() {
        info!("picker aborted, selection not saved");
        return Ok(());
    }
    let selection = app.selection();
    if selection.is_empty() {
        info!("nothing selected, selection not saved");
        return Ok(());
    }
    selection.save()?;
    println!("{}", app.display_value());
    Ok(())
}
