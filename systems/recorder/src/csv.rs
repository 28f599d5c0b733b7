//! Comma separated export of the run history.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::{DateTime, Local};
use solar_sweep_core::RunSummary;

use crate::RecorderError;

/// Header row of every history file.
pub const HEADER: &str = "Run,Elapsed Time [s],Roof Length [m],Roof Width [m],Panel Width [mm],Panel Length [mm],Inclination Angle [deg.],Speed [mm/s],Multiplier,PathType";

/// Formats a duration as whole minutes and seconds, e.g. `04:07`.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Renders one data row without a line terminator.
#[must_use]
pub fn render_row(run: &RunSummary) -> String {
    format!(
        "{},{},{},{},{},{},{},{},{},{}",
        run.run_number,
        format_elapsed(run.elapsed),
        run.roof_length_m,
        run.roof_width_m,
        run.panel_width_mm,
        run.panel_length_mm,
        run.panel_inclination_deg,
        run.robot_speed_mm_per_sec,
        run.speed_multiplier,
        run.path_kind,
    )
}

/// Renders the header and one row per run, each terminated by a newline.
#[must_use]
pub fn render(runs: &[RunSummary]) -> String {
    let mut contents = String::with_capacity(HEADER.len() + 1 + runs.len() * 64);
    contents.push_str(HEADER);
    contents.push('\n');
    for run in runs {
        contents.push_str(&render_row(run));
        contents.push('\n');
    }
    contents
}

/// File name derived from the moment the history is saved.
#[must_use]
pub fn file_name(saved_at: DateTime<Local>) -> String {
    format!("SolarSim_Runs_{}.csv", saved_at.format("%Y%m%d_%H%M%S"))
}

/// Writes the whole history into `directory`, returning the created path.
pub fn write_runs(
    directory: &Path,
    runs: &[RunSummary],
    saved_at: DateTime<Local>,
) -> Result<PathBuf, RecorderError> {
    let path = directory.join(file_name(saved_at));
    fs::write(&path, render(runs)).map_err(|source| RecorderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!(path = %path.display(), runs = runs.len(), "saved run history");
    Ok(path)
}
