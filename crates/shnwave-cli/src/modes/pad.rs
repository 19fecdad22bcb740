//! `pad` mode

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use shnwave_services::{PadPosition, ProgressType, ToolConfig, inspect_file, pad_file, plan_pad};
use tracing::warn;

use super::report_skip;

pub fn run(files: &[PathBuf], position: PadPosition, preview: bool, config: &ToolConfig) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if preview {
        writeln!(out)?;
        writeln!(out, "Preview of changes:")?;
        writeln!(out, "-------------------")?;
        writeln!(out)?;
    }

    for path in files {
        let info = match inspect_file(path) {
            Ok(info) => info,
            Err(e) => {
                report_skip(path, &e);
                continue;
            }
        };

        let plan = match plan_pad(&info, position, config) {
            Ok(plan) => plan,
            Err(e) => {
                warn!("{} - skipping.", e);
                continue;
            }
        };

        if preview {
            writeln!(
                out,
                "File '{}' would be {}-padded as '{}' with {} zero-bytes.",
                plan.input.display(),
                position.label(),
                plan.output.display(),
                plan.pad_bytes
            )?;
            continue;
        }

        write!(
            out,
            "{}-padding '{}' as '{}' with {} zero-bytes ... ",
            position.label(),
            plan.input.display(),
            plan.output.display(),
            plan.pad_bytes
        )?;
        out.flush()?;

        match pad_file(&info, position, config, false, progress_reporter(config.progress)) {
            Ok(_) => writeln!(out, "done.")?,
            Err(e) => {
                writeln!(out, "failed.")?;
                warn!("{} - skipping.", e);
            }
        }
    }
    Ok(())
}

/// Progress shown on stderr while the data chunk is copied
fn progress_reporter(kind: ProgressType) -> impl FnMut(u64, u64) {
    let mut shown = 0u64;
    move |done, total| {
        let pct = if total == 0 { 100 } else { done * 100 / total };
        match kind {
            ProgressType::None => {}
            ProgressType::Percent => {
                if pct != shown {
                    eprint!("{:3}%\x08\x08\x08\x08", pct);
                    shown = pct;
                }
            }
            ProgressType::Dot => {
                while shown + 10 <= pct {
                    eprint!(".");
                    shown += 10;
                }
            }
        }
    }
}
