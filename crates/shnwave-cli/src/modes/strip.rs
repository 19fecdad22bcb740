//! `strip` mode

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use shnwave_core::CANONICAL_HEADER_SIZE;
use shnwave_services::{StripOptions, StripPlan, ToolConfig, inspect_file, plan_strip, strip_file};
use tracing::warn;

use super::{plural, report_skip};

pub fn run(files: &[PathBuf], options: StripOptions, preview: bool, config: &ToolConfig) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for path in files {
        let info = match inspect_file(path) {
            Ok(info) => info,
            Err(e) => {
                report_skip(path, &e);
                continue;
            }
        };

        let plan = match plan_strip(&info, options, config) {
            Ok(plan) => plan,
            Err(e) => {
                warn!("{} - skipping.", e);
                continue;
            }
        };

        if preview {
            write_preview(&mut out, &plan)?;
            continue;
        }

        write!(out, "{} --> {} ... ", plan.input.display(), plan.output.display())?;
        out.flush()?;

        match strip_file(&info, options, config, false) {
            Ok(_) => writeln!(out, "done.")?,
            Err(e) => {
                writeln!(out, "failed.")?;
                warn!("{} - skipping.", e);
            }
        }
    }
    Ok(())
}

fn write_preview<W: Write>(out: &mut W, plan: &StripPlan) -> io::Result<()> {
    writeln!(out, "{} --> {}", plan.input.display(), plan.output.display())?;
    if plan.rewrites_header {
        writeln!(
            out,
            "  - will rewrite {}-byte WAVE header to the canonical {}-byte header",
            plan.header_size, CANONICAL_HEADER_SIZE
        )?;
    }
    if plan.stripped_bytes > 0 {
        writeln!(
            out,
            "  - will strip {} byte{} worth of extra RIFF chunk(s) from the end of this file",
            plan.stripped_bytes,
            plural(plan.stripped_bytes)
        )?;
    }
    writeln!(out)
}
