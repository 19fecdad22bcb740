//! `len` mode: one summary line per file plus a totals line

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::ValueEnum;
use shnwave_core::{Problems, WaveInfo, format_total_duration};
use shnwave_services::inspect_file;

use super::report_skip;

const BANNER: &str = "    length     expanded size   cdr  WAVE problems filename";
const OK: char = '-';
const NOT_APPLICABLE: char = 'x';

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Unit {
    B,
    Kb,
    Mb,
    Gb,
}

impl Unit {
    fn divisor(self) -> f64 {
        match self {
            Unit::B => 1.0,
            Unit::Kb => 1024.0,
            Unit::Mb => 1_048_576.0,
            Unit::Gb => 1_073_741_824.0,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Unit::B => "B ",
            Unit::Kb => "KB",
            Unit::Mb => "MB",
            Unit::Gb => "GB",
        }
    }
}

/// Running sums over every file shown, folded into an all-zero `WaveInfo`
#[derive(Debug, Clone)]
pub struct Totals {
    processed: u64,
    aggregate: WaveInfo,
}

impl Default for Totals {
    fn default() -> Self {
        Self {
            processed: 0,
            aggregate: WaveInfo::new(),
        }
    }
}

impl Totals {
    pub fn add(&mut self, info: &WaveInfo) {
        let total = &mut self.aggregate;
        self.processed += 1;
        if info.is_not_cd() {
            total.problems.insert(Problems::NOT_CD_QUALITY);
        }
        total.total_size += info.total_size;
        total.data_size += info.data_size;
        total.actual_size += info.actual_size;
        total.exact_length += info.exact_length;
    }

    pub fn line(&self, unit: Unit) -> String {
        let total = &self.aggregate;
        let all_cd_quality = total.is_cd_quality();
        let length = format_total_duration(total.data_size, total.exact_length, all_cd_quality);
        let ratio = if self.processed > 0 && total.total_size > 0 {
            total.actual_size as f64 / total.total_size as f64
        } else {
            0.0
        };

        let size = total.total_size as f64 / unit.divisor();
        let size = if unit == Unit::B { format!("{:14.0}", size) } else { format!("{:14.2}", size) };
        let s = if self.processed == 1 { "" } else { "s" };

        format!(
            "{}{} {}                    (total{} for {} file{}, {:.4} overall compression ratio)",
            formatted_length(&length, all_cd_quality),
            size,
            unit.label(),
            s,
            self.processed,
            s,
            ratio
        )
    }
}

pub fn run(files: &[PathBuf], unit: Unit) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut totals = Totals::default();

    writeln!(out, "{}", BANNER)?;
    for path in files {
        match inspect_file(path) {
            Ok(info) => {
                writeln!(out, "{}", stats_line(&info))?;
                totals.add(&info);
            }
            Err(e) => report_skip(path, &e),
        }
    }
    writeln!(out, "{}", totals.line(unit))?;
    Ok(())
}

/// CD lengths carry a frame suffix, so they sit one column further left
fn formatted_length(length: &str, is_cd_quality: bool) -> String {
    if is_cd_quality {
        format!("{:>12} ", length)
    } else {
        format!("{:>13}", length)
    }
}

pub fn stats_line(info: &WaveInfo) -> String {
    let flag = |set: bool, c: char| if set { c } else { OK };

    let cdr: String = if info.is_not_cd() {
        ['c', NOT_APPLICABLE, NOT_APPLICABLE].iter().collect()
    } else {
        [OK, flag(info.has_bad_boundary(), 'b'), flag(info.is_too_short(), 's')].iter().collect()
    };

    let wave: String = [flag(info.is_header_not_canonical(), 'h'), flag(info.has_extra_chunks(), 'e')]
        .iter()
        .collect();

    let mut problems: String = [
        flag(info.file_has_id3v2_tag, '3'),
        flag(info.is_data_not_aligned(), 'a'),
        flag(info.is_header_inconsistent(), 'i'),
    ]
    .iter()
    .collect();
    if info.size_checks_apply() {
        problems.push(flag(info.may_be_truncated(), 't'));
        problems.push(flag(info.appended_bytes().is_some() && info.has_junk_appended(), 'j'));
    } else {
        problems.push(NOT_APPLICABLE);
        problems.push(NOT_APPLICABLE);
    }

    let name = info.filename.as_ref().map(|p| p.display().to_string()).unwrap_or_default();
    format!(
        "{}{:14}    {}   {}   {}   {}",
        formatted_length(&info.length_string(), info.is_cd_quality()),
        info.total_size,
        cdr,
        wave,
        problems,
        name
    )
}
