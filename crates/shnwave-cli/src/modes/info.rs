//! `info` mode: full per-file report

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use shnwave_core::{CD_MIN_BURNABLE_SIZE, WaveInfo, wave_format_name};
use shnwave_services::{inspect_file, odd_sized_data_chunk_is_null_padded, open_input_stream};

use super::{plural, report_skip};

pub fn run(files: &[PathBuf]) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for path in files {
        match inspect_file(path) {
            Ok(info) => {
                let pad_byte = pad_byte_status(&info);
                write_info(&mut out, &info, pad_byte)?;
            }
            Err(e) => report_skip(path, &e),
        }
    }
    Ok(())
}

/// Whether an odd-sized data chunk is followed by its pad byte
fn pad_byte_status(info: &WaveInfo) -> &'static str {
    if !info.has_odd_sized_data() {
        return "n/a";
    }
    match info.extra_riff_size {
        -1 => "no",
        0 => "yes",
        _ => {
            let probed = open_input_stream(info)
                .ok()
                .and_then(|mut input| odd_sized_data_chunk_is_null_padded(info, &mut input).ok());
            match probed {
                Some(true) => "yes",
                Some(false) => "no",
                None => "unknown",
            }
        }
    }
}

pub fn write_info<W: Write>(out: &mut W, info: &WaveInfo, pad_byte: &str) -> io::Result<()> {
    let name = info.filename.as_ref().map(|p| p.display().to_string()).unwrap_or_default();
    let is_compressed = info.input_format.is_some_and(|f| f.is_compressed);

    writeln!(out, "-------------------------------------------------------------------------------")?;
    writeln!(out, "file name:                    {}", name)?;
    writeln!(out, "handled by:                   {} format module", info.format_name())?;
    writeln!(out, "length:                       {}", info.length_string())?;
    writeln!(
        out,
        "WAVE format:                  0x{:04x} ({})",
        info.wave_format,
        wave_format_name(info.wave_format)
    )?;
    writeln!(out, "channels:                     {}", info.channels)?;
    writeln!(out, "bits/sample:                  {}", info.bits_per_sample)?;
    writeln!(out, "samples/sec:                  {}", info.samples_per_sec)?;
    writeln!(out, "average bytes/sec:            {}", info.avg_bytes_per_sec)?;
    writeln!(out, "rate (calculated):            {}", info.rate)?;
    writeln!(out, "block align:                  {}", info.block_align)?;
    writeln!(out, "header size:                  {} bytes", info.header_size)?;
    writeln!(out, "data size:                    {} byte{}", info.data_size, plural(info.data_size))?;
    writeln!(out, "chunk size:                   {} bytes", info.chunk_size)?;
    writeln!(out, "total size (chunk size + 8):  {} bytes", info.total_size)?;
    writeln!(out, "actual file size:             {}", info.actual_size)?;
    writeln!(out, "file is compressed:           {}", yes_no(is_compressed))?;
    writeln!(
        out,
        "compression ratio:            {:.4}",
        info.actual_size as f64 / info.total_size as f64
    )?;

    writeln!(out, "CD-quality properties:")?;
    let not_cd = info.is_not_cd();
    writeln!(out, "  CD quality:                 {}", yes_no(!not_cd))?;
    if not_cd {
        writeln!(out, "  cut on sector boundary:     n/a")?;
        writeln!(out, "  sector misalignment:        n/a")?;
        writeln!(out, "  long enough to be burned:   n/a")?;
    } else {
        let misalignment = info.sector_misalignment();
        writeln!(out, "  cut on sector boundary:     {}", yes_no(!info.has_bad_boundary()))?;
        writeln!(out, "  sector misalignment:        {} byte{}", misalignment, plural(misalignment))?;
        if info.is_too_short() {
            writeln!(
                out,
                "  long enough to be burned:   no - needs to be at least {} bytes",
                CD_MIN_BURNABLE_SIZE
            )?;
        } else {
            writeln!(out, "  long enough to be burned:   yes")?;
        }
    }

    writeln!(out, "WAVE properties:")?;
    writeln!(out, "  non-canonical header:       {}", yes_no(info.is_header_not_canonical()))?;
    if !info.has_extra_chunks() {
        writeln!(out, "  extra RIFF chunks:          no")?;
    } else if info.has_odd_sized_data() {
        writeln!(
            out,
            "  extra RIFF chunks:          yes ({} or {} bytes)",
            info.extra_riff_size,
            info.extra_riff_size + 1
        )?;
    } else {
        writeln!(out, "  extra RIFF chunks:          yes ({} bytes)", info.extra_riff_size)?;
    }

    writeln!(out, "Possible problems:")?;
    if info.file_has_id3v2_tag {
        writeln!(out, "  file contains ID3v2 tag:    yes ({} bytes)", info.id3v2_tag_size)?;
    } else {
        writeln!(out, "  file contains ID3v2 tag:    no")?;
    }
    writeln!(out, "  data chunk block-aligned:   {}", yes_no(!info.is_data_not_aligned()))?;
    writeln!(out, "  inconsistent header:        {}", yes_no(info.is_header_inconsistent()))?;

    if info.size_checks_apply() {
        match info.missing_bytes().filter(|_| info.may_be_truncated()) {
            Some(n) => writeln!(out, "  file probably truncated:    yes (missing {} byte{})", n, plural(n))?,
            None => writeln!(out, "  file probably truncated:    no")?,
        }
        match info.appended_bytes().filter(|_| info.has_junk_appended()) {
            Some(n) => writeln!(out, "  junk appended to file:      yes ({} byte{})", n, plural(n))?,
            None => writeln!(out, "  junk appended to file:      no")?,
        }
    } else {
        writeln!(out, "  file probably truncated:    unknown")?;
        writeln!(out, "  junk appended to file:      unknown")?;
    }
    writeln!(out, "  odd data size has pad byte: {}", pad_byte)?;

    Ok(())
}

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}
