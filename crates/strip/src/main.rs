use std::ffi::OsString;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{command, Arg, ArgAction};
use log::debug;
use modsect::read::ModuleFile;
use modsect_strip as strip;

fn main() -> Result<()> {
    let matches = command!()
        .max_term_width(100)
        .args(&[
            Arg::new("input")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("The input module"),
            Arg::new("output")
                .required(false)
                .value_parser(clap::value_parser!(PathBuf))
                .requires("delete-section")
                .help("The output module, or '-' for stdout. Overwritten if it exists"),
            Arg::new("delete-section")
                .short('d')
                .long("delete-section")
                .value_name("name")
                .value_parser(clap::value_parser!(String))
                .action(ArgAction::Append)
                .requires("output")
                .help("Delete every custom section with the given name"),
            Arg::new("print-sections")
                .long("print-sections")
                .action(ArgAction::SetTrue)
                .help("Print the sections of the input module"),
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable verbose output"),
        ])
        .get_matches();

    let level = if matches.get_flag("verbose") {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::builder()
        .format_level(false)
        .format_target(false)
        .filter_module("modsect_strip", level)
        .init();

    let in_path = matches.get_one::<PathBuf>("input").unwrap();

    let in_file = fs::File::open(in_path)
        .with_context(|| format!("Failed to open input file '{}'", in_path.display()))?;
    let in_data = unsafe { memmap2::Mmap::map(&in_file) }
        .with_context(|| format!("Failed to map input file '{}'", in_path.display()))?;
    let in_data = &*in_data;
    let mut stripper = strip::Stripper::read(in_data)
        .with_context(|| format!("Failed to parse input file '{}'", in_path.display()))?;
    debug!(
        "Read {} sections from '{}'",
        stripper.file().section_count(),
        in_path.display()
    );

    let out_path = matches.get_one::<PathBuf>("output");
    let to_stdout = out_path.is_some_and(|path| path == Path::new("-"));

    if matches.get_flag("print-sections") {
        // Keep stdout for the module itself.
        if to_stdout {
            print_sections(&mut io::stderr().lock(), stripper.file())?;
        } else {
            print_sections(&mut io::stdout().lock(), stripper.file())?;
        }
    }

    let Some(out_path) = out_path else {
        return Ok(());
    };

    let mut options = strip::Options::default();
    options.delete_sections = matches
        .get_many::<String>("delete-section")
        .unwrap_or_default()
        .map(|arg| arg.clone().into_bytes())
        .collect();
    stripper.modify(options);

    if to_stdout {
        stripper
            .write(io::stdout().lock())
            .with_context(|| "Failed to write output to stdout")?;
        return Ok(());
    }

    let mut open_options = fs::OpenOptions::new();
    open_options.write(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        use std::os::unix::fs::OpenOptionsExt;
        let in_metadata = in_file.metadata().with_context(|| {
            format!(
                "Failed to read metadata of input file '{}'",
                in_path.display()
            )
        })?;
        open_options.mode(in_metadata.mode());
    }

    // Devices and pipes are written in place. Regular files are replaced by
    // renaming a sibling temporary file, which leaves the mapped input intact
    // when it is also the output.
    let replace = match fs::metadata(out_path) {
        Ok(out_metadata) => out_metadata.is_file(),
        Err(_) => true,
    };
    if !replace {
        let out_file = open_options
            .truncate(true)
            .open(out_path)
            .with_context(|| format!("Failed to open output file '{}'", out_path.display()))?;
        stripper
            .write(BufWriter::new(out_file))
            .with_context(|| format!("Failed to write output file '{}'", out_path.display()))?;
        return Ok(());
    }

    let tmp_path = temporary_path(out_path)?;
    let tmp_file = open_options
        .create_new(true)
        .open(&tmp_path)
        .with_context(|| format!("Failed to create output file '{}'", tmp_path.display()))?;
    let result = stripper
        .write(BufWriter::new(tmp_file))
        .map_err(anyhow::Error::from)
        .and_then(|()| Ok(fs::rename(&tmp_path, out_path)?));
    if result.is_err() {
        fs::remove_file(&tmp_path).ok();
    }
    result.with_context(|| format!("Failed to write output file '{}'", out_path.display()))?;
    debug!(
        "Wrote {} bytes to '{}'",
        stripper.output_size(),
        out_path.display()
    );
    Ok(())
}

fn temporary_path(path: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .with_context(|| format!("Invalid output file '{}'", path.display()))?;
    let mut tmp_name = OsString::from(".");
    tmp_name.push(file_name);
    tmp_name.push(format!(".{}.tmp", process::id()));
    Ok(path.with_file_name(tmp_name))
}

fn print_sections(w: &mut dyn Write, file: &ModuleFile<'_>) -> Result<()> {
    writeln!(w, "Version: {}", file.header().version())?;
    writeln!(
        w,
        "{:>5}  {:>10}  {:>10}  {:<12}  Name",
        "Index", "Offset", "Size", "Kind"
    )?;
    for (index, section) in file.sections().enumerate() {
        let section = section?;
        let name = match (section.name(), section.name_error()) {
            (Some(name), _) => name.to_string(),
            (None, Some(error)) => format!("<{}>", error),
            (None, None) => String::new(),
        };
        writeln!(
            w,
            "{:>5}  {:#010x}  {:#010x}  {:<12}  {}",
            index,
            section.offset(),
            section.size(),
            section.kind().to_string(),
            name
        )?;
    }
    Ok(())
}
