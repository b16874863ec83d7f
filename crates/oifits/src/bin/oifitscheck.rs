use oifits::{load_oifits, Level, OIFitsChecker, OIFitsFile};
use std::process;

const USAGE: &str = "Usage: oifitscheck [-v] <file.fits[.gz]|url> ...\n\n\
Load OIFITS files and print their validation report.";

fn format_summary(location: &str, file: &OIFitsFile) -> String {
    let mut out = format!("File: {location}\n");
    for table in file.tables() {
        out.push_str(&format!("  {table}: {} rows\n", table.nb_rows()));
    }
    out
}

fn format_report(checker: &OIFitsChecker, verbose: bool) -> String {
    if verbose {
        return checker.check_report();
    }
    // without -v, INFO lines are left out
    let mut out = String::new();
    for message in checker
        .messages()
        .iter()
        .filter(|m| m.level != Level::Info)
    {
        out.push_str(&format!("{}\t{}\n", message.level, message.text));
    }
    out.push('\n');
    out.push_str(&checker.check_status());
    out
}

/// Output text and whether every file passed without severe errors.
fn run(args: &[String]) -> Result<(String, bool), String> {
    let mut verbose = false;
    let mut locations = Vec::new();

    for arg in args {
        if arg == "-v" || arg == "--verbose" {
            verbose = true;
        } else if arg == "-h" || arg == "--help" {
            return Ok((format!("{USAGE}\n"), true));
        } else if arg.starts_with('-') {
            return Err(format!("Unknown option: {arg}"));
        } else {
            locations.push(arg.as_str());
        }
    }

    if locations.is_empty() {
        return Err(String::from(USAGE));
    }

    let mut out = String::new();
    let mut valid = true;
    for (i, location) in locations.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let (file, checker) =
            load_oifits(location).map_err(|e| format!("Error loading '{location}': {e}"))?;
        out.push_str(&format_summary(location, &file));
        out.push_str(&format_report(&checker, verbose));
        out.push('\n');
        valid &= checker.nb_severes() == 0;
    }
    Ok((out, valid))
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok((output, valid)) => {
            print!("{output}");
            if !valid {
                process::exit(2);
            }
        }
        Err(msg) => {
            eprintln!("{msg}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_prints_usage() {
        let err = run(&[]).unwrap_err();
        assert!(err.contains("Usage"));
    }

    #[test]
    fn unknown_option() {
        let err = run(&args(&["--bogus"])).unwrap_err();
        assert!(err.contains("Unknown option"));
    }

    #[test]
    fn help_is_not_an_error() {
        let (out, valid) = run(&args(&["-h"])).unwrap();
        assert!(out.starts_with("Usage"));
        assert!(valid);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = run(&args(&["/nonexistent/file.fits"])).unwrap_err();
        assert!(err.contains("Error loading '/nonexistent/file.fits'"));
    }

    #[test]
    fn quiet_report_hides_info() {
        let mut checker = OIFitsChecker::new();
        checker.info("Analysing table [1]: OI_TARGET");
        checker.warning("Missing unit for column 'RAEP0', should be 'deg'");
        let report = format_report(&checker, false);
        assert!(!report.contains("INFO"));
        assert!(report.contains("WARNING\tMissing unit"));
        assert!(report.ends_with("1 warnings, 0 severe errors"));
        assert!(format_report(&checker, true).contains("INFO\tAnalysing"));
    }

    #[test]
    fn empty_file_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.fits");
        oifits::OIFitsWriter::write(&path, &OIFitsFile::new()).unwrap();
        let (out, valid) = run(&args(&[path.to_str().unwrap()])).unwrap();
        assert!(!valid);
        assert!(out.contains("SEVERE\tNo OI_VIS, OI_VIS2, OI_T3 table found"));
    }
}
