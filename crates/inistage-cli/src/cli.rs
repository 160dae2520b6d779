//! inistage CLI - Command-line interface for INI files with placeholders
//!
//! Usage:
//!   inistage get app.ini db.url
//!   inistage dump app.ini local.ini --format json
//!   inistage check app.ini

use clap::{Parser, Subcommand};
use colored::Colorize;
use indexmap::IndexMap;
use inistage_core::IniReader;
use std::path::PathBuf;
use std::process::ExitCode;

/// inistage - INI configuration with %(key)s placeholders
#[derive(Parser)]
#[command(name = "inistage")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get a specific value from the configuration
    Get {
        /// Configuration file(s); later files override earlier ones
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Composite key (e.g., db.host, or .name for unsectioned keys)
        key: String,

        /// Print the raw value without substituting placeholders
        #[arg(long)]
        raw: bool,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Default value if key not found
        #[arg(short, long)]
        default: Option<String>,
    },

    /// Export every entry
    Dump {
        /// Configuration file(s); later files override earlier ones
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Show raw values without substituting placeholders
        #[arg(long)]
        raw: bool,

        /// Output format: text, json, yaml
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Write to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that files parse without malformed lines
    Check {
        /// Configuration file(s) to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Run the CLI with the given arguments
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Get {
            files,
            key,
            raw,
            format,
            default,
        } => cmd_get(files, &key, raw, &format, default),

        Commands::Dump {
            files,
            raw,
            format,
            output,
        } => cmd_dump(files, raw, &format, output),

        Commands::Check { files } => cmd_check(files),
    }
}

fn load_reader(files: &[PathBuf]) -> Result<IniReader, String> {
    match files {
        [] => Err("No configuration files specified".to_string()),
        [single] => IniReader::from_file(single)
            .map_err(|e| format!("Failed to load {}: {}", single.display(), e)),
        _ => IniReader::load_merged(files).map_err(|e| format!("Failed to load files: {}", e)),
    }
}

fn cmd_get(
    files: Vec<PathBuf>,
    key: &str,
    raw: bool,
    format: &str,
    default: Option<String>,
) -> ExitCode {
    let reader = match load_reader(&files) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    let result = if raw {
        reader.get_raw(key).map(str::to_string)
    } else {
        reader.get_string(key)
    };

    match result {
        Ok(value) => {
            print_value(&value, format);
            ExitCode::SUCCESS
        }
        Err(e) if e.is_key_not_found() => {
            if let Some(default_val) = default {
                print_value(&default_val, format);
                ExitCode::SUCCESS
            } else {
                eprintln!("{}: Key '{}' not found", "Error".red(), key);
                ExitCode::from(1)
            }
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            ExitCode::from(1)
        }
    }
}

fn print_value(value: &str, format: &str) {
    match format {
        "json" => match serde_json::to_string(value) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("{}: {}", "Error".red(), e),
        },
        _ => println!("{}", value),
    }
}

fn cmd_dump(files: Vec<PathBuf>, raw: bool, format: &str, output: Option<PathBuf>) -> ExitCode {
    let reader = match load_reader(&files) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    let entries: IndexMap<String, String> = if raw {
        reader
            .store()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    } else {
        match reader.resolve_all() {
            Ok(resolved) => resolved,
            Err(e) => {
                eprintln!("{}: {}", "Error".red(), e);
                return ExitCode::from(1);
            }
        }
    };

    let content = match render_entries(&entries, format) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            return ExitCode::from(1);
        }
    };

    if let Some(output_path) = output {
        if let Err(e) = std::fs::write(&output_path, &content) {
            eprintln!("{}: {}", "Error writing file".red(), e);
            return ExitCode::from(2);
        }
        eprintln!("{} Wrote to {}", "✓".green(), output_path.display());
    } else {
        print!("{}", content);
    }
    ExitCode::SUCCESS
}

/// Render entries in the requested output format
fn render_entries(entries: &IndexMap<String, String>, format: &str) -> Result<String, String> {
    match format {
        "json" => serde_json::to_string_pretty(entries)
            .map(|s| s + "\n")
            .map_err(|e| e.to_string()),
        "yaml" | "yml" => serde_yaml::to_string(entries).map_err(|e| e.to_string()),
        "text" => Ok(entries
            .iter()
            .map(|(k, v)| format!("{} = {}\n", k, v))
            .collect()),
        other => Err(format!(
            "Unsupported format: {}. Use text, json, or yaml.",
            other
        )),
    }
}

fn cmd_check(files: Vec<PathBuf>) -> ExitCode {
    let mut all_valid = true;

    for file in files {
        match IniReader::from_file(&file) {
            Ok(reader) => {
                println!(
                    "{} {}: {} entries",
                    "✓".green(),
                    file.display(),
                    reader.len()
                );
            }
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
                all_valid = false;
            }
        }
    }

    if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entries() -> IndexMap<String, String> {
        let mut map = IndexMap::new();
        map.insert("db.host".to_string(), "localhost".to_string());
        map.insert(".name".to_string(), "demo".to_string());
        map
    }

    #[test]
    fn test_render_text() {
        assert_eq!(
            render_entries(&entries(), "text").unwrap(),
            "db.host = localhost\n.name = demo\n"
        );
    }

    #[test]
    fn test_render_json_keeps_order() {
        let json = render_entries(&entries(), "json").unwrap();
        let host = json.find("db.host").unwrap();
        let name = json.find(".name").unwrap();
        assert!(host < name);
    }

    #[test]
    fn test_render_yaml() {
        let yaml = render_entries(&entries(), "yaml").unwrap();
        assert!(yaml.contains("db.host: localhost"));
    }

    #[test]
    fn test_render_unknown_format() {
        assert!(render_entries(&entries(), "toml").is_err());
    }

    #[test]
    fn test_cli_parses_get() {
        let cli = Cli::try_parse_from(["inistage", "get", "a.ini", "b.ini", "db.host", "--raw"]).unwrap();
        match cli.command {
            Commands::Get { files, key, raw, .. } => {
                assert_eq!(files.len(), 2);
                assert_eq!(key, "db.host");
                assert!(raw);
            }
            _ => panic!("Expected Get"),
        }
    }

    #[test]
    fn test_load_reader_merges() {
        let temp_dir = std::env::temp_dir().join("inistage_cli_test_merge");
        std::fs::create_dir_all(&temp_dir).unwrap();
        let base = temp_dir.join("base.ini");
        let local = temp_dir.join("local.ini");
        std::fs::write(&base, "[db]\nhost = a\nport = 1\n").unwrap();
        std::fs::write(&local, "[db]\nhost = b\n").unwrap();

        let reader = load_reader(&[base, local]).unwrap();
        assert_eq!(reader.get_string("db.host").unwrap(), "b");
        assert_eq!(reader.get_string("db.port").unwrap(), "1");

        std::fs::remove_dir_all(&temp_dir).ok();
    }

    #[test]
    fn test_load_reader_requires_files() {
        assert!(load_reader(&[]).is_err());
    }
}
