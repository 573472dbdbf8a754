//! Unit tests for CLI argument parsing and validation

use clap::Parser;
use dkit::cli::{CmpCommands, ColCommands, Cli, Commands, FilesCommands, OutputFormat};
use dkit::values::ValuesMode;
use std::path::PathBuf;

#[test]
fn test_global_defaults() {
    let cli = Cli::try_parse_from(["dkit", "col", "list", "a.csv"]).unwrap();
    assert_eq!(cli.global.delim, ",");
    assert_eq!(cli.global.encoding, "utf-8-sig");
    assert!(!cli.global.no_header);
    assert!(!cli.global.quiet);
    assert!(!cli.global.lazy_quotes);
    assert_eq!(cli.global.format, OutputFormat::Pretty);
}

#[test]
fn test_global_options_after_subcommand() {
    let cli = Cli::try_parse_from([
        "dkit", "col", "first", "name", "a.csv", "-d", "tab", "-H", "-q", "--lazy-quotes", "--format", "json",
    ])
    .unwrap();
    assert_eq!(cli.global.delim, "tab");
    assert!(cli.global.no_header);
    assert!(cli.global.quiet);
    assert!(cli.global.lazy_quotes);
    assert_eq!(cli.global.format, OutputFormat::Json);
}

#[test]
fn test_col_cmp_with_repeated_when() {
    let cli = Cli::try_parse_from([
        "dkit", "col", "cmp", "a", "b", "x.csv", "y.csv", "--when", "k=1|k=2", "--when", "j not empty",
        "--ignore-case",
    ])
    .unwrap();
    match cli.command {
        Commands::Col {
            command:
                ColCommands::Cmp {
                    a,
                    b,
                    files,
                    ignore_case,
                    allow_empty,
                    when,
                },
        } => {
            assert_eq!(a, "a");
            assert_eq!(b, "b");
            assert_eq!(files, vec![PathBuf::from("x.csv"), PathBuf::from("y.csv")]);
            assert!(ignore_case);
            assert!(!allow_empty);
            assert_eq!(when, vec!["k=1|k=2", "j not empty"]);
        }
        _ => panic!("Expected col cmp command"),
    }
}

#[test]
fn test_col_vals_modes() {
    let cli = Cli::try_parse_from(["dkit", "col", "vals", "freq", "color", "a.csv"]).unwrap();
    match cli.command {
        Commands::Col {
            command:
                ColCommands::Vals {
                    mode,
                    column,
                    null_token,
                    fixed_width,
                    ..
                },
        } => {
            assert_eq!(mode, ValuesMode::Frequency);
            assert_eq!(column, "color");
            assert_eq!(null_token, "<EMPTY>");
            assert!(fixed_width.is_none());
        }
        _ => panic!("Expected col vals command"),
    }

    assert!(Cli::try_parse_from(["dkit", "col", "vals", "median", "color", "a.csv"]).is_err());
}

#[test]
fn test_col_dupkey_requires_by() {
    assert!(Cli::try_parse_from(["dkit", "col", "dupkey", "id", "a.csv"]).is_err());

    let cli = Cli::try_parse_from([
        "dkit", "col", "dupkey", "id", "a.csv", "--by", "x,y", "--require-all",
    ])
    .unwrap();
    match cli.command {
        Commands::Col {
            command: ColCommands::Dupkey { key, by, require_all, .. },
        } => {
            assert_eq!(key, "id");
            assert_eq!(by, "x,y");
            assert!(require_all);
        }
        _ => panic!("Expected col dupkey command"),
    }
}

#[test]
fn test_files_require_at_least_one_path() {
    assert!(Cli::try_parse_from(["dkit", "col", "first", "name"]).is_err());
    assert!(Cli::try_parse_from(["dkit", "files", "with", "c", "v"]).is_err());
}

#[test]
fn test_files_with_command() {
    let cli = Cli::try_parse_from([
        "dkit", "files", "with", "status", "open", "dir", "--case-insensitive",
    ])
    .unwrap();
    match cli.command {
        Commands::Files {
            command:
                FilesCommands::With {
                    column,
                    value,
                    files,
                    case_insensitive,
                    ..
                },
        } => {
            assert_eq!(column, "status");
            assert_eq!(value, "open");
            assert_eq!(files, vec![PathBuf::from("dir")]);
            assert!(case_insensitive);
        }
        _ => panic!("Expected files with command"),
    }
}

#[test]
fn test_fmt_requires_delimiters() {
    assert!(Cli::try_parse_from(["dkit", "fmt", "a.csv"]).is_err());

    let cli = Cli::try_parse_from([
        "dkit", "fmt", "--in-delim", "tab", "--out-delim", "pipe", "-i", "a.tsv",
    ])
    .unwrap();
    match cli.command {
        Commands::Fmt {
            in_delim,
            out_delim,
            inplace,
            out,
            outdir,
            ..
        } => {
            assert_eq!(in_delim, "tab");
            assert_eq!(out_delim, "pipe");
            assert!(inplace);
            assert!(out.is_none());
            assert!(outdir.is_none());
        }
        _ => panic!("Expected fmt command"),
    }
}

#[test]
fn test_cmp_zips_command() {
    let cli = Cli::try_parse_from(["dkit", "cmp", "zips", "a.zip", "b.zip", "-s", "--ignore-missing"]).unwrap();
    match cli.command {
        Commands::Cmp {
            command:
                CmpCommands::Zips {
                    a,
                    b,
                    summary_only,
                    ignore_missing,
                },
        } => {
            assert_eq!(a, PathBuf::from("a.zip"));
            assert_eq!(b, PathBuf::from("b.zip"));
            assert!(summary_only);
            assert!(ignore_missing);
        }
        _ => panic!("Expected cmp zips command"),
    }
}

#[test]
fn test_invalid_format_rejected() {
    assert!(Cli::try_parse_from(["dkit", "--format", "yaml", "col", "list", "a.csv"]).is_err());
}
