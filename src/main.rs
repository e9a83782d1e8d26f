/*
 * This file is part of hwrev.
 *
 * Copyright (C) 2025 hwrev contributors
 *
 * hwrev is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * hwrev is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with hwrev. If not, see <https://www.gnu.org/licenses/>.
 */

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::json;

use hwrev::bootparam::{millivolts_or_default, CmdlineSource, FixedSource, MillivoltSource};
use hwrev::config::{config_path, load_config_from};
use hwrev::{attr, logger, resolver, BoardFamily, Resolver};

const USAGE: &str = "usage: hwrev [--logging] [--mv <n>] [--cmdline <path>] [--family <nx601j|nx504j|generic>] [--config <path>] [show | id | export [<dir>]]";

#[derive(Debug)]
enum Command {
    Show,
    Id,
    Export(Option<PathBuf>),
}

#[derive(Debug)]
struct Args {
    logging: bool,
    mv: Option<i32>,
    cmdline: Option<PathBuf>,
    family: Option<BoardFamily>,
    config: Option<PathBuf>,
    command: Command,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut out = Args {
        logging: false,
        mv: None,
        cmdline: None,
        family: None,
        config: None,
        command: Command::Show,
    };
    let mut positional: Vec<&str> = Vec::new();

    let mut it = args.iter().skip(1);
    while let Some(arg) = it.next() {
        let mut value = |flag: &str| it.next().ok_or_else(|| anyhow!("{} needs a value", flag));
        match arg.as_str() {
            "--logging" => out.logging = true,
            "--mv" => {
                let v = value("--mv")?;
                out.mv = Some(v.parse().with_context(|| format!("invalid millivolt value '{}'", v))?);
            }
            "--cmdline" => out.cmdline = Some(PathBuf::from(value("--cmdline")?)),
            "--family" => out.family = Some(value("--family")?.parse()?),
            "--config" => out.config = Some(PathBuf::from(value("--config")?)),
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            s if s.starts_with('-') => bail!("unknown option '{}'", s),
            s => positional.push(s),
        }
    }

    out.command = match positional.as_slice() {
        [] | ["show"] => Command::Show,
        ["id"] => Command::Id,
        ["export"] => Command::Export(None),
        ["export", dir] => Command::Export(Some(PathBuf::from(dir))),
        other => bail!("unexpected arguments: {}", other.join(" ")),
    };
    Ok(out)
}

fn main() -> Result<()> {
    let raw: Vec<String> = std::env::args().collect();
    let args = match parse_args(&raw) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    let cfg_path = args.config.clone().unwrap_or_else(config_path);
    let cfg = load_config_from(&cfg_path)
        .with_context(|| format!("failed to load {}", cfg_path.display()))?;

    if args.logging {
        logger::init_logging(&cfg.log_path());
        logger::log_event("startup", json!({ "args": raw }));
    }

    let family = args.family.unwrap_or_else(|| cfg.family());
    let source: Box<dyn MillivoltSource> = match args.mv {
        Some(mv) => Box::new(FixedSource(mv)),
        None => Box::new(CmdlineSource::new(args.cmdline.clone().unwrap_or_else(|| cfg.cmdline_path()))),
    };
    let mv = millivolts_or_default(source.as_ref());

    if resolver::install(Resolver::for_family(family, mv)).is_err() {
        bail!("revision resolver already initialized");
    }
    let resolver = resolver::global();

    match args.command {
        Command::Show => print!("{}", attr::show(resolver)),
        Command::Id => println!("{}", resolver.get_hardware_revision_id().id()),
        Command::Export(dir) => {
            let dir = dir.unwrap_or_else(|| cfg.attr_dir());
            let path = attr::export(resolver, &dir)
                .with_context(|| format!("failed to export attribute to {}", dir.display()))?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("hwrev").chain(list.iter().copied()).map(String::from).collect()
    }

    #[test]
    fn test_parse_defaults() {
        let a = parse_args(&args(&[])).unwrap();
        assert!(!a.logging);
        assert!(a.mv.is_none());
        assert!(matches!(a.command, Command::Show));
    }

    #[test]
    fn test_parse_flags_and_command() {
        let a = parse_args(&args(&["--mv", "416", "--family", "nx504j", "--logging", "export", "/tmp/x"])).unwrap();
        assert!(a.logging);
        assert_eq!(a.mv, Some(416));
        assert_eq!(a.family, Some(BoardFamily::Nx504j));
        assert!(matches!(a.command, Command::Export(Some(ref p)) if p == &PathBuf::from("/tmp/x")));
    }

    #[test]
    fn test_parse_negative_mv() {
        let a = parse_args(&args(&["--mv", "-20", "id"])).unwrap();
        assert_eq!(a.mv, Some(-20));
        assert!(matches!(a.command, Command::Id));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&["--mv"])).is_err());
        assert!(parse_args(&args(&["--mv", "abc"])).is_err());
        assert!(parse_args(&args(&["--family", "nx999"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
        assert!(parse_args(&args(&["show", "extra"])).is_err());
    }
}
