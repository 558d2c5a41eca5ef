// CIDIDL compiler command line
//
//  Copyright (C) 2014-2021 Ryan Specialty Group, LLC.
//
//  This file is part of CIDIDL.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! This is the IDL compiler (`idlc`).
//!
//! It has two commands:
//!
//!   - `idlc IdGen` prints a new interface id; and
//!   - `idlc CodeGen INPUT [OPTIONS]` compiles the document `INPUT`.
//!
//! Switches may be given in the traditional form `/Client=fac;dir` or as
//!   long options `--client 'fac;dir'`;
//!     traditional switch names are case-insensitive.

extern crate cididl;

use cididl::{
    codegen::CppGenerator,
    compiler::{compile_source, CompileError, CompilerContext},
    config::{CodeGenOptions, ConfigError, TargetKind, TargetSpec},
    diagnose::{Diagnostic, Reporter, SourceSpanResolver, VisualReporter},
    fs::{FsSink, WriteOnceSink},
};
use getopts::{Fail, Matches, Options};
use log::info;
use rand::Rng;
use std::{
    env,
    error::Error,
    fmt::{self, Display},
    fs, io,
};

/// Traditional switches,
///   which are rewritten into long options of the same name.
const SWITCHES: &[&str] = &[
    "nologo", "client", "server", "global", "cexport", "sexport", "gexport",
    "privhdr", "mapping",
];

/// Types of commands
#[derive(Debug, PartialEq, Eq)]
enum Command {
    IdGen,
    CodeGen(String, CodeGenOptions),
    Usage,
}

/// Entrypoint for the compiler
pub fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    )
    .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("idlc");
    let opts = get_opts();
    let usage = opts.usage(&format!(
        "Usage: {program} IdGen\n       {program} CodeGen INPUT [OPTIONS]"
    ));

    match parse_options(&opts, normalize_args(args.iter().skip(1))) {
        Ok(Command::IdGen) => {
            println!("{}", gen_id(&mut rand::rng()));
            std::process::exit(exitcode::OK);
        }
        Ok(Command::CodeGen(input, options)) => {
            if !options.no_logo {
                println!(
                    "idlc: CIDLib IDL compiler, version {}",
                    env!("CARGO_PKG_VERSION")
                );
            }

            match compile(&input, &options) {
                Ok(()) => std::process::exit(exitcode::OK),
                Err(IdlcError::Io(e)) => {
                    eprintln!("error: {input}: {e}");
                }
                Err(e) => eprintln!("fatal: failed to compile `{input}`: {e}"),
            }

            std::process::exit(1);
        }
        Ok(Command::Usage) => {
            println!("{usage}");
            std::process::exit(exitcode::OK);
        }
        Err(e) => {
            eprintln!("{e}");
            println!("{usage}");
            std::process::exit(exitcode::USAGE);
        }
    }
}

/// Compile the document at `input`,
///   reporting any errors to stderr.
fn compile(input: &str, options: &CodeGenOptions) -> Result<(), IdlcError> {
    let src = fs::read_to_string(input)?;

    let mut reporter = VisualReporter::new(SourceSpanResolver::new(input, &src));
    let mut sink = WriteOnceSink::new(FsSink);
    let mut gen = CppGenerator::new(&mut sink);

    let ctx = CompilerContext::new(options);

    match compile_source(&ctx, &src, &mut gen) {
        Ok(()) => {
            drop(gen);
            info!("generated {} file(s) from {input}", sink.written_len());

            Ok(())
        }
        Err(CompileError::Schema(violations)) => {
            for violation in &violations {
                report(&mut reporter, violation);
            }

            Err(IdlcError::Failed(reporter.error_count()))
        }
        Err(e) => {
            report(&mut reporter, &e);
            Err(IdlcError::Failed(reporter.error_count()))
        }
    }
}

/// Render a diagnostic to stderr.
///
/// Rendering to a string first keeps the report in one piece should
///   another process share the terminal.
fn report<R: Reporter, D: Diagnostic>(reporter: &mut R, diagnostic: &D) {
    let report = reporter.render(diagnostic).to_string();
    eprintln!("{report}");
}

/// A new interface id:
///   32 uppercase hexadecimal digits.
fn gen_id<R: Rng>(rng: &mut R) -> String {
    format!("{:032X}", rng.random::<u128>())
}

/// Get 'Options'
fn get_opts() -> Options {
    let mut opts = Options::new();
    opts.optopt("", "client", "generate the client proxy", "FAC;DIR[;NAME]");
    opts.optopt("", "server", "generate the server base", "FAC;DIR[;NAME]");
    opts.optopt("", "global", "generate global declarations", "FAC;DIR;NAME");
    opts.optopt("", "cexport", "client export keyword", "KEYWORD");
    opts.optopt("", "sexport", "server export keyword", "KEYWORD");
    opts.optopt("", "gexport", "globals export keyword", "KEYWORD");
    opts.optflag("", "privhdr", "generate private headers");
    opts.optmulti(
        "",
        "mapping",
        "map a DOCTYPE public id to a system id",
        "PUBLIC=SYSTEM",
    );
    opts.optflag("", "nologo", "suppress the banner");
    opts.optflag("h", "help", "print this help menu");

    opts
}

/// Rewrite traditional `/Name=value` and `/Flag` switches into long
///   options.
///
/// Only known switch names are rewritten,
///   so absolute paths pass through untouched.
fn normalize_args<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = Vec::new();

    for arg in args {
        let arg = arg.as_ref();

        let switch = arg.strip_prefix('/').and_then(|sw| {
            let (name, value) = match sw.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (sw, None),
            };

            let name = name.to_ascii_lowercase();
            SWITCHES.contains(&name.as_str()).then_some((name, value))
        });

        match switch {
            Some((name, value)) => {
                out.push(format!("--{name}"));
                out.extend(value.map(String::from));
            }
            None => out.push(arg.to_string()),
        }
    }

    out
}

/// Option parser
fn parse_options(opts: &Options, args: Vec<String>) -> Result<Command, UsageError> {
    let matches = opts.parse(args)?;

    if matches.opt_present("h") {
        return Ok(Command::Usage);
    }

    let (command, rest) = match matches.free.split_first() {
        Some((command, rest)) => (command.to_ascii_lowercase(), rest),
        None => return Err(Fail::OptionMissing("COMMAND".into()).into()),
    };

    match (command.as_str(), rest) {
        ("idgen", []) => Ok(Command::IdGen),
        ("codegen", [input]) => {
            Ok(Command::CodeGen(input.clone(), code_gen_options(&matches)?))
        }
        ("codegen", []) => Err(Fail::OptionMissing("INPUT".into()).into()),
        ("idgen" | "codegen", [_, extra, ..] | [extra]) => {
            Err(Fail::UnexpectedArgument(extra.clone()).into())
        }
        _ => Err(UsageError::UnknownCommand(matches.free[0].clone())),
    }
}

fn code_gen_options(matches: &Matches) -> Result<CodeGenOptions, ConfigError> {
    let target = |kind, name| {
        matches
            .opt_str(name)
            .map(|spec| TargetSpec::parse(kind, &spec))
            .transpose()
    };

    let mut options = CodeGenOptions {
        client: target(TargetKind::Client, "client")?,
        server: target(TargetKind::Server, "server")?,
        globals: target(TargetKind::Globals, "global")?,
        client_export: matches.opt_str("cexport").unwrap_or_default(),
        server_export: matches.opt_str("sexport").unwrap_or_default(),
        globals_export: matches.opt_str("gexport").unwrap_or_default(),
        priv_header: matches.opt_present("privhdr"),
        no_logo: matches.opt_present("nologo"),
        ..Default::default()
    };

    for mapping in matches.opt_strs("mapping") {
        options.add_mapping(&mapping)?;
    }

    options.check()?;
    Ok(options)
}

/// Invalid invocation.
#[derive(Debug, PartialEq, Eq)]
enum UsageError {
    Opts(Fail),
    Config(ConfigError),
    UnknownCommand(String),
}

impl From<Fail> for UsageError {
    fn from(e: Fail) -> Self {
        Self::Opts(e)
    }
}

impl From<ConfigError> for UsageError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opts(e) => Display::fmt(e, f),
            Self::Config(e) => Display::fmt(e, f),
            Self::UnknownCommand(cmd) => write!(
                f,
                "unknown command `{cmd}`: expected `IdGen` or `CodeGen`"
            ),
        }
    }
}

impl Error for UsageError {}

/// Compiler (`idlc`) error.
#[derive(Debug)]
enum IdlcError {
    Io(io::Error),

    /// Compilation failed after reporting this many errors.
    Failed(usize),
}

impl From<io::Error> for IdlcError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl Display for IdlcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => Display::fmt(e, f),
            Self::Failed(count) => {
                write!(f, "aborting due to {count} previous error(s)")
            }
        }
    }
}

impl Error for IdlcError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Failed(_) => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn parse(args: &[&str]) -> Result<Command, UsageError> {
        parse_options(&get_opts(), normalize_args(args))
    }

    #[test]
    fn normalize_traditional_switches() {
        assert_eq!(
            vec![
                "CodeGen",
                "in.xml",
                "--client",
                "Fac;out",
                "--nologo",
                "--mapping",
                "urn:x=CIDIDL.DTD",
            ],
            normalize_args([
                "CodeGen",
                "in.xml",
                "/Client=Fac;out",
                "/NoLogo",
                "/Mapping=urn:x=CIDIDL.DTD",
            ]),
        );
    }

    #[test]
    fn normalize_leaves_paths_alone() {
        assert_eq!(
            vec!["CodeGen", "/home/user/Intf.CIDIDL"],
            normalize_args(["CodeGen", "/home/user/Intf.CIDIDL"]),
        );
    }

    #[test]
    fn parse_options_help() {
        assert_eq!(Ok(Command::Usage), parse(&["-h"]));
        assert_eq!(Ok(Command::Usage), parse(&["CodeGen", "--help"]));
    }

    #[test]
    fn parse_options_idgen() {
        assert_eq!(Ok(Command::IdGen), parse(&["IdGen"]));
        assert_eq!(Ok(Command::IdGen), parse(&["idgen"]));
        assert_eq!(
            Err(UsageError::Opts(Fail::UnexpectedArgument("x".into()))),
            parse(&["IdGen", "x"]),
        );
    }

    #[test]
    fn parse_options_missing_command() {
        assert_eq!(
            Err(UsageError::Opts(Fail::OptionMissing("COMMAND".into()))),
            parse(&[]),
        );
    }

    #[test]
    fn parse_options_unknown_command() {
        assert_eq!(
            Err(UsageError::UnknownCommand("Frobnicate".into())),
            parse(&["Frobnicate"]),
        );
    }

    #[test]
    fn parse_options_missing_input() {
        assert_eq!(
            Err(UsageError::Opts(Fail::OptionMissing("INPUT".into()))),
            parse(&["CodeGen", "/Client=Fac;out"]),
        );
    }

    #[test]
    fn parse_options_too_many_args() {
        assert_eq!(
            Err(UsageError::Opts(Fail::UnexpectedArgument("b.xml".into()))),
            parse(&["CodeGen", "a.xml", "b.xml", "/Client=Fac;out"]),
        );
    }

    #[test]
    fn parse_options_requires_target() {
        assert_eq!(
            Err(UsageError::Config(ConfigError::NoTarget)),
            parse(&["CodeGen", "a.xml"]),
        );
    }

    #[test]
    fn parse_options_bad_target() {
        assert!(matches!(
            parse(&["CodeGen", "a.xml", "/Global=Fac;out"]),
            Err(UsageError::Config(ConfigError::BadTarget {
                kind: TargetKind::Globals,
                ..
            }))
        ));
    }

    #[test]
    fn parse_options_valid() {
        let cmd = parse(&[
            "CodeGen",
            "Intf.CIDIDL",
            "/Client=Fac;out/client",
            "/server=Fac;out/server;Srv",
            "/CExport=FACEXPORT",
            "/PrivHdr",
            "/NoLogo",
            "--mapping",
            "urn:x=CIDIDL.DTD",
        ])
        .unwrap();

        let options = match cmd {
            Command::CodeGen(input, options) => {
                assert_eq!("Intf.CIDIDL", input);
                options
            }
            other => panic!("expected CodeGen, got {other:?}"),
        };

        assert_eq!(
            Some(TargetSpec {
                facility: "Fac".into(),
                out_dir: "out/client".into(),
                name: None,
            }),
            options.client,
        );
        assert_eq!(
            Some("Srv"),
            options.server.as_ref().and_then(|s| s.name.as_deref())
        );
        assert_eq!(None, options.globals);
        assert_eq!("FACEXPORT", options.client_export);
        assert_eq!("", options.server_export);
        assert!(options.priv_header);
        assert!(options.no_logo);
        assert_eq!(
            Some(&"CIDIDL.DTD".to_string()),
            options.mappings.get("urn:x")
        );
    }

    #[test]
    fn ids_are_32_hex_digits() {
        let mut rng = StdRng::seed_from_u64(42);

        let id = gen_id(&mut rng);
        assert_eq!(32, id.len());
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));

        assert_ne!(id, gen_id(&mut rng));
    }
}
