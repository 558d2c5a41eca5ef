// Code generation options
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

//! Options controlling what is generated and where.
//!
//! Each of the client,
//!   server,
//!   and globals outputs is requested by a [`TargetSpec`] of the form
//!   `facName;outDir[;name]`;
//!     globals require the name.

use fxhash::FxHashMap;
use std::{
    error::Error,
    fmt::{self, Display},
    path::PathBuf,
};

/// Which output a [`TargetSpec`] requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Client,
    Server,
    Globals,
}

impl Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client => write!(f, "client"),
            Self::Server => write!(f, "server"),
            Self::Globals => write!(f, "globals"),
        }
    }
}

/// A requested output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    /// Facility that owns the generated code.
    pub facility: String,

    /// Directory into which files are written.
    pub out_dir: PathBuf,

    /// Stem of the generated file names.
    ///
    /// Optional for client and server,
    ///   which otherwise derive it from the interface name.
    pub name: Option<String>,
}

impl TargetSpec {
    /// Parse `facName;outDir[;name]`.
    pub fn parse(kind: TargetKind, spec: &str) -> Result<Self, ConfigError> {
        let bad = |reason| ConfigError::BadTarget {
            kind,
            spec: spec.into(),
            reason,
        };

        let mut parts = spec.split(';').map(str::trim);

        let facility = match parts.next() {
            Some(fac) if !fac.is_empty() => fac.to_string(),
            _ => return Err(bad("missing facility name")),
        };

        let out_dir = match parts.next() {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => return Err(bad("missing output directory")),
        };

        let name = parts.next().filter(|n| !n.is_empty()).map(String::from);

        if parts.next().is_some() {
            return Err(bad("too many fields"));
        }

        if kind == TargetKind::Globals && name.is_none() {
            return Err(bad("globals require a name"));
        }

        Ok(Self {
            facility,
            out_dir,
            name,
        })
    }
}

/// Options for a single run of the compiler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeGenOptions {
    pub client: Option<TargetSpec>,
    pub server: Option<TargetSpec>,
    pub globals: Option<TargetSpec>,

    /// Export keywords for the client,
    ///   server,
    ///   and globals respectively.
    pub client_export: String,
    pub server_export: String,
    pub globals_export: String,

    /// Generate private headers,
    ///   which omit the export keyword.
    pub priv_header: bool,

    /// Suppress the banner.
    pub no_logo: bool,

    /// DOCTYPE public id to system id.
    pub mappings: FxHashMap<String, String>,
}

impl CodeGenOptions {
    /// Whether anything at all has been requested.
    pub fn has_target(&self) -> bool {
        self.client.is_some() || self.server.is_some() || self.globals.is_some()
    }

    /// Register a `publicId=systemId` mapping.
    pub fn add_mapping(&mut self, mapping: &str) -> Result<(), ConfigError> {
        match mapping.split_once('=') {
            Some((public_id, system_id))
                if !public_id.trim().is_empty() && !system_id.trim().is_empty() =>
            {
                self.mappings
                    .insert(public_id.trim().into(), system_id.trim().into());
                Ok(())
            }
            _ => Err(ConfigError::BadMapping(mapping.into())),
        }
    }

    /// Fail unless at least one output was requested.
    pub fn check(&self) -> Result<(), ConfigError> {
        match self.has_target() {
            true => Ok(()),
            false => Err(ConfigError::NoTarget),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    BadTarget {
        kind: TargetKind,
        spec: String,
        reason: &'static str,
    },
    BadMapping(String),
    NoTarget,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadTarget { kind, spec, reason } => {
                write!(f, "invalid {kind} target `{spec}`: {reason}")
            }
            Self::BadMapping(mapping) => write!(
                f,
                "invalid mapping `{mapping}`: expected `publicId=systemId`"
            ),
            Self::NoTarget => write!(
                f,
                "at least one of /Client, /Server, or /Global is required"
            ),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn client_target_with_optional_name() {
        assert_eq!(
            Ok(TargetSpec {
                facility: "CIDLib".into(),
                out_dir: "out/client".into(),
                name: None,
            }),
            TargetSpec::parse(TargetKind::Client, "CIDLib;out/client"),
        );

        assert_eq!(
            Some("Proxy".into()),
            TargetSpec::parse(TargetKind::Client, "CIDLib;out;Proxy")
                .unwrap()
                .name,
        );
    }

    #[test]
    fn globals_target_requires_name() {
        assert!(matches!(
            TargetSpec::parse(TargetKind::Globals, "CIDLib;out"),
            Err(ConfigError::BadTarget {
                kind: TargetKind::Globals,
                ..
            })
        ));

        assert!(TargetSpec::parse(TargetKind::Globals, "CIDLib;out;Types").is_ok());
    }

    #[test]
    fn target_requires_dir() {
        assert!(TargetSpec::parse(TargetKind::Server, "CIDLib").is_err());
        assert!(TargetSpec::parse(TargetKind::Server, ";out").is_err());
        assert!(TargetSpec::parse(TargetKind::Server, "a;b;c;d").is_err());
    }

    #[test]
    fn mapping_splits_on_first_equals() {
        let mut opts = CodeGenOptions::default();
        opts.add_mapping("urn:foo=CIDIDL.DTD").unwrap();

        assert_eq!(
            Some(&"CIDIDL.DTD".to_string()),
            opts.mappings.get("urn:foo")
        );
        assert!(opts.add_mapping("nope").is_err());
    }

    #[test]
    fn check_requires_target() {
        let mut opts = CodeGenOptions::default();
        assert_eq!(Err(ConfigError::NoTarget), opts.check());

        opts.server = TargetSpec::parse(TargetKind::Server, "Fac;out").ok();
        assert_eq!(Ok(()), opts.check());
    }
}
