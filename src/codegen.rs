// Code generation backends
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

//! Code generation backends.
//!
//! The [compiler](crate::compiler) drives a [`CodeGenerator`] through a
//!   fixed sequence of calls:
//!
//! ```text
//! begin_code_gen
//!   [ begin_globals
//!       [ begin_constants gen_constant* end_constants
//!       | begin_types (gen_enum | gen_struct)* end_types ]*
//!     end_globals ]*
//!   [ begin_intf
//!       [ begin_client_intf
//!           begin_constants gen_constant+ end_constants
//!           [ begin_types ... end_types ]
//!           begin_methods gen_method* end_methods
//!         end_client_intf ]
//!       [ begin_server_intf
//!           ...
//!         end_server_intf ]
//!     end_intf ]
//! end_code_gen
//! ```
//!
//! No call is made outside of its enclosing `begin_*`/`end_*` pair,
//!   and backends may rely on that ordering without checking it.
//! Nothing is called at all for a document that fails to compile.

pub mod cpp;

pub use cpp::CppGenerator;

use crate::{
    config::TargetSpec,
    diagnose::{AnnotatedSpan, Diagnostic},
    idl::{ConstantDecl, EnumInfo, MethodDecl, MethodParam, StructInfo},
};
use std::{
    error::Error,
    fmt::{self, Display},
    io,
    path::PathBuf,
};

pub type GenResult = Result<(), CodeGenError>;

/// Where and how an output is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputTarget<'a> {
    pub spec: &'a TargetSpec,

    /// Keyword exporting public declarations from the facility,
    ///   if any.
    pub export: &'a str,

    /// Generate a private header,
    ///   which is never exported.
    pub priv_header: bool,
}

/// A backend that renders declarations into source files.
///
/// See the [module-level documentation](self) for the call sequence.
pub trait CodeGenerator {
    fn begin_code_gen(&mut self) -> GenResult;
    fn end_code_gen(&mut self) -> GenResult;

    fn begin_globals(&mut self, target: OutputTarget) -> GenResult;
    fn end_globals(&mut self) -> GenResult;

    /// Begin the interface `name` with the globally unique id `id`.
    fn begin_intf(&mut self, name: &str, id: &str) -> GenResult;
    fn end_intf(&mut self) -> GenResult;

    fn begin_client_intf(
        &mut self,
        base_class: &str,
        target: OutputTarget,
    ) -> GenResult;
    fn end_client_intf(&mut self) -> GenResult;

    fn begin_server_intf(
        &mut self,
        base_class: &str,
        target: OutputTarget,
        ctor_params: &[MethodParam],
    ) -> GenResult;
    fn end_server_intf(&mut self) -> GenResult;

    fn begin_constants(&mut self) -> GenResult;
    fn gen_constant(&mut self, constant: &ConstantDecl) -> GenResult;
    fn end_constants(&mut self) -> GenResult;

    fn begin_types(&mut self) -> GenResult;
    fn gen_enum(&mut self, doc: Option<&str>, info: &EnumInfo) -> GenResult;
    fn gen_struct(&mut self, info: &StructInfo) -> GenResult;
    fn end_types(&mut self) -> GenResult;

    fn begin_methods(&mut self) -> GenResult;
    fn gen_method(&mut self, method: &MethodDecl) -> GenResult;
    fn end_methods(&mut self) -> GenResult;
}

/// Error from a code generation backend.
#[derive(Debug)]
pub enum CodeGenError {
    /// Generated text could not be formatted.
    Format(fmt::Error),

    /// A generated file could not be written.
    Write { path: PathBuf, error: io::Error },
}

impl From<fmt::Error> for CodeGenError {
    fn from(e: fmt::Error) -> Self {
        Self::Format(e)
    }
}

impl Display for CodeGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(_) => write!(f, "failed to format generated code"),
            Self::Write { path, error } => {
                write!(f, "failed to write {}: {error}", path.display())
            }
        }
    }
}

impl Error for CodeGenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Format(e) => Some(e),
            Self::Write { error, .. } => Some(error),
        }
    }
}

impl Diagnostic for CodeGenError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        // Output is not tied to any source location.
        vec![]
    }
}
