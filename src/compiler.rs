// IDL compiler driver
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

//! Compile an IDL document into calls on a [`CodeGenerator`].
//!
//! Compilation happens in two phases:
//!
//!   1. The source text is read into a tree,
//!        validated against the embedded [schema](crate::dtd),
//!        and lowered into an [`IdlDocument`].
//!      Every declaration is checked during this phase.
//!   2. The document is emitted to the backend in document order,
//!        following the lifecycle described in [`crate::codegen`].
//!
//! Any error during the first phase aborts the compilation before the
//!   backend sees a single call,
//!     and so a document is either compiled in its entirety or not at
//!     all.
//! The ordinal of each method is its position within its `Methods`
//!   section and is used by backends as a dispatch index;
//!     document order is therefore significant.

use crate::{
    codegen::{CodeGenError, CodeGenerator, GenResult, OutputTarget},
    config::{CodeGenOptions, TargetSpec},
    diagnose::{AnnotatedSpan, Diagnostic},
    dtd::{Schema, SchemaViolation},
    idl::{
        ClassIntf, ConstantDecl, GlobalBlock, GlobalSection, IdlDocument,
        IdlError, TypeDecl,
    },
    xir::{self, Document, XmlTreeReader},
};
use log::{debug, error, trace};
use std::{
    error::Error,
    fmt::{self, Display},
};

/// State shared by a single run of the compiler.
///
/// Errors are raised through [`CompilerContext::fail`] so that every
///   failure is logged at the point that it aborts the run.
#[derive(Debug)]
pub struct CompilerContext<'o> {
    options: &'o CodeGenOptions,
}

impl<'o> CompilerContext<'o> {
    pub fn new(options: &'o CodeGenOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &'o CodeGenOptions {
        self.options
    }

    /// Abort the run with the given error.
    pub fn fail<T, E: Into<CompileError>>(&self, err: E) -> Result<T, CompileError> {
        let err = err.into();
        error!("{err}");

        Err(err)
    }

    fn target(&self, spec: &'o TargetSpec, export: &'o str) -> OutputTarget<'o> {
        OutputTarget {
            spec,
            export,
            priv_header: self.options.priv_header,
        }
    }
}

/// Which half of an interface is being emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Client,
    Server,
}

impl Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client => write!(f, "client"),
            Self::Server => write!(f, "server"),
        }
    }
}

/// Read,
///   validate,
///   and compile the document `src`.
pub fn compile_source<G: CodeGenerator>(
    ctx: &CompilerContext,
    src: &str,
    gen: &mut G,
) -> Result<(), CompileError> {
    let Document { doctype, mut root } =
        XmlTreeReader::new(src).read_document().or_else(|e| ctx.fail(e))?;

    let schema = Schema::cididl();

    schema
        .check_doctype(doctype.as_ref(), &root, &ctx.options().mappings)
        .or_else(|e| ctx.fail(vec![e]))?;
    schema.validate(&mut root).or_else(|e| ctx.fail(e))?;

    debug!("document is valid against {}", schema.system_id());

    let doc = IdlDocument::parse(&root).or_else(|e| ctx.fail(e))?;

    compile(ctx, &doc, gen)
}

/// Emit a parsed document to the backend `gen`.
///
/// Globals are emitted only if a globals target was requested,
///   and likewise for each half of the interface.
pub fn compile<G: CodeGenerator>(
    ctx: &CompilerContext,
    doc: &IdlDocument,
    gen: &mut G,
) -> Result<(), CompileError> {
    emit(ctx, doc, gen).or_else(|e| ctx.fail(e))
}

fn emit<G: CodeGenerator>(
    ctx: &CompilerContext,
    doc: &IdlDocument,
    gen: &mut G,
) -> GenResult {
    let opts = ctx.options();

    debug!("begin code generation");
    gen.begin_code_gen()?;

    match &opts.globals {
        Some(spec) => {
            let target = ctx.target(spec, &opts.globals_export);

            for section in doc.globals() {
                emit_globals(section, target, gen)?;
            }
        }
        None if !doc.globals().is_empty() => {
            debug!("no globals target; skipping globals");
        }
        None => (),
    }

    if let Some(intf) = doc.class_intf() {
        emit_intf(ctx, intf, gen)?;
    }

    gen.end_code_gen()?;
    debug!("end code generation");

    Ok(())
}

fn emit_globals<G: CodeGenerator>(
    section: &GlobalSection,
    target: OutputTarget,
    gen: &mut G,
) -> GenResult {
    debug!("begin globals");
    gen.begin_globals(target)?;

    for block in section.blocks() {
        match block {
            GlobalBlock::Constants(consts) => emit_constants(consts, gen)?,
            GlobalBlock::Types(types) => emit_types(types, gen)?,
        }
    }

    gen.end_globals()?;
    debug!("end globals");

    Ok(())
}

fn emit_intf<G: CodeGenerator>(
    ctx: &CompilerContext,
    intf: &ClassIntf,
    gen: &mut G,
) -> GenResult {
    let opts = ctx.options();

    debug!("begin interface `{}` ({})", intf.name(), intf.id());
    gen.begin_intf(intf.name(), intf.id())?;

    if let Some(spec) = &opts.client {
        let target = ctx.target(spec, &opts.client_export);
        emit_side(Side::Client, intf, target, gen)?;
    }

    if let Some(spec) = &opts.server {
        let target = ctx.target(spec, &opts.server_export);
        emit_side(Side::Server, intf, target, gen)?;
    }

    gen.end_intf()?;
    debug!("end interface `{}`", intf.name());

    Ok(())
}

fn emit_side<G: CodeGenerator>(
    side: Side,
    intf: &ClassIntf,
    target: OutputTarget,
    gen: &mut G,
) -> GenResult {
    debug!("begin {side} interface");

    match side {
        Side::Client => gen.begin_client_intf(intf.client_base(), target)?,
        Side::Server => {
            gen.begin_server_intf(intf.server_base(), target, intf.ctor())?
        }
    }

    // The interface id is always the first constant.
    gen.begin_constants()?;
    gen.gen_constant(&ConstantDecl::interface_id(intf.id(), intf.span()))?;

    for constant in intf.constants() {
        trace!("{side} constant `{}`", constant.name());
        gen.gen_constant(constant)?;
    }

    gen.end_constants()?;

    if let Some(types) = intf.types() {
        emit_types(types, gen)?;
    }

    gen.begin_methods()?;

    for method in intf.methods() {
        trace!("{side} method {} `{}`", method.ordinal(), method.name());
        gen.gen_method(method)?;
    }

    gen.end_methods()?;

    match side {
        Side::Client => gen.end_client_intf()?,
        Side::Server => gen.end_server_intf()?,
    }

    debug!("end {side} interface");
    Ok(())
}

fn emit_constants<G: CodeGenerator>(
    consts: &[ConstantDecl],
    gen: &mut G,
) -> GenResult {
    gen.begin_constants()?;

    for constant in consts {
        trace!("constant `{}`", constant.name());
        gen.gen_constant(constant)?;
    }

    gen.end_constants()
}

fn emit_types<G: CodeGenerator>(types: &[TypeDecl], gen: &mut G) -> GenResult {
    gen.begin_types()?;

    for decl in types {
        trace!("type `{}`", decl.name());

        match decl {
            TypeDecl::Enum { doc, info } => gen.gen_enum(doc.as_deref(), info)?,
            TypeDecl::Struct(info) => gen.gen_struct(info)?,
        }
    }

    gen.end_types()
}

/// Compiler error.
///
/// This represents the aggregation of all possible errors that can occur
///   while compiling a document.
#[derive(Debug)]
pub enum CompileError {
    /// The document is not well-formed XML.
    Xml(xir::Error),

    /// The document does not conform to the schema.
    Schema(Vec<SchemaViolation>),

    /// The document is valid but violates a rule of the IDL.
    Idl(IdlError),

    /// The backend failed.
    CodeGen(CodeGenError),
}

impl From<xir::Error> for CompileError {
    fn from(e: xir::Error) -> Self {
        Self::Xml(e)
    }
}

impl From<Vec<SchemaViolation>> for CompileError {
    fn from(e: Vec<SchemaViolation>) -> Self {
        Self::Schema(e)
    }
}

impl From<IdlError> for CompileError {
    fn from(e: IdlError) -> Self {
        Self::Idl(e)
    }
}

impl From<CodeGenError> for CompileError {
    fn from(e: CodeGenError) -> Self {
        Self::CodeGen(e)
    }
}

impl Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xml(e) => Display::fmt(e, f),
            Self::Schema(violations) => match violations.as_slice() {
                [only] => Display::fmt(only, f),
                all => write!(f, "{} schema violations", all.len()),
            },
            Self::Idl(e) => Display::fmt(e, f),
            Self::CodeGen(e) => Display::fmt(e, f),
        }
    }
}

impl Error for CompileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Xml(e) => Some(e),
            Self::Schema(_) => None,
            Self::Idl(e) => Some(e),
            Self::CodeGen(e) => Some(e),
        }
    }
}

impl Diagnostic for CompileError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        match self {
            Self::Xml(e) => e.describe(),
            Self::Schema(violations) => {
                violations.iter().flat_map(Diagnostic::describe).collect()
            }
            Self::Idl(e) => e.describe(),
            Self::CodeGen(e) => e.describe(),
        }
    }
}
