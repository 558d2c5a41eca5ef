// C++ code generation backend
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

//! C++ backend for the CIDLib ORB.
//!
//! Each output is a header/implementation pair:
//!
//!   - globals produce `<Fac>_<Name>.hpp/.cpp`,
//!       declaring everything within `namespace t<Fac>`;
//!   - the client produces `<Fac>_<Intf>ClientProxy.hpp/.cpp`,
//!       a proxy class whose methods marshal their parameters and invoke
//!       the ORB; and
//!   - the server produces `<Fac>_<Intf>ServerBase.hpp/.cpp`,
//!       an abstract class with a pure virtual method per IDL method and a
//!       `Dispatch` that unmarshals a call by method ordinal.
//!
//! The optional name of a client or server target replaces the
//!   `<Intf>ClientProxy`/`<Intf>ServerBase` stem.
//! A private header is named with a trailing underscore and never
//!   exported.
//! Successive globals sections share a single pair of files.
//!
//! All output is buffered until [`CodeGenerator::end_code_gen`],
//!   which hands every file to the [`OutputSink`].

use super::{CodeGenError, CodeGenerator, GenResult, OutputTarget};
use crate::{
    fmt::Indent,
    fs::OutputSink,
    idl::{
        ConstantDecl, EnumInfo, MethodDecl, MethodParam, StructInfo,
        StructMember, TypeInfo,
    },
    types::{ParamDir, TypeKind},
};
use log::trace;
use std::{fmt::Write, mem, path::PathBuf};

/// Generates C++ for the CIDLib ORB.
pub struct CppGenerator<S: OutputSink> {
    sink: S,
    intf_name: String,
    unit: Unit,
    /// Globals awaiting a further section for the same target.
    parked: Option<Unit>,
    pending: Vec<(PathBuf, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum UnitKind {
    #[default]
    Globals,
    Client,
    Server,
}

/// A header/implementation pair under construction.
#[derive(Debug, Default)]
struct Unit {
    kind: UnitKind,
    /// Enclosing namespace or class.
    scope: String,
    export: String,
    base_class: String,
    hpp_path: PathBuf,
    cpp_path: PathBuf,
    hpp: String,
    /// Declarations that must follow the enclosing scope.
    xhdr: String,
    cpp: String,
    /// Cases of the server `Dispatch` switch.
    dispatch: String,
}

impl Unit {
    fn is_class(&self) -> bool {
        self.kind != UnitKind::Globals
    }

    /// Indentation of declarations within the enclosing scope.
    fn indent(&self) -> usize {
        if self.is_class() {
            8
        } else {
            4
        }
    }
}

impl<S: OutputSink> CppGenerator<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            intf_name: String::new(),
            unit: Unit::default(),
            parked: None,
            pending: Vec::new(),
        }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn begin_unit(
        &mut self,
        kind: UnitKind,
        scope: String,
        base_class: &str,
        stem: &str,
        target: OutputTarget,
    ) -> GenResult {
        let spec = target.spec;
        let priv_suffix = if target.priv_header { "_" } else { "" };
        let hpp_name = format!("{}_{stem}{priv_suffix}.hpp", spec.facility);
        let cpp_name = format!("{}_{stem}.cpp", spec.facility);

        let mut unit = Unit {
            kind,
            scope,
            export: match target.priv_header {
                true => String::new(),
                false => target.export.to_string(),
            },
            base_class: base_class.to_string(),
            hpp_path: spec.out_dir.join(&hpp_name),
            cpp_path: spec.out_dir.join(&cpp_name),
            ..Default::default()
        };

        write_banner(&mut unit.hpp, &hpp_name)?;
        writeln!(unit.hpp, "#pragma once\n")?;
        writeln!(unit.hpp, "#pragma CIDLIB_PACK(CIDLIBPACK)\n")?;

        write_banner(&mut unit.cpp, &cpp_name)?;
        writeln!(unit.cpp, "#include \"{}_.hpp\"", spec.facility)?;
        writeln!(unit.cpp, "#include \"{hpp_name}\"\n")?;

        match kind {
            UnitKind::Globals => {
                writeln!(unit.hpp, "namespace {}\n{{", unit.scope)?;
            }
            UnitKind::Client | UnitKind::Server => {
                let export = lead(&unit.export);
                writeln!(
                    unit.hpp,
                    "class {export}{} : public {}\n{{\n    public :",
                    unit.scope, unit.base_class
                )?;
            }
        }

        trace!("began {:?} unit {}", kind, unit.hpp_path.display());

        self.unit = unit;
        Ok(())
    }

    /// Close `unit` and queue its files.
    fn close_unit(&mut self, mut unit: Unit) -> GenResult {
        match unit.kind {
            UnitKind::Globals => writeln!(unit.hpp, "}}\n")?,
            UnitKind::Client | UnitKind::Server => writeln!(unit.hpp, "}};\n")?,
        }

        writeln!(unit.hpp, "#pragma CIDLIB_POPPACK\n")?;

        if !unit.xhdr.is_empty() {
            unit.hpp.push_str(&unit.xhdr);
        }

        self.pending.push((unit.hpp_path, unit.hpp));
        self.pending.push((unit.cpp_path, unit.cpp));

        Ok(())
    }

    fn write_constant(&mut self, constant: &ConstantDecl) -> GenResult {
        let unit = &mut self.unit;
        let scope = &unit.scope;
        let name = constant.name();
        let value = constant.value();
        let indent = unit.indent();
        let mut hpp = Indent::new(&mut unit.hpp, indent);

        write_doc(&mut hpp, constant.doc())?;

        // Strings cannot be constexpr,
        //   and so are defined once in the implementation.
        if constant.ty() == TypeKind::TString {
            match unit.kind {
                UnitKind::Globals => writeln!(
                    hpp,
                    "{}extern const TString {name};",
                    lead(&unit.export)
                )?,
                _ => writeln!(hpp, "static const TString {name};")?,
            }

            writeln!(unit.cpp, "const TString {scope}::{name}(L\"{value}\");")?;
            return Ok(());
        }

        let ty = format!("tCIDLib::{}", constant.ty());

        match unit.kind {
            UnitKind::Globals => writeln!(hpp, "constexpr {ty} {name} = {value};")?,
            _ => writeln!(hpp, "static constexpr {ty} {name} = {value};")?,
        }

        Ok(())
    }

    fn write_client_method(&mut self, method: &MethodDecl) -> GenResult {
        let unit = &mut self.unit;
        let ret = cpp_type(method.ret());
        let name = method.name();
        let is_void = method.ret().kind() == TypeKind::TVoid;
        let virt = if method.in_base_class() { " override" } else { "" };

        writeln!(
            unit.hpp,
            "        {ret} {name}({}){virt};",
            param_decls(method.params(), true).join(", ")
        )?;

        writeln!(
            unit.cpp,
            "{ret} {}::{name}({})\n{{",
            unit.scope,
            param_decls(method.params(), false).join(", ")
        )?;

        let mut body = Indent::new(&mut unit.cpp, 4);
        writeln!(body, "TCmdQItem* pcqiToUse = pcqiGetCmdItem(ooidThis().oidKey());")?;
        writeln!(body, "TCmdItemJan janCmdQItem(pcqiToUse);")?;
        writeln!(body, "TOrbCmd& ocmdToUse = pcqiToUse->ocmdData();")?;

        if !is_void {
            writeln!(body, "{ret} retVal;")?;
        }

        writeln!(
            body,
            "ocmdToUse.strmOut() << tCIDLib::TCard4({});",
            method.ordinal()
        )?;

        for param in method.params().iter().filter(|p| p.dir().is_sent()) {
            write_marshal(&mut body, "ocmdToUse.strmOut()", param)?;
        }

        let dispatch = if method.is_poll() { "DispatchPoll" } else { "Dispatch" };
        writeln!(body, "{dispatch}({}, pcqiToUse);", method.timeout_ms())?;
        writeln!(body, "ocmdToUse.strmIn().Reset();")?;

        if !is_void {
            writeln!(body, "ocmdToUse.strmIn() >> retVal;")?;
        }

        for param in method.params().iter().filter(|p| p.dir().is_returned()) {
            write_unmarshal(&mut body, "ocmdToUse.strmIn()", param)?;
        }

        if !is_void {
            writeln!(body, "return retVal;")?;
        }

        writeln!(unit.cpp, "}}\n")?;
        Ok(())
    }

    fn write_server_method(&mut self, method: &MethodDecl) -> GenResult {
        let unit = &mut self.unit;
        let ret = cpp_type(method.ret());
        let name = method.name();

        if !method.in_base_class() {
            writeln!(
                unit.hpp,
                "        virtual {ret} {name}({}) = 0;",
                param_decls(method.params(), true).join(", ")
            )?;
        }

        let mut out = Indent::new(&mut unit.dispatch, 8);
        writeln!(out, "case {} :\n{{", method.ordinal())?;

        let mut body = Indent::new(&mut out, 4);

        for param in method.params() {
            let local = match param.ty().kind() {
                // The abstract buffer is received into a concrete one.
                TypeKind::TMemBuf => "THeapBuf".to_string(),
                _ => cpp_type(param.ty()),
            };

            if has_size_param(param) {
                writeln!(body, "tCIDLib::TCard4 {} = 0;", size_name(param))?;
            }
            writeln!(body, "{local} {};", param.name())?;
        }

        for param in method.params().iter().filter(|p| p.dir().is_sent()) {
            write_unmarshal(&mut body, "orbcToDispatch.strmIn()", param)?;
        }

        let args = method
            .params()
            .iter()
            .flat_map(|param| {
                let arg = match param.is_moveable() {
                    true => format!("tCIDLib::ForceMove({})", param.name()),
                    false => param.name().to_string(),
                };

                has_size_param(param)
                    .then(|| size_name(param))
                    .into_iter()
                    .chain([arg])
            })
            .collect::<Vec<_>>()
            .join(", ");

        match method.ret().kind() {
            TypeKind::TVoid => writeln!(body, "{name}({args});")?,
            _ => writeln!(body, "{ret} retVal = {name}({args});")?,
        }

        writeln!(body, "orbcToDispatch.strmOut().Reset();")?;

        if method.ret().kind() != TypeKind::TVoid {
            writeln!(body, "orbcToDispatch.strmOut() << retVal;")?;
        }

        for param in method.params().iter().filter(|p| p.dir().is_returned()) {
            write_marshal(&mut body, "orbcToDispatch.strmOut()", param)?;
        }

        writeln!(body, "break;")?;
        writeln!(out, "}}")?;

        Ok(())
    }

    fn write_dispatch(&mut self) -> GenResult {
        let unit = &mut self.unit;

        writeln!(
            unit.hpp,
            "        tCIDLib::TVoid Dispatch\n        (\n            \
                const   tCIDLib::TCard4 c4MethodId\n            \
                ,       TOrbCmd&        orbcToDispatch\n        ) override;"
        )?;

        writeln!(
            unit.cpp,
            "tCIDLib::TVoid\n{}::Dispatch(const tCIDLib::TCard4 c4MethodId, \
                TOrbCmd& orbcToDispatch)\n{{",
            unit.scope
        )?;
        writeln!(unit.cpp, "    switch(c4MethodId)\n    {{")?;
        unit.cpp.push_str(&unit.dispatch);
        writeln!(unit.cpp, "        default :")?;
        writeln!(
            unit.cpp,
            "            {}::Dispatch(c4MethodId, orbcToDispatch);",
            unit.base_class
        )?;
        writeln!(unit.cpp, "            break;\n    }}\n}}\n")?;

        Ok(())
    }
}

impl<S: OutputSink> CodeGenerator for CppGenerator<S> {
    fn begin_code_gen(&mut self) -> GenResult {
        self.parked = None;
        self.pending.clear();
        Ok(())
    }

    fn end_code_gen(&mut self) -> GenResult {
        if let Some(parked) = self.parked.take() {
            self.close_unit(parked)?;
        }

        for (path, contents) in self.pending.drain(..) {
            self.sink
                .write_file(&path, &contents)
                .map_err(|error| CodeGenError::Write {
                    path: path.clone(),
                    error,
                })?;
        }

        Ok(())
    }

    fn begin_globals(&mut self, target: OutputTarget) -> GenResult {
        let stem = target.spec.name.as_deref().unwrap_or("Globals");
        let scope = format!("t{}", target.spec.facility);

        self.begin_unit(UnitKind::Globals, scope, "", stem, target)?;

        // Sections sharing a target continue the same files.
        match self.parked.take() {
            Some(parked) if parked.hpp_path == self.unit.hpp_path => {
                self.unit = parked;
                Ok(())
            }
            Some(parked) => self.close_unit(parked),
            None => Ok(()),
        }
    }

    fn end_globals(&mut self) -> GenResult {
        self.parked = Some(mem::take(&mut self.unit));
        Ok(())
    }

    fn begin_intf(&mut self, name: &str, _id: &str) -> GenResult {
        self.intf_name = name.to_string();
        Ok(())
    }

    fn end_intf(&mut self) -> GenResult {
        self.intf_name.clear();
        Ok(())
    }

    fn begin_client_intf(
        &mut self,
        base_class: &str,
        target: OutputTarget,
    ) -> GenResult {
        let default_stem = format!("{}ClientProxy", self.intf_name);
        let stem = target.spec.name.clone().unwrap_or(default_stem);
        let class = format!("T{}ClientProxy", self.intf_name);

        self.begin_unit(UnitKind::Client, class, base_class, &stem, target)
    }

    fn end_client_intf(&mut self) -> GenResult {
        let unit = mem::take(&mut self.unit);
        self.close_unit(unit)
    }

    fn begin_server_intf(
        &mut self,
        base_class: &str,
        target: OutputTarget,
        ctor_params: &[MethodParam],
    ) -> GenResult {
        let default_stem = format!("{}ServerBase", self.intf_name);
        let stem = target.spec.name.clone().unwrap_or(default_stem);
        let class = format!("T{}ServerBase", self.intf_name);

        self.begin_unit(UnitKind::Server, class, base_class, &stem, target)?;

        let unit = &mut self.unit;
        let (class, base) = (&unit.scope, &unit.base_class);

        writeln!(unit.hpp, "        ~{class}();\n\n    protected :")?;
        writeln!(unit.cpp, "{class}::~{class}()\n{{\n}}\n")?;

        match ctor_params {
            [] => {
                writeln!(unit.hpp, "        {class}();")?;
                writeln!(unit.hpp, "        {class}(const TOrbObjId& ooidThis);")?;

                writeln!(
                    unit.cpp,
                    "{class}::{class}() :\n\n    {base}()\n{{\n}}\n"
                )?;
                writeln!(
                    unit.cpp,
                    "{class}::{class}(const TOrbObjId& ooidThis) :\n\n    \
                        {base}(ooidThis)\n{{\n}}\n"
                )?;
            }
            params => {
                let args = params
                    .iter()
                    .map(|p| match p.is_moveable() {
                        true => format!("tCIDLib::ForceMove({})", p.name()),
                        false => p.name().to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(", ");

                writeln!(
                    unit.hpp,
                    "        {class}({});",
                    param_decls(params, true).join(", ")
                )?;
                writeln!(
                    unit.cpp,
                    "{class}::{class}({}) :\n\n    {base}({args})\n{{\n}}\n",
                    param_decls(params, false).join(", ")
                )?;
            }
        }

        writeln!(unit.hpp, "\n    public :")?;
        Ok(())
    }

    fn end_server_intf(&mut self) -> GenResult {
        let unit = mem::take(&mut self.unit);
        self.close_unit(unit)
    }

    fn begin_constants(&mut self) -> GenResult {
        let indent = self.unit.indent();
        let mut hpp = Indent::new(&mut self.unit.hpp, indent);

        write_section(&mut hpp, "Constants")?;
        Ok(())
    }

    fn gen_constant(&mut self, constant: &ConstantDecl) -> GenResult {
        trace!("constant `{}`", constant.name());
        self.write_constant(constant)
    }

    fn end_constants(&mut self) -> GenResult {
        writeln!(self.unit.hpp)?;
        Ok(())
    }

    fn begin_types(&mut self) -> GenResult {
        let indent = self.unit.indent();
        let mut hpp = Indent::new(&mut self.unit.hpp, indent);

        write_section(&mut hpp, "Types")?;
        Ok(())
    }

    fn gen_enum(&mut self, doc: Option<&str>, info: &EnumInfo) -> GenResult {
        trace!("enum `{}`", info.name());

        let unit = &mut self.unit;
        let indent = unit.indent();

        write_doc(&mut Indent::new(&mut unit.hpp, indent), doc)?;
        info.fmt_header(
            unit.is_class(),
            &unit.scope,
            &unit.export,
            &mut unit.hpp,
            &mut unit.xhdr,
        )?;
        info.fmt_impl(&unit.scope, &mut unit.cpp)?;

        Ok(())
    }

    fn gen_struct(&mut self, info: &StructInfo) -> GenResult {
        trace!("struct `{}`", info.name());

        let indent = self.unit.indent();
        let mut hpp = Indent::new(&mut self.unit.hpp, indent);

        writeln!(hpp, "struct {}\n{{", info.name())?;

        for member in info.members() {
            match member {
                StructMember::Field { name, ty, .. } => {
                    let ty = match ty {
                        TypeKind::TString => "TString".to_string(),
                        ty => format!("tCIDLib::{ty}"),
                    };
                    writeln!(hpp, "    {ty} {name};")?;
                }
                StructMember::SubStruct {
                    name, struct_name, ..
                } => writeln!(hpp, "    {struct_name} {name};")?,
            }
        }

        writeln!(hpp, "}};\n")?;
        Ok(())
    }

    fn end_types(&mut self) -> GenResult {
        Ok(())
    }

    fn begin_methods(&mut self) -> GenResult {
        let unit = &mut self.unit;
        let class = &unit.scope;

        if unit.kind == UnitKind::Client {
            let base = &unit.base_class;

            writeln!(unit.hpp, "        {class}();")?;
            writeln!(
                unit.hpp,
                "        {class}(const TOrbObjId& ooidSrc, const TString& strNSBinding);"
            )?;
            writeln!(unit.hpp, "        {class}(const {class}&) = delete;")?;
            writeln!(unit.hpp, "        ~{class}();\n")?;
            writeln!(unit.hpp, "        {class}& operator=(const {class}&) = delete;\n")?;

            writeln!(unit.cpp, "{class}::{class}()\n{{\n}}\n")?;
            writeln!(
                unit.cpp,
                "{class}::{class}(const TOrbObjId& ooidSrc, \
                    const TString& strNSBinding) :\n\n    \
                    {base}(ooidSrc, strNSBinding)\n{{\n}}\n"
            )?;
            writeln!(unit.cpp, "{class}::~{class}()\n{{\n}}\n")?;
        }

        let mut hpp = Indent::new(&mut unit.hpp, 8);
        write_section(&mut hpp, "Methods")?;

        Ok(())
    }

    fn gen_method(&mut self, method: &MethodDecl) -> GenResult {
        trace!("method {} `{}`", method.ordinal(), method.name());

        match self.unit.kind {
            UnitKind::Client => self.write_client_method(method),
            UnitKind::Server => self.write_server_method(method),
            UnitKind::Globals => Ok(()),
        }
    }

    fn end_methods(&mut self) -> GenResult {
        match self.unit.kind {
            UnitKind::Server => self.write_dispatch(),
            UnitKind::Client | UnitKind::Globals => Ok(()),
        }
    }
}

/// The C++ type of a parameter or return value.
fn cpp_type(ty: &TypeInfo) -> String {
    let elem = ty.elem_type().unwrap_or_default();

    match ty.kind() {
        kind if kind.is_fundamental() || kind == TypeKind::TVoid => {
            format!("tCIDLib::{kind}")
        }
        TypeKind::Enumerated | TypeKind::Object => elem.to_string(),
        TypeKind::THashSet => {
            format!("THashSet<{elem}, {}>", ty.key_ops().unwrap_or_default())
        }
        TypeKind::TKeyedHashSet => format!(
            "TKeyedHashSet<{elem}, {}, {}>",
            ty.key_type().unwrap_or_default(),
            ty.key_ops().unwrap_or_default()
        ),
        kind if kind.is_collection() => format!("{kind}<{elem}>"),
        kind => kind.to_string(),
    }
}

/// Buffers are marshalled with an explicit byte count,
///   unless moved whole.
fn has_size_param(param: &MethodParam) -> bool {
    param.ty().kind().is_mem_buf() && !param.is_moveable()
}

/// Name of the byte count parameter of a buffer parameter.
fn size_name(param: &MethodParam) -> String {
    let mut chars = param.name().chars();

    match chars.next() {
        Some(first) => format!("c4{}{}Sz", first.to_ascii_uppercase(), chars.as_str()),
        None => "c4Sz".into(),
    }
}

/// Parameter declarations,
///   with default values if `defaults`.
fn param_decls(params: &[MethodParam], defaults: bool) -> Vec<String> {
    let mut decls = Vec::with_capacity(params.len());

    for param in params {
        let ty = cpp_type(param.ty());
        let name = param.name();
        let by_value = param.ty().kind().is_fundamental()
            || param.ty().kind() == TypeKind::Enumerated;

        if has_size_param(param) {
            let size = size_name(param);

            decls.push(match param.dir() {
                ParamDir::In => format!("const tCIDLib::TCard4 {size}"),
                ParamDir::Out | ParamDir::InOut => {
                    format!("tCIDLib::TCard4& {size}")
                }
            });
        }

        let decl = match (param.dir(), by_value, param.is_moveable()) {
            (_, _, true) => format!("{ty}&& {name}"),
            (ParamDir::In, true, false) => format!("const {ty} {name}"),
            (ParamDir::In, false, false) => format!("const {ty}& {name}"),
            (ParamDir::Out | ParamDir::InOut, _, false) => format!("{ty}& {name}"),
        };

        decls.push(match (defaults, param.default()) {
            (true, Some(default)) => format!("{decl} = {default}"),
            _ => decl,
        });
    }

    decls
}

fn write_marshal<W: Write>(out: &mut W, strm: &str, param: &MethodParam) -> GenResult {
    let name = param.name();

    match has_size_param(param) {
        true => {
            let size = size_name(param);
            writeln!(out, "{strm} << {size};")?;
            writeln!(out, "{strm}.WriteBuffer({name}.pc1Data(), {size});")?;
        }
        false => writeln!(out, "{strm} << {name};")?,
    }

    Ok(())
}

fn write_unmarshal<W: Write>(
    out: &mut W,
    strm: &str,
    param: &MethodParam,
) -> GenResult {
    let name = param.name();

    match has_size_param(param) {
        true => {
            let size = size_name(param);
            writeln!(out, "{strm} >> {size};")?;
            writeln!(out, "{strm}.c4ReadBuffer({name}, {size});")?;
        }
        false => writeln!(out, "{strm} >> {name};")?,
    }

    Ok(())
}

fn write_banner<W: Write>(out: &mut W, file: &str) -> GenResult {
    let rule = "-".repeat(76);

    writeln!(out, "// {rule}")?;
    writeln!(out, "//  FILE: {file}")?;
    writeln!(out, "//  DO NOT EDIT THIS FILE! IT WAS GENERATED BY CIDIDL")?;
    writeln!(out, "// {rule}\n")?;

    Ok(())
}

fn write_section<W: Write>(out: &mut W, title: &str) -> GenResult {
    let rule = "-".repeat(64);

    writeln!(out, "// {rule}")?;
    writeln!(out, "//  {title}")?;
    writeln!(out, "// {rule}")?;

    Ok(())
}

/// Documentation text as comment lines.
fn write_doc<W: Write>(out: &mut W, doc: Option<&str>) -> GenResult {
    for line in doc.into_iter().flat_map(str::lines) {
        match line.trim() {
            "" => writeln!(out, "//")?,
            line => writeln!(out, "//  {line}")?,
        }
    }

    Ok(())
}

/// Export keyword followed by a space,
///   or nothing.
fn lead(export: &str) -> String {
    match export {
        "" => String::new(),
        _ => format!("{export} "),
    }
}
