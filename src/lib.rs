// CIDLib IDL compiler
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

//! Compiler for the CIDLib ORB interface definition language.
//!
//! An interface is described by an XML document
//!   (see [`dtd`] for its grammar),
//!   which is lowered through these stages:
//!
//!   1. [`xir`] reads the text into a tree of elements;
//!   2. [`dtd`] validates that tree against the embedded schema,
//!        filling in default attribute values;
//!   3. [`idl`] builds a checked model of each declaration; and
//!   4. [`compiler`] drives a [`codegen`] backend through the model.
//!
//! The only backend is [`codegen::CppGenerator`],
//!   which produces client proxies,
//!   server stubs,
//!   and global declarations for C++.
//! Errors at every stage implement [`diagnose::Diagnostic`] and so can be
//!   rendered against the source document.

#![allow(rustdoc::private_intra_doc_links)]

pub mod codegen;
pub mod compiler;
pub mod config;
pub mod diagnose;
pub mod dtd;
pub mod fmt;
pub mod fs;
pub mod idl;
pub mod qname;
pub mod span;
pub mod types;
pub mod xir;
